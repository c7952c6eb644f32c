//! COBYLA-style trust-region simplex optimizer.
//!
//! This is a derivative-free method suitable for variational algorithms
//! where gradients are expensive and objective values are noisy. The
//! simplex steps are bounded by a trust radius `rho` that shrinks from
//! `rhobeg` to `rhoend` whenever the simplex stops making progress.

use super::{OptimizationResult, Optimizer, argmin};

/// COBYLA optimizer configuration.
#[derive(Debug, Clone)]
pub struct Cobyla {
    /// Maximum number of iterations.
    pub maxiter: usize,
    /// Convergence tolerance on the simplex value spread.
    pub tol: f64,
    /// Initial trust region radius.
    pub rhobeg: f64,
    /// Final trust region radius.
    pub rhoend: f64,
}

impl Default for Cobyla {
    fn default() -> Self {
        Self {
            maxiter: 2000,
            tol: 1e-6,
            rhobeg: 0.5,
            rhoend: 1e-4,
        }
    }
}

impl Cobyla {
    /// Create a new COBYLA optimizer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum iterations.
    #[must_use]
    pub fn with_maxiter(mut self, maxiter: usize) -> Self {
        self.maxiter = maxiter;
        self
    }

    /// Set convergence tolerance.
    #[must_use]
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Set trust region parameters.
    #[must_use]
    pub fn with_trust_region(mut self, rhobeg: f64, rhoend: f64) -> Self {
        self.rhobeg = rhobeg;
        self.rhoend = rhoend;
        self
    }
}

/// Points and values of the working simplex.
struct Simplex {
    points: Vec<Vec<f64>>,
    values: Vec<f64>,
}

impl Simplex {
    /// Build `base` plus one point displaced by `rho` along each axis.
    fn around<F, E>(
        base: Vec<f64>,
        f_base: f64,
        rho: f64,
        objective: &mut F,
        evaluations: &mut usize,
    ) -> Result<Self, E>
    where
        F: FnMut(&[f64]) -> Result<f64, E>,
    {
        let n = base.len();
        let mut points = Vec::with_capacity(n + 1);
        let mut values = Vec::with_capacity(n + 1);
        for i in 0..n {
            let mut point = base.clone();
            point[i] += rho;
            values.push(objective(&point)?);
            *evaluations += 1;
            points.push(point);
        }
        points.insert(0, base);
        values.insert(0, f_base);
        Ok(Self { points, values })
    }
}

impl Optimizer for Cobyla {
    #[allow(clippy::cast_precision_loss)]
    fn minimize<F, E>(
        &self,
        mut objective: F,
        initial_params: Vec<f64>,
    ) -> Result<OptimizationResult, E>
    where
        F: FnMut(&[f64]) -> Result<f64, E>,
    {
        let n = initial_params.len();
        let mut f_best = objective(&initial_params)?;
        let mut history = vec![f_best];
        let mut num_evaluations = 1;

        if n == 0 {
            return Ok(OptimizationResult {
                optimal_params: initial_params,
                optimal_value: f_best,
                num_evaluations,
                num_iterations: 0,
                history,
                converged: true,
            });
        }

        let mut rho = self.rhobeg;
        let mut s = Simplex::around(
            initial_params,
            f_best,
            rho,
            &mut objective,
            &mut num_evaluations,
        )?;
        record_improvement(&s.values, &mut f_best, &mut history);
        let mut converged = false;
        let mut num_iterations = 0;

        for _ in 0..self.maxiter {
            num_iterations += 1;

            let mut order: Vec<usize> = (0..=n).collect();
            order.sort_by(|&a, &b| s.values[a].total_cmp(&s.values[b]));
            let best = order[0];
            let second_worst = order[n - 1];
            let worst = order[n];

            let spread = s.values[worst] - s.values[best];
            if spread < self.tol && rho <= self.rhoend {
                converged = true;
                break;
            }

            if spread < self.tol {
                rho = (rho * 0.5).max(self.rhoend);
                let base = s.points[best].clone();
                let f_base = s.values[best];
                s = Simplex::around(base, f_base, rho, &mut objective, &mut num_evaluations)?;
                record_improvement(&s.values, &mut f_best, &mut history);
                continue;
            }

            let mut centroid = vec![0.0; n];
            for &idx in &order[..n] {
                for (c, x) in centroid.iter_mut().zip(&s.points[idx]) {
                    *c += x;
                }
            }
            for c in &mut centroid {
                *c /= n as f64;
            }

            // Reflection, clipped to the trust radius.
            let reflected: Vec<f64> = centroid
                .iter()
                .zip(&s.points[worst])
                .map(|(c, w)| {
                    let step = c - w;
                    c + step.clamp(-rho, rho)
                })
                .collect();
            let f_reflected = objective(&reflected)?;
            num_evaluations += 1;

            if f_reflected < s.values[best] {
                let expanded: Vec<f64> = centroid
                    .iter()
                    .zip(&reflected)
                    .map(|(c, r)| c + 2.0 * (r - c))
                    .collect();
                let f_expanded = objective(&expanded)?;
                num_evaluations += 1;

                if f_expanded < f_reflected {
                    s.points[worst] = expanded;
                    s.values[worst] = f_expanded;
                } else {
                    s.points[worst] = reflected;
                    s.values[worst] = f_reflected;
                }
            } else if f_reflected < s.values[second_worst] {
                s.points[worst] = reflected;
                s.values[worst] = f_reflected;
            } else {
                let contracted: Vec<f64> = centroid
                    .iter()
                    .zip(&s.points[worst])
                    .map(|(c, w)| 0.5 * (c + w))
                    .collect();
                let f_contracted = objective(&contracted)?;
                num_evaluations += 1;

                if f_contracted < s.values[worst] {
                    s.points[worst] = contracted;
                    s.values[worst] = f_contracted;
                } else {
                    // Shrink towards the best vertex.
                    let anchor = s.points[best].clone();
                    for i in (0..=n).filter(|&i| i != best) {
                        for (x, a) in s.points[i].iter_mut().zip(&anchor) {
                            *x = 0.5 * (a + *x);
                        }
                        s.values[i] = objective(&s.points[i])?;
                        num_evaluations += 1;
                    }
                }
            }

            record_improvement(&s.values, &mut f_best, &mut history);
        }

        let min_idx = argmin(&s.values);
        Ok(OptimizationResult {
            optimal_params: s.points[min_idx].clone(),
            optimal_value: s.values[min_idx],
            num_evaluations,
            num_iterations,
            history,
            converged,
        })
    }
}

fn record_improvement(values: &[f64], f_best: &mut f64, history: &mut Vec<f64>) {
    let candidate = values[argmin(values)];
    if candidate < *f_best {
        *f_best = candidate;
        history.push(candidate);
    }
}
