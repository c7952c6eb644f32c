//! SPSA (Simultaneous Perturbation Stochastic Approximation) optimizer.
//!
//! Estimates the gradient from two objective evaluations along a random
//! ±1 direction per iteration, independent of the parameter count.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{OptimizationResult, Optimizer};

/// SPSA optimizer configuration.
#[derive(Debug, Clone)]
pub struct Spsa {
    /// Maximum number of iterations.
    pub maxiter: usize,
    /// Initial step size.
    pub a: f64,
    /// Initial perturbation size.
    pub c: f64,
    /// Learning rate decay exponent.
    pub alpha: f64,
    /// Perturbation decay exponent.
    pub gamma: f64,
    /// Stop once every parameter update is smaller than this.
    pub tol: f64,
    /// Seed for the perturbation directions.
    pub seed: u64,
}

impl Default for Spsa {
    fn default() -> Self {
        Self {
            maxiter: 2000,
            a: 0.1,
            c: 0.1,
            alpha: 0.602,
            gamma: 0.101,
            tol: 1e-6,
            seed: 42,
        }
    }
}

impl Spsa {
    /// Create a new SPSA optimizer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum iterations.
    #[must_use]
    pub fn with_maxiter(mut self, maxiter: usize) -> Self {
        self.maxiter = maxiter;
        self
    }

    /// Set the update-size tolerance.
    #[must_use]
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Set the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

impl Optimizer for Spsa {
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
        let mut rng = StdRng::seed_from_u64(self.seed);

        let mut x = initial_params;
        let mut best_x = x.clone();
        let mut best_f = objective(&x)?;
        let mut history = vec![best_f];
        let mut num_evaluations = 1;
        let mut num_iterations = 0;
        let mut converged = n == 0;

        while !converged && num_iterations < self.maxiter {
            let k = (num_iterations + 1) as f64;
            num_iterations += 1;
            let a_k = self.a / k.powf(self.alpha);
            let c_k = self.c / k.powf(self.gamma);

            let delta: Vec<f64> = (0..n)
                .map(|_| if rng.gen_bool(0.5) { 1.0 } else { -1.0 })
                .collect();

            let x_plus: Vec<f64> = x.iter().zip(&delta).map(|(xi, di)| xi + c_k * di).collect();
            let x_minus: Vec<f64> = x.iter().zip(&delta).map(|(xi, di)| xi - c_k * di).collect();

            let f_plus = objective(&x_plus)?;
            let f_minus = objective(&x_minus)?;
            num_evaluations += 2;

            let slope = (f_plus - f_minus) / (2.0 * c_k);
            let mut largest_step: f64 = 0.0;
            for (xi, di) in x.iter_mut().zip(&delta) {
                // 1/δᵢ = δᵢ for ±1 perturbations.
                let step = a_k * slope * di;
                *xi -= step;
                largest_step = largest_step.max(step.abs());
            }

            let f_x = objective(&x)?;
            num_evaluations += 1;
            if f_x < best_f {
                best_f = f_x;
                best_x.clone_from(&x);
                history.push(f_x);
            }

            converged = largest_step < self.tol;
        }

        Ok(OptimizationResult {
            optimal_params: best_x,
            optimal_value: best_f,
            num_evaluations,
            num_iterations,
            history,
            converged,
        })
    }
}
