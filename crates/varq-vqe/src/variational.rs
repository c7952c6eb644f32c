//! Variational eigensolver loop.
//!
//! The loop hands the optimizer an objective that builds the ansatz
//! circuit for a parameter vector, evaluates its energy and records the
//! result in a [`ConvergenceTrace`]. Energies are noisy, so the best
//! energy seen anywhere along the trajectory is kept separately from the
//! optimizer's own answer.

use std::time::{Duration, Instant};

use tracing::{debug, info};
use varq_ir::Circuit;

use crate::ansatz::Ansatz;
use crate::energy::{DEFAULT_SHOTS, EnergyEvaluator};
use crate::error::{VqeError, VqeResult};
use crate::executor::Executor;
use crate::grouping::{GreedyGrouping, GroupingStrategy};
use crate::hamiltonian::Hamiltonian;
use crate::optimizer::{OptimizationResult, Optimizer};

/// One energy evaluation, in visit order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TracePoint {
    /// Zero-based evaluation index.
    pub iteration: usize,
    /// Estimated energy.
    pub energy: f64,
}

/// Lowest energy observed so far and where it was observed.
#[derive(Debug, Clone, PartialEq)]
pub struct BestSoFar {
    /// Lowest estimated energy.
    pub energy: f64,
    /// Evaluation index that produced it.
    pub iteration: usize,
    /// Parameters that produced it.
    pub params: Vec<f64>,
    /// Bound ansatz circuit that produced it.
    pub circuit: Circuit,
}

/// Append-only record of every evaluation plus the best-so-far.
///
/// `best` is replaced only on a strictly lower energy, so it always equals
/// the minimum of the trace and points at the first evaluation reaching it.
#[derive(Debug, Clone, Default)]
pub struct ConvergenceTrace {
    points: Vec<TracePoint>,
    best: Option<BestSoFar>,
}

impl ConvergenceTrace {
    /// Create an empty trace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an evaluation. Returns `true` if it became the new best.
    pub fn record(&mut self, energy: f64, params: &[f64], circuit: &Circuit) -> bool {
        let iteration = self.points.len();
        self.points.push(TracePoint { iteration, energy });

        let improved = self.best.as_ref().is_none_or(|b| energy < b.energy);
        if improved {
            self.best = Some(BestSoFar {
                energy,
                iteration,
                params: params.to_vec(),
                circuit: circuit.clone(),
            });
        }
        improved
    }

    /// Evaluations in visit order.
    pub fn points(&self) -> &[TracePoint] {
        &self.points
    }

    /// Energies in visit order.
    pub fn energies(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.energy).collect()
    }

    /// Running minimum of the energies.
    pub fn running_minimum(&self) -> Vec<f64> {
        self.points
            .iter()
            .scan(f64::INFINITY, |min, p| {
                *min = min.min(p.energy);
                Some(*min)
            })
            .collect()
    }

    /// The best evaluation, if any.
    pub fn best(&self) -> Option<&BestSoFar> {
        self.best.as_ref()
    }

    /// Number of evaluations.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether nothing was evaluated.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The optimizer reported convergence.
    Converged,
    /// The optimizer exhausted its iterations without converging.
    IterationBudget,
    /// The loop's evaluation ceiling was reached.
    EvaluationBudget,
    /// The loop's wall-clock limit was reached.
    TimeLimit,
}

impl std::fmt::Display for Termination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Termination::Converged => "converged",
            Termination::IterationBudget => "iteration budget exhausted",
            Termination::EvaluationBudget => "evaluation budget exhausted",
            Termination::TimeLimit => "time limit reached",
        };
        f.write_str(s)
    }
}

/// What the optimizer itself returned.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizerReport {
    /// Parameters the optimizer settled on.
    pub params: Vec<f64>,
    /// Objective value at those parameters.
    pub value: f64,
    /// Whether the optimizer reported convergence.
    pub converged: bool,
    /// Objective evaluations spent.
    pub evaluations: usize,
}

/// Result of a variational run.
#[derive(Debug, Clone)]
pub struct VqeOutcome {
    /// The optimizer's answer, or the best-so-far if the loop stopped it.
    pub optimizer: OptimizerReport,
    /// Every evaluation in visit order.
    pub trace: ConvergenceTrace,
    /// Lowest energy observed.
    pub best: BestSoFar,
    /// Why the run stopped.
    pub termination: Termination,
}

impl VqeOutcome {
    /// Lowest energy observed.
    pub fn energy(&self) -> f64 {
        self.best.energy
    }
}

enum Halt {
    Failed(VqeError),
    Stopped(Termination),
}

/// Drives an optimizer over the energy of an ansatz.
pub struct VariationalLoop<'a, A: ?Sized, E: ?Sized, O, S = GreedyGrouping> {
    hamiltonian: &'a Hamiltonian,
    ansatz: &'a A,
    executor: &'a E,
    optimizer: &'a O,
    strategy: S,
    shots: u64,
    max_evaluations: Option<usize>,
    time_limit: Option<Duration>,
}

impl<'a, A, E, O> VariationalLoop<'a, A, E, O>
where
    A: Ansatz + ?Sized,
    E: Executor + ?Sized,
    O: Optimizer,
{
    /// Create a loop with greedy grouping, default shots and no ceilings.
    pub fn new(
        hamiltonian: &'a Hamiltonian,
        ansatz: &'a A,
        executor: &'a E,
        optimizer: &'a O,
    ) -> Self {
        Self {
            hamiltonian,
            ansatz,
            executor,
            optimizer,
            strategy: GreedyGrouping,
            shots: DEFAULT_SHOTS,
            max_evaluations: None,
            time_limit: None,
        }
    }
}

impl<'a, A, E, O, S> VariationalLoop<'a, A, E, O, S>
where
    A: Ansatz + ?Sized,
    E: Executor + ?Sized,
    O: Optimizer,
    S: GroupingStrategy,
{
    /// Set shots per measured group.
    #[must_use]
    pub fn with_shots(mut self, shots: u64) -> Self {
        self.shots = shots;
        self
    }

    /// Replace the grouping strategy.
    pub fn with_strategy<T: GroupingStrategy>(
        self,
        strategy: T,
    ) -> VariationalLoop<'a, A, E, O, T> {
        VariationalLoop {
            hamiltonian: self.hamiltonian,
            ansatz: self.ansatz,
            executor: self.executor,
            optimizer: self.optimizer,
            strategy,
            shots: self.shots,
            max_evaluations: self.max_evaluations,
            time_limit: self.time_limit,
        }
    }

    /// Stop after this many energy evaluations. At least one always runs.
    #[must_use]
    pub fn with_max_evaluations(mut self, max: usize) -> Self {
        self.max_evaluations = Some(max);
        self
    }

    /// Stop once this much wall-clock time has elapsed. At least one
    /// evaluation always runs.
    #[must_use]
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Evaluate the energy at `params` and record it in `trace`.
    pub fn evaluate(&self, trace: &mut ConvergenceTrace, params: &[f64]) -> VqeResult<f64> {
        let circuit = self.ansatz.build(params)?;
        let estimate = EnergyEvaluator::new(self.hamiltonian, self.executor)
            .with_shots(self.shots)
            .with_strategy(&self.strategy)
            .evaluate(&circuit)?;

        let new_best = trace.record(estimate.energy, params, &circuit);
        info!(
            iteration = trace.len() - 1,
            energy = estimate.energy,
            new_best,
            executor_calls = estimate.executor_calls,
            "variational step"
        );
        Ok(estimate.energy)
    }

    /// Run the optimizer from `initial_params` until it stops or a loop
    /// ceiling fires.
    pub fn run(&self, initial_params: Vec<f64>) -> VqeResult<VqeOutcome> {
        let expected = self.ansatz.num_parameters();
        if initial_params.len() != expected {
            return Err(VqeError::ParameterCountMismatch {
                expected,
                got: initial_params.len(),
            });
        }

        debug!(
            n_qubits = self.hamiltonian.num_qubits(),
            terms = self.hamiltonian.num_terms(),
            parameters = expected,
            shots = self.shots,
            strategy = self.strategy.name(),
            "starting variational run"
        );

        let start = Instant::now();
        let mut trace = ConvergenceTrace::new();

        let result = self.optimizer.minimize(
            |params| {
                if let Some(stop) = self.ceiling(&trace, start) {
                    return Err(Halt::Stopped(stop));
                }
                self.evaluate(&mut trace, params).map_err(Halt::Failed)
            },
            initial_params,
        );

        let (optimizer, termination) = match result {
            Ok(OptimizationResult {
                optimal_params,
                optimal_value,
                num_evaluations,
                converged,
                ..
            }) => (
                OptimizerReport {
                    params: optimal_params,
                    value: optimal_value,
                    converged,
                    evaluations: num_evaluations,
                },
                if converged {
                    Termination::Converged
                } else {
                    Termination::IterationBudget
                },
            ),
            Err(Halt::Failed(e)) => return Err(e),
            Err(Halt::Stopped(termination)) => {
                let best = trace.best().ok_or(VqeError::NoEvaluations)?;
                (
                    OptimizerReport {
                        params: best.params.clone(),
                        value: best.energy,
                        converged: false,
                        evaluations: trace.len(),
                    },
                    termination,
                )
            }
        };

        let best = trace.best().cloned().ok_or(VqeError::NoEvaluations)?;
        info!(
            energy = best.energy,
            best_iteration = best.iteration,
            evaluations = trace.len(),
            %termination,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "variational run finished"
        );

        Ok(VqeOutcome {
            optimizer,
            trace,
            best,
            termination,
        })
    }

    fn ceiling(&self, trace: &ConvergenceTrace, start: Instant) -> Option<Termination> {
        if trace.is_empty() {
            return None;
        }
        if self.max_evaluations.is_some_and(|max| trace.len() >= max) {
            return Some(Termination::EvaluationBudget);
        }
        if self.time_limit.is_some_and(|limit| start.elapsed() >= limit) {
            return Some(Termination::TimeLimit);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn circuit() -> Circuit {
        Circuit::with_size("c", 1, 0)
    }

    #[test]
    fn test_trace_keeps_first_strict_minimum() {
        let mut trace = ConvergenceTrace::new();
        assert!(trace.record(1.0, &[0.0], &circuit()));
        assert!(trace.record(0.5, &[1.0], &circuit()));
        assert!(!trace.record(0.5, &[2.0], &circuit()));
        assert!(!trace.record(0.7, &[3.0], &circuit()));

        let best = trace.best().unwrap();
        assert_eq!(best.energy, 0.5);
        assert_eq!(best.iteration, 1);
        assert_eq!(best.params, vec![1.0]);
        assert_eq!(trace.running_minimum(), vec![1.0, 0.5, 0.5, 0.5]);
        assert_eq!(trace.energies(), vec![1.0, 0.5, 0.5, 0.7]);
    }

    #[test]
    fn test_termination_display() {
        assert_eq!(Termination::TimeLimit.to_string(), "time limit reached");
    }
}
