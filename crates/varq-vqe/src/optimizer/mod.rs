//! Derivative-free classical optimizers.
//!
//! Objectives are fallible: an `Err` from the objective aborts the run and
//! is returned unchanged from [`Optimizer::minimize`]. Callers use this to
//! propagate executor failures and to stop a run early.

mod cobyla;
mod spsa;

pub use cobyla::Cobyla;
pub use spsa::Spsa;

/// Result of an optimization run.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationResult {
    /// Optimal parameter values.
    pub optimal_params: Vec<f64>,
    /// Optimal objective value.
    pub optimal_value: f64,
    /// Number of function evaluations.
    pub num_evaluations: usize,
    /// Number of iterations.
    pub num_iterations: usize,
    /// Best objective value after each improving iteration.
    pub history: Vec<f64>,
    /// Whether the optimization converged.
    pub converged: bool,
}

/// A minimizer over a scalar objective.
pub trait Optimizer {
    /// Minimize `objective` starting from `initial_params`.
    fn minimize<F, E>(
        &self,
        objective: F,
        initial_params: Vec<f64>,
    ) -> Result<OptimizationResult, E>
    where
        F: FnMut(&[f64]) -> Result<f64, E>;
}

impl<O: Optimizer + ?Sized> Optimizer for &O {
    fn minimize<F, E>(
        &self,
        objective: F,
        initial_params: Vec<f64>,
    ) -> Result<OptimizationResult, E>
    where
        F: FnMut(&[f64]) -> Result<f64, E>,
    {
        (**self).minimize(objective, initial_params)
    }
}

/// Either built-in optimizer, selected at runtime from configuration.
#[derive(Debug, Clone)]
pub enum AnyOptimizer {
    /// Trust-region simplex.
    Cobyla(Cobyla),
    /// Simultaneous perturbation.
    Spsa(Spsa),
}

impl AnyOptimizer {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            AnyOptimizer::Cobyla(_) => "cobyla",
            AnyOptimizer::Spsa(_) => "spsa",
        }
    }
}

impl Optimizer for AnyOptimizer {
    fn minimize<F, E>(
        &self,
        objective: F,
        initial_params: Vec<f64>,
    ) -> Result<OptimizationResult, E>
    where
        F: FnMut(&[f64]) -> Result<f64, E>,
    {
        match self {
            AnyOptimizer::Cobyla(o) => o.minimize(objective, initial_params),
            AnyOptimizer::Spsa(o) => o.minimize(objective, initial_params),
        }
    }
}

/// Index of the smallest value under `f64::total_cmp`.
pub(crate) fn argmin(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .map_or(0, |(i, _)| i)
}
