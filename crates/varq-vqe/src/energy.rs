//! Energy of a prepared state.
//!
//! For one circuit the evaluator builds a measurement plan, runs the
//! executor once per non-trivial group and estimates every member term
//! from that group's shared histogram.

use tracing::{debug, trace};
use varq_ir::Circuit;

use crate::error::{VqeError, VqeResult};
use crate::estimator::expectation_value;
use crate::executor::Executor;
use crate::grouping::{GreedyGrouping, GroupingStrategy};
use crate::hamiltonian::Hamiltonian;

/// Default shot count per measured group.
pub const DEFAULT_SHOTS: u64 = 500;

/// Result of one energy evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyEstimate {
    /// Σ coefficient · expectation.
    pub energy: f64,
    /// Per-term expectation values, in Hamiltonian order.
    pub expectations: Vec<f64>,
    /// Number of executor invocations.
    pub executor_calls: usize,
}

/// Evaluates `<H>` on circuits through an executor.
pub struct EnergyEvaluator<'a, E: ?Sized, S = GreedyGrouping> {
    hamiltonian: &'a Hamiltonian,
    executor: &'a E,
    strategy: S,
    shots: u64,
}

impl<'a, E: Executor + ?Sized> EnergyEvaluator<'a, E> {
    /// Create an evaluator with greedy grouping and the default shot count.
    pub fn new(hamiltonian: &'a Hamiltonian, executor: &'a E) -> Self {
        Self {
            hamiltonian,
            executor,
            strategy: GreedyGrouping,
            shots: DEFAULT_SHOTS,
        }
    }
}

impl<'a, E: Executor + ?Sized, S: GroupingStrategy> EnergyEvaluator<'a, E, S> {
    /// Set shots per measured group.
    #[must_use]
    pub fn with_shots(mut self, shots: u64) -> Self {
        self.shots = shots;
        self
    }

    /// Replace the grouping strategy.
    pub fn with_strategy<T: GroupingStrategy>(self, strategy: T) -> EnergyEvaluator<'a, E, T> {
        EnergyEvaluator {
            hamiltonian: self.hamiltonian,
            executor: self.executor,
            strategy,
            shots: self.shots,
        }
    }

    /// Shots per measured group.
    pub fn shots(&self) -> u64 {
        self.shots
    }

    /// The Hamiltonian being evaluated.
    pub fn hamiltonian(&self) -> &Hamiltonian {
        self.hamiltonian
    }

    /// Estimate the energy of the state prepared by `circuit`.
    ///
    /// `circuit` must not contain measurements; each measured group works
    /// on its own copy.
    pub fn evaluate(&self, circuit: &Circuit) -> VqeResult<EnergyEstimate> {
        let n = self.hamiltonian.num_qubits();
        if circuit.num_qubits() != n {
            return Err(VqeError::CircuitWidthMismatch {
                circuit_qubits: circuit.num_qubits(),
                hamiltonian_qubits: n,
            });
        }

        let terms = self.hamiltonian.pauli_strings();
        let plan = self.strategy.group(&terms);

        let mut expectations = vec![0.0; terms.len()];
        let mut executor_calls = 0;

        for (g, group) in plan.groups().iter().enumerate() {
            if group.is_trivial() {
                for &t in group.members() {
                    expectations[t] = 1.0;
                }
                continue;
            }

            let mut measured = circuit.clone();
            group.append_measurement(&mut measured)?;

            let counts = self.executor.run(&measured, self.shots)?;
            executor_calls += 1;

            let got = counts.total_shots();
            if got != self.shots {
                return Err(VqeError::ShotCountMismatch {
                    expected: self.shots,
                    got,
                });
            }

            for &t in group.members() {
                expectations[t] = expectation_value(&terms[t], &counts)?;
            }
            trace!(
                group = g,
                base = %group.base(),
                members = group.members().len(),
                outcomes = counts.len(),
                "measured group"
            );
        }

        let energy: f64 = self
            .hamiltonian
            .iter()
            .zip(&expectations)
            .map(|((_, c), e)| c * e)
            .sum();

        debug!(
            energy,
            executor_calls,
            groups = plan.num_groups(),
            shots = self.shots,
            "evaluated energy"
        );

        Ok(EnergyEstimate {
            energy,
            expectations,
            executor_calls,
        })
    }
}
