//! `varq-vqe`: ground-state energy estimation for qubit Hamiltonians.
//!
//! Two routes to the lowest eigenvalue of a weighted sum of Pauli strings:
//!
//! - **Exact**: dense diagonalization ([`ExactSolver`]) for small systems.
//! - **Variational**: a hybrid loop ([`VariationalLoop`]) in which a
//!   classical optimizer tunes the parameters of an [`Ansatz`] circuit
//!   while an [`Executor`] samples it. Each energy evaluation groups
//!   terms by measurement basis so a single histogram serves every term
//!   in the group.
//!
//! Executors are supplied by the caller; this crate does not simulate
//! circuits.
//!
//! # Quick start
//!
//! ```rust
//! use varq_vqe::{ExactSolver, GreedyGrouping, GroupingStrategy, Hamiltonian};
//!
//! let h = Hamiltonian::new([("II", -1.0), ("ZZ", 0.5), ("ZI", 0.2), ("XX", 0.1)]).unwrap();
//!
//! let e0 = ExactSolver::new().ground_state_energy(&h).unwrap();
//! assert!(e0 < h.constant_offset());
//!
//! // II is free, ZZ and ZI share a basis, XX needs its own.
//! let plan = GreedyGrouping.group(&h.pauli_strings());
//! assert_eq!(plan.num_measured_groups(), 2);
//! ```

pub mod ansatz;
pub mod config;
pub mod counts;
pub mod energy;
pub mod error;
pub mod estimator;
pub mod exact;
pub mod executor;
pub mod grouping;
pub mod hamiltonian;
pub mod molecule;
pub mod optimizer;
pub mod variational;

pub use ansatz::{Ansatz, TwoLocal};
pub use config::{ConfigError, OptimizerKind, VqeConfig};
pub use counts::Counts;
pub use energy::{EnergyEstimate, EnergyEvaluator};
pub use error::{VqeError, VqeResult};
pub use estimator::{expectation_value, expectation_value_str};
pub use exact::ExactSolver;
pub use executor::Executor;
pub use grouping::{
    GreedyGrouping, GroupingStrategy, IndividualGrouping, MeasurementGroup, MeasurementPlan,
};
pub use hamiltonian::{Hamiltonian, Pauli, PauliString};
pub use molecule::MoleculeDocument;
pub use optimizer::{AnyOptimizer, Cobyla, OptimizationResult, Optimizer, Spsa};
pub use variational::{
    BestSoFar, ConvergenceTrace, OptimizerReport, Termination, TracePoint, VariationalLoop,
    VqeOutcome,
};
