//! Circuit executor contract.
//!
//! An executor turns a measured circuit into a count histogram. It may be
//! a simulator, a remote backend or a test double; this crate ships none.

use varq_ir::Circuit;

use crate::counts::Counts;
use crate::error::VqeResult;

/// Runs measured circuits.
///
/// Implementations must:
/// - return bitstrings of length `circuit.num_qubits()` with qubit 0 as the
///   rightmost character,
/// - return counts summing to `shots`,
/// - report failures as [`VqeError::Executor`](crate::VqeError::Executor).
///
/// Calls are sequential; `&self` allows interior state such as call
/// counters or a seeded RNG behind a `RefCell`/`Mutex`.
pub trait Executor {
    /// Execute `circuit` for `shots` shots.
    fn run(&self, circuit: &Circuit, shots: u64) -> VqeResult<Counts>;
}

impl<E: Executor + ?Sized> Executor for &E {
    fn run(&self, circuit: &Circuit, shots: u64) -> VqeResult<Counts> {
        (**self).run(circuit, shots)
    }
}

impl<E: Executor + ?Sized> Executor for Box<E> {
    fn run(&self, circuit: &Circuit, shots: u64) -> VqeResult<Counts> {
        (**self).run(circuit, shots)
    }
}
