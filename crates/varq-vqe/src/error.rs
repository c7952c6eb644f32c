//! Error types for the VQE crate.

use thiserror::Error;

/// Errors produced while building Hamiltonians, estimating energies and
/// running the variational loop.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VqeError {
    /// A Pauli term could not be parsed.
    #[error("Malformed Pauli term '{term}': {reason}")]
    MalformedTerm {
        /// The offending term text.
        term: String,
        /// Why the term was rejected.
        reason: String,
    },

    /// Hamiltonian contains no terms.
    #[error("Hamiltonian is empty")]
    EmptyHamiltonian,

    /// Dense diagonalization was requested above the configured ceiling.
    #[error("Exact solver limited to {limit} qubits, Hamiltonian has {n_qubits}")]
    QubitLimitExceeded {
        /// Qubit count of the Hamiltonian.
        n_qubits: usize,
        /// Configured ceiling.
        limit: usize,
    },

    /// A measured bitstring does not match the term length.
    #[error("Pauli term has {term_len} symbols but bitstring has {bitstring_len}")]
    PauliLengthMismatch {
        /// Number of symbols in the Pauli term.
        term_len: usize,
        /// Length of the offending bitstring.
        bitstring_len: usize,
    },

    /// A term symbol or bitstring character outside its alphabet.
    #[error("Invalid symbol '{symbol}' at position {position}")]
    InvalidSymbol {
        /// The offending character.
        symbol: char,
        /// Position in the string.
        position: usize,
    },

    /// A histogram with zero total shots was given for a non-trivial term.
    #[error("Histogram is empty, cannot estimate a non-identity term")]
    EmptyHistogram,

    /// The circuit width does not match the Hamiltonian qubit count.
    #[error("Circuit has {circuit_qubits} qubits but Hamiltonian acts on {hamiltonian_qubits}")]
    CircuitWidthMismatch {
        /// Qubits in the circuit.
        circuit_qubits: usize,
        /// Qubits addressed by the Hamiltonian.
        hamiltonian_qubits: usize,
    },

    /// The executor returned a histogram whose total differs from the request.
    #[error("Executor returned {got} shots, expected {expected}")]
    ShotCountMismatch {
        /// Requested shots.
        expected: u64,
        /// Sum of the returned counts.
        got: u64,
    },

    /// The executor failed.
    #[error("Executor error: {0}")]
    Executor(String),

    /// The ansatz failed to build a circuit.
    #[error("Ansatz error: {0}")]
    Ansatz(String),

    /// Parameter vector length does not match the ansatz.
    #[error("Ansatz expects {expected} parameters, got {got}")]
    ParameterCountMismatch {
        /// Parameters the ansatz requires.
        expected: usize,
        /// Parameters supplied.
        got: usize,
    },

    /// The optimizer finished without evaluating the objective.
    #[error("Optimizer returned without evaluating the energy")]
    NoEvaluations,

    /// Circuit builder returned an error.
    #[error("Circuit IR error: {0}")]
    Ir(#[from] varq_ir::IrError),
}

/// Result type for VQE operations.
pub type VqeResult<T> = Result<T, VqeError>;
