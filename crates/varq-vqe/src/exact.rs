//! Exact ground-state energy by dense diagonalization.
//!
//! Each term is expanded into its 2ⁿ×2ⁿ matrix as the Kronecker product of
//! its single-qubit Paulis in string order, the weighted sum is formed and
//! its Hermitian eigenvalues are computed. Cost grows as O(2^(3n)), so the
//! solver refuses Hamiltonians above a qubit ceiling.

use nalgebra::DMatrix;
use num_complex::Complex64;
use tracing::{debug, warn};

use crate::error::{VqeError, VqeResult};
use crate::hamiltonian::{Hamiltonian, Pauli, PauliString};

/// Default qubit ceiling for dense diagonalization.
pub const DEFAULT_MAX_QUBITS: usize = 12;

/// Dense exact solver.
#[derive(Debug, Clone, Copy)]
pub struct ExactSolver {
    max_qubits: usize,
}

impl Default for ExactSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ExactSolver {
    /// Create a solver with the default qubit ceiling.
    pub fn new() -> Self {
        Self {
            max_qubits: DEFAULT_MAX_QUBITS,
        }
    }

    /// Set the qubit ceiling.
    #[must_use]
    pub fn with_max_qubits(mut self, limit: usize) -> Self {
        self.max_qubits = limit;
        self
    }

    /// Configured qubit ceiling.
    pub fn max_qubits(&self) -> usize {
        self.max_qubits
    }

    /// The dense matrix `Σ c_t · M(t)`.
    pub fn matrix(&self, hamiltonian: &Hamiltonian) -> VqeResult<DMatrix<Complex64>> {
        let n = hamiltonian.num_qubits();
        if n > self.max_qubits {
            warn!(
                n_qubits = n,
                limit = self.max_qubits,
                "exact diagonalization refused above qubit ceiling"
            );
            return Err(VqeError::QubitLimitExceeded {
                n_qubits: n,
                limit: self.max_qubits,
            });
        }

        let dim = 1usize << n;
        let mut h = DMatrix::<Complex64>::zeros(dim, dim);
        for (term, coefficient) in hamiltonian.iter() {
            h += pauli_string_matrix(term) * Complex64::new(coefficient, 0.0);
        }
        Ok(h)
    }

    /// All eigenvalues in ascending order.
    pub fn eigenvalues(&self, hamiltonian: &Hamiltonian) -> VqeResult<Vec<f64>> {
        let h = self.matrix(hamiltonian)?;
        let mut values: Vec<f64> = h.symmetric_eigenvalues().iter().copied().collect();
        values.sort_by(f64::total_cmp);
        debug!(
            n_qubits = hamiltonian.num_qubits(),
            terms = hamiltonian.num_terms(),
            dim = values.len(),
            "diagonalized Hamiltonian"
        );
        Ok(values)
    }

    /// Smallest eigenvalue.
    pub fn ground_state_energy(&self, hamiltonian: &Hamiltonian) -> VqeResult<f64> {
        let values = self.eigenvalues(hamiltonian)?;
        values.first().copied().ok_or(VqeError::EmptyHamiltonian)
    }
}

/// The 2×2 matrix of a single Pauli operator.
pub fn pauli_matrix(p: Pauli) -> DMatrix<Complex64> {
    let zero = Complex64::new(0.0, 0.0);
    let one = Complex64::new(1.0, 0.0);
    let i = Complex64::new(0.0, 1.0);
    match p {
        Pauli::I => DMatrix::from_row_slice(2, 2, &[one, zero, zero, one]),
        Pauli::X => DMatrix::from_row_slice(2, 2, &[zero, one, one, zero]),
        Pauli::Y => DMatrix::from_row_slice(2, 2, &[zero, -i, i, zero]),
        Pauli::Z => DMatrix::from_row_slice(2, 2, &[one, zero, zero, -one]),
    }
}

/// Kronecker product of a term's Paulis, left to right.
pub fn pauli_string_matrix(term: &PauliString) -> DMatrix<Complex64> {
    term.symbols()
        .iter()
        .fold(DMatrix::identity(1, 1), |acc, p| acc.kronecker(&pauli_matrix(*p)))
}
