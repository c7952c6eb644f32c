//! Parameterized state-preparation circuits.

use varq_ir::{Circuit, QubitId};

use crate::error::{VqeError, VqeResult};

/// A parameterized circuit family.
///
/// `build` must be deterministic and must not add measurements; qubit `i`
/// of the circuit is addressed by symbol `i` of every Pauli term.
pub trait Ansatz {
    /// Circuit width.
    fn num_qubits(&self) -> usize;

    /// Length of the parameter vector `build` expects.
    fn num_parameters(&self) -> usize;

    /// Bind `params` and return the circuit.
    fn build(&self, params: &[f64]) -> VqeResult<Circuit>;
}

impl<A: Ansatz + ?Sized> Ansatz for &A {
    fn num_qubits(&self) -> usize {
        (**self).num_qubits()
    }

    fn num_parameters(&self) -> usize {
        (**self).num_parameters()
    }

    fn build(&self, params: &[f64]) -> VqeResult<Circuit> {
        (**self).build(params)
    }
}

impl<A: Ansatz + ?Sized> Ansatz for Box<A> {
    fn num_qubits(&self) -> usize {
        (**self).num_qubits()
    }

    fn num_parameters(&self) -> usize {
        (**self).num_parameters()
    }

    fn build(&self, params: &[f64]) -> VqeResult<Circuit> {
        (**self).build(params)
    }
}

/// TwoLocal ansatz.
///
/// Alternates between:
/// - Rotation layers (RY on each qubit)
/// - Entanglement layers (CX between adjacent qubits, linear connectivity)
///
/// Total parameters = n_qubits * (reps + 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TwoLocal {
    n_qubits: usize,
    reps: usize,
}

impl TwoLocal {
    /// Create a TwoLocal ansatz.
    pub fn new(n_qubits: usize, reps: usize) -> Self {
        Self { n_qubits, reps }
    }

    /// Number of entangling repetitions.
    pub fn reps(&self) -> usize {
        self.reps
    }
}

impl Ansatz for TwoLocal {
    fn num_qubits(&self) -> usize {
        self.n_qubits
    }

    fn num_parameters(&self) -> usize {
        self.n_qubits * (self.reps + 1)
    }

    fn build(&self, params: &[f64]) -> VqeResult<Circuit> {
        let expected = self.num_parameters();
        if params.len() != expected {
            return Err(VqeError::ParameterCountMismatch {
                expected,
                got: params.len(),
            });
        }

        let n = self.n_qubits as u32;
        let mut circuit = Circuit::with_size("two_local", n, 0);
        let mut layers = params.chunks_exact(self.n_qubits.max(1));

        if let Some(layer) = layers.next() {
            rotation_layer(&mut circuit, layer)?;
        }
        for layer in layers {
            for q in 0..n.saturating_sub(1) {
                circuit.cx(QubitId(q), QubitId(q + 1))?;
            }
            rotation_layer(&mut circuit, layer)?;
        }

        Ok(circuit)
    }
}

fn rotation_layer(circuit: &mut Circuit, angles: &[f64]) -> VqeResult<()> {
    for (q, &theta) in angles.iter().enumerate() {
        circuit.ry(theta, QubitId(q as u32))?;
    }
    Ok(())
}
