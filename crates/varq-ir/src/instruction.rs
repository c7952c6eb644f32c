//! One step of a circuit: a gate, a measurement or a barrier.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::qubit::{ClbitId, QubitId};

/// What an [`Instruction`] does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InstructionKind {
    /// Unitary gate on `qubits`.
    Gate(StandardGate),
    /// Z-basis readout of `qubits[i]` into `clbits[i]`.
    Measure,
    /// Alignment point; no effect on the state.
    Barrier,
}

/// An operation together with the wires it acts on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// The operation.
    pub kind: InstructionKind,
    /// Qubit operands, in gate argument order (control first for CX/CZ).
    pub qubits: Vec<QubitId>,
    /// Classical targets; non-empty only for measurements.
    pub clbits: Vec<ClbitId>,
}

impl Instruction {
    /// A gate on the given qubits. Arity is checked by [`Instruction::check_operands`].
    pub fn gate(gate: StandardGate, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind: InstructionKind::Gate(gate),
            qubits: qubits.into_iter().collect(),
            clbits: Vec::new(),
        }
    }

    /// Read `qubit` into `clbit`.
    pub fn measure(qubit: QubitId, clbit: ClbitId) -> Self {
        Self {
            kind: InstructionKind::Measure,
            qubits: vec![qubit],
            clbits: vec![clbit],
        }
    }

    /// Barrier across `qubits`.
    pub fn barrier(qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind: InstructionKind::Barrier,
            qubits: qubits.into_iter().collect(),
            clbits: Vec::new(),
        }
    }

    pub fn is_gate(&self) -> bool {
        matches!(self.kind, InstructionKind::Gate(_))
    }

    pub fn is_measure(&self) -> bool {
        matches!(self.kind, InstructionKind::Measure)
    }

    pub fn is_barrier(&self) -> bool {
        matches!(self.kind, InstructionKind::Barrier)
    }

    /// The gate, if this is one.
    pub fn as_gate(&self) -> Option<&StandardGate> {
        match &self.kind {
            InstructionKind::Gate(g) => Some(g),
            _ => None,
        }
    }

    /// `(qubit, clbit)` pairs written by a measurement; empty otherwise.
    pub fn readouts(&self) -> impl Iterator<Item = (QubitId, ClbitId)> + '_ {
        let pairs = if self.is_measure() { self.qubits.len() } else { 0 };
        self.qubits
            .iter()
            .copied()
            .zip(self.clbits.iter().copied())
            .take(pairs)
    }

    /// Validate operand counts independently of any circuit.
    ///
    /// Range and duplicate checks need the circuit and live in
    /// `Circuit::apply`.
    pub fn check_operands(&self) -> IrResult<()> {
        match &self.kind {
            InstructionKind::Gate(gate) => {
                let got = self.qubits.len() as u32;
                if got != gate.num_qubits() {
                    return Err(IrError::QubitCountMismatch {
                        gate_name: gate.name().to_string(),
                        expected: gate.num_qubits(),
                        got,
                    });
                }
            }
            InstructionKind::Measure => {
                if self.qubits.len() != self.clbits.len() {
                    return Err(IrError::InvalidMeasurement(format!(
                        "{} qubits but {} clbits",
                        self.qubits.len(),
                        self.clbits.len()
                    )));
                }
            }
            InstructionKind::Barrier => {}
        }
        Ok(())
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |ids: Vec<String>| ids.join(", ");
        let qubits = join(self.qubits.iter().map(ToString::to_string).collect());
        match &self.kind {
            InstructionKind::Gate(g) => write!(f, "{g} {qubits}"),
            InstructionKind::Measure => {
                let clbits = join(self.clbits.iter().map(ToString::to_string).collect());
                write!(f, "measure {qubits} -> {clbits}")
            }
            InstructionKind::Barrier => write!(f, "barrier {qubits}"),
        }
    }
}
