//! Test executors.
//!
//! `SampledStateExecutor` is a small dense reference sampler for the gate
//! set of `varq-ir`, used only to drive the loop in tests. It counts calls
//! and draws shots from a seeded RNG so results are reproducible.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};

use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use varq_ir::{Circuit, InstructionKind, StandardGate};
use varq_vqe::{Counts, Executor, VqeError, VqeResult};

pub const H2_4Q: &str = include_str!("../../../../molecules/h2_sto-3g_qubit_hamiltonian.json");

/// Samples measured circuits from their exact output distribution.
pub struct SampledStateExecutor {
    rng: RefCell<StdRng>,
    calls: Cell<usize>,
}

impl SampledStateExecutor {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl Executor for SampledStateExecutor {
    fn run(&self, circuit: &Circuit, shots: u64) -> VqeResult<Counts> {
        self.calls.set(self.calls.get() + 1);

        let n = circuit.num_qubits();
        if circuit.measured_qubits().len() != n {
            return Err(VqeError::Executor(format!(
                "expected all {n} qubits measured, got {}",
                circuit.measured_qubits().len()
            )));
        }

        let probabilities = probabilities(circuit);
        let mut rng = self.rng.borrow_mut();
        let mut counts = Counts::new();
        for _ in 0..shots {
            let r: f64 = rng.r#gen();
            let mut acc = 0.0;
            let mut outcome = probabilities.len() - 1;
            for (i, p) in probabilities.iter().enumerate() {
                acc += p;
                if r < acc {
                    outcome = i;
                    break;
                }
            }
            counts.insert(format!("{outcome:0n$b}"), 1);
        }
        Ok(counts)
    }
}

/// Output probabilities indexed by basis state, bit `q` of the index being
/// qubit `q`.
pub fn probabilities(circuit: &Circuit) -> Vec<f64> {
    state_vector(circuit).iter().map(Complex64::norm_sqr).collect()
}

/// Exact expectation of a Pauli string given as text, from the state
/// prepared by `circuit` (measurements ignored).
pub fn exact_expectation(circuit: &Circuit, term: &str) -> f64 {
    let mut rotated = circuit.clone();
    for (q, c) in term.chars().enumerate() {
        let qid = varq_ir::QubitId(q as u32);
        match c {
            'X' => {
                rotated.h(qid).unwrap();
            }
            'Y' => {
                rotated.sdg(qid).unwrap();
                rotated.h(qid).unwrap();
            }
            _ => {}
        }
    }
    let active: Vec<usize> = term
        .chars()
        .enumerate()
        .filter(|(_, c)| *c != 'I')
        .map(|(q, _)| q)
        .collect();
    probabilities(&rotated)
        .iter()
        .enumerate()
        .map(|(index, p)| {
            let ones = active.iter().filter(|&&q| index >> q & 1 == 1).count();
            if ones % 2 == 0 { *p } else { -p }
        })
        .sum()
}

fn state_vector(circuit: &Circuit) -> Vec<Complex64> {
    let n = circuit.num_qubits();
    let mut state = vec![Complex64::new(0.0, 0.0); 1 << n];
    state[0] = Complex64::new(1.0, 0.0);

    for inst in circuit.instructions() {
        let InstructionKind::Gate(gate) = inst.kind else {
            continue;
        };
        let q: Vec<usize> = inst.qubits.iter().map(|q| q.0 as usize).collect();
        match gate {
            StandardGate::CX => {
                for i in 0..state.len() {
                    if i >> q[0] & 1 == 1 && i >> q[1] & 1 == 0 {
                        state.swap(i, i | 1 << q[1]);
                    }
                }
            }
            StandardGate::CZ => {
                for (i, amp) in state.iter_mut().enumerate() {
                    if i >> q[0] & 1 == 1 && i >> q[1] & 1 == 1 {
                        *amp = -*amp;
                    }
                }
            }
            single => apply_single(&mut state, q[0], matrix(single)),
        }
    }
    state
}

fn apply_single(state: &mut [Complex64], qubit: usize, m: [[Complex64; 2]; 2]) {
    for i in 0..state.len() {
        if i >> qubit & 1 == 0 {
            let j = i | 1 << qubit;
            let (a, b) = (state[i], state[j]);
            state[i] = m[0][0] * a + m[0][1] * b;
            state[j] = m[1][0] * a + m[1][1] * b;
        }
    }
}

fn matrix(gate: StandardGate) -> [[Complex64; 2]; 2] {
    let c = |re: f64, im: f64| Complex64::new(re, im);
    let h = std::f64::consts::FRAC_1_SQRT_2;
    match gate {
        StandardGate::X => [[c(0., 0.), c(1., 0.)], [c(1., 0.), c(0., 0.)]],
        StandardGate::Y => [[c(0., 0.), c(0., -1.)], [c(0., 1.), c(0., 0.)]],
        StandardGate::Z => [[c(1., 0.), c(0., 0.)], [c(0., 0.), c(-1., 0.)]],
        StandardGate::H => [[c(h, 0.), c(h, 0.)], [c(h, 0.), c(-h, 0.)]],
        StandardGate::S => [[c(1., 0.), c(0., 0.)], [c(0., 0.), c(0., 1.)]],
        StandardGate::Sdg => [[c(1., 0.), c(0., 0.)], [c(0., 0.), c(0., -1.)]],
        StandardGate::Rx(t) => {
            let (s, co) = (t / 2.0).sin_cos();
            [[c(co, 0.), c(0., -s)], [c(0., -s), c(co, 0.)]]
        }
        StandardGate::Ry(t) => {
            let (s, co) = (t / 2.0).sin_cos();
            [[c(co, 0.), c(-s, 0.)], [c(s, 0.), c(co, 0.)]]
        }
        StandardGate::Rz(t) => {
            let (s, co) = (t / 2.0).sin_cos();
            [[c(co, -s), c(0., 0.)], [c(0., 0.), c(co, s)]]
        }
        StandardGate::CX | StandardGate::CZ => unreachable!("two-qubit gate"),
    }
}

/// Wraps an executor and counts calls.
pub struct CountingExecutor<E> {
    pub inner: E,
    pub calls: Cell<usize>,
}

impl<E: Executor> CountingExecutor<E> {
    pub fn new(inner: E) -> Self {
        Self {
            inner,
            calls: Cell::new(0),
        }
    }
}

impl<E: Executor> Executor for CountingExecutor<E> {
    fn run(&self, circuit: &Circuit, shots: u64) -> VqeResult<Counts> {
        self.calls.set(self.calls.get() + 1);
        self.inner.run(circuit, shots)
    }
}

/// Fails on every call.
pub struct FailingExecutor;

impl Executor for FailingExecutor {
    fn run(&self, _circuit: &Circuit, _shots: u64) -> VqeResult<Counts> {
        Err(VqeError::Executor("backend offline".into()))
    }
}
