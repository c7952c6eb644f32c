//! Tests for expectation estimation and histogram reuse.

mod common;

use common::{SampledStateExecutor, exact_expectation};
use varq_ir::{Circuit, QubitId};
use varq_vqe::{
    Counts, EnergyEvaluator, GreedyGrouping, Hamiltonian, IndividualGrouping, PauliString,
    VqeError, expectation_value, expectation_value_str,
};

fn prepared_state() -> Circuit {
    let mut circuit = Circuit::with_size("prep", 2, 0);
    circuit.ry(0.9, QubitId(0)).unwrap();
    circuit.ry(-1.7, QubitId(1)).unwrap();
    circuit.cx(QubitId(0), QubitId(1)).unwrap();
    circuit
}

// ---------------------------------------------------------------------------
// Sign convention
// ---------------------------------------------------------------------------

#[test]
fn rightmost_bit_is_qubit_zero() {
    // qubit 0 measured 1, qubit 1 measured 0
    let counts = Counts::from_pairs([("01", 100u64)]);
    let z0 = PauliString::parse("ZI").unwrap();
    let z1 = PauliString::parse("IZ").unwrap();
    assert_eq!(expectation_value(&z0, &counts).unwrap(), -1.0);
    assert_eq!(expectation_value(&z1, &counts).unwrap(), 1.0);
}

#[test]
fn mixed_histogram() {
    let counts = Counts::from_pairs([("000", 250u64), ("011", 250), ("101", 500)]);
    // ZZI reads qubits 0 and 1: 000 -> +1, 011 -> +1, 101 -> -1
    assert!((expectation_value_str("ZZI", &counts).unwrap()).abs() < 1e-12);
    // IIZ reads qubit 2: 000 -> +1, 011 -> +1, 101 -> -1
    assert!((expectation_value_str("IIZ", &counts).unwrap()).abs() < 1e-12);
    // ZIZ reads qubits 0 and 2: 000 -> +1, 011 -> -1, 101 -> +1
    assert!((expectation_value_str("ZIZ", &counts).unwrap() - 0.5).abs() < 1e-12);
}

#[test]
fn boundary_errors() {
    let counts = Counts::from_pairs([("01", 1u64)]);
    assert!(matches!(
        expectation_value_str("ZZZ", &counts),
        Err(VqeError::PauliLengthMismatch {
            term_len: 3,
            bitstring_len: 2
        })
    ));
    assert!(matches!(
        expectation_value_str("Zz", &counts),
        Err(VqeError::InvalidSymbol {
            symbol: 'z',
            position: 1
        })
    ));
    assert!(matches!(
        expectation_value_str("ZI", &Counts::new()),
        Err(VqeError::EmptyHistogram)
    ));
    assert_eq!(expectation_value_str("II", &Counts::new()).unwrap(), 1.0);
}

// ---------------------------------------------------------------------------
// Reuse
// ---------------------------------------------------------------------------

#[test]
fn shared_histogram_matches_own_histogram() {
    let h = Hamiltonian::new([("ZZ", 1.0), ("ZI", 1.0), ("IZ", 1.0)]).unwrap();
    let circuit = prepared_state();
    let shots = 20_000;

    let shared_exec = SampledStateExecutor::new(11);
    let shared = EnergyEvaluator::new(&h, &shared_exec)
        .with_shots(shots)
        .with_strategy(GreedyGrouping)
        .evaluate(&circuit)
        .unwrap();
    assert_eq!(shared.executor_calls, 1);

    let own_exec = SampledStateExecutor::new(12);
    let own = EnergyEvaluator::new(&h, &own_exec)
        .with_shots(shots)
        .with_strategy(IndividualGrouping)
        .evaluate(&circuit)
        .unwrap();
    assert_eq!(own.executor_calls, 3);

    // 1/sqrt(20000) ~ 0.007 per estimate
    for (i, term) in ["ZZ", "ZI", "IZ"].iter().enumerate() {
        let exact = exact_expectation(&circuit, term);
        assert!((shared.expectations[i] - exact).abs() < 0.04, "{term} shared");
        assert!((own.expectations[i] - exact).abs() < 0.04, "{term} own");
    }
}

#[test]
fn member_reads_qubit_the_base_leaves_as_identity() {
    // qubit 0 in |+>, qubit 1 in |1>
    let mut circuit = Circuit::with_size("prep", 2, 0);
    circuit.h(QubitId(0)).unwrap();
    circuit.x(QubitId(1)).unwrap();

    let h = Hamiltonian::new([("XI", 1.0), ("XZ", 1.0)]).unwrap();
    let exec = SampledStateExecutor::new(3);
    let estimate = EnergyEvaluator::new(&h, &exec)
        .with_shots(200)
        .evaluate(&circuit)
        .unwrap();

    assert_eq!(estimate.executor_calls, 1);
    assert!((estimate.expectations[0] - 1.0).abs() < 1e-12);
    assert!((estimate.expectations[1] + 1.0).abs() < 1e-12);
    assert!(estimate.energy.abs() < 1e-12);
}

#[test]
fn y_basis_rotation() {
    // RX(-pi/2)|0> is the +1 eigenstate of Y
    let mut circuit = Circuit::with_size("prep", 1, 0);
    circuit.rx(-std::f64::consts::FRAC_PI_2, QubitId(0)).unwrap();

    let h = Hamiltonian::new([("Y", 1.0)]).unwrap();
    let exec = SampledStateExecutor::new(5);
    let estimate = EnergyEvaluator::new(&h, &exec)
        .with_shots(100)
        .evaluate(&circuit)
        .unwrap();
    assert!((estimate.energy - 1.0).abs() < 1e-9);
}
