//! Pauli-term expectation values from measurement histograms.
//!
//! A histogram is assumed to come from a circuit measured in a basis where
//! the term is diagonal: after the basis rotations every non-identity
//! symbol reads as Z. Each outcome then contributes
//! `(-1)^(number of non-identity positions whose qubit measured 1)`.

use crate::counts::{Counts, bit_index};
use crate::error::{VqeError, VqeResult};
use crate::hamiltonian::{Pauli, PauliString};

/// Estimate `<term>` from `counts`.
///
/// An all-identity term is exactly `1.0` regardless of the histogram.
/// Any other term needs at least one shot, and every outcome must be a
/// `0`/`1` string of the term's length.
#[allow(clippy::cast_precision_loss)]
pub fn expectation_value(term: &PauliString, counts: &Counts) -> VqeResult<f64> {
    if term.is_identity() {
        return Ok(1.0);
    }

    let total = counts.total_shots();
    if total == 0 {
        return Err(VqeError::EmptyHistogram);
    }

    let n = term.len();
    let active: Vec<usize> = term
        .symbols()
        .iter()
        .enumerate()
        .filter(|(_, p)| **p != Pauli::I)
        .filter_map(|(qubit, _)| bit_index(n, qubit))
        .collect();

    let mut signed: i128 = 0;
    for (bitstring, count) in counts.iter() {
        let bits = validate_outcome(bitstring, n)?;
        let ones = active.iter().filter(|&&i| bits[i] == b'1').count();
        let eigenvalue: i128 = if ones % 2 == 0 { 1 } else { -1 };
        signed += eigenvalue * i128::from(count);
    }

    Ok(signed as f64 / total as f64)
}

/// Estimate `<term>` for a term given as raw text.
///
/// Symbols outside `I`, `X`, `Y`, `Z` are reported as
/// [`VqeError::InvalidSymbol`] with their position.
pub fn expectation_value_str(term: &str, counts: &Counts) -> VqeResult<f64> {
    let symbols = term
        .chars()
        .enumerate()
        .map(|(position, symbol)| {
            Pauli::from_char(symbol).ok_or(VqeError::InvalidSymbol { symbol, position })
        })
        .collect::<VqeResult<Vec<_>>>()?;
    if symbols.is_empty() {
        return Err(VqeError::MalformedTerm {
            term: String::new(),
            reason: "term is empty".into(),
        });
    }
    expectation_value(&PauliString::from_symbols(symbols), counts)
}

fn validate_outcome(bitstring: &str, expected_len: usize) -> VqeResult<&[u8]> {
    if bitstring.chars().count() != expected_len {
        return Err(VqeError::PauliLengthMismatch {
            term_len: expected_len,
            bitstring_len: bitstring.chars().count(),
        });
    }
    if let Some((position, symbol)) = bitstring
        .chars()
        .enumerate()
        .find(|(_, c)| *c != '0' && *c != '1')
    {
        return Err(VqeError::InvalidSymbol { symbol, position });
    }
    Ok(bitstring.as_bytes())
}
