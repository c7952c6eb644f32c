//! Pauli Hamiltonian representation.
//!
//! A Hamiltonian is a weighted sum of Pauli strings:
//! H = Σᵢ cᵢ Pᵢ
//! where each Pᵢ is written one symbol per qubit, symbol `i` acting on
//! qubit `i` (e.g. `"IXYZ"` applies X to qubit 1).

use std::fmt;
use std::str::FromStr;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{VqeError, VqeResult};

/// A single Pauli operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pauli {
    /// Identity operator.
    I,
    /// Pauli-X operator.
    X,
    /// Pauli-Y operator.
    Y,
    /// Pauli-Z operator.
    Z,
}

impl Pauli {
    /// Get the name of this Pauli operator.
    pub fn name(&self) -> &'static str {
        match self {
            Pauli::I => "I",
            Pauli::X => "X",
            Pauli::Y => "Y",
            Pauli::Z => "Z",
        }
    }

    /// Parse a single symbol. Only the upper-case letters are accepted.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(Pauli::I),
            'X' => Some(Pauli::X),
            'Y' => Some(Pauli::Y),
            'Z' => Some(Pauli::Z),
            _ => None,
        }
    }

    /// Whether this operator is diagonal in the computational basis.
    pub fn is_diagonal(&self) -> bool {
        matches!(self, Pauli::I | Pauli::Z)
    }
}

impl fmt::Display for Pauli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// An ordered tensor product of Pauli operators, one per qubit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PauliString {
    symbols: Vec<Pauli>,
}

impl PauliString {
    /// Parse and validate a term such as `"IXZZ"`.
    pub fn parse(term: &str) -> VqeResult<Self> {
        if term.is_empty() {
            return Err(VqeError::MalformedTerm {
                term: term.to_string(),
                reason: "term is empty".into(),
            });
        }
        let symbols = term
            .chars()
            .enumerate()
            .map(|(position, c)| {
                Pauli::from_char(c).ok_or_else(|| VqeError::MalformedTerm {
                    term: term.to_string(),
                    reason: format!("symbol '{c}' at position {position} is not one of I, X, Y, Z"),
                })
            })
            .collect::<VqeResult<Vec<_>>>()?;
        Ok(Self { symbols })
    }

    /// Build from already-validated symbols.
    pub fn from_symbols(symbols: Vec<Pauli>) -> Self {
        Self { symbols }
    }

    /// The all-identity string on `n` qubits.
    pub fn identity(n: usize) -> Self {
        Self {
            symbols: vec![Pauli::I; n],
        }
    }

    /// Number of symbols (= qubits).
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether the string has no symbols. Parsed strings never do.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// The symbols in qubit order.
    pub fn symbols(&self) -> &[Pauli] {
        &self.symbols
    }

    /// The operator acting on `qubit`, if in range.
    pub fn get(&self, qubit: usize) -> Option<Pauli> {
        self.symbols.get(qubit).copied()
    }

    /// Whether every symbol is the identity.
    pub fn is_identity(&self) -> bool {
        self.symbols.iter().all(|p| *p == Pauli::I)
    }

    /// Number of non-identity symbols.
    pub fn weight(&self) -> usize {
        self.symbols.iter().filter(|p| **p != Pauli::I).count()
    }

    /// Whether only I and Z appear.
    pub fn is_diagonal(&self) -> bool {
        self.symbols.iter().all(Pauli::is_diagonal)
    }

    /// Whether both strings can be estimated from one measurement basis.
    ///
    /// At every position the symbols must be equal or both in {I, Z}.
    /// Strings of different length are never compatible.
    pub fn basis_compatible(&self, other: &PauliString) -> bool {
        self.len() == other.len()
            && self
                .symbols
                .iter()
                .zip(&other.symbols)
                .all(|(a, b)| a == b || (a.is_diagonal() && b.is_diagonal()))
    }
}

impl FromStr for PauliString {
    type Err = VqeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PauliString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for p in &self.symbols {
            write!(f, "{p}")?;
        }
        Ok(())
    }
}

/// A Hamiltonian as an ordered list of weighted Pauli strings.
///
/// All terms have the same length, which is the qubit count. Input order
/// is kept because greedy grouping depends on it.
#[derive(Debug, Clone, PartialEq)]
pub struct Hamiltonian {
    terms: Vec<(PauliString, f64)>,
    num_qubits: usize,
}

impl Hamiltonian {
    /// Build a Hamiltonian from `(term, coefficient)` pairs.
    ///
    /// Repeated terms are merged by summing coefficients at the position of
    /// their first occurrence.
    pub fn new<I, S>(terms: I) -> VqeResult<Self>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let mut merged: Vec<(PauliString, f64)> = Vec::new();
        let mut index: FxHashMap<PauliString, usize> = FxHashMap::default();
        let mut num_qubits = None;

        for (text, coefficient) in terms {
            let text = text.as_ref();
            let term = PauliString::parse(text)?;

            match num_qubits {
                None => num_qubits = Some(term.len()),
                Some(n) if n != term.len() => {
                    return Err(VqeError::MalformedTerm {
                        term: text.to_string(),
                        reason: format!("length {} differs from first term length {n}", term.len()),
                    });
                }
                Some(_) => {}
            }

            if let Some(&i) = index.get(&term) {
                merged[i].1 += coefficient;
            } else {
                index.insert(term.clone(), merged.len());
                merged.push((term, coefficient));
            }
        }

        let num_qubits = num_qubits.ok_or(VqeError::EmptyHamiltonian)?;
        Ok(Self {
            terms: merged,
            num_qubits,
        })
    }

    /// Number of qubits the Hamiltonian acts on.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Number of distinct terms.
    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    /// Terms with their coefficients, in input order.
    pub fn terms(&self) -> &[(PauliString, f64)] {
        &self.terms
    }

    /// Iterate over `(term, coefficient)` in input order.
    pub fn iter(&self) -> impl Iterator<Item = (&PauliString, f64)> + '_ {
        self.terms.iter().map(|(t, c)| (t, *c))
    }

    /// The term at `index`.
    pub fn term(&self, index: usize) -> Option<(&PauliString, f64)> {
        self.terms.get(index).map(|(t, c)| (t, *c))
    }

    /// Pauli strings only, in input order.
    pub fn pauli_strings(&self) -> Vec<PauliString> {
        self.terms.iter().map(|(t, _)| t.clone()).collect()
    }

    /// Coefficient of the all-identity term, or `0.0` if absent.
    pub fn constant_offset(&self) -> f64 {
        self.terms
            .iter()
            .filter(|(t, _)| t.is_identity())
            .map(|(_, c)| c)
            .sum()
    }
}

impl fmt::Display for Hamiltonian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (term, coefficient)) in self.terms.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            if *coefficient >= 0.0 {
                write!(f, "+{coefficient:.4} {term}")?;
            } else {
                write!(f, "{coefficient:.4} {term}")?;
            }
        }
        Ok(())
    }
}
