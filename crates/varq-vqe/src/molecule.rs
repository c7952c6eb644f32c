//! Molecule Hamiltonian documents.
//!
//! A document names a molecule and maps Pauli terms to real coefficients:
//!
//! ```json
//! {
//!   "name": "H2",
//!   "qubit_hamiltonian": { "IIII": -0.8105, "IIIZ": 0.1721 }
//! }
//! ```
//!
//! Term order is kept as written, since grouping depends on it.

use std::fmt;
use std::path::Path;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::VqeResult;
use crate::hamiltonian::Hamiltonian;

/// Pauli term to coefficient mapping in document order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TermMap(pub Vec<(String, f64)>);

impl<'de> Deserialize<'de> for TermMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TermMapVisitor;

        impl<'de> Visitor<'de> for TermMapVisitor {
            type Value = TermMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map from Pauli term to coefficient")
            }

            fn visit_map<M>(self, mut access: M) -> Result<TermMap, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut terms = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((term, coefficient)) = access.next_entry::<String, f64>()? {
                    terms.push((term, coefficient));
                }
                Ok(TermMap(terms))
            }
        }

        deserializer.deserialize_map(TermMapVisitor)
    }
}

impl Serialize for TermMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (term, coefficient) in &self.0 {
            map.serialize_entry(term, coefficient)?;
        }
        map.end()
    }
}

/// A named molecular Hamiltonian in qubit form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoleculeDocument {
    /// Molecule name.
    pub name: String,
    /// Pauli terms with coefficients.
    pub qubit_hamiltonian: TermMap,
}

impl MoleculeDocument {
    /// Parse a document from JSON text.
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Read and parse a document from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents).map_err(std::io::Error::other)
    }

    /// Build and validate the Hamiltonian.
    pub fn hamiltonian(&self) -> VqeResult<Hamiltonian> {
        Hamiltonian::new(self.qubit_hamiltonian.0.iter().map(|(t, c)| (t.as_str(), *c)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VqeError;

    #[test]
    fn test_parse_keeps_order() {
        let doc = MoleculeDocument::from_json_str(
            r#"{"name": "toy", "qubit_hamiltonian": {"ZZ": 0.5, "II": -1.0, "XX": 0.1}}"#,
        )
        .unwrap();
        assert_eq!(doc.name, "toy");
        let terms: Vec<&str> = doc.qubit_hamiltonian.0.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(terms, vec!["ZZ", "II", "XX"]);

        let h = doc.hamiltonian().unwrap();
        assert_eq!(h.num_qubits(), 2);
        assert_eq!(h.term(0).unwrap().0.to_string(), "ZZ");
    }

    #[test]
    fn test_serialize_round_trip_order() {
        let doc = MoleculeDocument {
            name: "toy".into(),
            qubit_hamiltonian: TermMap(vec![("Z".into(), 1.0), ("I".into(), 2.0)]),
        };
        let json = serde_json::to_string(&doc).unwrap();
        assert_eq!(json, r#"{"name":"toy","qubit_hamiltonian":{"Z":1.0,"I":2.0}}"#);
    }

    #[test]
    fn test_bad_term_surfaces_on_hamiltonian() {
        let doc = MoleculeDocument::from_json_str(
            r#"{"name": "bad", "qubit_hamiltonian": {"ZQ": 0.5}}"#,
        )
        .unwrap();
        assert!(matches!(doc.hamiltonian(), Err(VqeError::MalformedTerm { .. })));
    }

    #[test]
    fn test_missing_field() {
        assert!(MoleculeDocument::from_json_str(r#"{"name": "x"}"#).is_err());
    }
}
