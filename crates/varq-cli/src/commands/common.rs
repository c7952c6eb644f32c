//! Shared helpers for CLI commands.

use std::path::Path;

use anyhow::{Context, Result};

use varq_vqe::{Hamiltonian, MoleculeDocument, VqeConfig};

/// Load a molecule document and build its Hamiltonian.
pub fn load_molecule(path: &Path) -> Result<(MoleculeDocument, Hamiltonian)> {
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }

    let document = MoleculeDocument::from_file(path)
        .with_context(|| format!("Failed to read molecule: {}", path.display()))?;
    let hamiltonian = document
        .hamiltonian()
        .with_context(|| format!("Invalid Hamiltonian in {}", path.display()))?;

    tracing::debug!(
        molecule = %document.name,
        qubits = hamiltonian.num_qubits(),
        terms = hamiltonian.num_terms(),
        "loaded molecule"
    );

    Ok((document, hamiltonian))
}

/// Resolve the run configuration from an optional file and the environment.
pub fn load_config(path: Option<&Path>) -> Result<VqeConfig> {
    VqeConfig::load(path).context("Failed to load configuration")
}
