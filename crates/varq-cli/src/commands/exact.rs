//! Exact command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use super::common::{load_config, load_molecule};

/// Execute the exact command.
pub fn execute(molecule: &Path, max_qubits: Option<usize>, config: Option<&Path>) -> Result<()> {
    let (document, hamiltonian) = load_molecule(molecule)?;

    let mut solver = load_config(config)?.exact_solver();
    if let Some(limit) = max_qubits {
        solver = solver.with_max_qubits(limit);
    }

    println!(
        "{} Diagonalizing {} ({} qubits, limit {})",
        style("→").cyan().bold(),
        style(&document.name).green(),
        hamiltonian.num_qubits(),
        style(solver.max_qubits()).yellow()
    );
    println!("  Terms:           {}", hamiltonian.num_terms());
    println!("  Constant offset: {:.6}", hamiltonian.constant_offset());

    let energy = solver
        .ground_state_energy(&hamiltonian)
        .with_context(|| format!("Exact diagonalization failed for {}", document.name))?;

    println!("{} Ground-state energy", style("✓").green().bold());
    println!("  E0 = {}", style(format!("{energy:.8}")).bold());

    Ok(())
}
