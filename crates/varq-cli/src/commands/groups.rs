//! Groups command implementation.

use std::path::Path;

use anyhow::Result;
use console::style;

use varq_vqe::{
    GreedyGrouping, GroupingStrategy, Hamiltonian, IndividualGrouping, MeasurementPlan,
};

use super::common::load_molecule;

/// Execute the groups command.
pub fn execute(molecule: &Path, strategy: &str) -> Result<()> {
    let (document, hamiltonian) = load_molecule(molecule)?;
    let terms = hamiltonian.pauli_strings();

    let plan = match strategy.to_lowercase().as_str() {
        "greedy" => GreedyGrouping.group(&terms),
        "individual" => IndividualGrouping.group(&terms),
        other => {
            anyhow::bail!("Unknown grouping strategy: {other} (expected greedy or individual)")
        }
    };

    println!(
        "{} Grouping {} terms of {} ({})",
        style("→").cyan().bold(),
        hamiltonian.num_terms(),
        style(&document.name).green(),
        style(strategy).yellow()
    );

    print_plan(&plan, &hamiltonian);

    println!(
        "{} {} groups, {} executor calls per evaluation",
        style("✓").green().bold(),
        plan.num_groups(),
        style(plan.num_measured_groups()).bold()
    );

    Ok(())
}

fn print_plan(plan: &MeasurementPlan, hamiltonian: &Hamiltonian) {
    for (g, group) in plan.groups().iter().enumerate() {
        let tag = if group.is_trivial() {
            style("identity").dim().to_string()
        } else {
            style(format!("basis {}", group.base())).cyan().to_string()
        };
        println!("  [{g}] {tag}");
        for (term, coeff) in group.members().iter().filter_map(|&t| hamiltonian.term(t)) {
            println!("      {term}  {coeff:+.6}");
        }
    }
}
