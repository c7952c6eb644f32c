//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - variational ground-state estimation",
        style("Varq").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  varq-ir   Flat circuit representation");
    println!("  varq-vqe  Hamiltonians, grouping, estimation and the variational loop");
    println!("  varq-cli  Command-line interface");
    println!();
    println!("License: {}", style("Apache-2.0").dim());
}
