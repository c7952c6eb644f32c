//! CLI command parsing and utility tests.
//!
//! Tests cover argument parsing (via clap `try_parse_from`), the
//! molecule/config loading path the commands share, and error paths.

// The CLI is a binary crate, so helpers are mirrored here and clap parsing is
// validated on equivalent structs.

// ============================================================================
// commands::common tests
// ============================================================================

mod common_tests {
    use std::io::Write;
    use std::path::Path;

    use anyhow::Context;
    use varq_vqe::{
        GreedyGrouping, GroupingStrategy, Hamiltonian, IndividualGrouping, MoleculeDocument,
    };

    const H2_4Q: &str = include_str!("../../../molecules/h2_sto-3g_qubit_hamiltonian.json");
    const H2_2Q: &str = include_str!("../../../molecules/h2_2q_qubit_hamiltonian.json");

    /// Equivalent to commands::common::load_molecule
    fn load_molecule(path: &Path) -> anyhow::Result<(MoleculeDocument, Hamiltonian)> {
        if !path.exists() {
            anyhow::bail!("File not found: {}", path.display());
        }
        let document = MoleculeDocument::from_file(path)
            .with_context(|| format!("Failed to read molecule: {}", path.display()))?;
        let hamiltonian = document.hamiltonian()?;
        Ok((document, hamiltonian))
    }

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_h2_4q() {
        let file = write_temp(H2_4Q);
        let (doc, h) = load_molecule(file.path()).unwrap();
        assert_eq!(doc.name, "H2");
        assert_eq!(h.num_qubits(), 4);
        assert_eq!(h.num_terms(), 15);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_molecule(Path::new("/nonexistent/h2.json")).unwrap_err();
        assert!(err.to_string().contains("File not found"));
    }

    #[test]
    fn test_load_invalid_json() {
        let file = write_temp("{ not json");
        let err = load_molecule(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to read molecule"));
    }

    #[test]
    fn test_load_malformed_term() {
        let file = write_temp(r#"{"name": "bad", "qubit_hamiltonian": {"ZZ": 1.0, "ZQ": 0.5}}"#);
        assert!(load_molecule(file.path()).is_err());
    }

    #[test]
    fn test_h2_2q_exact_energy() {
        let file = write_temp(H2_2Q);
        let (_, h) = load_molecule(file.path()).unwrap();
        let e0 = varq_vqe::ExactSolver::new().ground_state_energy(&h).unwrap();
        let expected = -0.31 - (0.78f64.powi(2) + 0.36f64.powi(2)).sqrt();
        assert!((e0 - expected).abs() < 1e-9, "got {e0}, expected {expected}");
    }

    #[test]
    fn test_exact_limit_rejects() {
        let file = write_temp(H2_4Q);
        let (_, h) = load_molecule(file.path()).unwrap();
        let solver = varq_vqe::ExactSolver::new().with_max_qubits(2);
        assert!(solver.ground_state_energy(&h).is_err());
    }

    #[test]
    fn test_group_counts_by_strategy() {
        let file = write_temp(H2_4Q);
        let (_, h) = load_molecule(file.path()).unwrap();
        let terms = h.pauli_strings();

        let greedy = GreedyGrouping.group(&terms);
        assert_eq!(greedy.num_groups(), 6);
        assert_eq!(greedy.num_measured_groups(), 5);

        let individual = IndividualGrouping.group(&terms);
        assert_eq!(individual.num_groups(), 15);
        assert_eq!(individual.num_measured_groups(), 14);
    }
}

// ============================================================================
// Configuration loading
// ============================================================================

mod config_tests {
    use std::io::Write;

    use varq_vqe::{OptimizerKind, VqeConfig};

    #[test]
    fn test_config_file_round_trip_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "shots: 2000\noptimizer: spsa\nseed: 7").unwrap();

        let config = VqeConfig::from_file(file.path()).unwrap();
        assert_eq!(config.shots, 2000);
        assert_eq!(config.optimizer, OptimizerKind::Spsa);
        assert_eq!(config.seed, 7);

        let yaml = serde_yaml_ng::to_string(&config).unwrap();
        assert!(yaml.contains("optimizer: spsa"));
    }

    #[test]
    fn test_config_missing_file() {
        assert!(VqeConfig::from_file("/nonexistent/varq.yaml").is_err());
    }
}

// ============================================================================
// Clap argument parsing (test via try_parse_from on equivalent structs)
// ============================================================================

mod clap_parsing {
    use std::path::PathBuf;

    use clap::{Parser, Subcommand};

    // Mirror the CLI struct for testing (since main.rs is a binary)
    #[derive(Parser)]
    #[command(name = "varq")]
    struct TestCli {
        #[arg(short, long, action = clap::ArgAction::Count, global = true)]
        verbose: u8,

        #[arg(short, long, global = true)]
        config: Option<PathBuf>,

        #[command(subcommand)]
        command: TestCommands,
    }

    #[derive(Subcommand)]
    enum TestCommands {
        Exact {
            molecule: PathBuf,
            #[arg(long)]
            max_qubits: Option<usize>,
        },
        Groups {
            molecule: PathBuf,
            #[arg(short, long, default_value = "greedy")]
            strategy: String,
        },
        Config,
        Version,
    }

    // --- Exact command ---

    #[test]
    fn test_parse_exact_minimal() {
        let cli = TestCli::try_parse_from(["varq", "exact", "h2.json"]).unwrap();
        match cli.command {
            TestCommands::Exact {
                molecule,
                max_qubits,
            } => {
                assert_eq!(molecule, PathBuf::from("h2.json"));
                assert_eq!(max_qubits, None);
            }
            _ => panic!("Expected Exact command"),
        }
        assert_eq!(cli.verbose, 0);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_parse_exact_max_qubits() {
        let cli =
            TestCli::try_parse_from(["varq", "exact", "h2.json", "--max-qubits", "8"]).unwrap();
        match cli.command {
            TestCommands::Exact { max_qubits, .. } => assert_eq!(max_qubits, Some(8)),
            _ => panic!("Expected Exact command"),
        }
    }

    #[test]
    fn test_parse_exact_requires_molecule() {
        assert!(TestCli::try_parse_from(["varq", "exact"]).is_err());
    }

    #[test]
    fn test_parse_exact_rejects_bad_limit() {
        assert!(
            TestCli::try_parse_from(["varq", "exact", "h2.json", "--max-qubits", "many"]).is_err()
        );
    }

    // --- Groups command ---

    #[test]
    fn test_parse_groups_default_strategy() {
        let cli = TestCli::try_parse_from(["varq", "groups", "h2.json"]).unwrap();
        match cli.command {
            TestCommands::Groups { strategy, .. } => assert_eq!(strategy, "greedy"),
            _ => panic!("Expected Groups command"),
        }
    }

    #[test]
    fn test_parse_groups_individual() {
        let cli =
            TestCli::try_parse_from(["varq", "groups", "h2.json", "-s", "individual"]).unwrap();
        match cli.command {
            TestCommands::Groups { strategy, .. } => assert_eq!(strategy, "individual"),
            _ => panic!("Expected Groups command"),
        }
    }

    // --- Global flags ---

    #[test]
    fn test_parse_verbose_count() {
        let cli = TestCli::try_parse_from(["varq", "-vvv", "version"]).unwrap();
        assert_eq!(cli.verbose, 3);
        assert!(matches!(cli.command, TestCommands::Version));
    }

    #[test]
    fn test_parse_config_after_subcommand() {
        let cli = TestCli::try_parse_from(["varq", "config", "--config", "run.yaml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("run.yaml")));
        assert!(matches!(cli.command, TestCommands::Config));
    }

    #[test]
    fn test_parse_unknown_subcommand() {
        assert!(TestCli::try_parse_from(["varq", "simulate"]).is_err());
    }
}
