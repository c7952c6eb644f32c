//! Configuration for variational runs.
//!
//! Supports loading configuration from:
//! 1. Configuration files (YAML)
//! 2. Environment variables (with VARQ_ prefix)
//!
//! Configuration precedence (highest to lowest):
//! 1. Environment variables
//! 2. Configuration file
//! 3. Default values

use std::f64::consts::TAU;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::exact::ExactSolver;
use crate::optimizer::{AnyOptimizer, Cobyla, Spsa};

/// Which optimizer drives the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptimizerKind {
    /// Trust-region simplex.
    #[default]
    Cobyla,
    /// Simultaneous perturbation.
    Spsa,
}

impl FromStr for OptimizerKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cobyla" => Ok(OptimizerKind::Cobyla),
            "spsa" => Ok(OptimizerKind::Spsa),
            other => Err(ConfigError::ValidationError(format!(
                "Unknown optimizer: {other}"
            ))),
        }
    }
}

impl fmt::Display for OptimizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptimizerKind::Cobyla => write!(f, "cobyla"),
            OptimizerKind::Spsa => write!(f, "spsa"),
        }
    }
}

/// Settings for one variational run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VqeConfig {
    /// Shots per measured group.
    #[serde(default = "default_shots")]
    pub shots: u64,

    /// Optimizer iteration budget.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Optimizer convergence tolerance.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Initial trust radius (cobyla).
    #[serde(default = "default_rhobeg")]
    pub rhobeg: f64,

    /// Final trust radius (cobyla).
    #[serde(default = "default_rhoend")]
    pub rhoend: f64,

    /// TwoLocal repetitions.
    #[serde(default = "default_reps")]
    pub reps: usize,

    /// Optimizer choice.
    #[serde(default)]
    pub optimizer: OptimizerKind,

    /// Seed for initial parameters and stochastic optimizers.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Loop-level cap on energy evaluations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_evaluations: Option<usize>,

    /// Loop-level wall-clock limit in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit_seconds: Option<u64>,

    /// Qubit ceiling for exact diagonalization.
    #[serde(default = "default_exact_qubit_limit")]
    pub exact_qubit_limit: usize,

    /// Standard deviation of the random initial parameters.
    #[serde(default = "default_initial_param_scale")]
    pub initial_param_scale: f64,
}

fn default_shots() -> u64 {
    500
}

fn default_max_iterations() -> usize {
    2000
}

fn default_tolerance() -> f64 {
    1e-6
}

fn default_rhobeg() -> f64 {
    0.5
}

fn default_rhoend() -> f64 {
    1e-4
}

fn default_reps() -> usize {
    3
}

fn default_seed() -> u64 {
    42
}

fn default_exact_qubit_limit() -> usize {
    crate::exact::DEFAULT_MAX_QUBITS
}

fn default_initial_param_scale() -> f64 {
    0.1
}

impl Default for VqeConfig {
    fn default() -> Self {
        Self {
            shots: default_shots(),
            max_iterations: default_max_iterations(),
            tolerance: default_tolerance(),
            rhobeg: default_rhobeg(),
            rhoend: default_rhoend(),
            reps: default_reps(),
            optimizer: OptimizerKind::default(),
            seed: default_seed(),
            max_evaluations: None,
            time_limit_seconds: None,
            exact_qubit_limit: default_exact_qubit_limit(),
            initial_param_scale: default_initial_param_scale(),
        }
    }
}

impl VqeConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_yaml_str(&contents)
    }

    /// Parse configuration from YAML text.
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: VqeConfig =
            serde_yaml_ng::from_str(contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with the following precedence:
    /// 1. Load from file if provided
    /// 2. Apply environment variable overrides
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => VqeConfig::default(),
        };
        let config = config.merge_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Merge `VARQ_*` environment variables into this configuration.
    pub fn merge_env(self) -> Result<Self, ConfigError> {
        self.merge_from(|key| std::env::var(key).ok())
    }

    /// Merge overrides from `lookup`, keyed by environment variable name.
    ///
    /// Only keys that resolve override the current values. A value that
    /// fails to parse is a validation error.
    pub fn merge_from<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("VARQ_SHOTS") {
            self.shots = parse_var("VARQ_SHOTS", &v)?;
        }
        if let Some(v) = lookup("VARQ_MAX_ITERATIONS") {
            self.max_iterations = parse_var("VARQ_MAX_ITERATIONS", &v)?;
        }
        if let Some(v) = lookup("VARQ_OPTIMIZER") {
            self.optimizer = v.parse()?;
        }
        if let Some(v) = lookup("VARQ_SEED") {
            self.seed = parse_var("VARQ_SEED", &v)?;
        }
        if let Some(v) = lookup("VARQ_MAX_EVALUATIONS") {
            self.max_evaluations = Some(parse_var("VARQ_MAX_EVALUATIONS", &v)?);
        }
        if let Some(v) = lookup("VARQ_EXACT_QUBIT_LIMIT") {
            self.exact_qubit_limit = parse_var("VARQ_EXACT_QUBIT_LIMIT", &v)?;
        }
        Ok(self)
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_iterations == 0 {
            return Err(ConfigError::ValidationError(
                "max_iterations must be at least 1".into(),
            ));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if !(self.rhoend > 0.0 && self.rhobeg >= self.rhoend) {
            return Err(ConfigError::ValidationError(format!(
                "trust region requires 0 < rhoend <= rhobeg, got rhobeg={} rhoend={}",
                self.rhobeg, self.rhoend
            )));
        }
        if self.max_evaluations == Some(0) {
            return Err(ConfigError::ValidationError(
                "max_evaluations must be at least 1".into(),
            ));
        }
        if !(self.initial_param_scale.is_finite() && self.initial_param_scale >= 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "initial_param_scale must be non-negative, got {}",
                self.initial_param_scale
            )));
        }
        Ok(())
    }

    /// Wall-clock limit, if configured.
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_seconds.map(Duration::from_secs)
    }

    /// The configured optimizer.
    pub fn build_optimizer(&self) -> AnyOptimizer {
        match self.optimizer {
            OptimizerKind::Cobyla => AnyOptimizer::Cobyla(
                Cobyla::new()
                    .with_maxiter(self.max_iterations)
                    .with_tol(self.tolerance)
                    .with_trust_region(self.rhobeg, self.rhoend),
            ),
            OptimizerKind::Spsa => AnyOptimizer::Spsa(
                Spsa::new()
                    .with_maxiter(self.max_iterations)
                    .with_tol(self.tolerance)
                    .with_seed(self.seed),
            ),
        }
    }

    /// Exact solver with the configured qubit ceiling.
    pub fn exact_solver(&self) -> ExactSolver {
        ExactSolver::new().with_max_qubits(self.exact_qubit_limit)
    }

    /// `n` normally distributed starting parameters, mean 0 and standard
    /// deviation `initial_param_scale`, reproducible for a given seed.
    pub fn initial_parameters(&self, n: usize) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        (0..n)
            .map(|_| {
                // Box-Muller
                let u1: f64 = 1.0 - rng.r#gen::<f64>();
                let u2: f64 = rng.r#gen();
                self.initial_param_scale * (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
            })
            .collect()
    }
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::ValidationError(format!("Invalid value for {key}: {value}")))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
