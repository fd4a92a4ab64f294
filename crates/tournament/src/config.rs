//! Tournament configuration
//!
//! Settings come from three layers: built-in defaults, an optional TOML
//! file, and command-line overrides applied by the binary.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::simulator::SimulatorKind;

/// Layouts every pairing is played on, once per repeat.
pub const DEFAULT_SCENARIOS: [&str; 6] = [
    "defaultCapture",
    "fastCapture",
    "alleyCapture",
    "mediumCapture",
    "distantCapture",
    "strategicCapture",
];

/// Leaderboard entry used to decide qualification.
pub const DEFAULT_METRIC: &str = "Winning Rate vs. baselineTeam";

/// Minimum metric value a submission needs to qualify (inclusive).
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Top-level tournament configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentConfig {
    /// Worker pool size (0 or 1 = sequential)
    pub workers: usize,
    /// Times each scenario is played per pairing
    pub repeats: u32,
    /// Cap on qualified competitors (<= 0 = unlimited)
    pub max_teams: i64,
    /// Scenario (layout) names
    pub scenarios: Vec<String>,
    pub qualification: QualificationConfig,
    pub output: OutputConfig,
    pub simulator: SimulatorConfig,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            workers: 1,
            repeats: 3,
            max_teams: -1,
            scenarios: DEFAULT_SCENARIOS.iter().map(|s| s.to_string()).collect(),
            qualification: QualificationConfig::default(),
            output: OutputConfig::default(),
            simulator: SimulatorConfig::default(),
        }
    }
}

impl TournamentConfig {
    /// Load a config file, filling unspecified fields with defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make every pairing meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.repeats == 0 {
            return Err(ConfigError::Invalid("repeats must be at least 1".into()));
        }
        if self.scenarios.is_empty() {
            return Err(ConfigError::Invalid("at least one scenario is required".into()));
        }
        if !self.qualification.threshold.is_finite() {
            return Err(ConfigError::Invalid("qualification threshold must be finite".into()));
        }
        Ok(())
    }

    /// Number of simulated games behind every pairing.
    pub fn games_per_pairing(&self) -> usize {
        self.repeats as usize * self.scenarios.len()
    }
}

/// Qualification rules
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QualificationConfig {
    /// Leaderboard entry holding the win rate against the baseline
    pub metric: String,
    pub threshold: f64,
    /// Primary submitter names that never enter the tournament
    pub excluded_submitters: Vec<String>,
}

impl Default for QualificationConfig {
    fn default() -> Self {
        Self {
            metric: DEFAULT_METRIC.to_string(),
            threshold: DEFAULT_THRESHOLD,
            excluded_submitters: Vec::new(),
        }
    }
}

/// Where run artifacts land
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub results_dir: PathBuf,
    pub log_dir: PathBuf,
    pub staging_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_dir: PathBuf::from("results"),
            log_dir: PathBuf::from("logs"),
            staging_dir: PathBuf::from("submissions"),
        }
    }
}

/// Which simulator plays the games, and how.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    pub kind: SimulatorKind,
    /// Program launched once per game (`command` kind)
    pub program: String,
    /// Argument templates; `{red}`, `{blue}` and `{layout}` are substituted
    pub args: Vec<String>,
    /// Base seed (`seeded` kind)
    pub seed: u64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            kind: SimulatorKind::Command,
            program: "python".to_string(),
            args: ["capture.py", "-r", "{red}", "-b", "{blue}", "-l", "{layout}", "-c", "-q"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            seed: 0,
        }
    }
}
