//! Error types for the tournament runner

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Problems with the roster, allow-list or config. Always fatal, raised
/// before any pairing is scheduled.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse roster: {0}")]
    RosterParse(#[from] serde_yaml::Error),

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("malformed roster entry `{key}`: {reason}")]
    MalformedEntry { key: String, reason: String },

    #[error("submission `{key}` has no `{metric}` result")]
    MissingMetric { key: String, metric: String },

    #[error("submission `{key}` has a non-numeric `{metric}` result")]
    NonNumericMetric { key: String, metric: String },

    #[error("missing submission artifact {path}")]
    MissingArtifact { path: PathBuf },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::Io {
            path: path.into(),
            source,
        }
    }
}

/// A single simulated game could not produce a score.
#[derive(Error, Debug)]
pub enum SimulatorError {
    #[error("failed to launch `{program}`: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{program}` exited with {status}")]
    Exit { program: String, status: ExitStatus },

    #[error("no score found in output of `{program}`")]
    NoScore { program: String },

    #[error("game failed: {0}")]
    Game(String),
}

/// Failures while writing the score and match boards.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Anything that stops a tournament run as a whole.
#[derive(Error, Debug)]
pub enum TournamentError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
