//! Run directories and submission staging
//!
//! A run copies each qualified agent to `<staging>/<key>.py`, writes
//! transcripts under `<logs>/logs-<date>/` and reports under `<results>/`.
//! Staging and the dated log directory are recreated on every run.

use chrono::NaiveDate;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::info;

use crate::config::OutputConfig;
use crate::error::ConfigError;
use crate::roster::Competitor;

/// Agent file inside each submission folder
pub const AGENT_FILE: &str = "myTeam.py";

/// Resolved output locations for one run
#[derive(Debug, Clone)]
pub struct RunLayout {
    pub staging_dir: PathBuf,
    pub log_dir: PathBuf,
    pub results_dir: PathBuf,
    /// Date stamp used in directory and report names
    pub stamp: String,
}

impl RunLayout {
    pub fn new(output: &OutputConfig, date: NaiveDate) -> Self {
        let stamp = date.format("%Y-%m-%d").to_string();
        Self {
            staging_dir: output.staging_dir.clone(),
            log_dir: output.log_dir.join(format!("logs-{}", stamp)),
            results_dir: output.results_dir.clone(),
            stamp,
        }
    }

    /// Refuse a layout whose recreated directories overlap the input.
    ///
    /// Staging and the dated log directory are wiped by [`prepare`], so
    /// neither may equal, contain, or sit inside `submission_dir`.
    ///
    /// [`prepare`]: RunLayout::prepare
    pub fn check_disjoint(&self, submission_dir: &Path) -> Result<(), ConfigError> {
        let input = resolve(submission_dir).map_err(|e| ConfigError::io(submission_dir, e))?;
        for dir in [&self.staging_dir, &self.log_dir] {
            let output = resolve(dir).map_err(|e| ConfigError::io(dir, e))?;
            if output.starts_with(&input) || input.starts_with(&output) {
                return Err(ConfigError::Invalid(format!(
                    "{} overlaps submission directory {}",
                    dir.display(),
                    submission_dir.display()
                )));
            }
        }
        Ok(())
    }

    /// Recreate staging and log directories; make sure results exists.
    pub fn prepare(&self) -> Result<(), ConfigError> {
        for dir in [&self.staging_dir, &self.log_dir] {
            if dir.exists() {
                fs::remove_dir_all(dir).map_err(|e| ConfigError::io(dir, e))?;
            }
            fs::create_dir_all(dir).map_err(|e| ConfigError::io(dir, e))?;
        }
        fs::create_dir_all(&self.results_dir).map_err(|e| ConfigError::io(&self.results_dir, e))?;
        Ok(())
    }
}

/// Canonical form of `path`, which need not exist yet. `.` and `..` are
/// folded lexically, then the deepest existing ancestor is canonicalized
/// and the rest appended.
fn resolve(path: &Path) -> std::io::Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }

    let mut base = normalized.as_path();
    let mut tail = Vec::new();
    loop {
        match base.canonicalize() {
            Ok(canonical) => {
                return Ok(tail.iter().rev().fold(canonical, |acc, part| acc.join(part)));
            }
            Err(e) => match (base.parent(), base.file_name()) {
                (Some(parent), Some(name)) => {
                    tail.push(name);
                    base = parent;
                }
                _ => return Err(e),
            },
        }
    }
}

/// Source agent file for every competitor; fails on the first one missing.
pub fn locate_agents(
    submission_dir: &Path,
    competitors: &[Competitor],
) -> Result<Vec<PathBuf>, ConfigError> {
    competitors
        .iter()
        .map(|c| {
            let path = submission_dir.join(&c.key).join(AGENT_FILE);
            if path.is_file() {
                Ok(path)
            } else {
                Err(ConfigError::MissingArtifact { path })
            }
        })
        .collect()
}

/// Copy agents into the staging directory as `<key>.py`.
pub fn stage_agents(
    sources: &[PathBuf],
    competitors: &[Competitor],
    staging_dir: &Path,
) -> Result<(), ConfigError> {
    for (source, competitor) in sources.iter().zip(competitors) {
        let target = staging_dir.join(format!("{}.py", competitor.key));
        fs::copy(source, &target).map_err(|e| ConfigError::io(source, e))?;
    }
    info!("Staged {} agents in {}", competitors.len(), staging_dir.display());
    Ok(())
}
