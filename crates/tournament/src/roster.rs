//! Submission roster and allow-list loading
//!
//! The roster is the grader's `submission_metadata.yml`: a mapping from
//! submission folder name to its submitters and leaderboard results. Entry
//! order in the file is the roster order used everywhere downstream.

use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

use crate::error::ConfigError;

/// Roster metadata file name inside a submission directory
pub const METADATA_FILE: &str = "submission_metadata.yml";

/// A tournament participant.
///
/// `key` locates the submission artifact; `identity` (the comma-joined
/// submitter names) is what scores are reported under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Competitor {
    pub key: String,
    pub identity: String,
}

impl Competitor {
    pub fn new(key: impl Into<String>, identity: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            identity: identity.into(),
        }
    }
}

/// One named leaderboard value from the grader
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub name: String,
    /// `None` when the grader recorded something that is not a number
    pub value: Option<f64>,
}

/// A candidate roster entry
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub key: String,
    /// Submitter names in roster order; never empty
    pub submitters: Vec<String>,
    pub metrics: Vec<Metric>,
}

impl Submission {
    pub fn new(key: impl Into<String>, submitters: &[&str], metrics: &[(&str, f64)]) -> Self {
        Self {
            key: key.into(),
            submitters: submitters.iter().map(|s| s.to_string()).collect(),
            metrics: metrics
                .iter()
                .map(|(name, value)| Metric {
                    name: name.to_string(),
                    value: Some(*value),
                })
                .collect(),
        }
    }

    /// Comma-joined submitter names
    pub fn identity(&self) -> String {
        self.submitters.join(",")
    }

    pub fn primary_submitter(&self) -> &str {
        self.submitters.first().map(String::as_str).unwrap_or_default()
    }

    pub fn competitor(&self) -> Competitor {
        Competitor::new(&self.key, self.identity())
    }

    /// Look up a leaderboard value. A missing or non-numeric entry is an
    /// error, never a default.
    pub fn metric(&self, name: &str) -> Result<f64, ConfigError> {
        let metric = self
            .metrics
            .iter()
            .find(|m| m.name == name)
            .ok_or_else(|| ConfigError::MissingMetric {
                key: self.key.clone(),
                metric: name.to_string(),
            })?;
        metric.value.ok_or_else(|| ConfigError::NonNumericMetric {
            key: self.key.clone(),
            metric: name.to_string(),
        })
    }
}

#[derive(Deserialize)]
struct RawSubmission {
    #[serde(rename = ":submitters")]
    submitters: Vec<RawSubmitter>,
    #[serde(rename = ":results", default)]
    results: RawResults,
}

#[derive(Deserialize)]
struct RawSubmitter {
    #[serde(rename = ":name")]
    name: String,
}

#[derive(Deserialize, Default)]
struct RawResults {
    #[serde(default)]
    leaderboard: Vec<RawMetric>,
}

#[derive(Deserialize)]
struct RawMetric {
    name: String,
    value: serde_yaml::Value,
}

/// Ordered list of submissions
#[derive(Debug, Clone, Default)]
pub struct Roster {
    submissions: Vec<Submission>,
}

impl Roster {
    pub fn new(submissions: Vec<Submission>) -> Self {
        Self { submissions }
    }

    /// Load `submission_metadata.yml` from a submission directory
    pub fn load(submission_dir: &Path) -> Result<Self, ConfigError> {
        let path = submission_dir.join(METADATA_FILE);
        let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::io(&path, e))?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        let doc: serde_yaml::Mapping = serde_yaml::from_str(contents)?;
        let mut submissions = Vec::with_capacity(doc.len());

        for (key, value) in doc {
            let key = match key {
                serde_yaml::Value::String(s) => s,
                other => {
                    return Err(ConfigError::MalformedEntry {
                        key: format!("{:?}", other),
                        reason: "submission key is not a string".into(),
                    })
                }
            };
            let raw: RawSubmission =
                serde_yaml::from_value(value).map_err(|e| ConfigError::MalformedEntry {
                    key: key.clone(),
                    reason: e.to_string(),
                })?;
            if raw.submitters.is_empty() {
                return Err(ConfigError::MalformedEntry {
                    key,
                    reason: "no submitters".into(),
                });
            }

            submissions.push(Submission {
                key,
                submitters: raw.submitters.into_iter().map(|s| s.name).collect(),
                metrics: raw
                    .results
                    .leaderboard
                    .into_iter()
                    .map(|m| Metric {
                        name: m.name,
                        value: m.value.as_f64(),
                    })
                    .collect(),
            });
        }

        Ok(Self { submissions })
    }

    pub fn submissions(&self) -> &[Submission] {
        &self.submissions
    }

    pub fn len(&self) -> usize {
        self.submissions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.submissions.is_empty()
    }
}

/// Identities permitted to compete, one per line
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    names: HashSet<String>,
}

impl AllowList {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        Ok(Self::from_text(&contents))
    }

    pub fn from_text(contents: &str) -> Self {
        let names = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Self { names }
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.names.contains(identity)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for AllowList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
#[path = "roster_tests.rs"]
mod roster_tests;
