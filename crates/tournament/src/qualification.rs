//! Qualification filter
//!
//! Decides which roster entries enter the round robin. A submission
//! qualifies when its primary submitter is not excluded, its identity is on
//! the allow-list, and its win rate against the baseline is at least the
//! threshold.

use std::collections::HashSet;
use tracing::{debug, warn};

use crate::config::QualificationConfig;
use crate::error::ConfigError;
use crate::roster::{AllowList, Competitor, Roster};

#[derive(Debug, Clone)]
pub struct QualificationFilter {
    metric: String,
    threshold: f64,
    excluded: HashSet<String>,
    cap: Option<usize>,
}

impl QualificationFilter {
    pub fn new(config: &QualificationConfig) -> Self {
        Self {
            metric: config.metric.clone(),
            threshold: config.threshold,
            excluded: config.excluded_submitters.iter().cloned().collect(),
            cap: None,
        }
    }

    /// Keep only the first `max_teams` qualifiers. Non-positive means no cap.
    pub fn with_cap(mut self, max_teams: i64) -> Self {
        self.cap = usize::try_from(max_teams).ok().filter(|&n| n > 0);
        self
    }

    /// Qualified competitors in roster order.
    ///
    /// Fails if a submission that passes the name checks has no usable
    /// metric entry.
    pub fn qualify(
        &self,
        roster: &Roster,
        allow_list: &AllowList,
    ) -> Result<Vec<Competitor>, ConfigError> {
        let mut qualified = Vec::new();
        let mut seen = HashSet::new();

        for submission in roster.submissions() {
            if self.excluded.contains(submission.primary_submitter()) {
                debug!("{}: excluded submitter", submission.key);
                continue;
            }
            let competitor = submission.competitor();
            if !allow_list.contains(&competitor.identity) {
                debug!("{}: `{}` not on allow-list", submission.key, competitor.identity);
                continue;
            }

            let win_rate = submission.metric(&self.metric)?;
            if win_rate < self.threshold {
                debug!(
                    "{}: win rate {:.3} below {:.3}",
                    submission.key, win_rate, self.threshold
                );
                continue;
            }

            if !seen.insert(competitor.identity.clone()) {
                warn!(
                    "{}: `{}` already qualified with an earlier submission, skipping",
                    submission.key, competitor.identity
                );
                continue;
            }
            qualified.push(competitor);
        }

        if let Some(cap) = self.cap {
            qualified.truncate(cap);
        }
        Ok(qualified)
    }
}

#[cfg(test)]
#[path = "qualification_tests.rs"]
mod qualification_tests;
