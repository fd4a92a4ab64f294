//! Match runner for playing one pairing across every scenario

use std::io::Write;
use std::sync::Arc;

use crate::config::TournamentConfig;
use crate::error::SimulatorError;
use crate::results::{Award, MatchResult};
use crate::roster::Competitor;
use crate::simulator::{Game, MatchSimulator};

/// Configuration for a match
#[derive(Debug, Clone)]
pub struct MatchConfig {
    /// Times each scenario is played
    pub repeats: u32,
    /// Scenarios played on every repeat
    pub scenarios: Vec<String>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        let config = TournamentConfig::default();
        Self {
            repeats: config.repeats,
            scenarios: config.scenarios,
        }
    }
}

impl From<&TournamentConfig> for MatchConfig {
    fn from(config: &TournamentConfig) -> Self {
        Self {
            repeats: config.repeats,
            scenarios: config.scenarios.clone(),
        }
    }
}

/// Plays pairings through a simulator
#[derive(Clone)]
pub struct MatchRunner {
    config: MatchConfig,
    simulator: Arc<dyn MatchSimulator>,
}

impl MatchRunner {
    pub fn new(config: MatchConfig, simulator: Arc<dyn MatchSimulator>) -> Self {
        Self { config, simulator }
    }

    /// Simulated games behind one pairing
    pub fn games_per_match(&self) -> u32 {
        self.config.repeats * self.config.scenarios.len() as u32
    }

    /// Play `first` (red) against `second` (blue).
    ///
    /// Each game moves the tally by its sign only, so one lopsided scenario
    /// counts the same as a narrow one. Any simulator failure aborts the
    /// whole pairing; no partial result is returned.
    pub fn run(
        &self,
        first: &Competitor,
        second: &Competitor,
        transcript: &mut dyn Write,
    ) -> Result<MatchResult, SimulatorError> {
        let mut tally: i64 = 0;
        let mut games = 0;

        for repeat in 0..self.config.repeats {
            for scenario in &self.config.scenarios {
                let game = Game {
                    red: first,
                    blue: second,
                    scenario: scenario.as_str(),
                    repeat,
                };
                let _ = writeln!(
                    transcript,
                    "=== {} vs {} on {} (repeat {}) ===",
                    first.identity,
                    second.identity,
                    scenario,
                    repeat + 1
                );

                let score = self.simulator.play(&game, transcript)?;
                if score > 0.0 {
                    tally += 1;
                } else if score < 0.0 {
                    tally -= 1;
                }
                games += 1;

                let _ = writeln!(transcript, "score: {} (tally {})", score, tally);
            }
        }

        let award = Award::from_tally(tally);
        let _ = writeln!(transcript, "result: {:?} after {} games", award, games);

        Ok(MatchResult {
            first: first.identity.clone(),
            second: second.identity.clone(),
            award,
            tally,
            games,
        })
    }
}

#[cfg(test)]
#[path = "match_runner_tests.rs"]
mod match_runner_tests;
