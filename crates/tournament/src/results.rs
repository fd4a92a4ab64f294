//! Match results, the running score/match boards, and final standings

use std::collections::BTreeMap;

/// Points for a decisive win
pub const WIN_POINTS: u32 = 3;
/// Points each side gets for a draw
pub const DRAW_POINTS: u32 = 1;

/// Ternary outcome of a pairing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Award {
    FirstWins,
    SecondWins,
    Draw,
}

impl Award {
    /// Decide a pairing from its tally of per-game signs
    pub fn from_tally(tally: i64) -> Self {
        match tally.signum() {
            1 => Award::FirstWins,
            -1 => Award::SecondWins,
            _ => Award::Draw,
        }
    }

    /// Points for (first, second)
    pub fn points(self) -> (u32, u32) {
        match self {
            Award::FirstWins => (WIN_POINTS, 0),
            Award::SecondWins => (0, WIN_POINTS),
            Award::Draw => (DRAW_POINTS, DRAW_POINTS),
        }
    }
}

/// Outcome of one completed pairing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    /// Identity of the first (red) competitor
    pub first: String,
    /// Identity of the second (blue) competitor
    pub second: String,
    pub award: Award,
    /// Games won by first minus games won by second
    pub tally: i64,
    /// Simulated games played
    pub games: u32,
}

impl MatchResult {
    pub fn points(&self) -> (u32, u32) {
        self.award.points()
    }

    /// One-line progress summary, e.g. `Ada vs Grace: 3`
    pub fn summary(&self) -> String {
        format!("{} vs {}: {}", self.first, self.second, self.points().0)
    }
}

type ScoreBoard = BTreeMap<String, u32>;
type MatchBoard = BTreeMap<String, BTreeMap<String, u32>>;

/// Owner of the score board and match board while a tournament runs.
///
/// Only the scheduler's collecting thread holds it; workers hand results
/// over a channel, so updates are serialized by ownership.
#[derive(Debug, Clone, Default)]
pub struct ResultAggregator {
    score_board: ScoreBoard,
    match_board: MatchBoard,
    recorded: usize,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one pairing's award to both boards.
    pub fn record(&mut self, first: &str, second: &str, points_first: u32, points_second: u32) {
        *self.score_board.entry(first.to_string()).or_insert(0) += points_first;
        *self.score_board.entry(second.to_string()).or_insert(0) += points_second;

        self.match_board
            .entry(first.to_string())
            .or_default()
            .insert(second.to_string(), points_first);
        self.match_board
            .entry(second.to_string())
            .or_default()
            .insert(first.to_string(), points_second);

        self.recorded += 1;
    }

    pub fn record_result(&mut self, result: &MatchResult) {
        let (points_first, points_second) = result.points();
        self.record(&result.first, &result.second, points_first, points_second);
    }

    /// Pairings recorded so far
    pub fn recorded(&self) -> usize {
        self.recorded
    }

    /// Freeze the boards. `competitors` fixes report order.
    pub fn finish(self, competitors: Vec<String>) -> Standings {
        Standings {
            competitors,
            score_board: self.score_board,
            match_board: self.match_board,
        }
    }
}

/// Read-only boards after the last pairing completed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standings {
    competitors: Vec<String>,
    score_board: ScoreBoard,
    match_board: MatchBoard,
}

impl Standings {
    /// Competitor identities in qualification order
    pub fn competitors(&self) -> &[String] {
        &self.competitors
    }

    /// Cumulative points; competitors without a recorded match have 0
    pub fn score(&self, identity: &str) -> u32 {
        self.score_board.get(identity).copied().unwrap_or(0)
    }

    /// Points `identity` earned against `opponent`, if they played
    pub fn points_against(&self, identity: &str, opponent: &str) -> Option<u32> {
        self.match_board.get(identity)?.get(opponent).copied()
    }

    /// Leaderboard: highest score first, ties in qualification order
    pub fn ranked(&self) -> Vec<(String, u32)> {
        let mut entries: Vec<_> = self
            .competitors
            .iter()
            .map(|c| (c.clone(), self.score(c)))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries
    }

    /// Every match board entry has its mirror, and each pair of entries
    /// sums to a decisive or drawn award.
    pub fn is_consistent(&self) -> bool {
        self.match_board.iter().all(|(team, row)| {
            row.iter().all(|(opponent, &points)| {
                match self.points_against(opponent, team) {
                    Some(other) => {
                        points + other == WIN_POINTS || points + other == 2 * DRAW_POINTS
                    }
                    None => false,
                }
            })
        }) && self.score_board.iter().all(|(team, &score)| {
            let from_matches: u32 = self
                .match_board
                .get(team)
                .map(|row| row.values().sum())
                .unwrap_or(0);
            from_matches == score
        })
    }

    /// Print leaderboard to stdout
    pub fn print_leaderboard(&self) {
        println!("\n=== Score Board ===");
        println!("{:<40} {:>6}", "Team", "Score");
        println!("{}", "-".repeat(47));
        for (team, score) in self.ranked() {
            println!("{:<40} {:>6}", team, score);
        }
        println!();
    }
}
