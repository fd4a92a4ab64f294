//! Round-robin schedule

use crate::roster::Competitor;

/// One scheduled match between two competitors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pairing {
    /// Position in the schedule
    pub index: usize,
    pub first: Competitor,
    pub second: Competitor,
}

impl Pairing {
    /// Transcript file name, prefixed with the schedule index so identities
    /// that sanitize alike still get separate files
    pub fn log_file_name(&self) -> String {
        format!(
            "{:03} {} vs {}.log",
            self.index,
            sanitize(&self.first.identity),
            sanitize(&self.second.identity)
        )
    }
}

fn sanitize(identity: &str) -> String {
    identity.replace(['/', '\\'], "_")
}

/// Number of pairings a round robin over `n` competitors produces.
pub fn pairing_count(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// Every unordered pair exactly once, in combinations order:
/// `(list[i], list[j])` for `i < j`.
pub fn round_robin(competitors: &[Competitor]) -> Vec<Pairing> {
    let mut pairings = Vec::with_capacity(pairing_count(competitors.len()));
    for (i, first) in competitors.iter().enumerate() {
        for second in &competitors[i + 1..] {
            pairings.push(Pairing {
                index: pairings.len(),
                first: first.clone(),
                second: second.clone(),
            });
        }
    }
    pairings
}
