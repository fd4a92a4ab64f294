//! Scheduler: dispatches pairings to the match runner and feeds completed
//! results to the aggregator.
//!
//! With more than one worker, pairings run on a rayon pool. Each worker
//! sends its outcome back over a channel and the calling thread, which owns
//! the [`ResultAggregator`], applies results one at a time as they arrive.
//! The call returns only after every dispatched pairing has reported.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use tracing::{debug, info, warn};

use crate::error::{SimulatorError, TournamentError};
use crate::match_runner::MatchRunner;
use crate::pairing::{round_robin, Pairing};
use crate::results::{MatchResult, ResultAggregator, Standings};
use crate::roster::Competitor;

/// Where per-pairing transcripts go
#[derive(Debug, Clone, Default)]
pub enum TranscriptSink {
    #[default]
    Discard,
    /// One `<index> <A> vs <B>.log` file per pairing in this directory
    Directory(PathBuf),
}

impl TranscriptSink {
    fn open(&self, pairing: &Pairing) -> Box<dyn Write> {
        match self {
            TranscriptSink::Discard => Box::new(io::sink()),
            TranscriptSink::Directory(dir) => {
                let path = dir.join(pairing.log_file_name());
                match File::create(&path) {
                    Ok(file) => Box::new(BufWriter::new(file)),
                    Err(e) => {
                        warn!("cannot open transcript {}: {}", path.display(), e);
                        Box::new(io::sink())
                    }
                }
            }
        }
    }
}

/// Stops a running tournament before its next pairing starts.
///
/// Pairings already in flight finish and are recorded normally.
#[derive(Debug, Clone, Default)]
pub struct AbortHandle {
    aborted: Arc<AtomicBool>,
}

impl AbortHandle {
    pub fn abort(&self) {
        self.aborted.store(true, Ordering::SeqCst);
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::SeqCst)
    }
}

/// A pairing whose simulation failed; it earned no points
#[derive(Debug)]
pub struct FailedPairing {
    pub pairing: Pairing,
    pub error: SimulatorError,
}

/// What happened to every scheduled pairing
#[derive(Debug, Default)]
pub struct TournamentOutcome {
    /// Recorded results, in completion order
    pub completed: Vec<MatchResult>,
    pub failed: Vec<FailedPairing>,
    /// Pairings never started because the run was aborted
    pub skipped: Vec<Pairing>,
}

impl TournamentOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && self.skipped.is_empty()
    }

    pub fn total(&self) -> usize {
        self.completed.len() + self.failed.len() + self.skipped.len()
    }
}

enum PairingOutcome {
    Completed(MatchResult),
    Failed(SimulatorError),
    Skipped,
}

/// Dispatches pairings sequentially or across a fixed worker pool
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    workers: usize,
    transcripts: TranscriptSink,
    abort: AbortHandle,
}

impl Scheduler {
    /// `workers` <= 1 runs pairings in order on the calling thread.
    pub fn new(workers: usize) -> Self {
        Self {
            workers,
            ..Default::default()
        }
    }

    pub fn with_transcripts(mut self, transcripts: TranscriptSink) -> Self {
        self.transcripts = transcripts;
        self
    }

    pub fn abort_handle(&self) -> AbortHandle {
        self.abort.clone()
    }

    pub fn is_parallel(&self) -> bool {
        self.workers > 1
    }

    /// Play every pairing and record each completed result exactly once.
    pub fn run(
        &self,
        pairings: &[Pairing],
        runner: &MatchRunner,
        aggregator: &mut ResultAggregator,
    ) -> Result<TournamentOutcome, TournamentError> {
        let mut outcome = TournamentOutcome::default();

        if self.is_parallel() {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.workers)
                .thread_name(|i| format!("match-worker-{}", i))
                .build()?;
            info!("Dispatching {} pairings to {} workers", pairings.len(), self.workers);

            let (tx, rx) = mpsc::channel();
            pool.in_place_scope(|scope| {
                for pairing in pairings {
                    let tx = tx.clone();
                    scope.spawn(move |_| {
                        let played = self.play(pairing, runner);
                        // The receiver lives until every sender is dropped
                        let _ = tx.send((pairing, played));
                    });
                }
                drop(tx);

                for (pairing, played) in rx {
                    Self::apply(pairing, played, aggregator, &mut outcome);
                }
            });
        } else {
            for pairing in pairings {
                let played = self.play(pairing, runner);
                Self::apply(pairing, played, aggregator, &mut outcome);
            }
        }

        info!(
            "{} pairings completed, {} failed, {} skipped",
            outcome.completed.len(),
            outcome.failed.len(),
            outcome.skipped.len()
        );
        Ok(outcome)
    }

    fn play(&self, pairing: &Pairing, runner: &MatchRunner) -> PairingOutcome {
        if self.abort.is_aborted() {
            return PairingOutcome::Skipped;
        }
        debug!(
            "[{}] {} vs {} started",
            pairing.index, pairing.first.identity, pairing.second.identity
        );

        let mut transcript = self.transcripts.open(pairing);
        let played = runner.run(&pairing.first, &pairing.second, transcript.as_mut());
        let _ = transcript.flush();

        match played {
            Ok(result) => PairingOutcome::Completed(result),
            Err(error) => PairingOutcome::Failed(error),
        }
    }

    fn apply(
        pairing: &Pairing,
        played: PairingOutcome,
        aggregator: &mut ResultAggregator,
        outcome: &mut TournamentOutcome,
    ) {
        match played {
            PairingOutcome::Completed(result) => {
                aggregator.record_result(&result);
                info!("{}", result.summary());
                outcome.completed.push(result);
            }
            PairingOutcome::Failed(error) => {
                warn!(
                    "{} vs {} failed, no points awarded: {}",
                    pairing.first.identity, pairing.second.identity, error
                );
                outcome.failed.push(FailedPairing {
                    pairing: pairing.clone(),
                    error,
                });
            }
            PairingOutcome::Skipped => {
                debug!("[{}] skipped after abort", pairing.index);
                outcome.skipped.push(pairing.clone());
            }
        }
    }
}

/// Pair `competitors`, play every pairing, and freeze the boards.
pub fn play_round_robin(
    competitors: &[Competitor],
    runner: &MatchRunner,
    scheduler: &Scheduler,
) -> Result<(Standings, TournamentOutcome), TournamentError> {
    let pairings = round_robin(competitors);
    let mut aggregator = ResultAggregator::new();
    let outcome = scheduler.run(&pairings, runner, &mut aggregator)?;
    let identities = competitors.iter().map(|c| c.identity.clone()).collect();
    Ok((aggregator.finish(identities), outcome))
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod scheduler_tests;
