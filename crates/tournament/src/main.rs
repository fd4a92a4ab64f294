//! Tournament CLI
//!
//! Qualify submissions, play the round robin, and write the score and
//! match boards.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tournament::{
    build_simulator, locate_agents, pairing_count, play_round_robin, stage_agents, AllowList,
    MatchConfig, MatchRunner, QualificationFilter, ReportWriter, Roster, RunLayout, Scheduler,
    SimulatorKind, TournamentConfig, TranscriptSink,
};

#[derive(Parser, Debug)]
#[command(name = "tournament")]
#[command(about = "Round-robin tournament between graded capture agents", long_about = None)]
struct Cli {
    /// Directory with submission_metadata.yml and one folder per submission
    #[arg(short = 's', long)]
    submission_path: PathBuf,

    /// Allow-list of team identities, one per line
    #[arg(short = 'l', long)]
    name_list: PathBuf,

    /// Worker pool size (0 or 1 = sequential)
    #[arg(short = 'n', long)]
    num_processes: Option<usize>,

    /// Times each layout is played per pairing
    #[arg(short = 'r', long)]
    num_repeats: Option<u32>,

    /// Keep only the first N qualified teams (-1 = all)
    #[arg(long, allow_hyphen_values = true)]
    num_teams: Option<i64>,

    /// TOML config file; command-line flags take precedence
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Simulator used to play games
    #[arg(long, value_enum)]
    simulator: Option<SimulatorKind>,

    /// Base seed for the seeded simulator
    #[arg(long)]
    seed: Option<u64>,

    /// Comma-separated layouts, replacing the configured list
    #[arg(long, value_delimiter = ',')]
    layouts: Option<Vec<String>>,
}

impl Cli {
    fn resolve_config(&self) -> Result<TournamentConfig> {
        let mut config = match &self.config {
            Some(path) => TournamentConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => TournamentConfig::default(),
        };

        if let Some(workers) = self.num_processes {
            config.workers = workers;
        }
        if let Some(repeats) = self.num_repeats {
            config.repeats = repeats;
        }
        if let Some(max_teams) = self.num_teams {
            config.max_teams = max_teams;
        }
        if let Some(kind) = self.simulator {
            config.simulator.kind = kind;
        }
        if let Some(seed) = self.seed {
            config.simulator.seed = seed;
        }
        if let Some(layouts) = &self.layouts {
            config.scenarios = layouts.clone();
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    // Everything that can fail on bad input happens before output is touched
    let roster = Roster::load(&cli.submission_path)
        .with_context(|| format!("loading roster from {}", cli.submission_path.display()))?;
    let allow_list = AllowList::load(&cli.name_list)
        .with_context(|| format!("loading allow-list {}", cli.name_list.display()))?;
    if roster.is_empty() {
        warn!("no submissions in {}", cli.submission_path.display());
    }
    if allow_list.is_empty() {
        warn!("allow-list {} names no teams", cli.name_list.display());
    }
    let competitors = QualificationFilter::new(&config.qualification)
        .with_cap(config.max_teams)
        .qualify(&roster, &allow_list)?;
    let agents = locate_agents(&cli.submission_path, &competitors)?;
    let layout = RunLayout::new(&config.output, chrono::Local::now().date_naive());
    layout.check_disjoint(&cli.submission_path)?;

    println!(
        "{} teams qualified. {} games to be played.",
        competitors.len(),
        pairing_count(competitors.len())
    );

    layout.prepare()?;
    stage_agents(&agents, &competitors, &layout.staging_dir)?;

    let simulator = build_simulator(&config.simulator, &layout.staging_dir);
    info!(
        "Simulator: {}, {} games per pairing",
        simulator.name(),
        config.games_per_pairing()
    );
    let runner = MatchRunner::new(MatchConfig::from(&config), simulator);
    let scheduler = Scheduler::new(config.workers)
        .with_transcripts(TranscriptSink::Directory(layout.log_dir.clone()));

    let (standings, outcome) = play_round_robin(&competitors, &runner, &scheduler)?;

    standings.print_leaderboard();
    let paths = ReportWriter::new(&layout.results_dir, &layout.stamp).write_all(&standings)?;
    info!("Wrote {}", paths.score_board.display());
    info!("Wrote {}", paths.match_board.display());

    if !outcome.failed.is_empty() {
        for failed in &outcome.failed {
            warn!(
                "{} vs {}: {}",
                failed.pairing.first.identity, failed.pairing.second.identity, failed.error
            );
        }
        bail!(
            "{} of {} pairings failed; see {}",
            outcome.failed.len(),
            outcome.total(),
            layout.log_dir.display()
        );
    }
    Ok(())
}
