//! Score board and match board tables
//!
//! Both tables are tab-separated. Rows follow qualification order.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::ReportError;
use crate::results::Standings;

fn tsv_writer<W: Write>(out: W) -> csv::Writer<W> {
    csv::WriterBuilder::new().delimiter(b'\t').from_writer(out)
}

/// `team, score` header then one row per competitor
pub fn write_score_board<W: Write>(out: W, standings: &Standings) -> Result<(), ReportError> {
    let mut writer = tsv_writer(out);
    writer.write_record(["team", "score"])?;
    for team in standings.competitors() {
        let score = standings.score(team).to_string();
        writer.write_record([team.as_str(), score.as_str()])?;
    }
    writer.flush()?;
    Ok(())
}

/// Blank corner cell plus one column per competitor; each row holds the
/// row team's points against the column team, blank where they never met.
pub fn write_match_board<W: Write>(out: W, standings: &Standings) -> Result<(), ReportError> {
    let mut writer = tsv_writer(out);
    let teams = standings.competitors();

    let mut header = Vec::with_capacity(teams.len() + 1);
    header.push(String::new());
    header.extend(teams.iter().cloned());
    writer.write_record(&header)?;

    for team in teams {
        let mut row = Vec::with_capacity(teams.len() + 1);
        row.push(team.clone());
        row.extend(teams.iter().map(|opponent| {
            standings
                .points_against(team, opponent)
                .map(|p| p.to_string())
                .unwrap_or_default()
        }));
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Files produced by one run
#[derive(Debug, Clone)]
pub struct ReportPaths {
    pub score_board: PathBuf,
    pub match_board: PathBuf,
}

/// Writes both tables into a results directory, stamped with the run date
#[derive(Debug, Clone)]
pub struct ReportWriter {
    results_dir: PathBuf,
    stamp: String,
}

impl ReportWriter {
    pub fn new(results_dir: &Path, stamp: &str) -> Self {
        Self {
            results_dir: results_dir.to_path_buf(),
            stamp: stamp.to_string(),
        }
    }

    pub fn paths(&self) -> ReportPaths {
        ReportPaths {
            score_board: self
                .results_dir
                .join(format!("score_board-{}.csv", self.stamp)),
            match_board: self
                .results_dir
                .join(format!("match_board-{}.csv", self.stamp)),
        }
    }

    pub fn write_all(&self, standings: &Standings) -> Result<ReportPaths, ReportError> {
        std::fs::create_dir_all(&self.results_dir)?;
        let paths = self.paths();
        write_score_board(File::create(&paths.score_board)?, standings)?;
        write_match_board(File::create(&paths.match_board)?, standings)?;
        Ok(paths)
    }
}
