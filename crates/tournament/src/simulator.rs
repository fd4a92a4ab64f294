//! Match simulators
//!
//! The tournament treats the game itself as an external collaborator: a
//! simulator plays one game on one scenario and reports a signed score,
//! positive when the red side (the pairing's first competitor) wins.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use crate::config::SimulatorConfig;
use crate::error::SimulatorError;
use crate::roster::Competitor;

/// One game to simulate
#[derive(Debug, Clone, Copy)]
pub struct Game<'a> {
    pub red: &'a Competitor,
    pub blue: &'a Competitor,
    pub scenario: &'a str,
    /// Zero-based repeat number
    pub repeat: u32,
}

/// Plays single games. Shared across pool workers, so implementations
/// must be thread-safe.
pub trait MatchSimulator: Send + Sync {
    /// Play `game` and return the red side's signed score.
    ///
    /// Anything written to `transcript` is diagnostic only.
    fn play(&self, game: &Game<'_>, transcript: &mut dyn Write) -> Result<f64, SimulatorError>;

    fn name(&self) -> &str;
}

/// Registered simulator implementations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SimulatorKind {
    /// Launch an external game program per game
    Command,
    /// Deterministic pseudo-random scores, for dry runs
    Seeded,
}

/// Build the simulator selected by `config`.
pub fn build_simulator(config: &SimulatorConfig, staging_dir: &Path) -> Arc<dyn MatchSimulator> {
    match config.kind {
        SimulatorKind::Command => Arc::new(CommandSimulator::new(
            &config.program,
            config.args.clone(),
            staging_dir,
        )),
        SimulatorKind::Seeded => Arc::new(SeededSimulator::new(config.seed)),
    }
}

// =============================================================================
// Command simulator
// =============================================================================

/// Runs an external program once per game.
///
/// Argument templates may reference `{red}` and `{blue}` (staged agent
/// files) and `{layout}`. The score is the last line of stdout that is a
/// plain number or a capture result message.
#[derive(Debug, Clone)]
pub struct CommandSimulator {
    program: String,
    args: Vec<String>,
    staging_dir: PathBuf,
}

impl CommandSimulator {
    pub fn new(program: &str, args: Vec<String>, staging_dir: &Path) -> Self {
        Self {
            program: program.to_string(),
            args,
            staging_dir: staging_dir.to_path_buf(),
        }
    }

    fn agent_path(&self, competitor: &Competitor) -> PathBuf {
        self.staging_dir.join(format!("{}.py", competitor.key))
    }

    /// Arguments for one game with placeholders filled in
    pub fn expand_args(&self, game: &Game<'_>) -> Vec<String> {
        let red = self.agent_path(game.red).display().to_string();
        let blue = self.agent_path(game.blue).display().to_string();
        self.args
            .iter()
            .map(|arg| {
                arg.replace("{red}", &red)
                    .replace("{blue}", &blue)
                    .replace("{layout}", game.scenario)
            })
            .collect()
    }
}

impl MatchSimulator for CommandSimulator {
    fn play(&self, game: &Game<'_>, transcript: &mut dyn Write) -> Result<f64, SimulatorError> {
        let output = Command::new(&self.program)
            .args(self.expand_args(game))
            .output()
            .map_err(|source| SimulatorError::Launch {
                program: self.program.clone(),
                source,
            })?;

        let _ = transcript.write_all(&output.stdout);
        let _ = transcript.write_all(&output.stderr);

        if !output.status.success() {
            return Err(SimulatorError::Exit {
                program: self.program.clone(),
                status: output.status,
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_score(&stdout).ok_or_else(|| SimulatorError::NoScore {
            program: self.program.clone(),
        })
    }

    fn name(&self) -> &str {
        "command"
    }
}

/// Extract the red side's score from game output.
///
/// Recognizes bare numbers, `Tie game!`, and
/// `The Red|Blue team wins by N points.`; the last match wins.
pub fn parse_score(output: &str) -> Option<f64> {
    output.lines().rev().find_map(|line| parse_score_line(line.trim()))
}

fn parse_score_line(line: &str) -> Option<f64> {
    if let Ok(score) = line.parse::<f64>() {
        return score.is_finite().then_some(score);
    }
    if line == "Tie game!" {
        return Some(0.0);
    }
    let rest = line.strip_prefix("The ")?;
    let (sign, rest) = if let Some(rest) = rest.strip_prefix("Red team wins by ") {
        (1.0, rest)
    } else {
        (-1.0, rest.strip_prefix("Blue team wins by ")?)
    };
    let margin = rest.strip_suffix(" points.").or_else(|| rest.strip_suffix(" point."))?;
    margin.trim().parse::<f64>().ok().map(|m| sign * m)
}

// =============================================================================
// Seeded simulator
// =============================================================================

/// Highest absolute score the seeded simulator reports
const SEEDED_MAX_MARGIN: i32 = 20;

/// Deterministic stand-in for the real game.
///
/// The score depends only on the base seed and the game itself, so the
/// same tournament replays identically regardless of scheduling.
#[derive(Debug, Clone)]
pub struct SeededSimulator {
    seed: u64,
}

impl SeededSimulator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MatchSimulator for SeededSimulator {
    fn play(&self, game: &Game<'_>, transcript: &mut dyn Write) -> Result<f64, SimulatorError> {
        let game_seed = fxhash::hash64(&(
            self.seed,
            &game.red.key,
            &game.blue.key,
            game.scenario,
            game.repeat,
        ));
        let mut rng = StdRng::seed_from_u64(game_seed);
        let score = rng.gen_range(-SEEDED_MAX_MARGIN..=SEEDED_MAX_MARGIN);
        let _ = writeln!(transcript, "seeded game {:016x}: {}", game_seed, score);
        Ok(f64::from(score))
    }

    fn name(&self) -> &str {
        "seeded"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game<'a>(red: &'a Competitor, blue: &'a Competitor, scenario: &'a str) -> Game<'a> {
        Game {
            red,
            blue,
            scenario,
            repeat: 0,
        }
    }

    #[test]
    fn test_parse_plain_number() {
        assert_eq!(parse_score("starting\n-3.5\n"), Some(-3.5));
        assert_eq!(parse_score("12\n"), Some(12.0));
    }

    #[test]
    fn test_parse_capture_messages() {
        assert_eq!(parse_score("The Red team wins by 7 points.\n"), Some(7.0));
        assert_eq!(parse_score("The Blue team wins by 4 points.\n"), Some(-4.0));
        assert_eq!(parse_score("The Blue team wins by 1 point.\n"), Some(-1.0));
        assert_eq!(parse_score("Tie game!\nAverage Score: 0\n"), Some(0.0));
    }

    #[test]
    fn test_parse_last_score_wins() {
        let out = "The Red team wins by 2 points.\nRecord: Win\n-6\n";
        assert_eq!(parse_score(out), Some(-6.0));
    }

    #[test]
    fn test_parse_without_score() {
        assert_eq!(parse_score("Record: Win\nnan\n"), None);
        assert_eq!(parse_score(""), None);
    }

    #[test]
    fn test_expand_args() {
        let sim = CommandSimulator::new(
            "python",
            vec!["-r".into(), "{red}".into(), "-b".into(), "{blue}".into(), "-l".into(), "{layout}".into()],
            Path::new("staged"),
        );
        let red = Competitor::new("sub_1", "A");
        let blue = Competitor::new("sub_2", "B");
        let args = sim.expand_args(&game(&red, &blue, "fastCapture"));

        let red_path = Path::new("staged").join("sub_1.py").display().to_string();
        let blue_path = Path::new("staged").join("sub_2.py").display().to_string();
        assert_eq!(args, vec!["-r".to_string(), red_path, "-b".into(), blue_path, "-l".into(), "fastCapture".into()]);
    }

    #[test]
    fn test_missing_program_is_launch_error() {
        let sim = CommandSimulator::new("definitely-not-a-real-program-7c1f", Vec::new(), Path::new("."));
        let red = Competitor::new("a", "A");
        let blue = Competitor::new("b", "B");
        let err = sim
            .play(&game(&red, &blue, "defaultCapture"), &mut std::io::sink())
            .unwrap_err();
        assert!(matches!(err, SimulatorError::Launch { .. }));
    }

    #[cfg(unix)]
    fn shell(script: &str) -> CommandSimulator {
        CommandSimulator::new("sh", vec!["-c".into(), script.into()], Path::new("."))
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_is_exit_error() {
        let red = Competitor::new("a", "A");
        let blue = Competitor::new("b", "B");
        let mut transcript: Vec<u8> = Vec::new();
        let err = shell("echo crashed; exit 3")
            .play(&game(&red, &blue, "defaultCapture"), &mut transcript)
            .unwrap_err();
        assert!(matches!(err, SimulatorError::Exit { status, .. } if status.code() == Some(3)));
        assert_eq!(String::from_utf8(transcript).unwrap(), "crashed\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_output_without_score_is_no_score_error() {
        let red = Competitor::new("a", "A");
        let blue = Competitor::new("b", "B");
        let err = shell("echo hello")
            .play(&game(&red, &blue, "defaultCapture"), &mut std::io::sink())
            .unwrap_err();
        assert!(matches!(err, SimulatorError::NoScore { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_command_reports_last_score_line() {
        let red = Competitor::new("a", "A");
        let blue = Competitor::new("b", "B");
        let score = shell("echo {layout}; echo 'The Blue team wins by 4 points.'")
            .play(&game(&red, &blue, "tinyCapture"), &mut std::io::sink())
            .unwrap();
        assert_eq!(score, -4.0);
    }

    #[test]
    fn test_seeded_is_deterministic() {
        let sim = SeededSimulator::new(42);
        let red = Competitor::new("a", "A");
        let blue = Competitor::new("b", "B");

        let first = sim.play(&game(&red, &blue, "alleyCapture"), &mut Vec::<u8>::new()).unwrap();
        let second = sim.play(&game(&red, &blue, "alleyCapture"), &mut Vec::<u8>::new()).unwrap();
        assert_eq!(first, second);
        assert!(first.abs() <= f64::from(SEEDED_MAX_MARGIN));
    }

    #[test]
    fn test_build_simulator_by_kind() {
        let config = SimulatorConfig {
            kind: SimulatorKind::Seeded,
            ..Default::default()
        };
        assert_eq!(build_simulator(&config, Path::new(".")).name(), "seeded");
        assert_eq!(
            build_simulator(&SimulatorConfig::default(), Path::new(".")).name(),
            "command"
        );
    }
}
