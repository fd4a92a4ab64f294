use super::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Returns a fixed score per scenario and counts calls
struct ScriptedSimulator {
    scores: HashMap<String, f64>,
    calls: AtomicUsize,
}

impl ScriptedSimulator {
    fn new(scores: &[(&str, f64)]) -> Self {
        Self {
            scores: scores.iter().map(|(s, v)| (s.to_string(), *v)).collect(),
            calls: AtomicUsize::new(0),
        }
    }
}

impl MatchSimulator for ScriptedSimulator {
    fn play(&self, game: &Game<'_>, _transcript: &mut dyn Write) -> Result<f64, SimulatorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.scores
            .get(game.scenario)
            .copied()
            .ok_or_else(|| SimulatorError::Game(format!("unknown layout {}", game.scenario)))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

fn runner(sim: Arc<ScriptedSimulator>, repeats: u32, scenarios: &[&str]) -> MatchRunner {
    let config = MatchConfig {
        repeats,
        scenarios: scenarios.iter().map(|s| s.to_string()).collect(),
    };
    MatchRunner::new(config, sim)
}

fn teams() -> (Competitor, Competitor) {
    (Competitor::new("a", "Ada"), Competitor::new("g", "Grace"))
}

#[test]
fn test_plays_every_scenario_every_repeat() {
    let sim = Arc::new(ScriptedSimulator::new(&[("l1", 1.0), ("l2", 1.0), ("l3", 1.0)]));
    let runner = runner(sim.clone(), 2, &["l1", "l2", "l3"]);
    let (a, g) = teams();

    let result = runner.run(&a, &g, &mut std::io::sink()).unwrap();
    assert_eq!(result.games, 6);
    assert_eq!(runner.games_per_match(), 6);
    assert_eq!(sim.calls.load(Ordering::SeqCst), 6);
    assert_eq!(result.tally, 6);
    assert_eq!(result.points(), (3, 0));
}

#[test]
fn test_sign_tally_not_margin() {
    // One blowout for red does not outweigh two narrow blue wins
    let sim = Arc::new(ScriptedSimulator::new(&[("big", 30.0), ("n1", -1.0), ("n2", -2.0)]));
    let runner = runner(sim, 1, &["big", "n1", "n2"]);
    let (a, g) = teams();

    let result = runner.run(&a, &g, &mut std::io::sink()).unwrap();
    assert_eq!(result.tally, -1);
    assert_eq!(result.award, Award::SecondWins);
    assert_eq!(result.points(), (0, 3));
}

#[test]
fn test_zero_scores_are_ignored() {
    let sim = Arc::new(ScriptedSimulator::new(&[("win", 5.0), ("loss", -5.0), ("tie", 0.0)]));
    let runner = runner(sim, 3, &["win", "loss", "tie"]);
    let (a, g) = teams();

    let result = runner.run(&a, &g, &mut std::io::sink()).unwrap();
    assert_eq!(result.tally, 0);
    assert_eq!(result.points(), (1, 1));
    assert_eq!(result.summary(), "Ada vs Grace: 1");
}

#[test]
fn test_simulator_failure_returns_no_result() {
    let sim = Arc::new(ScriptedSimulator::new(&[("ok", 1.0)]));
    let runner = runner(sim.clone(), 1, &["ok", "missing", "ok"]);
    let (a, g) = teams();

    let err = runner.run(&a, &g, &mut std::io::sink()).unwrap_err();
    assert!(matches!(err, SimulatorError::Game(_)));
    assert_eq!(sim.calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_transcript_does_not_change_result() {
    let sim = Arc::new(ScriptedSimulator::new(&[("l1", 2.0), ("l2", -1.0), ("l3", 4.0)]));
    let runner = runner(sim, 1, &["l1", "l2", "l3"]);
    let (a, g) = teams();

    let mut transcript: Vec<u8> = Vec::new();
    let logged = runner.run(&a, &g, &mut transcript).unwrap();
    let silent = runner.run(&a, &g, &mut std::io::sink()).unwrap();

    assert_eq!(logged, silent);
    let text = String::from_utf8(transcript).unwrap();
    assert!(text.contains("Ada vs Grace on l2"));
    assert!(text.contains("result: FirstWins after 3 games"));
}
