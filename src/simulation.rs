//! Batch runner: many seeded games in parallel.
//!
//! Provides a pure function interface: `(number, seed, settings) -> GameResult`
//!
//! The runner handles:
//! - Per-game seed derivation from one master seed
//! - Parallel game execution on a dedicated rayon pool
//! - Hand-off of finished logs to a single writer thread
//! - Lock-free aggregation of statistics (fold/reduce)

mod stats;
mod writer;

pub use stats::{PlayerStats, SimulationStats};
pub use writer::{GameRecord, LogWriter};

use std::time::Instant;

use indicatif::ProgressBar;
use log::{debug, info, warn};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::Money;
use crate::board::Board;
use crate::config::Settings;
use crate::error::{SetupError, SimulationError};
use crate::events::{BankruptcyRecord, EventLog};
use crate::game::{Game, Termination};

/// Final standing of one player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerSummary {
    /// Player name.
    pub name: String,
    /// Cash at game end.
    pub money: Money,
    /// Net worth at game end (mortgages deducted).
    pub net_worth: Money,
    /// Properties held at game end.
    pub properties: usize,
    /// Whether the player went bankrupt.
    pub is_bankrupt: bool,
}

/// Final result of a game.
#[derive(Debug, Clone)]
pub struct GameResult {
    /// Game number within the run (1-based).
    pub number: u64,
    /// The seed used for this game.
    pub seed: u64,
    /// Why the game stopped.
    pub termination: Termination,
    /// Total turns played.
    pub turns_played: u32,
    /// The winning player (None if the top net worth is shared).
    pub winner: Option<String>,
    /// Per-player standings in seating order.
    pub players: Vec<PlayerSummary>,
    /// Bankruptcies in the order they happened.
    pub bankruptcies: Vec<BankruptcyRecord>,
    /// Narrative of the game (empty when game logs are off).
    pub log: EventLog,
}

/// Summary of a completed run.
#[derive(Debug, Clone)]
pub struct SimulationReport {
    /// Aggregated statistics.
    pub stats: SimulationStats,
    /// Wall-clock duration in seconds.
    pub duration_secs: f64,
}

impl SimulationReport {
    /// Games completed per second of wall-clock time.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn games_per_sec(&self) -> f64 {
        if self.duration_secs > 0.0 {
            self.stats.games_played as f64 / self.duration_secs
        } else {
            0.0
        }
    }
}

/// Per-game seeds derived from a master seed, numbered from 1.
///
/// Each seed is one 32-bit draw from a master stream, so game `n` gets the
/// same seed no matter how many games the run has.
pub fn game_seeds(master_seed: u64) -> impl Iterator<Item = (u64, u64)> {
    let mut rng = ChaCha8Rng::seed_from_u64(master_seed);
    (1_u64..).map(move |number| (number, u64::from(rng.next_u32())))
}

/// Seed of one game of a run; `None` for game 0.
#[must_use]
pub fn game_seed(master_seed: u64, number: u64) -> Option<u64> {
    let index = usize::try_from(number.checked_sub(1)?).ok()?;
    game_seeds(master_seed).nth(index).map(|(_, seed)| seed)
}

/// Check that the configured game can be set up.
///
/// Setup faults do not depend on the dice, so one trial setup covers every
/// game of the run.
///
/// # Errors
///
/// Returns the first `SetupError` found.
pub fn validate(settings: &Settings) -> Result<(), SetupError> {
    Game::with_board(
        0,
        settings.simulation.seed,
        &settings.game,
        Board::new(&settings.game.mechanics),
        EventLog::disabled(),
    )?;
    Ok(())
}

/// Play one game to completion.
///
/// # Errors
///
/// Returns an error if the game cannot be set up.
pub fn run_game(number: u64, seed: u64, settings: &Settings) -> Result<GameResult, SetupError> {
    let log = if settings.simulation.keep_game_log {
        EventLog::new()
    } else {
        EventLog::disabled()
    };
    let mut game = Game::with_board(
        number,
        seed,
        &settings.game,
        Board::new(&settings.game.mechanics),
        log,
    )?;
    let outcome = game.play(settings.simulation.n_moves, settings.simulation.never_bankrupt_cash);

    let players: Vec<PlayerSummary> = game
        .players
        .iter()
        .enumerate()
        .map(|(id, player)| PlayerSummary {
            name: player.name.clone(),
            money: player.money,
            net_worth: game.net_worth(id, false),
            properties: player.owned.len(),
            is_bankrupt: player.is_bankrupt,
        })
        .collect();

    Ok(GameResult {
        number,
        seed,
        termination: outcome.termination,
        turns_played: outcome.turns_played,
        winner: winner(&players),
        players,
        bankruptcies: outcome.bankruptcies,
        log: std::mem::take(&mut game.log),
    })
}

/// The solvent player with the highest net worth, if unique.
fn winner(players: &[PlayerSummary]) -> Option<String> {
    let best = players
        .iter()
        .filter(|p| !p.is_bankrupt)
        .map(|p| p.net_worth)
        .max()?;
    let mut leaders = players.iter().filter(|p| !p.is_bankrupt && p.net_worth == best);
    let leader = leaders.next()?;
    leaders.next().is_none().then(|| leader.name.clone())
}

/// Run every game of the configured experiment.
///
/// Games run on a dedicated pool of `multi_process` threads (0 means one per
/// CPU). Finished logs go to a single writer thread that appends them to the
/// configured files and ticks the optional progress bar.
///
/// # Errors
///
/// Returns an error if the configuration cannot set up a game, the output
/// files cannot be written, or the pool cannot be built.
pub fn run_simulation(
    settings: &Settings,
    progress: Option<ProgressBar>,
) -> Result<SimulationReport, SimulationError> {
    validate(settings)?;
    let sim = &settings.simulation;
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(sim.multi_process)
        .build()?;

    let events_path = sim.keep_game_log.then_some(sim.events_log_path.as_path());
    let writer = LogWriter::spawn(events_path, &sim.bankruptcies_path, progress)?;
    let names: Vec<String> = settings.game.players.iter().map(|p| p.name.clone()).collect();
    let seeds: Vec<(u64, u64)> = game_seeds(sim.seed)
        .take(usize::try_from(sim.n_games).unwrap_or(usize::MAX))
        .collect();

    info!(
        "simulating {} games (seed {}, {} turn cap, {} threads)",
        sim.n_games,
        sim.seed,
        sim.n_moves,
        pool.current_num_threads()
    );
    let start = Instant::now();

    // Each thread accumulates into its own SimulationStats, merged at the end
    let sender = writer.sender();
    let stats = pool.install(|| {
        seeds
            .into_par_iter()
            .map_with(sender, |sender, (number, seed)| {
                let result = run_game(number, seed, settings);
                match &result {
                    Ok(game) => {
                        debug!(
                            "game {number} (seed {seed}) ended after {} turns: {}",
                            game.turns_played, game.termination
                        );
                        if sender.send(GameRecord::from_result(game)).is_err() {
                            warn!("game {number}: log writer is gone, output dropped");
                        }
                    }
                    Err(e) => warn!("game {number} (seed {seed}) failed setup: {e}"),
                }
                result
            })
            .fold(
                || SimulationStats::new(&names),
                |mut local, result| {
                    match result {
                        Ok(game) => local.add_result(&game),
                        Err(_) => local.games_failed += 1,
                    }
                    local
                },
            )
            .reduce(
                || SimulationStats::new(&names),
                |mut a, b| {
                    a.merge(&b);
                    a
                },
            )
    });

    writer.finish()?;
    let duration_secs = start.elapsed().as_secs_f64();
    info!(
        "finished {} games in {duration_secs:.2}s ({} failed)",
        stats.games_played, stats.games_failed
    );
    Ok(SimulationReport { stats, duration_secs })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PlayerSetup, StartingMoney};

    fn small_settings(dir: &std::path::Path) -> Settings {
        let mut settings = Settings::default();
        settings.simulation.n_games = 6;
        settings.simulation.n_moves = 60;
        settings.simulation.multi_process = 2;
        settings.simulation.events_log_path = dir.join("events.log");
        settings.simulation.bankruptcies_path = dir.join("bankruptcies.tsv");
        settings
    }

    #[test]
    fn test_game_seeds_are_stable_prefixes() {
        let short: Vec<_> = game_seeds(5).take(3).collect();
        let long: Vec<_> = game_seeds(5).take(10).collect();
        assert_eq!(short, long[..3]);
        assert_eq!(short[0].0, 1);
        assert_eq!(game_seed(5, 3), Some(short[2].1));
        assert_eq!(game_seed(5, 0), None);
        assert!(short.iter().all(|&(_, seed)| seed <= u64::from(u32::MAX)));
        assert_ne!(game_seeds(6).next(), game_seeds(5).next());
    }

    #[test]
    fn test_run_game_is_deterministic() {
        let settings = Settings::default();
        let a = run_game(1, 1234, &settings).unwrap();
        let b = run_game(1, 1234, &settings).unwrap();
        assert_eq!(a.log, b.log);
        assert_eq!(a.players, b.players);
        assert_eq!(a.bankruptcies, b.bankruptcies);
        assert_eq!(a.termination, b.termination);
        assert!(!a.log.is_empty());
    }

    #[test]
    fn test_run_game_without_log() {
        let mut settings = Settings::default();
        settings.simulation.keep_game_log = false;
        let result = run_game(1, 1234, &settings).unwrap();
        assert!(result.log.is_empty());
        assert_eq!(result.players.len(), 2);
    }

    #[test]
    fn test_run_game_setup_error() {
        let mut settings = Settings::default();
        settings.game.players = vec![PlayerSetup::new("Solo")];
        settings.game.starting_money = StartingMoney::Uniform(1500);
        settings.game.starting_properties.clear();
        assert_eq!(
            run_game(1, 0, &settings).unwrap_err(),
            SetupError::TooFewPlayers(1)
        );
        assert!(validate(&settings).is_err());
    }

    #[test]
    fn test_winner_needs_unique_leader() {
        let summary = |name: &str, net_worth, is_bankrupt| PlayerSummary {
            name: name.to_string(),
            money: 0,
            net_worth,
            properties: 0,
            is_bankrupt,
        };
        assert_eq!(
            winner(&[summary("A", 10, false), summary("B", 20, true)]),
            Some("A".to_string())
        );
        assert_eq!(winner(&[summary("A", 10, false), summary("B", 10, false)]), None);
        assert_eq!(winner(&[summary("A", 0, true), summary("B", 0, true)]), None);
    }

    #[test]
    fn test_simulation_writes_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let settings = small_settings(dir.path());
        let report = run_simulation(&settings, None).unwrap();
        assert_eq!(report.stats.games_played, 6);
        assert_eq!(report.stats.games_failed, 0);

        let events = std::fs::read_to_string(dir.path().join("events.log")).unwrap();
        for number in 1..=6 {
            assert!(events.contains(&format!("=== Game {number} (seed")));
        }
        let bankruptcies = std::fs::read_to_string(dir.path().join("bankruptcies.tsv")).unwrap();
        assert!(bankruptcies.starts_with("game\tplayer\tturn\n"));
        let recorded: u64 = report.stats.players.iter().map(|p| p.bankruptcies).sum();
        assert_eq!(bankruptcies.lines().count() as u64, recorded + 1);
    }

    #[test]
    fn test_simulation_matches_single_games() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = small_settings(dir.path());
        settings.simulation.keep_game_log = false;
        let report = run_simulation(&settings, None).unwrap();

        let mut expected = SimulationStats::new(&["Tom".to_string(), "Chunk".to_string()]);
        for (number, seed) in game_seeds(settings.simulation.seed).take(6) {
            expected.add_result(&run_game(number, seed, &settings).unwrap());
        }
        assert_eq!(report.stats, expected);
        assert!(!dir.path().join("events.log").exists());
    }

    #[test]
    fn test_simulation_rejects_bad_config() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = small_settings(dir.path());
        settings.game.starting_properties.insert("Nobody".to_string(), vec![1]);
        assert!(matches!(
            run_simulation(&settings, None),
            Err(SimulationError::Setup(SetupError::UnknownPlayer(_)))
        ));
    }
}
