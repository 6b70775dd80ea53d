//! Error types for game setup, configuration loading and simulation runs.
//!
//! Running out of money is not an error: it is a game state transition
//! (raise money, then bankruptcy). Everything here is a fault in the inputs
//! or the environment.

use std::io;
use std::path::PathBuf;

use crate::Money;

/// Fatal configuration fault detected while setting up a game.
///
/// A game that fails setup is never played: defaulting silently would
/// hide the mistake across thousands of playouts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    /// A board layout with no cells.
    #[error("board layout has no cells")]
    EmptyBoard,
    /// Fewer than two players configured.
    #[error("too few players: {0} (minimum 2)")]
    TooFewPlayers(usize),
    /// Two players share a name (names key all per-player settings).
    #[error("duplicate player name: {0}")]
    DuplicatePlayer(String),
    /// Dice shape cannot produce a roll.
    #[error("invalid dice: {count} dice with {sides} sides")]
    InvalidDice {
        /// Configured number of dice.
        count: u8,
        /// Configured number of sides per die.
        sides: u8,
    },
    /// Per-player starting money does not name this player.
    #[error("starting money missing for player {0}")]
    MissingStartingMoney(String),
    /// Starting money below zero.
    #[error("negative starting money for player {player}: {amount}")]
    NegativeStartingMoney {
        /// Player name.
        player: String,
        /// Configured amount.
        amount: Money,
    },
    /// A per-player setting names a player who is not in the game.
    #[error("unknown player {0} in starting configuration")]
    UnknownPlayer(String),
    /// A player policy value that the engine cannot honour.
    #[error("invalid policy for player {player}: {reason}")]
    InvalidPolicy {
        /// Player name.
        player: String,
        /// What is wrong with the policy.
        reason: String,
    },
    /// Starting property index past the end of the board.
    #[error("starting property {index} for {player} is outside the board (0..{board_size})")]
    PropertyOutOfRange {
        /// Player name.
        player: String,
        /// Configured cell index.
        index: usize,
        /// Number of cells on the board.
        board_size: usize,
    },
    /// Starting property index points at a non-property cell.
    #[error("starting cell {index} ({name}) for {player} is not a property")]
    NotAProperty {
        /// Player name.
        player: String,
        /// Configured cell index.
        index: usize,
        /// Name of the cell at that index.
        name: String,
    },
    /// The same property is granted more than once.
    #[error("property {name} is granted to both {first} and {second}")]
    PropertyGrantedTwice {
        /// Name of the property.
        name: String,
        /// Player who received it first.
        first: String,
        /// Player it was granted to again.
        second: String,
    },
}

/// Failure to read or parse a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// The file is not valid TOML for the settings schema.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        /// Path that was parsed.
        path: PathBuf,
        /// Underlying TOML error.
        source: toml::de::Error,
    },
}

/// Failure of a whole simulation run.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    /// The configuration cannot set up a game.
    #[error("game setup failed: {0}")]
    Setup(#[from] SetupError),
    /// Writing logs failed.
    #[error("log output failed: {0}")]
    Io(#[from] io::Error),
    /// The worker pool could not be created.
    #[error("thread pool creation failed: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    /// The log writer thread died before the run finished.
    #[error("log writer thread panicked")]
    WriterPanicked,
}
