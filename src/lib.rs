// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! monopoly-sim: a deterministic Monopoly simulator for gathering playout statistics.
//!
//! This crate provides a single-game engine and a parallel runner designed for:
//! - Bit-exact reproducible games from a seed
//! - Thousands of independent playouts across a thread pool
//! - Auditable per-game narrative logs
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Simulation Runner (rayon + log    │
//! │   writer thread)                    │
//! ├─────────────────────────────────────┤
//! │   Game loop / Player state machine  │
//! ├─────────────────────────────────────┤
//! │   Board · Decks · Dice · Config     │
//! └─────────────────────────────────────┘
//! ```

pub mod board;
pub mod cards;
pub mod config;
pub mod dice;
pub mod error;
pub mod events;
pub mod game;
pub mod simulation;

pub use error::{ConfigError, SetupError, SimulationError};

// Re-export key game types at crate root for convenience
pub use board::{Board, Cell, CellKind, Group, Property};
pub use cards::{Card, CardEffect, Deck, DeckKind};
pub use config::{GameMechanics, GameSettings, PlayerPolicy, Settings, SimulationSettings};
pub use dice::{Dice, Roll};
pub use events::{BankruptcyRecord, EventLog};
pub use game::{Game, MoveResult, Payee, Player, PlayerId, Termination};

/// Whole currency units. Percentages of money always truncate toward zero.
pub type Money = i64;
