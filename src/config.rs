//! Simulation configuration.
//!
//! Every section deserialises with `#[serde(default)]`, so an empty TOML file
//! describes the standard two-player experiment. Settings are immutable once
//! loaded and are shared by reference into every game.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::Money;
use crate::board::Group;
use crate::error::{ConfigError, SetupError};

/// Apply a fractional rate to an amount, truncating toward zero.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn truncated_share(amount: Money, rate: f64) -> Money {
    (amount as f64 * rate) as Money
}

/// Rule constants shared by every game of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameMechanics {
    /// Houses in the bank at game start.
    pub available_houses: u32,
    /// Hotels in the bank at game start.
    pub available_hotels: u32,
    /// Paid when passing or landing on Go.
    pub salary: Money,
    /// Flat luxury tax.
    pub luxury_tax: Money,
    /// Income tax cap.
    pub income_tax: Money,
    /// Income tax as a share of net worth, when lower than the cap.
    pub income_tax_percentage: f64,
    /// Share of the base cost paid out when mortgaging.
    pub mortgage_value: f64,
    /// Extra share of the base cost charged when lifting a mortgage.
    pub mortgage_fee: f64,
    /// Fine paid on the third failed attempt to roll out of jail.
    pub exit_jail_fine: Money,
    /// House rule: payments to the bank go to a pot collected on Free Parking.
    pub free_parking_money: bool,
    /// Dice rolled per turn.
    pub dice_count: u8,
    /// Sides per die.
    pub dice_sides: u8,
}

impl Default for GameMechanics {
    fn default() -> Self {
        Self {
            available_houses: 36,
            available_hotels: 12,
            salary: 200,
            luxury_tax: 100,
            income_tax: 200,
            income_tax_percentage: 0.1,
            mortgage_value: 0.5,
            mortgage_fee: 0.1,
            exit_jail_fine: 50,
            free_parking_money: false,
            dice_count: 2,
            dice_sides: 6,
        }
    }
}

impl GameMechanics {
    /// Cash received for mortgaging a property of the given base cost.
    #[must_use]
    pub fn mortgage_amount(&self, cost_base: Money) -> Money {
        truncated_share(cost_base, self.mortgage_value)
    }

    /// Cash needed to lift the mortgage on a property of the given base cost.
    #[must_use]
    pub fn unmortgage_cost(&self, cost_base: Money) -> Money {
        truncated_share(cost_base, self.mortgage_value) + truncated_share(cost_base, self.mortgage_fee)
    }
}

/// Behaviour knobs for one player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerPolicy {
    /// Cash floor kept when buying, building, unmortgaging and trading.
    pub unspendable_cash: Money,
    /// Groups this player never buys into.
    pub ignore_property_groups: BTreeSet<Group>,
    /// Whether the player takes part in two-way trades.
    pub is_willing_to_make_trades: bool,
    /// Largest value gap (given minus received) this player accepts.
    pub trade_max_diff_absolute: Money,
    /// Largest value ratio (given over received) this player accepts.
    pub trade_max_diff_relative: f64,
}

impl Default for PlayerPolicy {
    fn default() -> Self {
        Self {
            unspendable_cash: 200,
            ignore_property_groups: BTreeSet::new(),
            is_willing_to_make_trades: false,
            trade_max_diff_absolute: 200,
            trade_max_diff_relative: 2.0,
        }
    }
}

/// A named seat at the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSetup {
    /// Unique player name; keys per-player starting money and properties.
    pub name: String,
    /// Behaviour policy.
    #[serde(default)]
    pub policy: PlayerPolicy,
}

impl PlayerSetup {
    /// Player with the default policy.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            policy: PlayerPolicy::default(),
        }
    }
}

/// Starting cash: one amount for everybody, or one per player name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StartingMoney {
    /// Same amount for every player.
    Uniform(Money),
    /// Amount keyed by player name; every player must be listed.
    PerPlayer(BTreeMap<String, Money>),
}

impl Default for StartingMoney {
    fn default() -> Self {
        Self::PerPlayer(BTreeMap::from([
            ("Tom".to_string(), 1000),
            ("Chunk".to_string(), 2500),
        ]))
    }
}

impl StartingMoney {
    /// Starting cash for a player.
    ///
    /// # Errors
    ///
    /// Returns `SetupError::MissingStartingMoney` if the player is not listed.
    pub fn for_player(&self, name: &str) -> Result<Money, SetupError> {
        match self {
            Self::Uniform(amount) => Ok(*amount),
            Self::PerPlayer(amounts) => amounts
                .get(name)
                .copied()
                .ok_or_else(|| SetupError::MissingStartingMoney(name.to_string())),
        }
    }
}

/// Everything needed to set up one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// Rule constants.
    pub mechanics: GameMechanics,
    /// Players in seating order (before shuffling).
    pub players: Vec<PlayerSetup>,
    /// Shuffle the seating order with the game's dice.
    pub shuffle_players: bool,
    /// Starting cash.
    pub starting_money: StartingMoney,
    /// Cell indices granted to each player before the first turn.
    pub starting_properties: BTreeMap<String, Vec<usize>>,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            mechanics: GameMechanics::default(),
            players: vec![PlayerSetup::new("Tom"), PlayerSetup::new("Chunk")],
            shuffle_players: true,
            starting_money: StartingMoney::default(),
            starting_properties: BTreeMap::from([
                ("Tom".to_string(), vec![1, 3, 5, 15, 25, 12]),
                ("Chunk".to_string(), vec![16, 18, 19, 11, 13, 14]),
            ]),
        }
    }
}

/// Parameters of a batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Number of games to play.
    pub n_games: u64,
    /// Turn cap per game.
    pub n_moves: u32,
    /// Master seed; per-game seeds are derived from it.
    pub seed: u64,
    /// Worker threads.
    pub multi_process: usize,
    /// A game ends once every solvent player holds more than this.
    pub never_bankrupt_cash: Money,
    /// Keep and persist the per-game narrative.
    pub keep_game_log: bool,
    /// Narrative output file.
    pub events_log_path: PathBuf,
    /// Bankruptcy records output file.
    pub bankruptcies_path: PathBuf,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            n_games: 10_000,
            n_moves: 1000,
            seed: 0,
            multi_process: 4,
            never_bankrupt_cash: 10_000,
            keep_game_log: true,
            events_log_path: PathBuf::from("events.log"),
            bankruptcies_path: PathBuf::from("bankruptcies.tsv"),
        }
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Batch run parameters.
    pub simulation: SimulationSettings,
    /// Per-game setup.
    pub game: GameSettings,
}

impl Settings {
    /// Load settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
