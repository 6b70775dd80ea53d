//! Single-game engine.
//!
//! A `Game` owns its board, dice, players and narrative log. Everything a
//! game does is driven by its own seeded dice, so a (settings, seed) pair
//! replays bit for bit.
//!
//! The turn state machine, liquidity, development and trading live in
//! submodules as further `impl Game` blocks.

mod card_effects;
mod development;
pub mod invariants;
mod money;
mod player;
mod trade;
mod turn;

pub use money::Payee;
pub use player::{Player, PlayerId, RentNote};

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::Money;
use crate::board::Board;
use crate::config::{GameMechanics, GameSettings, StartingMoney, truncated_share};
use crate::dice::Dice;
use crate::error::SetupError;
use crate::events::{BankruptcyRecord, EventLog};

/// Detailed player summaries are logged on turns 1, 11, 21, ...
const STATE_LOG_INTERVAL: u32 = 10;

/// How a player's move (or part of it) ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveResult {
    /// Keep resolving the current roll.
    Continue,
    /// The move is over.
    EndMove,
    /// The player went bankrupt.
    Bankrupt,
}

/// Why a game stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// Fewer than two solvent players remain.
    LastPlayerStanding,
    /// Every solvent player holds more than the never-bankrupt threshold.
    AllRich,
    /// The turn cap was reached.
    TurnLimit,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::LastPlayerStanding => "last player standing",
            Self::AllRich => "all rich",
            Self::TurnLimit => "turn limit",
        };
        f.write_str(text)
    }
}

/// Result of playing a game to the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameOutcome {
    /// Why the game stopped.
    pub termination: Termination,
    /// Last turn on which moves were made.
    pub turns_played: u32,
    /// Bankruptcies in the order they happened.
    pub bankruptcies: Vec<BankruptcyRecord>,
}

/// One game in progress.
#[derive(Debug, Clone)]
pub struct Game {
    number: u64,
    seed: u64,
    /// Board state.
    pub board: Board,
    /// Players in seating order (after any shuffle).
    pub players: Vec<Player>,
    dice: Dice,
    mechanics: GameMechanics,
    /// Narrative of everything that happened.
    pub log: EventLog,
    turn: u32,
}

impl Game {
    /// Set up a game on the standard board.
    ///
    /// # Errors
    ///
    /// Returns a `SetupError` if the settings cannot describe a valid game.
    pub fn new(number: u64, seed: u64, settings: &GameSettings) -> Result<Self, SetupError> {
        Self::with_board(
            number,
            seed,
            settings,
            Board::new(&settings.mechanics),
            EventLog::new(),
        )
    }

    /// Set up a game on a given board, logging into `log`.
    ///
    /// Setup order: shuffle Chance then Community Chest, seat (and optionally
    /// shuffle) the players, hand out cash, then grant starting properties.
    ///
    /// # Errors
    ///
    /// Returns a `SetupError` if the settings cannot describe a valid game.
    pub fn with_board(
        number: u64,
        seed: u64,
        settings: &GameSettings,
        mut board: Board,
        log: EventLog,
    ) -> Result<Self, SetupError> {
        validate_players(settings)?;
        let mechanics = settings.mechanics;

        let mut dice = Dice::new(seed, mechanics.dice_count, mechanics.dice_sides);
        dice.shuffle(board.chance.cards_mut());
        dice.shuffle(board.chest.cards_mut());

        let mut players: Vec<Player> = settings
            .players
            .iter()
            .map(|setup| Player::new(setup.name.clone(), setup.policy.clone()))
            .collect();
        if settings.shuffle_players {
            dice.shuffle(&mut players);
        }
        for player in &mut players {
            let amount = settings.starting_money.for_player(&player.name)?;
            if amount < 0 {
                return Err(SetupError::NegativeStartingMoney {
                    player: player.name.clone(),
                    amount,
                });
            }
            player.money = amount;
        }

        let mut game = Self {
            number,
            seed,
            board,
            players,
            dice,
            mechanics,
            log,
            turn: 0,
        };
        game.log.add(format!("=== Game {number} (seed {seed}) ==="));
        game.grant_starting_properties(settings)?;
        let order: Vec<&str> = game.players.iter().map(|p| p.name.as_str()).collect();
        game.log.add(format!("Players in order: {}", order.join(", ")));
        Ok(game)
    }

    fn grant_starting_properties(&mut self, settings: &GameSettings) -> Result<(), SetupError> {
        for id in 0..self.players.len() {
            let name = self.players[id].name.clone();
            let Some(cells) = settings.starting_properties.get(&name) else {
                continue;
            };
            for &index in cells {
                if index >= self.board.size() {
                    return Err(SetupError::PropertyOutOfRange {
                        player: name,
                        index,
                        board_size: self.board.size(),
                    });
                }
                let cell_name = self.board.cell(index).name.clone();
                let Some(property) = self.board.property(index) else {
                    return Err(SetupError::NotAProperty {
                        player: name,
                        index,
                        name: cell_name,
                    });
                };
                if let Some(first) = property.owner {
                    return Err(SetupError::PropertyGrantedTwice {
                        name: cell_name,
                        first: self.players[first].name.clone(),
                        second: name,
                    });
                }
                self.assign_property(id, index);
            }
        }
        Ok(())
    }

    /// Give an unowned property to a player outside of play (setup, tests).
    pub fn assign_property(&mut self, id: PlayerId, index: usize) {
        let Some(property) = self.board.property_mut(index) else {
            return;
        };
        property.owner = Some(id);
        self.players[id].owned.push(index);
        self.board.recalculate_monopoly_multipliers(index);
        self.refresh_trade_lists();
        let line = format!("{} receives {}", self.players[id].name, self.board.cell(index));
        self.log.add(line);
    }

    /// Game number within its run (1-based).
    #[must_use]
    pub fn number(&self) -> u64 {
        self.number
    }

    /// Seed of this game's dice.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Current turn (0 before the first turn).
    #[must_use]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Rule constants in force.
    #[must_use]
    pub fn mechanics(&self) -> &GameMechanics {
        &self.mechanics
    }

    fn solvent_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| !p.is_bankrupt)
    }

    /// Play turns until a termination condition or the turn cap.
    pub fn play(&mut self, max_turns: u32, never_bankrupt_cash: Money) -> GameOutcome {
        let mut bankruptcies = Vec::new();
        let mut recorded: Vec<bool> = self.players.iter().map(|p| p.is_bankrupt).collect();
        let mut termination = None;
        let mut turns_played = 0;

        for turn in 1..=max_turns {
            self.turn = turn;
            self.log.add(format!("=== Game {}, turn {turn} ===", self.number));
            if let Some(reason) = self.check_end_conditions(never_bankrupt_cash) {
                termination = Some(reason);
                break;
            }
            if turn % STATE_LOG_INTERVAL == 1 {
                self.log_players_state();
            }
            for id in 0..self.players.len() {
                if self.players[id].is_bankrupt {
                    continue;
                }
                self.make_a_move(id);
                self.collect_bankruptcies(&mut recorded, &mut bankruptcies);
                invariants::assert_invariants(self);
            }
            turns_played = turn;
        }

        let termination = termination.unwrap_or(Termination::TurnLimit);
        self.log_board_map();
        self.log.add(format!(
            "Game {} finished after {turns_played} turns: {termination}",
            self.number
        ));
        GameOutcome {
            termination,
            turns_played,
            bankruptcies,
        }
    }

    fn collect_bankruptcies(&self, recorded: &mut [bool], out: &mut Vec<BankruptcyRecord>) {
        for (player, done) in self.players.iter().zip(recorded.iter_mut()) {
            if player.is_bankrupt && !*done {
                *done = true;
                out.push(BankruptcyRecord {
                    game: self.number,
                    player: player.name.clone(),
                    turn: self.turn,
                });
            }
        }
    }

    /// Check whether the game is over, logging the reason if it is.
    pub fn check_end_conditions(&mut self, never_bankrupt_cash: Money) -> Option<Termination> {
        let alive = self.solvent_players().count();
        if alive < 2 {
            let noun = if alive == 1 { "player remains" } else { "players remain" };
            self.log.add(format!("Only {alive} alive {noun}, game over"));
            return Some(Termination::LastPlayerStanding);
        }
        if self.solvent_players().all(|p| p.money > never_bankrupt_cash) {
            self.log.add(format!(
                "All alive players have more than ${never_bankrupt_cash}, game over (all rich)"
            ));
            return Some(Termination::AllRich);
        }
        None
    }

    /// Net worth: cash plus property and improvement costs.
    ///
    /// Mortgaged properties count at cost less the mortgage value, or at full
    /// cost when `mortgaged_at_full_value` is set (the income tax basis).
    #[must_use]
    pub fn net_worth(&self, id: PlayerId, mortgaged_at_full_value: bool) -> Money {
        let player = &self.players[id];
        let holdings: Money = player
            .owned
            .iter()
            .filter_map(|&index| self.board.property(index))
            .map(|property| {
                let base = if property.mortgaged && !mortgaged_at_full_value {
                    truncated_share(property.cost_base, 1.0 - self.mechanics.mortgage_value)
                } else {
                    property.cost_base
                };
                base + property.cost_house * Money::from(property.improvement_level())
            })
            .sum();
        player.money + holdings
    }

    fn log_players_state(&mut self) {
        let mut lines = Vec::with_capacity(self.players.len());
        for (id, player) in self.players.iter().enumerate() {
            let mut line = format!(
                "- {}: ${}, net worth ${}, at {} ({})",
                player.name,
                player.money,
                self.net_worth(id, false),
                self.board.cell(player.position),
                player.position
            );
            if player.in_jail {
                line.push_str(", in jail");
            }
            if player.is_bankrupt {
                line.push_str(", bankrupt");
            }
            lines.push(line);
        }
        for line in lines {
            self.log.add(line);
        }
    }

    fn log_board_map(&mut self) {
        let mut lines = Vec::new();
        for cell in self.board.cells() {
            let Some(property) = cell.property() else {
                continue;
            };
            let owner = property
                .owner
                .map_or("None", |id| self.players[id].name.as_str());
            let improvements = match (property.hotel, property.houses) {
                (true, _) => "hotel".to_string(),
                (false, 0) => "none".to_string(),
                (false, 1) => "1 house".to_string(),
                (false, n) => format!("{n} houses"),
            };
            let mut line = format!(
                "- {cell}, Owner: {owner}, Rent multiplier: {}, Improvements: {improvements}",
                property.monopoly_multiplier()
            );
            if property.mortgaged {
                line.push_str(", mortgaged");
            }
            lines.push(line);
        }
        for line in lines {
            self.log.add(line);
        }
    }
}

fn validate_players(settings: &GameSettings) -> Result<(), SetupError> {
    let players = &settings.players;
    if players.len() < 2 {
        return Err(SetupError::TooFewPlayers(players.len()));
    }
    let mut names = BTreeSet::new();
    for setup in players {
        if !names.insert(setup.name.as_str()) {
            return Err(SetupError::DuplicatePlayer(setup.name.clone()));
        }
        if setup.policy.unspendable_cash < 0 {
            return Err(SetupError::InvalidPolicy {
                player: setup.name.clone(),
                reason: format!("negative unspendable cash {}", setup.policy.unspendable_cash),
            });
        }
    }

    let mechanics = &settings.mechanics;
    if mechanics.dice_count == 0 || mechanics.dice_sides == 0 {
        return Err(SetupError::InvalidDice {
            count: mechanics.dice_count,
            sides: mechanics.dice_sides,
        });
    }

    if let StartingMoney::PerPlayer(amounts) = &settings.starting_money
        && let Some(unknown) = amounts.keys().find(|name| !names.contains(name.as_str()))
    {
        return Err(SetupError::UnknownPlayer(unknown.clone()));
    }
    if let Some(unknown) = settings
        .starting_properties
        .keys()
        .find(|name| !names.contains(name.as_str()))
    {
        return Err(SetupError::UnknownPlayer(unknown.clone()));
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Fixtures shared by the engine's unit tests.

    use super::*;
    use crate::config::{PlayerSetup, StartingMoney};

    /// Two players, no shuffling, no starting properties, $1500 each.
    pub(crate) fn settings(names: &[&str]) -> GameSettings {
        GameSettings {
            players: names.iter().map(|n| PlayerSetup::new(*n)).collect(),
            shuffle_players: false,
            starting_money: StartingMoney::Uniform(1500),
            starting_properties: std::collections::BTreeMap::new(),
            ..GameSettings::default()
        }
    }

    /// Game on the standard board with plain settings.
    pub(crate) fn game(names: &[&str]) -> Game {
        Game::new(1, 7, &settings(names)).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{game, settings};
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_setup_defaults() {
        let game = Game::new(1, 0, &GameSettings::default()).unwrap();
        assert_eq!(game.players.len(), 2);
        let tom = game.players.iter().find(|p| p.name == "Tom").unwrap();
        let chunk = game.players.iter().find(|p| p.name == "Chunk").unwrap();
        assert_eq!(tom.money, 1000);
        assert_eq!(chunk.money, 2500);
        assert_eq!(tom.owned, vec![1, 3, 5, 15, 25, 12]);
        assert_eq!(chunk.owned, vec![16, 18, 19, 11, 13, 14]);
        // Tom holds both browns, Chunk holds orange and pink
        assert_eq!(game.board.property(1).unwrap().monopoly_multiplier(), 2);
        assert_eq!(game.board.property(5).unwrap().monopoly_multiplier(), 4);
        assert_eq!(game.board.property(16).unwrap().monopoly_multiplier(), 2);
        assert_eq!(game.board.property(12).unwrap().monopoly_multiplier(), 4);
    }

    #[test]
    fn test_setup_errors() {
        let mut bad = settings(&["Solo"]);
        assert_eq!(Game::new(1, 0, &bad).unwrap_err(), SetupError::TooFewPlayers(1));

        bad = settings(&["A", "A"]);
        assert_eq!(
            Game::new(1, 0, &bad).unwrap_err(),
            SetupError::DuplicatePlayer("A".to_string())
        );

        bad = settings(&["A", "B"]);
        bad.mechanics.dice_sides = 0;
        assert!(matches!(Game::new(1, 0, &bad), Err(SetupError::InvalidDice { .. })));

        bad = settings(&["A", "B"]);
        bad.starting_properties.insert("C".to_string(), vec![1]);
        assert_eq!(Game::new(1, 0, &bad).unwrap_err(), SetupError::UnknownPlayer("C".to_string()));

        bad = settings(&["A", "B"]);
        bad.starting_properties.insert("A".to_string(), vec![40]);
        assert!(matches!(
            Game::new(1, 0, &bad),
            Err(SetupError::PropertyOutOfRange { index: 40, .. })
        ));

        bad = settings(&["A", "B"]);
        bad.starting_properties.insert("A".to_string(), vec![2]);
        assert!(matches!(Game::new(1, 0, &bad), Err(SetupError::NotAProperty { index: 2, .. })));

        bad = settings(&["A", "B"]);
        bad.starting_properties.insert("A".to_string(), vec![1]);
        bad.starting_properties.insert("B".to_string(), vec![1]);
        assert!(matches!(
            Game::new(1, 0, &bad),
            Err(SetupError::PropertyGrantedTwice { .. })
        ));

        bad = settings(&["A", "B"]);
        bad.starting_money = StartingMoney::PerPlayer(BTreeMap::from([("A".to_string(), 100)]));
        assert_eq!(
            Game::new(1, 0, &bad).unwrap_err(),
            SetupError::MissingStartingMoney("B".to_string())
        );

        bad = settings(&["A", "B"]);
        bad.players[1].policy.unspendable_cash = -1;
        assert!(matches!(Game::new(1, 0, &bad), Err(SetupError::InvalidPolicy { .. })));
    }

    #[test]
    fn test_same_seed_same_setup() {
        let settings = GameSettings::default();
        let a = Game::new(1, 99, &settings).unwrap();
        let b = Game::new(1, 99, &settings).unwrap();
        assert_eq!(a.board.chance, b.board.chance);
        assert_eq!(a.board.chest, b.board.chest);
        assert_eq!(a.players, b.players);
    }

    #[test]
    fn test_end_when_one_player_left() {
        let mut game = game(&["A", "B"]);
        game.players[1].is_bankrupt = true;
        game.players[1].money = 0;
        assert_eq!(game.check_end_conditions(10_000), Some(Termination::LastPlayerStanding));
        assert!(game.log.lines().last().unwrap().contains("Only 1 alive player remains"));
    }

    #[test]
    fn test_end_when_all_rich() {
        let mut game = game(&["A", "B"]);
        assert_eq!(game.check_end_conditions(10_000), None);
        game.players[0].money = 10_001;
        assert_eq!(game.check_end_conditions(10_000), None);
        game.players[1].money = 20_000;
        assert_eq!(game.check_end_conditions(10_000), Some(Termination::AllRich));
    }

    #[test]
    fn test_play_stops_at_turn_cap() {
        let mut game = game(&["A", "B"]);
        let outcome = game.play(3, 1_000_000);
        assert_eq!(outcome.turns_played, 3);
        assert_eq!(outcome.termination, Termination::TurnLimit);
        assert!(game.log.lines().iter().any(|l| l.contains("Owner:")));
    }

    #[test]
    fn test_end_conditions_checked_only_at_turn_start() {
        // Both players already above the threshold, but no turn is played
        let mut capped = game(&["A", "B"]);
        let outcome = capped.play(0, 1499);
        assert_eq!(outcome.turns_played, 0);
        assert_eq!(outcome.termination, Termination::TurnLimit);
        assert!(!capped.log.lines().iter().any(|l| l.contains("game over")));

        let mut rich = game(&["A", "B"]);
        let outcome = rich.play(5, 1499);
        assert_eq!(outcome.turns_played, 0);
        assert_eq!(outcome.termination, Termination::AllRich);
    }

    #[test]
    fn test_net_worth() {
        let mut game = game(&["A", "B"]);
        game.assign_property(0, 1);
        game.assign_property(0, 3);
        game.board.property_mut(1).unwrap().houses = 2;
        game.board.property_mut(3).unwrap().mortgaged = true;
        // 1500 + 60 + 2 * 50 + 30 (mortgaged at half)
        assert_eq!(game.net_worth(0, false), 1690);
        assert_eq!(game.net_worth(0, true), 1720);
    }
}
