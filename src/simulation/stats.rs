//! Aggregate statistics over many games.

// Averages are reported as floats
#![allow(clippy::cast_precision_loss)]

use std::collections::BTreeMap;

use super::GameResult;
use crate::Money;
use crate::game::Termination;

/// Totals for one named player across a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerStats {
    /// Player name.
    pub name: String,
    /// Games won.
    pub wins: u64,
    /// Games in which the player went bankrupt.
    pub bankruptcies: u64,
    /// Sum of final cash.
    total_money: Money,
    /// Sum of final net worth.
    total_net_worth: Money,
}

impl PlayerStats {
    fn new(name: String) -> Self {
        Self {
            name,
            wins: 0,
            bankruptcies: 0,
            total_money: 0,
            total_net_worth: 0,
        }
    }
}

/// Simulation statistics for aggregated results.
///
/// Players are tracked by name, since seating order changes between games.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationStats {
    /// Total games played.
    pub games_played: u64,
    /// Games that failed setup.
    pub games_failed: u64,
    /// Games that ended without a unique leader.
    pub draws: u64,
    /// Count per termination reason.
    pub terminations: BTreeMap<Termination, u64>,
    /// Per-player totals, in configured order.
    pub players: Vec<PlayerStats>,
    /// Total turns across all games.
    total_turns: u64,
}

impl SimulationStats {
    /// Create empty stats for the named players.
    #[must_use]
    pub fn new(names: &[String]) -> Self {
        Self {
            games_played: 0,
            games_failed: 0,
            draws: 0,
            terminations: BTreeMap::new(),
            players: names.iter().cloned().map(PlayerStats::new).collect(),
            total_turns: 0,
        }
    }

    fn player_mut(&mut self, name: &str) -> Option<&mut PlayerStats> {
        self.players.iter_mut().find(|p| p.name == name)
    }

    /// Add a game result to the stats.
    pub fn add_result(&mut self, result: &GameResult) {
        self.games_played += 1;
        self.total_turns += u64::from(result.turns_played);
        *self.terminations.entry(result.termination).or_default() += 1;

        match &result.winner {
            Some(name) => {
                if let Some(player) = self.player_mut(name) {
                    player.wins += 1;
                }
            }
            None => self.draws += 1,
        }
        for summary in &result.players {
            if let Some(player) = self.player_mut(&summary.name) {
                player.total_money += summary.money;
                player.total_net_worth += summary.net_worth;
                if summary.is_bankrupt {
                    player.bankruptcies += 1;
                }
            }
        }
    }

    /// Merge stats gathered on another thread.
    pub fn merge(&mut self, other: &Self) {
        self.games_played += other.games_played;
        self.games_failed += other.games_failed;
        self.draws += other.draws;
        self.total_turns += other.total_turns;
        for (&termination, &count) in &other.terminations {
            *self.terminations.entry(termination).or_default() += count;
        }
        for theirs in &other.players {
            if let Some(mine) = self.player_mut(&theirs.name) {
                mine.wins += theirs.wins;
                mine.bankruptcies += theirs.bankruptcies;
                mine.total_money += theirs.total_money;
                mine.total_net_worth += theirs.total_net_worth;
            }
        }
    }

    fn per_game(&self, total: f64) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        total / self.games_played as f64
    }

    /// Games that ended for the given reason.
    #[must_use]
    pub fn termination_count(&self, termination: Termination) -> u64 {
        self.terminations.get(&termination).copied().unwrap_or(0)
    }

    /// Average game length in turns.
    #[must_use]
    pub fn avg_turns(&self) -> f64 {
        self.per_game(self.total_turns as f64)
    }

    /// Win rate for a player (0.0-1.0).
    #[must_use]
    pub fn win_rate(&self, player_idx: usize) -> f64 {
        self.players
            .get(player_idx)
            .map_or(0.0, |p| self.per_game(p.wins as f64))
    }

    /// Bankruptcy rate for a player (0.0-1.0).
    #[must_use]
    pub fn bankruptcy_rate(&self, player_idx: usize) -> f64 {
        self.players
            .get(player_idx)
            .map_or(0.0, |p| self.per_game(p.bankruptcies as f64))
    }

    /// Average final cash for a player.
    #[must_use]
    pub fn avg_money(&self, player_idx: usize) -> f64 {
        self.players
            .get(player_idx)
            .map_or(0.0, |p| self.per_game(p.total_money as f64))
    }

    /// Average final net worth for a player.
    #[must_use]
    pub fn avg_net_worth(&self, player_idx: usize) -> f64 {
        self.players
            .get(player_idx)
            .map_or(0.0, |p| self.per_game(p.total_net_worth as f64))
    }
}
