//! Output formatting utilities for CLI.

#![allow(clippy::cast_precision_loss)]

use monopoly_sim::Termination;
use monopoly_sim::simulation::{GameResult, SimulationReport, SimulationStats};
use serde::Serialize;
use std::fmt::Write;

const TERMINATIONS: [Termination; 3] = [
    Termination::LastPlayerStanding,
    Termination::AllRich,
    Termination::TurnLimit,
];

/// JSON-serializable game result.
#[derive(Debug, Serialize)]
pub(super) struct JsonGameResult {
    /// Game number.
    game: u64,
    /// Random seed used.
    seed: u64,
    /// Why the game ended.
    termination: Termination,
    /// Total turns played.
    turns_played: u32,
    /// Winner name (null if no unique leader).
    winner: Option<String>,
    /// Per-player results.
    players: Vec<JsonPlayerResult>,
}

/// JSON-serializable player result.
#[derive(Debug, Serialize)]
pub(super) struct JsonPlayerResult {
    /// Player name.
    name: String,
    /// Final cash.
    money: i64,
    /// Final net worth.
    net_worth: i64,
    /// Properties held.
    properties: usize,
    /// Turn of bankruptcy (null if solvent).
    bankrupt_turn: Option<u32>,
}

impl JsonGameResult {
    /// Create from a GameResult.
    pub(super) fn from_game_result(result: &GameResult) -> Self {
        Self {
            game: result.number,
            seed: result.seed,
            termination: result.termination,
            turns_played: result.turns_played,
            winner: result.winner.clone(),
            players: result
                .players
                .iter()
                .map(|p| JsonPlayerResult {
                    name: p.name.clone(),
                    money: p.money,
                    net_worth: p.net_worth,
                    properties: p.properties,
                    bankrupt_turn: result
                        .bankruptcies
                        .iter()
                        .find(|b| b.player == p.name)
                        .map(|b| b.turn),
                })
                .collect(),
        }
    }
}

/// Format a game result as human-readable text.
pub(super) fn format_text(result: &GameResult) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Game {} (seed: {})", result.number, result.seed);
    let _ = writeln!(output, "  Result: {}", result.termination);
    match &result.winner {
        Some(name) => {
            let _ = writeln!(output, "  Winner: {name}");
        }
        None => output.push_str("  Winner: none (tied)\n"),
    }
    let _ = writeln!(output, "  Turns: {}\n", result.turns_played);

    for player in &result.players {
        let _ = write!(
            output,
            "  {}: ${} cash, ${} net worth, {} properties",
            player.name, player.money, player.net_worth, player.properties
        );
        if let Some(record) = result.bankruptcies.iter().find(|b| b.player == player.name) {
            let _ = write!(output, " [bankrupt turn {}]", record.turn);
        }
        output.push('\n');
    }

    output
}

/// JSON-serializable simulation result.
#[derive(Debug, Serialize)]
pub(super) struct JsonSimulationResult {
    /// Total games played.
    games_played: u64,
    /// Games that failed setup.
    games_failed: u64,
    /// Games without a unique leader.
    draws: u64,
    /// Count per termination reason.
    terminations: Vec<JsonTermination>,
    /// Average game length in turns.
    avg_turns: f64,
    /// Per-player statistics.
    players: Vec<JsonSimulationPlayer>,
    /// Wall-clock duration in seconds.
    duration_secs: f64,
}

/// JSON-serializable termination count.
#[derive(Debug, Serialize)]
pub(super) struct JsonTermination {
    /// Termination reason.
    reason: Termination,
    /// Number of games.
    games: u64,
}

/// JSON-serializable per-player simulation stats.
#[derive(Debug, Serialize)]
pub(super) struct JsonSimulationPlayer {
    /// Player name.
    name: String,
    /// Number of wins.
    wins: u64,
    /// Win rate (0.0-1.0).
    win_rate: f64,
    /// Number of bankruptcies.
    bankruptcies: u64,
    /// Bankruptcy rate (0.0-1.0).
    bankruptcy_rate: f64,
    /// Average final cash.
    avg_money: f64,
    /// Average final net worth.
    avg_net_worth: f64,
}

impl JsonSimulationResult {
    /// Create from a finished run.
    pub(super) fn from_report(report: &SimulationReport) -> Self {
        let stats = &report.stats;
        let players = stats
            .players
            .iter()
            .enumerate()
            .map(|(i, p)| JsonSimulationPlayer {
                name: p.name.clone(),
                wins: p.wins,
                win_rate: stats.win_rate(i),
                bankruptcies: p.bankruptcies,
                bankruptcy_rate: stats.bankruptcy_rate(i),
                avg_money: stats.avg_money(i),
                avg_net_worth: stats.avg_net_worth(i),
            })
            .collect();

        Self {
            games_played: stats.games_played,
            games_failed: stats.games_failed,
            draws: stats.draws,
            terminations: TERMINATIONS
                .iter()
                .map(|&reason| JsonTermination {
                    reason,
                    games: stats.termination_count(reason),
                })
                .collect(),
            avg_turns: stats.avg_turns(),
            players,
            duration_secs: report.duration_secs,
        }
    }
}

fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Format simulation stats as human-readable text.
pub(super) fn format_simulation_text(stats: &SimulationStats) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Simulation Results ({} games)", stats.games_played);
    output.push_str("========================================\n\n");

    output.push_str("Game Endings:\n");
    for reason in TERMINATIONS {
        let count = stats.termination_count(reason);
        let _ = writeln!(
            output,
            "  {reason}: {count} ({:.1}%)",
            percent(count, stats.games_played)
        );
    }
    if stats.games_failed > 0 {
        let _ = writeln!(output, "  failed setup: {}", stats.games_failed);
    }

    output.push_str("\nWin Rates:\n");
    for (i, player) in stats.players.iter().enumerate() {
        let _ = writeln!(
            output,
            "  {}: {:.1}% ({} wins)",
            player.name,
            stats.win_rate(i) * 100.0,
            player.wins
        );
    }
    let _ = writeln!(
        output,
        "  No winner: {} ({:.1}%)",
        stats.draws,
        percent(stats.draws, stats.games_played)
    );

    output.push_str("\nBankruptcies:\n");
    for (i, player) in stats.players.iter().enumerate() {
        let _ = writeln!(
            output,
            "  {}: {} ({:.1}%)",
            player.name,
            player.bankruptcies,
            stats.bankruptcy_rate(i) * 100.0
        );
    }

    output.push_str("\nAverage Final Standing:\n");
    for (i, player) in stats.players.iter().enumerate() {
        let _ = writeln!(
            output,
            "  {}: ${:.0} cash, ${:.0} net worth",
            player.name,
            stats.avg_money(i),
            stats.avg_net_worth(i)
        );
    }

    let _ = writeln!(output, "\nAverage Game Length: {:.0} turns", stats.avg_turns());

    output
}

/// Format simulation stats as CSV.
pub(super) fn format_simulation_csv(stats: &SimulationStats) -> String {
    let mut output = String::new();

    // Header
    output.push_str("player,wins,win_rate,bankruptcies,bankruptcy_rate,avg_money,avg_net_worth\n");

    // Data rows
    for (i, player) in stats.players.iter().enumerate() {
        let _ = writeln!(
            output,
            "{},{},{:.4},{},{:.4},{:.2},{:.2}",
            player.name,
            player.wins,
            stats.win_rate(i),
            player.bankruptcies,
            stats.bankruptcy_rate(i),
            stats.avg_money(i),
            stats.avg_net_worth(i)
        );
    }

    output
}
