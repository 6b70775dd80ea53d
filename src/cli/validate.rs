//! Configuration validation command implementation.

use super::CliError;
use monopoly_sim::config::StartingMoney;
use monopoly_sim::simulation::validate;
use monopoly_sim::{Board, Settings};
use std::path::Path;

/// Execute the validate command.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or describes a
/// game that cannot be set up.
pub(crate) fn execute(config: &Path) -> Result<(), CliError> {
    println!("Validating: {}", config.display());
    println!();

    let settings = Settings::load(config);
    print_check("TOML parses", settings.is_ok());
    let settings = settings?;

    let setup = validate(&settings);
    print_check("Game setup", setup.is_ok());
    setup?;

    let game = &settings.game;
    let sim = &settings.simulation;
    let board = Board::new(&game.mechanics);

    println!();
    println!("Summary:");
    println!(
        "  Games:        {} ({} turn cap, seed {}, {} threads)",
        sim.n_games, sim.n_moves, sim.seed, sim.multi_process
    );
    println!("  Dice:         {}d{}", game.mechanics.dice_count, game.mechanics.dice_sides);
    println!("  Free parking: {}", if game.mechanics.free_parking_money { "pot" } else { "off" });
    println!("  Shuffle:      {}", if game.shuffle_players { "yes" } else { "no" });
    println!("  Players:");
    for player in &game.players {
        let money = match &game.starting_money {
            StartingMoney::Uniform(amount) => *amount,
            StartingMoney::PerPlayer(amounts) => amounts.get(&player.name).copied().unwrap_or_default(),
        };
        let properties: Vec<&str> = game
            .starting_properties
            .get(&player.name)
            .into_iter()
            .flatten()
            .map(|&index| board.cell(index).name.as_str())
            .collect();
        println!("    {}: ${money}, floor ${}", player.name, player.policy.unspendable_cash);
        if !properties.is_empty() {
            println!("      starts with {}", properties.join(", "));
        }
    }

    println!();
    println!("Validation successful!");

    Ok(())
}

fn print_check(name: &str, ok: bool) {
    let status = if ok { "OK" } else { "FAILED" };
    let symbol = if ok { "✓" } else { "✗" };
    println!("  {symbol} {name}: {status}");
}
