//! Run command implementation.

use super::output::{JsonGameResult, format_text};
use super::{CliError, OutputFormat, load_settings};
use monopoly_sim::simulation::{game_seed, run_game};
use std::path::Path;

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if the configuration is invalid.
pub(crate) fn execute(
    config: Option<&Path>,
    game: u64,
    seed: Option<u64>,
    max_turns: Option<u32>,
    format: OutputFormat,
    quiet: bool,
) -> Result<(), CliError> {
    let mut settings = load_settings(config)?;
    if let Some(turns) = max_turns {
        settings.simulation.n_moves = turns;
    }
    settings.simulation.keep_game_log = !quiet;

    // Same seed the game would get inside a full simulation run
    let seed = match seed {
        Some(seed) => seed,
        None => game_seed(settings.simulation.seed, game)
            .ok_or_else(|| CliError::new("Game numbers start at 1"))?,
    };

    let result = run_game(game, seed, &settings)?;

    if !quiet && format == OutputFormat::Text {
        print!("{}", result.log.to_text());
        println!();
    }

    // Output based on format
    match format {
        OutputFormat::Text => {
            print!("{}", format_text(&result));
        }
        OutputFormat::Json => {
            let json_result = JsonGameResult::from_game_result(&result);
            let json = serde_json::to_string_pretty(&json_result)
                .map_err(|e| CliError::new(format!("JSON serialization failed: {e}")))?;
            println!("{json}");
        }
    }

    Ok(())
}
