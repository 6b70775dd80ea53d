//! Simulate command implementation.

use super::output::{JsonSimulationResult, format_simulation_csv, format_simulation_text};
use super::{CliError, SimulateFormat, load_settings};
use indicatif::{ProgressBar, ProgressStyle};
use monopoly_sim::simulation::run_simulation;
use std::path::PathBuf;

/// Arguments of the `simulate` command. Unset options keep the config value.
#[derive(clap::Args, Debug)]
pub(crate) struct SimulateArgs {
    /// Configuration file (TOML; defaults to the standard game)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of games to run
    #[arg(short, long)]
    games: Option<u64>,

    /// Master seed (per-game seeds derive from it)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Parallel threads (0 = CPU count)
    #[arg(short = 'j', long)]
    threads: Option<usize>,

    /// Maximum turns per game
    #[arg(short = 't', long)]
    max_turns: Option<u32>,

    /// Game narrative output file
    #[arg(long)]
    events_log: Option<PathBuf>,

    /// Bankruptcy records output file
    #[arg(long)]
    bankruptcies: Option<PathBuf>,

    /// Do not keep per-game narratives
    #[arg(long)]
    no_game_log: bool,

    /// Output format: text, json, or csv
    #[arg(short, long, default_value = "text")]
    format: SimulateFormat,

    /// Show progress bar
    #[arg(short, long)]
    progress: bool,
}

/// Execute the simulate command.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or output cannot be written.
pub(crate) fn execute(args: SimulateArgs) -> Result<(), CliError> {
    let mut settings = load_settings(args.config.as_deref())?;
    let sim = &mut settings.simulation;
    if let Some(games) = args.games {
        sim.n_games = games;
    }
    if let Some(seed) = args.seed {
        sim.seed = seed;
    }
    if let Some(threads) = args.threads {
        sim.multi_process = threads;
    }
    if let Some(max_turns) = args.max_turns {
        sim.n_moves = max_turns;
    }
    if let Some(path) = args.events_log {
        sim.events_log_path = path;
    }
    if let Some(path) = args.bankruptcies {
        sim.bankruptcies_path = path;
    }
    if args.no_game_log {
        sim.keep_game_log = false;
    }

    // Progress bar
    let pb = if args.progress {
        let pb = ProgressBar::new(sim.n_games);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} games ({per_sec})")
                .map_err(|e| CliError::new(format!("Invalid progress template: {e}")))?
                .progress_chars("=>-"),
        );
        Some(pb)
    } else {
        None
    };

    let report = run_simulation(&settings, pb)?;

    // Output based on format
    match args.format {
        SimulateFormat::Text => {
            println!();
            print!("{}", format_simulation_text(&report.stats));
            println!();
            println!(
                "Duration: {:.2}s ({:.0} games/sec)",
                report.duration_secs,
                report.games_per_sec()
            );
            if settings.simulation.keep_game_log {
                println!("Game logs: {}", settings.simulation.events_log_path.display());
            }
            println!("Bankruptcies: {}", settings.simulation.bankruptcies_path.display());
        }
        SimulateFormat::Json => {
            let json_result = JsonSimulationResult::from_report(&report);
            let json = serde_json::to_string_pretty(&json_result)
                .map_err(|e| CliError::new(format!("JSON serialization failed: {e}")))?;
            println!("{json}");
        }
        SimulateFormat::Csv => {
            print!("{}", format_simulation_csv(&report.stats));
        }
    }

    Ok(())
}
