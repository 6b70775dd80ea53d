//! monopoly-sim CLI - run Monopoly simulations from the command line.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod cli;

use clap::{Parser, Subcommand};
use log::LevelFilter;
use std::path::PathBuf;
use std::process::ExitCode;

/// monopoly-sim - A deterministic, parallel Monopoly simulator
#[derive(Parser, Debug)]
#[command(name = "monopoly-sim")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Increase diagnostic output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run many games in parallel and aggregate statistics
    Simulate(cli::simulate::SimulateArgs),

    /// Play a single game and print its narrative
    Run {
        /// Configuration file (TOML; defaults to the standard game)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Game number within the run; its seed is derived from the master seed
        #[arg(short, long, default_value = "1")]
        game: u64,

        /// Use this game seed directly instead of deriving it
        #[arg(short, long)]
        seed: Option<u64>,

        /// Maximum turns (default: from config)
        #[arg(short = 't', long)]
        max_turns: Option<u32>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Suppress the turn-by-turn narrative
        #[arg(short, long)]
        quiet: bool,
    },

    /// Check that a configuration file sets up a valid game
    Validate {
        /// Configuration file to validate
        #[arg(required = true)]
        config: PathBuf,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let result = match args.command {
        Commands::Simulate(simulate) => cli::simulate::execute(simulate),

        Commands::Run {
            config,
            game,
            seed,
            max_turns,
            format,
            quiet,
        } => cli::run::execute(config.as_deref(), game, seed, max_turns, format, quiet),

        Commands::Validate { config } => cli::validate::execute(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
