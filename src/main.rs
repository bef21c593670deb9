//! Robo Duel CLI - play, replay and inspect robot duels.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Robo Duel - a turn-based robot duel in a 3D arena
#[derive(Parser, Debug)]
#[command(name = "robo-duel")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play a match, reading commands from stdin or a script
    Play {
        /// Robot roster file (`name hp armor` per line)
        #[arg(long, default_value = "datafiles/robots.txt")]
        robots: PathBuf,

        /// Weapon roster file (`name sigma` per line)
        #[arg(long, default_value = "datafiles/weapons.txt")]
        weapons: PathBuf,

        /// Settings file (minimum dimension, fill coefficient, save file)
        #[arg(long, default_value = "datafiles/config.txt")]
        config: PathBuf,

        /// Random seed (default: time based)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Arena width, length and height (skips the dimension prompt)
        #[arg(long, num_args = 3, value_names = ["W", "L", "H"])]
        dims: Option<Vec<u32>>,

        /// Read all input from this file instead of stdin
        #[arg(long)]
        script: Option<PathBuf>,

        /// Override the history file from the settings
        #[arg(long)]
        save: Option<PathBuf>,

        /// Override the minimum arena dimension
        #[arg(long)]
        min_dimension: Option<u32>,

        /// Override the item fill coefficient
        #[arg(long)]
        fill: Option<f64>,
    },

    /// Print a saved match history
    Replay {
        /// History file written by `play`
        #[arg(required = true)]
        file: PathBuf,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::ReplayFormat,
    },

    /// Validate and list the robot and weapon rosters
    Roster {
        /// Robot roster file
        #[arg(long, default_value = "datafiles/robots.txt")]
        robots: PathBuf,

        /// Weapon roster file
        #[arg(long, default_value = "datafiles/weapons.txt")]
        weapons: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let result = match args.command {
        Commands::Play {
            robots,
            weapons,
            config,
            seed,
            dims,
            script,
            save,
            min_dimension,
            fill,
        } => cli::play::execute(&cli::play::PlayOptions {
            robots,
            weapons,
            config,
            seed,
            dims,
            script,
            save,
            min_dimension,
            fill,
        }),

        Commands::Replay { file, format } => cli::replay::execute(&file, format),

        Commands::Roster { robots, weapons } => cli::roster::execute(&robots, &weapons),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
