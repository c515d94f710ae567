//! LEADERS CLI - Command-line interface
//!
//! Commands:
//! - match: AI-vs-AI games from a scenario
//! - scenario: Write a default or random scenario file
//! - show: Print a scenario's board and a piece's options

mod match_cmd;
mod scenario_cmd;
mod show_cmd;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use leaders_core::Difficulty;

#[derive(Parser)]
#[command(name = "leaders")]
#[command(about = "LEADERS hex tactics engine and AI")]
struct Cli {
    /// Seed for reproducible runs
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play AI-vs-AI games
    Match(match_cmd::MatchArgs),
    /// Write a scenario file
    Scenario(scenario_cmd::ScenarioArgs),
    /// Show a scenario's board
    Show(show_cmd::ShowArgs),
}

/// AI strength on the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Level {
    Easy,
    Hard,
}

impl From<Level> for Difficulty {
    fn from(level: Level) -> Self {
        match level {
            Level::Easy => Difficulty::Easy,
            Level::Hard => Difficulty::Hard,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Match(args) => match_cmd::run(args, cli.seed),
        Commands::Scenario(args) => scenario_cmd::run(args, cli.seed),
        Commands::Show(args) => show_cmd::run(args),
    }
}
