//! Command-line interface for twenty_questions.

use clap::{Parser, Subcommand};
use twenty_questions::StrategyVersion;

/// Twenty Questions - LLM guessing games and batch evaluation
#[derive(Parser, Debug)]
#[command(name = "twenty_questions")]
#[command(about = "LLM-driven twenty questions engine", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,

    /// Path to an oracle settings TOML file (provider, model, max_tokens)
    #[arg(long, global = true)]
    pub oracle_config: Option<std::path::PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a single game and print the transcript
    Play {
        /// Secret topic. Drawn at random from the stock pool if omitted.
        #[arg(short, long)]
        topic: Option<String>,

        /// Question budget for the guesser
        #[arg(short, long, default_value = "20")]
        max_questions: u32,

        /// Guesser strategy version
        #[arg(short, long, value_enum, default_value_t = StrategyVersion::V3)]
        strategy: StrategyVersion,
    },

    /// Run a batch evaluation over a topics file and print metrics
    Eval {
        /// File with one topic per line
        #[arg(short, long)]
        topics: std::path::PathBuf,

        /// Games per topic
        #[arg(short, long, default_value = "1")]
        num_runs: u32,

        /// Question budget per game
        #[arg(short, long, default_value = "20")]
        max_questions: u32,

        /// Guesser strategy version
        #[arg(short, long, value_enum, default_value_t = StrategyVersion::V3)]
        strategy: StrategyVersion,

        /// Worker budget override (default: min(32, 4 x parallelism))
        #[arg(short, long)]
        workers: Option<usize>,
    },
}
