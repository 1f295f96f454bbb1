//! Gladiator CLI - Train and fight learning gladiators
//!
//! This CLI provides a unified interface for:
//! - Self-play training of one or two brains
//! - Playing against a trained brain in the terminal
//! - Inspecting the values a brain has learned
//! - Writing a default arena configuration

use anyhow::Result;
use clap::{Parser, Subcommand};
use gladiator::cli::commands;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gladiator")]
#[command(version, about = "Turn-based arena for learning gladiators", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train fighters by self-play
    Train(Box<commands::train::TrainArgs>),

    /// Play as Red against a trained brain
    Play(commands::play::PlayArgs),

    /// Print the learned values of a brain
    Inspect(commands::inspect::InspectArgs),

    /// Write the default arena configuration
    Config(commands::config::ConfigArgs),
}

/// `RUST_LOG` when set, `info` otherwise.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn main() -> Result<()> {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(directives.as_deref()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => commands::train::execute(*args),
        Commands::Play(args) => commands::play::execute(args),
        Commands::Inspect(args) => commands::inspect::execute(args),
        Commands::Config(args) => commands::config::execute(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn test_log_filter_defaults_to_info() {
        assert_eq!(log_filter(None).max_level_hint(), Some(LevelFilter::INFO));
        assert_eq!(log_filter(Some("  ")).max_level_hint(), Some(LevelFilter::INFO));
    }

    #[test]
    fn test_log_filter_honors_quieter_setting() {
        assert_eq!(log_filter(Some("warn")).max_level_hint(), Some(LevelFilter::WARN));
        assert_eq!(log_filter(Some("error")).max_level_hint(), Some(LevelFilter::ERROR));
    }
}
