//! Train command - Self-play between two fighters

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;

use crate::{
    cli::{
        config::{BrainFormat, build_app, load_arena_config},
        output::{format_number, print_kv, print_section},
    },
    pipeline::{
        BattleLogObserver, JsonlObserver, Learner, ProgressObserver, RandomLearner,
        TrainingConfig, TrainingResult,
    },
};

/// Who controls the blue fighter during training
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OpponentKind {
    /// A second decision engine with its own brain file
    Learner,
    /// Uniform random play
    Random,
}

#[derive(Parser, Debug)]
#[command(about = "Train fighters by self-play")]
pub struct TrainArgs {
    /// Number of matches to play
    #[arg(long, short = 'm', default_value_t = 100)]
    pub matches: usize,

    /// Turn cap per match before it counts as a stalemate
    #[arg(long, default_value_t = 500)]
    pub max_turns: usize,

    /// Brain file for the red fighter (created if missing)
    #[arg(long, short = 'O', default_value = "brain.json")]
    pub output: PathBuf,

    /// Controller of the blue fighter
    #[arg(long, short = 'o', value_enum, default_value = "learner")]
    pub opponent: OpponentKind,

    /// Brain file for the blue fighter when it is a learner
    /// [default: <output> with a `-blue` suffix]
    #[arg(long)]
    pub enemy_output: Option<PathBuf>,

    /// Brain file encoding
    #[arg(long, value_enum, default_value = "json")]
    pub format: BrainFormat,

    /// Arena configuration file (JSON)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Random seed for reproducibility
    #[arg(long, short = 's')]
    pub seed: Option<u64>,

    /// Write a JSON summary of the run
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Write every settled turn to a JSON Lines file
    #[arg(long)]
    pub jsonl: Option<PathBuf>,

    /// Print the battle log of every match
    #[arg(long)]
    pub battle_log: bool,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

#[derive(Debug, Serialize)]
struct TrainingSummaryFile {
    training: TrainingResult,
    red_brain: PathBuf,
    blue_brain: Option<PathBuf>,
    red_situations: usize,
    blue_situations: Option<usize>,
    seed: Option<u64>,
}

fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    // Trailing separator or no file name means a directory target
    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

/// `brain.json` -> `brain-blue.json`
fn blue_brain_path(red: &Path) -> PathBuf {
    let stem = red
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "brain".to_string());
    let file_name = match red.extension() {
        Some(ext) => format!("{stem}-blue.{}", ext.to_string_lossy()),
        None => format!("{stem}-blue"),
    };
    red.with_file_name(file_name)
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let config = load_arena_config(args.config.as_deref())?;
    let app = build_app(config, args.format, args.seed);

    let mut red = app.load_engine(&args.output).with_name("Red");
    let blue_path = match args.opponent {
        OpponentKind::Learner => Some(
            args.enemy_output
                .clone()
                .unwrap_or_else(|| blue_brain_path(&args.output)),
        ),
        OpponentKind::Random => None,
    };
    let mut blue_engine = blue_path
        .as_deref()
        .map(|path| app.load_engine(path).with_name("Blue"));
    let mut blue_random = RandomLearner::new("Blue (random)");

    let mut pipeline = app.create_pipeline(TrainingConfig {
        matches: args.matches,
        max_turns: args.max_turns,
        seed: args.seed,
    });
    if !args.no_progress {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }
    if args.battle_log {
        pipeline = pipeline.with_observer(Box::new(BattleLogObserver::stdout()));
    }
    if let Some(path) = &args.jsonl {
        let observer = JsonlObserver::new(path)
            .with_context(|| format!("Failed to create turn log {}", path.display()))?;
        pipeline = pipeline.with_observer(Box::new(observer));
    }

    let blue: &mut dyn Learner = match blue_engine.as_mut() {
        Some(engine) => engine,
        None => &mut blue_random,
    };
    let result = pipeline.run(&mut red, blue)?;

    print_section("Training complete");
    print_kv("Matches", &format_number(result.total_matches));
    print_kv(
        "Red wins",
        &format!("{} ({:.1}%)", result.red_wins, result.red_win_rate * 100.0),
    );
    print_kv(
        "Blue wins",
        &format!("{} ({:.1}%)", result.blue_wins, result.blue_win_rate * 100.0),
    );
    print_kv("Stalemates", &format_number(result.stalemates));
    print_kv("Avg turns", &format!("{:.1}", result.avg_match_length));
    print_kv("Red brain", &args.output.display().to_string());
    print_kv("Red situations", &format_number(red.table().len()));
    if let (Some(path), Some(engine)) = (&blue_path, &blue_engine) {
        print_kv("Blue brain", &path.display().to_string());
        print_kv("Blue situations", &format_number(engine.table().len()));
    }

    if let Some(raw) = &args.summary {
        let path = &sanitize_summary_path(raw);
        if path != raw {
            println!("Summary path normalized to {}", path.display());
        }
        let summary = TrainingSummaryFile {
            training: result.clone(),
            red_brain: args.output.clone(),
            blue_brain: blue_path.clone(),
            red_situations: red.table().len(),
            blue_situations: blue_engine.as_ref().map(|e| e.table().len()),
            seed: args.seed,
        };
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create summary {}", path.display()))?;
        serde_json::to_writer_pretty(file, &summary).context("Failed to write summary")?;
        println!("\nSummary written to {}", path.display());
    }

    Ok(())
}
