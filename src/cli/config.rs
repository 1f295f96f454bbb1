//! Shared configuration helpers for CLI commands

use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;

use crate::{
    adapters::{JsonRepository, MsgPackRepository},
    app::{App, ArenaConfig},
};

/// On-disk encoding of brain files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum BrainFormat {
    /// Pretty-printed JSON
    #[default]
    Json,
    /// Compact MessagePack
    Msgpack,
}

/// Load `path` if given, otherwise the defaults.
pub fn load_arena_config(path: Option<&Path>) -> Result<ArenaConfig> {
    match path {
        Some(path) => ArenaConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(ArenaConfig::default()),
    }
}

/// Wire up the container for a command.
pub fn build_app(config: ArenaConfig, format: BrainFormat, seed: Option<u64>) -> App {
    let mut builder = match format {
        BrainFormat::Json => App::for_testing().with_repository(JsonRepository::new()),
        BrainFormat::Msgpack => App::for_testing().with_repository(MsgPackRepository::new()),
    }
    .with_config(config);
    if let Some(seed) = seed {
        builder = builder.with_default_seed(seed);
    }
    builder.build()
}
