//! Config command - Write a default arena configuration

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;

use crate::app::ArenaConfig;

#[derive(Parser, Debug)]
#[command(about = "Write the default arena configuration to a file")]
pub struct ConfigArgs {
    /// Destination file
    #[arg(default_value = "arena.json")]
    pub path: PathBuf,

    /// Overwrite an existing file
    #[arg(long, short = 'f')]
    pub force: bool,

    /// Enable automatic restart after each match
    #[arg(long)]
    pub self_play: bool,
}

pub fn execute(args: ConfigArgs) -> Result<()> {
    if args.path.exists() && !args.force {
        bail!(
            "{} already exists (use --force to overwrite)",
            args.path.display()
        );
    }

    let config = ArenaConfig::default().with_self_play(args.self_play);
    config
        .save(&args.path)
        .with_context(|| format!("Failed to write {}", args.path.display()))?;
    println!("Wrote default configuration to {}", args.path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_refuses_to_overwrite_without_force() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("arena.json");
        std::fs::write(&path, "keep me").unwrap();

        let args = ConfigArgs {
            path: path.clone(),
            force: false,
            self_play: false,
        };
        assert!(execute(args).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "keep me");

        let args = ConfigArgs {
            path: path.clone(),
            force: true,
            self_play: true,
        };
        execute(args).unwrap();
        assert!(ArenaConfig::load(&path).unwrap().rules.self_play);
    }
}
