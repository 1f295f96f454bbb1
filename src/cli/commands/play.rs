//! Play command - Fight a trained brain from the terminal

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    thread,
};

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use tracing::warn;

use crate::{
    arena::{ActionRegistry, MatchSession, TurnReport},
    cli::{
        config::{BrainFormat, build_app, load_arena_config},
        output::{format_signal, print_section, status_line},
    },
    pipeline::{Learner, RandomLearner, ScriptedLearner},
    q_learning::DecisionEngine,
    types::Side,
};

#[derive(Parser, Debug)]
#[command(about = "Play as Red against a trained Blue fighter")]
pub struct PlayArgs {
    /// Brain controlling Blue; without one Blue plays randomly
    #[arg(long, short = 'b')]
    pub brain: Option<PathBuf>,

    /// Brain file encoding
    #[arg(long, value_enum, default_value = "json")]
    pub format: BrainFormat,

    /// Arena configuration file (JSON)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Random seed for reproducibility
    #[arg(long, short = 's')]
    pub seed: Option<u64>,

    /// Let Blue keep exploring instead of playing greedily
    #[arg(long)]
    pub explore: bool,

    /// Do not update or save the brain while playing
    #[arg(long)]
    pub frozen: bool,

    /// Wait the configured decision and settle delays between steps
    #[arg(long)]
    pub pace: bool,

    /// Show the reward each side receives
    #[arg(long)]
    pub show_rewards: bool,
}

/// Resolve a typed command to an action index.
///
/// Accepts a 1-based number or a case-insensitive prefix of an action name
/// (`ra` for RangedAttack). An ambiguous prefix is rejected.
fn parse_action(input: &str, registry: &ActionRegistry) -> Result<usize> {
    let input = input.trim();
    if input.is_empty() {
        bail!("Type an action number or name");
    }

    if let Ok(number) = input.parse::<usize>() {
        return match number.checked_sub(1) {
            Some(index) if index < registry.count() => Ok(index),
            _ => Err(anyhow!(
                "Action number must be between 1 and {}",
                registry.count()
            )),
        };
    }

    let needle = input.to_ascii_lowercase();
    let matches: Vec<usize> = registry
        .iter()
        .enumerate()
        .filter(|(_, def)| def.name.to_ascii_lowercase().starts_with(&needle))
        .map(|(index, _)| index)
        .collect();
    match matches.as_slice() {
        [index] => Ok(*index),
        [] => Err(anyhow!("Unknown action '{input}'")),
        _ => Err(anyhow!("'{input}' matches several actions")),
    }
}

fn print_menu(session: &MatchSession) {
    let me = session.combatant(Side::Player);
    let regime = session.regime();
    for (index, def) in session.registry().iter().enumerate() {
        let marker = if session.legality().is_legal(index, me, regime) {
            ""
        } else {
            " (unavailable)"
        };
        println!("  {}. {}{marker}", index + 1, def.name);
    }
}

fn print_report(report: &TurnReport, show_rewards: bool) {
    for line in &report.log {
        println!("  {line}");
    }
    if report.illegal_choice && report.actor == Side::Player {
        println!("  (that move was not available; a legal one was played instead)");
    }
    if show_rewards {
        println!(
            "  {} reward {}",
            report.actor,
            format_signal(report.reward.signal)
        );
    }
}

pub fn execute(args: PlayArgs) -> Result<()> {
    let config = load_arena_config(args.config.as_deref())?;
    let app = build_app(config, args.format, args.seed);

    let mut engine = args.brain.as_deref().map(|path| {
        let mut engine = if args.frozen {
            match app.load_table(path) {
                Ok(table) => DecisionEngine::from_table(
                    table,
                    app.config().engine.clone(),
                ),
                Err(err) => {
                    warn!("could not load {}: {err}; Blue starts untrained", path.display());
                    app.create_engine()
                }
            }
        } else {
            app.load_engine(path)
        }
        .with_name("Blue");
        engine.set_exploration_enabled(args.explore);
        engine
    });
    let mut random = match args.seed {
        Some(seed) => RandomLearner::with_seed("Blue (random)", seed),
        None => RandomLearner::new("Blue (random)"),
    };
    let blue: &mut dyn Learner = match engine.as_mut() {
        Some(engine) => engine,
        None => &mut random,
    };

    let mut human = ScriptedLearner::new("Red", [0]);
    let mut session = app.create_session();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    print_section(&format!("Red (you) vs {}", blue.name()));
    println!("Type an action number or name, 'q' to quit.");

    while !session.is_over() {
        println!("\n{}", status_line(&session));

        let report = match session.current_actor() {
            Some(Side::Player) => {
                print_menu(&session);
                let choice = loop {
                    print!("> ");
                    io::stdout().flush().context("Failed to flush stdout")?;
                    let Some(line) = lines.next() else {
                        println!();
                        return Ok(());
                    };
                    let line = line.context("Failed to read from stdin")?;
                    if matches!(line.trim(), "q" | "quit" | "exit") {
                        return Ok(());
                    }
                    match parse_action(&line, session.registry()) {
                        Ok(index) => break index,
                        Err(err) => println!("{err}"),
                    }
                };
                human.set_script([choice]);
                let delay = session.begin_turn(&mut human)?;
                if args.pace {
                    thread::sleep(delay);
                }
                session.settle(&mut human)?
            }
            Some(Side::Enemy) => {
                if args.pace {
                    thread::sleep(session.decision_delay());
                }
                let delay = session.begin_turn(&mut *blue)?;
                if args.pace {
                    thread::sleep(delay);
                }
                session.settle(&mut *blue)?
            }
            None => break,
        };
        print_report(&report, args.show_rewards);
    }

    println!("\n{}", status_line(&session));
    match session.winner() {
        Some(Side::Player) => println!("You win!"),
        Some(Side::Enemy) => println!("{} wins.", blue.name()),
        None => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_action_by_number() {
        let registry = ActionRegistry::standard();
        assert_eq!(parse_action("1", &registry).unwrap(), 0);
        assert_eq!(parse_action(" 6 ", &registry).unwrap(), 5);
        assert!(parse_action("0", &registry).is_err());
        assert!(parse_action("7", &registry).is_err());
    }

    #[test]
    fn test_parse_action_by_prefix() {
        let registry = ActionRegistry::standard();
        assert_eq!(parse_action("guard", &registry).unwrap(), 5);
        assert_eq!(parse_action("ra", &registry).unwrap(), 2);
        assert_eq!(parse_action("MELEE", &registry).unwrap(), 3);
        // Retreat and RangedAttack/Recover share a prefix
        assert!(parse_action("r", &registry).is_err());
        assert!(parse_action("dance", &registry).is_err());
        assert!(parse_action("", &registry).is_err());
    }
}
