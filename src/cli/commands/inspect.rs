//! Inspect command - Show what a brain has learned

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    arena::ActionRegistry,
    cli::{
        config::{BrainFormat, build_app},
        output::{format_number, print_kv, print_section, print_subsection},
    },
    q_learning::QTable,
};

#[derive(Parser, Debug)]
#[command(about = "Print the learned values of a brain file")]
pub struct InspectArgs {
    /// Brain file to read
    pub brain: PathBuf,

    /// Brain file encoding
    #[arg(long, value_enum, default_value = "json")]
    pub format: BrainFormat,

    /// Only show the first N situations (sorted by key)
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Emit the rows as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// One situation's values and its greedy choice
#[derive(Debug, serde::Serialize)]
struct InspectedRow<'a> {
    situation: &'a str,
    values: &'a [f64],
    greedy: Option<&'a str>,
}

fn inspected_rows<'a>(table: &'a QTable, registry: &'a ActionRegistry) -> Vec<InspectedRow<'a>> {
    let mut rows: Vec<_> = table
        .iter()
        .map(|(key, values)| InspectedRow {
            situation: key.as_str(),
            values,
            greedy: QTable::argmax(values).and_then(|index| registry.name(index)),
        })
        .collect();
    rows.sort_by(|a, b| a.situation.cmp(b.situation));
    rows
}

pub fn execute(args: InspectArgs) -> Result<()> {
    let app = build_app(Default::default(), args.format, None);
    let table = app
        .load_table(&args.brain)
        .with_context(|| format!("Failed to load brain {}", args.brain.display()))?;
    let registry = ActionRegistry::standard();

    let mut rows = inspected_rows(&table, &registry);
    if let Some(limit) = args.limit {
        rows.truncate(limit);
    }

    if args.json {
        let json = serde_json::to_string_pretty(&rows).context("Failed to encode rows")?;
        println!("{json}");
        return Ok(());
    }

    print_section(&format!("Brain {}", args.brain.display()));
    print_kv("Situations", &format_number(table.len()));
    print_kv("Actions", &format_number(table.action_count()));

    print_subsection("Values (distance_mana_ammo_hp)");
    let header: Vec<String> = registry.iter().map(|def| format!("{:>12}", def.name)).collect();
    println!("{:<14}{}  greedy", "situation", header.join(""));
    for row in &rows {
        let values: String = row.values.iter().map(|v| format!("{v:>12.2}")).collect();
        println!(
            "{:<14}{values}  {}",
            row.situation,
            row.greedy.unwrap_or("-")
        );
    }
    Ok(())
}
