//! Inspect command - Summarize a persisted Q-table

use std::{collections::BTreeSet, path::PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;

use crate::{
    adapters::TextFileRepository,
    cli::output::{format_number, print_kv, print_section, print_subsection},
    identifiers::StateActionKey,
    ports::TableRepository,
    q_learning::QTable,
};

#[derive(Parser, Debug)]
#[command(about = "Summarize a Q-table file")]
pub struct InspectArgs {
    /// Q-table file
    pub table: PathBuf,

    /// Number of highest-valued entries to list
    #[arg(long, short = 'n', default_value_t = 10)]
    pub top: usize,
}

/// Entries ordered by value, highest first; equal values keep key order.
pub fn top_entries(table: &QTable, count: usize) -> Vec<(StateActionKey, f64)> {
    let mut entries = table.snapshot();
    entries.sort_by(|(_, a), (_, b)| b.total_cmp(a));
    entries.truncate(count);
    entries
}

pub fn execute(args: InspectArgs) -> Result<()> {
    if !args.table.is_file() {
        bail!("table file {} does not exist", args.table.display());
    }

    let table = QTable::default();
    let report = TextFileRepository::new()
        .load_into(&table, &args.table)
        .with_context(|| format!("failed to read table {}", args.table.display()))?;

    let snapshot = table.snapshot();
    let states: BTreeSet<_> = snapshot.iter().map(|(key, _)| &key.state).collect();

    print_section("Q-Table");
    print_kv("File", &args.table.display().to_string());
    print_kv("Entries", &format_number(table.len()));
    print_kv("States", &format_number(states.len()));
    print_kv("Duplicate lines", &format_number(report.duplicates));
    print_kv("Skipped lines", &format_number(report.skipped));

    if let (Some(min), Some(max)) = (
        snapshot.iter().map(|(_, value)| *value).reduce(f64::min),
        snapshot.iter().map(|(_, value)| *value).reduce(f64::max),
    ) {
        print_kv("Value range", &format!("{min:.3} .. {max:.3}"));
    }

    let top = top_entries(&table, args.top);
    if !top.is_empty() {
        print_subsection(&format!("Top {} entries", top.len()));
        for (key, value) in top {
            println!("  {value:>10.3}  {}  {}", key.action, key.state);
        }
    }

    Ok(())
}
