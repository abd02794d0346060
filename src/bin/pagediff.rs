use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use pagediff::config::OutputFormat;
use pagediff::rank::{search, sort_by_column, Direction};
use pagediff::{compare, Cli, DifferenceRecord, RunStatus};
use serde::Serialize;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Debug, Serialize)]
struct Report<'a> {
    status: RunStatus,
    count: u32,
    records: &'a [DifferenceRecord],
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let source = read_markup(&cli.source)?;
    let current = read_markup(&cli.current)?;

    let comparison = compare(&cli.build_config(), &source, &current);
    let mut records = comparison.view(cli.filter.to_filter());
    if let Some(query) = &cli.search {
        records = search(&records, query);
    }
    if let Some(column) = cli.sort {
        let direction = if cli.descending {
            Direction::Descending
        } else {
            Direction::Ascending
        };
        sort_by_column(&mut records, column.into(), direction);
    }

    match cli.format {
        OutputFormat::Json => {
            let report = Report {
                status: comparison.status,
                count: comparison.count(),
                records: &records,
            };
            let json = serde_json::to_string_pretty(&report)
                .context("failed to serialize comparison report")?;
            println!("{json}");
        }
        OutputFormat::Table => render_table(comparison.status, comparison.count(), &records),
    }
    Ok(())
}

fn read_markup(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read '{}'", path.display()))
}

fn render_table(status: RunStatus, count: u32, records: &[DifferenceRecord]) {
    if status == RunStatus::EmptySource {
        println!("source snapshot is empty; nothing compared");
        return;
    }
    println!("--- Page Differences ({count}) ---");
    for record in records {
        println!(
            "{:<4} {:>2} {} {:<19} {}",
            record.severity().label(),
            record.priority,
            record.category.icon(),
            record.kind.label(),
            record.detail
        );
    }
}
