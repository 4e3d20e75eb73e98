use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

mod config;
mod decision;
mod error;
mod report;
mod situation;

use config::Config;
use decision::compute_break_even;
use report::{render_calculation, render_table, TableSnapshot};
use situation::{load_dataset, SituationTables, TableKind};

fn main() -> Result<()> {
    // Initialise tracing / logging (stderr, so results on stdout stay pipeable)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::parse();
    config.validate()?;

    // Build the situation tables once; everything after this is read-only
    let dataset_path = config.dataset_path();
    let records = load_dataset(&dataset_path)?;
    let tables = SituationTables::build(&records);
    for kind in [TableKind::RunExpectancy, TableKind::ScoreProbability] {
        let table = tables.table(kind);
        if !table.is_complete() {
            let missing: Vec<String> = table
                .missing_states()
                .iter()
                .map(|s| s.to_string())
                .collect();
            warn!(
                "{} table has no data for: {}",
                kind.label(),
                missing.join("; ")
            );
        }
    }
    info!("Situation tables built from {}", dataset_path.display());

    if config.show_tables {
        if config.json {
            let snapshots = [
                TableSnapshot::from_table(&tables.run_expectancy),
                TableSnapshot::from_table(&tables.score_probability),
            ];
            println!("{}", serde_json::to_string_pretty(&snapshots)?);
        } else {
            println!("{}", render_table(&tables.run_expectancy));
            print!("{}", render_table(&tables.score_probability));
        }
        return Ok(());
    }

    let play = config
        .play()
        .context("--current, --success and --failure are required")?;

    let calculation = compute_break_even(
        &tables,
        play.current,
        play.success,
        play.failure,
        config.runs,
        config.goal,
    )
    .with_context(|| {
        format!(
            "Cannot evaluate {} → success {} / failure {}",
            play.current, play.success, play.failure
        )
    })?;

    if config.json {
        println!("{}", serde_json::to_string_pretty(&calculation)?);
    } else {
        print!("{}", render_calculation(&calculation));
    }

    Ok(())
}
