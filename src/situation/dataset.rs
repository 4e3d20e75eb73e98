use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{de, Deserialize, Deserializer};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::state::BaseState;
use super::table::PlateAppearance;

/// Which historical dataset backs the tables. Both share the same schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Sport {
    Baseball,
    Softball,
}

impl Sport {
    /// Default at-bat export for this sport.
    pub fn default_file_name(self) -> &'static str {
        match self {
            Sport::Baseball => "baseball_atbats_2021-2023.csv",
            Sport::Softball => "softball_atbats_2021-2023.csv",
        }
    }

    pub fn dataset_path(self, data_dir: &Path) -> PathBuf {
        data_dir.join(self.default_file_name())
    }
}

/// Raw CSV row. Extra columns in the export are ignored.
#[derive(Debug, Deserialize)]
struct AtBatRow {
    base: String,
    outs: u8,
    runs_after_batter: f64,
    #[serde(deserialize_with = "flag")]
    at_least_1_scored: bool,
}

/// Accepts 0/1, 0.0/1.0 and true/false (any case).
fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<bool, D::Error> {
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_lowercase().as_str() {
        "1" | "1.0" | "true" => Ok(true),
        "0" | "0.0" | "false" => Ok(false),
        other => Err(de::Error::custom(format!(
            "invalid at_least_1_scored value '{}'",
            other
        ))),
    }
}

/// Read plate-appearance records from any CSV source with a header row.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<PlateAppearance>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for (i, row) in csv_reader.deserialize::<AtBatRow>().enumerate() {
        // Header is line 1
        let line = i + 2;
        let row = row.with_context(|| format!("Malformed at-bat record on line {}", line))?;
        let bases = row
            .base
            .parse::<BaseState>()
            .with_context(|| format!("Bad base state on line {}", line))?;
        if bases == BaseState::InningOver {
            anyhow::bail!("Line {}: 'inning over' is not a starting state", line);
        }
        if !row.runs_after_batter.is_finite() {
            anyhow::bail!(
                "Line {}: runs_after_batter must be a finite number, got {}",
                line,
                row.runs_after_batter
            );
        }
        if row.runs_after_batter < 0.0 {
            anyhow::bail!(
                "Line {}: runs_after_batter must be non-negative, got {}",
                line,
                row.runs_after_batter
            );
        }
        records.push(PlateAppearance {
            bases,
            outs: row.outs,
            runs_after: row.runs_after_batter,
            scored: row.at_least_1_scored,
        });
    }
    debug!("Parsed {} at-bat records", records.len());
    Ok(records)
}

/// Load a historical at-bat CSV file.
pub fn load_dataset(path: &Path) -> Result<Vec<PlateAppearance>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open dataset: {}", path.display()))?;
    let records =
        read_records(file).with_context(|| format!("Failed to read dataset: {}", path.display()))?;
    if records.is_empty() {
        anyhow::bail!("Dataset {} contains no at-bat records", path.display());
    }
    info!("Loaded {} at-bats from {}", records.len(), path.display());
    Ok(records)
}
