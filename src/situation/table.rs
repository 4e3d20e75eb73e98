//! Run-expectancy and scoring-probability tables.
//!
//! Both tables are aggregated from the same historical plate appearances,
//! grouped by the (bases, outs) state each plate appearance started in:
//!
//! - **Run expectancy**: mean runs scored from that state to the end of the inning
//! - **Score probability**: share of those plate appearances after which at
//!   least one run scored before the inning ended
//!
//! Cells keep the raw sum and count so that an empty bucket stays
//! distinguishable from a bucket that averaged zero.

use clap::ValueEnum;
use serde::Serialize;
use tracing::{debug, warn};

use super::state::{BaseState, GameState, MAX_LIVE_OUTS};
use crate::error::{OffsitError, Result};

const ROWS: usize = BaseState::OCCUPANCY.len();
const COLS: usize = MAX_LIVE_OUTS as usize + 1;

/// Which statistic drives the break-even calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    /// Average runs scored in the rest of the inning ("as many as possible")
    #[value(name = "many", alias = "run-expectancy")]
    RunExpectancy,
    /// Probability of scoring at least one run ("one run")
    #[value(name = "one-run", alias = "score-probability")]
    ScoreProbability,
}

impl TableKind {
    pub fn label(self) -> &'static str {
        match self {
            TableKind::RunExpectancy => "Expected Runs",
            TableKind::ScoreProbability => "Scoring Probabilities",
        }
    }
}

/// One historical plate appearance and what followed in its inning.
#[derive(Debug, Clone, PartialEq)]
pub struct PlateAppearance {
    pub bases: BaseState,
    pub outs: u8,
    /// Runs scored from the start of this plate appearance to the end of the inning
    pub runs_after: f64,
    /// Whether at least one of those runs scored
    pub scored: bool,
}

impl PlateAppearance {
    pub fn state(&self) -> GameState {
        GameState::new(self.bases, self.outs)
    }

    fn value(&self, kind: TableKind) -> f64 {
        match kind {
            TableKind::RunExpectancy => self.runs_after,
            TableKind::ScoreProbability => {
                if self.scored {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Bucket {
    sum: f64,
    count: u64,
}

/// Mean statistic per (bases, outs) state, read-only once built.
#[derive(Debug, Clone, PartialEq)]
pub struct SituationTable {
    kind: TableKind,
    cells: [[Bucket; COLS]; ROWS],
}

impl SituationTable {
    /// Group records by their starting state and accumulate the selected statistic.
    /// Records that start in a non-table state are skipped.
    pub fn build(kind: TableKind, records: &[PlateAppearance]) -> Self {
        let mut cells = [[Bucket::default(); COLS]; ROWS];
        let mut skipped = 0usize;

        for record in records {
            match cell_index(&record.state()) {
                Some((row, col)) => {
                    let bucket = &mut cells[row][col];
                    bucket.sum += record.value(kind);
                    bucket.count += 1;
                }
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            warn!(
                "{} table: skipped {} record(s) starting outside the 8×3 state grid",
                kind.label(),
                skipped
            );
        }

        let table = SituationTable { kind, cells };
        debug!(
            "{} table built from {} records ({} empty cells)",
            kind.label(),
            records.len() - skipped,
            table.missing_states().len()
        );
        table
    }

    pub fn kind(&self) -> TableKind {
        self.kind
    }

    /// Mean statistic for `state`.
    ///
    /// Fails with [`OffsitError::MissingData`] when no plate appearance started
    /// in that state, and with [`OffsitError::NotATableKey`] for inning-over states.
    pub fn lookup(&self, state: &GameState) -> Result<f64> {
        let (row, col) = cell_index(state).ok_or(OffsitError::NotATableKey(*state))?;
        let bucket = self.cells[row][col];
        if bucket.count == 0 {
            return Err(OffsitError::MissingData {
                bases: state.bases,
                outs: state.outs,
            });
        }
        Ok(bucket.sum / bucket.count as f64)
    }

    /// Number of historical plate appearances behind a cell (0 for non-table states).
    pub fn observations(&self, state: &GameState) -> u64 {
        cell_index(state)
            .map(|(row, col)| self.cells[row][col].count)
            .unwrap_or(0)
    }

    /// Table states with no historical data.
    pub fn missing_states(&self) -> Vec<GameState> {
        all_states()
            .filter(|s| self.observations(s) == 0)
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_states().is_empty()
    }
}

/// Both statistic tables built from one dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct SituationTables {
    pub run_expectancy: SituationTable,
    pub score_probability: SituationTable,
}

impl SituationTables {
    pub fn build(records: &[PlateAppearance]) -> Self {
        SituationTables {
            run_expectancy: SituationTable::build(TableKind::RunExpectancy, records),
            score_probability: SituationTable::build(TableKind::ScoreProbability, records),
        }
    }

    pub fn table(&self, kind: TableKind) -> &SituationTable {
        match kind {
            TableKind::RunExpectancy => &self.run_expectancy,
            TableKind::ScoreProbability => &self.score_probability,
        }
    }
}

/// Every (bases, outs) state that indexes a table, row-major.
pub fn all_states() -> impl Iterator<Item = GameState> {
    BaseState::OCCUPANCY
        .into_iter()
        .flat_map(|bases| (0..=MAX_LIVE_OUTS).map(move |outs| GameState::new(bases, outs)))
}

fn cell_index(state: &GameState) -> Option<(usize, usize)> {
    if !state.is_table_key() {
        return None;
    }
    state.bases.index().map(|row| (row, state.outs as usize))
}
