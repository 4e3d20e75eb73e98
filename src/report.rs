//! Text and JSON rendering for calculations and situation tables.

use serde::Serialize;
use std::fmt::Write;

use crate::decision::{BreakEven, Calculation};
use crate::situation::{BaseState, GameState, SituationTable, TableKind};

/// Round to 3 decimals for display.
pub fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

/// Break-even probability as a percentage string, e.g. 0.72727 → "72.7%".
pub fn format_percent(p: f64) -> String {
    format!("{:.1}%", round3(p) * 100.0)
}

fn statistic_name(kind: TableKind) -> &'static str {
    match kind {
        TableKind::RunExpectancy => "expected runs",
        TableKind::ScoreProbability => "scoring probability",
    }
}

/// Human-readable result, one line per fact.
pub fn render_calculation(calc: &Calculation) -> String {
    let mut out = String::new();
    match calc.outcome {
        BreakEven::Probability(p) => {
            let _ = writeln!(
                out,
                "The chance of success needed to break even on {}: {}",
                statistic_name(calc.kind),
                format_percent(p)
            );
        }
        BreakEven::NegativeValue => {
            let _ = writeln!(out, "Negative value play");
            let _ = writeln!(out, "{}:", calc.kind.label());
            let _ = writeln!(
                out,
                "  {}: {:.3}",
                state_label(&calc.current),
                round3(calc.current_value)
            );
            let _ = writeln!(
                out,
                "  {}: {:.3}",
                state_label(&calc.success),
                round3(calc.success_table_value.unwrap_or(calc.success_value))
            );
        }
    }
    out
}

fn state_label(state: &GameState) -> String {
    format!("{}, {} out", state.bases, state.outs)
}

/// Serializable view of one table: a row per base state, a column per out count.
#[derive(Debug, Clone, Serialize)]
pub struct TableSnapshot {
    pub kind: TableKind,
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableRow {
    pub bases: BaseState,
    /// Mean per out count; `None` where there were no observations
    pub values: Vec<Option<f64>>,
    pub observations: Vec<u64>,
}

impl TableSnapshot {
    pub fn from_table(table: &SituationTable) -> Self {
        let rows = BaseState::OCCUPANCY
            .into_iter()
            .map(|bases| {
                let states: Vec<GameState> =
                    (0..=2).map(|outs| GameState::new(bases, outs)).collect();
                TableRow {
                    bases,
                    values: states.iter().map(|s| table.lookup(s).ok()).collect(),
                    observations: states.iter().map(|s| table.observations(s)).collect(),
                }
            })
            .collect();
        TableSnapshot {
            kind: table.kind(),
            rows,
        }
    }
}

/// Fixed-width grid of a table for terminal output.
pub fn render_table(table: &SituationTable) -> String {
    let snapshot = TableSnapshot::from_table(table);
    let mut out = String::new();
    let _ = writeln!(out, "{}", table.kind().label());
    let _ = writeln!(out, "{:<12}{:>10}{:>10}{:>10}", "base", "0 out", "1 out", "2 out");
    for row in &snapshot.rows {
        let _ = write!(out, "{:<12}", row.bases.label());
        for value in &row.values {
            match value {
                Some(v) => {
                    let _ = write!(out, "{:>10.3}", v);
                }
                None => {
                    let _ = write!(out, "{:>10}", "n/a");
                }
            }
        }
        out.push('\n');
    }
    out
}
