use clap::Parser;
use std::path::PathBuf;

use crate::situation::state::{INNING_OVER_OUTS, MAX_LIVE_OUTS};
use crate::situation::{BaseState, GameState, Sport, TableKind};

/// Most runs the calculator accepts as scoring on a single play.
const MAX_IMMEDIATE_RUNS: u32 = 4;

/// Offensive situations calculator: break-even success rates for steals,
/// bunts, squeezes and other two-outcome plays
#[derive(Parser, Debug, Clone)]
#[command(name = "offsit", version, about)]
pub struct Config {
    /// Which historical dataset to build the situation tables from
    #[arg(long, env = "OFFSIT_SPORT", value_enum, default_value = "baseball")]
    pub sport: Sport,

    /// Directory holding the per-sport at-bat CSV exports
    #[arg(long, env = "OFFSIT_DATA_DIR", default_value = ".")]
    pub data_dir: PathBuf,

    /// Explicit dataset path (overrides --sport / --data-dir)
    #[arg(long, env = "OFFSIT_DATASET")]
    pub dataset: Option<PathBuf>,

    /// Situation before the play, e.g. "1 _ _,0"
    #[arg(long, required_unless_present = "show_tables")]
    pub current: Option<GameState>,

    /// Situation if the play succeeds, e.g. "_ 2 _,0"
    #[arg(long, required_unless_present = "show_tables")]
    pub success: Option<GameState>,

    /// Situation if the play fails, e.g. "_ _ _,1" or "inning over,3"
    #[arg(long, required_unless_present = "show_tables")]
    pub failure: Option<GameState>,

    /// Goal: "many" (expected runs) early in the game, "one-run" late
    #[arg(long, env = "OFFSIT_GOAL", value_enum, default_value = "many")]
    pub goal: TableKind,

    /// Runs that score on the play itself (e.g. a squeeze)
    #[arg(long, default_value = "0")]
    pub runs: u32,

    /// Emit JSON instead of text
    #[arg(long, env = "OFFSIT_JSON", default_value = "false")]
    pub json: bool,

    /// Print both situation tables and exit
    #[arg(long, default_value = "false")]
    pub show_tables: bool,
}

/// The three states of a calculation, once validated.
#[derive(Debug, Clone, Copy)]
pub struct Play {
    pub current: GameState,
    pub success: GameState,
    pub failure: GameState,
}

impl Config {
    pub fn dataset_path(&self) -> PathBuf {
        self.dataset
            .clone()
            .unwrap_or_else(|| self.sport.dataset_path(&self.data_dir))
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if let Some(current) = &self.current {
            check_live("current", current)?;
        }
        if let Some(success) = &self.success {
            check_live("success", success)?;
        }
        if let Some(failure) = &self.failure {
            if failure.outs > INNING_OVER_OUTS {
                anyhow::bail!(
                    "failure outs must be between 0 and {}, got {}",
                    INNING_OVER_OUTS,
                    failure.outs
                );
            }
        }
        let max_runs = match self.goal {
            TableKind::RunExpectancy => MAX_IMMEDIATE_RUNS,
            TableKind::ScoreProbability => 1,
        };
        if self.runs > max_runs {
            anyhow::bail!(
                "runs must be between 0 and {} for the '{}' goal",
                max_runs,
                self.goal.label()
            );
        }
        Ok(())
    }

    /// The play to evaluate; `None` in table-only mode.
    pub fn play(&self) -> Option<Play> {
        Some(Play {
            current: self.current?,
            success: self.success?,
            failure: self.failure?,
        })
    }
}

fn check_live(which: &str, state: &GameState) -> anyhow::Result<()> {
    if state.bases == BaseState::InningOver {
        anyhow::bail!("{} state cannot be 'inning over'", which);
    }
    if state.outs > MAX_LIVE_OUTS {
        anyhow::bail!(
            "{} outs must be between 0 and {}, got {}",
            which,
            MAX_LIVE_OUTS,
            state.outs
        );
    }
    Ok(())
}
