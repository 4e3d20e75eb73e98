use thiserror::Error;

use crate::situation::{BaseState, GameState};

/// Domain errors raised by the situation tables and the break-even calculator
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OffsitError {
    // Parsing errors
    #[error("Unrecognized base state: '{0}' (expected e.g. \"1 _ 3\" or \"inning over\")")]
    InvalidBaseState(String),

    #[error("Invalid game state: '{0}' (expected \"<bases>,<outs>\", e.g. \"1 _ _,0\")")]
    InvalidGameState(String),

    // Table errors
    #[error("No historical data for {bases}, {outs} out")]
    MissingData { bases: BaseState, outs: u8 },

    #[error("{0} is not a table state (inning over or more than 2 outs)")]
    NotATableKey(GameState),

    // Calculation errors
    #[error("Break-even point is undefined: risk and reward are both zero")]
    Indeterminate,
}

pub type Result<T> = std::result::Result<T, OffsitError>;
