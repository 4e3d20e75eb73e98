use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::OffsitError;

/// Highest out count that still indexes the situation tables.
pub const MAX_LIVE_OUTS: u8 = 2;
/// The third out ends the half-inning.
pub const INNING_OVER_OUTS: u8 = 3;

/// Which bases are occupied, or the inning-over marker used for failure outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseState {
    Empty,
    First,
    Second,
    Third,
    FirstSecond,
    FirstThird,
    SecondThird,
    Loaded,
    InningOver,
}

impl BaseState {
    /// The eight runner patterns, in table row order.
    pub const OCCUPANCY: [BaseState; 8] = [
        BaseState::Empty,
        BaseState::First,
        BaseState::Second,
        BaseState::Third,
        BaseState::FirstSecond,
        BaseState::FirstThird,
        BaseState::SecondThird,
        BaseState::Loaded,
    ];

    pub fn from_occupancy(first: bool, second: bool, third: bool) -> Self {
        match (first, second, third) {
            (false, false, false) => BaseState::Empty,
            (true, false, false) => BaseState::First,
            (false, true, false) => BaseState::Second,
            (false, false, true) => BaseState::Third,
            (true, true, false) => BaseState::FirstSecond,
            (true, false, true) => BaseState::FirstThird,
            (false, true, true) => BaseState::SecondThird,
            (true, true, true) => BaseState::Loaded,
        }
    }

    /// Row index into the situation tables. `None` for the inning-over marker.
    pub fn index(self) -> Option<usize> {
        BaseState::OCCUPANCY.iter().position(|b| *b == self)
    }

    pub fn label(self) -> &'static str {
        match self {
            BaseState::Empty => "_ _ _",
            BaseState::First => "1 _ _",
            BaseState::Second => "_ 2 _",
            BaseState::Third => "_ _ 3",
            BaseState::FirstSecond => "1 2 _",
            BaseState::FirstThird => "1 _ 3",
            BaseState::SecondThird => "_ 2 3",
            BaseState::Loaded => "1 2 3",
            BaseState::InningOver => "inning over",
        }
    }
}

impl fmt::Display for BaseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for BaseState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl FromStr for BaseState {
    type Err = OffsitError;

    /// Accepts the spaced selector form ("1 _ 3"), the compact form ("1_3")
    /// and "inning over", ignoring case and whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();

        if compact == "inningover" {
            return Ok(BaseState::InningOver);
        }

        let slots: Vec<char> = compact.chars().collect();
        if slots.len() != 3 {
            return Err(OffsitError::InvalidBaseState(s.to_string()));
        }

        let mut occupied = [false; 3];
        for (i, (slot, runner)) in slots.iter().zip(['1', '2', '3']).enumerate() {
            occupied[i] = match *slot {
                c if c == runner => true,
                '_' => false,
                _ => return Err(OffsitError::InvalidBaseState(s.to_string())),
            };
        }
        Ok(BaseState::from_occupancy(occupied[0], occupied[1], occupied[2]))
    }
}

/// A point-in-time half-inning situation: runners on base plus outs recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct GameState {
    pub bases: BaseState,
    pub outs: u8,
}

impl GameState {
    pub fn new(bases: BaseState, outs: u8) -> Self {
        GameState { bases, outs }
    }

    /// True once the third out is recorded or the inning-over marker is set.
    /// Such states contribute nothing to the rest of the inning.
    pub fn is_inning_over(&self) -> bool {
        self.outs >= INNING_OVER_OUTS || self.bases == BaseState::InningOver
    }

    /// Whether this state can be looked up in a situation table.
    pub fn is_table_key(&self) -> bool {
        self.bases != BaseState::InningOver && self.outs <= MAX_LIVE_OUTS
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bases == BaseState::InningOver {
            write!(f, "inning over")
        } else {
            write!(f, "{}, {} out", self.bases, self.outs)
        }
    }
}

impl FromStr for GameState {
    type Err = OffsitError;

    /// Parses "<bases>,<outs>", e.g. "1 _ _,0" or "inning over,3".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (bases, outs) = s
            .rsplit_once(',')
            .ok_or_else(|| OffsitError::InvalidGameState(s.to_string()))?;
        let bases = bases.parse::<BaseState>()?;
        let outs = outs
            .trim()
            .parse::<u8>()
            .map_err(|_| OffsitError::InvalidGameState(s.to_string()))?;
        Ok(GameState { bases, outs })
    }
}
