//! This module defines the core data structures shared by the loader, the translator and the
//! writer: transitions, tape conventions, machine descriptions and the crate error type.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::Rule;

/// The blank symbol as written in transition tables.
pub const BLANK_SYMBOL: char = '_';
/// Matches any symbol when read; leaves the cell unchanged when written.
pub const WILDCARD_SYMBOL: char = '*';
/// The default symbol marking the left edge of an emulated tape.
pub const LEFT_SENTINEL: char = '#';
/// The default symbol marking the unused right end of an emulated two-way tape.
pub const RIGHT_MARKER: char = '&';
/// The state every transition table starts in.
pub const INITIAL_STATE: &str = "0";
/// The name the original initial state takes when a two-way table is moved onto a one-way tape.
pub const START_STATE: &str = "start";
/// Any state whose name begins with this prefix is terminal.
pub const HALT_PREFIX: &str = "halt";
/// The maximum allowed size for a transition table in bytes.
pub const MAX_TABLE_SIZE: usize = 1 << 20; // 1MB

/// Returns `true` if `state` names a terminal state.
pub fn is_terminal(state: &str) -> bool {
    state.starts_with(HALT_PREFIX)
}

/// The tape convention a transition table is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TapeConvention {
    /// Tape bounded on the left (Sipser style). Moving left from the first cell stays put.
    OneWayInfinite,
    /// Tape unbounded in both directions.
    TwoWayInfinite,
}

impl TapeConvention {
    /// The single-letter tag used in the `;S` / `;I` header line.
    pub fn tag(self) -> char {
        match self {
            TapeConvention::OneWayInfinite => 'S',
            TapeConvention::TwoWayInfinite => 'I',
        }
    }

    /// Resolves a header tag into a convention.
    pub fn from_tag(tag: &str) -> Result<Self, TranslationError> {
        match tag {
            "S" => Ok(TapeConvention::OneWayInfinite),
            "I" => Ok(TapeConvention::TwoWayInfinite),
            other => Err(TranslationError::UnsupportedConvention(other.to_string())),
        }
    }

    /// The convention a table of this convention is translated into.
    pub fn opposite(self) -> Self {
        match self {
            TapeConvention::OneWayInfinite => TapeConvention::TwoWayInfinite,
            TapeConvention::TwoWayInfinite => TapeConvention::OneWayInfinite,
        }
    }
}

impl fmt::Display for TapeConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TapeConvention::OneWayInfinite => write!(f, "one-way infinite"),
            TapeConvention::TwoWayInfinite => write!(f, "two-way infinite"),
        }
    }
}

/// Represents the possible directions a Turing Machine head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    Right,
    /// Keep the head in the same position.
    Stay,
}

impl Direction {
    /// The move code written to transition tables.
    pub fn code(self) -> char {
        match self {
            Direction::Left => 'l',
            Direction::Right => 'r',
            Direction::Stay => '*',
        }
    }
}

/// A single rule of a transition table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// The state the rule applies in.
    pub state: String,
    /// The symbol under the head, or [`WILDCARD_SYMBOL`].
    pub read: char,
    /// The symbol to write, or [`WILDCARD_SYMBOL`] to leave the cell unchanged.
    pub write: char,
    /// Where the head moves after writing.
    pub direction: Direction,
    /// The state the machine enters.
    pub next_state: String,
}

impl Transition {
    pub fn new(
        state: impl Into<String>,
        read: char,
        write: char,
        direction: Direction,
        next_state: impl Into<String>,
    ) -> Self {
        Self {
            state: state.into(),
            read,
            write,
            direction,
            next_state: next_state.into(),
        }
    }
}

/// A transition table together with the tape convention it is written for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Machine {
    /// The tape convention of the table.
    pub convention: TapeConvention,
    /// The rules, in table order.
    pub transitions: Vec<Transition>,
}

impl Machine {
    /// Creates an empty table for the given convention.
    pub fn new(convention: TapeConvention) -> Self {
        Self {
            convention,
            transitions: Vec::new(),
        }
    }

    /// Appends a rule to the table. Duplicates are kept as they are.
    pub fn add_transition(
        &mut self,
        state: impl Into<String>,
        read: char,
        write: char,
        direction: Direction,
        next_state: impl Into<String>,
    ) {
        self.transitions
            .push(Transition::new(state, read, write, direction, next_state));
    }

    /// Returns every distinct state name, in order of first appearance.
    pub fn states(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.transitions
            .iter()
            .flat_map(|t| [t.state.as_str(), t.next_state.as_str()])
            .filter(|state| seen.insert(*state))
            .collect()
    }

    /// Returns the number of rules in the table.
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    /// Returns `true` if the table has no rules.
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}

/// Represents the errors that can occur while loading, translating or writing a table.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TranslationError {
    /// Indicates an error during the parsing of a transition table.
    #[error("Table parsing error: {0}")]
    ParseError(#[from] Box<pest::error::Error<Rule>>),
    /// Indicates a table that parsed but cannot be translated.
    #[error("Table validation error: {0}")]
    ValidationError(String),
    /// Indicates an error related to reading or writing table files.
    #[error("File error: {0}")]
    FileError(String),
    /// Indicates a tape convention tag other than `S` or `I`.
    #[error("Unsupported tape convention: {0}")]
    UnsupportedConvention(String),
    /// Indicates that two different states would be written under the same name.
    #[error("State name collision: {0}")]
    NameCollision(String),
    /// Indicates that every candidate marker symbol is already used as data.
    #[error("No free symbol left to use as a tape marker")]
    NoFreeMarker,
    /// Indicates a failure while serializing a table.
    #[error("Encoding error: {0}")]
    EncodeError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_serialization() {
        let left = Direction::Left;
        let stay = Direction::Stay;

        let left_json = serde_json::to_string(&left).unwrap();
        let stay_json = serde_json::to_string(&stay).unwrap();

        assert_eq!(left_json, "\"Left\"");
        assert_eq!(stay_json, "\"Stay\"");

        let left_deserialized: Direction = serde_json::from_str(&left_json).unwrap();
        assert_eq!(left, left_deserialized);
    }

    #[test]
    fn test_convention_tags() {
        assert_eq!(
            TapeConvention::from_tag("S").unwrap(),
            TapeConvention::OneWayInfinite
        );
        assert_eq!(
            TapeConvention::from_tag("I").unwrap(),
            TapeConvention::TwoWayInfinite
        );
        assert_eq!(
            TapeConvention::from_tag("X"),
            Err(TranslationError::UnsupportedConvention("X".into()))
        );
        assert_eq!(TapeConvention::OneWayInfinite.opposite().tag(), 'I');
        assert_eq!(TapeConvention::TwoWayInfinite.opposite().tag(), 'S');
    }

    #[test]
    fn test_add_transition_keeps_duplicates() {
        let mut machine = Machine::new(TapeConvention::OneWayInfinite);
        machine.add_transition("0", '0', '1', Direction::Right, "halt");
        machine.add_transition("0", '0', '1', Direction::Right, "halt");

        assert_eq!(machine.len(), 2);
        assert_eq!(machine.transitions[0], machine.transitions[1]);
    }

    #[test]
    fn test_states_in_first_appearance_order() {
        let mut machine = Machine::new(TapeConvention::TwoWayInfinite);
        machine.add_transition("0", '0', '1', Direction::Right, "q1");
        machine.add_transition("q1", '_', '_', Direction::Left, "0");
        machine.add_transition("q1", '1', '1', Direction::Stay, "halt");

        assert_eq!(machine.states(), vec!["0", "q1", "halt"]);
    }

    #[test]
    fn test_terminal_states() {
        assert!(is_terminal("halt"));
        assert!(is_terminal("halt-accept"));
        assert!(!is_terminal("q_halt"));
        assert!(!is_terminal("0"));
    }

    #[test]
    fn test_error_display() {
        let error = TranslationError::NameCollision("start".to_string());

        let error_msg = format!("{}", error);
        assert!(error_msg.contains("collision"));
        assert!(error_msg.contains("start"));
    }
}
