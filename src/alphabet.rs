//! Symbol sets for a single translation run.

use crate::types::{
    Machine, TranslationError, BLANK_SYMBOL, LEFT_SENTINEL, RIGHT_MARKER, WILDCARD_SYMBOL,
};
use std::collections::BTreeSet;

/// Symbols tried, in order, for the left sentinel.
const LEFT_CANDIDATES: [char; 6] = [LEFT_SENTINEL, '$', '%', '!', '^', '~'];
/// Symbols tried, in order, for the right extension marker.
const RIGHT_CANDIDATES: [char; 6] = [RIGHT_MARKER, '@', '=', '?', '|', '+'];

/// The concrete data symbols a machine can meet on its tape.
///
/// Blank and the wildcard are never data symbols. Iteration order is the
/// natural `char` order so every run emits gadgets in the same order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Alphabet {
    data: BTreeSet<char>,
}

impl Alphabet {
    /// Collects the symbols read or written by `machine`, plus `input_symbols`.
    pub fn collect(machine: &Machine, input_symbols: &[char]) -> Self {
        let used = machine
            .transitions
            .iter()
            .flat_map(|t| [t.read, t.write]);

        Self::from_symbols(used.chain(input_symbols.iter().copied()))
    }

    /// Builds an alphabet from arbitrary symbols, dropping blank and the wildcard.
    pub fn from_symbols(symbols: impl IntoIterator<Item = char>) -> Self {
        Self {
            data: symbols
                .into_iter()
                .filter(|&c| c != BLANK_SYMBOL && c != WILDCARD_SYMBOL && !c.is_whitespace())
                .collect(),
        }
    }

    /// The data symbols.
    pub fn data(&self) -> impl Iterator<Item = char> + '_ {
        self.data.iter().copied()
    }

    /// The data symbols followed by blank: everything the input tape can hold.
    pub fn tape_symbols(&self) -> Vec<char> {
        self.data().chain([BLANK_SYMBOL]).collect()
    }

    /// The tape symbols followed by both markers.
    pub fn working_symbols(&self, markers: &Markers) -> Vec<char> {
        let mut symbols = self.tape_symbols();
        symbols.extend([markers.left, markers.right]);
        symbols
    }

    pub fn contains(&self, symbol: char) -> bool {
        self.data.contains(&symbol)
    }
}

/// The two structural symbols of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Markers {
    /// Marks the left edge of the emulated tape.
    pub left: char,
    /// Marks the unused right end of an emulated two-way tape.
    pub right: char,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            left: LEFT_SENTINEL,
            right: RIGHT_MARKER,
        }
    }
}

impl Markers {
    /// Picks the first candidates that do not clash with `alphabet`.
    ///
    /// A table produced by an earlier translation already uses `#` or `&` as
    /// ordinary data, so the markers of this run move to the next free symbol.
    pub fn choose(alphabet: &Alphabet) -> Result<Self, TranslationError> {
        let left = LEFT_CANDIDATES
            .into_iter()
            .find(|&c| !alphabet.contains(c))
            .ok_or(TranslationError::NoFreeMarker)?;
        let right = RIGHT_CANDIDATES
            .into_iter()
            .find(|&c| c != left && !alphabet.contains(c))
            .ok_or(TranslationError::NoFreeMarker)?;

        Ok(Self { left, right })
    }
}
