//! State naming for translated tables.
//!
//! The translator never builds state names by hand. Every state it emits is a
//! [`StateKey`]: an original state, the setup entry, a setup gadget state, or a
//! state derived from an original one for a given [`Role`]. Keys are compared
//! structurally while gadgets are synthesized and are only turned into names by
//! the [`Namer`] when the output table is assembled.

use crate::types::{
    is_terminal, Direction, Machine, TapeConvention, TranslationError, BLANK_SYMBOL,
    INITIAL_STATE,
};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, warn};

/// What a derived state does on behalf of its origin state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    /// The origin state itself, moved onto a two-way tape next to its sentinel.
    Directed,
    /// Shifting the window right while carrying the given symbol.
    Carry(char),
    /// Scanning back to the left sentinel after a shift.
    Rewind,
    /// Pushing the right extension marker one cell further out.
    Grow,
    /// Stepping back left to finish an emulated stay move.
    StepBack,
}

/// States of the one-time setup gadgets that run before the translated machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SetupRole {
    /// Writes the left sentinel in front of the input.
    MarkBoundary,
    /// Shifts the input right while carrying the given symbol.
    Carry(char),
    /// Writes the right extension marker after the input.
    Seal,
    /// Returns to the first input cell.
    Home,
}

/// Structured identity of an emitted state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StateKey {
    /// The initial state of the translated table.
    Entry,
    /// A state of the input table, name unchanged.
    Original(String),
    /// A setup gadget state.
    Setup(SetupRole),
    /// A state derived from a non-terminal original state.
    Derived { origin: String, role: Role },
}

impl StateKey {
    pub fn original(name: impl Into<String>) -> Self {
        StateKey::Original(name.into())
    }

    /// Derives the key for `role` on `origin`.
    ///
    /// Terminal states keep their identity: deriving from one yields the
    /// original state itself.
    pub fn derived(origin: impl Into<String>, role: Role) -> Self {
        let origin = origin.into();
        if is_terminal(&origin) {
            StateKey::Original(origin)
        } else {
            StateKey::Derived { origin, role }
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, StateKey::Original(name) if is_terminal(name))
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateKey::Entry => f.write_str(INITIAL_STATE),
            StateKey::Original(name) => f.write_str(name),
            StateKey::Setup(SetupRole::MarkBoundary) => f.write_str("setup_mark"),
            StateKey::Setup(SetupRole::Carry(symbol)) => {
                write!(f, "setup_carry_{}", symbol_tag(*symbol))
            }
            StateKey::Setup(SetupRole::Seal) => f.write_str("setup_seal"),
            StateKey::Setup(SetupRole::Home) => f.write_str("setup_home"),
            StateKey::Derived { origin, role } => f.write_str(&derive(origin, *role)),
        }
    }
}

/// Renders the name of the state playing `role` for `origin`.
///
/// Pure and total. Names of terminal states are returned unchanged.
pub fn derive(origin: &str, role: Role) -> String {
    if is_terminal(origin) {
        return origin.to_string();
    }

    match role {
        Role::Directed => format!("{origin}_dir"),
        Role::Carry(symbol) => format!("{origin}_shift_{}", symbol_tag(symbol)),
        Role::Rewind => format!("{origin}_rewind"),
        Role::Grow => format!("{origin}_grow"),
        Role::StepBack => format!("{origin}_back"),
    }
}

/// Symbols are embedded in names as themselves, except blank.
fn symbol_tag(symbol: char) -> String {
    if symbol == BLANK_SYMBOL {
        "blank".to_string()
    } else {
        symbol.to_string()
    }
}

/// A transition whose endpoints are still structured keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedTransition {
    pub state: StateKey,
    pub read: char,
    pub write: char,
    pub direction: Direction,
    pub next_state: StateKey,
}

impl KeyedTransition {
    pub fn new(
        state: StateKey,
        read: char,
        write: char,
        direction: Direction,
        next_state: StateKey,
    ) -> Self {
        Self {
            state,
            read,
            write,
            direction,
            next_state,
        }
    }
}

/// Renders the keys of one translation run into names.
///
/// Generated states (the entry, setup states and derived states) always get
/// their plain rendering, and two of them sharing a name is an error. An
/// original state whose name is already taken by a generated one is renamed
/// once, to the first free `<name>_<n>`, so states are never silently merged.
#[derive(Debug, Default)]
pub struct Namer {
    names: HashMap<StateKey, String>,
    taken: HashMap<String, StateKey>,
}

impl Namer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the name of `key`, assigning one the first time it is seen.
    pub fn render(&mut self, key: &StateKey) -> Result<String, TranslationError> {
        if let Some(name) = self.names.get(key) {
            return Ok(name.clone());
        }

        let name = key.to_string();
        let Some(existing) = self.taken.get(&name) else {
            return Ok(self.assign(key, name));
        };

        if !matches!(key, StateKey::Original(_)) || key.is_terminal() {
            debug!("{existing:?} and {key:?} both render as {name}");
            return Err(TranslationError::NameCollision(name));
        }

        let fresh = (1..)
            .map(|n| format!("{name}_{n}"))
            .find(|candidate| !self.taken.contains_key(candidate))
            .ok_or_else(|| TranslationError::NameCollision(name.clone()))?;
        warn!("State {name} clashes with a generated state and is renamed to {fresh}");

        Ok(self.assign(key, fresh))
    }

    fn assign(&mut self, key: &StateKey, name: String) -> String {
        self.taken.insert(name.clone(), key.clone());
        self.names.insert(key.clone(), name.clone());
        name
    }

    /// Renders a whole table.
    ///
    /// Names are settled before any rule is written: generated states first,
    /// then original states that keep their own name, then the renamed ones.
    pub fn finish(
        mut self,
        convention: TapeConvention,
        transitions: Vec<KeyedTransition>,
    ) -> Result<Machine, TranslationError> {
        let (originals, generated): (Vec<&StateKey>, Vec<&StateKey>) = transitions
            .iter()
            .flat_map(|t| [&t.state, &t.next_state])
            .partition(|key| matches!(key, StateKey::Original(_)));

        for key in generated {
            self.render(key)?;
        }
        for key in &originals {
            if !self.taken.contains_key(&key.to_string()) {
                self.render(key)?;
            }
        }
        for key in originals {
            self.render(key)?;
        }

        let mut machine = Machine::new(convention);
        for t in &transitions {
            let state = self.render(&t.state)?;
            let next_state = self.render(&t.next_state)?;
            machine.add_transition(state, t.read, t.write, t.direction, next_state);
        }

        Ok(machine)
    }
}
