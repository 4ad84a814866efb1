//! This module provides checks run on every parsed transition table before it is
//! handed to the translator.

use crate::types::{is_terminal, Machine, TranslationError, INITIAL_STATE, WILDCARD_SYMBOL};
use tracing::warn;

/// Represents the problems that can be found during the analysis of a transition table.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AnalysisError {
    /// A state is named `*`, which would read as a wildcard.
    WildcardState,
    /// The table has rules but none of them leaves the initial state.
    MissingInitialState,
}

impl From<AnalysisError> for TranslationError {
    /// Converts an `AnalysisError` into a `TranslationError::ValidationError`.
    fn from(error: AnalysisError) -> Self {
        match error {
            AnalysisError::WildcardState => TranslationError::ValidationError(format!(
                "'{WILDCARD_SYMBOL}' cannot be used as a state name"
            )),
            AnalysisError::MissingInitialState => TranslationError::ValidationError(format!(
                "No rule leaves the initial state '{INITIAL_STATE}'"
            )),
        }
    }
}

/// Analyzes a given `Machine` and returns the first problem found.
///
/// Rules that leave a terminal state are accepted, since they never fire,
/// but are logged.
pub fn analyze(machine: &Machine) -> Result<(), TranslationError> {
    let errors = [check_wildcard_states, check_initial_state]
        .iter()
        .filter_map(|f| f(machine).err())
        .collect::<Vec<_>>();

    if let Some(first_error) = errors.into_iter().next() {
        return Err(first_error.into());
    }

    for t in machine.transitions.iter().filter(|t| is_terminal(&t.state)) {
        warn!(
            "Rule on ({}, {}) leaves terminal state {} and will never fire",
            t.state, t.read, t.state
        );
    }

    Ok(())
}

fn check_wildcard_states(machine: &Machine) -> Result<(), AnalysisError> {
    let wildcard = WILDCARD_SYMBOL.to_string();

    if machine.states().contains(&wildcard.as_str()) {
        return Err(AnalysisError::WildcardState);
    }

    Ok(())
}

/// An empty table is accepted; any other table needs a rule for state `0`.
fn check_initial_state(machine: &Machine) -> Result<(), AnalysisError> {
    if !machine.is_empty() && !machine.transitions.iter().any(|t| t.state == INITIAL_STATE) {
        return Err(AnalysisError::MissingInitialState);
    }

    Ok(())
}
