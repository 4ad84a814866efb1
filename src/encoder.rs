//! This module writes machines back out, either in the table format read by the parser
//! or as JSON.

use crate::types::{Machine, Transition, TranslationError};

/// Encodes a machine into the table format.
///
/// Format: a `;S` or `;I` header line, then one `state read write move next`
/// line per transition, in table order. Moves are always written as `l`, `r`
/// or `*`, so the output is accepted by [`parse`](crate::parse).
pub fn encode(machine: &Machine) -> String {
    let mut encoded = format!(";{}\n", machine.convention.tag());

    for transition in &machine.transitions {
        encoded.push_str(&encode_rule(transition));
        encoded.push('\n');
    }

    encoded
}

fn encode_rule(t: &Transition) -> String {
    format!(
        "{} {} {} {} {}",
        t.state,
        t.read,
        t.write,
        t.direction.code(),
        t.next_state
    )
}

/// Encodes a machine as pretty-printed JSON.
pub fn encode_json(machine: &Machine) -> Result<String, TranslationError> {
    serde_json::to_string_pretty(machine).map_err(|e| TranslationError::EncodeError(e.to_string()))
}
