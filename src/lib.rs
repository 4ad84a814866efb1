//! This crate translates single-tape Turing machine transition tables between the
//! one-way infinite (Sipser) tape convention and the two-way infinite convention.
//! It includes modules for parsing and writing tables, validating them, and
//! synthesizing the gadget states that emulate one tape model on the other.

pub mod alphabet;
pub mod analyzer;
pub mod encoder;
pub mod gadget;
pub mod loader;
pub mod namer;
pub mod parser;
pub mod translator;
pub mod types;

#[cfg(test)]
mod machine;

/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use crate::parser::Rule;
/// Re-exports the `analyze` function and `AnalysisError` enum from the analyzer module.
pub use analyzer::{analyze, AnalysisError};
/// Re-exports the writing functions from the encoder module.
pub use encoder::{encode, encode_json};
/// Re-exports the `MachineLoader` struct from the loader module.
pub use loader::MachineLoader;
/// Re-exports the `parse` function from the parser module.
pub use parser::parse;
/// Re-exports the translation entry points.
pub use translator::{translate, TranslateOptions, Translator};
/// Re-exports the table types and the crate error type from the types module.
pub use types::{Direction, Machine, TapeConvention, Transition, TranslationError};
