//! This module provides the `MachineLoader` struct, responsible for reading transition
//! tables from files and strings and writing translated tables back to disk.

use crate::encoder::encode;
use crate::parser::parse;
use crate::types::{Machine, TranslationError, MAX_TABLE_SIZE};
use std::fs;
use std::path::Path;
use tracing::debug;

/// `MachineLoader` is a utility struct for loading and saving transition tables.
pub struct MachineLoader;

impl MachineLoader {
    /// Loads a single transition table from the specified file path.
    ///
    /// # Returns
    ///
    /// * `Ok(Machine)` if the file is successfully read and parsed.
    /// * `Err(TranslationError::FileError)` if the file cannot be read or is too large.
    /// * `Err(TranslationError::ParseError)` if the file content is not a valid table.
    ///   The error names the file as well as the line.
    pub fn load_machine(path: &Path) -> Result<Machine, TranslationError> {
        let content = fs::read_to_string(path).map_err(|e| {
            TranslationError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        if content.len() > MAX_TABLE_SIZE {
            return Err(TranslationError::FileError(format!(
                "File {} exceeds the maximum table size of {} bytes",
                path.display(),
                MAX_TABLE_SIZE
            )));
        }

        let machine = Self::load_machine_from_string(&content).map_err(|e| match e {
            TranslationError::ParseError(error) => {
                let path = path.display().to_string();
                TranslationError::ParseError(Box::new((*error).with_path(&path)))
            }
            TranslationError::ValidationError(msg) => {
                TranslationError::ValidationError(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })?;
        debug!("Loaded {} rules from {}", machine.len(), path.display());

        Ok(machine)
    }

    /// Loads a single transition table from the provided string content.
    pub fn load_machine_from_string(content: &str) -> Result<Machine, TranslationError> {
        parse(content)
    }

    /// Writes `machine` to `path` in the table format, replacing any existing file.
    pub fn save_machine(machine: &Machine, path: &Path) -> Result<(), TranslationError> {
        fs::write(path, encode(machine)).map_err(|e| {
            TranslationError::FileError(format!("Failed to write file {}: {}", path.display(), e))
        })
    }
}
