//! Error types for arkcalc-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in arkcalc-core
///
/// Only the I/O boundary produces these. Sheet resolution and the damage model
/// never fail; unresolved values are carried as `None` instead.
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to open or append to a file
    #[error("failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse CSV
    #[error("failed to parse CSV '{path}': {message}")]
    CsvParse { path: PathBuf, message: String },

    /// CSV parsing error from the csv crate
    #[error("CSV error in '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// No character matched a lookup
    #[error("character not found: {0}")]
    CharacterNotFound(String),

    /// Character has no skill with this number
    #[error("skill {number} not found for '{character}'")]
    SkillNotFound { character: String, number: u32 },

    /// Rank label is unknown or missing from the sheet
    #[error("rank '{0}' not found")]
    RankNotFound(String),

    /// Multiplier could not be extracted and none was supplied
    #[error("multiplier for '{0}' could not be read from the effect text; pass it explicitly")]
    MultiplierUnresolved(String),

    /// Structure file has no fenced block to replace
    #[error("no code block found in '{0}'")]
    StructureBlockMissing(PathBuf),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
