//! Error types for the data-loader crate.
//!
//! Everything that can go wrong between a file on disk and a validated
//! collection of records ends up in [`DataLoadError`].

use thiserror::Error;

/// Errors that can occur while loading, validating or saving records
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading or writing a file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The document is not valid JSON, or a record is missing a required field
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A record parsed but breaks one of the record invariants
    ///
    /// Examples: an item without tags, a negative affinity weight,
    /// the same item listed twice in a history.
    #[error("Malformed {entity} record {id}: {reason}")]
    MalformedRecord {
        entity: String,
        id: String,
        reason: String,
    },

    /// Two records of the same collection share an identifier
    #[error("Duplicate {entity} id: {id}")]
    DuplicateId { entity: String, id: String },

    /// Referenced entity doesn't exist (e.g., history entry for a missing item)
    #[error("Missing reference: {entity} with id {id}")]
    MissingReference { entity: String, id: String },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
