//! Error taxonomy of the cut machinery
//!
//! Configuration mistakes (full tables, absent collaborators, malformed cut
//! descriptions) are surfaced loudly through these variants. Per-track
//! anomalies such as an unavailable PID signal or a curve evaluated at the
//! edge of its domain are *not* errors: they are handled in-line by the
//! evaluator according to the rule's policy.

use thiserror::Error;

/// Everything that can go wrong while building or evaluating a cut table
#[derive(Error, Debug)]
pub enum Error {
    /// Cut table is full; the offending rule was not stored
    #[error("cut table already holds its maximum of {capacity} rules")]
    CapacityExceeded {
        /// Rule-count limit of the table that rejected the insertion
        capacity: usize,
    },

    /// Evaluation needed an accessor that was never configured
    #[error("missing collaborator: {0}")]
    MissingCollaborator(String),

    /// No preset registered under the requested id
    #[error("unknown preset id {0}")]
    UnknownPreset(i32),

    /// A cut description failed validation
    #[error("invalid cut configuration: {0}")]
    Config(String),

    /// A TOML cut description could not be decoded
    #[error("failed to parse cut configuration: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A cut description could not be encoded back to TOML
    #[error("failed to write cut configuration: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    /// A configuration file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
