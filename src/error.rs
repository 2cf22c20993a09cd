//! Error types for betweenness search.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading, searching, or persisting.
///
/// Running out of temperature without satisfying every constraint is not an
/// error; see [`crate::anneal::AnnealOutcome::Exhausted`].
#[derive(Debug, Error)]
pub enum BetweennessError {
    /// Malformed counts or constraint lines in an instance.
    #[error("Invalid instance: {0}")]
    InvalidInstance(String),

    /// A constraint names a variable the ordering does not contain.
    #[error("Constraint {constraint} references unknown variable `{variable}`")]
    InvalidConstraint { constraint: usize, variable: String },

    /// Fewer than two variables: no neighbor move exists.
    #[error("Degenerate instance: {variables} variable(s), at least 2 required")]
    DegenerateInstance { variables: usize },

    /// The persisted checkpoint could not be understood.
    #[error("Corrupt checkpoint: {0}")]
    CheckpointCorrupt(String),

    /// Writing a checkpoint or final result failed.
    #[error("Persistence failure on {target}: {source}")]
    PersistenceFailure {
        target: String,
        #[source]
        source: io::Error,
    },

    /// Reading an input file failed.
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An [`crate::AnnealConfig`] value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[cfg(feature = "serde")]
    #[error("TOML parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl BetweennessError {
    pub(crate) fn persistence(target: impl Into<String>, source: io::Error) -> Self {
        Self::PersistenceFailure {
            target: target.into(),
            source,
        }
    }
}

/// Result type alias for betweenness operations.
pub type Result<T> = std::result::Result<T, BetweennessError>;
