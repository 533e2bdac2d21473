//! Error types for the configuration store.

use std::path::PathBuf;
use thiserror::Error;

/// Failure raised by [`ConfigManager`](crate::store::ConfigManager) operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing file could not be read or parsed. The in-memory
    /// document is left as it was.
    #[error("failed to load config from {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: LoadError,
    },

    /// The document could not be written back. The in-memory document is
    /// unaffected.
    #[error("failed to save config to {}: {source}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: SaveError,
    },

    /// A `set` had to descend through a value that is not a mapping.
    #[error("cannot set '{key}': '{at}' is not a mapping")]
    TypeMismatch { key: String, at: String },

    /// The key is empty or contains an empty segment.
    #[error("invalid config key '{key}'")]
    InvalidKey { key: String },
}

/// Why a load failed.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("top-level value must be a mapping, found {0}")]
    NotAMapping(&'static str),
}

/// Why a save failed.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_yaml::Error),
}

/// Strict lookup outcome. `get` folds both variants into its default.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("config key '{key}' not found")]
    Absent { key: String },

    #[error("config key '{key}': '{at}' is not a mapping")]
    NotAMapping { key: String, at: String },
}
