//! Error types for settings I/O.
//!
//! The engine itself has no error channel: every frame operation either draws
//! or does nothing.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or saving detail view settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Reading or writing the settings file failed.
    #[error("settings I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid settings RON.
    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    /// Settings could not be serialized.
    #[error("RON serialize error: {0}")]
    Serialize(#[from] ron::Error),

    /// No platform config directory to fall back to.
    #[error("no config directory available")]
    NoConfigDir,
}
