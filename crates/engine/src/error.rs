//! Error types for the engine
//!
//! Test outcomes never surface here: hook, case and assertion failures are
//! recorded on tree nodes. `EngineError` covers the machinery around a run
//! (configuration, threads, the report queue).

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for engine operations
pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Errors raised by the engine machinery
#[derive(Debug, Error)]
pub enum EngineError {
    /// Config file could not be read or written
    #[error("Config file '{path}': {source}")]
    ConfigIo {
        /// Path of the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Config file is not valid TOML for `EngineConfig`
    #[error("Failed to parse config file '{path}': {source}")]
    ConfigParse {
        /// Path of the config file
        path: PathBuf,
        /// Underlying TOML error
        #[source]
        source: toml::de::Error,
    },

    /// Config could not be serialized
    #[error("Failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Config parsed but holds an unusable value
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Dispatcher thread could not be started
    #[error("Failed to spawn dispatcher thread: {0}")]
    Spawn(#[source] io::Error),

    /// Dispatcher thread panicked outside of a sink call
    #[error("Dispatcher thread panicked")]
    DispatcherPanicked,

    /// Report published after the stop signal fired or the receiver was dropped
    #[error("Report queue is closed")]
    QueueClosed,
}

impl EngineError {
    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        EngineError::InvalidConfig(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_invalid_config() {
        let err = EngineError::invalid_config("queue_capacity must be greater than 0");
        let msg = err.to_string();
        assert!(msg.contains("Invalid config"));
        assert!(msg.contains("queue_capacity"));
    }

    #[test]
    fn test_error_display_config_io() {
        let err = EngineError::ConfigIo {
            path: PathBuf::from("/missing/sparkle.toml"),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/missing/sparkle.toml"));
        assert!(msg.contains("not found"));
    }

    #[test]
    fn test_error_display_queue_closed() {
        assert_eq!(EngineError::QueueClosed.to_string(), "Report queue is closed");
    }
}
