//! Engine configuration via `sparkle.toml`
//!
//! Every field has a default, so an empty file (or no file at all, through
//! `EngineConfig::default()`) yields a working configuration.

use crate::error::{EngineError, EngineResult};
use crate::queue::{StopMode, DEFAULT_QUEUE_CAPACITY};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tracing::level_filters::LevelFilter;

/// Config file name looked up by callers
pub const CONFIG_FILE_NAME: &str = "sparkle.toml";

/// Logging section (`[log]`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogConfig {
    /// Maximum level: "trace", "debug", "info", "warn", "error" or "off"
    #[serde(default = "default_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: default_level(),
            json: false,
        }
    }
}

impl LogConfig {
    /// Parse the level string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a tracing level.
    pub fn level_filter(&self) -> EngineResult<LevelFilter> {
        LevelFilter::from_str(&self.level).map_err(|_| {
            EngineError::invalid_config(format!(
                "Invalid log level '{}'. Expected one of trace, debug, info, warn, error, off.",
                self.level
            ))
        })
    }
}

/// Engine configuration loaded from `sparkle.toml`.
///
/// # Example
///
/// ```toml
/// queue_capacity = 10
/// stop_mode = "drain"
/// suite = "nightly"
///
/// [log]
/// level = "info"
/// json = false
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EngineConfig {
    /// Depth of the report queue between orchestrator and dispatcher
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    /// What the dispatcher does with queued reports when stopped
    #[serde(default)]
    pub stop_mode: StopMode,
    /// Name of the root suite node created by the runner
    #[serde(default = "default_suite")]
    pub suite: String,
    /// Logging settings
    #[serde(default)]
    pub log: LogConfig,
}

fn default_queue_capacity() -> usize {
    DEFAULT_QUEUE_CAPACITY
}

fn default_suite() -> String {
    "sparkle".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            queue_capacity: default_queue_capacity(),
            stop_mode: StopMode::default(),
            suite: default_suite(),
            log: LogConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Check values that parse but cannot be used.
    pub fn validate(&self) -> EngineResult<()> {
        if self.queue_capacity == 0 {
            return Err(EngineError::invalid_config(
                "queue_capacity must be greater than 0",
            ));
        }
        self.log.level_filter()?;
        Ok(())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Sparkle engine configuration

# Depth of the queue between the orchestrator and the dispatcher.
# Publishing blocks while the queue is full.
queue_capacity = 10

# What happens to queued reports when the run stops:
#   "drain"     = deliver everything already queued, then stop (default)
#   "immediate" = stop at once, queued reports are dropped
stop_mode = "drain"

# Name of the root suite node.
suite = "sparkle"

[log]
# trace, debug, info, warn, error or off. RUST_LOG overrides this.
level = "info"
# Emit JSON lines instead of human-readable output.
json = false
"#
    }

    /// Read, parse and validate config from a file path.
    pub fn from_file(path: &Path) -> EngineResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| EngineError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config: EngineConfig =
            toml::from_str(&content).map_err(|source| EngineError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    pub fn write_default_if_missing(path: &Path) -> EngineResult<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|source| {
                EngineError::ConfigIo {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> EngineResult<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| EngineError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })
    }
}
