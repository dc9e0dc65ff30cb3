//! Logging integration
//!
//! - [`TracingLogger`]: the shipped [`StepLogger`], turning engine narration
//!   into `tracing` events
//! - [`init`]: installs a `tracing-subscriber` fmt subscriber from [`LogConfig`]

use crate::config::LogConfig;
use crate::error::EngineResult;
use sparkle_core::{EventKind, StepLogger};
use std::fmt;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Step logger that emits one `info` event per engine event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl StepLogger for TracingLogger {
    fn log(&self, kind: EventKind, message: fmt::Arguments<'_>) {
        info!(target: "sparkle::engine", kind = %kind, "{}: {}", kind, message);
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` overrides the configured level when set. Returns `Ok(false)`
/// when a global subscriber was already installed.
pub fn init(config: &LogConfig) -> EngineResult<bool> {
    let level = config.level_filter()?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string().to_lowercase()));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(true);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    match installed {
        Ok(()) => Ok(true),
        Err(e) => {
            tracing::debug!(target: "sparkle::engine", error = %e, "Subscriber already installed");
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;

    #[test]
    fn test_init_twice_is_harmless() {
        let config = LogConfig::default();
        // Another test may have installed the subscriber first.
        let _ = init(&config).unwrap();
        assert!(!init(&config).unwrap());
    }

    #[test]
    fn test_init_rejects_bad_level() {
        let config = LogConfig {
            level: "chatty".to_string(),
            json: false,
        };
        assert!(matches!(init(&config), Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn test_tracing_logger_accepts_all_kinds() {
        let logger = TracingLogger;
        for kind in [
            EventKind::FeatureStart,
            EventKind::FeatureEnd,
            EventKind::CaseStart,
            EventKind::CaseEnd,
            EventKind::Step,
            EventKind::Result,
            EventKind::Assert,
        ] {
            logger.log(kind, format_args!("event {}", kind));
        }
    }
}
