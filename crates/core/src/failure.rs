//! Failure values returned by hooks and case bodies
//!
//! Hooks and case bodies return [`CaseResult`]. An `Err` is converted by the
//! engine into a `Fail` result plus a detail carrying the message, so the
//! failure is visible in the signature instead of being intercepted
//! implicitly.
//!
//! `FailureDetail` converts from any `std::error::Error`, which lets case
//! bodies use `?` on fallible calls:
//!
//! ```
//! use sparkle_core::{CaseResult, FailureDetail};
//!
//! fn parse_port(raw: &str) -> CaseResult {
//!     let port: u16 = raw.parse()?;
//!     if port == 0 {
//!         return Err(FailureDetail::new("port must be non-zero"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(parse_port("8080").is_ok());
//! assert!(parse_port("http").is_err());
//! ```

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;

/// Result type returned by hooks and case bodies
pub type CaseResult = std::result::Result<(), FailureDetail>;

/// Why a hook or case body did not complete.
///
/// Not an `std::error::Error` itself: the blanket `From` impl below
/// requires it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureDetail {
    message: String,
    panicked: bool,
}

impl FailureDetail {
    /// Failure with a message
    pub fn new(message: impl Into<String>) -> Self {
        FailureDetail {
            message: message.into(),
            panicked: false,
        }
    }

    /// Failure built from a caught panic payload
    pub fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "(non-string panic)".to_string());
        FailureDetail {
            message,
            panicked: true,
        }
    }

    /// Failure message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether the failure came from a panic rather than a returned error
    pub fn is_panic(&self) -> bool {
        self.panicked
    }
}

impl fmt::Display for FailureDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.panicked {
            write!(f, "panicked: {}", self.message)
        } else {
            f.write_str(&self.message)
        }
    }
}

impl<E: std::error::Error> From<E> for FailureDetail {
    fn from(err: E) -> Self {
        FailureDetail::new(err.to_string())
    }
}
