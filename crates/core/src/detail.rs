//! Detail records attached to assertion nodes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A timestamped, named entry in a node's detail log.
///
/// Details are append-only: once pushed onto a node they are never removed
/// or reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detail {
    /// Entry name, usually an [`EventKind`](crate::logger::EventKind) label such as "Assert"
    pub name: String,
    /// Rendered message
    pub message: String,
    /// When the entry was recorded
    pub recorded_at: DateTime<Utc>,
}

impl Detail {
    /// Create a detail stamped with the current time
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Detail {
            name: name.into(),
            message: message.into(),
            recorded_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_is_timestamped() {
        let before = Utc::now();
        let detail = Detail::new("Step", "Running BeforeEach");
        assert_eq!(detail.name, "Step");
        assert_eq!(detail.message, "Running BeforeEach");
        assert!(detail.recorded_at >= before);
    }
}
