//! Step logger interface
//!
//! The engine narrates feature and case lifecycles through a [`StepLogger`].
//! Implementations are best effort: the engine never inspects the outcome of
//! a log call.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of event reported to a [`StepLogger`] or recorded as a detail name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// A feature started running
    FeatureStart,
    /// A feature finished running
    FeatureEnd,
    /// A case body is about to run
    CaseStart,
    /// A case body returned
    CaseEnd,
    /// A lifecycle hook is about to run
    Step,
    /// A hook or case outcome
    Result,
    /// An assertion outcome
    Assert,
}

impl EventKind {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::FeatureStart => "Feature Start",
            EventKind::FeatureEnd => "Feature End",
            EventKind::CaseStart => "Case Start",
            EventKind::CaseEnd => "Case End",
            EventKind::Step => "Step",
            EventKind::Result => "Result",
            EventKind::Assert => "Assert",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receives lifecycle narration from the engine.
pub trait StepLogger {
    /// Record one event. `message` is already formatted.
    fn log(&self, kind: EventKind, message: fmt::Arguments<'_>);
}

impl<L: StepLogger + ?Sized> StepLogger for &L {
    fn log(&self, kind: EventKind, message: fmt::Arguments<'_>) {
        (**self).log(kind, message)
    }
}

impl<L: StepLogger + ?Sized> StepLogger for std::sync::Arc<L> {
    fn log(&self, kind: EventKind, message: fmt::Arguments<'_>) {
        (**self).log(kind, message)
    }
}

/// Logger that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLogger;

impl StepLogger for NullLogger {
    fn log(&self, _kind: EventKind, _message: fmt::Arguments<'_>) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Recorder(RefCell<Vec<String>>);

    impl StepLogger for Recorder {
        fn log(&self, kind: EventKind, message: fmt::Arguments<'_>) {
            self.0.borrow_mut().push(format!("{}: {}", kind, message));
        }
    }

    #[test]
    fn test_event_kind_labels() {
        assert_eq!(EventKind::FeatureStart.as_str(), "Feature Start");
        assert_eq!(EventKind::CaseEnd.to_string(), "Case End");
        assert_eq!(EventKind::Assert.as_str(), "Assert");
    }

    #[test]
    fn test_logger_through_reference() {
        let recorder = Recorder(RefCell::new(Vec::new()));
        let by_ref: &dyn StepLogger = &recorder;
        by_ref.log(EventKind::Step, format_args!("Running {}", "BeforeAll"));
        assert_eq!(recorder.0.borrow().as_slice(), ["Step: Running BeforeAll"]);
    }
}
