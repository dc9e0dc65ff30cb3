//! Core types for Sparkle
//!
//! This module defines the foundational types:
//! - RunId: Unique identifier for one run of the engine (one assertion tree)
//! - NodeId: Arena index of a node inside an assertion tree
//! - NodeType: Suite / Feature / Case
//! - NodeResult: NotRun / Pass / Fail / Ignore

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a run
///
/// A RunId is a wrapper around a UUID v4. Every assertion tree gets one, and
/// every report published from that tree carries it, so a sink shared by
/// several runs can tell them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(Uuid);

impl RunId {
    /// Create a new random RunId using UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a RunId from a string representation
    ///
    /// Returns None if the string is not a valid UUID.
    pub fn from_string(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok().map(Self)
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Index of a node in its [`AssertionTree`](crate::tree::AssertionTree).
///
/// Ids are only meaningful for the tree that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Raw arena index
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Level of a node in the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    /// Grouping of features
    Suite,
    /// One feature run with its lifecycle hooks
    Feature,
    /// One case (or one parameterized iteration of a case)
    Case,
}

impl NodeType {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Suite => "Test Suite",
            NodeType::Feature => "Test Feature",
            NodeType::Case => "Test Case",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a node
///
/// Nodes start at `NotRun`. There is no explicit transition to `Pass`:
/// a node that was never failed or ignored resolves to `Pass` when reported
/// (see [`NodeResult::resolved`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NodeResult {
    /// Nothing recorded yet
    #[default]
    NotRun,
    /// Completed without failure
    Pass,
    /// A failure was recorded on this node or a descendant
    Fail,
    /// Skipped (ignored flag, pending body, or tag filter)
    Ignore,
}

impl NodeResult {
    /// Resolve `NotRun` to `Pass`; other results are returned unchanged.
    pub fn resolved(self) -> Self {
        match self {
            NodeResult::NotRun => NodeResult::Pass,
            other => other,
        }
    }

    /// Check if this result is a failure
    pub fn is_fail(&self) -> bool {
        matches!(self, NodeResult::Fail)
    }

    /// Check if this result is ignored
    pub fn is_ignored(&self) -> bool {
        matches!(self, NodeResult::Ignore)
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeResult::NotRun => "Not Run",
            NodeResult::Pass => "Pass",
            NodeResult::Fail => "Fail",
            NodeResult::Ignore => "Ignore",
        }
    }
}

impl fmt::Display for NodeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_id_unique() {
        let a = RunId::new();
        let b = RunId::new();
        assert_ne!(a, b);
        assert_eq!(RunId::from_string(&a.to_string()), Some(a));
        assert!(RunId::from_string("not-a-uuid").is_none());
    }

    #[test]
    fn test_result_resolution() {
        assert_eq!(NodeResult::default(), NodeResult::NotRun);
        assert_eq!(NodeResult::NotRun.resolved(), NodeResult::Pass);
        assert_eq!(NodeResult::Fail.resolved(), NodeResult::Fail);
        assert_eq!(NodeResult::Ignore.resolved(), NodeResult::Ignore);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(NodeResult::NotRun.to_string(), "Not Run");
        assert_eq!(NodeResult::Ignore.to_string(), "Ignore");
        assert_eq!(NodeType::Feature.to_string(), "Test Feature");
        assert_eq!(NodeType::Case.to_string(), "Test Case");
    }
}
