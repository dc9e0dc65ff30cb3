//! Core types for Sparkle
//!
//! This crate defines the result model of the test engine:
//! - Value: dynamically typed values compared by assertions and passed as case arguments
//! - RunId / NodeId / NodeType / NodeResult: identity and outcome of tree nodes
//! - AssertionTree: arena of suite, feature and case nodes with eager fail propagation
//! - Assertion: the API a running hook or case body uses against its node
//! - NodeReport: immutable snapshot of a completed node, handed to sinks
//! - StepLogger: narration interface the engine reports lifecycle events to
//! - FailureDetail / CaseResult: the failure channel of hooks and case bodies

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod assertion;
pub mod detail;
pub mod failure;
pub mod logger;
pub mod report;
pub mod tree;
pub mod types;
pub mod value;

pub use assertion::{Assertion, CANNOT_BE_COMPARED};
pub use detail::Detail;
pub use failure::{CaseResult, FailureDetail};
pub use logger::{EventKind, NullLogger, StepLogger};
pub use report::NodeReport;
pub use tree::{AssertionNode, AssertionTree, RunSummary};
pub use types::{NodeId, NodeResult, NodeType, RunId};
pub use value::{Comparison, Value, ValueKind};
