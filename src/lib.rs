//! Sparkle - hierarchical test-execution engine with streaming result reporting
//!
//! Sparkle runs features (groups of test cases sharing lifecycle hooks),
//! records every outcome in an assertion tree and streams each completed case
//! to a sink running on its own thread.
//!
//! # Quick Start
//!
//! ```
//! use sparkle::{Case, Feature, MemorySink, NullLogger, Runner};
//!
//! let feature = Feature::new("arithmetic").case(Case::new("add", |node, _| {
//!     node.assert_equals(2, 1 + 1, "int assert");
//!     Ok(())
//! }));
//!
//! let sink = MemorySink::new();
//! let outcome = Runner::default()
//!     .run(&[feature], &[] as &[&str], &NullLogger, sink.clone())
//!     .unwrap();
//!
//! assert!(!outcome.summary().has_failures());
//! assert_eq!(sink.names(), vec!["add"]);
//! ```
//!
//! # Architecture
//!
//! The result model (tree, assertions, values, reports) lives in
//! `sparkle-core`; orchestration, the report queue and the dispatcher live in
//! `sparkle-engine`. Both are re-exported here.

pub use sparkle_core::*;
pub use sparkle_engine::*;
