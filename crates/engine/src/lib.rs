//! Execution engine for Sparkle
//!
//! This crate runs features against the result model of `sparkle-core`:
//! - Descriptors: features, cases, hooks, tags and parameter generators
//! - Orchestrator: sequential feature lifecycle with tag filtering and
//!   per-iteration hook semantics
//! - Queue: bounded report channel with an explicit stop signal
//! - Dispatcher: background listener forwarding reports to a sink
//! - Runner: the above wired together from an `EngineConfig`
//!
//! Only the orchestrator mutates the tree. The dispatcher thread sees
//! immutable `NodeReport` snapshots.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod descriptor;
pub mod dispatcher;
pub mod error;
pub mod logging;
pub mod orchestrator;
pub mod queue;
pub mod runner;
pub mod sinks;

pub use config::{EngineConfig, LogConfig, CONFIG_FILE_NAME};
pub use descriptor::{BodyFn, Case, Feature, HookFn, ParamsFn, TagFilter};
pub use dispatcher::{start_listener, DispatchStats, Dispatcher, ResultSink};
pub use error::{EngineError, EngineResult};
pub use logging::TracingLogger;
pub use orchestrator::Orchestrator;
pub use queue::{
    report_channel, Publisher, ReportReceiver, StopMode, StopSignal, DEFAULT_QUEUE_CAPACITY,
};
pub use runner::{RunOutcome, Runner};
pub use sinks::{MemorySink, TracingSink};
