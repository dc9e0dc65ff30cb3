//! Whole-run driver: queue, dispatcher thread and orchestrator wired from an
//! [`EngineConfig`].

use crate::config::EngineConfig;
use crate::descriptor::Feature;
use crate::dispatcher::{DispatchStats, Dispatcher, ResultSink};
use crate::error::EngineResult;
use crate::orchestrator::Orchestrator;
use crate::queue::report_channel;
use sparkle_core::{AssertionTree, NodeId, NodeType, RunSummary, StepLogger};
use tracing::info;

/// Everything a finished run hands back.
#[derive(Debug)]
pub struct RunOutcome<S> {
    /// Fully formed result tree
    pub tree: AssertionTree,
    /// Root suite node
    pub suite: NodeId,
    /// The sink, returned by the dispatcher thread
    pub sink: S,
    /// Delivery counters of the dispatcher
    pub stats: DispatchStats,
}

impl<S> RunOutcome<S> {
    /// Case outcome counts
    pub fn summary(&self) -> RunSummary {
        self.tree.summary()
    }
}

/// Runs features under one suite node while a dispatcher thread forwards
/// completed cases to a sink.
#[derive(Debug, Clone, Default)]
pub struct Runner {
    config: EngineConfig,
}

impl Runner {
    /// Runner using `config`
    pub fn new(config: EngineConfig) -> Self {
        Runner { config }
    }

    /// Active configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run `features` in order, then stop the dispatcher with the configured
    /// stop mode.
    ///
    /// Case failures never surface here; they are in the returned tree.
    ///
    /// # Errors
    ///
    /// Fails only if the dispatcher thread cannot be spawned or panics.
    pub fn run<S, T>(
        &self,
        features: &[Feature],
        tags: &[T],
        logger: &dyn StepLogger,
        sink: S,
    ) -> EngineResult<RunOutcome<S>>
    where
        S: ResultSink + 'static,
        T: AsRef<str>,
    {
        let (publisher, receiver, stop) = report_channel(self.config.queue_capacity);
        let dispatcher = Dispatcher::spawn(sink, receiver, stop)?;

        let mut tree = AssertionTree::new();
        let suite = tree.add_node(self.config.suite.as_str(), NodeType::Suite, None);
        info!(
            target: "sparkle::engine",
            run = %tree.run_id(),
            suite = %self.config.suite,
            features = features.len(),
            "Run started"
        );

        let orchestrator = Orchestrator::new(logger, &publisher);
        for feature in features {
            orchestrator.run_feature(feature, &mut tree, Some(suite), tags);
        }

        let (sink, stats) = dispatcher.stop(self.config.stop_mode)?;
        let summary = tree.summary();
        info!(
            target: "sparkle::engine",
            run = %tree.run_id(),
            passed = summary.passed,
            failed = summary.failed,
            ignored = summary.ignored,
            published = publisher.published(),
            delivered = stats.delivered,
            "Run finished"
        );

        Ok(RunOutcome {
            tree,
            suite,
            sink,
            stats,
        })
    }
}
