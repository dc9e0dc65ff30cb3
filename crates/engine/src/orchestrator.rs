//! Feature orchestration
//!
//! The orchestrator executes one feature's lifecycle against an
//! [`AssertionTree`] and publishes each completed iteration node:
//!
//! 1. Feature node created under the caller's parent; `FeatureStart` logged
//! 2. BeforeAll on the feature node. A failure marks the feature Fail and no
//!    case runs
//! 3. Each case in order: ignored and pending cases get an Ignore node (and
//!    are published); cases outside the tag filter get an Ignore node (not
//!    published); others run once, or once per generated argument tuple
//!    under `"<case>[<i>]"`
//! 4. AfterAll on the feature node
//! 5. `FeatureEnd` logged
//!
//! Per iteration: BeforeEach, body, AfterEach, then exactly one publish. A
//! BeforeEach failure skips the body and AfterEach. Hook and body failures
//! (a returned `Err`, a panic, or a hook leaving its node Fail) are recorded
//! on the node and never abort sibling cases.
//!
//! Cases within a feature always run sequentially on the calling thread.

use crate::descriptor::{BodyFn, Case, Feature, HookFn, TagFilter};
use crate::queue::Publisher;
use sparkle_core::{
    AssertionTree, CaseResult, Detail, EventKind, FailureDetail, NodeId, NodeType, StepLogger,
    Value,
};
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{debug, warn};

/// Runs features against a tree, publishing completed nodes.
pub struct Orchestrator<'a> {
    logger: &'a dyn StepLogger,
    publisher: &'a Publisher,
}

impl<'a> Orchestrator<'a> {
    /// Orchestrator narrating to `logger` and publishing through `publisher`
    pub fn new(logger: &'a dyn StepLogger, publisher: &'a Publisher) -> Self {
        Orchestrator { logger, publisher }
    }

    /// Run every case of `feature` under a new feature node.
    ///
    /// With a non-empty `tags`, only cases carrying at least one of them
    /// execute; the others are recorded as Ignore. Returns the feature node.
    pub fn run_feature<T: AsRef<str>>(
        &self,
        feature: &Feature,
        tree: &mut AssertionTree,
        parent: Option<NodeId>,
        tags: &[T],
    ) -> NodeId {
        let filter = TagFilter::new(tags.iter().map(|t| t.as_ref()));
        let filter = if filter.is_empty() { None } else { Some(&filter) };
        self.run(feature, feature.cases.iter(), tree, parent, filter)
    }

    /// Run an explicit subset of cases with `feature`'s hooks, without tag
    /// filtering. Returns the feature node.
    pub fn run_test_cases<'c, I>(
        &self,
        feature: &Feature,
        cases: I,
        tree: &mut AssertionTree,
        parent: Option<NodeId>,
    ) -> NodeId
    where
        I: IntoIterator<Item = &'c Case>,
    {
        self.run(feature, cases, tree, parent, None)
    }

    fn run<'c, I>(
        &self,
        feature: &Feature,
        cases: I,
        tree: &mut AssertionTree,
        parent: Option<NodeId>,
        filter: Option<&TagFilter>,
    ) -> NodeId
    where
        I: IntoIterator<Item = &'c Case>,
    {
        let feature_id = tree.add_node(feature.name(), NodeType::Feature, parent);
        self.logger.log(
            EventKind::FeatureStart,
            format_args!("Start running feature {}", feature.name()),
        );
        debug!(target: "sparkle::engine", feature = feature.name(), run = %tree.run_id(), "Feature started");

        if let Some(hook) = feature.before_all.as_deref() {
            self.logger
                .log(EventKind::Step, format_args!("Running BeforeAll"));
            if let Err(failure) = self.run_hook(hook, tree, feature_id) {
                self.fail_feature(tree, feature_id, "BeforeAll", feature.name(), &failure);
                self.end_feature(feature);
                return feature_id;
            }
        }

        for case in cases {
            self.run_case(feature, case, tree, feature_id, filter);
        }

        if let Some(hook) = feature.after_all.as_deref() {
            self.logger
                .log(EventKind::Step, format_args!("Running AfterAll"));
            if let Err(failure) = self.run_hook(hook, tree, feature_id) {
                self.fail_feature(tree, feature_id, "AfterAll", feature.name(), &failure);
            }
        }

        self.end_feature(feature);
        feature_id
    }

    fn run_case(
        &self,
        feature: &Feature,
        case: &Case,
        tree: &mut AssertionTree,
        feature_id: NodeId,
        filter: Option<&TagFilter>,
    ) {
        let body = match case.body.as_deref() {
            Some(body) if !case.ignore => body,
            _ => {
                let id = tree.add_node(case.name(), NodeType::Case, Some(feature_id));
                tree.ignore(id);
                debug!(target: "sparkle::engine", case = case.name(), "Case ignored");
                self.publish(tree, id);
                return;
            }
        };

        if let Some(filter) = filter {
            if !filter.matches(case) {
                let id = tree.add_node(case.name(), NodeType::Case, Some(feature_id));
                tree.ignore(id);
                debug!(target: "sparkle::engine", case = case.name(), "Case filtered out by tags");
                return;
            }
        }

        let Some(generate) = case.parameters.as_deref() else {
            self.run_iteration(feature, body, case.name().to_string(), &[], tree, feature_id);
            return;
        };

        match catch_unwind(AssertUnwindSafe(generate)) {
            Ok(parameter_sets) => {
                for (i, args) in parameter_sets.iter().enumerate() {
                    let name = format!("{}[{}]", case.name(), i);
                    self.run_iteration(feature, body, name, args, tree, feature_id);
                }
            }
            Err(payload) => {
                // No iteration exists yet; report the case itself as failed.
                let failure = FailureDetail::from_panic(payload.as_ref());
                let id = tree.add_node(case.name(), NodeType::Case, Some(feature_id));
                tree.fail(id);
                self.record_result(
                    tree,
                    id,
                    format!("parameter generator of testcase {} failed: {}", case.name(), failure),
                );
                self.publish(tree, id);
            }
        }
    }

    fn run_iteration(
        &self,
        feature: &Feature,
        body: &BodyFn,
        name: String,
        args: &[Value],
        tree: &mut AssertionTree,
        feature_id: NodeId,
    ) {
        let id = tree.add_node(name.as_str(), NodeType::Case, Some(feature_id));

        if let Some(hook) = feature.before_each.as_deref() {
            tree.push_detail(
                id,
                Detail::new(
                    EventKind::Step.as_str(),
                    format!("Running BeforeEach before testcase {}", name),
                ),
            );
            if let Err(failure) = self.run_hook(hook, tree, id) {
                tree.fail(id);
                self.record_result(
                    tree,
                    id,
                    format!("BeforeEach failed before testcase {}: {}", name, failure),
                );
                self.publish(tree, id);
                return;
            }
        }

        tree.push_detail(
            id,
            Detail::new(EventKind::CaseStart.as_str(), format!("Start running case {}", name)),
        );
        self.logger
            .log(EventKind::CaseStart, format_args!("Start running case {}", name));

        let outcome = {
            let mut assertion = tree.assertion(id, self.logger);
            invoke(|| body(&mut assertion, args))
        };

        tree.push_detail(
            id,
            Detail::new(EventKind::CaseEnd.as_str(), format!("End running case {}", name)),
        );
        self.logger
            .log(EventKind::CaseEnd, format_args!("End running case {}", name));

        if let Err(failure) = outcome {
            tree.fail(id);
            self.record_result(tree, id, format!("testcase {} failed: {}", name, failure));
        }

        if let Some(hook) = feature.after_each.as_deref() {
            tree.push_detail(
                id,
                Detail::new(
                    EventKind::Step.as_str(),
                    format!("Running AfterEach after testcase {}", name),
                ),
            );
            if let Err(failure) = self.run_hook(hook, tree, id) {
                tree.fail(id);
                self.record_result(
                    tree,
                    id,
                    format!("AfterEach failed after testcase {}: {}", name, failure),
                );
            }
        }

        self.publish(tree, id);
    }

    /// Run a hook on `id`. Besides an `Err` or a panic, a hook that turns a
    /// non-failed node into Fail (through the assertion API) has failed.
    fn run_hook(&self, hook: &HookFn, tree: &mut AssertionTree, id: NodeId) -> CaseResult {
        let was_failed = tree.node(id).result().is_fail();
        {
            let mut assertion = tree.assertion(id, self.logger);
            invoke(|| hook(&mut assertion))?;
        }
        if !was_failed && tree.node(id).result().is_fail() {
            return Err(FailureDetail::new("hook recorded a failure"));
        }
        Ok(())
    }

    fn fail_feature(
        &self,
        tree: &mut AssertionTree,
        feature_id: NodeId,
        hook: &str,
        feature: &str,
        failure: &FailureDetail,
    ) {
        tree.fail(feature_id);
        self.record_result(
            tree,
            feature_id,
            format!("{} failed on feature {}: {}", hook, feature, failure),
        );
    }

    fn record_result(&self, tree: &mut AssertionTree, id: NodeId, message: String) {
        self.logger
            .log(EventKind::Result, format_args!("{}", message));
        warn!(target: "sparkle::engine", node = %tree.path(id).join(" / "), "{}", message);
        tree.push_detail(id, Detail::new(EventKind::Result.as_str(), message));
    }

    fn end_feature(&self, feature: &Feature) {
        self.logger.log(
            EventKind::FeatureEnd,
            format_args!("End running feature {}", feature.name()),
        );
        debug!(target: "sparkle::engine", feature = feature.name(), "Feature finished");
    }

    fn publish(&self, tree: &AssertionTree, id: NodeId) {
        if let Err(e) = self.publisher.publish(tree.report(id)) {
            warn!(
                target: "sparkle::engine",
                node = %tree.path(id).join(" / "),
                error = %e,
                "Dropping report published after stop"
            );
        }
    }
}

/// Call a hook or body, turning a panic into a failure.
fn invoke(f: impl FnOnce() -> CaseResult) -> CaseResult {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => Err(FailureDetail::from_panic(payload.as_ref())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::{report_channel, ReportReceiver, StopMode, StopSignal};
    use sparkle_core::{NodeReport, NodeResult, NullLogger};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Harness {
        publisher: Publisher,
        receiver: ReportReceiver,
        stop: StopSignal,
        tree: AssertionTree,
    }

    impl Harness {
        fn new() -> Self {
            let (publisher, receiver, stop) = report_channel(64);
            Harness {
                publisher,
                receiver,
                stop,
                tree: AssertionTree::new(),
            }
        }

        fn published(&self) -> Vec<NodeReport> {
            self.stop.signal(StopMode::Drain);
            std::iter::from_fn(|| self.receiver.recv()).collect()
        }
    }

    #[test]
    fn test_invoke_converts_panic() {
        let result = invoke(|| panic!("kaboom"));
        let failure = result.unwrap_err();
        assert!(failure.is_panic());
        assert_eq!(failure.message(), "kaboom");
    }

    #[test]
    fn test_hook_leaving_node_failed_counts_as_failure() {
        let mut h = Harness::new();
        let feature = Feature::new("f")
            .before_each(|node| {
                node.assert_fail("fixture missing");
                Ok(())
            })
            .case(Case::new("c", |_, _| Ok(())));

        let orchestrator = Orchestrator::new(&NullLogger, &h.publisher);
        let feature_id = orchestrator.run_feature(&feature, &mut h.tree, None, &[] as &[&str]);

        let case = h.tree.find_child(feature_id, "c").unwrap();
        let node = h.tree.node(case);
        assert_eq!(node.result(), NodeResult::Fail);
        assert!(node.details().iter().all(|d| d.name != "Case Start"));
        assert_eq!(h.published().len(), 1);
    }

    #[test]
    fn test_after_each_not_blamed_for_body_failure() {
        let mut h = Harness::new();
        let feature = Feature::new("f")
            .after_each(|_| Ok(()))
            .case(Case::new("c", |node, _| {
                node.assert_fail("broken");
                Ok(())
            }));

        let orchestrator = Orchestrator::new(&NullLogger, &h.publisher);
        let feature_id = orchestrator.run_feature(&feature, &mut h.tree, None, &[] as &[&str]);
        let case = h.tree.find_child(feature_id, "c").unwrap();

        let results: Vec<&str> = h
            .tree
            .node(case)
            .details()
            .iter()
            .filter(|d| d.name == "Result")
            .map(|d| d.message.as_str())
            .collect();
        assert!(results.is_empty(), "unexpected result details: {:?}", results);
        assert_eq!(h.tree.node(case).result(), NodeResult::Fail);
    }

    #[test]
    fn test_generator_called_once() {
        let mut h = Harness::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let feature = Feature::new("f").case(
            Case::new("p", |_, _| Ok(())).parameterize(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                vec![vec![Value::Int(1)], vec![Value::Int(2)]]
            }),
        );

        let orchestrator = Orchestrator::new(&NullLogger, &h.publisher);
        orchestrator.run_feature(&feature, &mut h.tree, None, &[] as &[&str]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.published().len(), 2);
    }

    #[test]
    fn test_panicking_generator_fails_case() {
        let mut h = Harness::new();
        let feature = Feature::new("f")
            .case(Case::new("p", |_, _| Ok(())).parameterize(|| panic!("no fixtures")))
            .case(Case::new("after", |_, _| Ok(())));

        let orchestrator = Orchestrator::new(&NullLogger, &h.publisher);
        let feature_id = orchestrator.run_feature(&feature, &mut h.tree, None, &[] as &[&str]);

        let p = h.tree.find_child(feature_id, "p").unwrap();
        assert_eq!(h.tree.node(p).result(), NodeResult::Fail);
        let after = h.tree.find_child(feature_id, "after").unwrap();
        assert_eq!(h.tree.node(after).outcome(), NodeResult::Pass);

        let names: Vec<String> = h.published().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["p", "after"]);
    }

    #[test]
    fn test_publish_after_stop_is_dropped_not_fatal() {
        let mut h = Harness::new();
        h.stop.signal(StopMode::Immediate);
        let feature = Feature::new("f").case(Case::new("c", |_, _| Ok(())));

        let orchestrator = Orchestrator::new(&NullLogger, &h.publisher);
        let feature_id = orchestrator.run_feature(&feature, &mut h.tree, None, &[] as &[&str]);
        assert_eq!(h.tree.node(feature_id).children().len(), 1);
        assert_eq!(h.publisher.published(), 0);
    }
}
