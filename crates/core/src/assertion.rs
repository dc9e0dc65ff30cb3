//! Assertion API
//!
//! An [`Assertion`] is a node of an [`AssertionTree`] opened for mutation.
//! Hooks and case bodies receive one and use it to record comparisons, add
//! narration and fail their node. Every failure recorded here:
//! - appends an "Assert" detail to the node
//! - fails the node and, eagerly, all of its ancestors
//! - is reported to the step logger as an `Assert` event
//!
//! ```
//! use sparkle_core::{AssertionTree, NodeResult, NodeType, NullLogger};
//!
//! let mut tree = AssertionTree::new();
//! let case = tree.add_node("add", NodeType::Case, None);
//! let mut assertion = tree.assertion(case, &NullLogger);
//! assertion.assert_equals(2, 1 + 2, "sum");
//!
//! assert_eq!(tree.node(case).result(), NodeResult::Fail);
//! assert_eq!(tree.node(case).details()[0].message, "sum expected Int(2), but actual was Int(3)");
//! ```

use crate::detail::Detail;
use crate::logger::{EventKind, StepLogger};
use crate::tree::{AssertionNode, AssertionTree};
use crate::types::{NodeId, NodeResult, NodeType};
use crate::value::{Comparison, Value};

/// Detail message recorded when values cannot be compared
pub const CANNOT_BE_COMPARED: &str = "cannot be compared";

/// Mutable handle on one node of a tree.
pub struct Assertion<'t> {
    tree: &'t mut AssertionTree,
    id: NodeId,
    logger: &'t dyn StepLogger,
}

impl<'t> Assertion<'t> {
    pub(crate) fn new(tree: &'t mut AssertionTree, id: NodeId, logger: &'t dyn StepLogger) -> Self {
        Assertion { tree, id, logger }
    }

    /// Id of the node
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Read-only view of the node
    pub fn node(&self) -> &AssertionNode {
        self.tree.node(self.id)
    }

    /// Node name
    pub fn name(&self) -> &str {
        self.node().name()
    }

    /// Node level
    pub fn node_type(&self) -> NodeType {
        self.node().node_type()
    }

    /// Current raw result
    pub fn result(&self) -> NodeResult {
        self.node().result()
    }

    /// Detail log so far
    pub fn details(&self) -> &[Detail] {
        self.node().details()
    }

    /// Logger bound to this handle
    pub fn logger(&self) -> &dyn StepLogger {
        self.logger
    }

    /// Fail when `expected` and `actual` differ.
    ///
    /// Kind mismatch, sequence length mismatch and the first differing
    /// element all fail with a message naming both values. Values that
    /// cannot be compared fail with "cannot be compared". Returns whether
    /// the assertion held.
    pub fn assert_equals(
        &mut self,
        expected: impl Into<Value>,
        actual: impl Into<Value>,
        title: &str,
    ) -> bool {
        let expected = expected.into();
        let actual = actual.into();
        match expected.compare(&actual) {
            Comparison::Equal => true,
            Comparison::Different => {
                self.record_failure(format!(
                    "{} expected {}({}), but actual was {}({})",
                    title,
                    expected.type_name(),
                    expected,
                    actual.type_name(),
                    actual
                ));
                false
            }
            Comparison::Incomparable => {
                self.record_failure(CANNOT_BE_COMPARED.to_string());
                false
            }
        }
    }

    /// Fail when `expected` and `actual` are equal.
    ///
    /// A kind or length mismatch already counts as different. Values that
    /// cannot be compared fail with "cannot be compared".
    pub fn assert_not_equals(
        &mut self,
        expected: impl Into<Value>,
        actual: impl Into<Value>,
        title: &str,
    ) -> bool {
        let expected = expected.into();
        let actual = actual.into();
        match expected.compare(&actual) {
            Comparison::Different => true,
            Comparison::Equal => {
                self.record_failure(format!(
                    "{} expected not {}({}), but actual was {}({})",
                    title,
                    expected.type_name(),
                    expected,
                    actual.type_name(),
                    actual
                ));
                false
            }
            Comparison::Incomparable => {
                self.record_failure(CANNOT_BE_COMPARED.to_string());
                false
            }
        }
    }

    /// Fail unconditionally with `reason`.
    pub fn assert_fail(&mut self, reason: &str) {
        self.record_failure(format!("Fail, because {}", reason));
    }

    /// Append a detail without affecting the result.
    pub fn add_detail(&mut self, name: impl Into<String>, message: impl Into<String>) {
        self.tree.push_detail(self.id, Detail::new(name, message));
    }

    /// Append a detail named after an event kind.
    pub fn add_event(&mut self, kind: EventKind, message: impl Into<String>) {
        self.add_detail(kind.as_str(), message);
    }

    /// Mark this node and all of its ancestors Fail.
    pub fn fail(&mut self) {
        self.tree.fail(self.id);
    }

    fn record_failure(&mut self, message: String) {
        self.logger
            .log(EventKind::Assert, format_args!("{}: {}", self.name(), message));
        self.add_event(EventKind::Assert, message);
        self.fail();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::NullLogger;
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::fmt;

    fn case_tree() -> (AssertionTree, NodeId, NodeId) {
        let mut tree = AssertionTree::new();
        let feature = tree.add_node("feature", NodeType::Feature, None);
        let case = tree.add_node("case", NodeType::Case, Some(feature));
        (tree, feature, case)
    }

    #[derive(Default)]
    struct Recorder(RefCell<Vec<(EventKind, String)>>);

    impl StepLogger for Recorder {
        fn log(&self, kind: EventKind, message: fmt::Arguments<'_>) {
            self.0.borrow_mut().push((kind, message.to_string()));
        }
    }

    #[test]
    fn test_assert_equals_pass_leaves_node_untouched() {
        let (mut tree, feature, case) = case_tree();
        let mut a = tree.assertion(case, &NullLogger);
        assert!(a.assert_equals(2, 1 + 1, "sum"));
        assert!(a.assert_equals(vec![1, 2, 3], vec![1, 2, 3], "seq"));
        assert!(a.assert_equals(Vec::<i32>::new(), Vec::<i32>::new(), "empty"));
        assert!(a.assert_equals("x", "x", "str"));

        assert_eq!(tree.node(case).result(), NodeResult::NotRun);
        assert!(tree.node(case).details().is_empty());
        assert_eq!(tree.node(feature).outcome(), NodeResult::Pass);
    }

    #[test]
    fn test_assert_equals_length_mismatch() {
        let (mut tree, feature, case) = case_tree();
        let mut a = tree.assertion(case, &NullLogger);
        assert!(!a.assert_equals(vec![1, 2, 3], vec![1, 2], "seq"));

        let node = tree.node(case);
        assert_eq!(node.result(), NodeResult::Fail);
        assert_eq!(node.details().len(), 1);
        assert_eq!(node.details()[0].name, "Assert");
        assert_eq!(tree.node(feature).result(), NodeResult::Fail);
    }

    #[test]
    fn test_assert_equals_kind_mismatch() {
        let (mut tree, _, case) = case_tree();
        let mut a = tree.assertion(case, &NullLogger);
        assert!(!a.assert_equals(1, 1.0, "kind"));
        assert_eq!(
            tree.node(case).details()[0].message,
            "kind expected Int(1), but actual was Float(1)"
        );
    }

    #[test]
    fn test_assert_equals_element_mismatch() {
        let (mut tree, _, case) = case_tree();
        let mut a = tree.assertion(case, &NullLogger);
        assert!(!a.assert_equals(vec!["a", "b"], vec!["a", "c"], "letters"));
        assert_eq!(
            tree.node(case).details()[0].message,
            "letters expected Array([\"a\", \"b\"]), but actual was Array([\"a\", \"c\"])"
        );
    }

    #[test]
    fn test_assert_equals_incomparable_elements() {
        let (mut tree, _, case) = case_tree();
        let handles = Value::Array(vec![Value::Opaque("conn".into())]);
        let mut a = tree.assertion(case, &NullLogger);
        assert!(!a.assert_equals(handles.clone(), handles, "handles"));

        let node = tree.node(case);
        assert_eq!(node.result(), NodeResult::Fail);
        assert_eq!(node.details()[0].message, CANNOT_BE_COMPARED);
    }

    #[test]
    fn test_assert_not_equals() {
        let (mut tree, _, case) = case_tree();
        let mut a = tree.assertion(case, &NullLogger);
        assert!(a.assert_not_equals(1, 2, "different"));
        assert!(a.assert_not_equals(1, "1", "kind mismatch"));
        assert!(a.assert_not_equals(vec![1, 2], vec![1], "length mismatch"));
        assert_eq!(tree.node(case).result(), NodeResult::NotRun);

        let mut a = tree.assertion(case, &NullLogger);
        assert!(!a.assert_not_equals(1, 1, "same"));
        let node = tree.node(case);
        assert_eq!(node.result(), NodeResult::Fail);
        assert_eq!(node.details()[0].message, "same expected not Int(1), but actual was Int(1)");
    }

    #[test]
    fn test_assert_not_equals_all_elements_equal() {
        let (mut tree, _, case) = case_tree();
        let mut a = tree.assertion(case, &NullLogger);
        assert!(!a.assert_not_equals(vec![1, 2], vec![1, 2], "seq"));
        assert_eq!(tree.node(case).result(), NodeResult::Fail);
    }

    #[test]
    fn test_assert_fail_and_logger() {
        let (mut tree, feature, case) = case_tree();
        let recorder = Recorder::default();
        let mut a = tree.assertion(case, &recorder);
        a.assert_fail("service unavailable");

        let node = tree.node(case);
        assert_eq!(node.details()[0].message, "Fail, because service unavailable");
        assert_eq!(tree.node(feature).result(), NodeResult::Fail);

        let events = recorder.0.borrow();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].0, EventKind::Assert);
        assert_eq!(events[0].1, "case: Fail, because service unavailable");
    }

    #[test]
    fn test_add_detail_does_not_change_result() {
        let (mut tree, _, case) = case_tree();
        let mut a = tree.assertion(case, &NullLogger);
        a.add_detail("Step", "login");
        a.add_event(EventKind::Step, "open cart");
        assert_eq!(a.result(), NodeResult::NotRun);
        assert_eq!(a.details().len(), 2);
        assert_eq!(a.details()[1].name, "Step");
        assert_eq!(a.name(), "case");
        assert_eq!(a.node_type(), NodeType::Case);
    }

    fn scalar() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::Int),
            any::<f64>().prop_map(Value::Float),
            ".*".prop_map(Value::String),
            proptest::collection::vec(any::<u8>(), 0..8).prop_map(Value::Bytes),
        ]
    }

    fn comparable() -> impl Strategy<Value = Value> {
        scalar().prop_recursive(3, 24, 6, |inner| {
            prop_oneof![
                proptest::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
                proptest::collection::btree_map(".{0,4}", inner, 0..4).prop_map(Value::Object),
            ]
        })
    }

    proptest! {
        #[test]
        fn prop_assert_equals_is_reflexive(value in comparable()) {
            let (mut tree, _, case) = case_tree();
            let mut a = tree.assertion(case, &NullLogger);
            prop_assert!(a.assert_equals(value.clone(), value, "self"));
            prop_assert_eq!(tree.node(case).result(), NodeResult::NotRun);
        }
    }
}
