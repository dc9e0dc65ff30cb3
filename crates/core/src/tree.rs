//! Assertion tree
//!
//! Results of a run are kept in an arena: every node lives in one `Vec`
//! owned by the [`AssertionTree`], children are referenced by [`NodeId`] and
//! the parent link is an index, never an owning pointer.
//!
//! ## Invariants
//!
//! - A node is attached to its parent's children when it is created and the
//!   parent never changes afterwards
//! - Children keep insertion order, which is execution order
//! - Failing a node fails every ancestor (eager, idempotent)
//! - Ignore is assigned directly and never propagates
//! - Details are append-only

use crate::assertion::Assertion;
use crate::detail::Detail;
use crate::logger::StepLogger;
use crate::report::NodeReport;
use crate::types::{NodeId, NodeResult, NodeType, RunId};
use serde::{Deserialize, Serialize};

/// One suite, feature or case run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssertionNode {
    name: String,
    node_type: NodeType,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    result: NodeResult,
    details: Vec<Detail>,
}

impl AssertionNode {
    /// Node name, unique only among its siblings
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Node level
    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    /// Parent node, `None` for a root
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in execution order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Raw result (`NotRun` until failed or ignored)
    pub fn result(&self) -> NodeResult {
        self.result
    }

    /// Result as reported: `NotRun` resolves to `Pass`
    pub fn outcome(&self) -> NodeResult {
        self.result.resolved()
    }

    /// Detail log in recording order
    pub fn details(&self) -> &[Detail] {
        &self.details
    }
}

/// Case counts by outcome
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Cases that resolved to Pass
    pub passed: usize,
    /// Cases that failed
    pub failed: usize,
    /// Cases that were ignored
    pub ignored: usize,
}

impl RunSummary {
    /// Total number of cases counted
    pub fn total(&self) -> usize {
        self.passed + self.failed + self.ignored
    }

    /// Check if any case failed
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// Arena holding every node of one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssertionTree {
    run_id: RunId,
    nodes: Vec<AssertionNode>,
    roots: Vec<NodeId>,
}

impl Default for AssertionTree {
    fn default() -> Self {
        Self::new()
    }
}

impl AssertionTree {
    /// Create an empty tree with a fresh run id
    pub fn new() -> Self {
        Self::with_run_id(RunId::new())
    }

    /// Create an empty tree for a known run id
    pub fn with_run_id(run_id: RunId) -> Self {
        AssertionTree {
            run_id,
            nodes: Vec::new(),
            roots: Vec::new(),
        }
    }

    /// Run this tree records
    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Create a node with result `NotRun` and attach it under `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` was not issued by this tree.
    pub fn add_node(
        &mut self,
        name: impl Into<String>,
        node_type: NodeType,
        parent: Option<NodeId>,
    ) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        match parent {
            Some(parent_id) => self.nodes[parent_id.index()].children.push(id),
            None => self.roots.push(id),
        }
        self.nodes.push(AssertionNode {
            name: name.into(),
            node_type,
            parent,
            children: Vec::new(),
            result: NodeResult::NotRun,
            details: Vec::new(),
        });
        id
    }

    /// Look up a node
    pub fn get(&self, id: NodeId) -> Option<&AssertionNode> {
        self.nodes.get(id.index())
    }

    /// Look up a node issued by this tree.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this tree.
    pub fn node(&self, id: NodeId) -> &AssertionNode {
        &self.nodes[id.index()]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut AssertionNode {
        &mut self.nodes[id.index()]
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes created without a parent, in creation order
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Iterate over all nodes in creation order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &AssertionNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeId::new(i), node))
    }

    /// Find a direct child by name
    pub fn find_child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.node(parent)
            .children
            .iter()
            .copied()
            .find(|child| self.node(*child).name == name)
    }

    /// Mark a node Fail and walk the parent chain marking each ancestor Fail.
    pub fn fail(&mut self, id: NodeId) {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.node_mut(node_id);
            node.result = NodeResult::Fail;
            current = node.parent;
        }
    }

    /// Mark a node Ignore. Ancestors are not touched.
    pub fn ignore(&mut self, id: NodeId) {
        self.node_mut(id).result = NodeResult::Ignore;
    }

    /// Append a detail to a node's log without affecting its result
    pub fn push_detail(&mut self, id: NodeId, detail: Detail) {
        self.node_mut(id).details.push(detail);
    }

    /// Names from the root down to `id`, inclusive
    pub fn path(&self, id: NodeId) -> Vec<String> {
        let mut path = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.node(node_id);
            path.push(node.name.clone());
            current = node.parent;
        }
        path.reverse();
        path
    }

    /// Open a node for mutation through the assertion API
    pub fn assertion<'t>(&'t mut self, id: NodeId, logger: &'t dyn StepLogger) -> Assertion<'t> {
        Assertion::new(self, id, logger)
    }

    /// Immutable snapshot of a node, as handed to sinks
    pub fn report(&self, id: NodeId) -> NodeReport {
        let node = self.node(id);
        NodeReport {
            run_id: self.run_id,
            node_id: id,
            name: node.name.clone(),
            path: self.path(id),
            node_type: node.node_type,
            result: node.outcome(),
            details: node.details.clone(),
        }
    }

    /// Count case nodes by outcome
    pub fn summary(&self) -> RunSummary {
        let mut summary = RunSummary::default();
        for node in self.nodes.iter().filter(|n| n.node_type == NodeType::Case) {
            match node.outcome() {
                NodeResult::Fail => summary.failed += 1,
                NodeResult::Ignore => summary.ignored += 1,
                _ => summary.passed += 1,
            }
        }
        summary
    }
}
