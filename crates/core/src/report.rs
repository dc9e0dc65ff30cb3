//! Published node snapshots
//!
//! Once an iteration completes, the engine snapshots its node into a
//! [`NodeReport`] and hands the snapshot to the output queue. Sinks only ever
//! see reports, so the tree itself never crosses the thread boundary.

use crate::detail::Detail;
use crate::types::{NodeId, NodeResult, NodeType, RunId};
use serde::{Deserialize, Serialize};

/// Immutable snapshot of a completed node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeReport {
    /// Run the node belongs to
    pub run_id: RunId,
    /// Node id within its run's tree
    pub node_id: NodeId,
    /// Node name
    pub name: String,
    /// Names from the root down to this node
    pub path: Vec<String>,
    /// Node level
    pub node_type: NodeType,
    /// Resolved outcome (never `NotRun`)
    pub result: NodeResult,
    /// Detail log at publish time
    pub details: Vec<Detail>,
}

impl NodeReport {
    /// Path joined with `" / "`
    pub fn display_path(&self) -> String {
        self.path.join(" / ")
    }

    /// Check if the node failed
    pub fn is_fail(&self) -> bool {
        self.result.is_fail()
    }

    /// Details with the given name, in recording order
    pub fn details_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Detail> + 'a {
        self.details.iter().filter(move |d| d.name == name)
    }
}

#[cfg(test)]
mod tests {
    use crate::tree::AssertionTree;
    use crate::types::{NodeResult, NodeType};
    use crate::detail::Detail;

    #[test]
    fn test_report_serialization_shape() {
        let mut tree = AssertionTree::new();
        let feature = tree.add_node("checkout", NodeType::Feature, None);
        let case = tree.add_node("pay", NodeType::Case, Some(feature));
        tree.push_detail(case, Detail::new("Assert", "total expected Int(2), but actual was Int(3)"));
        tree.fail(case);

        let report = tree.report(case);
        assert_eq!(report.display_path(), "checkout / pay");
        assert!(report.is_fail());
        assert_eq!(report.details_named("Assert").count(), 1);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["name"], "pay");
        assert_eq!(json["node_type"], "Case");
        assert_eq!(json["result"], "Fail");
        assert_eq!(json["details"][0]["name"], "Assert");
    }

    #[test]
    fn test_report_resolves_not_run() {
        let mut tree = AssertionTree::new();
        let case = tree.add_node("quiet", NodeType::Case, None);
        assert_eq!(tree.node(case).result(), NodeResult::NotRun);
        assert_eq!(tree.report(case).result, NodeResult::Pass);
    }
}
