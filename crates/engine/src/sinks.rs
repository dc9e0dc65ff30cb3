//! Shipped result sinks

use crate::dispatcher::ResultSink;
use parking_lot::Mutex;
use sparkle_core::NodeReport;
use std::sync::Arc;
use tracing::{info, warn};

/// Sink that writes every detail of a received node to `tracing`.
///
/// Failed nodes are logged at `warn`, everything else at `info`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ResultSink for TracingSink {
    fn send(&mut self, report: &NodeReport) {
        let node = report.display_path();
        if report.is_fail() {
            warn!(target: "sparkle::report", run = %report.run_id, node = %node, result = %report.result, "Case finished");
        } else {
            info!(target: "sparkle::report", run = %report.run_id, node = %node, result = %report.result, "Case finished");
        }
        for detail in &report.details {
            info!(
                target: "sparkle::report",
                node = %node,
                "{}: {}, {}",
                detail.name,
                detail.message,
                detail.recorded_at.to_rfc3339()
            );
        }
    }
}

/// Sink that keeps every report in memory.
///
/// Clones share the same storage, so a caller can keep one handle while the
/// dispatcher owns another.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    reports: Arc<Mutex<Vec<NodeReport>>>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the reports received so far, in delivery order
    pub fn reports(&self) -> Vec<NodeReport> {
        self.reports.lock().clone()
    }

    /// Names of the reports received so far, in delivery order
    pub fn names(&self) -> Vec<String> {
        self.reports.lock().iter().map(|r| r.name.clone()).collect()
    }

    /// Number of reports received
    pub fn len(&self) -> usize {
        self.reports.lock().len()
    }

    /// Check if nothing was received
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResultSink for MemorySink {
    fn send(&mut self, report: &NodeReport) {
        self.reports.lock().push(report.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sparkle_core::{AssertionTree, Detail, NodeType};

    #[test]
    fn test_memory_sink_clones_share_storage() {
        let observer = MemorySink::new();
        let mut owned = observer.clone();

        let mut tree = AssertionTree::new();
        let id = tree.add_node("login", NodeType::Case, None);
        owned.send(&tree.report(id));

        assert_eq!(observer.len(), 1);
        assert_eq!(observer.names(), vec!["login"]);
    }

    #[test]
    fn test_tracing_sink_accepts_failed_report() {
        let mut tree = AssertionTree::new();
        let id = tree.add_node("logout", NodeType::Case, None);
        tree.push_detail(id, Detail::new("Assert", "Fail, because session kept alive"));
        tree.fail(id);

        let mut sink = TracingSink;
        sink.send(&tree.report(id));
    }
}
