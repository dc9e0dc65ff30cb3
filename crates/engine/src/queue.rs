//! Bounded report queue between the orchestrator and the dispatcher.
//!
//! [`report_channel`] returns three handles:
//! - [`Publisher`]: producer side, blocks while the queue is at capacity
//! - [`ReportReceiver`]: consumer side, blocks until a report or the stop signal
//! - [`StopSignal`]: the only cancellation mechanism, distinct from "queue empty"
//!
//! Two stop policies exist. [`StopMode::Drain`] lets the receiver hand out
//! everything already queued before it reports the end of the stream;
//! [`StopMode::Immediate`] ends the stream at once and abandons queued
//! reports. Publishing after either signal fails with
//! [`EngineError::QueueClosed`]: the publisher must signal only after it has
//! finished publishing.

use crate::error::{EngineError, EngineResult};
use parking_lot::{Condvar, Mutex};
use serde::{Deserialize, Serialize};
use sparkle_core::NodeReport;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Default queue depth
pub const DEFAULT_QUEUE_CAPACITY: usize = 10;

/// How the receiver reacts to the stop signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopMode {
    /// Deliver every report already queued, then stop
    #[default]
    Drain,
    /// Stop at once; queued reports are abandoned
    Immediate,
}

struct QueueState {
    items: VecDeque<NodeReport>,
    stop: Option<StopMode>,
    receiver_dropped: bool,
}

struct QueueInner {
    state: Mutex<QueueState>,
    not_empty: Condvar,
    not_full: Condvar,
    capacity: usize,
    published: AtomicU64,
}

/// Create a bounded report queue.
///
/// A capacity of zero is raised to one.
pub fn report_channel(capacity: usize) -> (Publisher, ReportReceiver, StopSignal) {
    let inner = Arc::new(QueueInner {
        state: Mutex::new(QueueState {
            items: VecDeque::with_capacity(capacity.max(1)),
            stop: None,
            receiver_dropped: false,
        }),
        not_empty: Condvar::new(),
        not_full: Condvar::new(),
        capacity: capacity.max(1),
        published: AtomicU64::new(0),
    });
    (
        Publisher {
            inner: Arc::clone(&inner),
        },
        ReportReceiver {
            inner: Arc::clone(&inner),
        },
        StopSignal { inner },
    )
}

/// Producer handle. Cloning gives another producer on the same queue.
#[derive(Clone)]
pub struct Publisher {
    inner: Arc<QueueInner>,
}

impl Publisher {
    /// Enqueue a report, blocking while the queue is full.
    ///
    /// Returns `Err(QueueClosed)` once the stop signal has fired or the
    /// receiver is gone, including while blocked on a full queue.
    pub fn publish(&self, report: NodeReport) -> EngineResult<()> {
        let mut state = self.inner.state.lock();
        loop {
            if state.stop.is_some() || state.receiver_dropped {
                return Err(EngineError::QueueClosed);
            }
            if state.items.len() < self.inner.capacity {
                break;
            }
            self.inner.not_full.wait(&mut state);
        }
        state.items.push_back(report);
        self.inner.published.fetch_add(1, Ordering::Relaxed);
        drop(state);
        self.inner.not_empty.notify_one();
        Ok(())
    }

    /// Total reports accepted by the queue
    pub fn published(&self) -> u64 {
        self.inner.published.load(Ordering::Relaxed)
    }

    /// Queue capacity
    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }
}

/// Consumer handle. There is exactly one per queue.
pub struct ReportReceiver {
    inner: Arc<QueueInner>,
}

impl ReportReceiver {
    /// Wait for the next report.
    ///
    /// Returns `None` when the stream has ended: immediately after an
    /// `Immediate` stop, or once the queue is empty after a `Drain` stop.
    pub fn recv(&self) -> Option<NodeReport> {
        let mut state = self.inner.state.lock();
        loop {
            if state.stop == Some(StopMode::Immediate) {
                return None;
            }
            if let Some(report) = state.items.pop_front() {
                drop(state);
                self.inner.not_full.notify_one();
                return Some(report);
            }
            if state.stop == Some(StopMode::Drain) {
                return None;
            }
            self.inner.not_empty.wait(&mut state);
        }
    }

    /// Number of reports waiting
    pub fn len(&self) -> usize {
        self.inner.state.lock().items.len()
    }

    /// Check if no report is waiting
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Drop for ReportReceiver {
    fn drop(&mut self) {
        // Wake publishers blocked on a full queue so they observe the closure.
        let mut state = self.inner.state.lock();
        state.receiver_dropped = true;
        drop(state);
        self.inner.not_full.notify_all();
    }
}

/// Stop indicator shared by the caller and the dispatcher.
#[derive(Clone)]
pub struct StopSignal {
    inner: Arc<QueueInner>,
}

impl StopSignal {
    /// Fire the stop signal.
    ///
    /// A `Drain` signal can later be escalated to `Immediate`; the reverse
    /// is ignored.
    pub fn signal(&self, mode: StopMode) {
        {
            let mut state = self.inner.state.lock();
            if state.stop.is_none() || mode == StopMode::Immediate {
                state.stop = Some(mode);
            }
        }
        // Wake both sides: the receiver to end the stream, blocked
        // publishers to fail with QueueClosed.
        self.inner.not_empty.notify_all();
        self.inner.not_full.notify_all();
    }

    /// Mode the signal fired with, if it has
    pub fn mode(&self) -> Option<StopMode> {
        self.inner.state.lock().stop
    }

    /// Check if the signal has fired
    pub fn is_signaled(&self) -> bool {
        self.mode().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sparkle_core::{AssertionTree, NodeType};
    use std::thread;
    use std::time::Duration;

    fn reports(n: usize) -> Vec<NodeReport> {
        let mut tree = AssertionTree::new();
        (0..n)
            .map(|i| {
                let id = tree.add_node(format!("case-{}", i), NodeType::Case, None);
                tree.report(id)
            })
            .collect()
    }

    #[test]
    fn test_fifo_order() {
        let (publisher, receiver, stop) = report_channel(8);
        for report in reports(5) {
            publisher.publish(report).unwrap();
        }
        stop.signal(StopMode::Drain);

        let names: Vec<String> = std::iter::from_fn(|| receiver.recv()).map(|r| r.name).collect();
        assert_eq!(names, vec!["case-0", "case-1", "case-2", "case-3", "case-4"]);
        assert_eq!(publisher.published(), 5);
    }

    #[test]
    fn test_immediate_stop_abandons_queue() {
        let (publisher, receiver, stop) = report_channel(8);
        for report in reports(3) {
            publisher.publish(report).unwrap();
        }
        stop.signal(StopMode::Immediate);
        assert!(receiver.recv().is_none());
        assert_eq!(receiver.len(), 3);
    }

    #[test]
    fn test_drain_can_escalate_to_immediate() {
        let (_publisher, _receiver, stop) = report_channel(1);
        stop.signal(StopMode::Drain);
        stop.signal(StopMode::Immediate);
        assert_eq!(stop.mode(), Some(StopMode::Immediate));
        stop.signal(StopMode::Drain);
        assert_eq!(stop.mode(), Some(StopMode::Immediate));
    }

    #[test]
    fn test_publish_after_stop_is_rejected() {
        let (publisher, _receiver, stop) = report_channel(4);
        stop.signal(StopMode::Drain);
        let result = publisher.publish(reports(1).remove(0));
        assert!(matches!(result, Err(EngineError::QueueClosed)));
    }

    #[test]
    fn test_publish_blocks_at_capacity() {
        let (publisher, receiver, stop) = report_channel(2);
        let mut batch = reports(3);
        publisher.publish(batch.remove(0)).unwrap();
        publisher.publish(batch.remove(0)).unwrap();

        let blocked = thread::spawn({
            let publisher = publisher.clone();
            let last = batch.remove(0);
            move || publisher.publish(last)
        });

        thread::sleep(Duration::from_millis(50));
        assert_eq!(publisher.published(), 2, "third publish should be waiting");

        assert_eq!(receiver.recv().unwrap().name, "case-0");
        blocked.join().unwrap().unwrap();
        assert_eq!(publisher.published(), 3);

        stop.signal(StopMode::Drain);
        assert_eq!(receiver.recv().unwrap().name, "case-1");
        assert_eq!(receiver.recv().unwrap().name, "case-2");
        assert!(receiver.recv().is_none());
    }

    #[test]
    fn test_blocked_publisher_released_by_stop() {
        let (publisher, _receiver, stop) = report_channel(1);
        let mut batch = reports(2);
        publisher.publish(batch.remove(0)).unwrap();

        let blocked = thread::spawn({
            let publisher = publisher.clone();
            let last = batch.remove(0);
            move || publisher.publish(last)
        });
        thread::sleep(Duration::from_millis(50));
        stop.signal(StopMode::Immediate);

        assert!(matches!(blocked.join().unwrap(), Err(EngineError::QueueClosed)));
    }

    #[test]
    fn test_receiver_waits_for_stop_when_empty() {
        let (_publisher, receiver, stop) = report_channel(1);
        let waiter = thread::spawn(move || receiver.recv().is_none());
        thread::sleep(Duration::from_millis(50));
        stop.signal(StopMode::Drain);
        assert!(waiter.join().unwrap());
    }

    #[test]
    fn test_zero_capacity_is_raised() {
        let (publisher, _receiver, _stop) = report_channel(0);
        assert_eq!(publisher.capacity(), 1);
    }
}
