//! Dispatcher: forwards published reports to a sink.
//!
//! [`start_listener`] is the blocking loop; [`Dispatcher::spawn`] runs it on a
//! dedicated thread named `sparkle-dispatch`. The loop calls
//! [`ResultSink::send`] once per report, synchronously and in arrival order,
//! until the stop signal ends the stream.

use crate::error::{EngineError, EngineResult};
use crate::queue::{ReportReceiver, StopMode, StopSignal};
use sparkle_core::NodeReport;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::thread::JoinHandle;
use tracing::{debug, error, info};

/// External consumer of completed nodes.
pub trait ResultSink: Send {
    /// Deliver one report. Called once per published node, in order.
    fn send(&mut self, report: &NodeReport);
}

impl<S: ResultSink + ?Sized> ResultSink for Box<S> {
    fn send(&mut self, report: &NodeReport) {
        (**self).send(report)
    }
}

/// Counters collected by one listener loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Reports handed to the sink
    pub delivered: u64,
    /// Sink calls that panicked (the report still counts as delivered)
    pub sink_panics: u64,
}

/// Forward every report from `receiver` to `sink` until the stream ends.
///
/// A panicking sink call is logged and the loop moves on to the next report.
pub fn start_listener<S: ResultSink + ?Sized>(
    sink: &mut S,
    receiver: &ReportReceiver,
) -> DispatchStats {
    let mut stats = DispatchStats::default();
    debug!(target: "sparkle::dispatch", "Listener started");

    while let Some(report) = receiver.recv() {
        debug!(
            target: "sparkle::dispatch",
            node = %report.display_path(),
            result = %report.result,
            "Sending report"
        );
        if let Err(e) = catch_unwind(AssertUnwindSafe(|| sink.send(&report))) {
            stats.sink_panics += 1;
            error!(
                target: "sparkle::dispatch",
                node = %report.display_path(),
                "sink panicked: {:?}",
                e.downcast_ref::<&str>().copied().unwrap_or("(non-string panic)")
            );
        }
        stats.delivered += 1;
    }

    info!(
        target: "sparkle::dispatch",
        delivered = stats.delivered,
        abandoned = receiver.len(),
        "Listener stopped"
    );
    stats
}

/// Listener running on its own thread.
pub struct Dispatcher<S: ResultSink + 'static> {
    handle: JoinHandle<(S, DispatchStats)>,
    stop: StopSignal,
}

impl<S: ResultSink + 'static> Dispatcher<S> {
    /// Start the listener thread. It owns `sink` and `receiver` until joined.
    pub fn spawn(mut sink: S, receiver: ReportReceiver, stop: StopSignal) -> EngineResult<Self> {
        let handle = std::thread::Builder::new()
            .name("sparkle-dispatch".to_string())
            .spawn(move || {
                let stats = start_listener(&mut sink, &receiver);
                (sink, stats)
            })
            .map_err(EngineError::Spawn)?;
        Ok(Dispatcher { handle, stop })
    }

    /// Fire the stop signal with `mode` and wait for the listener to finish.
    ///
    /// Returns the sink so callers can inspect what it collected.
    pub fn stop(self, mode: StopMode) -> EngineResult<(S, DispatchStats)> {
        self.stop.signal(mode);
        self.join()
    }

    /// Wait for the listener to finish after someone else fired the signal.
    pub fn join(self) -> EngineResult<(S, DispatchStats)> {
        self.handle
            .join()
            .map_err(|_| EngineError::DispatcherPanicked)
    }
}
