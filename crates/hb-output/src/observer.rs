//! `TraceObserver<T>` — bridges `CycleObserver` to a `TraceWriter`.

use hb_core::{ActivationGraph, FrameTime, InstanceId};
use hb_engine::CycleObserver;

use crate::writer::TraceWriter;
use crate::{OutputError, OutputResult, TraceRow};

/// A [`CycleObserver`] that writes every finished activation graph to a
/// [`TraceWriter`].
///
/// Errors from the writer are stored internally because `CycleObserver`
/// methods have no return value.  After the run, call
/// [`finish`][Self::finish] and check [`take_error`][Self::take_error].
/// One observer may serve several behavior instances; rows carry the
/// instance id.
pub struct TraceObserver<T: TraceWriter> {
    writer:     T,
    cycles:     u64,
    last_error: Option<OutputError>,
}

impl<T: TraceWriter> TraceObserver<T> {
    pub fn new(writer: T) -> Self {
        Self { writer, cycles: 0, last_error: None }
    }

    /// Number of cycles observed.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Flush the writer.
    pub fn finish(&mut self) {
        let result = self.writer.finish();
        self.store_err(result);
    }

    /// Take the stored write error (if any).
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> T {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                tracing::warn!(error = %e, "trace write failed");
                self.last_error = Some(e);
            }
        }
    }
}

impl<T: TraceWriter> CycleObserver for TraceObserver<T> {
    fn on_cycle_end(&mut self, instance: InstanceId, now: FrameTime, graph: &ActivationGraph) {
        self.cycles += 1;
        if graph.is_empty() {
            return;
        }
        let rows = TraceRow::from_graph(instance, now, graph);
        let result = self.writer.write_rows(&rows);
        self.store_err(result);
    }
}
