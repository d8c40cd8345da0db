//! The `TraceWriter` trait implemented by all trace backends.

use crate::{OutputResult, TraceRow};

/// Sink for activation-trace rows.
///
/// Errors are stored by [`TraceObserver`][crate::TraceObserver] and
/// retrieved with its `take_error`.
pub trait TraceWriter {
    /// Write the rows of one cycle.
    fn write_rows(&mut self, rows: &[TraceRow]) -> OutputResult<()>;

    /// Flush and close the underlying files.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
