//! `hb-output` — activation-trace writers for the rust_hb engine.
//!
//! | Backend | Files created            |
//! |---------|--------------------------|
//! | CSV     | `activation_trace.csv`   |
//!
//! Writers implement [`TraceWriter`] and are driven by [`TraceObserver`],
//! which implements `hb_engine::CycleObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use hb_output::{CsvTraceWriter, TraceObserver};
//!
//! let writer = CsvTraceWriter::new(Path::new("./output"))?;
//! let mut obs = TraceObserver::new(writer);
//! for t in 0..100 {
//!     behavior.run_cycle(FrameTime(t), &["play_soccer"], &mut obs)?;
//! }
//! obs.finish();
//! obs.take_error().map(|e| eprintln!("trace error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use csv::CsvTraceWriter;
pub use error::{OutputError, OutputResult};
pub use observer::TraceObserver;
pub use row::TraceRow;
pub use writer::TraceWriter;
