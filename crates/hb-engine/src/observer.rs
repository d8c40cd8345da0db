//! Cycle observer trait for trace export and progress reporting.

use hb_core::{ActivationGraph, FrameTime, InstanceId};

/// Callbacks invoked by [`Behavior::run_cycle`][crate::Behavior::run_cycle].
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: depth printer
///
/// ```rust,ignore
/// struct TreePrinter;
///
/// impl CycleObserver for TreePrinter {
///     fn on_cycle_end(&mut self, _id: InstanceId, now: FrameTime, graph: &ActivationGraph) {
///         for node in graph {
///             println!("{now} {:indent$}{} [{}]", "", node.option, node.state, indent = 2 * node.depth as usize);
///         }
///     }
/// }
/// ```
pub trait CycleObserver {
    /// Called before the cycle begins.
    fn on_cycle_start(&mut self, _instance: InstanceId, _now: FrameTime) {}

    /// Called after the cycle ended, with the finished activation graph.
    fn on_cycle_end(&mut self, _instance: InstanceId, _now: FrameTime, _graph: &ActivationGraph) {}
}

/// A [`CycleObserver`] that does nothing.
pub struct NoopObserver;

impl CycleObserver for NoopObserver {}
