//! Plain data row type written by trace backends.

use hb_core::{ActivationGraph, FrameTime, InstanceId};
use serde::{Deserialize, Serialize};

/// One activation node, flattened for tabular output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceRow {
    pub instance:    u32,
    pub frame:       u64,
    /// Position within the cycle's activation graph.
    pub order:       u32,
    pub option:      String,
    pub depth:       u32,
    pub state:       String,
    pub option_time: u64,
    pub state_time:  u64,
    /// Argument descriptions joined with `"; "`.
    pub arguments:   String,
}

impl TraceRow {
    /// Flatten `graph`, recorded by `instance` in the cycle `frame`.
    pub fn from_graph(instance: InstanceId, frame: FrameTime, graph: &ActivationGraph) -> Vec<TraceRow> {
        graph
            .iter()
            .enumerate()
            .map(|(i, node)| TraceRow {
                instance:    instance.0,
                frame:       frame.0,
                order:       i as u32,
                option:      node.option.to_owned(),
                depth:       node.depth,
                state:       node.state.to_owned(),
                option_time: node.option_time,
                state_time:  node.state_time,
                arguments:   node.arguments.join("; "),
            })
            .collect()
    }
}
