//! The activation graph: a per-cycle record of which options and states ran.
//!
//! Nodes are appended in call order, parent before children, so a viewer
//! can render the call tree by indenting each node by its `depth`.  The
//! graph is purely diagnostic; nothing in the engine reads it back.

/// One executed option in one cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ActivationNode {
    /// Option name.
    pub option: &'static str,
    /// Call-tree depth; root options have depth 1.
    pub depth: u32,
    /// Name of the state the option was in when it was recorded.
    pub state: &'static str,
    /// Time since the option was (re-)entered cold.
    pub option_time: u64,
    /// Time since the current state was entered.
    pub state_time: u64,
    /// `"name = value"` descriptions of the call's arguments.
    pub arguments: Vec<String>,
}

/// The ordered activation nodes of the most recent cycle.
///
/// Replaced, not appended, every cycle: the container clears it when a
/// cycle begins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ActivationGraph {
    nodes: Vec<ActivationNode>,
}

impl ActivationGraph {
    pub fn new() -> Self {
        Self { nodes: Vec::with_capacity(32) }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    #[inline]
    pub fn push(&mut self, node: ActivationNode) {
        self.nodes.push(node);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[ActivationNode] {
        &self.nodes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ActivationNode> {
        self.nodes.iter()
    }

    /// Option names in recorded order.
    pub fn option_names(&self) -> Vec<&'static str> {
        self.nodes.iter().map(|n| n.option).collect()
    }

    /// First node recorded for `option`, if it ran this cycle.
    pub fn find(&self, option: &str) -> Option<&ActivationNode> {
        self.nodes.iter().find(|n| n.option == option)
    }
}

impl<'a> IntoIterator for &'a ActivationGraph {
    type Item = &'a ActivationNode;
    type IntoIter = std::slice::Iter<'a, ActivationNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}
