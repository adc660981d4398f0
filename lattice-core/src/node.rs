//! Node identity and lifecycle state.

use std::fmt;

/// Identifies a node within a [`Tree`](crate::Tree).
///
/// Ids are assigned by the tree implementation and stay stable for the whole
/// life of the node, including while a subtree is detached during a graft.
/// Removing a node retires its id; ids are never reused.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle state of a container node.
///
/// A single explicit state machine instead of scattered boolean markers on
/// the node itself. `Bound` is entered exactly once and never left; the
/// `ui-container-loaded` class is mirrored onto the node at that moment for
/// marker compatibility, but the runtime only ever consults this state.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum NodeState {
    /// No component instance is attached yet.
    #[default]
    Unbound,
    /// Lifecycle initialization has run; a component instance is attached.
    Bound,
}

impl NodeState {
    /// Whether lifecycle initialization has run for the node.
    pub fn is_bound(self) -> bool {
        matches!(self, Self::Bound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_unbound() {
        assert!(!NodeState::default().is_bound());
        assert!(NodeState::Bound.is_bound());
    }

    #[test]
    fn node_id_display_is_prefixed() {
        assert_eq!(NodeId(7).to_string(), "#7");
    }
}
