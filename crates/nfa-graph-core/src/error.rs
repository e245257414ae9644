//! Error types for graph construction.

use thiserror::Error;

use crate::graph::{NodeId, TransitionId};

/// Result type alias for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// Errors reported by graph construction and consistency checks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// A node handle does not belong to this graph.
    #[error("unknown node: {node}")]
    UnknownNode { node: NodeId },

    /// A transition handle does not belong to this graph.
    #[error("unknown transition: {transition}")]
    UnknownTransition { transition: TransitionId },

    /// A node lists an outgoing transition that does not list the node as an origin.
    #[error("node {node} lists outgoing {transition} without a matching origin link")]
    DanglingOutgoing {
        node: NodeId,
        transition: TransitionId,
    },

    /// A node lists an incoming transition that does not list the node as a destination.
    #[error("node {node} lists incoming {transition} without a matching destination link")]
    DanglingIncoming {
        node: NodeId,
        transition: TransitionId,
    },

    /// A transition lists an origin that does not list the transition as outgoing.
    #[error("transition {transition} lists origin {node} without a matching outgoing link")]
    DanglingOrigin {
        transition: TransitionId,
        node: NodeId,
    },

    /// A transition lists a destination that does not list the transition as incoming.
    #[error("transition {transition} lists destination {node} without a matching incoming link")]
    DanglingDestination {
        transition: TransitionId,
        node: NodeId,
    },
}
