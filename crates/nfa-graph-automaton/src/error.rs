//! Error types for the automaton engine.

use nfa_graph_core::{GraphError, NodeId};
use thiserror::Error;

/// Result type alias for automaton operations.
pub type AutomatonResult<T> = Result<T, AutomatonError>;

/// Errors that can occur while building or querying a state machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AutomatonError {
    /// Acceptance was queried before any step ran since the last reset.
    #[error("simulation not started: no active states to evaluate")]
    NotStarted,

    /// A node reached during evaluation was built without an accept/reject flag.
    #[error("node {node} has no acceptance flag")]
    MissingAcceptance { node: NodeId },

    /// A node handle does not belong to the machine's graph.
    #[error("node not found: {node}")]
    UnknownNode { node: NodeId },

    /// Graph construction error.
    #[error("graph construction error: {0}")]
    Graph(#[from] GraphError),
}
