//! Core graph primitive shared across the nfa-graph workspace.
//!
//! A [`Graph`] stores nodes and transitions in two arenas addressed by
//! [`NodeId`] and [`TransitionId`]. Nodes carry an optional payload `V` and
//! ordered incoming/outgoing transition lists; transitions carry an optional
//! payload `E` and ordered origin/destination lists, so a single transition
//! may join several nodes on either end.
//!
//! [`StateSet`] is the set-of-nodes type that automata built on top of the
//! graph use for their active states.

mod error;
mod graph;
mod state_set;

pub use error::{GraphError, GraphResult};
pub use graph::{Graph, GraphNode, GraphTransition, NodeId, TransitionId};
pub use state_set::StateSet;
