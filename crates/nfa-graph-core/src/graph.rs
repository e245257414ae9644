//! Arena-backed directed hypergraph.
//!
//! Nodes and transitions live in two arenas and refer to each other through
//! stable handles. Every link is recorded twice: once in the node's
//! incoming/outgoing list and once in the transition's destination/origin
//! list. The composite operations (`add_outgoing`, `remove_destination`, ...)
//! update both sides at once; the `*_one_sided` variants touch a single side
//! and leave the graph inconsistent until the counterpart call is made.
//!
//! ```text
//!   node.outgoing  ∋ t  <=>  t.origins      ∋ node
//!   node.incoming  ∋ t  <=>  t.destinations ∋ node
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{GraphError, GraphResult};

/// Handle to a node in a [`Graph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Arena index of this node.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Handle to a transition in a [`Graph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TransitionId(pub u32);

impl TransitionId {
    /// Arena index of this transition.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TransitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// A vertex: optional payload plus ordered incoming and outgoing transitions.
#[derive(Debug, Clone)]
pub struct GraphNode<V> {
    payload: Option<V>,
    incoming: Vec<TransitionId>,
    outgoing: Vec<TransitionId>,
}

impl<V> GraphNode<V> {
    fn new(payload: Option<V>) -> Self {
        Self {
            payload,
            incoming: Vec::new(),
            outgoing: Vec::new(),
        }
    }

    /// The payload, if one was set.
    pub fn payload(&self) -> Option<&V> {
        self.payload.as_ref()
    }

    /// Transitions leading into this node, in insertion order.
    pub fn incoming(&self) -> &[TransitionId] {
        &self.incoming
    }

    /// Transitions leaving this node, in insertion order.
    pub fn outgoing(&self) -> &[TransitionId] {
        &self.outgoing
    }
}

/// An edge: optional payload plus ordered origin and destination nodes.
///
/// Multiple origins or destinations make it a hyperedge.
#[derive(Debug, Clone)]
pub struct GraphTransition<E> {
    payload: Option<E>,
    origins: Vec<NodeId>,
    destinations: Vec<NodeId>,
}

impl<E> GraphTransition<E> {
    fn new(payload: Option<E>) -> Self {
        Self {
            payload,
            origins: Vec::new(),
            destinations: Vec::new(),
        }
    }

    /// The payload, if one was set.
    pub fn payload(&self) -> Option<&E> {
        self.payload.as_ref()
    }

    /// Nodes this transition leaves from.
    pub fn origins(&self) -> &[NodeId] {
        &self.origins
    }

    /// Nodes this transition leads to.
    pub fn destinations(&self) -> &[NodeId] {
        &self.destinations
    }
}

/// Removes the first occurrence of `item`, reporting whether one was found.
fn remove_first<T: PartialEq>(items: &mut Vec<T>, item: &T) -> bool {
    match items.iter().position(|x| x == item) {
        Some(pos) => {
            items.remove(pos);
            true
        }
        None => false,
    }
}

fn count_of<T: PartialEq>(items: &[T], item: &T) -> usize {
    items.iter().filter(|x| *x == item).count()
}

/// Mutable directed graph with node payloads `V` and transition payloads `E`.
///
/// Slots are never freed, so handles remain valid for the lifetime of the
/// graph. Cycles are allowed and never checked for.
#[derive(Clone)]
pub struct Graph<V, E> {
    nodes: Vec<GraphNode<V>>,
    transitions: Vec<GraphTransition<E>>,
}

impl<V, E> Default for Graph<V, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, E> Graph<V, E> {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            transitions: Vec::new(),
        }
    }

    // =========================================================================
    // Arena
    // =========================================================================

    /// Add an unlinked node.
    pub fn add_node(&mut self, payload: Option<V>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(GraphNode::new(payload));
        id
    }

    /// Add an unlinked transition.
    pub fn add_transition(&mut self, payload: Option<E>) -> TransitionId {
        let id = TransitionId(self.transitions.len() as u32);
        self.transitions.push(GraphTransition::new(payload));
        id
    }

    /// Add a transition from `from` to `to`, linking both sides.
    pub fn connect(
        &mut self,
        from: NodeId,
        payload: Option<E>,
        to: NodeId,
    ) -> GraphResult<TransitionId> {
        self.require_node(from)?;
        self.require_node(to)?;

        let transition = self.add_transition(payload);
        self.add_outgoing(from, transition);
        self.add_incoming(to, transition);
        Ok(transition)
    }

    /// The node behind `id`, or `None` for an unknown handle.
    pub fn node(&self, id: NodeId) -> Option<&GraphNode<V>> {
        self.nodes.get(id.index())
    }

    /// The transition behind `id`, or `None` for an unknown handle.
    pub fn transition(&self, id: TransitionId) -> Option<&GraphTransition<E>> {
        self.transitions.get(id.index())
    }

    /// Whether `id` names a node of this graph.
    pub fn contains_node(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    /// Whether `id` names a transition of this graph.
    pub fn contains_transition(&self, id: TransitionId) -> bool {
        id.index() < self.transitions.len()
    }

    /// Number of nodes ever added.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of transitions ever added.
    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    /// All node handles in creation order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    /// All transition handles in creation order.
    pub fn transition_ids(&self) -> impl Iterator<Item = TransitionId> + '_ {
        (0..self.transitions.len() as u32).map(TransitionId)
    }

    // =========================================================================
    // Payloads
    // =========================================================================

    /// Payload of a node (`None` if unset or the handle is unknown).
    pub fn node_payload(&self, id: NodeId) -> Option<&V> {
        self.node(id).and_then(GraphNode::payload)
    }

    /// Replace a node payload, returning the previous one.
    pub fn set_node_payload(&mut self, id: NodeId, payload: Option<V>) -> GraphResult<Option<V>> {
        let node = self
            .nodes
            .get_mut(id.index())
            .ok_or(GraphError::UnknownNode { node: id })?;
        Ok(std::mem::replace(&mut node.payload, payload))
    }

    /// Payload of a transition (`None` for epsilon or an unknown handle).
    pub fn transition_payload(&self, id: TransitionId) -> Option<&E> {
        self.transition(id).and_then(GraphTransition::payload)
    }

    /// Replace a transition payload, returning the previous one.
    pub fn set_transition_payload(
        &mut self,
        id: TransitionId,
        payload: Option<E>,
    ) -> GraphResult<Option<E>> {
        let transition = self
            .transitions
            .get_mut(id.index())
            .ok_or(GraphError::UnknownTransition { transition: id })?;
        Ok(std::mem::replace(&mut transition.payload, payload))
    }

    // =========================================================================
    // Adjacency
    // =========================================================================

    /// Outgoing transitions of a node (empty for unknown handles).
    pub fn outgoing(&self, id: NodeId) -> &[TransitionId] {
        self.node(id).map(GraphNode::outgoing).unwrap_or(&[])
    }

    /// Incoming transitions of a node (empty for unknown handles).
    pub fn incoming(&self, id: NodeId) -> &[TransitionId] {
        self.node(id).map(GraphNode::incoming).unwrap_or(&[])
    }

    /// Origin nodes of a transition (empty for unknown handles).
    pub fn origins(&self, id: TransitionId) -> &[NodeId] {
        self.transition(id)
            .map(GraphTransition::origins)
            .unwrap_or(&[])
    }

    /// Destination nodes of a transition (empty for unknown handles).
    pub fn destinations(&self, id: TransitionId) -> &[NodeId] {
        self.transition(id)
            .map(GraphTransition::destinations)
            .unwrap_or(&[])
    }

    /// Every node directly reachable through an outgoing transition.
    ///
    /// Destinations are flattened in transition order; duplicates are kept.
    pub fn successors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.outgoing(id)
            .iter()
            .flat_map(move |t| self.destinations(*t).iter().copied())
    }

    /// Every node that leads directly into this one.
    pub fn predecessors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.incoming(id)
            .iter()
            .flat_map(move |t| self.origins(*t).iter().copied())
    }

    // =========================================================================
    // Composite links (both sides)
    // =========================================================================

    /// Make `transition` leave from `node`. Returns `false` for unknown handles.
    pub fn add_outgoing(&mut self, node: NodeId, transition: TransitionId) -> bool {
        if !self.valid_pair(node, transition) {
            return false;
        }
        self.nodes[node.index()].outgoing.push(transition);
        self.transitions[transition.index()].origins.push(node);
        true
    }

    /// Make `transition` lead into `node`. Returns `false` for unknown handles.
    pub fn add_incoming(&mut self, node: NodeId, transition: TransitionId) -> bool {
        if !self.valid_pair(node, transition) {
            return false;
        }
        self.nodes[node.index()].incoming.push(transition);
        self.transitions[transition.index()].destinations.push(node);
        true
    }

    /// Detach an outgoing link on both sides.
    ///
    /// Returns `false` without mutating anything if either handle is unknown
    /// or either side of the link is missing.
    pub fn remove_outgoing(&mut self, node: NodeId, transition: TransitionId) -> bool {
        if !self.valid_pair(node, transition)
            || !self.nodes[node.index()].outgoing.contains(&transition)
            || !self.transitions[transition.index()].origins.contains(&node)
        {
            return false;
        }
        remove_first(&mut self.nodes[node.index()].outgoing, &transition);
        remove_first(&mut self.transitions[transition.index()].origins, &node);
        true
    }

    /// Detach an incoming link on both sides.
    pub fn remove_incoming(&mut self, node: NodeId, transition: TransitionId) -> bool {
        if !self.valid_pair(node, transition)
            || !self.nodes[node.index()].incoming.contains(&transition)
            || !self.transitions[transition.index()].destinations.contains(&node)
        {
            return false;
        }
        remove_first(&mut self.nodes[node.index()].incoming, &transition);
        remove_first(&mut self.transitions[transition.index()].destinations, &node);
        true
    }

    /// Transition-side spelling of [`Graph::add_outgoing`].
    pub fn add_origin(&mut self, transition: TransitionId, node: NodeId) -> bool {
        self.add_outgoing(node, transition)
    }

    /// Transition-side spelling of [`Graph::add_incoming`].
    pub fn add_destination(&mut self, transition: TransitionId, node: NodeId) -> bool {
        self.add_incoming(node, transition)
    }

    /// Transition-side spelling of [`Graph::remove_outgoing`].
    pub fn remove_origin(&mut self, transition: TransitionId, node: NodeId) -> bool {
        self.remove_outgoing(node, transition)
    }

    /// Transition-side spelling of [`Graph::remove_incoming`].
    pub fn remove_destination(&mut self, transition: TransitionId, node: NodeId) -> bool {
        self.remove_incoming(node, transition)
    }

    // =========================================================================
    // One-sided links (bulk construction)
    //
    // Each call touches a single side; pair them to keep the graph consistent.
    // =========================================================================

    /// Record `transition` in the node's outgoing list only.
    ///
    /// [`Graph::check_links`] fails until the matching [`Graph::add_origin_one_sided`]
    /// call is made. Returns `false` for unknown handles.
    pub fn add_outgoing_one_sided(&mut self, node: NodeId, transition: TransitionId) -> bool {
        if !self.valid_pair(node, transition) {
            return false;
        }
        self.nodes[node.index()].outgoing.push(transition);
        true
    }

    /// Record `transition` in the node's incoming list only.
    ///
    /// [`Graph::check_links`] fails until the matching
    /// [`Graph::add_destination_one_sided`] call is made.
    pub fn add_incoming_one_sided(&mut self, node: NodeId, transition: TransitionId) -> bool {
        if !self.valid_pair(node, transition) {
            return false;
        }
        self.nodes[node.index()].incoming.push(transition);
        true
    }

    /// Record `node` as an origin of the transition only.
    ///
    /// Leaves [`Graph::check_links`] failing until [`Graph::add_outgoing_one_sided`]
    /// completes the link.
    pub fn add_origin_one_sided(&mut self, transition: TransitionId, node: NodeId) -> bool {
        if !self.valid_pair(node, transition) {
            return false;
        }
        self.transitions[transition.index()].origins.push(node);
        true
    }

    /// Record `node` as a destination of the transition only.
    ///
    /// Leaves [`Graph::check_links`] failing until [`Graph::add_incoming_one_sided`]
    /// completes the link.
    pub fn add_destination_one_sided(&mut self, transition: TransitionId, node: NodeId) -> bool {
        if !self.valid_pair(node, transition) {
            return false;
        }
        self.transitions[transition.index()].destinations.push(node);
        true
    }

    /// Drop one occurrence of `transition` from the node's outgoing list only.
    ///
    /// The transition keeps the node as an origin, so [`Graph::check_links`] fails
    /// until [`Graph::remove_origin_one_sided`] is called too.
    pub fn remove_outgoing_one_sided(&mut self, node: NodeId, transition: TransitionId) -> bool {
        self.valid_pair(node, transition)
            && remove_first(&mut self.nodes[node.index()].outgoing, &transition)
    }

    /// Drop one occurrence of `transition` from the node's incoming list only.
    ///
    /// [`Graph::check_links`] fails until [`Graph::remove_destination_one_sided`]
    /// is called too.
    pub fn remove_incoming_one_sided(&mut self, node: NodeId, transition: TransitionId) -> bool {
        self.valid_pair(node, transition)
            && remove_first(&mut self.nodes[node.index()].incoming, &transition)
    }

    /// Drop one occurrence of `node` from the transition's origins only.
    ///
    /// [`Graph::check_links`] fails until [`Graph::remove_outgoing_one_sided`]
    /// is called too.
    pub fn remove_origin_one_sided(&mut self, transition: TransitionId, node: NodeId) -> bool {
        self.valid_pair(node, transition)
            && remove_first(&mut self.transitions[transition.index()].origins, &node)
    }

    /// Drop one occurrence of `node` from the transition's destinations only.
    ///
    /// [`Graph::check_links`] fails until [`Graph::remove_incoming_one_sided`]
    /// is called too.
    pub fn remove_destination_one_sided(&mut self, transition: TransitionId, node: NodeId) -> bool {
        self.valid_pair(node, transition)
            && remove_first(&mut self.transitions[transition.index()].destinations, &node)
    }

    // =========================================================================
    // Consistency
    // =========================================================================

    /// Verify that every link is recorded on both sides with equal multiplicity.
    ///
    /// Reports the first half-link found, scanning nodes before transitions.
    pub fn check_links(&self) -> GraphResult<()> {
        let result = self.find_half_link();
        if let Err(e) = &result {
            warn!(error = %e, "graph_links_inconsistent");
        }
        result
    }

    fn find_half_link(&self) -> GraphResult<()> {
        for node in self.node_ids() {
            let slot = &self.nodes[node.index()];
            for t in &slot.outgoing {
                let matches = self
                    .transition(*t)
                    .map(|tr| count_of(&tr.origins, &node) == count_of(&slot.outgoing, t))
                    .unwrap_or(false);
                if !matches {
                    return Err(GraphError::DanglingOutgoing {
                        node,
                        transition: *t,
                    });
                }
            }
            for t in &slot.incoming {
                let matches = self
                    .transition(*t)
                    .map(|tr| count_of(&tr.destinations, &node) == count_of(&slot.incoming, t))
                    .unwrap_or(false);
                if !matches {
                    return Err(GraphError::DanglingIncoming {
                        node,
                        transition: *t,
                    });
                }
            }
        }

        for transition in self.transition_ids() {
            let slot = &self.transitions[transition.index()];
            for n in &slot.origins {
                let matches = self
                    .node(*n)
                    .map(|nd| count_of(&nd.outgoing, &transition) == count_of(&slot.origins, n))
                    .unwrap_or(false);
                if !matches {
                    return Err(GraphError::DanglingOrigin {
                        transition,
                        node: *n,
                    });
                }
            }
            for n in &slot.destinations {
                let matches = self
                    .node(*n)
                    .map(|nd| {
                        count_of(&nd.incoming, &transition) == count_of(&slot.destinations, n)
                    })
                    .unwrap_or(false);
                if !matches {
                    return Err(GraphError::DanglingDestination {
                        transition,
                        node: *n,
                    });
                }
            }
        }

        Ok(())
    }

    fn require_node(&self, id: NodeId) -> GraphResult<()> {
        if self.contains_node(id) {
            Ok(())
        } else {
            Err(GraphError::UnknownNode { node: id })
        }
    }

    fn valid_pair(&self, node: NodeId, transition: TransitionId) -> bool {
        self.contains_node(node) && self.contains_transition(transition)
    }
}

impl<V, E> fmt::Debug for Graph<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("node_count", &self.nodes.len())
            .field("transition_count", &self.transitions.len())
            .finish()
    }
}
