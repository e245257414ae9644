//! Incremental construction of machine graphs.

use std::sync::Arc;

use nfa_graph_core::{NodeId, TransitionId};

use crate::error::AutomatonResult;
use crate::evaluator::{Evaluator, Exact, MachineGraph, SharedEvaluator};

/// Builder for [`MachineGraph`]s.
///
/// Every transition it adds is linked on both sides, so the finished graph
/// always passes [`nfa_graph_core::Graph::check_links`].
pub struct MachineBuilder<A> {
    graph: MachineGraph<A>,
}

impl<A> Default for MachineBuilder<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> MachineBuilder<A> {
    pub fn new() -> Self {
        Self {
            graph: MachineGraph::new(),
        }
    }

    /// Start from an existing graph.
    pub fn from_graph(graph: MachineGraph<A>) -> Self {
        Self { graph }
    }

    /// Add a state with an explicit accept/reject flag.
    pub fn state(&mut self, accepting: bool) -> NodeId {
        self.graph.add_node(Some(accepting))
    }

    pub fn accepting(&mut self) -> NodeId {
        self.state(true)
    }

    pub fn rejecting(&mut self) -> NodeId {
        self.state(false)
    }

    /// Add a state without an accept/reject flag.
    ///
    /// Evaluating a machine that reaches such a state fails with
    /// [`crate::AutomatonError::MissingAcceptance`].
    pub fn unflagged(&mut self) -> NodeId {
        self.graph.add_node(None)
    }

    /// Add a transition that fires when `evaluator` accepts the action.
    pub fn on<E>(&mut self, from: NodeId, evaluator: E, to: NodeId) -> AutomatonResult<TransitionId>
    where
        E: Evaluator<A> + 'static,
    {
        let shared: SharedEvaluator<A> = Arc::new(evaluator);
        self.on_shared(from, shared, to)
    }

    /// Add a transition reusing an evaluator shared with other transitions.
    pub fn on_shared(
        &mut self,
        from: NodeId,
        evaluator: SharedEvaluator<A>,
        to: NodeId,
    ) -> AutomatonResult<TransitionId> {
        Ok(self.graph.connect(from, Some(evaluator), to)?)
    }

    /// Add a transition that fires on exactly `action`.
    pub fn on_action(&mut self, from: NodeId, action: A, to: NodeId) -> AutomatonResult<TransitionId>
    where
        A: PartialEq + 'static,
    {
        self.on(from, Exact(action), to)
    }

    /// Add an epsilon transition.
    pub fn epsilon(&mut self, from: NodeId, to: NodeId) -> AutomatonResult<TransitionId> {
        Ok(self.graph.connect(from, None, to)?)
    }

    /// The graph built so far.
    pub fn graph(&self) -> &MachineGraph<A> {
        &self.graph
    }

    pub fn finish(self) -> MachineGraph<A> {
        self.graph
    }
}
