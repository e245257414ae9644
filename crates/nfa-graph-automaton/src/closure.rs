//! Epsilon closure and action consumption over a machine graph.

use std::collections::VecDeque;

use nfa_graph_core::{Graph, NodeId, StateSet};
use tracing::trace;

use crate::evaluator::MachineGraph;

/// Every node reachable from `seed` through zero or more epsilon transitions.
///
/// A transition counts as epsilon when it carries no payload. Works on any
/// graph shape; the visited set stops epsilon cycles from looping. The result
/// always contains `seed`.
pub fn epsilon_closure<V, E>(graph: &Graph<V, E>, seed: &StateSet) -> StateSet {
    let mut closure = seed.clone();
    let mut visited = StateSet::with_capacity(graph.node_count());
    let mut queue: VecDeque<NodeId> = seed.iter().collect();

    while let Some(node) = queue.pop_front() {
        if !visited.insert(node) {
            continue;
        }

        for t in graph.outgoing(node) {
            let Some(transition) = graph.transition(*t) else {
                continue;
            };
            if transition.payload().is_some() {
                continue;
            }
            for dest in transition.destinations() {
                closure.insert(*dest);
                if !visited.contains(*dest) {
                    queue.push_back(*dest);
                }
            }
        }
    }

    trace!(
        seed = seed.len(),
        closed = closure.len(),
        "epsilon_closure_complete"
    );

    closure
}

/// Destinations of every labeled transition out of `from` that fires on `action`.
///
/// Epsilon transitions are skipped; the result is not closed.
pub fn consume<A>(graph: &MachineGraph<A>, from: &StateSet, action: &A) -> StateSet {
    let mut reached = StateSet::with_capacity(graph.node_count());

    for node in from.iter() {
        for t in graph.outgoing(node) {
            let Some(transition) = graph.transition(*t) else {
                continue;
            };
            let Some(evaluator) = transition.payload() else {
                continue;
            };
            let fired = evaluator.evaluate(action);
            trace!(
                transition = %t,
                evaluator = evaluator.description(),
                fired,
                "transition_evaluated"
            );
            if fired {
                reached.extend(transition.destinations().iter().copied());
            }
        }
    }

    reached
}
