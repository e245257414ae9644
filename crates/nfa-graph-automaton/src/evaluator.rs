//! Transition predicates.
//!
//! An [`Evaluator`] decides whether a labeled transition fires for a given
//! action. A transition without an evaluator is an epsilon transition and is
//! never consulted here: the engine follows it during closure instead.

use std::sync::Arc;

use nfa_graph_core::Graph;

/// Decides whether a transition fires on an action.
///
/// Implementations may keep interior state; the engine calls `evaluate`
/// afresh on every step and never caches the answer.
pub trait Evaluator<A> {
    /// Whether the transition fires on `action`.
    fn evaluate(&self, action: &A) -> bool;

    /// Human-readable description.
    fn description(&self) -> &str {
        ""
    }
}

impl<A, F> Evaluator<A> for F
where
    F: Fn(&A) -> bool,
{
    fn evaluate(&self, action: &A) -> bool {
        self(action)
    }
}

/// Shared evaluator stored on a transition.
pub type SharedEvaluator<A> = Arc<dyn Evaluator<A>>;

/// Graph shape used by state machines: `bool` accept flags on nodes,
/// evaluators on transitions (absent for epsilon).
pub type MachineGraph<A> = Graph<bool, SharedEvaluator<A>>;

/// Fires when the action equals the wrapped value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exact<A>(pub A);

impl<A: PartialEq> Evaluator<A> for Exact<A> {
    fn evaluate(&self, action: &A) -> bool {
        *action == self.0
    }

    fn description(&self) -> &str {
        "exact match"
    }
}

/// Fires when the action is any of the listed values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneOf<A>(pub Vec<A>);

impl<A: PartialEq> Evaluator<A> for OneOf<A> {
    fn evaluate(&self, action: &A) -> bool {
        self.0.contains(action)
    }

    fn description(&self) -> &str {
        "one of"
    }
}

/// Fires on every action (but still consumes it, unlike epsilon).
#[derive(Debug, Clone, Copy, Default)]
pub struct Wildcard;

impl<A> Evaluator<A> for Wildcard {
    fn evaluate(&self, _action: &A) -> bool {
        true
    }

    fn description(&self) -> &str {
        "any action"
    }
}

/// Inverts another evaluator.
#[derive(Debug, Clone)]
pub struct Negate<E>(pub E);

impl<A, E: Evaluator<A>> Evaluator<A> for Negate<E> {
    fn evaluate(&self, action: &A) -> bool {
        !self.0.evaluate(action)
    }

    fn description(&self) -> &str {
        "negation"
    }
}
