//! Nondeterministic state machine driven over a [`MachineGraph`].
//!
//! The machine borrows its graph and only ever rewrites its own set of
//! active states:
//!
//! ```text
//! current = None            NotStarted (after construction or reset)
//! current = Some({})        Dead (no state survived the last action)
//! current = Some({q, ...})  Active
//! ```
//!
//! ## First step after a reset
//!
//! [`StateMachine::astep`] seeds a not-started machine with `{q0}` as is and
//! consumes the action before closing the result over epsilon transitions.
//! States that are only reachable from `q0` through epsilon transitions are
//! therefore not consulted for the first action. [`StateMachine::vstep`]
//! closes its seed first and does see them:
//!
//! ```text
//! q0 -ε-> p -a-> accept
//!
//! test(["a"])      -> false   ({q0} has no `a` transition)
//! vstep(q0, "a")   -> {accept}
//! ```
//!
//! Both behaviors are intentional and covered by tests.

use std::fmt;

use nfa_graph_core::{NodeId, StateSet};
use tracing::debug;

use crate::closure::{consume, epsilon_closure};
use crate::error::{AutomatonError, AutomatonResult};
use crate::evaluator::MachineGraph;

/// Simulation phase derived from the active-state set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase<'s> {
    /// Reset, or no step has run yet.
    NotStarted,
    /// The last step left no active state.
    Dead,
    /// One or more states are active.
    Active(&'s StateSet),
}

/// An NFA over actions of type `A`.
pub struct StateMachine<'g, A> {
    graph: &'g MachineGraph<A>,
    q0: NodeId,
    current: Option<StateSet>,
}

impl<'g, A> StateMachine<'g, A> {
    /// Create a machine starting at `q0`. The machine starts out not started.
    pub fn new(graph: &'g MachineGraph<A>, q0: NodeId) -> AutomatonResult<Self> {
        if !graph.contains_node(q0) {
            return Err(AutomatonError::UnknownNode { node: q0 });
        }
        Ok(Self {
            graph,
            q0,
            current: None,
        })
    }

    pub fn graph(&self) -> &'g MachineGraph<A> {
        self.graph
    }

    /// The start state.
    pub fn start(&self) -> NodeId {
        self.q0
    }

    /// The active states, or `None` if the machine has not started.
    pub fn current(&self) -> Option<&StateSet> {
        self.current.as_ref()
    }

    pub fn phase(&self) -> Phase<'_> {
        match &self.current {
            None => Phase::NotStarted,
            Some(states) if states.is_empty() => Phase::Dead,
            Some(states) => Phase::Active(states),
        }
    }

    /// Forget the active states.
    pub fn reset(&mut self) {
        self.current = None;
        debug!(start = %self.q0, "machine_reset");
    }

    // =========================================================================
    // Stepping
    // =========================================================================

    /// The states one action away from the current ones, without moving.
    ///
    /// A not-started machine is seeded with `{q0}` (not epsilon-closed). With
    /// `None` the seed passes through unchanged, so the call reduces to an
    /// epsilon closure of the current states.
    pub fn astep<'a>(&self, action: impl Into<Option<&'a A>>) -> StateSet
    where
        A: 'a,
    {
        let seeded;
        let seed = match &self.current {
            Some(states) => states,
            None => {
                seeded = StateSet::singleton(self.q0);
                &seeded
            }
        };

        let moved = match action.into() {
            Some(action) => consume(self.graph, seed, action),
            None => seed.clone(),
        };

        epsilon_closure(self.graph, &moved)
    }

    /// Advance the machine by one action.
    pub fn step<'a>(&mut self, action: impl Into<Option<&'a A>>)
    where
        A: 'a,
    {
        let next = self.astep(action);
        debug!(
            before = ?self.current.as_ref().map(StateSet::len),
            after = next.len(),
            "machine_step"
        );
        self.current = Some(next);
    }

    /// The states one action away from `node` alone.
    ///
    /// Closes `{node}` over epsilon transitions, consumes the action (`None`
    /// passes through), then closes again.
    pub fn vstep<'a>(
        &self,
        node: NodeId,
        action: impl Into<Option<&'a A>>,
    ) -> AutomatonResult<StateSet>
    where
        A: 'a,
    {
        if !self.graph.contains_node(node) {
            return Err(AutomatonError::UnknownNode { node });
        }

        let before = epsilon_closure(self.graph, &StateSet::singleton(node));
        let moved = match action.into() {
            Some(action) => consume(self.graph, &before, action),
            None => before,
        };
        Ok(epsilon_closure(self.graph, &moved))
    }

    // =========================================================================
    // Sequences
    // =========================================================================

    /// Step through every action from the current states, then evaluate.
    pub fn run<'a, I, T>(&mut self, actions: I) -> AutomatonResult<bool>
    where
        I: IntoIterator<Item = T>,
        T: Into<Option<&'a A>>,
        A: 'a,
    {
        let mut steps = 0usize;
        for action in actions {
            self.step(action);
            steps += 1;
        }

        let accepted = self.evaluate();
        debug!(steps, accepted = ?accepted, "machine_run_complete");
        accepted
    }

    /// Like [`StateMachine::run`], then restore the active states it started from.
    pub fn run_savestate<'a, I, T>(&mut self, actions: I) -> AutomatonResult<bool>
    where
        I: IntoIterator<Item = T>,
        T: Into<Option<&'a A>>,
        A: 'a,
    {
        let saved = self.current.clone();
        let result = self.run(actions);
        self.current = saved;
        result
    }

    /// Reset, then [`StateMachine::run`].
    pub fn test<'a, I, T>(&mut self, actions: I) -> AutomatonResult<bool>
    where
        I: IntoIterator<Item = T>,
        T: Into<Option<&'a A>>,
        A: 'a,
    {
        self.reset();
        self.run(actions)
    }

    /// Like [`StateMachine::test`], then restore the active states from before the call.
    pub fn test_savestate<'a, I, T>(&mut self, actions: I) -> AutomatonResult<bool>
    where
        I: IntoIterator<Item = T>,
        T: Into<Option<&'a A>>,
        A: 'a,
    {
        let saved = self.current.clone();
        let result = self.test(actions);
        self.current = saved;
        result
    }

    // =========================================================================
    // Acceptance
    // =========================================================================

    /// Whether any active state accepts.
    ///
    /// Fails with [`AutomatonError::NotStarted`] if no step has run since the
    /// last reset.
    pub fn evaluate(&self) -> AutomatonResult<bool> {
        let current = self.current.as_ref().ok_or(AutomatonError::NotStarted)?;
        self.accepts(current)
    }

    /// Whether a single state accepts.
    pub fn vevaluate(&self, node: NodeId) -> AutomatonResult<bool> {
        let slot = self
            .graph
            .node(node)
            .ok_or(AutomatonError::UnknownNode { node })?;
        slot.payload()
            .copied()
            .ok_or(AutomatonError::MissingAcceptance { node })
    }

    /// Whether any state in `states` accepts.
    ///
    /// Every member is checked for an acceptance flag before answering, so a
    /// missing flag is reported even when another member accepts.
    pub fn accepts(&self, states: &StateSet) -> AutomatonResult<bool> {
        let mut accepted = false;
        for node in states.iter() {
            accepted |= self.vevaluate(node)?;
        }
        Ok(accepted)
    }
}

impl<A> fmt::Debug for StateMachine<'_, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("graph", self.graph)
            .field("start", &self.q0)
            .field("current", &self.current)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::MachineBuilder;
    use crate::test_fixtures::{epsilon_start, single_symbol, xy_chain};

    const NOTHING: [&str; 0] = [];

    #[test]
    fn test_single_symbol_acceptance() {
        let fx = single_symbol();
        let mut m = StateMachine::new(&fx.graph, fx.start).unwrap();

        assert_eq!(m.test(&["a"]), Ok(true));
        assert_eq!(m.test(&["b"]), Ok(false));
        assert_eq!(m.phase(), Phase::Dead);
    }

    #[test]
    fn test_unknown_start_is_rejected() {
        let fx = single_symbol();
        let err = StateMachine::new(&fx.graph, NodeId(9)).unwrap_err();
        assert_eq!(err, AutomatonError::UnknownNode { node: NodeId(9) });
    }

    #[test]
    fn test_phases() {
        let fx = xy_chain();
        let mut m = StateMachine::new(&fx.graph, fx.start).unwrap();
        assert_eq!(m.phase(), Phase::NotStarted);

        m.step(&"x");
        let active = StateSet::singleton(fx.middle);
        assert_eq!(m.phase(), Phase::Active(&active));

        m.step(&"x");
        assert_eq!(m.phase(), Phase::Dead);

        m.reset();
        assert_eq!(m.phase(), Phase::NotStarted);
        assert!(m.current().is_none());
    }

    #[test]
    fn test_astep_does_not_move() {
        let fx = xy_chain();
        let m = StateMachine::new(&fx.graph, fx.start).unwrap();

        let next = m.astep(&"x");
        assert_eq!(next.to_vec(), vec![fx.middle]);
        assert!(m.current().is_none());
    }

    #[test]
    fn test_none_action_closes_current() {
        let fx = epsilon_start();
        let mut m = StateMachine::new(&fx.graph, fx.start).unwrap();

        m.step(None);
        let current = m.current().unwrap();
        assert!(current.contains(fx.start));
        assert!(current.contains(fx.accept));
        assert_eq!(m.evaluate(), Ok(true));
    }

    #[test]
    fn test_evaluate_before_start_fails() {
        let fx = single_symbol();
        let mut m = StateMachine::new(&fx.graph, fx.start).unwrap();

        assert_eq!(m.evaluate(), Err(AutomatonError::NotStarted));
        assert_eq!(m.test(&NOTHING), Err(AutomatonError::NotStarted));
    }

    #[test]
    fn test_epsilon_start_first_step_asymmetry() {
        let fx = epsilon_start();
        let mut m = StateMachine::new(&fx.graph, fx.start).unwrap();

        // The post-closure of the no-op step reaches the accepting state.
        assert_eq!(m.test([None]), Ok(true));

        let from_start = m.vstep(fx.start, None).unwrap();
        assert!(from_start.contains(fx.accept));
        assert_eq!(m.accepts(&from_start), Ok(true));
    }

    #[test]
    fn test_pre_closure_only_in_vstep() {
        let mut b = MachineBuilder::new();
        let q0 = b.rejecting();
        let p = b.rejecting();
        let accept = b.accepting();
        b.epsilon(q0, p).unwrap();
        b.on_action(p, "a", accept).unwrap();
        let graph = b.finish();
        let mut m = StateMachine::new(&graph, q0).unwrap();

        assert_eq!(m.test(&["a"]), Ok(false));
        assert_eq!(m.vstep(q0, &"a").unwrap().to_vec(), vec![accept]);

        // Once the machine has started, closure has already added `p`.
        assert_eq!(m.test([None, Some(&"a")]), Ok(true));
    }

    #[test]
    fn test_missing_acceptance_is_reported() {
        let mut b = MachineBuilder::new();
        let q0 = b.rejecting();
        let blank = b.unflagged();
        let accept = b.accepting();
        b.on_action(q0, "go", blank).unwrap();
        b.on_action(q0, "go", accept).unwrap();
        let graph = b.finish();
        let mut m = StateMachine::new(&graph, q0).unwrap();

        assert_eq!(
            m.test(&["go"]),
            Err(AutomatonError::MissingAcceptance { node: blank })
        );
        assert_eq!(
            m.vevaluate(blank),
            Err(AutomatonError::MissingAcceptance { node: blank })
        );
    }

    #[test]
    fn test_savestate_restores_current() {
        let fx = xy_chain();
        let mut m = StateMachine::new(&fx.graph, fx.start).unwrap();
        m.step(&"x");
        let snapshot = m.current().cloned();

        assert_eq!(m.run_savestate(&["y"]), Ok(true));
        assert_eq!(m.current().cloned(), snapshot);

        assert_eq!(m.test_savestate(&["x", "y"]), Ok(true));
        assert_eq!(m.current().cloned(), snapshot);

        // Restored even when the probe fails.
        m.reset();
        assert_eq!(m.run_savestate(&NOTHING), Err(AutomatonError::NotStarted));
        assert!(m.current().is_none());
    }

    #[test]
    fn test_vstep_unknown_node() {
        let fx = xy_chain();
        let m = StateMachine::new(&fx.graph, fx.start).unwrap();
        assert_eq!(
            m.vstep(NodeId(40), &"x"),
            Err(AutomatonError::UnknownNode { node: NodeId(40) })
        );
    }
}
