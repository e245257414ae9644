//! Nondeterministic finite automaton runtime over an arena graph.
//!
//! A machine graph is a [`nfa_graph_core::Graph`] whose nodes carry an
//! accept/reject flag and whose transitions carry an [`Evaluator`]. A
//! transition without an evaluator is an epsilon transition.
//!
//! ## Core Concepts
//!
//! - **Evaluator**: predicate deciding whether a transition fires on an action
//! - **MachineBuilder**: assembles states and transitions, linking both sides
//! - **StateMachine**: holds the start state and the current active-state set
//! - **Epsilon closure**: fixed-point expansion over payload-less transitions
//!
//! ## Example
//!
//! ```
//! use nfa_graph_automaton::{MachineBuilder, StateMachine};
//!
//! let mut b = MachineBuilder::new();
//! let q0 = b.rejecting();
//! let done = b.accepting();
//! b.on_action(q0, 'a', done).unwrap();
//! let graph = b.finish();
//!
//! let mut machine = StateMachine::new(&graph, q0).unwrap();
//! assert_eq!(machine.test(&['a']), Ok(true));
//! assert_eq!(machine.test(&['b']), Ok(false));
//! ```

mod builder;
mod closure;
mod error;
mod evaluator;
mod machine;

#[cfg(test)]
mod test_fixtures;

pub use builder::MachineBuilder;
pub use closure::{consume, epsilon_closure};
pub use error::{AutomatonError, AutomatonResult};
pub use evaluator::{Evaluator, Exact, MachineGraph, Negate, OneOf, SharedEvaluator, Wildcard};
pub use machine::{Phase, StateMachine};
