//! Integration tests for nfa-graph-automaton through the public API.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use anyhow::Result;
use nfa_graph_automaton::{
    epsilon_closure, AutomatonError, Evaluator, MachineBuilder, MachineGraph, Negate, OneOf,
    Phase, SharedEvaluator, StateMachine, Wildcard,
};
use nfa_graph_core::{NodeId, StateSet};

// ============================================================================
// Machine Builders
// ============================================================================

/// `q0 -x-> q1 -y-> q2(accept)`.
fn xy_chain() -> Result<(MachineGraph<&'static str>, NodeId)> {
    let mut b = MachineBuilder::new();
    let q0 = b.rejecting();
    let q1 = b.rejecting();
    let q2 = b.accepting();
    b.on_action(q0, "x", q1)?;
    b.on_action(q1, "y", q2)?;
    Ok((b.finish(), q0))
}

/// Strings over {a, b} whose second-to-last symbol is `a`.
///
/// ```text
/// q0 -a,b-> q0,  q0 -a-> q1,  q1 -a,b-> q2(accept)
/// ```
fn second_to_last_a(reverse_insertion: bool) -> Result<(MachineGraph<char>, NodeId)> {
    let mut b = MachineBuilder::new();
    let (q0, q1, q2) = if reverse_insertion {
        let q2 = b.accepting();
        let q1 = b.rejecting();
        let q0 = b.rejecting();
        (q0, q1, q2)
    } else {
        let q0 = b.rejecting();
        let q1 = b.rejecting();
        let q2 = b.accepting();
        (q0, q1, q2)
    };

    let mut edges: Vec<(NodeId, NodeId, Vec<char>)> = vec![
        (q0, q0, vec!['a', 'b']),
        (q0, q1, vec!['a']),
        (q1, q2, vec!['a', 'b']),
    ];
    if reverse_insertion {
        edges.reverse();
    }
    for (from, to, symbols) in edges {
        b.on(from, OneOf(symbols), to)?;
    }
    Ok((b.finish(), q0))
}

fn chars(s: &str) -> Vec<char> {
    s.chars().collect()
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_two_state_single_action() -> Result<()> {
    let mut b = MachineBuilder::new();
    let q0 = b.rejecting();
    let q1 = b.accepting();
    b.on_action(q0, "a", q1)?;
    let graph = b.finish();
    let mut machine = StateMachine::new(&graph, q0)?;

    assert!(machine.test(&["a"])?);
    assert!(!machine.test(&["b"])?);
    Ok(())
}

#[test]
fn test_epsilon_to_accepting_start() -> Result<()> {
    let mut b = MachineBuilder::<&str>::new();
    let q0 = b.rejecting();
    let accept = b.accepting();
    b.epsilon(q0, accept)?;
    let graph = b.finish();
    let mut machine = StateMachine::new(&graph, q0)?;

    // No step runs for an empty sequence, so there is nothing to evaluate.
    let nothing: [&str; 0] = [];
    assert_eq!(machine.test(&nothing), Err(AutomatonError::NotStarted));

    // vstep closes the start state before and after the (absent) action.
    let reached = machine.vstep(q0, None)?;
    assert!(reached.contains(accept));
    assert!(machine.accepts(&reached)?);
    Ok(())
}

#[test]
fn test_chain_requires_order() -> Result<()> {
    let (graph, q0) = xy_chain()?;
    let mut machine = StateMachine::new(&graph, q0)?;

    assert!(!machine.test(&["x"])?);
    assert!(machine.test(&["x", "y"])?);
    assert!(!machine.test(&["y", "x"])?);
    Ok(())
}

#[test]
fn test_run_savestate_probe_is_not_committed() -> Result<()> {
    let (graph, q0) = xy_chain()?;
    let mut machine = StateMachine::new(&graph, q0)?;

    machine.step(&"x");
    let after_x = machine.current().cloned();

    assert!(machine.run_savestate(&["y"])?);
    assert_eq!(machine.current().cloned(), after_x);

    // The committed path still continues from after "x".
    assert!(machine.run(&["y"])?);
    Ok(())
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn test_test_always_resets() -> Result<()> {
    let (graph, q0) = second_to_last_a(false)?;
    let sequences = ["ab", "ba", "aab", "bbb", "abab", "a"];

    for prefix in sequences {
        for seq in sequences {
            let mut via_test = StateMachine::new(&graph, q0)?;
            via_test.run(&chars(prefix))?;
            let expected_prior = via_test.current().cloned();

            let mut via_reset = StateMachine::new(&graph, q0)?;
            via_reset.run(&chars(prefix))?;
            assert_eq!(via_reset.current().cloned(), expected_prior);

            let tested = via_test.test(&chars(seq))?;
            via_reset.reset();
            let ran = via_reset.run(&chars(seq))?;

            assert_eq!(tested, ran, "prefix {prefix:?}, sequence {seq:?}");
            assert_eq!(via_test.current(), via_reset.current());
        }
    }
    Ok(())
}

#[test]
fn test_savestate_is_a_true_snapshot() -> Result<()> {
    let (graph, q0) = second_to_last_a(false)?;
    let mut machine = StateMachine::new(&graph, q0)?;

    for prefix in ["", "a", "ab", "bba"] {
        machine.reset();
        for c in prefix.chars() {
            machine.step(&c);
        }
        let before = machine.current().cloned();

        for probe in ["", "a", "ba", "bbbb"] {
            let _ = machine.run_savestate(&chars(probe));
            assert_eq!(machine.current().cloned(), before);
            let _ = machine.test_savestate(&chars(probe));
            assert_eq!(machine.current().cloned(), before);
        }
    }
    Ok(())
}

#[test]
fn test_acceptance_ignores_insertion_order() -> Result<()> {
    let (forward, f0) = second_to_last_a(false)?;
    let (backward, b0) = second_to_last_a(true)?;
    let mut fm = StateMachine::new(&forward, f0)?;
    let mut bm = StateMachine::new(&backward, b0)?;

    for input in ["ab", "aa", "ba", "bb", "abba", "bbab", "aaaa"] {
        let expected = input.chars().rev().nth(1) == Some('a');
        assert_eq!(fm.test(&chars(input))?, expected, "{input}");
        assert_eq!(bm.test(&chars(input))?, expected, "{input}");
    }
    Ok(())
}

#[test]
fn test_closure_properties_on_machine_graph() -> Result<()> {
    let mut b = MachineBuilder::<u8>::new();
    let nodes: Vec<NodeId> = (0..5).map(|_| b.rejecting()).collect();
    b.epsilon(nodes[0], nodes[1])?;
    b.epsilon(nodes[1], nodes[2])?;
    b.epsilon(nodes[2], nodes[0])?;
    b.on_action(nodes[2], 7, nodes[3])?;
    b.epsilon(nodes[3], nodes[4])?;
    let graph = b.finish();

    let seed: StateSet = [nodes[0], nodes[3]].into_iter().collect();
    let closed = epsilon_closure(&graph, &seed);
    assert!(closed.is_superset(&seed));
    assert_eq!(closed.len(), 5);
    assert_eq!(epsilon_closure(&graph, &closed), closed);
    Ok(())
}

// ============================================================================
// Evaluators
// ============================================================================

#[test]
fn test_stock_evaluators_in_machine() -> Result<()> {
    // Accepts any non-empty word over digits that does not end in '0'.
    let mut b = MachineBuilder::<char>::new();
    let q0 = b.rejecting();
    let last_nonzero = b.accepting();
    let last_zero = b.rejecting();
    for from in [q0, last_nonzero, last_zero] {
        b.on(from, Negate(OneOf(vec!['0'])), last_nonzero)?;
        b.on_action(from, '0', last_zero)?;
    }
    let graph = b.finish();
    let mut machine = StateMachine::new(&graph, q0)?;

    assert!(machine.test(&chars("105"))?);
    assert!(!machine.test(&chars("150"))?);
    assert!(machine.test(&chars("7"))?);
    Ok(())
}

#[test]
fn test_wildcard_consumes_action() -> Result<()> {
    let mut b = MachineBuilder::<u32>::new();
    let q0 = b.rejecting();
    let q1 = b.accepting();
    b.on(q0, Wildcard, q1)?;
    let graph = b.finish();
    let mut machine = StateMachine::new(&graph, q0)?;

    assert!(machine.test(&[42u32])?);
    assert!(!machine.test(&[1u32, 2])?);
    Ok(())
}

#[test]
fn test_stateful_evaluator_is_called_every_step() -> Result<()> {
    struct Budget(Cell<u32>);

    impl Evaluator<char> for Budget {
        fn evaluate(&self, _action: &char) -> bool {
            let left = self.0.get();
            if left == 0 {
                return false;
            }
            self.0.set(left - 1);
            true
        }
    }

    let budget = Rc::new(Budget(Cell::new(2)));
    let mut b = MachineBuilder::new();
    let q0 = b.accepting();
    let shared_budget = Rc::clone(&budget);
    b.on(q0, move |c: &char| shared_budget.evaluate(c), q0)?;
    let graph = b.finish();
    let mut machine = StateMachine::new(&graph, q0)?;

    assert!(machine.test(&chars("zz"))?);
    assert_eq!(budget.0.get(), 0);
    assert!(!machine.test(&chars("z"))?);
    Ok(())
}

// ============================================================================
// Graph-level construction
// ============================================================================

#[test]
fn test_hyperedge_reaches_every_destination() -> Result<()> {
    let mut graph: MachineGraph<char> = MachineGraph::new();
    let q0 = graph.add_node(Some(false));
    let left = graph.add_node(Some(false));
    let right = graph.add_node(Some(true));

    let split: SharedEvaluator<char> = Arc::new(|c: &char| *c == 's');
    let t = graph.add_transition(Some(split));
    assert!(graph.add_outgoing(q0, t));
    assert!(graph.add_incoming(left, t));
    assert!(graph.add_incoming(right, t));
    graph.check_links()?;

    let machine = StateMachine::new(&graph, q0)?;
    let next = machine.astep(&'s');
    assert_eq!(next.to_vec(), vec![left, right]);
    assert!(machine.accepts(&next)?);
    Ok(())
}

#[test]
fn test_builder_extends_existing_graph() -> Result<()> {
    let (graph, q0) = xy_chain()?;
    let accept = graph
        .node_ids()
        .find(|&n| graph.node_payload(n) == Some(&true))
        .ok_or_else(|| anyhow::anyhow!("chain has no accepting state"))?;

    // Let the accepted word repeat: x y (x y)*.
    let mut b = MachineBuilder::from_graph(graph);
    let again = b.rejecting();
    b.on_action(accept, "x", again)?;
    b.on_action(again, "y", accept)?;
    let extended = b.finish();
    extended.check_links()?;
    assert_eq!(extended.node_count(), 4);

    let mut machine = StateMachine::new(&extended, q0)?;
    assert!(machine.test(&["x", "y"])?);
    assert!(machine.test(&["x", "y", "x", "y"])?);
    assert!(!machine.test(&["x", "y", "x"])?);
    Ok(())
}

#[test]
fn test_phase_reports_dead_machine() -> Result<()> {
    let (graph, q0) = xy_chain()?;
    let mut machine = StateMachine::new(&graph, q0)?;

    assert_eq!(machine.phase(), Phase::NotStarted);
    machine.step(&"nope");
    assert_eq!(machine.phase(), Phase::Dead);
    assert!(!machine.evaluate()?);
    Ok(())
}
