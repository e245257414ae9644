//! Minimal machine fixtures for unit tests.

use nfa_graph_core::NodeId;

use crate::builder::MachineBuilder;
use crate::evaluator::MachineGraph;

/// A two-state machine: `start` (rejecting) and `accept`.
pub struct Fixture {
    pub graph: MachineGraph<&'static str>,
    pub start: NodeId,
    pub accept: NodeId,
}

/// A three-state chain `start -x-> middle -y-> accept`.
pub struct Chain {
    pub graph: MachineGraph<&'static str>,
    pub start: NodeId,
    pub middle: NodeId,
    pub accept: NodeId,
}

/// `start -a-> accept`.
pub fn single_symbol() -> Fixture {
    let mut b = MachineBuilder::new();
    let start = b.rejecting();
    let accept = b.accepting();
    b.on_action(start, "a", accept).unwrap();
    Fixture {
        graph: b.finish(),
        start,
        accept,
    }
}

/// `start -ε-> accept`, nothing else.
pub fn epsilon_start() -> Fixture {
    let mut b = MachineBuilder::new();
    let start = b.rejecting();
    let accept = b.accepting();
    b.epsilon(start, accept).unwrap();
    Fixture {
        graph: b.finish(),
        start,
        accept,
    }
}

/// `start -x-> middle -y-> accept`.
pub fn xy_chain() -> Chain {
    let mut b = MachineBuilder::new();
    let start = b.rejecting();
    let middle = b.rejecting();
    let accept = b.accepting();
    b.on_action(start, "x", middle).unwrap();
    b.on_action(middle, "y", accept).unwrap();
    Chain {
        graph: b.finish(),
        start,
        middle,
        accept,
    }
}

/// Three rejecting states joined by an epsilon cycle `0 -> 1 -> 2 -> 0`.
pub fn epsilon_cycle() -> (MachineGraph<&'static str>, [NodeId; 3]) {
    let mut b = MachineBuilder::new();
    let nodes = [b.rejecting(), b.rejecting(), b.rejecting()];
    b.epsilon(nodes[0], nodes[1]).unwrap();
    b.epsilon(nodes[1], nodes[2]).unwrap();
    b.epsilon(nodes[2], nodes[0]).unwrap();
    (b.finish(), nodes)
}
