//! A coin-operated turnstile modeled as a state machine.
//!
//! Demonstrates building a machine graph, stepping it, and probing
//! continuations with the save-state variants.
//!
//! Run with:
//! ```bash
//! RUST_LOG=debug cargo run --example turnstile -p nfa-graph-automaton
//! ```

use nfa_graph_automaton::{AutomatonResult, MachineBuilder, OneOf, StateMachine};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Coin,
    Token,
    Push,
}

fn main() -> AutomatonResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    // `unlocked` is the accepting state: the turnstile will let someone through.
    let mut b = MachineBuilder::new();
    let locked = b.rejecting();
    let unlocked = b.accepting();
    let paid = b.rejecting();

    b.on(locked, OneOf(vec![Input::Coin, Input::Token]), paid)?;
    b.epsilon(paid, unlocked)?;
    b.on_action(unlocked, Input::Coin, unlocked)?;
    b.on_action(unlocked, Input::Push, locked)?;
    b.on_action(locked, Input::Push, locked)?;
    let graph = b.finish();

    let mut turnstile = StateMachine::new(&graph, locked)?;

    println!("push only:        {}", turnstile.test(&[Input::Push])?);
    println!("coin:             {}", turnstile.test(&[Input::Coin])?);
    println!("coin, push:       {}", turnstile.test(&[Input::Coin, Input::Push])?);

    turnstile.reset();
    turnstile.step(&Input::Token);
    println!("after token:      {:?}", turnstile.phase());
    println!(
        "would push lock?  {}",
        !turnstile.run_savestate(&[Input::Push])?
    );
    println!("still unlocked:   {}", turnstile.evaluate()?);

    Ok(())
}
