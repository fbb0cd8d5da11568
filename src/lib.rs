//! This crate provides a small finite-automaton toolkit.
//! It includes modules for describing and validating deterministic finite automata,
//! deciding whether their language is empty, compiling them into single-tape Turing
//! Machines, and simulating those machines step by step.

pub mod catalog;
pub mod compiler;
pub mod dfa;
pub mod emptiness;
pub mod enumerator;
pub mod machine;
pub mod types;
pub mod validator;

/// Re-exports the built-in example DFAs from the catalog module.
pub use catalog::{Example, ExampleCatalog, EXAMPLES};
/// Re-exports the `compile` function from the compiler module.
pub use compiler::compile;
/// Re-exports the DFA model from the dfa module.
pub use dfa::{Dfa, DfaBuilder, InputSymbol, Label, StateId, TransitionTable, ValidDfa};
/// Re-exports the reachability analyses from the emptiness module.
pub use emptiness::{is_empty, reachable_states, shortest_accepted};
/// Re-exports the DFA enumeration from the enumerator module.
pub use enumerator::{enumerate_dfas, nth_dfa, DfaEnumeration, ENUMERATION_SIZE};
/// Re-exports the simulator from the machine module.
pub use machine::{run, TuringMachine};
/// Re-exports the Turing Machine model and error types from the types module.
pub use types::{
    AutomatonError, Direction, Program, RunReport, Snapshot, Step, TapeSymbol, TmState,
    Transition, Verdict, DEFAULT_MAX_STEPS,
};
/// Re-exports the validation entry points from the validator module.
pub use validator::{check, validate, ValidationError};
