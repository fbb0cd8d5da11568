//! This module checks DFA definitions for structural well-formedness before anything else
//! is allowed to consume them: distinct states and symbols, a total transition table that
//! stays within the declared states, and start and accept states that exist.

use std::collections::HashSet;
use thiserror::Error;
use tracing::debug;

use crate::dfa::{Dfa, InputSymbol, StateId};

/// The first structural problem found in a DFA definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// One of the five required parts was never provided.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    /// A state appears more than once in `states`.
    #[error("Duplicate state: {0}")]
    DuplicateState(String),
    /// A symbol appears more than once in `alphabet`.
    #[error("Duplicate symbol: {0}")]
    DuplicateSymbol(String),
    /// Some state has no transition for some symbol.
    #[error("No transition for state {state} on symbol {symbol}")]
    MissingTransition { state: String, symbol: String },
    /// A transition leads to a state that is not declared.
    #[error("Transition from state {state} on symbol {symbol} leads to unknown state {target}")]
    InvalidTarget {
        state: String,
        symbol: String,
        target: String,
    },
    /// The start state is not declared.
    #[error("Invalid start state: {0}")]
    InvalidStartState(String),
    /// An accepting state is not declared.
    #[error("Invalid accept state: {0}")]
    InvalidAcceptState(String),
}

type Check<S, A> = fn(&Dfa<S, A>) -> Result<(), ValidationError>;

/// Returns `true` if the DFA passes every structural check.
///
/// This never panics and has no side effects, so calling it repeatedly on the same
/// definition always gives the same answer.
pub fn validate<S: StateId, A: InputSymbol>(dfa: &Dfa<S, A>) -> bool {
    check(dfa).is_ok()
}

/// Runs every structural check in order and returns the first failure.
///
/// # Returns
///
/// * `Ok(())` if the DFA is well-formed.
/// * `Err(ValidationError)` describing the first violated rule.
pub fn check<S: StateId, A: InputSymbol>(dfa: &Dfa<S, A>) -> Result<(), ValidationError> {
    let checks: [Check<S, A>; 5] = [
        check_unique_states,
        check_unique_symbols,
        check_transitions,
        check_start_state,
        check_accept_states,
    ];

    let result = checks.iter().try_for_each(|check| check(dfa));

    if let Err(error) = &result {
        debug!(%error, "DFA rejected");
    }

    result
}

/// Checks that no state is declared twice.
fn check_unique_states<S: StateId, A: InputSymbol>(dfa: &Dfa<S, A>) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();

    match dfa.states.iter().find(|state| !seen.insert(*state)) {
        Some(state) => Err(ValidationError::DuplicateState(state.to_string())),
        None => Ok(()),
    }
}

/// Checks that no symbol is declared twice.
fn check_unique_symbols<S: StateId, A: InputSymbol>(
    dfa: &Dfa<S, A>,
) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();

    match dfa.alphabet.iter().find(|symbol| !seen.insert(*symbol)) {
        Some(symbol) => Err(ValidationError::DuplicateSymbol(symbol.to_string())),
        None => Ok(()),
    }
}

/// Checks that every state has a transition on every symbol, and that each of those
/// transitions leads to a declared state.
fn check_transitions<S: StateId, A: InputSymbol>(dfa: &Dfa<S, A>) -> Result<(), ValidationError> {
    let states: HashSet<&S> = dfa.states.iter().collect();

    for state in &dfa.states {
        for symbol in &dfa.alphabet {
            match dfa.transitions.get(state, symbol) {
                None => {
                    return Err(ValidationError::MissingTransition {
                        state: state.to_string(),
                        symbol: symbol.to_string(),
                    })
                }
                Some(target) if !states.contains(target) => {
                    return Err(ValidationError::InvalidTarget {
                        state: state.to_string(),
                        symbol: symbol.to_string(),
                        target: target.to_string(),
                    })
                }
                Some(_) => {}
            }
        }
    }

    Ok(())
}

fn check_start_state<S: StateId, A: InputSymbol>(dfa: &Dfa<S, A>) -> Result<(), ValidationError> {
    if !dfa.states.contains(&dfa.start_state) {
        return Err(ValidationError::InvalidStartState(
            dfa.start_state.to_string(),
        ));
    }

    Ok(())
}

fn check_accept_states<S: StateId, A: InputSymbol>(
    dfa: &Dfa<S, A>,
) -> Result<(), ValidationError> {
    dfa.accept_states
        .iter()
        .find(|state| !dfa.states.contains(state))
        .map_or(Ok(()), |state| {
            Err(ValidationError::InvalidAcceptState(state.to_string()))
        })
}
