//! Built-in example DFAs, parsed once from embedded JSON on first use.

use tracing::warn;

use crate::dfa::{Dfa, Label};
use crate::types::AutomatonError;

/// A named example DFA.
#[derive(Debug, Clone)]
pub struct Example {
    pub name: &'static str,
    pub description: &'static str,
    pub dfa: Dfa<Label, Label>,
}

// Default embedded examples: (name, description, JSON definition)
const EXAMPLE_TEXTS: [(&str, &str, &str); 5] = [
    (
        "parity",
        "Accepts words whose counts of a and b are both even or both odd",
        include_str!("../dfas/parity.json"),
    ),
    (
        "reachable",
        "Accepts every word starting with a; the accepting state is reachable",
        include_str!("../dfas/reachable.json"),
    ),
    (
        "unreachable",
        "Has an accepting state that cannot be reached, so its language is empty",
        include_str!("../dfas/unreachable.json"),
    ),
    (
        "missing-transition",
        "Invalid: state q0 has no transition on b",
        include_str!("../dfas/missing-transition.json"),
    ),
    (
        "bad-target",
        "Invalid: a transition leads to an undeclared state",
        include_str!("../dfas/bad-target.json"),
    ),
];

lazy_static::lazy_static! {
    pub static ref EXAMPLES: Vec<Example> = load_examples();
}

fn load_examples() -> Vec<Example> {
    EXAMPLE_TEXTS
        .iter()
        .filter_map(|&(name, description, text)| match Dfa::from_json(text) {
            Ok(dfa) => Some(Example {
                name,
                description,
                dfa,
            }),
            Err(error) => {
                warn!(example = name, %error, "failed to parse example DFA");
                None
            }
        })
        .collect()
}

pub struct ExampleCatalog;

impl ExampleCatalog {
    /// Get the number of available examples
    pub fn count() -> usize {
        EXAMPLES.len()
    }

    /// Get the names of all examples, in catalog order
    pub fn names() -> Vec<&'static str> {
        EXAMPLES.iter().map(|example| example.name).collect()
    }

    /// Get an example by its index
    pub fn get_by_index(index: usize) -> Result<&'static Example, AutomatonError> {
        EXAMPLES
            .get(index)
            .ok_or_else(|| AutomatonError::UnknownExample(format!("index {index}")))
    }

    /// Get an example by its name
    pub fn get_by_name(name: &str) -> Result<&'static Example, AutomatonError> {
        EXAMPLES
            .iter()
            .find(|example| example.name == name)
            .ok_or_else(|| AutomatonError::UnknownExample(name.to_string()))
    }
}
