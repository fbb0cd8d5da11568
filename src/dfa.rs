//! This module defines the deterministic finite automaton model: identifier traits, the
//! `Label` identifier used for JSON input, the `(state, symbol)` keyed transition table,
//! the `Dfa` definition with its builder, and `ValidDfa`, the only form the analyzer and
//! compiler accept.

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::ops::Deref;

use crate::types::AutomatonError;
use crate::validator::{self, ValidationError};

/// Anything usable as a DFA state identifier.
pub trait StateId: Clone + Eq + Hash + fmt::Display + fmt::Debug {}

impl<T> StateId for T where T: Clone + Eq + Hash + fmt::Display + fmt::Debug {}

/// Anything usable as a DFA input symbol.
pub trait InputSymbol: Clone + Eq + Hash + fmt::Display + fmt::Debug {}

impl<T> InputSymbol for T where T: Clone + Eq + Hash + fmt::Display + fmt::Debug {}

/// An opaque identifier compared by its textual form.
///
/// Deserializes from either a JSON string or a JSON integer, so `"states": [0, 1]` and
/// transition keys `"0"`, `"1"` refer to the same states.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label(String);

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Label(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Label {
    fn from(text: &str) -> Self {
        Label::new(text)
    }
}

impl From<String> for Label {
    fn from(text: String) -> Self {
        Label(text)
    }
}

impl From<char> for Label {
    fn from(c: char) -> Self {
        Label(c.to_string())
    }
}

impl From<u32> for Label {
    fn from(n: u32) -> Self {
        Label(n.to_string())
    }
}

impl Serialize for Label {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

struct LabelVisitor;

impl Visitor<'_> for LabelVisitor {
    type Value = Label;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a string or integer label")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Label, E> {
        Ok(Label::new(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Label, E> {
        Ok(Label(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Label, E> {
        Ok(Label(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Label, E> {
        Ok(Label(v.to_string()))
    }
}

impl<'de> Deserialize<'de> for Label {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(LabelVisitor)
    }
}

/// The transition relation of a DFA, addressed by `(state, symbol)` pairs.
///
/// A missing pair is a checkable condition (`get` returns `None`), which is how the
/// validator finds incomplete tables. Serializes as `{state: {symbol: target}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransitionTable<S: StateId, A: InputSymbol> {
    rows: HashMap<S, HashMap<A, S>>,
}

impl<S: StateId, A: InputSymbol> TransitionTable<S, A> {
    pub fn new() -> Self {
        Self {
            rows: HashMap::new(),
        }
    }

    /// Sets the target for `(from, symbol)`, returning the previous target if any.
    pub fn insert(&mut self, from: S, symbol: A, to: S) -> Option<S> {
        self.rows.entry(from).or_default().insert(symbol, to)
    }

    /// Returns the target for `(from, symbol)`.
    pub fn get(&self, from: &S, symbol: &A) -> Option<&S> {
        self.rows.get(from).and_then(|row| row.get(symbol))
    }

    pub fn contains(&self, from: &S, symbol: &A) -> bool {
        self.get(from, symbol).is_some()
    }

    /// Number of `(state, symbol)` pairs with a target.
    pub fn len(&self) -> usize {
        self.rows.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over `(from, symbol, to)` entries in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&S, &A, &S)> {
        self.rows
            .iter()
            .flat_map(|(from, row)| row.iter().map(move |(symbol, to)| (from, symbol, to)))
    }
}

impl<S: StateId, A: InputSymbol> Default for TransitionTable<S, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: StateId, A: InputSymbol> FromIterator<(S, A, S)> for TransitionTable<S, A> {
    fn from_iter<I: IntoIterator<Item = (S, A, S)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (from, symbol, to) in iter {
            table.insert(from, symbol, to);
        }
        table
    }
}

/// A deterministic finite automaton definition.
///
/// Nothing about a `Dfa` is trusted until it has been validated; see [`Dfa::validated`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DfaBuilder<S, A>")]
#[serde(bound(deserialize = "S: Deserialize<'de>, A: Deserialize<'de>"))]
pub struct Dfa<S: StateId, A: InputSymbol> {
    /// The states, expected to be pairwise distinct.
    pub states: Vec<S>,
    /// The input alphabet, expected to be pairwise distinct.
    pub alphabet: Vec<A>,
    /// The transition relation, expected to be total over `states × alphabet`.
    pub transitions: TransitionTable<S, A>,
    /// The state the automaton starts in.
    pub start_state: S,
    /// The accepting states. Order is irrelevant.
    pub accept_states: Vec<S>,
}

impl<S: StateId, A: InputSymbol> Dfa<S, A> {
    pub fn builder() -> DfaBuilder<S, A> {
        DfaBuilder::new()
    }

    /// Validates the definition, handing back a `ValidDfa` on success.
    pub fn validated(self) -> Result<ValidDfa<S, A>, ValidationError> {
        validator::check(&self)?;
        Ok(ValidDfa(self))
    }
}

impl<S, A> Dfa<S, A>
where
    S: StateId + for<'de> Deserialize<'de>,
    A: InputSymbol + for<'de> Deserialize<'de>,
{
    /// Parses a DFA from JSON of the form
    /// `{"states": [...], "alphabet": [...], "transitions": {state: {symbol: target}},
    /// "start_state": ..., "accept_states": [...]}`.
    ///
    /// Only field presence is checked here; the result still has to be validated.
    pub fn from_json(text: &str) -> Result<Self, AutomatonError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Collects the five parts of a DFA, reporting the first one missing on `build`.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "S: Deserialize<'de>, A: Deserialize<'de>"))]
pub struct DfaBuilder<S: StateId, A: InputSymbol> {
    states: Option<Vec<S>>,
    alphabet: Option<Vec<A>>,
    transitions: Option<TransitionTable<S, A>>,
    start_state: Option<S>,
    accept_states: Option<Vec<S>>,
}

impl<S: StateId, A: InputSymbol> DfaBuilder<S, A> {
    pub fn new() -> Self {
        Self {
            states: None,
            alphabet: None,
            transitions: None,
            start_state: None,
            accept_states: None,
        }
    }

    pub fn states(mut self, states: impl IntoIterator<Item = S>) -> Self {
        self.states = Some(states.into_iter().collect());
        self
    }

    pub fn alphabet(mut self, alphabet: impl IntoIterator<Item = A>) -> Self {
        self.alphabet = Some(alphabet.into_iter().collect());
        self
    }

    pub fn transitions(mut self, transitions: TransitionTable<S, A>) -> Self {
        self.transitions = Some(transitions);
        self
    }

    /// Adds one transition, starting an empty table if none was set yet.
    pub fn transition(mut self, from: S, symbol: A, to: S) -> Self {
        self.transitions
            .get_or_insert_with(TransitionTable::new)
            .insert(from, symbol, to);
        self
    }

    pub fn start_state(mut self, start_state: S) -> Self {
        self.start_state = Some(start_state);
        self
    }

    pub fn accept_states(mut self, accept_states: impl IntoIterator<Item = S>) -> Self {
        self.accept_states = Some(accept_states.into_iter().collect());
        self
    }

    /// Assembles the DFA. Fails with `MissingField` naming the first absent part.
    pub fn build(self) -> Result<Dfa<S, A>, ValidationError> {
        Ok(Dfa {
            states: self.states.ok_or(ValidationError::MissingField("states"))?,
            alphabet: self.alphabet.ok_or(ValidationError::MissingField("alphabet"))?,
            transitions: self
                .transitions
                .ok_or(ValidationError::MissingField("transitions"))?,
            start_state: self
                .start_state
                .ok_or(ValidationError::MissingField("start_state"))?,
            accept_states: self
                .accept_states
                .ok_or(ValidationError::MissingField("accept_states"))?,
        })
    }
}

impl<S: StateId, A: InputSymbol> Default for DfaBuilder<S, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: StateId, A: InputSymbol> TryFrom<DfaBuilder<S, A>> for Dfa<S, A> {
    type Error = ValidationError;

    fn try_from(builder: DfaBuilder<S, A>) -> Result<Self, Self::Error> {
        builder.build()
    }
}

/// A DFA that passed every validation check.
///
/// The transition relation is known to be total and closed over the states, so lookups
/// for declared states and symbols always succeed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidDfa<S: StateId, A: InputSymbol>(Dfa<S, A>);

impl<S: StateId, A: InputSymbol> ValidDfa<S, A> {
    pub fn into_inner(self) -> Dfa<S, A> {
        self.0
    }

    /// The successor of `from` on `symbol`, or `None` for symbols outside the alphabet.
    pub fn next_state(&self, from: &S, symbol: &A) -> Option<&S> {
        self.0.transitions.get(from, symbol)
    }

    pub fn is_accepting(&self, state: &S) -> bool {
        self.0.accept_states.contains(state)
    }

    /// Runs the automaton directly on `word`.
    ///
    /// Words containing symbols outside the alphabet are rejected.
    pub fn accepts(&self, word: &[A]) -> bool {
        word.iter()
            .try_fold(&self.0.start_state, |state, symbol| {
                self.next_state(state, symbol)
            })
            .is_some_and(|state| self.is_accepting(state))
    }
}

impl<S: StateId, A: InputSymbol> Deref for ValidDfa<S, A> {
    type Target = Dfa<S, A>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S: StateId, A: InputSymbol> TryFrom<Dfa<S, A>> for ValidDfa<S, A> {
    type Error = ValidationError;

    fn try_from(dfa: Dfa<S, A>) -> Result<Self, Self::Error> {
        dfa.validated()
    }
}
