//! This module decides whether a validated DFA accepts any string at all, by breadth-first
//! reachability from the start state. The same traversal also yields the set of reachable
//! states and a shortest accepted word.

use std::collections::{HashMap, HashSet, VecDeque};
use tracing::debug;

use crate::dfa::{InputSymbol, StateId, ValidDfa};

/// Breadth-first walk over the states reachable from the start state.
///
/// Each state is yielded once, in order of distance from the start. The walk remembers how
/// it first reached every state, so the path to any yielded state can be recovered.
struct Reachable<'a, S: StateId, A: InputSymbol> {
    dfa: &'a ValidDfa<S, A>,
    visited: HashSet<&'a S>,
    queue: VecDeque<&'a S>,
    parents: HashMap<&'a S, (&'a S, &'a A)>,
}

impl<'a, S: StateId, A: InputSymbol> Reachable<'a, S, A> {
    fn new(dfa: &'a ValidDfa<S, A>) -> Self {
        let start = &dfa.start_state;

        Self {
            dfa,
            visited: HashSet::from([start]),
            queue: VecDeque::from([start]),
            parents: HashMap::new(),
        }
    }

    /// The symbols leading from the start state to `state` along the walk's BFS tree.
    fn path_to(&self, mut state: &'a S) -> Vec<A> {
        let mut word = Vec::new();

        while let Some(&(parent, symbol)) = self.parents.get(state) {
            word.push(symbol.clone());
            state = parent;
        }

        word.reverse();
        word
    }
}

impl<'a, S: StateId, A: InputSymbol> Iterator for Reachable<'a, S, A> {
    type Item = &'a S;

    fn next(&mut self) -> Option<&'a S> {
        let dfa = self.dfa;
        let state = self.queue.pop_front()?;

        for symbol in &dfa.alphabet {
            if let Some(next) = dfa.next_state(state, symbol) {
                if self.visited.insert(next) {
                    self.parents.insert(next, (state, symbol));
                    self.queue.push_back(next);
                }
            }
        }

        Some(state)
    }
}

/// Returns `true` if the DFA accepts no string at all.
///
/// The language is empty exactly when no accepting state can be reached from the start
/// state. The walk stops at the first accepting state it meets, the start state included.
pub fn is_empty<S: StateId, A: InputSymbol>(dfa: &ValidDfa<S, A>) -> bool {
    let mut walk = Reachable::new(dfa);
    let empty = !walk.any(|state| dfa.is_accepting(state));

    debug!(empty, visited = walk.visited.len(), "emptiness check finished");

    empty
}

/// Returns the states reachable from the start state, nearest first.
pub fn reachable_states<S: StateId, A: InputSymbol>(dfa: &ValidDfa<S, A>) -> Vec<S> {
    Reachable::new(dfa).cloned().collect()
}

/// Returns a shortest word the DFA accepts, or `None` if its language is empty.
pub fn shortest_accepted<S: StateId, A: InputSymbol>(dfa: &ValidDfa<S, A>) -> Option<Vec<A>> {
    let mut walk = Reachable::new(dfa);

    while let Some(state) = walk.next() {
        if dfa.is_accepting(state) {
            return Some(walk.path_to(state));
        }
    }

    None
}
