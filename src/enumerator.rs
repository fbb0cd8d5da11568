//! This module enumerates every DFA with states `{0, 1}` over the alphabet `{a, b}`:
//! all 16 transition tables, both start states and all 4 accept sets, 128 in total.
//!
//! The enumeration is plain data driven by an index. Cloning it, or calling
//! [`enumerate_dfas`] again, restarts from any point without touching other callers.

use std::iter::FusedIterator;

use crate::dfa::Dfa;

/// Number of DFAs in the enumeration.
pub const ENUMERATION_SIZE: usize = 128;

const STATES: [u32; 2] = [0, 1];
const ALPHABET: [char; 2] = ['a', 'b'];

/// Returns the DFA at `index`, or `None` past the end of the enumeration.
///
/// The index is read as seven bits, most significant first: the targets of
/// `(0, a)`, `(0, b)`, `(1, a)`, `(1, b)`, then the start state, then whether state 0 and
/// state 1 are accepting.
pub fn nth_dfa(index: usize) -> Option<Dfa<u32, char>> {
    if index >= ENUMERATION_SIZE {
        return None;
    }

    let bit = |position: usize| ((index >> position) & 1) as u32;

    let transitions = [
        (0, 'a', bit(6)),
        (0, 'b', bit(5)),
        (1, 'a', bit(4)),
        (1, 'b', bit(3)),
    ]
    .into_iter()
    .collect();

    let accept_states = STATES
        .iter()
        .zip([bit(1), bit(0)])
        .filter(|&(_, accepting)| accepting == 1)
        .map(|(&state, _)| state)
        .collect();

    Some(Dfa {
        states: STATES.to_vec(),
        alphabet: ALPHABET.to_vec(),
        transitions,
        start_state: bit(2),
        accept_states,
    })
}

/// Starts a fresh enumeration.
pub fn enumerate_dfas() -> DfaEnumeration {
    DfaEnumeration::default()
}

/// A lazy, finite, restartable sequence of every 2-state DFA over `{a, b}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DfaEnumeration {
    next: usize,
}

impl DfaEnumeration {
    /// Position of the next DFA to be yielded.
    pub fn position(&self) -> usize {
        self.next
    }
}

impl Iterator for DfaEnumeration {
    type Item = Dfa<u32, char>;

    fn next(&mut self) -> Option<Self::Item> {
        let dfa = nth_dfa(self.next)?;
        self.next += 1;
        Some(dfa)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = ENUMERATION_SIZE.saturating_sub(self.next);
        (remaining, Some(remaining))
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.next = self.next.saturating_add(n).min(ENUMERATION_SIZE);
        self.next()
    }
}

impl ExactSizeIterator for DfaEnumeration {}

impl FusedIterator for DfaEnumeration {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::validate;
    use std::collections::HashSet;

    #[test]
    fn test_enumeration_size() {
        assert_eq!(enumerate_dfas().len(), ENUMERATION_SIZE);
        assert_eq!(enumerate_dfas().count(), 128);
        assert!(nth_dfa(ENUMERATION_SIZE).is_none());
    }

    #[test]
    fn test_every_dfa_is_distinct_and_valid() {
        let all: Vec<_> = enumerate_dfas().collect();

        assert!(all.iter().all(validate));

        let distinct: HashSet<String> = all
            .iter()
            .map(|dfa| serde_json::to_string(&(
                dfa.transitions.get(&0, &'a'),
                dfa.transitions.get(&0, &'b'),
                dfa.transitions.get(&1, &'a'),
                dfa.transitions.get(&1, &'b'),
                dfa.start_state,
                &dfa.accept_states,
            )).unwrap())
            .collect();
        assert_eq!(distinct.len(), ENUMERATION_SIZE);
    }

    #[test]
    fn test_first_and_last() {
        let first = nth_dfa(0).unwrap();
        assert_eq!(first.start_state, 0);
        assert!(first.accept_states.is_empty());
        assert_eq!(first.transitions.get(&1, &'b'), Some(&0));

        let last = nth_dfa(ENUMERATION_SIZE - 1).unwrap();
        assert_eq!(last.start_state, 1);
        assert_eq!(last.accept_states, vec![0, 1]);
        assert_eq!(last.transitions.get(&0, &'a'), Some(&1));
    }

    #[test]
    fn test_nested_loop_order() {
        // The accept set varies fastest, then the start state
        assert_eq!(nth_dfa(1).unwrap().accept_states, vec![1]);
        assert_eq!(nth_dfa(2).unwrap().accept_states, vec![0]);
        assert_eq!(nth_dfa(4).unwrap().start_state, 1);
        assert_eq!(nth_dfa(8).unwrap().transitions.get(&1, &'b'), Some(&1));
    }

    #[test]
    fn test_restartable() {
        let mut enumeration = enumerate_dfas();
        enumeration.nth(9);
        let resumed = enumeration.clone();

        assert_eq!(enumeration.position(), 10);
        assert_eq!(resumed.len(), ENUMERATION_SIZE - 10);
        assert_eq!(enumeration.next(), nth_dfa(10));

        // A fresh enumeration is unaffected
        assert_eq!(enumerate_dfas().next(), nth_dfa(0));
    }

    #[test]
    fn test_fused_after_end() {
        let mut enumeration = enumerate_dfas();
        assert!(enumeration.nth(ENUMERATION_SIZE).is_none());
        assert!(enumeration.next().is_none());
        assert_eq!(enumeration.len(), 0);
    }
}
