//! This module compiles a validated DFA into an equivalent single-tape Turing Machine.
//!
//! The machine walks the input left to right without changing it, carrying the DFA's
//! current state as its own. On reaching the first blank cell it halts in `ACCEPT` or
//! `REJECT` depending on whether that DFA state is accepting. A word of length `n` is
//! therefore decided in exactly `n + 1` steps.

use tracing::debug;

use crate::dfa::{InputSymbol, StateId, ValidDfa};
use crate::types::{Direction, Program, TapeSymbol, TmState, Transition};

/// Name given to compiled programs. Callers may overwrite `Program::name`.
pub const COMPILED_PROGRAM_NAME: &str = "compiled-dfa";

/// Compiles `dfa` into a Turing Machine that accepts exactly the words the DFA accepts.
///
/// Compilation is deterministic: the same DFA always produces an equal `Program`.
pub fn compile<S: StateId, A: InputSymbol>(dfa: &ValidDfa<S, A>) -> Program<A> {
    let mut program = Program::new(COMPILED_PROGRAM_NAME, TmState::named(&dfa.start_state));

    for state in &dfa.states {
        program.add_state(TmState::named(state));
    }
    program.add_state(TmState::Accept);
    program.add_state(TmState::Reject);

    for symbol in &dfa.alphabet {
        program.add_symbol(TapeSymbol::Input(symbol.clone()));
    }
    program.add_symbol(TapeSymbol::Blank);

    for state in &dfa.states {
        let current = TmState::named(state);

        // Consume one input symbol and follow the DFA
        for symbol in &dfa.alphabet {
            if let Some(next) = dfa.next_state(state, symbol) {
                program.add_rule(
                    current.clone(),
                    TapeSymbol::Input(symbol.clone()),
                    Transition {
                        write: TapeSymbol::Input(symbol.clone()),
                        direction: Direction::Right,
                        next_state: TmState::named(next),
                    },
                );
            }
        }

        // End of input: decide
        let verdict = if dfa.is_accepting(state) {
            TmState::Accept
        } else {
            TmState::Reject
        };
        program.add_rule(
            current,
            TapeSymbol::Blank,
            Transition {
                write: TapeSymbol::Blank,
                direction: Direction::Stay,
                next_state: verdict,
            },
        );
    }

    debug!(
        states = program.states.len(),
        rules = program.rule_count(),
        "compiled DFA into Turing Machine"
    );

    program
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dfa::{Dfa, Label};

    fn sample_dfa() -> ValidDfa<u32, char> {
        Dfa {
            states: vec![0, 1, 2],
            alphabet: vec!['a', 'b'],
            transitions: [
                (0, 'a', 1),
                (0, 'b', 2),
                (1, 'a', 1),
                (1, 'b', 1),
                (2, 'a', 2),
                (2, 'b', 2),
            ]
            .into_iter()
            .collect(),
            start_state: 0,
            accept_states: vec![1],
        }
        .validated()
        .unwrap()
    }

    #[test]
    fn test_states_and_alphabet() {
        let program = compile(&sample_dfa());

        assert_eq!(
            program.states,
            vec![
                TmState::named("0"),
                TmState::named("1"),
                TmState::named("2"),
                TmState::Accept,
                TmState::Reject,
            ]
        );
        assert_eq!(
            program.tape_alphabet,
            vec![
                TapeSymbol::Input('a'),
                TapeSymbol::Input('b'),
                TapeSymbol::Blank
            ]
        );
        assert_eq!(program.start_state, TmState::named("0"));
    }

    #[test]
    fn test_symbol_rules_move_right_without_writing() {
        let program = compile(&sample_dfa());

        let t = program
            .transition(&TmState::named("0"), &TapeSymbol::Input('b'))
            .unwrap();

        assert_eq!(t.write, TapeSymbol::Input('b'));
        assert_eq!(t.direction, Direction::Right);
        assert_eq!(t.next_state, TmState::named("2"));
    }

    #[test]
    fn test_blank_rules_decide() {
        let program = compile(&sample_dfa());

        let accept = program
            .transition(&TmState::named("1"), &TapeSymbol::Blank)
            .unwrap();
        let reject = program
            .transition(&TmState::named("2"), &TapeSymbol::Blank)
            .unwrap();

        assert_eq!(accept.next_state, TmState::Accept);
        assert_eq!(accept.direction, Direction::Stay);
        assert_eq!(accept.write, TapeSymbol::Blank);
        assert_eq!(reject.next_state, TmState::Reject);
    }

    #[test]
    fn test_halting_states_have_no_rules() {
        let program = compile(&sample_dfa());

        assert!(program.rules[&TmState::Accept].is_empty());
        assert!(program.rules[&TmState::Reject].is_empty());
        // |states| * (|alphabet| + 1)
        assert_eq!(program.rule_count(), 9);
    }

    #[test]
    fn test_compile_is_deterministic() {
        let dfa = sample_dfa();

        assert_eq!(compile(&dfa), compile(&dfa));
    }

    #[test]
    fn test_state_named_accept_does_not_collide() {
        let (named_accept, q, a) = (Label::new("ACCEPT"), Label::new("q"), Label::new("a"));
        let dfa = Dfa::<Label, Label>::builder()
            .states([named_accept.clone(), q.clone()])
            .alphabet([a.clone()])
            .transition(named_accept.clone(), a.clone(), q.clone())
            .transition(q.clone(), a, q.clone())
            .start_state(named_accept)
            .accept_states([q])
            .build()
            .unwrap()
            .validated()
            .unwrap();

        let program = compile(&dfa);
        let t = program
            .transition(&TmState::named("ACCEPT"), &TapeSymbol::Blank)
            .unwrap();

        // The DFA state called ACCEPT is not accepting
        assert_eq!(t.next_state, TmState::Reject);
        assert_eq!(program.states.len(), 4);
    }
}
