//! This module defines the Turing Machine side of the data model: tape symbols, machine
//! states, transition rules, the compiled `Program`, simulation results and the crate-wide
//! error type.

use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

use crate::dfa::InputSymbol;
use crate::validator::ValidationError;

/// The step bound used when the caller does not supply one.
pub const DEFAULT_MAX_STEPS: usize = 1000;
/// How the blank symbol is rendered in listings and traces.
pub const BLANK_DISPLAY: char = '_';

/// A cell of the tape: either an input symbol or the blank.
///
/// Blank is its own variant, so it can never be confused with a symbol of the input
/// alphabet no matter what that alphabet contains.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TapeSymbol<A> {
    Input(A),
    Blank,
}

impl<A> TapeSymbol<A> {
    pub fn is_blank(&self) -> bool {
        matches!(self, TapeSymbol::Blank)
    }
}

impl<A: fmt::Display> fmt::Display for TapeSymbol<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TapeSymbol::Input(symbol) => write!(f, "{symbol}"),
            TapeSymbol::Blank => write!(f, "{BLANK_DISPLAY}"),
        }
    }
}

/// Blank serializes as `null` so it stays distinguishable from any input symbol.
impl<A: Serialize> Serialize for TapeSymbol<A> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TapeSymbol::Input(symbol) => serializer.serialize_some(symbol),
            TapeSymbol::Blank => serializer.serialize_none(),
        }
    }
}

/// A state of the Turing Machine.
///
/// `Accept` and `Reject` are the two halting states. Every other state is `Named`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TmState {
    Named(String),
    Accept,
    Reject,
}

impl TmState {
    /// Builds a named state from the textual form of any identifier.
    pub fn named(id: impl fmt::Display) -> Self {
        TmState::Named(id.to_string())
    }

    pub fn is_halting(&self) -> bool {
        matches!(self, TmState::Accept | TmState::Reject)
    }
}

impl fmt::Display for TmState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TmState::Named(name) => write!(f, "{name}"),
            TmState::Accept => write!(f, "ACCEPT"),
            TmState::Reject => write!(f, "REJECT"),
        }
    }
}

impl Serialize for TmState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Represents the possible directions the tape head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left (clamped at the first cell).
    Left,
    /// Move the head one position to the right.
    Right,
    /// Keep the head in the same position.
    Stay,
}

impl Direction {
    /// The single-letter form used in program listings.
    pub fn letter(self) -> char {
        match self {
            Direction::Left => 'L',
            Direction::Right => 'R',
            Direction::Stay => 'S',
        }
    }
}

/// What the machine does after reading a symbol in a given state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition<A> {
    /// The symbol written over the current cell.
    pub write: TapeSymbol<A>,
    /// Where the head moves afterwards.
    pub direction: Direction,
    /// The state the machine enters.
    pub next_state: TmState,
}

/// A single-tape deterministic Turing Machine.
///
/// Rules are stored per state and keyed by the symbol read, so the machine is a partial
/// function from `(state, symbol)` to `Transition`. Halting states carry empty tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program<A: InputSymbol> {
    /// A human-readable name used when rendering the program.
    pub name: String,
    /// Every state of the machine, in declaration order.
    pub states: Vec<TmState>,
    /// Every symbol the machine may read or write, blank included.
    pub tape_alphabet: Vec<TapeSymbol<A>>,
    /// The state the machine starts in.
    pub start_state: TmState,
    /// The transition table.
    pub rules: HashMap<TmState, HashMap<TapeSymbol<A>, Transition<A>>>,
}

impl<A: InputSymbol> Program<A> {
    /// Creates a program with no states, symbols or rules.
    pub fn new(name: impl Into<String>, start_state: TmState) -> Self {
        Self {
            name: name.into(),
            states: Vec::new(),
            tape_alphabet: Vec::new(),
            start_state,
            rules: HashMap::new(),
        }
    }

    /// Declares a state. Declaring it again is a no-op.
    pub fn add_state(&mut self, state: TmState) {
        if !self.rules.contains_key(&state) {
            self.rules.insert(state.clone(), HashMap::new());
            self.states.push(state);
        }
    }

    /// Declares a tape symbol. Declaring it again is a no-op.
    pub fn add_symbol(&mut self, symbol: TapeSymbol<A>) {
        if !self.tape_alphabet.contains(&symbol) {
            self.tape_alphabet.push(symbol);
        }
    }

    /// Adds the rule for reading `read` in `state`, declaring every state and symbol it
    /// mentions. An existing rule for the same pair is replaced.
    pub fn add_rule(&mut self, state: TmState, read: TapeSymbol<A>, transition: Transition<A>) {
        self.add_state(state.clone());
        self.add_state(transition.next_state.clone());
        self.add_symbol(read.clone());
        self.add_symbol(transition.write.clone());

        self.rules
            .entry(state)
            .or_default()
            .insert(read, transition);
    }

    /// Returns the rule for reading `symbol` in `state`, if one is defined.
    pub fn transition(&self, state: &TmState, symbol: &TapeSymbol<A>) -> Option<&Transition<A>> {
        self.rules.get(state).and_then(|table| table.get(symbol))
    }

    /// Checks whether `state` is one of the program's states.
    pub fn has_state(&self, state: &TmState) -> bool {
        self.rules.contains_key(state)
    }

    /// Checks whether `symbol` may appear on the tape as an input symbol.
    pub fn accepts_input_symbol(&self, symbol: &A) -> bool {
        self.tape_alphabet
            .iter()
            .any(|s| matches!(s, TapeSymbol::Input(a) if a == symbol))
    }

    /// Total number of rules across all states.
    pub fn rule_count(&self) -> usize {
        self.rules.values().map(HashMap::len).sum()
    }
}

impl<A: InputSymbol> fmt::Display for Program<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "name: {}", self.name)?;
        writeln!(f, "blank: {BLANK_DISPLAY}")?;
        writeln!(f, "start: {}", self.start_state)?;
        writeln!(f, "rules:")?;

        for state in &self.states {
            writeln!(f, "  {state}:")?;

            // List rules in tape alphabet order so the output is stable
            for read in &self.tape_alphabet {
                if let Some(t) = self.transition(state, read) {
                    writeln!(
                        f,
                        "    {} -> {}, {}, {}",
                        read,
                        t.write,
                        t.direction.letter(),
                        t.next_state
                    )?;
                }
            }
        }

        Ok(())
    }
}

/// The terminal outcome of a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    /// The machine halted in `ACCEPT`.
    Accept,
    /// The machine halted in `REJECT`, or found no rule for what it read.
    Reject,
    /// The step bound ran out before the machine halted.
    Timeout,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Verdict::Accept => "ACCEPT",
            Verdict::Reject => "REJECT",
            Verdict::Timeout => "TIMEOUT",
        };
        write!(f, "{text}")
    }
}

/// Represents the outcome of a single simulation step.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// The machine applied a rule and can keep going.
    Continue,
    /// The machine has halted with the given verdict.
    Halt(Verdict),
}

/// A view of the machine at one point of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot<A> {
    /// Steps executed when the snapshot was taken.
    pub step: usize,
    /// The current state.
    pub state: TmState,
    /// The tape with outer blanks trimmed, widened to always cover the head.
    pub window: Vec<TapeSymbol<A>>,
    /// Head position relative to the start of `window`.
    pub head_offset: usize,
}

impl<A: fmt::Display> fmt::Display for Snapshot<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tape = render_tape(&self.window);
        let caret = self.window[..self.head_offset.min(self.window.len())]
            .iter()
            .map(|s| s.to_string().chars().count())
            .sum::<usize>();

        writeln!(f, "step {}: state={} head={}", self.step, self.state, self.head_offset)?;
        writeln!(f, "  {tape}")?;
        write!(f, "  {}^", " ".repeat(caret))
    }
}

/// The result of running a program on one input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport<A> {
    pub verdict: Verdict,
    pub step_count: usize,
    pub final_tape: Vec<TapeSymbol<A>>,
    /// Snapshots taken at start and after every executed step.
    pub trace: Vec<Snapshot<A>>,
}

impl<A: fmt::Display> RunReport<A> {
    /// The final tape as text, blanks included.
    pub fn tape_string(&self) -> String {
        render_tape(&self.final_tape)
    }
}

/// Renders a sequence of tape cells as one string.
pub fn render_tape<A: fmt::Display>(cells: &[TapeSymbol<A>]) -> String {
    cells.iter().map(ToString::to_string).collect()
}

/// Represents the errors that can occur while building or running automata.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AutomatonError {
    /// The DFA failed structural validation.
    #[error("Invalid DFA: {0}")]
    Validation(#[from] ValidationError),
    /// The program refers to a state it does not declare.
    #[error("Invalid state: {0}")]
    InvalidState(String),
    /// The input contains a symbol outside the program's tape alphabet.
    #[error("Symbol {0} is not part of the tape alphabet")]
    UnknownSymbol(String),
    /// A DFA definition could not be parsed.
    #[error("Parse error: {0}")]
    ParseError(String),
    /// No built-in example has the requested name or index.
    #[error("Unknown example: {0}")]
    UnknownExample(String),
}

impl From<serde_json::Error> for AutomatonError {
    fn from(error: serde_json::Error) -> Self {
        AutomatonError::ParseError(error.to_string())
    }
}
