//! This module defines the `TuringMachine` struct, which runs a `Program` against one input.
//! It owns the tape, the head and the current state for the duration of a single run,
//! records a trace of snapshots, and reports an ACCEPT, REJECT or TIMEOUT verdict.

use tracing::{debug, trace};

use crate::dfa::InputSymbol;
use crate::types::{
    AutomatonError, Direction, Program, RunReport, Snapshot, Step, TapeSymbol, TmState, Verdict,
};

/// A single run of a single-tape Turing Machine.
///
/// The machine borrows its program, so one program can serve any number of independent
/// runs. Nothing is shared between runs.
pub struct TuringMachine<'p, A: InputSymbol> {
    program: &'p Program<A>,
    state: TmState,
    tape: Vec<TapeSymbol<A>>,
    head: usize,
    step_count: usize,
    trace: Vec<Snapshot<A>>,
    // Set once a lookup found no rule; the machine has rejected
    stuck: bool,
}

impl<'p, A: InputSymbol> TuringMachine<'p, A> {
    /// Prepares a run of `program` on `input`.
    ///
    /// The tape holds the input symbols in order, or a single blank cell for an empty
    /// input. The head starts on the first cell.
    ///
    /// # Returns
    ///
    /// * `Err(AutomatonError::InvalidState)` if the program's start state is not declared.
    /// * `Err(AutomatonError::UnknownSymbol)` if the input uses a symbol outside the
    ///   program's tape alphabet.
    pub fn new(program: &'p Program<A>, input: &[A]) -> Result<Self, AutomatonError> {
        if !program.has_state(&program.start_state) {
            return Err(AutomatonError::InvalidState(
                program.start_state.to_string(),
            ));
        }

        if let Some(symbol) = input.iter().find(|s| !program.accepts_input_symbol(s)) {
            return Err(AutomatonError::UnknownSymbol(symbol.to_string()));
        }

        let tape = if input.is_empty() {
            vec![TapeSymbol::Blank]
        } else {
            input.iter().cloned().map(TapeSymbol::Input).collect()
        };

        let mut machine = Self {
            program,
            state: program.start_state.clone(),
            tape,
            head: 0,
            step_count: 0,
            trace: Vec::new(),
            stuck: false,
        };
        machine.trace.push(machine.snapshot());

        Ok(machine)
    }

    /// Executes a single step.
    ///
    /// # Returns
    ///
    /// * `Step::Halt(Verdict::Accept)` or `Step::Halt(Verdict::Reject)` if the machine is
    ///   already in a halting state. The step count is left as is.
    /// * `Step::Halt(Verdict::Reject)` if no rule matches the current state and symbol.
    ///   The failed lookup counts as a step; tape, head and state are left as they are.
    /// * `Step::Continue` after applying a rule.
    pub fn step(&mut self) -> Step {
        let symbol = self.symbol();

        if let Some(verdict) = self.verdict() {
            return Step::Halt(verdict);
        }

        let program = self.program;
        let transition = match program.transition(&self.state, &symbol) {
            Some(t) => t,
            None => {
                debug!(state = %self.state, %symbol, "no rule, rejecting");
                self.stuck = true;
                self.step_count += 1;
                self.trace.push(self.snapshot());
                return Step::Halt(Verdict::Reject);
            }
        };

        self.tape[self.head] = transition.write.clone();

        match transition.direction {
            Direction::Left => self.head = self.head.saturating_sub(1),
            Direction::Right => {
                self.head += 1;
                if self.head >= self.tape.len() {
                    self.tape.push(TapeSymbol::Blank);
                }
            }
            Direction::Stay => {}
        }

        self.state = transition.next_state.clone();
        self.step_count += 1;

        trace!(step = self.step_count, state = %self.state, head = self.head, "step");
        self.trace.push(self.snapshot());

        Step::Continue
    }

    /// Runs until the machine halts or `max_steps` steps have been executed in total.
    ///
    /// A machine that reaches a halting state on its last permitted step still reports
    /// that verdict; `Verdict::Timeout` means it was in a non-halting state when the
    /// bound ran out.
    pub fn run(&mut self, max_steps: usize) -> Verdict {
        loop {
            if let Some(verdict) = self.verdict() {
                return verdict;
            }

            if self.step_count >= max_steps {
                return Verdict::Timeout;
            }

            if let Step::Halt(verdict) = self.step() {
                return verdict;
            }
        }
    }

    /// The verdict of the current state, if it is a halting one.
    fn verdict(&self) -> Option<Verdict> {
        if self.stuck {
            return Some(Verdict::Reject);
        }

        match self.state {
            TmState::Accept => Some(Verdict::Accept),
            TmState::Reject => Some(Verdict::Reject),
            TmState::Named(_) => None,
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> &TmState {
        &self.state
    }

    /// Returns the number of steps executed so far.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Returns the current head position.
    pub fn head(&self) -> usize {
        self.head
    }

    /// Returns the tape cells written or visited so far.
    pub fn tape(&self) -> &[TapeSymbol<A>] {
        &self.tape
    }

    /// Returns the snapshots recorded so far.
    pub fn trace(&self) -> &[Snapshot<A>] {
        &self.trace
    }

    /// Checks whether the machine has halted, either in `ACCEPT` or `REJECT` or by
    /// finding no rule for what it read.
    pub fn is_halted(&self) -> bool {
        self.verdict().is_some()
    }

    /// Returns the symbol under the head. Cells never written read as blank.
    pub fn symbol(&self) -> TapeSymbol<A> {
        self.tape
            .get(self.head)
            .cloned()
            .unwrap_or(TapeSymbol::Blank)
    }

    /// Captures the current state with the tape trimmed of outer blanks.
    ///
    /// | _ | a | b | _ | _ |  tape, head on index 4
    ///   0   1   2   3   4
    ///
    /// gives the window `ab__` with head offset 3.
    pub fn snapshot(&self) -> Snapshot<A> {
        let first = self.tape.iter().position(|s| !s.is_blank());
        let last = self.tape.iter().rposition(|s| !s.is_blank());

        let (left, right) = match (first, last) {
            (Some(first), Some(last)) => (first.min(self.head), last.max(self.head)),
            _ => (0, self.head),
        };

        let window = (left..=right)
            .map(|i| self.tape.get(i).cloned().unwrap_or(TapeSymbol::Blank))
            .collect();

        Snapshot {
            step: self.step_count,
            state: self.state.clone(),
            window,
            head_offset: self.head - left,
        }
    }

    /// Ends the run, handing back everything it produced.
    pub fn into_report(self, verdict: Verdict) -> RunReport<A> {
        RunReport {
            verdict,
            step_count: self.step_count,
            final_tape: self.tape,
            trace: self.trace,
        }
    }
}

/// Runs `program` on `input` for at most `max_steps` steps.
///
/// This is the main entry point for simulation: it prepares a fresh machine, runs it and
/// returns the verdict together with the step count, the final tape and the trace.
pub fn run<A: InputSymbol>(
    program: &Program<A>,
    input: &[A],
    max_steps: usize,
) -> Result<RunReport<A>, AutomatonError> {
    let mut machine = TuringMachine::new(program, input)?;
    let verdict = machine.run(max_steps);

    debug!(%verdict, steps = machine.step_count(), "simulation finished");

    Ok(machine.into_report(verdict))
}
