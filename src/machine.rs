//! A reference simulator for transition tables, used by the test suite to check that
//! translated tables behave like their originals.
//!
//! Rule lookup prefers a rule for the exact symbol over a wildcard rule. A machine halts
//! when it enters a `halt*` state or when no rule applies.

use crate::types::{
    is_terminal, Direction, Machine, TapeConvention, Transition, BLANK_SYMBOL, INITIAL_STATE,
    WILDCARD_SYMBOL,
};
use std::collections::HashMap;

/// Represents the outcome of a single step.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// The machine performed a step and continues execution.
    Continue,
    /// The machine has halted.
    Halt(Halt),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Halt {
    /// Entered the named terminal state.
    Final(String),
    /// No rule applies to the current state and symbol.
    Stuck,
}

/// A single-tape Turing machine running a [`Machine`] table.
pub struct TuringMachine {
    state: String,
    tape: Vec<char>,
    head: usize,
    convention: TapeConvention,
    rules: HashMap<(String, char), Transition>,
    step_count: usize,
}

impl TuringMachine {
    /// Creates a machine in the initial state with `input` on the tape and the
    /// head on its first symbol. The first rule for a (state, symbol) pair wins.
    pub fn new(machine: &Machine, input: &str) -> Self {
        let mut rules = HashMap::new();
        for t in &machine.transitions {
            rules.entry((t.state.clone(), t.read)).or_insert_with(|| t.clone());
        }

        Self {
            state: INITIAL_STATE.to_string(),
            tape: input.chars().collect(),
            head: 0,
            convention: machine.convention,
            rules,
            step_count: 0,
        }
    }

    /// Executes a single step.
    pub fn step(&mut self) -> Step {
        if is_terminal(&self.state) {
            return Step::Halt(Halt::Final(self.state.clone()));
        }

        if self.head >= self.tape.len() {
            self.tape.resize(self.head + 1, BLANK_SYMBOL);
        }

        let Some(transition) = self.transition().cloned() else {
            return Step::Halt(Halt::Stuck);
        };

        if transition.write != WILDCARD_SYMBOL {
            self.tape[self.head] = transition.write;
        }

        match transition.direction {
            Direction::Left => {
                if self.head > 0 {
                    self.head -= 1;
                } else if self.convention == TapeConvention::TwoWayInfinite {
                    // Extend tape to the left
                    self.tape.insert(0, BLANK_SYMBOL);
                }
            }
            Direction::Right => self.head += 1,
            Direction::Stay => {}
        }

        self.state = transition.next_state;
        self.step_count += 1;

        Step::Continue
    }

    /// Runs until the machine halts, or gives up after `limit` steps.
    pub fn run(&mut self, limit: usize) -> Option<Halt> {
        loop {
            match self.step() {
                Step::Halt(halt) => return Some(halt),
                Step::Continue if self.step_count >= limit => return None,
                Step::Continue => {}
            }
        }
    }

    /// Finds the rule for the current state and symbol, preferring an exact match.
    pub fn transition(&self) -> Option<&Transition> {
        let symbol = self.symbol();
        self.rules
            .get(&(self.state.clone(), symbol))
            .or_else(|| self.rules.get(&(self.state.clone(), WILDCARD_SYMBOL)))
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn head(&self) -> usize {
        self.head
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Returns the symbol under the head.
    pub fn symbol(&self) -> char {
        self.tape.get(self.head).copied().unwrap_or(BLANK_SYMBOL)
    }

    /// The tape restricted to blank and `data` symbols, with outer blanks trimmed.
    ///
    /// Dropping every other symbol removes the markers a translated table adds.
    pub fn tape_contents(&self, data: &str) -> String {
        self.tape
            .iter()
            .filter(|c| **c == BLANK_SYMBOL || data.contains(**c))
            .collect::<String>()
            .trim_matches(BLANK_SYMBOL)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn incrementer(convention: TapeConvention) -> Machine {
        // Binary increment, head starting on the most significant bit.
        let mut machine = Machine::new(convention);
        machine.add_transition("0", '*', '*', Direction::Right, "0");
        machine.add_transition("0", '_', '_', Direction::Left, "carry");
        machine.add_transition("carry", '1', '0', Direction::Left, "carry");
        machine.add_transition("carry", '0', '1', Direction::Stay, "halt");
        machine.add_transition("carry", '_', '1', Direction::Stay, "halt");
        machine
    }

    #[test]
    fn test_machine_creation() {
        let machine = TuringMachine::new(&incrementer(TapeConvention::TwoWayInfinite), "101");

        assert_eq!(machine.state(), "0");
        assert_eq!(machine.head(), 0);
        assert_eq!(machine.symbol(), '1');
        assert_eq!(machine.step_count(), 0);
    }

    #[test]
    fn test_exact_rule_beats_wildcard() {
        let mut machine = TuringMachine::new(&incrementer(TapeConvention::TwoWayInfinite), "1");

        assert_eq!(machine.step(), Step::Continue);
        assert_eq!(machine.head(), 1);
        assert_eq!(machine.transition().unwrap().next_state, "carry");
    }

    #[test]
    fn test_two_way_tape_grows_left() {
        let mut machine = TuringMachine::new(&incrementer(TapeConvention::TwoWayInfinite), "11");

        assert_eq!(machine.run(100), Some(Halt::Final("halt".into())));
        assert_eq!(machine.tape_contents("01"), "100");
    }

    #[test]
    fn test_one_way_tape_clamps_left_moves() {
        let mut machine = TuringMachine::new(&incrementer(TapeConvention::OneWayInfinite), "11");

        // The carry runs into the left edge and overwrites the first cell.
        assert_eq!(machine.run(100), Some(Halt::Final("halt".into())));
        assert_eq!(machine.tape_contents("01"), "10");
    }

    #[test]
    fn test_stuck_machine() {
        let mut table = Machine::new(TapeConvention::OneWayInfinite);
        table.add_transition("0", '1', '1', Direction::Right, "0");

        let mut machine = TuringMachine::new(&table, "1x");

        assert_eq!(machine.run(100), Some(Halt::Stuck));
        assert_eq!(machine.state(), "0");
        assert_eq!(machine.head(), 1);
    }

    #[test]
    fn test_step_limit() {
        let mut table = Machine::new(TapeConvention::TwoWayInfinite);
        table.add_transition("0", '*', '*', Direction::Right, "0");

        let mut machine = TuringMachine::new(&table, "");
        assert_eq!(machine.run(50), None);
        assert_eq!(machine.step_count(), 50);
    }

    #[test]
    fn test_tape_contents_drops_markers() {
        let mut table = Machine::new(TapeConvention::OneWayInfinite);
        table.add_transition("0", '*', '#', Direction::Right, "halt");

        let mut machine = TuringMachine::new(&table, "_0_1&");
        machine.run(10);
        assert_eq!(machine.tape_contents("01"), "0_1");
    }
}
