//! Translation of transition tables between tape conventions.
//!
//! A one-way (Sipser) table is moved onto a two-way tape by fencing off the
//! cells left of the input with a sentinel and bouncing off it. A two-way
//! table is moved onto a one-way tape by keeping the simulated tape inside a
//! window that is widened on demand. Both directions build a fresh output
//! table; the input is never modified.

use crate::alphabet::{Alphabet, Markers};
use crate::gadget::GadgetSynthesizer;
use crate::namer::{KeyedTransition, Namer, Role, StateKey};
use crate::types::{
    is_terminal, Direction, Machine, TapeConvention, Transition, TranslationError,
    INITIAL_STATE, START_STATE, WILDCARD_SYMBOL,
};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::{debug, info, warn};

/// Settings shared by every run of a [`Translator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslateOptions {
    /// Symbols the input tape may hold besides the ones the rules mention.
    pub input_symbols: Vec<char>,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        Self {
            input_symbols: vec!['0', '1'],
        }
    }
}

/// Translates tables into the opposite tape convention.
#[derive(Debug, Clone, Default)]
pub struct Translator {
    options: TranslateOptions,
}

/// Translates `machine` with the default options.
pub fn translate(machine: &Machine) -> Result<Machine, TranslationError> {
    Translator::default().translate(machine)
}

impl Translator {
    pub fn new(options: TranslateOptions) -> Self {
        Self { options }
    }

    /// Translates `machine` into the opposite tape convention.
    ///
    /// Either a complete table is returned or an error; nothing is emitted
    /// for a table that cannot be translated.
    pub fn translate(&self, machine: &Machine) -> Result<Machine, TranslationError> {
        if !machine.is_empty() && !machine.transitions.iter().any(|t| t.state == INITIAL_STATE) {
            warn!(
                "No rule leaves the initial state {INITIAL_STATE}; the translation halts after setup"
            );
        }

        info!(
            "Translating {} rules from a {} tape to a {} tape",
            machine.len(),
            machine.convention,
            machine.convention.opposite()
        );

        let translated = match machine.convention {
            TapeConvention::OneWayInfinite => self.sipser_to_infinite(machine),
            TapeConvention::TwoWayInfinite => self.infinite_to_sipser(machine),
        }?;

        info!("Translated table has {} rules", translated.len());
        Ok(translated)
    }

    /// Runs a one-way table on a two-way tape.
    ///
    /// The setup gadget writes the left sentinel just before the input. Rules
    /// are copied with their states renamed, and every state entered by a
    /// left move bounces off the sentinel, which reproduces the one-way rule
    /// that a left move on the first cell keeps the head in place.
    fn sipser_to_infinite(&self, machine: &Machine) -> Result<Machine, TranslationError> {
        let mut synth = self.synthesizer(machine)?;
        let directed = |state: &str| StateKey::derived(state, Role::Directed);

        let mut rules = synth.boundary_setup(directed(INITIAL_STATE));

        // States owning a spring-back rule must not also match the sentinel
        // through a wildcard.
        let bouncing: HashSet<&str> = machine
            .transitions
            .iter()
            .filter(|t| t.direction == Direction::Left && !is_terminal(&t.next_state))
            .map(|t| t.next_state.as_str())
            .collect();
        let explicit = explicit_reads(machine);

        for t in &machine.transitions {
            let state = directed(&t.state);
            let next_state = directed(&t.next_state);
            let expand = bouncing.contains(t.state.as_str());

            for (read, write) in self.reads(t, expand, &explicit, &synth) {
                rules.push(KeyedTransition::new(
                    state.clone(),
                    read,
                    write,
                    t.direction,
                    next_state.clone(),
                ));
            }

            if t.direction == Direction::Left {
                rules.extend(synth.spring_back(&next_state));
            }
        }

        Namer::new().finish(TapeConvention::TwoWayInfinite, rules)
    }

    /// Runs a two-way table on a one-way tape.
    ///
    /// The simulated tape lives between the left sentinel and the right
    /// extension marker. Left and right moves are copied unchanged; whenever
    /// one of them lands on a marker, the shift family of the destination
    /// widens the window and resumes the destination state. Stay moves are
    /// emulated by a step right followed by a step back.
    fn infinite_to_sipser(&self, machine: &Machine) -> Result<Machine, TranslationError> {
        let machine = rename_initial_state(machine)?;
        let mut synth = self.synthesizer(&machine)?;

        let mut rules = synth.window_setup(StateKey::original(START_STATE));
        let states = machine.states();
        let explicit = explicit_reads(&machine);

        for t in &machine.transitions {
            let state = StateKey::original(&t.state);
            let expand = !is_terminal(&t.state);

            for (read, write) in self.reads(t, expand, &explicit, &synth) {
                match t.direction {
                    Direction::Left | Direction::Right => rules.push(KeyedTransition::new(
                        state.clone(),
                        read,
                        write,
                        t.direction,
                        StateKey::original(&t.next_state),
                    )),
                    Direction::Stay => {
                        let rule = match synth.request_step_back(&t.next_state) {
                            Some(back) => KeyedTransition::new(
                                state.clone(),
                                read,
                                write,
                                Direction::Right,
                                back,
                            ),
                            None => KeyedTransition::new(
                                state.clone(),
                                read,
                                write,
                                Direction::Stay,
                                StateKey::original(&t.next_state),
                            ),
                        };
                        rules.push(rule);
                    }
                }
            }

            // A right move can land on the right marker, a left move on the
            // left sentinel.
            if t.direction != Direction::Stay {
                synth.request_shift_family(&t.next_state);
            }
        }

        for state in states {
            synth.request_shift_family(state);
        }

        rules.extend(synth.finish());
        Namer::new().finish(TapeConvention::OneWayInfinite, rules)
    }

    fn synthesizer(&self, machine: &Machine) -> Result<GadgetSynthesizer, TranslationError> {
        let alphabet = Alphabet::collect(machine, &self.options.input_symbols);
        let markers = Markers::choose(&alphabet)?;
        debug!(
            "Tape symbols {:?}, left sentinel '{}', right marker '{}'",
            alphabet.tape_symbols(),
            markers.left,
            markers.right
        );

        Ok(GadgetSynthesizer::new(alphabet, markers))
    }

    /// The concrete (read, write) pairs a rule stands for.
    ///
    /// With `expand` set, a wildcard read becomes one rule per tape symbol the
    /// state does not handle explicitly, and a wildcard write becomes the
    /// symbol read. Otherwise the rule is kept as written.
    ///
    /// A wildcard rule whose state already handles every tape symbol is kept
    /// as written too. Every symbol the head can meet there has an exact rule,
    /// so it never fires, but its target state stays in the table.
    fn reads(
        &self,
        t: &Transition,
        expand: bool,
        explicit: &HashMap<&str, BTreeSet<char>>,
        synth: &GadgetSynthesizer,
    ) -> Vec<(char, char)> {
        if !expand || t.read != WILDCARD_SYMBOL {
            return vec![(t.read, t.write)];
        }

        let handled = explicit.get(t.state.as_str());
        let expanded: Vec<(char, char)> = synth
            .alphabet()
            .tape_symbols()
            .into_iter()
            .filter(|symbol| handled.is_none_or(|set| !set.contains(symbol)))
            .map(|symbol| {
                let write = if t.write == WILDCARD_SYMBOL {
                    symbol
                } else {
                    t.write
                };
                (symbol, write)
            })
            .collect();

        if expanded.is_empty() {
            debug!(
                "Keeping shadowed wildcard rule ({}, {}) -> {}",
                t.state, t.read, t.next_state
            );
            return vec![(t.read, t.write)];
        }

        expanded
    }
}

/// Concrete symbols each state has its own rule for.
fn explicit_reads(machine: &Machine) -> HashMap<&str, BTreeSet<char>> {
    let mut reads: HashMap<&str, BTreeSet<char>> = HashMap::new();
    for t in machine
        .transitions
        .iter()
        .filter(|t| t.read != WILDCARD_SYMBOL)
    {
        reads.entry(t.state.as_str()).or_default().insert(t.read);
    }
    reads
}

/// Returns a copy of `machine` with the initial state renamed to
/// [`START_STATE`], freeing the initial state for the setup gadget.
fn rename_initial_state(machine: &Machine) -> Result<Machine, TranslationError> {
    if machine.states().contains(&START_STATE) {
        return Err(TranslationError::NameCollision(START_STATE.to_string()));
    }

    let rename = |state: &str| {
        if state == INITIAL_STATE {
            START_STATE.to_string()
        } else {
            state.to_string()
        }
    };

    Ok(Machine {
        convention: machine.convention,
        transitions: machine
            .transitions
            .iter()
            .map(|t| Transition {
                state: rename(&t.state),
                next_state: rename(&t.next_state),
                ..t.clone()
            })
            .collect(),
    })
}
