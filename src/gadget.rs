//! Gadget synthesis: the auxiliary states a translated table needs to emulate
//! one tape convention on top of the other.
//!
//! Two families of gadgets exist. On a two-way host emulating a one-way tape,
//! a setup gadget writes the left sentinel in front of the input and every
//! state that can be entered by a left move gets a spring-back rule that
//! bounces the head off the sentinel. Halt states are the exception: they
//! never step, so a left move into one halts on the sentinel with the tape
//! contents unchanged.
//!
//! On a one-way host emulating a two-way tape, the simulated tape lives in a
//! window between the left sentinel and the right extension marker; a setup
//! gadget builds the window and every state gets a shift family that widens
//! it whenever the head lands on a marker.
//!
//! One synthesizer serves one translation run. Its membership sets make
//! repeated requests for the same gadget emit nothing.

use crate::alphabet::{Alphabet, Markers};
use crate::namer::{KeyedTransition, Role, SetupRole, StateKey};
use crate::types::{Direction, BLANK_SYMBOL, WILDCARD_SYMBOL};
use std::collections::HashSet;
use tracing::debug;

/// A gadget waiting to be emitted by [`GadgetSynthesizer::finish`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Request {
    ShiftFamily(String),
    StepBack(String),
}

pub struct GadgetSynthesizer {
    alphabet: Alphabet,
    markers: Markers,
    sprung: HashSet<StateKey>,
    requested: HashSet<Request>,
    pending: Vec<Request>,
}

impl GadgetSynthesizer {
    pub fn new(alphabet: Alphabet, markers: Markers) -> Self {
        Self {
            alphabet,
            markers,
            sprung: HashSet::new(),
            requested: HashSet::new(),
            pending: Vec::new(),
        }
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn markers(&self) -> Markers {
        self.markers
    }

    /// Moves onto the cell left of the input, writes the left sentinel there
    /// and steps back onto the first input cell in `start`.
    pub fn boundary_setup(&self, start: StateKey) -> Vec<KeyedTransition> {
        let mark = StateKey::Setup(SetupRole::MarkBoundary);

        vec![
            KeyedTransition::new(
                StateKey::Entry,
                WILDCARD_SYMBOL,
                WILDCARD_SYMBOL,
                Direction::Left,
                mark.clone(),
            ),
            KeyedTransition::new(
                mark,
                WILDCARD_SYMBOL,
                self.markers.left,
                Direction::Right,
                start,
            ),
        ]
    }

    /// Returns the rule bouncing `state` off the left sentinel, the first time
    /// it is asked for. Terminal states never step and get none.
    pub fn spring_back(&mut self, state: &StateKey) -> Option<KeyedTransition> {
        if state.is_terminal() || !self.sprung.insert(state.clone()) {
            return None;
        }

        debug!("Adding spring-back rule to {state}");
        let left = self.markers.left;
        Some(KeyedTransition::new(
            state.clone(),
            left,
            left,
            Direction::Right,
            state.clone(),
        ))
    }

    /// Builds the window `<L> x0 .. xn-1 <R>` around the input and enters
    /// `start` on the first input cell.
    ///
    /// The input is shifted one cell right by carrying each overwritten symbol
    /// forward until the first blank.
    pub fn window_setup(&self, start: StateKey) -> Vec<KeyedTransition> {
        let Markers { left, right } = self.markers;
        let tape = self.alphabet.tape_symbols();
        let working = self.alphabet.working_symbols(&self.markers);
        let carry = |symbol| StateKey::Setup(SetupRole::Carry(symbol));
        let seal = StateKey::Setup(SetupRole::Seal);
        let home = StateKey::Setup(SetupRole::Home);
        let mut rules = Vec::new();

        for &read in &tape {
            rules.push(KeyedTransition::new(
                StateKey::Entry,
                read,
                left,
                Direction::Right,
                carry(read),
            ));
        }

        for &carried in &tape {
            for read in self.alphabet.data() {
                rules.push(KeyedTransition::new(
                    carry(carried),
                    read,
                    carried,
                    Direction::Right,
                    carry(read),
                ));
            }
            rules.push(KeyedTransition::new(
                carry(carried),
                BLANK_SYMBOL,
                carried,
                Direction::Right,
                seal.clone(),
            ));
        }

        for &read in &working {
            rules.push(KeyedTransition::new(
                seal.clone(),
                read,
                right,
                Direction::Left,
                home.clone(),
            ));
        }

        for &read in &working {
            rules.push(if read == left {
                KeyedTransition::new(home.clone(), left, left, Direction::Right, start.clone())
            } else {
                KeyedTransition::new(home.clone(), read, read, Direction::Left, home.clone())
            });
        }

        rules
    }

    /// Queues the shift family returning to `origin`. Returns `false` if the
    /// family was already queued or `origin` is terminal.
    pub fn request_shift_family(&mut self, origin: &str) -> bool {
        if StateKey::original(origin).is_terminal() {
            return false;
        }

        self.request(Request::ShiftFamily(origin.to_string()))
    }

    /// Queues the step-back gadget landing in `target` and returns the state
    /// to enter it through. Terminal targets need none.
    pub fn request_step_back(&mut self, target: &str) -> Option<StateKey> {
        let key = StateKey::derived(target, Role::StepBack);
        if key.is_terminal() {
            return None;
        }

        self.request(Request::StepBack(target.to_string()));
        Some(key)
    }

    fn request(&mut self, request: Request) -> bool {
        if !self.requested.insert(request.clone()) {
            return false;
        }

        debug!("Queued {request:?}");
        self.pending.push(request);
        true
    }

    /// The shift family of `origin`.
    ///
    /// Landing on the left sentinel shifts the whole window one cell right,
    /// leaves a blank under the head and re-enters `origin`. Landing on the
    /// right marker pushes the marker one cell out. Every gadget state has
    /// exactly one rule for every working symbol.
    pub fn shift_family(&self, origin: &str) -> Vec<KeyedTransition> {
        let Markers { left, right } = self.markers;
        let tape = self.alphabet.tape_symbols();
        let working = self.alphabet.working_symbols(&self.markers);
        let home = StateKey::original(origin);
        let derived = |role| StateKey::derived(origin, role);
        let rewind = derived(Role::Rewind);
        let grow = derived(Role::Grow);

        let mut rules = vec![
            KeyedTransition::new(
                home.clone(),
                left,
                left,
                Direction::Right,
                derived(Role::Carry(BLANK_SYMBOL)),
            ),
            KeyedTransition::new(
                home.clone(),
                right,
                BLANK_SYMBOL,
                Direction::Right,
                grow.clone(),
            ),
        ];

        for &carried in &tape {
            let state = derived(Role::Carry(carried));
            for &read in &working {
                rules.push(if read == left {
                    // Never reached from a well-formed window; skip over it.
                    KeyedTransition::new(state.clone(), left, left, Direction::Right, state.clone())
                } else {
                    KeyedTransition::new(
                        state.clone(),
                        read,
                        carried,
                        Direction::Right,
                        derived(Role::Carry(read)),
                    )
                });
            }
        }

        let last = derived(Role::Carry(right));
        for &read in &working {
            rules.push(KeyedTransition::new(
                last.clone(),
                read,
                right,
                Direction::Left,
                rewind.clone(),
            ));
        }

        for &read in &working {
            rules.push(if read == left {
                KeyedTransition::new(rewind.clone(), left, left, Direction::Right, home.clone())
            } else {
                KeyedTransition::new(rewind.clone(), read, read, Direction::Left, rewind.clone())
            });
        }

        for &read in &working {
            rules.push(KeyedTransition::new(
                grow.clone(),
                read,
                right,
                Direction::Left,
                home.clone(),
            ));
        }

        rules
    }

    /// The step-back gadget of `target`: one step left, whatever is read.
    pub fn step_back(&self, target: &str) -> Vec<KeyedTransition> {
        let state = StateKey::derived(target, Role::StepBack);

        self.alphabet
            .working_symbols(&self.markers)
            .into_iter()
            .map(|read| {
                KeyedTransition::new(
                    state.clone(),
                    read,
                    read,
                    Direction::Left,
                    StateKey::original(target),
                )
            })
            .collect()
    }

    /// Emits every queued gadget, in request order.
    pub fn finish(self) -> Vec<KeyedTransition> {
        self.pending
            .iter()
            .flat_map(|request| match request {
                Request::ShiftFamily(origin) => self.shift_family(origin),
                Request::StepBack(target) => self.step_back(target),
            })
            .collect()
    }
}
