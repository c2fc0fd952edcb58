use std::fmt;

use crate::captures::Edit;
use crate::classes::ClassSet;

/// The identifier of a DFA state. The dead state is always `DEAD`.
pub type StateID = usize;

/// The dead state. Every DFA has one, it is never a match state, and
/// reaching it means no further input can lead to a match.
pub const DEAD: StateID = 0;

/// A single outgoing transition of a DFA state: a block of the state's
/// input partition, the successor state for every character in the
/// block, and the capture edits performed when the transition is taken.
#[derive(Clone, Debug)]
pub struct Transition {
    class: ClassSet,
    next: StateID,
    edits: Vec<Edit>,
}

impl Transition {
    /// The characters this transition applies to.
    pub fn class(&self) -> &ClassSet {
        &self.class
    }

    /// The successor state.
    pub fn next(&self) -> StateID {
        self.next
    }

    /// The capture edits to apply when taking this transition.
    pub fn edits(&self) -> &[Edit] {
        &self.edits
    }
}

#[derive(Clone, Debug)]
struct State {
    is_match: bool,
    transitions: Vec<Transition>,
}

/// A deterministic finite automaton compiled from a regular expression
/// term.
///
/// Each state corresponds to one canonical derivative of the original
/// term; its transitions partition the full alphabet, so exactly one
/// transition applies to any given character. A `DFA` is immutable once
/// built and safe to share across threads by reference.
#[derive(Clone)]
pub struct DFA {
    states: Vec<State>,
    start: StateID,
    group_count: u32,
}

impl DFA {
    pub(crate) fn empty(group_count: u32) -> DFA {
        DFA { states: vec![], start: DEAD, group_count }
    }

    pub(crate) fn add_state(&mut self, is_match: bool) -> StateID {
        let id = self.states.len();
        self.states.push(State { is_match, transitions: vec![] });
        id
    }

    pub(crate) fn add_transition(
        &mut self,
        from: StateID,
        class: ClassSet,
        next: StateID,
        edits: Vec<Edit>,
    ) {
        self.states[from].transitions.push(Transition { class, next, edits });
    }

    pub(crate) fn set_start(&mut self, id: StateID) {
        self.start = id;
    }

    /// The start state.
    pub fn start(&self) -> StateID {
        self.start
    }

    /// The total number of states, including the dead state.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Returns true if this DFA has no states. Only true for a DFA that
    /// has not finished construction.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// The number of capture groups in the pattern, excluding the
    /// implicit group 0.
    pub fn group_count(&self) -> u32 {
        self.group_count
    }

    /// Returns true if and only if the given state is a match state.
    pub fn is_match_state(&self, id: StateID) -> bool {
        self.states[id].is_match
    }

    /// Returns true if and only if the given state is the dead state.
    pub fn is_dead_state(&self, id: StateID) -> bool {
        id == DEAD
    }

    /// All outgoing transitions of a state. The dead state has none;
    /// every other state's transitions cover the full alphabet.
    pub fn transitions(&self, id: StateID) -> &[Transition] {
        &self.states[id].transitions
    }

    /// The transition a state takes on the given character, or `None`
    /// for the dead state.
    pub fn transition(&self, id: StateID, ch: char) -> Option<&Transition> {
        self.states[id].transitions.iter().find(|t| t.class.contains(ch))
    }
}

impl fmt::Debug for DFA {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "DFA(")?;
        for (id, state) in self.states.iter().enumerate() {
            let start = if id == self.start { '>' } else { ' ' };
            let matches = if state.is_match { '*' } else { ' ' };
            write!(f, "{}{}{:04}:", start, matches, id)?;
            for (i, t) in state.transitions.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, " {:?} => {}", t.class, t.next)?;
                if !t.edits.is_empty() {
                    write!(f, " {:?}", t.edits)?;
                }
            }
            writeln!(f)?;
        }
        write!(f, ")")
    }
}
