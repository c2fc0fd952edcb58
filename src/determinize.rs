use std::collections::HashMap;

use log::{debug, trace};

use crate::derivative::{derive, nullable, partition};
use crate::dfa::{StateID, DEAD, DFA};
use crate::error::{Error, Result};
use crate::hir::Hir;

/// A worklist construction of a DFA whose states are the canonical
/// derivatives of the pattern.
///
/// Every distinct derivative term is interned as one state; the smart
/// constructors guarantee the set of distinct terms is finite, so the
/// worklist drains. The builder owns the only mutable structure of the
/// whole construction, the term-to-state cache.
pub(crate) struct Determinizer {
    /// The term whose derivatives become the DFA's states.
    root: Hir,
    /// The DFA under construction.
    dfa: DFA,
    /// The canonical term of each state created so far, indexed by
    /// state id. The first entry is always `∅`, the dead state.
    states: Vec<Hir>,
    /// Interning cache from canonical term to state id.
    cache: HashMap<Hir, StateID>,
    /// States created but not yet expanded.
    stack: Vec<StateID>,
    /// Abort construction when the number of states exceeds this.
    state_limit: Option<usize>,
}

impl Determinizer {
    pub(crate) fn new(root: Hir, state_limit: Option<usize>) -> Determinizer {
        let group_count = root.group_count();
        let mut this = Determinizer {
            root,
            dfa: DFA::empty(group_count),
            states: vec![],
            cache: HashMap::new(),
            stack: vec![],
            state_limit,
        };
        // The dead state is interned up front and never explored; it
        // has no transitions.
        let dead = Hir::empty();
        let id = this.dfa.add_state(false);
        debug_assert_eq!(id, DEAD);
        this.states.push(dead.clone());
        this.cache.insert(dead, DEAD);
        this
    }

    pub(crate) fn build(mut self) -> Result<DFA> {
        let start = self.cached_state(self.root.clone())?;
        self.dfa.set_start(start);

        while let Some(id) = self.stack.pop() {
            let term = self.states[id].clone();
            for block in partition(&term).blocks() {
                let rep = block.min().expect("partition blocks are non-empty");
                let d = derive(&term, rep);
                let next = self.cached_state(d.hir)?;
                trace!(
                    "transition q{} --{:?}--> q{} edits={:?}",
                    id, block, next, d.edits
                );
                self.dfa.add_transition(id, block.clone(), next, d.edits);
            }
        }

        debug!("determinization complete: {} states", self.dfa.len());
        Ok(self.dfa)
    }

    /// Return the state for a canonical term, creating and enqueueing
    /// it if it has not been seen before.
    fn cached_state(&mut self, term: Hir) -> Result<StateID> {
        if let Some(&id) = self.cache.get(&term) {
            return Ok(id);
        }
        if let Some(limit) = self.state_limit {
            if self.states.len() >= limit {
                return Err(Error::too_many_states(limit));
            }
        }
        let id = self.dfa.add_state(nullable(&term));
        debug!("state q{}: {}", id, term);
        self.states.push(term.clone());
        self.cache.insert(term, id);
        self.stack.push(id);
        Ok(id)
    }
}
