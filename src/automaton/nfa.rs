use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::predicate::Predicate;
use crate::types::StateId;

use super::error::{AutomatonError, AutomatonResult};
use super::transition::Transition;

pub(crate) type TransitionList<T> = SmallVec<[Transition<T>; 4]>;

/// Mutable automaton graph built incrementally during construction.
///
/// States are dense integers; outgoing transitions are kept per state in
/// insertion order, which encodes greedy-vs-lazy preference for the replay
/// step. `sigma` is the ordered, deduplicated alphabet of non-zero-width
/// predicates seen on any transition.
pub struct Automaton<T> {
    name: Arc<str>,
    state_count: u32,
    starts: Vec<StateId>,
    finals: Vec<StateId>,
    lookup: Vec<TransitionList<T>>,
    sigma: Vec<Predicate<T>>,
    pub capture_names: Vec<Arc<str>>,
    pub exact_begin: bool,
    pub exact_end: bool,
    next_marker: u32,
}

impl<T> Automaton<T> {
    pub fn new(name: Arc<str>, capture_names: Vec<Arc<str>>) -> Self {
        Self {
            name,
            state_count: 0,
            starts: Vec::new(),
            finals: Vec::new(),
            lookup: Vec::new(),
            sigma: Vec::new(),
            capture_names,
            exact_begin: false,
            exact_end: false,
            next_marker: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Allocates a fresh state (monotonic counter).
    pub fn new_state(&mut self) -> StateId {
        let state = self.state_count;
        self.state_count += 1;
        self.lookup.push(TransitionList::new());
        state
    }

    pub fn state_count(&self) -> u32 {
        self.state_count
    }

    pub fn starts(&self) -> &[StateId] {
        &self.starts
    }

    pub fn finals(&self) -> &[StateId] {
        &self.finals
    }

    pub fn add_start(&mut self, state: StateId) -> AutomatonResult<()> {
        self.check_state(state)?;
        if !self.starts.contains(&state) {
            self.starts.push(state);
        }
        Ok(())
    }

    pub fn add_final(&mut self, state: StateId) -> AutomatonResult<()> {
        self.check_state(state)?;
        if !self.finals.contains(&state) {
            self.finals.push(state);
        }
        Ok(())
    }

    pub fn is_final(&self, state: StateId) -> bool {
        self.finals.contains(&state)
    }

    pub fn add_transition(
        &mut self,
        from: StateId,
        predicate: Predicate<T>,
        to: StateId,
    ) -> AutomatonResult<()> {
        self.check_state(from)?;
        self.check_state(to)?;
        if !predicate.is_zero_width()
            && !self.sigma.iter().any(|known| known.same_symbol(&predicate))
        {
            self.sigma.push(predicate.clone());
        }
        self.lookup[from as usize].push(Transition::new(from, predicate, to));
        Ok(())
    }

    pub fn add_epsilon_transition(&mut self, from: StateId, to: StateId) -> AutomatonResult<()> {
        self.add_transition(from, Predicate::epsilon(), to)
    }

    /// Outgoing transitions of `state` in insertion order; empty for states
    /// with none.
    pub fn transitions_from(&self, state: StateId) -> &[Transition<T>] {
        self.lookup
            .get(state as usize)
            .map(|list| list.as_slice())
            .unwrap_or(&[])
    }

    /// All transitions, grouped by source state in id order.
    pub fn transitions(&self) -> impl Iterator<Item = &Transition<T>> {
        self.lookup.iter().flat_map(|list| list.iter())
    }

    pub fn transition_count(&self) -> usize {
        self.lookup.iter().map(|list| list.len()).sum()
    }

    /// The determinization alphabet: distinct non-zero-width predicates in
    /// first-seen order.
    pub fn alphabet(&self) -> &[Predicate<T>] {
        &self.sigma
    }

    /// States reachable from any state in `states` via one transition whose
    /// predicate is the same alphabet symbol as `input`. The standard
    /// subset-construction primitive.
    pub fn move_set(&self, states: &[StateId], input: &Predicate<T>) -> Vec<StateId> {
        let mut result = Vec::new();
        for &state in states {
            for transition in self.transitions_from(state) {
                if transition.predicate.same_symbol(input) && !result.contains(&transition.to) {
                    result.push(transition.to);
                }
            }
        }
        result.sort_unstable();
        result
    }

    /// Closure of `states` over zero-width transitions (epsilon wiring and
    /// capture markers), sorted. Capture markers are traversed like epsilon
    /// here; they never label DFA transitions.
    pub fn zero_width_closure(&self, states: &[StateId]) -> Vec<StateId> {
        let mut closure: Vec<StateId> = states.to_vec();
        let mut stack: Vec<StateId> = states.to_vec();
        while let Some(state) = stack.pop() {
            for transition in self.transitions_from(state) {
                if transition.predicate.is_zero_width() && !closure.contains(&transition.to) {
                    closure.push(transition.to);
                    stack.push(transition.to);
                }
            }
        }
        closure.sort_unstable();
        closure
    }

    /// Per-site identity for capture markers created during construction.
    pub(crate) fn next_capture_marker(&mut self) -> u32 {
        let marker = self.next_marker;
        self.next_marker += 1;
        marker
    }

    /// Verifies the post-construction invariants: non-empty start and final
    /// sets. Endpoint validity is enforced on every insertion.
    pub fn check_integrity(&self) -> AutomatonResult<()> {
        if self.starts.is_empty() {
            return Err(AutomatonError::EmptyStartSet {
                name: self.name.to_string(),
            });
        }
        if self.finals.is_empty() {
            return Err(AutomatonError::EmptyFinalSet {
                name: self.name.to_string(),
            });
        }
        Ok(())
    }

    fn check_state(&self, state: StateId) -> AutomatonResult<()> {
        if state >= self.state_count {
            return Err(AutomatonError::StateOutOfRange {
                name: self.name.to_string(),
                state,
                count: self.state_count,
            });
        }
        Ok(())
    }
}

impl<T> fmt::Debug for Automaton<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Automaton")
            .field("name", &self.name)
            .field("states", &self.state_count)
            .field("starts", &self.starts)
            .field("finals", &self.finals)
            .field("transitions", &self.lookup)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pred(name: &str, id: u32) -> Predicate<char> {
        let expected: char = name.chars().next().unwrap();
        Predicate::function(Arc::from(name), id, Arc::new(move |c: &char| *c == expected))
    }

    #[test]
    fn transitions_from_missing_state_is_empty() {
        let fsa: Automaton<char> = Automaton::new(Arc::from("t"), vec![Arc::from("0")]);
        assert!(fsa.transitions_from(7).is_empty());
    }

    #[test]
    fn epsilon_never_enters_sigma() {
        let mut fsa: Automaton<char> = Automaton::new(Arc::from("t"), vec![Arc::from("0")]);
        let a = fsa.new_state();
        let b = fsa.new_state();
        fsa.add_epsilon_transition(a, b).unwrap();
        fsa.add_transition(a, pred("x", 1), b).unwrap();
        fsa.add_transition(b, pred("x", 1), a).unwrap();
        assert_eq!(fsa.alphabet().len(), 1);
    }

    #[test]
    fn unallocated_state_is_rejected() {
        let mut fsa: Automaton<char> = Automaton::new(Arc::from("t"), vec![Arc::from("0")]);
        let a = fsa.new_state();
        let err = fsa.add_transition(a, pred("x", 1), 9).unwrap_err();
        assert!(matches!(err, AutomatonError::StateOutOfRange { state: 9, .. }));
    }

    #[test]
    fn move_set_follows_symbol_equality() {
        let mut fsa: Automaton<char> = Automaton::new(Arc::from("t"), vec![Arc::from("0")]);
        let a = fsa.new_state();
        let b = fsa.new_state();
        let c = fsa.new_state();
        fsa.add_transition(a, pred("x", 1), b).unwrap();
        fsa.add_transition(a, pred("y", 2), c).unwrap();
        fsa.add_transition(b, pred("x", 1), c).unwrap();
        assert_eq!(fsa.move_set(&[a, b], &pred("x", 1)), vec![b, c]);
        assert_eq!(fsa.move_set(&[a], &pred("y", 2)), vec![c]);
    }

    #[test]
    fn closure_traverses_capture_markers() {
        let mut fsa: Automaton<char> = Automaton::new(Arc::from("t"), vec![Arc::from("0")]);
        let a = fsa.new_state();
        let b = fsa.new_state();
        let c = fsa.new_state();
        let marker = fsa.next_capture_marker();
        fsa.add_transition(a, Predicate::capture_marker(Arc::from("g"), 1, marker, true), b)
            .unwrap();
        fsa.add_epsilon_transition(b, c).unwrap();
        assert_eq!(fsa.zero_width_closure(&[a]), vec![a, b, c]);
    }
}
