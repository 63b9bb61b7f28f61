use std::fmt;
use std::sync::Arc;

use hashbrown::{HashMap as FastHashMap, HashSet as FastHashSet};

use crate::matcher::{CaptureTable, MatchError, StepBudget};
use crate::predicate::{CaptureMarker, Predicate, SystemPredicate};
use crate::types::{CaptureSpan, StateId};

use super::nfa::Automaton;

/// One outgoing edge of a frozen automaton.
pub struct CompiledEdge<T> {
    pub predicate: Predicate<T>,
    pub to: StateId,
}

/// Read-only compact automaton: per-state edge slices flattened into one
/// array, final states as a dense bitmap.
pub struct CoreAutomaton<T> {
    starts: Box<[StateId]>,
    finals: Box<[bool]>,
    offsets: Box<[u32]>,
    edges: Box<[CompiledEdge<T>]>,
}

impl<T> CoreAutomaton<T> {
    fn from_graph(fsa: &Automaton<T>) -> Self {
        let count = fsa.state_count() as usize;
        let mut finals = vec![false; count];
        for &state in fsa.finals() {
            finals[state as usize] = true;
        }
        let mut offsets = Vec::with_capacity(count + 1);
        let mut edges = Vec::with_capacity(fsa.transition_count());
        offsets.push(0u32);
        for state in 0..fsa.state_count() {
            for transition in fsa.transitions_from(state) {
                edges.push(CompiledEdge {
                    predicate: transition.predicate.clone(),
                    to: transition.to,
                });
            }
            offsets.push(edges.len() as u32);
        }
        Self {
            starts: fsa.starts().into(),
            finals: finals.into_boxed_slice(),
            offsets: offsets.into_boxed_slice(),
            edges: edges.into_boxed_slice(),
        }
    }

    pub fn starts(&self) -> &[StateId] {
        &self.starts
    }

    pub fn is_final(&self, state: StateId) -> bool {
        self.finals.get(state as usize).copied().unwrap_or(false)
    }

    /// Outgoing edges of `state` in construction insertion order.
    pub fn transitions_from(&self, state: StateId) -> &[CompiledEdge<T>] {
        let index = state as usize;
        if index + 1 >= self.offsets.len() {
            return &[];
        }
        let lo = self.offsets[index] as usize;
        let hi = self.offsets[index + 1] as usize;
        &self.edges[lo..hi]
    }

    pub fn state_count(&self) -> usize {
        self.finals.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

/// Immutable pairing of a determinized automaton with the NFA it was
/// derived from.
///
/// The DFA side answers "does a match start here, and how long is it"; the
/// NFA side is replayed over the discovered span to recover capture
/// boundaries, which DFA state-merging loses. Safe to share across
/// concurrent matching calls; every run owns its own cursor and table.
pub struct CompiledAutomaton<T> {
    dfa: CoreAutomaton<T>,
    nfa: CoreAutomaton<T>,
    capture_names: Arc<[Arc<str>]>,
    exact_begin: bool,
    exact_end: bool,
}

impl<T> CompiledAutomaton<T> {
    pub(crate) fn new(dfa: Automaton<T>, nfa: Automaton<T>) -> Self {
        Self {
            dfa: CoreAutomaton::from_graph(&dfa),
            nfa: CoreAutomaton::from_graph(&nfa),
            capture_names: nfa.capture_names.clone().into(),
            exact_begin: nfa.exact_begin,
            exact_end: nfa.exact_end,
        }
    }

    pub fn dfa(&self) -> &CoreAutomaton<T> {
        &self.dfa
    }

    /// The originating NFA, kept for capture recovery.
    pub fn nfa(&self) -> &CoreAutomaton<T> {
        &self.nfa
    }

    pub fn is_final(&self, state: StateId) -> bool {
        self.dfa.is_final(state)
    }

    pub fn transitions_from(&self, state: StateId) -> &[CompiledEdge<T>] {
        self.dfa.transitions_from(state)
    }

    pub fn capture_names(&self) -> &Arc<[Arc<str>]> {
        &self.capture_names
    }

    pub fn exact_begin(&self) -> bool {
        self.exact_begin
    }

    pub fn exact_end(&self) -> bool {
        self.exact_end
    }

    /// DFA walk from `at`: returns the length of the longest span whose run
    /// ends in a final state, or `None`. `backward` consumes leftwards
    /// (reversed automata); `require_far_boundary` demands the run consume
    /// to the input edge (the `ExactEnd` side for forward scans).
    pub(crate) fn run_span(
        &self,
        sequence: &[T],
        at: usize,
        backward: bool,
        require_far_boundary: bool,
    ) -> Option<usize> {
        let mut budget = StepBudget::unlimited();
        match self.try_run_span(sequence, at, backward, require_far_boundary, &mut budget) {
            Ok(result) => result,
            Err(_) => None,
        }
    }

    pub(crate) fn try_run_span(
        &self,
        sequence: &[T],
        at: usize,
        backward: bool,
        require_far_boundary: bool,
        budget: &mut StepBudget,
    ) -> Result<Option<usize>, MatchError> {
        let len = sequence.len();
        let mut best: Option<usize> = None;
        let mut visited: FastHashSet<(StateId, usize)> = FastHashSet::new();
        let mut stack: Vec<(StateId, usize)> = Vec::new();
        for &state in self.dfa.starts() {
            if visited.insert((state, at)) {
                stack.push((state, at));
            }
        }

        while let Some((state, pos)) = stack.pop() {
            budget.consume(1)?;
            if self.dfa.is_final(state) {
                let at_boundary = if backward { pos == 0 } else { pos == len };
                if !require_far_boundary || at_boundary {
                    best = Some(match best {
                        None => pos,
                        Some(prev) if backward => prev.min(pos),
                        Some(prev) => prev.max(pos),
                    });
                }
            }
            for edge in self.dfa.transitions_from(state) {
                match &edge.predicate {
                    Predicate::Complex(look) => {
                        if look.is_match_at(sequence, pos) && visited.insert((edge.to, pos)) {
                            stack.push((edge.to, pos));
                        }
                    }
                    // Zero-width system predicates never label DFA edges.
                    Predicate::System(_) => {}
                    predicate => {
                        let step = if backward {
                            pos.checked_sub(1).map(|next| (next, &sequence[next]))
                        } else if pos < len {
                            Some((pos + 1, &sequence[pos]))
                        } else {
                            None
                        };
                        if let Some((next, element)) = step
                            && predicate.is_match(element)
                            && visited.insert((edge.to, next))
                        {
                            stack.push((edge.to, next));
                        }
                    }
                }
            }
        }

        Ok(best.map(|pos| if backward { at - pos } else { pos - at }))
    }

    /// Replays the NFA over the fixed span to populate the capture table.
    ///
    /// Depth-first in construction edge order, so the first complete path
    /// is the canonical greedy/lazy choice; the `(state, position)` memo
    /// makes zero-width cycles terminate (a pair that failed once fails
    /// always, because predicates cannot observe capture state).
    pub(crate) fn try_recover_captures(
        &self,
        sequence: &[T],
        at: usize,
        matched_len: usize,
        backward: bool,
        table: &mut CaptureTable,
        budget: &mut StepBudget,
    ) -> Result<bool, MatchError> {
        let target = if backward { at - matched_len } else { at + matched_len };
        let mut replay = Replay {
            nfa: &self.nfa,
            sequence,
            target,
            backward,
            visited: FastHashSet::new(),
            recorder: CaptureRecorder::new(table),
        };
        for &state in self.nfa.starts() {
            if replay.dfs(state, at, budget)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl<T> fmt::Debug for CompiledAutomaton<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledAutomaton")
            .field("dfa_states", &self.dfa.state_count())
            .field("dfa_edges", &self.dfa.edge_count())
            .field("nfa_states", &self.nfa.state_count())
            .field("nfa_edges", &self.nfa.edge_count())
            .field("capture_names", &self.capture_names)
            .finish()
    }
}

struct Replay<'a, T> {
    nfa: &'a CoreAutomaton<T>,
    sequence: &'a [T],
    target: usize,
    backward: bool,
    visited: FastHashSet<(StateId, usize)>,
    recorder: CaptureRecorder<'a>,
}

impl<T> Replay<'_, T> {
    fn dfs(
        &mut self,
        state: StateId,
        pos: usize,
        budget: &mut StepBudget,
    ) -> Result<bool, MatchError> {
        budget.consume(1)?;
        if pos == self.target && self.nfa.is_final(state) {
            return Ok(true);
        }
        if !self.visited.insert((state, pos)) {
            return Ok(false);
        }
        let nfa = self.nfa;
        let sequence = self.sequence;
        // Iterating in insertion order resolves greedy/lazy preference.
        for edge in nfa.transitions_from(state) {
            let to = edge.to;
            match &edge.predicate {
                Predicate::System(SystemPredicate::Epsilon) => {
                    if self.dfs(to, pos, budget)? {
                        return Ok(true);
                    }
                }
                Predicate::System(SystemPredicate::Capture(marker)) => {
                    let undo = self.recorder.toggle(marker, pos);
                    if self.dfs(to, pos, budget)? {
                        return Ok(true);
                    }
                    self.recorder.undo(undo);
                }
                Predicate::Complex(look) => {
                    if look.is_match_at(sequence, pos) && self.dfs(to, pos, budget)? {
                        return Ok(true);
                    }
                }
                predicate => {
                    let step = if self.backward {
                        if pos > self.target {
                            Some((pos - 1, &sequence[pos - 1]))
                        } else {
                            None
                        }
                    } else if pos < self.target {
                        Some((pos + 1, &sequence[pos]))
                    } else {
                        None
                    };
                    if let Some((next, element)) = step
                        && predicate.is_match(element)
                        && self.dfs(to, next, budget)?
                    {
                        return Ok(true);
                    }
                }
            }
        }
        Ok(false)
    }
}

/// Records capture-marker traversals during replay, with journal-style undo
/// for backtracking. A marker's first traversal opens the span, the second
/// closes it and appends to the table in discovery order.
struct CaptureRecorder<'a> {
    table: &'a mut CaptureTable,
    open: FastHashMap<u32, usize>,
}

enum Undo {
    Opened {
        marker: u32,
    },
    Closed {
        marker: u32,
        capture_id: crate::types::CaptureId,
        open_pos: usize,
    },
}

impl<'a> CaptureRecorder<'a> {
    fn new(table: &'a mut CaptureTable) -> Self {
        Self {
            table,
            open: FastHashMap::new(),
        }
    }

    fn toggle(&mut self, marker: &CaptureMarker, pos: usize) -> Undo {
        match self.open.remove(&marker.marker()) {
            Some(open_pos) => {
                let span: CaptureSpan = if open_pos <= pos {
                    (open_pos, pos - open_pos)
                } else {
                    (pos, open_pos - pos)
                };
                self.table.push(marker.capture_id(), span);
                Undo::Closed {
                    marker: marker.marker(),
                    capture_id: marker.capture_id(),
                    open_pos,
                }
            }
            None => {
                self.open.insert(marker.marker(), pos);
                Undo::Opened {
                    marker: marker.marker(),
                }
            }
        }
    }

    fn undo(&mut self, undo: Undo) {
        match undo {
            Undo::Opened { marker } => {
                self.open.remove(&marker);
            }
            Undo::Closed {
                marker,
                capture_id,
                open_pos,
            } => {
                self.table.pop(capture_id);
                self.open.insert(marker, open_pos);
            }
        }
    }
}
