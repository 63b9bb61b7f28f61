use hashbrown::HashMap as FastHashMap;
use tracing::trace;

use crate::types::StateId;

use super::error::AutomatonResult;
use super::nfa::Automaton;

/// Produces the automaton with every transition flipped and the start and
/// final sets swapped. Anchor flags and capture metadata are carried over
/// unchanged; a positioned run is always anchored at its origin, so the
/// begin-side anchor needs no translation.
pub fn reverse<T>(fsa: &Automaton<T>) -> AutomatonResult<Automaton<T>> {
    let mut reversed = Automaton::new(
        fsa.name().into(),
        fsa.capture_names.clone(),
    );
    reversed.exact_begin = fsa.exact_begin;
    reversed.exact_end = fsa.exact_end;
    for _ in 0..fsa.state_count() {
        reversed.new_state();
    }
    for transition in fsa.transitions() {
        reversed.add_transition(transition.to, transition.predicate.clone(), transition.from)?;
    }
    for &state in fsa.finals() {
        reversed.add_start(state)?;
    }
    for &state in fsa.starts() {
        reversed.add_final(state)?;
    }
    Ok(reversed)
}

/// Subset construction over the alphabet, followed by merging of equivalent
/// states.
///
/// Each distinct set of NFA states reachable via zero-width closure is
/// interned as one DFA state. Capture markers are traversed by the closure
/// like epsilon and never become DFA edge labels; capture recovery always
/// replays the paired NFA, so no marker bookkeeping is kept here.
pub fn determinize<T>(nfa: &Automaton<T>) -> AutomatonResult<Automaton<T>> {
    let mut dfa = Automaton::new(nfa.name().into(), nfa.capture_names.clone());
    dfa.exact_begin = nfa.exact_begin;
    dfa.exact_end = nfa.exact_end;

    let start_set = nfa.zero_width_closure(nfa.starts());
    let mut sets: Vec<Vec<StateId>> = vec![start_set.clone()];
    let mut interned: FastHashMap<Vec<StateId>, StateId> = FastHashMap::new();

    let start = dfa.new_state();
    dfa.add_start(start)?;
    if intersects(&start_set, nfa.finals()) {
        dfa.add_final(start)?;
    }
    interned.insert(start_set, start);

    let mut index = 0;
    while index < sets.len() {
        let current = sets[index].clone();
        for symbol in nfa.alphabet() {
            let moved = nfa.move_set(&current, symbol);
            if moved.is_empty() {
                continue;
            }
            let target_set = nfa.zero_width_closure(&moved);
            let target = match interned.get(&target_set) {
                Some(&existing) => existing,
                None => {
                    let fresh = dfa.new_state();
                    if intersects(&target_set, nfa.finals()) {
                        dfa.add_final(fresh)?;
                    }
                    interned.insert(target_set.clone(), fresh);
                    sets.push(target_set);
                    fresh
                }
            };
            dfa.add_transition(index as StateId, symbol.clone(), target)?;
        }
        index += 1;
    }

    let merged = merge_equivalent(dfa)?;
    trace!(
        nfa_states = nfa.state_count(),
        dfa_states = merged.state_count(),
        "determinized"
    );
    merged.check_integrity()?;
    Ok(merged)
}

fn intersects(sorted: &[StateId], finals: &[StateId]) -> bool {
    finals.iter().any(|state| sorted.binary_search(state).is_ok())
}

/// Repeatedly folds together DFA states with the same final status and the
/// same transition function until a fixpoint. Not a full minimization;
/// equivalence is only recognized when targets already coincide.
fn merge_equivalent<T>(mut dfa: Automaton<T>) -> AutomatonResult<Automaton<T>> {
    loop {
        let count = dfa.state_count();
        let mut representative: Vec<StateId> = (0..count).collect();
        let mut seen: FastHashMap<(bool, Vec<(usize, StateId)>), StateId> = FastHashMap::new();
        let mut merged_any = false;

        for state in 0..count {
            let signature = (dfa.is_final(state), transition_signature(&dfa, state));
            match seen.get(&signature) {
                Some(&first) => {
                    representative[state as usize] = first;
                    merged_any = true;
                }
                None => {
                    seen.insert(signature, state);
                }
            }
        }

        if !merged_any {
            return Ok(dfa);
        }

        // Compact the surviving states and rewire everything through the
        // representative map.
        let mut renumber: FastHashMap<StateId, StateId> = FastHashMap::new();
        let mut rebuilt = Automaton::new(dfa.name().into(), dfa.capture_names.clone());
        rebuilt.exact_begin = dfa.exact_begin;
        rebuilt.exact_end = dfa.exact_end;
        for state in 0..count {
            if representative[state as usize] == state {
                renumber.insert(state, rebuilt.new_state());
            }
        }
        let map = |state: StateId, renumber: &FastHashMap<StateId, StateId>| {
            renumber[&representative[state as usize]]
        };

        for state in 0..count {
            if representative[state as usize] != state {
                continue;
            }
            let from = map(state, &renumber);
            for transition in dfa.transitions_from(state) {
                let to = map(transition.to, &renumber);
                let duplicate = rebuilt
                    .transitions_from(from)
                    .iter()
                    .any(|t| t.to == to && t.predicate.same_symbol(&transition.predicate));
                if !duplicate {
                    rebuilt.add_transition(from, transition.predicate.clone(), to)?;
                }
            }
        }
        for &state in dfa.starts() {
            rebuilt.add_start(map(state, &renumber))?;
        }
        for &state in dfa.finals() {
            rebuilt.add_final(map(state, &renumber))?;
        }

        dfa = rebuilt;
    }
}

fn transition_signature<T>(dfa: &Automaton<T>, state: StateId) -> Vec<(usize, StateId)> {
    let sigma = dfa.alphabet();
    let mut signature: Vec<(usize, StateId)> = dfa
        .transitions_from(state)
        .iter()
        .map(|transition| {
            let symbol = sigma
                .iter()
                .position(|p| p.same_symbol(&transition.predicate))
                .unwrap_or(usize::MAX);
            (symbol, transition.to)
        })
        .collect();
    signature.sort_unstable();
    signature.dedup();
    signature
}
