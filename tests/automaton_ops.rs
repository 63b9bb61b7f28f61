use seqregex::automaton::{build_nfa, determinize, reverse};
use seqregex::options::PatternOptions;
use seqregex::pattern::{PredicateTable, parse_pattern};

fn char_table() -> PredicateTable<char> {
    let table = PredicateTable::new();
    for ch in ['x', 'y', 'z'] {
        let expected = ch;
        table
            .insert_function(&ch.to_string(), move |c: &char| *c == expected)
            .expect("registration should succeed");
    }
    table
}

#[test]
fn reversing_twice_restores_the_automaton() {
    let table = char_table();
    let root = parse_pattern("x(?:y|z)+x", &table).expect("pattern should parse");
    let nfa = build_nfa(&root, PatternOptions::empty()).expect("construction should succeed");

    let twice = reverse(&reverse(&nfa).expect("reverse should succeed"))
        .expect("reverse should succeed");

    assert_eq!(nfa.state_count(), twice.state_count());
    assert_eq!(nfa.transition_count(), twice.transition_count());
    assert_eq!(nfa.starts(), twice.starts());
    assert_eq!(nfa.finals(), twice.finals());
    for transition in nfa.transitions() {
        assert!(
            twice.transitions().any(|t| t == transition),
            "missing transition {transition:?}"
        );
    }
}

#[test]
fn reverse_swaps_start_and_final_sets() {
    let table = char_table();
    let root = parse_pattern("xy", &table).expect("pattern should parse");
    let nfa = build_nfa(&root, PatternOptions::empty()).expect("construction should succeed");
    let reversed = reverse(&nfa).expect("reverse should succeed");

    assert_eq!(nfa.starts(), reversed.finals());
    assert_eq!(nfa.finals(), reversed.starts());
}

#[test]
fn determinize_produces_single_start_and_no_epsilon() {
    let table = char_table();
    let root = parse_pattern("(?:x|y)*z", &table).expect("pattern should parse");
    let nfa = build_nfa(&root, PatternOptions::empty()).expect("construction should succeed");
    let dfa = determinize(&nfa).expect("determinization should succeed");

    assert_eq!(dfa.starts().len(), 1);
    assert!(dfa.transitions().all(|t| !t.predicate.is_zero_width()));
    // At most one transition per (state, symbol).
    for state in 0..dfa.state_count() {
        let edges = dfa.transitions_from(state);
        for (i, a) in edges.iter().enumerate() {
            for b in &edges[i + 1..] {
                assert!(
                    !a.predicate.same_symbol(&b.predicate),
                    "state {state} has two edges for one symbol"
                );
            }
        }
    }
}

#[test]
fn determinize_is_idempotent() {
    let table = char_table();
    for pattern in ["(?:x|y)*z", "x+x+y+", "x{2,4}y?"] {
        let root = parse_pattern(pattern, &table).expect("pattern should parse");
        let nfa = build_nfa(&root, PatternOptions::empty()).expect("construction should succeed");
        let once = determinize(&nfa).expect("determinization should succeed");
        let twice = determinize(&once).expect("determinization should succeed");

        assert_eq!(once.state_count(), twice.state_count(), "pattern {pattern}");
        assert_eq!(
            once.transition_count(),
            twice.transition_count(),
            "pattern {pattern}"
        );
    }
}

#[test]
fn determinized_alphabet_shares_predicate_identity() {
    let table = char_table();
    // `x` occurs three times; the table hands out one interned instance, so
    // the alphabet must carry one symbol per distinct name.
    let root = parse_pattern("x+x+y+x", &table).expect("pattern should parse");
    let nfa = build_nfa(&root, PatternOptions::empty()).expect("construction should succeed");
    assert_eq!(nfa.alphabet().len(), 2);
}
