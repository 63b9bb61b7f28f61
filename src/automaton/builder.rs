use std::sync::Arc;

use crate::options::PatternOptions;
use crate::pattern::{
    AlternationNode, ConcatNode, GroupNode, GroupQuantifier, PatternNode, RepeatNode, RootNode,
};
use crate::predicate::Predicate;
use crate::types::StateId;

use super::compiled::CompiledAutomaton;
use super::error::AutomatonResult;
use super::nfa::Automaton;
use super::operator;

/// Builds the raw NFA for a pattern tree: two boundary states, the tree
/// wired between them, boundary states registered as start/final.
pub fn build_nfa<T>(root: &RootNode<T>, options: PatternOptions) -> AutomatonResult<Automaton<T>> {
    let name = root
        .capture_names
        .first()
        .cloned()
        .unwrap_or_else(|| Arc::from("0"));
    let mut fsa = Automaton::new(name, root.capture_names.clone());
    let start = fsa.new_state();
    let end = fsa.new_state();
    evaluate_root(start, end, &mut fsa, root, options)?;
    fsa.add_final(end)?;
    fsa.add_start(start)?;
    fsa.check_integrity()?;
    Ok(fsa)
}

/// Top-level entry point: raw NFA, reversed when `REVERSE_PATTERN` is set
/// (lookbehind bodies, right-to-left scans), then determinized and paired
/// into a compiled automaton.
#[tracing::instrument(level = "trace", skip(root), fields(options = ?options))]
pub fn compile<T>(
    root: &RootNode<T>,
    options: PatternOptions,
) -> AutomatonResult<CompiledAutomaton<T>> {
    let mut nfa = build_nfa(root, options)?;
    if options.contains(PatternOptions::REVERSE_PATTERN) {
        nfa = operator::reverse(&nfa)?;
    }
    let dfa = operator::determinize(&nfa)?;
    Ok(CompiledAutomaton::new(dfa, nfa))
}

fn evaluate_root<T>(
    start: StateId,
    end: StateId,
    fsa: &mut Automaton<T>,
    root: &RootNode<T>,
    options: PatternOptions,
) -> AutomatonResult<()> {
    fsa.exact_begin = root.exact_begin || options.contains(PatternOptions::EXACT_BEGIN);
    fsa.exact_end = root.exact_end || options.contains(PatternOptions::EXACT_END);
    evaluate(start, end, fsa, &root.pattern, options)
}

/// Wires `node` between the two given boundary states.
fn evaluate<T>(
    start: StateId,
    end: StateId,
    fsa: &mut Automaton<T>,
    node: &PatternNode<T>,
    options: PatternOptions,
) -> AutomatonResult<()> {
    match node {
        PatternNode::Atom(atom) => fsa.add_transition(start, atom.predicate.clone(), end),
        PatternNode::Concat(concat) => evaluate_concat(start, end, fsa, concat, options),
        PatternNode::Alternation(alt) => evaluate_alternation(start, end, fsa, alt, options),
        PatternNode::Repeat(repeat) => evaluate_repeat(start, end, fsa, repeat, options),
        PatternNode::Group(group) => evaluate_group(start, end, fsa, group, options),
    }
}

fn evaluate_concat<T>(
    start: StateId,
    end: StateId,
    fsa: &mut Automaton<T>,
    node: &ConcatNode<T>,
    options: PatternOptions,
) -> AutomatonResult<()> {
    chain_children(start, end, fsa, &node.children, options)
}

fn chain_children<T>(
    start: StateId,
    end: StateId,
    fsa: &mut Automaton<T>,
    children: &[PatternNode<T>],
    options: PatternOptions,
) -> AutomatonResult<()> {
    let Some((last, head)) = children.split_last() else {
        return fsa.add_epsilon_transition(start, end);
    };
    let mut prev = start;
    for child in head {
        let next = fsa.new_state();
        evaluate(prev, next, fsa, child, options)?;
        prev = next;
    }
    evaluate(prev, end, fsa, last, options)
}

/// Every branch is wired independently between the same state pair.
fn evaluate_alternation<T>(
    start: StateId,
    end: StateId,
    fsa: &mut Automaton<T>,
    node: &AlternationNode<T>,
    options: PatternOptions,
) -> AutomatonResult<()> {
    for child in &node.children {
        evaluate(start, end, fsa, child, options)?;
    }
    Ok(())
}

fn evaluate_group<T>(
    start: StateId,
    end: StateId,
    fsa: &mut Automaton<T>,
    node: &GroupNode<T>,
    options: PatternOptions,
) -> AutomatonResult<()> {
    match &node.quantifier {
        GroupQuantifier::Capture { name, id } => {
            // One marker instance brackets the captured span on both sides.
            let marker = fsa.next_capture_marker();
            let sys = Predicate::capture_marker(name.clone(), *id, marker, true);
            let inner_start = fsa.new_state();
            fsa.add_transition(start, sys.clone(), inner_start)?;
            let inner_end = fsa.new_state();
            fsa.add_transition(inner_end, sys, end)?;
            chain_children(inner_start, inner_end, fsa, &node.children, options)
        }
        GroupQuantifier::LookAround { behind, negative } => {
            evaluate_lookaround(start, end, fsa, node, *behind, *negative, options)
        }
    }
}

/// Compiles the lookaround body as an independent automaton and installs it
/// as a single zero-width transition. The body never shares states with the
/// enclosing automaton.
fn evaluate_lookaround<T>(
    start: StateId,
    end: StateId,
    fsa: &mut Automaton<T>,
    node: &GroupNode<T>,
    behind: bool,
    negative: bool,
    options: PatternOptions,
) -> AutomatonResult<()> {
    // A lookbehind under a reversed enclosing pattern is a forward check,
    // and vice versa.
    let behind = if options.contains(PatternOptions::REVERSE_PATTERN) {
        !behind
    } else {
        behind
    };
    let body_options = if behind {
        PatternOptions::RIGHT_TO_LEFT
    } else {
        PatternOptions::empty()
    };

    let body_root = RootNode {
        pattern: PatternNode::Concat(ConcatNode::new(node.children.clone(), node.range)),
        exact_begin: true,
        exact_end: false,
        capture_names: vec![Arc::from("0")],
        range: node.range,
    };
    let body = compile(&body_root, body_options)?;

    let predicate = Predicate::complex(Arc::new(body), negative, behind);
    fsa.add_transition(start, predicate, end)
}

fn evaluate_repeat<T>(
    start: StateId,
    end: StateId,
    fsa: &mut Automaton<T>,
    node: &RepeatNode<T>,
    options: PatternOptions,
) -> AutomatonResult<()> {
    let min = node.bounds.min;
    match node.bounds.max {
        None => {
            let mut prev = start;
            for _ in 0..min {
                let next = fsa.new_state();
                evaluate(prev, next, fsa, &node.child, options)?;
                prev = next;
            }
            repeat_zero_or_more(prev, end, fsa, &node.child, node.lazy, options)
        }
        Some(max) if max > min => {
            let mut prev = start;
            for _ in 0..min {
                let next = fsa.new_state();
                evaluate(prev, next, fsa, &node.child, options)?;
                prev = next;
            }
            for _ in 0..(max - min - 1) {
                let next = fsa.new_state();
                repeat_zero_or_one(prev, next, fsa, &node.child, node.lazy, options)?;
                prev = next;
            }
            repeat_zero_or_one(prev, end, fsa, &node.child, node.lazy, options)
        }
        // Exact count: the last mandatory copy terminates at the boundary.
        Some(_) => {
            if min == 0 {
                return fsa.add_epsilon_transition(start, end);
            }
            let mut prev = start;
            for i in 0..min {
                let next = if i + 1 == min { end } else { fsa.new_state() };
                evaluate(prev, next, fsa, &node.child, options)?;
                prev = next;
            }
            Ok(())
        }
    }
}

/// Edge-insertion order at the branch point encodes preference: greedy
/// tries the body before the skip edge, lazy the skip edge first.
fn repeat_zero_or_one<T>(
    start: StateId,
    end: StateId,
    fsa: &mut Automaton<T>,
    node: &PatternNode<T>,
    lazy: bool,
    options: PatternOptions,
) -> AutomatonResult<()> {
    if lazy {
        fsa.add_epsilon_transition(start, end)?;
        evaluate(start, end, fsa, node, options)
    } else {
        evaluate(start, end, fsa, node, options)?;
        fsa.add_epsilon_transition(start, end)
    }
}

/// Zero-or-more loop: the body self-loops on a dedicated state; for greedy
/// repetition the loop-entry edge is inserted before the loop-exit edge,
/// for lazy the reverse.
fn repeat_zero_or_more<T>(
    start: StateId,
    end: StateId,
    fsa: &mut Automaton<T>,
    node: &PatternNode<T>,
    lazy: bool,
    options: PatternOptions,
) -> AutomatonResult<()> {
    let loop_state = fsa.new_state();
    if lazy {
        fsa.add_epsilon_transition(start, end)?;
        fsa.add_epsilon_transition(loop_state, end)?;
        evaluate(loop_state, loop_state, fsa, node, options)?;
        fsa.add_epsilon_transition(start, loop_state)
    } else {
        evaluate(loop_state, loop_state, fsa, node, options)?;
        fsa.add_epsilon_transition(loop_state, end)?;
        fsa.add_epsilon_transition(start, loop_state)?;
        fsa.add_epsilon_transition(start, end)
    }
}
