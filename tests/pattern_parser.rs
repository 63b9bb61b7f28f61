use seqregex::pattern::{
    GroupQuantifier, PatternError, PatternNode, PredicateTable, parse_pattern,
};

fn char_table() -> PredicateTable<char> {
    let table = PredicateTable::new();
    for ch in ['x', 'y', 'z'] {
        let expected = ch;
        table
            .insert_function(&ch.to_string(), move |c: &char| *c == expected)
            .expect("registration should succeed");
    }
    table
        .insert_function("digit", |c: &char| c.is_ascii_digit())
        .expect("registration should succeed");
    table
}

#[test]
fn parses_atoms_and_wraps_whole_match_group() {
    let table = char_table();
    let root = parse_pattern("xy", &table).expect("pattern should parse");
    assert_eq!(root.capture_names.len(), 1);
    assert_eq!(root.capture_names[0].as_ref(), "0");
    match &root.pattern {
        PatternNode::Group(group) => {
            assert_eq!(
                group.quantifier,
                GroupQuantifier::Capture {
                    name: root.capture_names[0].clone(),
                    id: 0
                }
            );
            match &group.children[0] {
                PatternNode::Concat(concat) => assert_eq!(concat.children.len(), 2),
                other => panic!("expected concat node, got {other:?}"),
            }
        }
        other => panic!("expected whole-match group, got {other:?}"),
    }
}

#[test]
fn parses_braced_predicate_names() {
    let table = char_table();
    let root = parse_pattern("{digit}+", &table).expect("pattern should parse");
    match &root.pattern {
        PatternNode::Group(group) => match &group.children[0] {
            PatternNode::Repeat(repeat) => {
                assert_eq!(repeat.bounds.min, 1);
                assert_eq!(repeat.bounds.max, None);
                assert!(!repeat.lazy);
            }
            other => panic!("expected repeat node, got {other:?}"),
        },
        other => panic!("expected group node, got {other:?}"),
    }
}

#[test]
fn parses_anchors_into_root_flags() {
    let table = char_table();
    let root = parse_pattern("^xy$", &table).expect("pattern should parse");
    assert!(root.exact_begin);
    assert!(root.exact_end);

    let root = parse_pattern("xy", &table).expect("pattern should parse");
    assert!(!root.exact_begin);
    assert!(!root.exact_end);
}

#[test]
fn parses_lazy_and_bounded_quantifiers() {
    let table = char_table();
    let root = parse_pattern("x{2,5}?", &table).expect("pattern should parse");
    match &root.pattern {
        PatternNode::Group(group) => match &group.children[0] {
            PatternNode::Repeat(repeat) => {
                assert_eq!(repeat.bounds.min, 2);
                assert_eq!(repeat.bounds.max, Some(5));
                assert!(repeat.lazy);
            }
            other => panic!("expected repeat node, got {other:?}"),
        },
        other => panic!("expected group node, got {other:?}"),
    }
}

#[test]
fn assigns_capture_ids_in_declaration_order() {
    let table = char_table();
    let root = parse_pattern("(x)(?<name>y)(z)", &table).expect("pattern should parse");
    let names: Vec<&str> = root.capture_names.iter().map(|n| n.as_ref()).collect();
    assert_eq!(names, vec!["0", "1", "name", "3"]);
}

#[test]
fn rejects_unknown_predicate() {
    let table = char_table();
    let err = parse_pattern("xq", &table).expect_err("unknown predicate should fail");
    match err {
        PatternError::UnknownPredicate { name, .. } => assert_eq!(name, "q"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn rejects_dangling_quantifier() {
    let table = char_table();
    let err = parse_pattern("+x", &table).expect_err("dangling quantifier should fail");
    match err {
        PatternError::DanglingQuantifier { modifier, .. } => assert_eq!(modifier, '+'),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn rejects_unterminated_group() {
    let table = char_table();
    let err = parse_pattern("(xy", &table).expect_err("unterminated group should fail");
    match err {
        PatternError::UnterminatedGroup { start } => assert_eq!(start, 0),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn rejects_empty_group() {
    let table = char_table();
    let err = parse_pattern("x()", &table).expect_err("empty group should fail");
    match err {
        PatternError::EmptyGroup { start } => assert_eq!(start, 1),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn rejects_inverted_bounds() {
    let table = char_table();
    let err = parse_pattern("x{3,2}", &table).expect_err("inverted bounds should fail");
    match err {
        PatternError::QuantifierBounds { min, max, .. } => {
            assert_eq!((min, max), (3, 2));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn rejects_duplicate_capture_name() {
    let table = char_table();
    let err = parse_pattern("(?<g>x)(?<g>y)", &table).expect_err("duplicate name should fail");
    match err {
        PatternError::DuplicateCaptureName { name } => assert_eq!(name, "g"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn rejects_anchor_inside_pattern() {
    let table = char_table();
    let err = parse_pattern("x^y", &table).expect_err("misplaced anchor should fail");
    match err {
        PatternError::AnchorNotAtEdge { anchor, .. } => assert_eq!(anchor, '^'),
        other => panic!("unexpected error: {other:?}"),
    }
    let err = parse_pattern("x$y", &table).expect_err("misplaced anchor should fail");
    match err {
        PatternError::AnchorNotAtEdge { anchor, .. } => assert_eq!(anchor, '$'),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn rejects_unterminated_braced_name() {
    let table = char_table();
    let err = parse_pattern("{digit", &table).expect_err("unterminated name should fail");
    match err {
        PatternError::UnterminatedName { start } => assert_eq!(start, 0),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn rejects_empty_pattern() {
    let table = char_table();
    let err = parse_pattern("", &table).expect_err("empty pattern should fail");
    assert_eq!(err, PatternError::EmptyPattern);
}

#[test]
fn bounded_quantifier_brace_is_distinguished_from_name_brace() {
    let table = char_table();
    // `{digit}` after `x` is an atom, not a malformed quantifier.
    let root = parse_pattern("x{digit}", &table).expect("pattern should parse");
    match &root.pattern {
        PatternNode::Group(group) => match &group.children[0] {
            PatternNode::Concat(concat) => assert_eq!(concat.children.len(), 2),
            other => panic!("expected concat node, got {other:?}"),
        },
        other => panic!("expected group node, got {other:?}"),
    }
}
