use seqregex::{PredicateTable, SeqRegex};

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

fn chars(text: &str) -> Vec<char> {
    text.chars().collect()
}

fn spans(re: &SeqRegex<char>, text: &str) -> Vec<(usize, usize)> {
    let input = chars(text);
    re.matches(&input).map(|m| (m.start(), m.len())).collect()
}

#[test]
fn lookahead_filters_without_consuming() {
    let table = char_table();
    let re = SeqRegex::new("x(?=y)", &table).expect("pattern should compile");
    // Only the x at 0 is followed by y; the match stays one element long.
    assert_eq!(spans(&re, "xyxx"), vec![(0, 1)]);
}

#[test]
fn negative_lookahead_is_the_complement() {
    let table = char_table();
    let positive = SeqRegex::new("x(?=y)", &table).expect("pattern should compile");
    let negative = SeqRegex::new("x(?!y)", &table).expect("pattern should compile");

    for text in ["xyxx", "xxxy", "x", "yxyxy"] {
        let input = chars(text);
        let pos: Vec<usize> = positive.matches(&input).map(|m| m.start()).collect();
        let neg: Vec<usize> = negative.matches(&input).map(|m| m.start()).collect();
        for (i, ch) in input.iter().enumerate() {
            if *ch == 'x' {
                assert_ne!(
                    pos.contains(&i),
                    neg.contains(&i),
                    "position {i} in {text:?}"
                );
            }
        }
    }
}

#[test]
fn lookahead_at_input_end_sees_no_elements() {
    let table = char_table();
    let re = SeqRegex::new("x(?!y)", &table).expect("pattern should compile");
    // The trailing x has nothing after it, so the negative lookahead holds.
    assert_eq!(spans(&re, "xyx"), vec![(2, 1)]);
}

#[test]
fn lookbehind_checks_the_preceding_span() {
    let table = char_table();
    let re = SeqRegex::new("(?<=x)y", &table).expect("pattern should compile");
    assert_eq!(spans(&re, "xyzy"), vec![(1, 1)]);
}

#[test]
fn negative_lookbehind_matches_at_input_start() {
    let table = char_table();
    let re = SeqRegex::new("(?<!x)y", &table).expect("pattern should compile");
    // y at 0 has no predecessor, y at 3 is preceded by z.
    assert_eq!(spans(&re, "yxyzy"), vec![(0, 1), (4, 1)]);
}

#[test]
fn lookaround_never_contributes_length() {
    let table = char_table();
    let plain = SeqRegex::new("xy", &table).expect("pattern should compile");
    let ahead = SeqRegex::new("x(?=y)y", &table).expect("pattern should compile");
    let behind = SeqRegex::new("x(?<=x)y", &table).expect("pattern should compile");

    for text in ["xy", "zxyz", "xyxy"] {
        assert_eq!(spans(&plain, text), spans(&ahead, text), "{text:?}");
        assert_eq!(spans(&plain, text), spans(&behind, text), "{text:?}");
    }
}

#[test]
fn lookbehind_spans_longer_than_one_element() {
    let table = char_table();
    let re = SeqRegex::new("(?<=xx)y", &table).expect("pattern should compile");
    assert_eq!(spans(&re, "xxy"), vec![(2, 1)]);
    assert_eq!(spans(&re, "xy"), vec![]);
    assert_eq!(spans(&re, "zxy"), vec![]);
}

#[test]
fn lookahead_body_may_use_repetition() {
    let table = char_table();
    let re = SeqRegex::new("x(?=y+z)", &table).expect("pattern should compile");
    assert_eq!(spans(&re, "xyyz"), vec![(0, 1)]);
    assert_eq!(spans(&re, "xyy"), vec![]);
}

#[test]
fn captures_inside_lookaround_stay_local() {
    let table = char_table();
    // The lookahead body is its own automaton; the outer match exposes
    // only its own groups.
    let re = SeqRegex::new("x(?=(y))", &table).expect("pattern should compile");
    let input = chars("xy");
    let m = re.find(&input).expect("match should exist");
    assert_eq!((m.start(), m.len()), (0, 1));
    assert_eq!(m.captures().get("1"), &[] as &[(usize, usize)]);
}
