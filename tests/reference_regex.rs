//! Cross-checks scan results against the `regex` crate on ASCII inputs,
//! where byte offsets and element indices coincide. Patterns are restricted
//! to constructs where leftmost-longest and leftmost-first semantics agree.

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

fn engine_spans(pattern: &str, text: &str) -> Vec<(usize, usize)> {
    let table = char_table();
    let re = SeqRegex::new(pattern, &table).expect("pattern should compile");
    let input: Vec<char> = text.chars().collect();
    re.matches(&input)
        .map(|m| (m.start(), m.start() + m.len()))
        .collect()
}

fn reference_spans(pattern: &str, text: &str) -> Vec<(usize, usize)> {
    let re = regex::Regex::new(pattern).expect("reference pattern should compile");
    re.find_iter(text).map(|m| (m.start(), m.end())).collect()
}

#[test]
fn plain_concatenation_agrees_with_reference() {
    for text in ["xyzxy", "xy", "", "zzxyxy"] {
        assert_eq!(engine_spans("xy", text), reference_spans("xy", text), "{text:?}");
    }
}

#[test]
fn greedy_quantifiers_agree_with_reference() {
    for (pattern, reference) in [("x+y", "x+y"), ("xy*", "xy*"), ("x{2,3}", "x{2,3}")] {
        for text in ["xxxyy", "xyxyx", "xxxxx", "yxxy", "x"] {
            assert_eq!(
                engine_spans(pattern, text),
                reference_spans(reference, text),
                "pattern {pattern} on {text:?}"
            );
        }
    }
}

#[test]
fn grouped_repetition_agrees_with_reference() {
    for text in ["xyxy", "xyxyxy", "xxy", "yxy"] {
        assert_eq!(
            engine_spans("(?:xy)+", text),
            reference_spans("(?:xy)+", text),
            "{text:?}"
        );
    }
}

#[test]
fn anchored_patterns_agree_with_reference() {
    for text in ["xxy", "xy", "yxx", "xyx"] {
        assert_eq!(
            engine_spans("^x+y$", text),
            reference_spans("^x+y$", text),
            "{text:?}"
        );
    }
}

#[test]
fn optional_elements_agree_with_reference() {
    for text in ["xz", "xyz", "xyyz", "z"] {
        assert_eq!(
            engine_spans("xy?z", text),
            reference_spans("xy?z", text),
            "{text:?}"
        );
    }
}

#[test]
fn named_captures_agree_with_reference() {
    let table = char_table();
    let re = SeqRegex::new("x(?<mid>y+)z", &table).expect("pattern should compile");
    let reference = regex::Regex::new("x(?<mid>y+)z").expect("reference should compile");

    for text in ["xyyz", "zxyzz", "xyz"] {
        let input: Vec<char> = text.chars().collect();
        let ours: Vec<(usize, usize)> = re
            .matches(&input)
            .map(|m| {
                let span = m.captures().get("mid")[0];
                (span.0, span.0 + span.1)
            })
            .collect();
        let theirs: Vec<(usize, usize)> = reference
            .captures_iter(text)
            .map(|caps| {
                let g = caps.name("mid").expect("group should participate");
                (g.start(), g.end())
            })
            .collect();
        assert_eq!(ours, theirs, "{text:?}");
    }
}
