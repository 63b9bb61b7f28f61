use std::sync::Arc;

use crate::pattern::ast::{
    AlternationNode, AtomNode, ConcatNode, GroupNode, GroupQuantifier, PatternNode, RepeatBounds,
    RepeatNode, RootNode, SourceRange,
};
use crate::pattern::{PatternError, PatternResult, PredicateTable};
use crate::predicate::Predicate;

/// Parses a pattern string into the tree consumed by automaton
/// construction.
///
/// Syntax: `{name}` or a bare alphanumeric character references a predicate
/// from `table`; `.` is the built-in any-element predicate; `(...)` is an
/// auto-numbered capture group, `(?<name>...)` a named one, `(?:...)`
/// non-capturing; `(?=` `(?!` `(?<=` `(?<!` open lookarounds; `|`
/// alternation; `?` `*` `+` `{n}` `{n,}` `{n,m}` quantifiers with an
/// optional lazy `?` suffix; `^` and `$` anchor the pattern edges.
#[tracing::instrument(level = "trace", skip(table), fields(pattern = %pattern))]
pub fn parse_pattern<T>(pattern: &str, table: &PredicateTable<T>) -> PatternResult<RootNode<T>> {
    if pattern.is_empty() {
        return Err(PatternError::EmptyPattern);
    }

    let mut parser = PatternParser::new(pattern, table);

    let exact_begin = if parser.peek() == Some('^') {
        parser.next();
        true
    } else {
        false
    };

    let inner = parser.parse_alternation(None, 0)?;

    if let Some(ch) = parser.peek() {
        // Everything except a trailing '$' was consumed by the alternation.
        return Err(PatternError::UnexpectedCharacter {
            index: parser.current_byte_index(),
            found: ch,
        });
    }

    let range = SourceRange::new(0, pattern.len());
    let whole = PatternNode::Group(GroupNode::new(
        vec![inner],
        GroupQuantifier::Capture {
            name: parser.capture_names[0].clone(),
            id: 0,
        },
        range,
    ));

    Ok(RootNode {
        pattern: whole,
        exact_begin,
        exact_end: parser.exact_end,
        capture_names: parser.capture_names,
        range,
    })
}

struct PatternParser<'a, T> {
    pattern: &'a str,
    chars: Vec<(usize, char)>,
    index: usize,
    table: &'a PredicateTable<T>,
    capture_names: Vec<Arc<str>>,
    exact_end: bool,
}

impl<'a, T> PatternParser<'a, T> {
    fn new(pattern: &'a str, table: &'a PredicateTable<T>) -> Self {
        let chars: Vec<(usize, char)> = pattern.char_indices().collect();
        Self {
            pattern,
            chars,
            index: 0,
            table,
            capture_names: vec![Arc::from("0")],
            exact_end: false,
        }
    }

    fn parse_alternation(
        &mut self,
        terminator: Option<char>,
        start: usize,
    ) -> PatternResult<PatternNode<T>> {
        let branch_start = self.current_byte_index();
        let mut branches = vec![self.parse_sequence(terminator)?];
        while self.peek() == Some('|') {
            self.next();
            branches.push(self.parse_sequence(terminator)?);
        }

        if let Some(term) = terminator {
            if self.peek() != Some(term) {
                return Err(PatternError::UnterminatedGroup { start });
            }
            self.next();
        }

        if branches.len() == 1 {
            let only = branches.pop();
            return Ok(only.unwrap_or_else(|| unreachable!()));
        }
        let range = SourceRange::new(branch_start, self.current_byte_index());
        Ok(PatternNode::Alternation(AlternationNode::new(
            branches, range,
        )))
    }

    fn parse_sequence(&mut self, terminator: Option<char>) -> PatternResult<PatternNode<T>> {
        let mut nodes = Vec::new();
        let seq_start = self.current_byte_index();
        while let Some(ch) = self.peek() {
            if Some(ch) == terminator || ch == '|' {
                break;
            }
            match ch {
                ')' => {
                    return Err(PatternError::UnexpectedClosingParenthesis {
                        index: self.current_byte_index(),
                    });
                }
                '?' | '*' | '+' => {
                    return Err(PatternError::DanglingQuantifier {
                        index: self.current_byte_index(),
                        modifier: ch,
                    });
                }
                '^' => {
                    return Err(PatternError::AnchorNotAtEdge {
                        index: self.current_byte_index(),
                        anchor: '^',
                    });
                }
                '$' => {
                    if terminator.is_none() && self.index + 1 == self.chars.len() {
                        self.next();
                        self.exact_end = true;
                        break;
                    }
                    return Err(PatternError::AnchorNotAtEdge {
                        index: self.current_byte_index(),
                        anchor: '$',
                    });
                }
                '(' => {
                    let group = self.parse_group()?;
                    nodes.push(self.parse_quantified(group)?);
                }
                _ => {
                    let atom = self.parse_atom()?;
                    nodes.push(self.parse_quantified(atom)?);
                }
            }
        }

        let range = SourceRange::new(seq_start, self.current_byte_index());
        if nodes.len() == 1 {
            let only = nodes.pop();
            return Ok(only.unwrap_or_else(|| unreachable!()));
        }
        // Zero nodes is a legal empty branch (`^$`, `a|`): an empty concat
        // is wired as a bare epsilon by construction.
        Ok(PatternNode::Concat(ConcatNode::new(nodes, range)))
    }

    fn parse_atom(&mut self) -> PatternResult<PatternNode<T>> {
        let start = self.current_byte_index();
        let ch = match self.peek() {
            Some(ch) => ch,
            None => {
                return Err(PatternError::UnexpectedCharacter {
                    index: start,
                    found: '\0',
                });
            }
        };

        let predicate = match ch {
            '.' => {
                self.next();
                Predicate::any()
            }
            '{' => {
                let name = self.parse_braced_name()?;
                self.resolve(&name, start)?
            }
            _ if ch.is_ascii_alphanumeric() => {
                self.next();
                self.resolve(&ch.to_string(), start)?
            }
            _ => {
                return Err(PatternError::UnexpectedCharacter {
                    index: start,
                    found: ch,
                });
            }
        };

        let range = SourceRange::new(start, self.current_byte_index());
        Ok(PatternNode::Atom(AtomNode::new(predicate, range)))
    }

    fn parse_braced_name(&mut self) -> PatternResult<String> {
        let start = self.current_byte_index();
        self.expect('{');
        let mut name = String::new();
        loop {
            match self.peek() {
                Some('}') => {
                    self.next();
                    break;
                }
                Some(ch) if ch.is_ascii_alphanumeric() || ch == '_' => {
                    name.push(ch);
                    self.next();
                }
                Some(ch) => {
                    return Err(PatternError::UnexpectedCharacter {
                        index: self.current_byte_index(),
                        found: ch,
                    });
                }
                None => return Err(PatternError::UnterminatedName { start }),
            }
        }
        if name.is_empty() {
            return Err(PatternError::EmptyName { start });
        }
        Ok(name)
    }

    fn resolve(&self, name: &str, index: usize) -> PatternResult<Predicate<T>> {
        self.table
            .get(name)
            .ok_or_else(|| PatternError::UnknownPredicate {
                name: name.to_string(),
                index,
            })
    }

    fn parse_group(&mut self) -> PatternResult<PatternNode<T>> {
        let start = self.current_byte_index();
        self.expect('(');

        let quantifier = if self.peek() == Some('?') {
            self.next();
            match self.peek() {
                Some(':') => {
                    self.next();
                    None
                }
                Some('=') => {
                    self.next();
                    Some(GroupQuantifier::LookAround {
                        behind: false,
                        negative: false,
                    })
                }
                Some('!') => {
                    self.next();
                    Some(GroupQuantifier::LookAround {
                        behind: false,
                        negative: true,
                    })
                }
                Some('<') => {
                    self.next();
                    match self.peek() {
                        Some('=') => {
                            self.next();
                            Some(GroupQuantifier::LookAround {
                                behind: true,
                                negative: false,
                            })
                        }
                        Some('!') => {
                            self.next();
                            Some(GroupQuantifier::LookAround {
                                behind: true,
                                negative: true,
                            })
                        }
                        _ => {
                            let name = self.parse_capture_name()?;
                            Some(self.declare_capture(name)?)
                        }
                    }
                }
                _ => {
                    return Err(PatternError::InvalidGroupSyntax {
                        index: self.current_byte_index(),
                    });
                }
            }
        } else {
            let id = self.capture_names.len();
            let name: Arc<str> = Arc::from(id.to_string().as_str());
            Some(self.declare_capture(name)?)
        };

        let inner = self.parse_alternation(Some(')'), start)?;
        if let PatternNode::Concat(concat) = &inner
            && concat.children.is_empty()
        {
            return Err(PatternError::EmptyGroup { start });
        }

        match quantifier {
            Some(quantifier) => {
                let range = SourceRange::new(start, self.current_byte_index());
                Ok(PatternNode::Group(GroupNode::new(
                    vec![inner],
                    quantifier,
                    range,
                )))
            }
            // Non-capturing groups only delimit; no node of their own.
            None => Ok(inner),
        }
    }

    fn parse_capture_name(&mut self) -> PatternResult<Arc<str>> {
        let start = self.current_byte_index();
        let mut name = String::new();
        while let Some(ch) = self.peek() {
            if ch == '>' {
                break;
            }
            if ch.is_ascii_alphanumeric() || ch == '_' {
                name.push(ch);
                self.next();
            } else {
                return Err(PatternError::InvalidCaptureName { index: start });
            }
        }
        if self.peek() != Some('>') {
            return Err(PatternError::InvalidCaptureName { index: start });
        }
        self.next();
        if name.is_empty() || name.as_bytes()[0].is_ascii_digit() {
            return Err(PatternError::InvalidCaptureName { index: start });
        }
        Ok(Arc::from(name.as_str()))
    }

    fn declare_capture(&mut self, name: Arc<str>) -> PatternResult<GroupQuantifier> {
        if self.capture_names.iter().any(|n| *n == name) {
            return Err(PatternError::DuplicateCaptureName {
                name: name.to_string(),
            });
        }
        let id = self.capture_names.len() as u16;
        self.capture_names.push(name.clone());
        Ok(GroupQuantifier::Capture { name, id })
    }

    fn parse_quantified(&mut self, node: PatternNode<T>) -> PatternResult<PatternNode<T>> {
        let start = node.range().start;
        let bounds = match self.peek() {
            Some('?') => {
                self.next();
                Some(RepeatBounds::new(0, Some(1)))
            }
            Some('*') => {
                self.next();
                Some(RepeatBounds::new(0, None))
            }
            Some('+') => {
                self.next();
                Some(RepeatBounds::new(1, None))
            }
            Some('{') if self.peek_ahead(1).is_some_and(|ch| ch.is_ascii_digit()) => {
                Some(self.parse_bounds()?)
            }
            _ => None,
        };

        let Some(bounds) = bounds else {
            return Ok(node);
        };

        let lazy = if self.peek() == Some('?') {
            self.next();
            true
        } else {
            false
        };

        let range = SourceRange::new(start, self.current_byte_index());
        Ok(PatternNode::Repeat(RepeatNode::new(
            node, bounds, lazy, range,
        )))
    }

    fn parse_bounds(&mut self) -> PatternResult<RepeatBounds> {
        let start = self.current_byte_index();
        self.expect('{');
        let min = self.parse_number(start)?;
        let bounds = match self.peek() {
            Some('}') => {
                self.next();
                RepeatBounds::exactly(min)
            }
            Some(',') => {
                self.next();
                match self.peek() {
                    Some('}') => {
                        self.next();
                        RepeatBounds::new(min, None)
                    }
                    Some(ch) if ch.is_ascii_digit() => {
                        let max = self.parse_number(start)?;
                        if self.peek() != Some('}') {
                            return Err(PatternError::MalformedBounds { start });
                        }
                        self.next();
                        if min > max {
                            return Err(PatternError::QuantifierBounds {
                                min,
                                max,
                                index: start,
                            });
                        }
                        RepeatBounds::new(min, Some(max))
                    }
                    _ => return Err(PatternError::MalformedBounds { start }),
                }
            }
            _ => return Err(PatternError::MalformedBounds { start }),
        };
        Ok(bounds)
    }

    fn parse_number(&mut self, bounds_start: usize) -> PatternResult<u32> {
        let mut value: u32 = 0;
        let mut seen = false;
        while let Some(ch) = self.peek() {
            let Some(digit) = ch.to_digit(10) else {
                break;
            };
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(digit))
                .ok_or(PatternError::MalformedBounds {
                    start: bounds_start,
                })?;
            seen = true;
            self.next();
        }
        if !seen {
            return Err(PatternError::MalformedBounds {
                start: bounds_start,
            });
        }
        Ok(value)
    }

    fn expect(&mut self, expected: char) {
        let actual = self.next();
        debug_assert_eq!(Some(expected), actual);
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.index).map(|(_, ch)| *ch)
    }

    fn peek_ahead(&self, offset: usize) -> Option<char> {
        self.chars.get(self.index + offset).map(|(_, ch)| *ch)
    }

    fn next(&mut self) -> Option<char> {
        let ch = self.peek();
        if ch.is_some() {
            self.index += 1;
        }
        ch
    }

    fn current_byte_index(&self) -> usize {
        self.chars
            .get(self.index)
            .map(|(idx, _)| *idx)
            .unwrap_or(self.pattern.len())
    }
}
