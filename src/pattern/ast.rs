use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::predicate::Predicate;
use crate::types::CaptureId;

/// Byte range of a node in the pattern source, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRange {
    pub start: usize,
    pub end: usize,
}

impl SourceRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Repetition bounds; `max == None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepeatBounds {
    pub min: u32,
    pub max: Option<u32>,
}

impl RepeatBounds {
    pub fn new(min: u32, max: Option<u32>) -> Self {
        Self { min, max }
    }

    pub fn exactly(count: u32) -> Self {
        Self {
            min: count,
            max: Some(count),
        }
    }
}

/// One node of the pattern tree consumed by automaton construction.
pub enum PatternNode<T> {
    Atom(AtomNode<T>),
    Concat(ConcatNode<T>),
    Alternation(AlternationNode<T>),
    Repeat(RepeatNode<T>),
    Group(GroupNode<T>),
}

pub struct AtomNode<T> {
    pub predicate: Predicate<T>,
    pub range: SourceRange,
}

pub struct ConcatNode<T> {
    pub children: Vec<PatternNode<T>>,
    pub range: SourceRange,
}

pub struct AlternationNode<T> {
    pub children: Vec<PatternNode<T>>,
    pub range: SourceRange,
}

pub struct RepeatNode<T> {
    pub child: Box<PatternNode<T>>,
    pub bounds: RepeatBounds,
    pub lazy: bool,
    pub range: SourceRange,
}

pub struct GroupNode<T> {
    pub children: Vec<PatternNode<T>>,
    pub quantifier: GroupQuantifier,
    pub range: SourceRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupQuantifier {
    Capture { name: Arc<str>, id: CaptureId },
    LookAround { behind: bool, negative: bool },
}

/// Root of a pattern tree: the inner pattern plus anchor flags and the
/// ordered capture-group names (index 0 is the whole-match group).
pub struct RootNode<T> {
    pub pattern: PatternNode<T>,
    pub exact_begin: bool,
    pub exact_end: bool,
    pub capture_names: Vec<Arc<str>>,
    pub range: SourceRange,
}

impl<T> AtomNode<T> {
    pub fn new(predicate: Predicate<T>, range: SourceRange) -> Self {
        Self { predicate, range }
    }
}

impl<T> ConcatNode<T> {
    pub fn new(children: Vec<PatternNode<T>>, range: SourceRange) -> Self {
        Self { children, range }
    }
}

impl<T> AlternationNode<T> {
    pub fn new(children: Vec<PatternNode<T>>, range: SourceRange) -> Self {
        Self { children, range }
    }
}

impl<T> RepeatNode<T> {
    pub fn new(child: PatternNode<T>, bounds: RepeatBounds, lazy: bool, range: SourceRange) -> Self {
        Self {
            child: Box::new(child),
            bounds,
            lazy,
            range,
        }
    }
}

impl<T> GroupNode<T> {
    pub fn new(
        children: Vec<PatternNode<T>>,
        quantifier: GroupQuantifier,
        range: SourceRange,
    ) -> Self {
        Self {
            children,
            quantifier,
            range,
        }
    }
}

impl<T> PatternNode<T> {
    pub fn range(&self) -> SourceRange {
        match self {
            PatternNode::Atom(n) => n.range,
            PatternNode::Concat(n) => n.range,
            PatternNode::Alternation(n) => n.range,
            PatternNode::Repeat(n) => n.range,
            PatternNode::Group(n) => n.range,
        }
    }
}

// Manual impls; derives would bound `T` even though only `Predicate<T>`
// ever carries the type parameter.

impl<T> Clone for PatternNode<T> {
    fn clone(&self) -> Self {
        match self {
            PatternNode::Atom(n) => PatternNode::Atom(AtomNode {
                predicate: n.predicate.clone(),
                range: n.range,
            }),
            PatternNode::Concat(n) => PatternNode::Concat(ConcatNode {
                children: n.children.clone(),
                range: n.range,
            }),
            PatternNode::Alternation(n) => PatternNode::Alternation(AlternationNode {
                children: n.children.clone(),
                range: n.range,
            }),
            PatternNode::Repeat(n) => PatternNode::Repeat(RepeatNode {
                child: n.child.clone(),
                bounds: n.bounds,
                lazy: n.lazy,
                range: n.range,
            }),
            PatternNode::Group(n) => PatternNode::Group(GroupNode {
                children: n.children.clone(),
                quantifier: n.quantifier.clone(),
                range: n.range,
            }),
        }
    }
}

impl<T> fmt::Debug for PatternNode<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternNode::Atom(n) => f
                .debug_struct("Atom")
                .field("predicate", &n.predicate)
                .finish(),
            PatternNode::Concat(n) => f
                .debug_struct("Concat")
                .field("children", &n.children)
                .finish(),
            PatternNode::Alternation(n) => f
                .debug_struct("Alternation")
                .field("children", &n.children)
                .finish(),
            PatternNode::Repeat(n) => f
                .debug_struct("Repeat")
                .field("bounds", &n.bounds)
                .field("lazy", &n.lazy)
                .field("child", &n.child)
                .finish(),
            PatternNode::Group(n) => f
                .debug_struct("Group")
                .field("quantifier", &n.quantifier)
                .field("children", &n.children)
                .finish(),
        }
    }
}

impl<T> Clone for RootNode<T> {
    fn clone(&self) -> Self {
        Self {
            pattern: self.pattern.clone(),
            exact_begin: self.exact_begin,
            exact_end: self.exact_end,
            capture_names: self.capture_names.clone(),
            range: self.range,
        }
    }
}

impl<T> fmt::Debug for RootNode<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Root")
            .field("exact_begin", &self.exact_begin)
            .field("exact_end", &self.exact_end)
            .field("capture_names", &self.capture_names)
            .field("pattern", &self.pattern)
            .finish()
    }
}
