//! A regular-expression engine generalized to sequences of arbitrary typed
//! elements, where edge conditions are caller-supplied predicates instead of
//! character classes.
//!
//! A pattern string is parsed against a [`PredicateTable`] into a tree,
//! translated into an NFA with predicate-labeled edges, determinized into a
//! DFA, and the two are paired into an immutable [`CompiledAutomaton`]: the
//! DFA discovers match boundaries, the NFA is replayed over each discovered
//! span to recover capture groups.
//!
//! ```
//! use seqregex::{PredicateTable, SeqRegex};
//!
//! let table = PredicateTable::new();
//! table.insert_function("x", |c: &char| *c == 'x').unwrap();
//! table.insert_function("y", |c: &char| *c == 'y').unwrap();
//!
//! let re = SeqRegex::new("x+x+y+", &table).unwrap();
//! let input: Vec<char> = "xxxxyy".chars().collect();
//! let m = re.find(&input).unwrap();
//! assert_eq!((m.start(), m.len()), (0, 6));
//! ```

pub mod automaton;
pub mod errors;
pub mod matcher;
pub mod options;
pub mod pattern;
pub mod predicate;
pub mod types;

use std::sync::Arc;

use crate::pattern::RootNode;

pub use automaton::{Automaton, AutomatonError, CompiledAutomaton, Transition};
pub use errors::{EngineError, EngineResult};
pub use matcher::{CaptureTable, Match, MatchError, Matches, RunLimits};
pub use options::PatternOptions;
pub use pattern::{PatternError, PredicateTable, parse_pattern};
pub use predicate::Predicate;
pub use types::{CaptureId, CaptureSpan, StateId};

/// A compiled pattern over elements of type `T`.
///
/// Construction is the only mutable phase; the resulting automaton is held
/// behind an `Arc` and may be shared across threads. Every
/// [`matches`](SeqRegex::matches) call owns its own scan cursor and capture
/// tables, so concurrent scans never share mutable state. Cloning is cheap.
pub struct SeqRegex<T> {
    compiled: Arc<CompiledAutomaton<T>>,
    right_to_left: bool,
}

impl<T> SeqRegex<T> {
    /// Compiles `pattern` with default options, resolving predicate names
    /// through `table`.
    pub fn new(pattern: &str, table: &PredicateTable<T>) -> EngineResult<Self> {
        Self::with_options(pattern, table, PatternOptions::empty())
    }

    #[tracing::instrument(level = "trace", skip(table), fields(pattern = %pattern))]
    pub fn with_options(
        pattern: &str,
        table: &PredicateTable<T>,
        options: PatternOptions,
    ) -> EngineResult<Self> {
        let root = pattern::parse_pattern(pattern, table)?;
        Self::from_root(&root, options)
    }

    /// Compiles an externally built pattern tree.
    pub fn from_root(root: &RootNode<T>, options: PatternOptions) -> EngineResult<Self> {
        let compiled = automaton::compile(root, options)?;
        Ok(Self {
            compiled: Arc::new(compiled),
            right_to_left: options.contains(PatternOptions::RIGHT_TO_LEFT),
        })
    }

    /// Lazily scans `sequence` for non-overlapping matches in scan order.
    pub fn matches<'r, 't>(&'r self, sequence: &'t [T]) -> Matches<'r, 't, T> {
        self.matches_with(sequence, RunLimits::default())
    }

    /// Like [`matches`](SeqRegex::matches) with explicit resource bounds.
    pub fn matches_with<'r, 't>(
        &'r self,
        sequence: &'t [T],
        limits: RunLimits,
    ) -> Matches<'r, 't, T> {
        Matches::new(&self.compiled, sequence, self.right_to_left, limits)
    }

    pub fn is_match(&self, sequence: &[T]) -> bool {
        self.matches(sequence).next().is_some()
    }

    pub fn find<'t>(&self, sequence: &'t [T]) -> Option<Match<'t, T>> {
        self.matches(sequence).next()
    }

    pub fn compiled(&self) -> &Arc<CompiledAutomaton<T>> {
        &self.compiled
    }

    pub fn capture_names(&self) -> &[Arc<str>] {
        self.compiled.capture_names()
    }

    pub fn is_right_to_left(&self) -> bool {
        self.right_to_left
    }
}

impl<T> Clone for SeqRegex<T> {
    fn clone(&self) -> Self {
        Self {
            compiled: self.compiled.clone(),
            right_to_left: self.right_to_left,
        }
    }
}
