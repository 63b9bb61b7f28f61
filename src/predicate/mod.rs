use std::fmt;
use std::sync::Arc;

use crate::automaton::CompiledAutomaton;
use crate::types::CaptureId;

/// Interned id of the built-in any-element predicate; user predicates
/// registered through a table start at 1.
pub(crate) const ANY_PREDICATE_ID: u32 = 0;

/// An edge condition of the automaton.
///
/// Function and compare predicates consume one element when they match.
/// System predicates are zero-width structural markers and never match a
/// real element. Complex predicates wrap a fully compiled sub-automaton
/// (lookaround) and are zero-width as well.
pub enum Predicate<T> {
    Function(FunctionPredicate<T>),
    Compare(ComparePredicate<T>),
    System(SystemPredicate),
    Complex(ComplexPredicate<T>),
}

pub struct FunctionPredicate<T> {
    name: Arc<str>,
    id: u32,
    func: Arc<dyn Fn(&T) -> bool + Send + Sync>,
}

pub struct ComparePredicate<T> {
    name: Arc<str>,
    value: Arc<T>,
    comparer: Arc<dyn Fn(&T, &T) -> bool + Send + Sync>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SystemPredicate {
    /// The structural no-op transition used for NFA wiring. The only
    /// predicate classified as epsilon.
    Epsilon,
    /// A zero-width marker bracketing one side of a capture group span.
    Capture(CaptureMarker),
}

#[derive(Debug, Clone)]
pub struct CaptureMarker {
    name: Arc<str>,
    capture_id: CaptureId,
    marker: u32,
    unique: bool,
}

pub struct ComplexPredicate<T> {
    automaton: Arc<CompiledAutomaton<T>>,
    negative: bool,
    behind: bool,
}

impl<T> Predicate<T> {
    /// The built-in any-element predicate (`.` in pattern syntax). Every
    /// instance shares one interned id, so all occurrences are the same
    /// alphabet symbol.
    pub fn any() -> Self {
        Predicate::Function(FunctionPredicate {
            name: Arc::from("."),
            id: ANY_PREDICATE_ID,
            func: Arc::new(|_| true),
        })
    }

    pub(crate) fn function(
        name: Arc<str>,
        id: u32,
        func: Arc<dyn Fn(&T) -> bool + Send + Sync>,
    ) -> Self {
        Predicate::Function(FunctionPredicate { name, id, func })
    }

    pub(crate) fn compare(
        name: Arc<str>,
        value: Arc<T>,
        comparer: Arc<dyn Fn(&T, &T) -> bool + Send + Sync>,
    ) -> Self {
        Predicate::Compare(ComparePredicate {
            name,
            value,
            comparer,
        })
    }

    pub(crate) fn epsilon() -> Self {
        Predicate::System(SystemPredicate::Epsilon)
    }

    pub(crate) fn capture_marker(
        name: Arc<str>,
        capture_id: CaptureId,
        marker: u32,
        unique: bool,
    ) -> Self {
        Predicate::System(SystemPredicate::Capture(CaptureMarker {
            name,
            capture_id,
            marker,
            unique,
        }))
    }

    pub(crate) fn complex(
        automaton: Arc<CompiledAutomaton<T>>,
        negative: bool,
        behind: bool,
    ) -> Self {
        Predicate::Complex(ComplexPredicate {
            automaton,
            negative,
            behind,
        })
    }

    /// Whether this predicate accepts the given element. System and complex
    /// predicates never match a real element; complex predicates are
    /// evaluated positionally via [`ComplexPredicate::is_match_at`].
    pub fn is_match(&self, element: &T) -> bool {
        match self {
            Predicate::Function(p) => (p.func)(element),
            Predicate::Compare(p) => (p.comparer)(p.value.as_ref(), element),
            Predicate::System(_) => false,
            Predicate::Complex(_) => false,
        }
    }

    /// True iff this is the epsilon system predicate.
    pub fn is_epsilon(&self) -> bool {
        matches!(self, Predicate::System(SystemPredicate::Epsilon))
    }

    /// True for transitions that consume no input: epsilon wiring and
    /// capture markers. Zero-width edges are traversed by closure during
    /// determinization and never label DFA transitions.
    pub fn is_zero_width(&self) -> bool {
        matches!(self, Predicate::System(_))
    }

    /// Alphabet-symbol equality used by determinization.
    ///
    /// Function predicates compare by interned id, compare predicates by
    /// symbolic name, complex predicates by sub-automaton identity. Unique
    /// capture markers equal only themselves; non-unique markers compare by
    /// name. Never used to match input elements.
    pub fn same_symbol(&self, other: &Self) -> bool {
        match (self, other) {
            (Predicate::Function(a), Predicate::Function(b)) => a.id == b.id,
            (Predicate::Compare(a), Predicate::Compare(b)) => a.name == b.name,
            (Predicate::System(a), Predicate::System(b)) => match (a, b) {
                (SystemPredicate::Epsilon, SystemPredicate::Epsilon) => true,
                (SystemPredicate::Capture(a), SystemPredicate::Capture(b)) => {
                    if a.unique || b.unique {
                        a.marker == b.marker
                    } else {
                        a.name == b.name
                    }
                }
                _ => false,
            },
            (Predicate::Complex(a), Predicate::Complex(b)) => {
                Arc::ptr_eq(&a.automaton, &b.automaton)
                    && a.negative == b.negative
                    && a.behind == b.behind
            }
            _ => false,
        }
    }

    /// Display name of the symbol, for diagnostics.
    pub fn name(&self) -> &str {
        match self {
            Predicate::Function(p) => &p.name,
            Predicate::Compare(p) => &p.name,
            Predicate::System(SystemPredicate::Epsilon) => "#epsilon",
            Predicate::System(SystemPredicate::Capture(_)) => "#capture",
            Predicate::Complex(_) => "#look",
        }
    }
}

impl CaptureMarker {
    pub fn name(&self) -> &Arc<str> {
        &self.name
    }

    pub fn capture_id(&self) -> CaptureId {
        self.capture_id
    }

    /// Identity of the capture site; both bracket edges of one group share
    /// the same marker value.
    pub fn marker(&self) -> u32 {
        self.marker
    }
}

impl PartialEq for CaptureMarker {
    fn eq(&self, other: &Self) -> bool {
        if self.unique || other.unique {
            self.marker == other.marker
        } else {
            self.name == other.name
        }
    }
}

impl Eq for CaptureMarker {}

impl<T> ComplexPredicate<T> {
    /// Evaluates the lookaround at `at` without consuming input: runs the
    /// nested compiled automaton anchored at the current position (backwards
    /// for lookbehind) and applies negation.
    pub fn is_match_at(&self, sequence: &[T], at: usize) -> bool {
        let hit = self
            .automaton
            .run_span(sequence, at, self.behind, false)
            .is_some();
        hit != self.negative
    }

    pub fn automaton(&self) -> &Arc<CompiledAutomaton<T>> {
        &self.automaton
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn is_behind(&self) -> bool {
        self.behind
    }
}

// Manual impls: derives would demand `T: Clone`/`T: Debug`, but every
// type-dependent field is behind an `Arc`.

impl<T> Clone for Predicate<T> {
    fn clone(&self) -> Self {
        match self {
            Predicate::Function(p) => Predicate::Function(FunctionPredicate {
                name: p.name.clone(),
                id: p.id,
                func: p.func.clone(),
            }),
            Predicate::Compare(p) => Predicate::Compare(ComparePredicate {
                name: p.name.clone(),
                value: p.value.clone(),
                comparer: p.comparer.clone(),
            }),
            Predicate::System(p) => Predicate::System(p.clone()),
            Predicate::Complex(p) => Predicate::Complex(ComplexPredicate {
                automaton: p.automaton.clone(),
                negative: p.negative,
                behind: p.behind,
            }),
        }
    }
}

impl<T> fmt::Debug for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Function(p) => f
                .debug_struct("Function")
                .field("name", &p.name)
                .field("id", &p.id)
                .finish(),
            Predicate::Compare(p) => f.debug_struct("Compare").field("name", &p.name).finish(),
            Predicate::System(p) => f.debug_tuple("System").field(p).finish(),
            Predicate::Complex(p) => f
                .debug_struct("Complex")
                .field("negative", &p.negative)
                .field("behind", &p.behind)
                .finish(),
        }
    }
}
