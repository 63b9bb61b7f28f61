use std::fmt;

use crate::predicate::Predicate;
use crate::types::StateId;

/// One predicate-labeled edge of the automaton graph.
pub struct Transition<T> {
    pub from: StateId,
    pub predicate: Predicate<T>,
    pub to: StateId,
}

impl<T> Transition<T> {
    pub fn new(from: StateId, predicate: Predicate<T>, to: StateId) -> Self {
        Self {
            from,
            predicate,
            to,
        }
    }
}

impl<T> Clone for Transition<T> {
    fn clone(&self) -> Self {
        Self {
            from: self.from,
            predicate: self.predicate.clone(),
            to: self.to,
        }
    }
}

impl<T> PartialEq for Transition<T> {
    fn eq(&self, other: &Self) -> bool {
        self.from == other.from
            && self.to == other.to
            && self.predicate.same_symbol(&other.predicate)
    }
}

impl<T> fmt::Debug for Transition<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} --{}--> {}", self.from, self.predicate.name(), self.to)
    }
}
