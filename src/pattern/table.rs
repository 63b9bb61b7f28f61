use std::sync::Arc;

use hashbrown::HashMap as FastHashMap;
use parking_lot::RwLock;

use crate::predicate::Predicate;

use super::{PatternError, PatternResult};

/// Maps pattern-level symbolic names to user predicates.
///
/// Function predicates are interned with a stable numeric id at
/// registration time; `get` always hands back a clone of the registered
/// instance, so every occurrence of a symbol in a pattern shares the same
/// alphabet identity. Without that sharing, determinization would
/// over-partition the alphabet.
pub struct PredicateTable<T> {
    inner: RwLock<TableInner<T>>,
}

struct TableInner<T> {
    map: FastHashMap<Box<str>, Predicate<T>>,
    next_id: u32,
}

impl<T> PredicateTable<T> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(TableInner {
                map: FastHashMap::new(),
                // id 0 is reserved for the built-in any-element predicate
                next_id: 1,
            }),
        }
    }

    /// Registers a boolean test over one element under `name`.
    pub fn insert_function(
        &self,
        name: &str,
        func: impl Fn(&T) -> bool + Send + Sync + 'static,
    ) -> PatternResult<()> {
        let mut inner = self.inner.write();
        if inner.map.contains_key(name) {
            return Err(PatternError::DuplicatePredicate {
                name: name.to_string(),
            });
        }
        let id = inner.next_id;
        inner.next_id += 1;
        let predicate = Predicate::function(Arc::from(name), id, Arc::new(func));
        inner.map.insert(name.into(), predicate);
        Ok(())
    }

    /// Registers an equality test against a literal value, compared with
    /// `PartialEq`.
    pub fn insert_compare(&self, name: &str, value: T) -> PatternResult<()>
    where
        T: PartialEq,
    {
        self.insert_compare_with(name, value, |a, b| a == b)
    }

    /// Registers an equality test against a literal value using a custom
    /// comparer.
    pub fn insert_compare_with(
        &self,
        name: &str,
        value: T,
        comparer: impl Fn(&T, &T) -> bool + Send + Sync + 'static,
    ) -> PatternResult<()> {
        let mut inner = self.inner.write();
        if inner.map.contains_key(name) {
            return Err(PatternError::DuplicatePredicate {
                name: name.to_string(),
            });
        }
        let predicate = Predicate::compare(Arc::from(name), Arc::new(value), Arc::new(comparer));
        inner.map.insert(name.into(), predicate);
        Ok(())
    }

    /// Looks up a registered predicate by name. The returned clone shares
    /// the registered instance's identity.
    pub fn get(&self, name: &str) -> Option<Predicate<T>> {
        self.inner.read().map.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.read().map.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.inner.read().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().map.is_empty()
    }
}

impl<T> Default for PredicateTable<T> {
    fn default() -> Self {
        Self::new()
    }
}
