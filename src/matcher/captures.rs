use std::sync::Arc;

use smallvec::SmallVec;

use crate::types::{CaptureId, CaptureSpan};

pub(crate) type CaptureList = SmallVec<[CaptureSpan; 2]>;

/// Spans recorded for every capture group of one match.
///
/// Slots are indexed by capture id (0 is the whole-match group) and share
/// the automaton's name list. Spans within a slot appear in left-to-right
/// discovery order during the run, not sorted by position, so repeated
/// captures inside a loop keep their occurrence order.
#[derive(Debug, Clone)]
pub struct CaptureTable {
    names: Arc<[Arc<str>]>,
    slots: Vec<CaptureList>,
}

impl CaptureTable {
    pub(crate) fn new(names: Arc<[Arc<str>]>) -> Self {
        let slots = vec![CaptureList::new(); names.len()];
        Self { names, slots }
    }

    pub(crate) fn push(&mut self, id: CaptureId, span: CaptureSpan) {
        if let Some(slot) = self.slots.get_mut(id as usize) {
            slot.push(span);
        }
    }

    pub(crate) fn pop(&mut self, id: CaptureId) -> Option<CaptureSpan> {
        self.slots.get_mut(id as usize).and_then(|slot| slot.pop())
    }

    /// Spans of the group registered under `name`; empty when the group
    /// did not participate in the match.
    pub fn get(&self, name: &str) -> &[CaptureSpan] {
        self.names
            .iter()
            .position(|n| n.as_ref() == name)
            .map(|id| self.slots[id].as_slice())
            .unwrap_or(&[])
    }

    pub fn by_id(&self, id: CaptureId) -> &[CaptureSpan] {
        self.slots
            .get(id as usize)
            .map(|slot| slot.as_slice())
            .unwrap_or(&[])
    }

    pub fn name_of(&self, id: CaptureId) -> Option<&str> {
        self.names.get(id as usize).map(|name| name.as_ref())
    }

    pub fn group_count(&self) -> usize {
        self.names.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[CaptureSpan])> {
        self.names
            .iter()
            .zip(self.slots.iter())
            .map(|(name, slot)| (name.as_ref(), slot.as_slice()))
    }
}
