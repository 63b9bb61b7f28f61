use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::automaton::CompiledAutomaton;

use super::captures::CaptureTable;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MatchError {
    #[error("scan exceeded the configured step limit of {limit}")]
    StepLimit { limit: u64 },
}

/// Resource bounds for one scan. The step limit caps the total DFA-walk
/// and replay steps of a `matches()` call; pathological patterns can
/// otherwise exhibit superlinear runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunLimits {
    pub step_limit: Option<u64>,
}

impl RunLimits {
    pub fn steps(limit: u64) -> Self {
        Self {
            step_limit: Some(limit),
        }
    }
}

pub(crate) struct StepBudget {
    limit: u64,
    remaining: Option<u64>,
}

impl StepBudget {
    pub(crate) fn unlimited() -> Self {
        Self {
            limit: 0,
            remaining: None,
        }
    }

    pub(crate) fn from_limits(limits: RunLimits) -> Self {
        Self {
            limit: limits.step_limit.unwrap_or(0),
            remaining: limits.step_limit,
        }
    }

    pub(crate) fn consume(&mut self, steps: u64) -> Result<(), MatchError> {
        match self.remaining.as_mut() {
            None => Ok(()),
            Some(remaining) => {
                if *remaining < steps {
                    Err(MatchError::StepLimit { limit: self.limit })
                } else {
                    *remaining -= steps;
                    Ok(())
                }
            }
        }
    }
}

/// One successful automaton run over the input.
pub struct Match<'t, T> {
    start: usize,
    values: &'t [T],
    captures: CaptureTable,
}

impl<'t, T> Match<'t, T> {
    pub(crate) fn new(start: usize, values: &'t [T], captures: CaptureTable) -> Self {
        Self {
            start,
            values,
            captures,
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn end(&self) -> usize {
        self.start + self.values.len()
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }

    /// The matched slice of the input.
    pub fn values(&self) -> &'t [T] {
        self.values
    }

    pub fn captures(&self) -> &CaptureTable {
        &self.captures
    }

    pub fn into_captures(self) -> CaptureTable {
        self.captures
    }
}

impl<T: fmt::Debug> fmt::Debug for Match<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Match")
            .field("start", &self.start)
            .field("len", &self.values.len())
            .field("values", &self.values)
            .finish()
    }
}

/// Lazy sequence of non-overlapping matches, in scan order.
///
/// Forward scans report matches in strictly increasing start order;
/// right-to-left scans in decreasing order. A fresh call to
/// [`matches`](crate::SeqRegex::matches) restarts the scan. When a step
/// limit is exhausted the iterator fuses and [`Matches::error`] reports it.
pub struct Matches<'r, 't, T> {
    automaton: &'r CompiledAutomaton<T>,
    sequence: &'t [T],
    pos: usize,
    backward: bool,
    done: bool,
    budget: StepBudget,
    error: Option<MatchError>,
}

impl<'r, 't, T> Matches<'r, 't, T> {
    pub(crate) fn new(
        automaton: &'r CompiledAutomaton<T>,
        sequence: &'t [T],
        backward: bool,
        limits: RunLimits,
    ) -> Self {
        Self {
            automaton,
            sequence,
            pos: if backward { sequence.len() } else { 0 },
            backward,
            done: false,
            budget: StepBudget::from_limits(limits),
            error: None,
        }
    }

    /// The error that ended the scan early, if any.
    pub fn error(&self) -> Option<MatchError> {
        self.error
    }

    fn fail(&mut self, error: MatchError) {
        self.error = Some(error);
        self.done = true;
    }

    fn next_forward(&mut self) -> Option<Match<'t, T>> {
        let seq = self.sequence;
        while self.pos <= seq.len() {
            let at = self.pos;
            if self.automaton.exact_begin() && at != 0 {
                break;
            }
            let span = match self.automaton.try_run_span(
                seq,
                at,
                false,
                self.automaton.exact_end(),
                &mut self.budget,
            ) {
                Ok(span) => span,
                Err(error) => {
                    self.fail(error);
                    return None;
                }
            };
            match span {
                Some(len) => {
                    let mut table = CaptureTable::new(self.automaton.capture_names().clone());
                    match self.automaton.try_recover_captures(
                        seq,
                        at,
                        len,
                        false,
                        &mut table,
                        &mut self.budget,
                    ) {
                        Ok(recovered) => debug_assert!(recovered),
                        Err(error) => {
                            self.fail(error);
                            return None;
                        }
                    }
                    self.pos = if len == 0 { at + 1 } else { at + len };
                    return Some(Match::new(at, &seq[at..at + len], table));
                }
                None => self.pos += 1,
            }
        }
        self.done = true;
        None
    }

    fn next_backward(&mut self) -> Option<Match<'t, T>> {
        let seq = self.sequence;
        loop {
            let at = self.pos;
            if self.automaton.exact_end() && at != seq.len() {
                break;
            }
            let span = match self.automaton.try_run_span(
                seq,
                at,
                true,
                self.automaton.exact_begin(),
                &mut self.budget,
            ) {
                Ok(span) => span,
                Err(error) => {
                    self.fail(error);
                    return None;
                }
            };
            match span {
                Some(len) => {
                    let start = at - len;
                    let mut table = CaptureTable::new(self.automaton.capture_names().clone());
                    match self.automaton.try_recover_captures(
                        seq,
                        at,
                        len,
                        true,
                        &mut table,
                        &mut self.budget,
                    ) {
                        Ok(recovered) => debug_assert!(recovered),
                        Err(error) => {
                            self.fail(error);
                            return None;
                        }
                    }
                    if len == 0 {
                        if at == 0 {
                            self.done = true;
                        } else {
                            self.pos = at - 1;
                        }
                    } else {
                        self.pos = start;
                    }
                    return Some(Match::new(start, &seq[start..at], table));
                }
                None => {
                    if at == 0 {
                        break;
                    }
                    self.pos = at - 1;
                }
            }
        }
        self.done = true;
        None
    }
}

impl<'t, T> Iterator for Matches<'_, 't, T> {
    type Item = Match<'t, T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.backward {
            self.next_backward()
        } else {
            self.next_forward()
        }
    }
}
