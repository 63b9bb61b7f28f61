use crate::automaton::AutomatonError;
use crate::pattern::PatternError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Pattern(#[from] PatternError),
    #[error(transparent)]
    Automaton(#[from] AutomatonError),
}

pub type EngineResult<T> = Result<T, EngineError>;
