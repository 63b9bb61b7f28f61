use thiserror::Error;

/// Construction invariant violations. These indicate a defect in the
/// construction algorithm rather than bad user input, and abort the build
/// instead of producing a silently incorrect automaton.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AutomatonError {
    #[error("transition references unallocated state {state} (automaton '{name}' has {count} states)")]
    StateOutOfRange {
        name: String,
        state: u32,
        count: u32,
    },
    #[error("automaton '{name}' has no start states after construction")]
    EmptyStartSet { name: String },
    #[error("automaton '{name}' has no final states after construction")]
    EmptyFinalSet { name: String },
}

pub type AutomatonResult<T> = Result<T, AutomatonError>;
