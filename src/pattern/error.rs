use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatternError {
    #[error("pattern is empty")]
    EmptyPattern,
    #[error("pattern references unknown predicate '{name}' at byte {index}")]
    UnknownPredicate { name: String, index: usize },
    #[error("predicate '{name}' is already registered")]
    DuplicatePredicate { name: String },
    #[error("capture group name '{name}' is used more than once")]
    DuplicateCaptureName { name: String },
    #[error("unexpected character '{found}' at byte {index}")]
    UnexpectedCharacter { index: usize, found: char },
    #[error("unexpected ')' at byte {index}")]
    UnexpectedClosingParenthesis { index: usize },
    #[error("group opened at byte {start} is never closed")]
    UnterminatedGroup { start: usize },
    #[error("group opened at byte {start} is empty")]
    EmptyGroup { start: usize },
    #[error("quantifier '{modifier}' at byte {index} has nothing to repeat")]
    DanglingQuantifier { index: usize, modifier: char },
    #[error("predicate reference opened at byte {start} is never closed")]
    UnterminatedName { start: usize },
    #[error("predicate reference at byte {start} has an empty name")]
    EmptyName { start: usize },
    #[error("repetition bounds opened at byte {start} are malformed")]
    MalformedBounds { start: usize },
    #[error("repetition bounds {{{min},{max}}} at byte {index} are inverted")]
    QuantifierBounds { min: u32, max: u32, index: usize },
    #[error("anchor '{anchor}' at byte {index} is only allowed at the pattern edge")]
    AnchorNotAtEdge { index: usize, anchor: char },
    #[error("malformed group prefix at byte {index}")]
    InvalidGroupSyntax { index: usize },
    #[error("capture group name at byte {index} is invalid")]
    InvalidCaptureName { index: usize },
}

pub type PatternResult<T> = Result<T, PatternError>;
