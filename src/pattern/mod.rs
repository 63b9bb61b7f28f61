pub mod ast;
mod error;
mod parser;
mod table;

pub use ast::{
    AlternationNode, AtomNode, ConcatNode, GroupNode, GroupQuantifier, PatternNode, RepeatBounds,
    RepeatNode, RootNode, SourceRange,
};
pub use error::{PatternError, PatternResult};
pub use parser::parse_pattern;
pub use table::PredicateTable;
