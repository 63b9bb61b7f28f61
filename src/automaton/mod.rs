mod builder;
mod compiled;
mod error;
mod nfa;
mod operator;
mod transition;

pub use builder::{build_nfa, compile};
pub use compiled::{CompiledAutomaton, CompiledEdge, CoreAutomaton};
pub use error::{AutomatonError, AutomatonResult};
pub use nfa::Automaton;
pub use operator::{determinize, reverse};
pub use transition::Transition;
