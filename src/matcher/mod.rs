mod captures;
mod matches;

pub use captures::CaptureTable;
pub use matches::{Match, MatchError, Matches, RunLimits};

pub(crate) use matches::StepBudget;
