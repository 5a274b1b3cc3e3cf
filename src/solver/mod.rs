//! Pieces shared by every solver: the wall-clock budget, the working and
//! best-known precedence sets, and the result contract.

mod budget;
mod outcome;
mod types;
mod workspace;

pub use budget::Budget;
pub use outcome::{SearchStatistics, SolveOutcome, TerminationReason};
pub use types::ScheduleSolver;

pub(crate) use workspace::Workspace;
