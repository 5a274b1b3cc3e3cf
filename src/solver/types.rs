//! Common interface of the search strategies.

use super::outcome::SolveOutcome;
use crate::engine::PropagationEngine;
use crate::error::SearchError;
use crate::model::Project;

/// A search strategy that repairs capacity violations of `project` by
/// posting precedences to `engine`.
///
/// A solver value carries its configuration and is meant to be used for one
/// solve request. When `solve` returns `Ok`, the engine holds exactly the
/// precedences listed in the outcome's solution.
pub trait ScheduleSolver {
    /// Short name used in logs and result files.
    fn name(&self) -> &'static str;

    /// Runs the search until it terminates or the budget runs out.
    fn solve<E: PropagationEngine>(
        &mut self,
        engine: &mut E,
        project: &Project,
    ) -> Result<SolveOutcome, SearchError>;
}
