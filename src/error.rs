//! Errors surfaced by the search core.
//!
//! Transient infeasibility, exhaustion and timeouts are not errors: they are
//! handled inside the solvers and reported through
//! [`TerminationReason`](crate::solver::TerminationReason). Only invalid
//! inputs and broken internal contracts end up here.

use thiserror::Error;

use crate::engine::ResourceId;

/// Failure of a solve request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// A project needs at least one activity; the last one is the terminal
    /// activity whose end time defines the makespan.
    #[error("project has no activities")]
    EmptyProject,

    /// A solver configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A decision point was asked to undo a choice it never executed.
    #[error("undo requested on decision point {resource}@{time} with no executed choice")]
    UndoWithoutChoice { resource: ResourceId, time: i64 },

    /// Backtracking was requested with nothing on the decision stack.
    #[error("backtrack requested with an empty decision stack")]
    EmptyDecisionStack,
}
