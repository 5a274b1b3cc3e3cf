//! Exhaustive branch-and-bound search over precedence decisions.
//!
//! Each decision point pins one resource conflict and branches over the
//! orderings that could resolve it. The search backtracks on inconsistency
//! and on schedules no better than the incumbent, tightens the upper bound
//! whenever it finds a shorter schedule, and is complete: when it reports
//! [`Exhausted`](crate::solver::TerminationReason::Exhausted) no schedule
//! shorter than the final upper bound exists in the explored space.
//!
//! An optional oracle (typically the solution of a heuristic run) decides
//! which branch is taken first without removing any branch.
//!
//! # References
//!
//! - Laborie, P. (2003). "Algorithms for propagating resource constraints in
//!   AI planning and scheduling: Existing approaches and new results",
//!   *Artificial Intelligence* 143(2), 151-188.

mod config;
mod decision;
mod runner;

pub use config::{ExhaustiveConfig, ScanPolicy};
pub use decision::DecisionPoint;
pub use runner::ExhaustiveSolver;
