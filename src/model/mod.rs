//! Schedule model: precedences, solution sets and the project under search.

mod precedence;
mod project;
mod solution;

pub use precedence::{CandidateOrder, Precedence};
pub use project::Project;
pub use solution::{solution_string, PrecedenceSet};
