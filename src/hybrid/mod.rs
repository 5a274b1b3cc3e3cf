//! Hybrid of iterative flattening and branch and bound.
//!
//! The time budget is split between the two: the flatten/relax phase finds a
//! good schedule quickly, and its makespan and orderings then bound and steer
//! the exhaustive phase.

mod config;
mod runner;

pub use config::HybridConfig;
pub use runner::HybridSolver;
