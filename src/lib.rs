//! Precedence-constraint-posting search for resource-constrained scheduling.
//!
//! Repairs capacity violations of a schedule held by an external
//! constraint-propagation engine by posting and retracting ordering
//! constraints between activities that compete for a resource:
//!
//! - **Iterative Flattening / Relaxation (IFR)**: local search alternating a
//!   flatten phase (post orderings until every profile fits) with a random
//!   relax phase (retract part of them) while tracking the best makespan.
//! - **Exhaustive**: depth-first branch and bound over ordering decisions,
//!   bounded by the best known makespan and guided by an optional oracle.
//! - **Hybrid**: IFR for an incumbent and an oracle, then Exhaustive to
//!   improve on it or confirm it.
//!
//! # Architecture
//!
//! The engine is reached only through the [`engine::PropagationEngine`]
//! trait, so the search core never propagates anything itself.
//! [`engine::MockEngine`] is a small deterministic implementation for tests
//! and benchmarks. Solvers share the result contract in [`solver`] and are
//! plain values built per solve request.

pub mod engine;
pub mod error;
pub mod exhaustive;
pub mod hybrid;
pub mod ifr;
pub mod model;
pub mod nogood;
pub mod solver;
