//! Iterative Flattening with Iterative Relaxation (IFR).
//!
//! A precedence-constraint-posting local search. Flattening posts orderings
//! between activities that over-subscribe a resource until the profile fits
//! within capacity; relaxation retracts a random part of those orderings so
//! the next flattening can find a shorter schedule.
//!
//! # References
//!
//! - Cesta, A., Oddi, A., Smith, S. F. (2000). "Iterative Flattening: A
//!   Scalable Method for Solving Multi-Capacity Scheduling Problems", *AAAI*.
//! - Oddi, A., Cesta, A., Policella, N., Smith, S. F. (2010). "Iterative
//!   flattening search for resource constrained scheduling", *Journal of
//!   Intelligent Manufacturing* 21(1), 17-30.

mod config;
mod runner;

pub use config::IfrConfig;
pub use runner::IfrSolver;
