//! No-good (tabu) memory for the flatten phase.
//!
//! When posting `pred < succ` makes the engine inconsistent, the pair is
//! forbidden for a short number of iterations so the next flatten passes try
//! other orderings first. Entries expire by iteration count and are never
//! deleted explicitly.
//!
//! # References
//!
//! - Glover, F. (1989). "Tabu Search, Part I", *ORSA Journal on Computing* 1(3), 190-206.
//! - Cesta, A., Oddi, A., Smith, S. F. (2002). "A Constraint-Based Method for
//!   Project Scheduling with Time Windows", *Journal of Heuristics* 8(1), 109-136.

mod registry;

pub use registry::{NoGoodRegistry, DEFAULT_TENURE};
