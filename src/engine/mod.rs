//! Boundary to the constraint-propagation engine.
//!
//! The search core never propagates anything itself. It reads bounds and
//! capacity profiles through [`PropagationEngine`], and posts or retracts
//! orderings through a per-resource [`ResourceView`]. [`MockEngine`] is a
//! small deterministic implementation used by the tests and benchmarks.

mod mock;
mod types;
mod view;

pub use mock::MockEngine;
pub use types::{
    ActivityBounds, ActivityId, Interval, ProfileEntry, PropagationEngine, ResourceId,
    ResourceViolation,
};
pub use view::ResourceView;
