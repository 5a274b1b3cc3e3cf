//! Identifiers, bounds and the propagation-engine contract.

use std::fmt;

/// Opaque handle to an activity owned by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActivityId(pub usize);

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque handle to a capacity-limited resource owned by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceId(pub usize);

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// Closed integer interval `[lb, ub]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interval {
    /// Lower bound.
    pub lb: i64,
    /// Upper bound.
    pub ub: i64,
}

impl Interval {
    /// Creates the interval `[lb, ub]`.
    pub fn new(lb: i64, ub: i64) -> Self {
        Self { lb, ub }
    }

    /// The singleton interval `[value, value]`.
    pub fn point(value: i64) -> Self {
        Self {
            lb: value,
            ub: value,
        }
    }

    /// Whether the bounds have crossed.
    pub fn is_empty(&self) -> bool {
        self.lb > self.ub
    }
}

/// Current bounds of one activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityBounds {
    /// Start-time interval.
    pub start: Interval,
    /// End-time interval.
    pub end: Interval,
    /// Duration interval.
    pub duration: Interval,
}

/// One point of a resource's capacity profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileEntry {
    /// Time at which the level applies.
    pub time: i64,
    /// Demand placed on the resource at `time`.
    pub usage: f64,
    /// Capacity available at `time`.
    pub capacity: f64,
}

impl ProfileEntry {
    /// Remaining capacity at this point; negative means over-subscribed.
    pub fn level(&self) -> f64 {
        self.capacity - self.usage
    }
}

/// Worst capacity violation found on a resource.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResourceViolation {
    /// Time of the violation.
    pub time: i64,
    /// Capacity level at that time, always negative.
    pub level: f64,
}

/// The constraint-propagation engine the search core drives.
///
/// The engine owns activities, resources and the temporal network. The
/// search core only reads bounds and profiles, and posts or retracts
/// ordering constraints between activities on behalf of a resource. Every
/// mutation re-propagates unless automatic propagation has been suspended
/// with [`set_auto_propagation`](Self::set_auto_propagation).
pub trait PropagationEngine {
    /// Current bounds of `activity`.
    fn activity_bounds(&self, activity: ActivityId) -> ActivityBounds;

    /// Capacity profile of `resource`, ordered by time.
    fn profile(&self, resource: ResourceId) -> Vec<ProfileEntry>;

    /// Activities responsible for the over-subscription of `resource` at
    /// `time`, laid out as consecutive (predecessor, successor) pairs.
    fn conflict_set(&self, resource: ResourceId, time: i64) -> Vec<ActivityId>;

    /// Global violation measure; strictly positive iff the current state is
    /// inconsistent.
    fn violation(&self) -> f64;

    /// Orders `pred` before `succ` on behalf of `resource`.
    fn add_precedence(&mut self, resource: ResourceId, pred: ActivityId, succ: ActivityId);

    /// Retracts an ordering previously posted with
    /// [`add_precedence`](Self::add_precedence).
    fn remove_precedence(&mut self, resource: ResourceId, pred: ActivityId, succ: ActivityId);

    /// Suspends or resumes automatic propagation after each mutation.
    /// Resuming propagates any pending changes once.
    fn set_auto_propagation(&mut self, enabled: bool);

    /// Forces a propagation pass.
    fn propagate(&mut self);

    /// All resources known to the engine.
    fn resources(&self) -> Vec<ResourceId>;

    /// All activities known to the engine, in key order.
    fn activities(&self) -> Vec<ActivityId>;

    /// Human-readable resource name.
    fn resource_name(&self, resource: ResourceId) -> String {
        resource.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_point_and_empty() {
        let p = Interval::point(7);
        assert_eq!(p.lb, 7);
        assert_eq!(p.ub, 7);
        assert!(!p.is_empty());
        assert!(Interval::new(5, 4).is_empty());
    }

    #[test]
    fn test_profile_level() {
        let entry = ProfileEntry {
            time: 3,
            usage: 3.0,
            capacity: 2.0,
        };
        assert_eq!(entry.level(), -1.0);
    }

    #[test]
    fn test_id_display() {
        assert_eq!(ActivityId(4).to_string(), "4");
        assert_eq!(ResourceId(2).to_string(), "r2");
    }
}
