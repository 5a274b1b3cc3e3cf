//! Ordering constraints and candidate ranking.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::engine::{ActivityId, PropagationEngine, ResourceView};

/// An ordering `pred` before `succ` posted on behalf of one resource.
///
/// Identity is the (resource, predecessor, successor) triple. The buffer and
/// the critical flag describe the constraint but take no part in equality or
/// hashing, so a set of precedences never holds two constraints between the
/// same activities on the same resource.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Precedence {
    resource: ResourceView,
    pred: ActivityId,
    succ: ActivityId,
    buffer: i64,
    critical: bool,
}

impl Precedence {
    /// Creates a precedence with an explicit buffer. New precedences are
    /// critical.
    pub fn new(resource: ResourceView, pred: ActivityId, succ: ActivityId, buffer: i64) -> Self {
        Self {
            resource,
            pred,
            succ,
            buffer,
            critical: true,
        }
    }

    /// Creates a precedence whose buffer is read from the engine:
    /// latest start of `succ` minus earliest end of `pred`.
    pub fn from_engine<E: PropagationEngine>(
        engine: &E,
        resource: ResourceView,
        pred: ActivityId,
        succ: ActivityId,
    ) -> Self {
        let buffer = engine.activity_bounds(succ).start.ub - engine.activity_bounds(pred).end.lb;
        Self::new(resource, pred, succ, buffer)
    }

    /// Resource the ordering is posted on.
    pub fn resource(&self) -> ResourceView {
        self.resource
    }

    /// Activity that runs first.
    pub fn pred(&self) -> ActivityId {
        self.pred
    }

    /// Activity that runs second.
    pub fn succ(&self) -> ActivityId {
        self.succ
    }

    /// Slack between the two activities when the precedence was built.
    /// Negative when `succ` cannot start after `pred` ends.
    pub fn buffer(&self) -> i64 {
        self.buffer
    }

    /// Whether the relax phase may retract this precedence.
    pub fn is_critical(&self) -> bool {
        self.critical
    }

    /// Copy of `self` with the critical flag replaced.
    pub fn with_critical(mut self, critical: bool) -> Self {
        self.critical = critical;
        self
    }

    /// Posts this ordering to the engine.
    pub fn apply<E: PropagationEngine>(&self, engine: &mut E) {
        self.resource.add_precedence(engine, self.pred, self.succ);
    }

    /// Retracts this ordering from the engine.
    pub fn retract<E: PropagationEngine>(&self, engine: &mut E) {
        self.resource.remove_precedence(engine, self.pred, self.succ);
    }

    fn identity(&self) -> (ActivityId, ActivityId, ResourceView) {
        (self.pred, self.succ, self.resource)
    }
}

impl PartialEq for Precedence {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for Precedence {}

impl Hash for Precedence {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

/// Orders by (predecessor, successor, resource).
impl PartialOrd for Precedence {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Precedence {
    fn cmp(&self, other: &Self) -> Ordering {
        self.identity().cmp(&other.identity())
    }
}

impl fmt::Display for Precedence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}<{}}}", self.pred, self.succ)
    }
}

/// Order in which candidate precedences are tried.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CandidateOrder {
    /// Smallest buffer first.
    #[default]
    TightestFirst,
    /// Largest buffer first.
    LoosestFirst,
}

impl CandidateOrder {
    /// Compares two candidates by buffer, then by identity.
    pub fn compare(self, a: &Precedence, b: &Precedence) -> Ordering {
        let by_buffer = match self {
            CandidateOrder::TightestFirst => a.buffer.cmp(&b.buffer),
            CandidateOrder::LoosestFirst => b.buffer.cmp(&a.buffer),
        };
        by_buffer.then_with(|| a.cmp(b))
    }

    /// Sorts `candidates` into trial order and drops duplicates.
    pub fn rank(self, candidates: &mut Vec<Precedence>) {
        candidates.sort_by(|a, b| self.compare(a, b));
        candidates.dedup();
    }
}
