//! Per-resource query and mutation surface.

use std::fmt;

use super::types::{ActivityId, PropagationEngine, ResourceId, ResourceViolation};

/// Thin adapter over one engine resource.
///
/// A view holds nothing but the resource handle, so it is `Copy` and can be
/// stored inside every [`Precedence`](crate::model::Precedence) posted on its
/// behalf. The engine is passed explicitly to each call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceView {
    id: ResourceId,
}

impl ResourceView {
    /// Wraps `id`.
    pub fn new(id: ResourceId) -> Self {
        Self { id }
    }

    /// The wrapped resource handle.
    pub fn id(&self) -> ResourceId {
        self.id
    }

    /// Engine-side name of the resource.
    pub fn name<E: PropagationEngine>(&self, engine: &E) -> String {
        engine.resource_name(self.id)
    }

    /// Most negative capacity level on this resource and the time it occurs.
    ///
    /// Returns `None` when the profile never drops below zero. Ties go to
    /// the earliest time.
    pub fn max_violation<E: PropagationEngine>(&self, engine: &E) -> Option<ResourceViolation> {
        let mut worst: Option<ResourceViolation> = None;
        for entry in engine.profile(self.id) {
            let level = entry.level();
            if level >= 0.0 {
                continue;
            }
            let better = match worst {
                None => true,
                Some(w) => level < w.level || (level == w.level && entry.time < w.time),
            };
            if better {
                worst = Some(ResourceViolation {
                    time: entry.time,
                    level,
                });
            }
        }
        worst
    }

    /// Activities jointly causing the violation at `time`.
    pub fn conflict_set<E: PropagationEngine>(&self, engine: &E, time: i64) -> Vec<ActivityId> {
        engine.conflict_set(self.id, time)
    }

    /// The conflict set at `time` read as (predecessor, successor) pairs.
    /// A trailing unpaired activity is dropped.
    pub fn conflict_pairs<E: PropagationEngine>(
        &self,
        engine: &E,
        time: i64,
    ) -> Vec<(ActivityId, ActivityId)> {
        self.conflict_set(engine, time)
            .chunks_exact(2)
            .map(|pair| (pair[0], pair[1]))
            .collect()
    }

    /// Posts `pred` before `succ` on this resource.
    pub fn add_precedence<E: PropagationEngine>(
        &self,
        engine: &mut E,
        pred: ActivityId,
        succ: ActivityId,
    ) {
        engine.add_precedence(self.id, pred, succ);
    }

    /// Retracts `pred` before `succ` on this resource.
    pub fn remove_precedence<E: PropagationEngine>(
        &self,
        engine: &mut E,
        pred: ActivityId,
        succ: ActivityId,
    ) {
        engine.remove_precedence(self.id, pred, succ);
    }
}

impl From<ResourceId> for ResourceView {
    fn from(id: ResourceId) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for ResourceView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}
