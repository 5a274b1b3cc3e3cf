//! Resources and activities a solve works over.

use crate::engine::{ActivityId, PropagationEngine, ResourceView};
use crate::error::SearchError;

/// The resource list and activity map handed to a solver.
///
/// The last activity is the terminal one: the makespan of a schedule is the
/// earliest possible end of that activity.
#[derive(Debug, Clone)]
pub struct Project {
    resources: Vec<ResourceView>,
    activities: Vec<ActivityId>,
    terminal: ActivityId,
}

impl Project {
    /// Builds a project from explicit lists.
    ///
    /// # Errors
    ///
    /// [`SearchError::EmptyProject`] when `activities` is empty.
    pub fn new(
        resources: Vec<ResourceView>,
        activities: Vec<ActivityId>,
    ) -> Result<Self, SearchError> {
        let terminal = *activities.last().ok_or(SearchError::EmptyProject)?;
        Ok(Self {
            resources,
            activities,
            terminal,
        })
    }

    /// Builds a project covering every resource and activity of `engine`.
    pub fn from_engine<E: PropagationEngine>(engine: &E) -> Result<Self, SearchError> {
        let resources = engine
            .resources()
            .into_iter()
            .map(ResourceView::new)
            .collect();
        Self::new(resources, engine.activities())
    }

    /// Resources whose profiles are flattened.
    pub fn resources(&self) -> &[ResourceView] {
        &self.resources
    }

    /// All activities, in engine order.
    pub fn activities(&self) -> &[ActivityId] {
        &self.activities
    }

    /// Activity whose earliest end is the makespan.
    pub fn terminal(&self) -> ActivityId {
        self.terminal
    }

    /// Earliest end of the terminal activity under the engine's current
    /// bounds.
    pub fn makespan<E: PropagationEngine>(&self, engine: &E) -> i64 {
        engine.activity_bounds(self.terminal).end.lb
    }

    /// Whether any resource currently reports a capacity violation.
    pub fn has_violations<E: PropagationEngine>(&self, engine: &E) -> bool {
        self.resources
            .iter()
            .any(|r| r.max_violation(engine).is_some())
    }
}
