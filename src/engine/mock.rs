//! Deterministic in-memory engine.
//!
//! A minimal temporal network with cumulative resources, enough to drive the
//! solvers in tests and benchmarks:
//!
//! - each activity has a fixed duration and a start window
//!   `[release, deadline]`;
//! - static temporal constraints and posted precedences both mean
//!   `start(succ) >= end(pred) + delay`;
//! - propagation computes earliest and latest starts by longest paths and
//!   flags the state inconsistent when a window empties or a cycle appears;
//! - resource profiles assume every activity starts at its earliest start.
//!
//! # Panics
//!
//! Methods index internal tables directly and panic on ids that were not
//! issued by the same engine.

use log::{trace, warn};

use super::types::{
    ActivityBounds, ActivityId, Interval, ProfileEntry, PropagationEngine, ResourceId,
};

#[derive(Debug, Clone)]
struct MockActivity {
    name: String,
    duration: i64,
    release: i64,
    deadline: i64,
}

#[derive(Debug, Clone)]
struct MockResource {
    name: String,
    capacity: f64,
    demands: Vec<(ActivityId, f64)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Edge {
    pred: ActivityId,
    succ: ActivityId,
    delay: i64,
}

/// In-memory [`PropagationEngine`] for tests and benchmarks.
///
/// # Examples
///
/// ```
/// use u_pcp::engine::{MockEngine, PropagationEngine};
///
/// let mut engine = MockEngine::new();
/// let crane = engine.add_resource("crane", 1.0);
/// let a = engine.add_activity("a", 10, 0, 100);
/// let b = engine.add_activity("b", 10, 0, 100);
/// engine.add_demand(crane, a, 1.0);
/// engine.add_demand(crane, b, 1.0);
///
/// engine.add_precedence(crane, a, b);
/// assert_eq!(engine.activity_bounds(b).start.lb, 10);
/// assert_eq!(engine.violation(), 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct MockEngine {
    activities: Vec<MockActivity>,
    resources: Vec<MockResource>,
    temporal: Vec<Edge>,
    posted: Vec<(ResourceId, Edge)>,
    earliest: Vec<i64>,
    latest: Vec<i64>,
    cyclic: bool,
    auto_propagation: bool,
    dirty: bool,
    propagations: usize,
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEngine {
    /// Creates an empty engine with automatic propagation enabled.
    pub fn new() -> Self {
        Self {
            activities: Vec::new(),
            resources: Vec::new(),
            temporal: Vec::new(),
            posted: Vec::new(),
            earliest: Vec::new(),
            latest: Vec::new(),
            cyclic: false,
            auto_propagation: true,
            dirty: false,
            propagations: 0,
        }
    }

    /// Adds an activity of fixed `duration` whose start lies in
    /// `[release, deadline]`.
    pub fn add_activity(
        &mut self,
        name: impl Into<String>,
        duration: i64,
        release: i64,
        deadline: i64,
    ) -> ActivityId {
        let id = ActivityId(self.activities.len());
        self.activities.push(MockActivity {
            name: name.into(),
            duration,
            release,
            deadline,
        });
        self.earliest.push(release);
        self.latest.push(deadline);
        self.on_change();
        id
    }

    /// Adds a zero-duration sink that every existing activity must precede,
    /// with its start bounded by `horizon`. Add it last so it becomes the
    /// terminal activity of [`Project::from_engine`](crate::model::Project::from_engine).
    pub fn add_sink(&mut self, name: impl Into<String>, horizon: i64) -> ActivityId {
        let existing: Vec<ActivityId> = (0..self.activities.len()).map(ActivityId).collect();
        let sink = self.add_activity(name, 0, 0, horizon);
        for pred in existing {
            self.temporal.push(Edge {
                pred,
                succ: sink,
                delay: 0,
            });
        }
        self.on_change();
        sink
    }

    /// Adds a resource with constant `capacity`.
    pub fn add_resource(&mut self, name: impl Into<String>, capacity: f64) -> ResourceId {
        let id = ResourceId(self.resources.len());
        self.resources.push(MockResource {
            name: name.into(),
            capacity,
            demands: Vec::new(),
        });
        id
    }

    /// Makes `activity` consume `amount` of `resource` while it runs.
    pub fn add_demand(&mut self, resource: ResourceId, activity: ActivityId, amount: f64) {
        self.resources[resource.0].demands.push((activity, amount));
    }

    /// Adds a problem constraint `start(succ) >= end(pred) + delay`. Unlike
    /// posted precedences these belong to the instance and are never
    /// retracted.
    pub fn add_temporal_constraint(&mut self, pred: ActivityId, succ: ActivityId, delay: i64) {
        self.temporal.push(Edge { pred, succ, delay });
        self.on_change();
    }

    /// Precedences currently posted through the engine interface, in posting
    /// order.
    pub fn posted_precedences(&self) -> Vec<(ResourceId, ActivityId, ActivityId)> {
        self.posted
            .iter()
            .map(|(r, e)| (*r, e.pred, e.succ))
            .collect()
    }

    /// Number of propagation passes run so far.
    pub fn propagation_count(&self) -> usize {
        self.propagations
    }

    /// Whether mutations currently propagate immediately.
    pub fn is_auto_propagating(&self) -> bool {
        self.auto_propagation
    }

    /// Name given to `activity` at creation.
    pub fn activity_name(&self, activity: ActivityId) -> &str {
        &self.activities[activity.0].name
    }

    fn on_change(&mut self) {
        if self.auto_propagation {
            self.run_propagation();
        } else {
            self.dirty = true;
        }
    }

    fn run_propagation(&mut self) {
        let n = self.activities.len();
        let edges: Vec<Edge> = self
            .temporal
            .iter()
            .copied()
            .chain(self.posted.iter().map(|(_, e)| *e))
            .collect();

        let mut earliest: Vec<i64> = self.activities.iter().map(|a| a.release).collect();
        let mut latest: Vec<i64> = self.activities.iter().map(|a| a.deadline).collect();

        // Longest paths settle within n passes unless there is a positive cycle.
        let mut settled = false;
        for _ in 0..=n {
            let mut changed = false;
            for e in &edges {
                let gap = self.activities[e.pred.0].duration + e.delay;
                let forward = earliest[e.pred.0] + gap;
                if forward > earliest[e.succ.0] {
                    earliest[e.succ.0] = forward;
                    changed = true;
                }
                let backward = latest[e.succ.0] - gap;
                if backward < latest[e.pred.0] {
                    latest[e.pred.0] = backward;
                    changed = true;
                }
            }
            if !changed {
                settled = true;
                break;
            }
        }

        self.earliest = earliest;
        self.latest = latest;
        self.cyclic = !settled;
        self.dirty = false;
        self.propagations += 1;
    }

    fn is_running(&self, activity: ActivityId, time: i64) -> bool {
        let start = self.earliest[activity.0];
        start <= time && time < start + self.activities[activity.0].duration
    }
}

impl PropagationEngine for MockEngine {
    fn activity_bounds(&self, activity: ActivityId) -> ActivityBounds {
        let duration = self.activities[activity.0].duration;
        let est = self.earliest[activity.0];
        let lst = self.latest[activity.0];
        ActivityBounds {
            start: Interval::new(est, lst),
            end: Interval::new(est + duration, lst + duration),
            duration: Interval::point(duration),
        }
    }

    fn profile(&self, resource: ResourceId) -> Vec<ProfileEntry> {
        let res = &self.resources[resource.0];
        let mut times: Vec<i64> = res
            .demands
            .iter()
            .map(|(a, _)| self.earliest[a.0])
            .collect();
        times.sort_unstable();
        times.dedup();

        times
            .into_iter()
            .map(|time| ProfileEntry {
                time,
                usage: res
                    .demands
                    .iter()
                    .filter(|(a, _)| self.is_running(*a, time))
                    .map(|(_, amount)| amount)
                    .sum(),
                capacity: res.capacity,
            })
            .collect()
    }

    fn conflict_set(&self, resource: ResourceId, time: i64) -> Vec<ActivityId> {
        let mut running: Vec<ActivityId> = self.resources[resource.0]
            .demands
            .iter()
            .filter(|(a, amount)| *amount > 0.0 && self.is_running(*a, time))
            .map(|(a, _)| *a)
            .collect();
        running.sort_unstable();
        running.dedup();

        let mut pairs = Vec::new();
        for (i, &first) in running.iter().enumerate() {
            for &second in &running[i + 1..] {
                pairs.extend([first, second, second, first]);
            }
        }
        pairs
    }

    fn violation(&self) -> f64 {
        let empty_windows: i64 = self
            .earliest
            .iter()
            .zip(&self.latest)
            .map(|(est, lst)| (est - lst).max(0))
            .sum();
        let cycle = if self.cyclic { 1.0 } else { 0.0 };
        empty_windows as f64 + cycle
    }

    fn add_precedence(&mut self, resource: ResourceId, pred: ActivityId, succ: ActivityId) {
        trace!("post {}<{} on {}", pred, succ, resource);
        self.posted.push((
            resource,
            Edge {
                pred,
                succ,
                delay: 0,
            },
        ));
        self.on_change();
    }

    fn remove_precedence(&mut self, resource: ResourceId, pred: ActivityId, succ: ActivityId) {
        let found = self
            .posted
            .iter()
            .position(|(r, e)| *r == resource && e.pred == pred && e.succ == succ);
        match found {
            Some(index) => {
                trace!("retract {}<{} on {}", pred, succ, resource);
                self.posted.remove(index);
                self.on_change();
            }
            None => warn!("retract of unknown precedence {}<{} on {}", pred, succ, resource),
        }
    }

    fn set_auto_propagation(&mut self, enabled: bool) {
        self.auto_propagation = enabled;
        if enabled && self.dirty {
            self.run_propagation();
        }
    }

    fn propagate(&mut self) {
        self.run_propagation();
    }

    fn resources(&self) -> Vec<ResourceId> {
        (0..self.resources.len()).map(ResourceId).collect()
    }

    fn activities(&self) -> Vec<ActivityId> {
        (0..self.activities.len()).map(ActivityId).collect()
    }

    fn resource_name(&self, resource: ResourceId) -> String {
        self.resources[resource.0].name.clone()
    }
}
