//! Working and best-known precedence sets of one solve.

use std::time::Duration;

use log::trace;

use super::outcome::{SearchStatistics, SolveOutcome, TerminationReason};
use crate::engine::PropagationEngine;
use crate::model::{Precedence, PrecedenceSet};

/// Book-keeping every solver shares: which precedences are applied to the
/// engine right now, which set forms the best schedule so far, and the
/// counters of the solve.
///
/// All posts and retractions made during search go through the workspace so
/// the applied set always mirrors the engine.
#[derive(Debug, Default)]
pub(crate) struct Workspace {
    applied: PrecedenceSet,
    best: PrecedenceSet,
    best_makespan: Option<i64>,
    time_to_best: Duration,
    history: Vec<i64>,
    statistics: SearchStatistics,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn applied(&self) -> &PrecedenceSet {
        &self.applied
    }

    pub fn best_makespan(&self) -> Option<i64> {
        self.best_makespan
    }

    pub fn statistics(&self) -> &SearchStatistics {
        &self.statistics
    }

    pub fn statistics_mut(&mut self) -> &mut SearchStatistics {
        &mut self.statistics
    }

    /// Posts `p` unless an equal precedence is already applied.
    pub fn add_precedence<E: PropagationEngine>(
        &mut self,
        engine: &mut E,
        p: Precedence,
    ) -> bool {
        if !self.applied.insert(p) {
            return false;
        }
        p.apply(engine);
        self.statistics.precedences_posted += 1;
        trace!("applied {} on {} (buffer {})", p, p.resource(), p.buffer());
        true
    }

    /// Retracts `p` if it is applied.
    pub fn remove_precedence<E: PropagationEngine>(
        &mut self,
        engine: &mut E,
        p: &Precedence,
    ) -> bool {
        if !self.applied.remove(p) {
            return false;
        }
        p.retract(engine);
        self.statistics.precedences_retracted += 1;
        trace!("retracted {} on {}", p, p.resource());
        true
    }

    /// Re-evaluates the critical flag of every applied precedence.
    pub fn mark_critical<F: FnMut(&Precedence) -> bool>(&mut self, is_critical: F) {
        self.applied.mark_critical(is_critical);
    }

    /// Snapshots the applied set as the best schedule.
    pub fn record_best(&mut self, makespan: i64, elapsed: Duration) {
        self.best = self.applied.clone();
        self.best_makespan = Some(makespan);
        self.time_to_best = elapsed;
        self.statistics.solutions_found += 1;
    }

    /// Appends the current best makespan, if any, to the history.
    pub fn record_history(&mut self) {
        if let Some(best) = self.best_makespan {
            self.history.push(best);
        }
    }

    /// Replaces whatever is applied with the best-known set, propagating
    /// once. Calling it again leaves the engine unchanged.
    pub fn restore_best_solution<E: PropagationEngine>(&mut self, engine: &mut E) {
        engine.set_auto_propagation(false);
        for p in &self.applied {
            p.retract(engine);
        }
        for p in &self.best {
            p.apply(engine);
        }
        self.applied = self.best.clone();
        engine.set_auto_propagation(true);
    }

    /// Packs the solve into an outcome. Without a feasible schedule the
    /// time to best is the whole elapsed time.
    pub fn into_outcome(
        self,
        solver: &str,
        elapsed: Duration,
        termination: TerminationReason,
        timed_out: bool,
    ) -> SolveOutcome {
        SolveOutcome {
            solver: solver.to_string(),
            best_makespan: self.best_makespan,
            solution: self.best.as_slice().to_vec(),
            elapsed,
            time_to_best: if self.best_makespan.is_some() {
                self.time_to_best
            } else {
                elapsed
            },
            termination,
            timed_out,
            makespan_history: self.history,
            statistics: self.statistics,
        }
    }
}
