//! Result contract shared by every solver.

use std::fmt;
use std::time::Duration;

use crate::engine::PropagationEngine;
use crate::model::{solution_string, Precedence};

/// Why a solve stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TerminationReason {
    /// Too many consecutive iterations without a better schedule.
    StabilityLimit,
    /// The best makespan reached the lower bound.
    BoundsCrossed,
    /// The decision tree was fully explored.
    Exhausted,
    /// The wall-clock budget ran out.
    TimedOut,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TerminationReason::StabilityLimit => "stable",
            TerminationReason::BoundsCrossed => "bounds crossed",
            TerminationReason::Exhausted => "exhausted",
            TerminationReason::TimedOut => "timed out",
        };
        f.write_str(text)
    }
}

/// Counters collected during a solve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchStatistics {
    /// Flatten/relax cycles completed.
    pub iterations: u64,
    /// Precedences posted to the engine.
    pub precedences_posted: u64,
    /// Precedences retracted from the engine.
    pub precedences_retracted: u64,
    /// Orderings rejected as inconsistent and recorded as no-goods.
    pub no_goods: u64,
    /// Branching decisions executed.
    pub decisions_executed: u64,
    /// Decisions undone.
    pub backtracks: u64,
    /// Improving schedules found.
    pub solutions_found: u64,
}

impl SearchStatistics {
    /// Adds the counters of `other` into `self`.
    pub fn merge(&mut self, other: &SearchStatistics) {
        self.iterations += other.iterations;
        self.precedences_posted += other.precedences_posted;
        self.precedences_retracted += other.precedences_retracted;
        self.no_goods += other.no_goods;
        self.decisions_executed += other.decisions_executed;
        self.backtracks += other.backtracks;
        self.solutions_found += other.solutions_found;
    }
}

impl fmt::Display for SearchStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "iterations={} posted={} retracted={} no_goods={} decisions={} \
             backtracks={} solutions={}",
            self.iterations,
            self.precedences_posted,
            self.precedences_retracted,
            self.no_goods,
            self.decisions_executed,
            self.backtracks,
            self.solutions_found
        )
    }
}

/// What a solver hands back.
///
/// When a solve returns, `solution` is exactly the set of precedences the
/// solver left applied to the engine.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolveOutcome {
    /// Name of the solver that produced the outcome.
    pub solver: String,
    /// Makespan of the best feasible schedule, if any was found.
    pub best_makespan: Option<i64>,
    /// Precedences of the best schedule, in application order.
    pub solution: Vec<Precedence>,
    /// Wall-clock time of the whole solve.
    pub elapsed: Duration,
    /// Time from the start of the solve until the best schedule was found,
    /// or `elapsed` when none was.
    pub time_to_best: Duration,
    /// Why the solve stopped.
    pub termination: TerminationReason,
    /// Whether the budget ran out at some point.
    pub timed_out: bool,
    /// Best makespan after each improvement or iteration, non-increasing.
    pub makespan_history: Vec<i64>,
    /// Search counters.
    pub statistics: SearchStatistics,
}

impl SolveOutcome {
    /// Whether a feasible schedule was found.
    pub fn is_feasible(&self) -> bool {
        self.best_makespan.is_some()
    }

    /// The solution as `{pred<succ}` tokens sorted by predecessor.
    pub fn solution_string(&self) -> String {
        solution_string(&self.solution)
    }

    /// One line of a batch result file:
    /// `test bound makespan elapsed_ms time_to_best_ms solution`, separated
    /// by four spaces, with makespan 0 when nothing feasible was found.
    pub fn record_line(&self, test: &str, bound: i64) -> String {
        let separator = "    ";
        [
            test.to_string(),
            bound.to_string(),
            self.best_makespan.unwrap_or(0).to_string(),
            self.elapsed.as_millis().to_string(),
            self.time_to_best.as_millis().to_string(),
            self.solution_string(),
        ]
        .join(separator)
    }

    /// Retracts the solution from the engine with propagation batched.
    pub fn undo<E: PropagationEngine>(&self, engine: &mut E) {
        engine.set_auto_propagation(false);
        for p in &self.solution {
            p.retract(engine);
        }
        engine.set_auto_propagation(true);
    }

    /// Posts the solution again with propagation batched.
    pub fn reapply<E: PropagationEngine>(&self, engine: &mut E) {
        engine.set_auto_propagation(false);
        for p in &self.solution {
            p.apply(engine);
        }
        engine.set_auto_propagation(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{ActivityId, MockEngine, ResourceView};

    fn outcome(solution: Vec<Precedence>, best: Option<i64>) -> SolveOutcome {
        SolveOutcome {
            solver: "test".into(),
            best_makespan: best,
            solution,
            elapsed: Duration::from_millis(1250),
            time_to_best: Duration::from_millis(40),
            termination: TerminationReason::StabilityLimit,
            timed_out: false,
            makespan_history: Vec::new(),
            statistics: SearchStatistics::default(),
        }
    }

    #[test]
    fn test_record_line() {
        let p = Precedence::new(
            ResourceView::new(crate::engine::ResourceId(0)),
            ActivityId(1),
            ActivityId(2),
            0,
        );
        let line = outcome(vec![p], Some(42)).record_line("j30_1", 40);
        assert_eq!(line, "j30_1    40    42    1250    40    {1<2}");

        let infeasible = outcome(Vec::new(), None).record_line("j30_2", 40);
        assert_eq!(infeasible, "j30_2    40    0    1250    40    ");
    }

    #[test]
    fn test_undo_and_reapply_batch_propagation() {
        let mut engine = MockEngine::new();
        let r = engine.add_resource("r", 1.0);
        let a = engine.add_activity("a", 10, 0, 100);
        let b = engine.add_activity("b", 10, 0, 100);
        let c = engine.add_activity("c", 10, 0, 100);
        let view = ResourceView::new(r);
        let solution = vec![
            Precedence::from_engine(&engine, view, a, b),
            Precedence::from_engine(&engine, view, b, c),
        ];
        let result = outcome(solution, Some(30));

        let before = engine.propagation_count();
        result.reapply(&mut engine);
        assert_eq!(engine.propagation_count(), before + 1);
        assert_eq!(engine.activity_bounds(c).start.lb, 20);

        result.undo(&mut engine);
        assert_eq!(engine.propagation_count(), before + 2);
        assert!(engine.posted_precedences().is_empty());
    }

    #[test]
    fn test_statistics_merge() {
        let mut total = SearchStatistics {
            iterations: 3,
            backtracks: 1,
            ..Default::default()
        };
        total.merge(&SearchStatistics {
            iterations: 2,
            decisions_executed: 5,
            ..Default::default()
        });
        assert_eq!(total.iterations, 5);
        assert_eq!(total.decisions_executed, 5);
        assert_eq!(total.backtracks, 1);
    }
}
