//! Depth-first branch and bound over ordering decisions.
//!
//! Decision points live in an arena; the stack holds arena indices of the
//! points whose choice is currently applied. The point being expanded, if
//! any, sits just past the top of the stack, so the arena never holds more
//! than `stack.len() + 1` records and discarding a point is a truncation.

use std::collections::HashSet;

use log::{debug, info, warn};

use super::config::{ExhaustiveConfig, ScanPolicy};
use super::decision::DecisionPoint;
use crate::engine::{PropagationEngine, ResourceView, ResourceViolation};
use crate::error::SearchError;
use crate::model::{Precedence, Project};
use crate::solver::{Budget, ScheduleSolver, SolveOutcome, TerminationReason, Workspace};

const NAME: &str = "Exhaustive";

/// Complete search for a schedule shorter than the upper bound.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_pcp::engine::MockEngine;
/// use u_pcp::exhaustive::{ExhaustiveConfig, ExhaustiveSolver};
/// use u_pcp::model::Project;
/// use u_pcp::solver::{ScheduleSolver, TerminationReason};
///
/// let mut engine = MockEngine::new();
/// let crane = engine.add_resource("crane", 1.0);
/// let a = engine.add_activity("a", 10, 0, 100);
/// let b = engine.add_activity("b", 10, 5, 100);
/// engine.add_demand(crane, a, 1.0);
/// engine.add_demand(crane, b, 1.0);
/// engine.add_sink("end", 1000);
///
/// let project = Project::from_engine(&engine).unwrap();
/// let config = ExhaustiveConfig::default().with_timeout(Duration::from_secs(5));
/// let outcome = ExhaustiveSolver::new(config).solve(&mut engine, &project).unwrap();
/// assert_eq!(outcome.best_makespan, Some(20));
/// assert_eq!(outcome.termination, TerminationReason::Exhausted);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExhaustiveSolver {
    config: ExhaustiveConfig,
}

impl ExhaustiveSolver {
    /// Creates a solver with `config`.
    pub fn new(config: ExhaustiveConfig) -> Self {
        Self { config }
    }

    /// The solver configuration.
    pub fn config(&self) -> &ExhaustiveConfig {
        &self.config
    }
}

impl ScheduleSolver for ExhaustiveSolver {
    fn name(&self) -> &'static str {
        NAME
    }

    fn solve<E: PropagationEngine>(
        &mut self,
        engine: &mut E,
        project: &Project,
    ) -> Result<SolveOutcome, SearchError> {
        debug!(
            "{}: bounds [{}, {:?}], oracle of {} precedences, timeout {:?}",
            NAME,
            self.config.lower_bound,
            self.config.upper_bound,
            self.config.oracle.len(),
            self.config.timeout
        );
        engine.propagate();
        let mut search = BranchAndBound::new(&self.config, project);
        let termination = search.run(engine)?;
        Ok(search.finish(engine, termination))
    }
}

/// State of one branch-and-bound run.
struct BranchAndBound<'a> {
    config: &'a ExhaustiveConfig,
    project: &'a Project,
    oracle: HashSet<Precedence>,
    budget: Budget,
    workspace: Workspace,
    upper_bound: Option<i64>,
    arena: Vec<DecisionPoint>,
    stack: Vec<usize>,
    current: Option<usize>,
    scan_start: usize,
    timed_out: bool,
}

impl<'a> BranchAndBound<'a> {
    fn new(config: &'a ExhaustiveConfig, project: &'a Project) -> Self {
        Self {
            config,
            project,
            oracle: config.oracle.iter().copied().collect(),
            budget: Budget::start(config.timeout),
            workspace: Workspace::new(),
            upper_bound: config.upper_bound,
            arena: Vec::new(),
            stack: Vec::new(),
            current: None,
            scan_start: 0,
            timed_out: false,
        }
    }

    fn run<E: PropagationEngine>(
        &mut self,
        engine: &mut E,
    ) -> Result<TerminationReason, SearchError> {
        loop {
            if self.budget.is_exhausted() {
                self.timed_out = true;
                return Ok(TerminationReason::TimedOut);
            }
            if self.bounds_crossed() {
                return Ok(TerminationReason::BoundsCrossed);
            }

            if self.current.is_none() {
                self.current = self.next_decision_point(engine);
            }

            match self.current {
                None => {
                    self.record_if_better(engine);
                    if self.bounds_crossed() {
                        return Ok(TerminationReason::BoundsCrossed);
                    }
                    if self.stack.is_empty() {
                        return Ok(TerminationReason::Exhausted);
                    }
                    self.backtrack(engine)?;
                }
                Some(index) if self.arena[index].has_next() => {
                    self.execute(engine, index);
                    if engine.violation() > 0.0 || self.exceeds_upper_bound(engine) {
                        self.backtrack(engine)?;
                    }
                }
                Some(index) => {
                    self.discard(index);
                    if self.stack.is_empty() {
                        return Ok(TerminationReason::Exhausted);
                    }
                    self.backtrack(engine)?;
                }
            }
        }
    }

    fn bounds_crossed(&self) -> bool {
        self.upper_bound
            .is_some_and(|upper| upper <= self.config.lower_bound)
    }

    fn exceeds_upper_bound<E: PropagationEngine>(&self, engine: &E) -> bool {
        self.upper_bound
            .is_some_and(|upper| self.project.makespan(engine) > upper)
    }

    /// Sweeps every resource once and opens a decision point on the worst
    /// violation. Returns `None` when the profile fits everywhere.
    fn next_decision_point<E: PropagationEngine>(&mut self, engine: &E) -> Option<usize> {
        let resources = self.project.resources();
        if resources.is_empty() {
            return None;
        }
        let start = match self.config.scan_policy {
            ScanPolicy::RoundRobin => self.scan_start % resources.len(),
            ScanPolicy::FromFirst => 0,
        };
        self.scan_start = start + 1;

        let mut worst: Option<(ResourceView, ResourceViolation)> = None;
        for offset in 0..resources.len() {
            let resource = resources[(start + offset) % resources.len()];
            if let Some(violation) = resource.max_violation(engine) {
                if worst.map_or(true, |(_, w)| violation.level < w.level) {
                    worst = Some((resource, violation));
                }
            }
        }
        let (resource, violation) = worst?;

        let mut candidates: Vec<Precedence> = resource
            .conflict_pairs(engine, violation.time)
            .into_iter()
            .filter(|&(pred, succ)| pred != succ)
            .map(|(pred, succ)| Precedence::from_engine(engine, resource, pred, succ))
            .filter(|p| !self.workspace.applied().contains(p))
            .collect();
        if candidates.is_empty() {
            warn!(
                "{} over capacity at t={} with no orderings left to try",
                resource.name(engine),
                violation.time
            );
        }
        self.config.candidate_order.rank(&mut candidates);

        let index = self.arena.len();
        debug_assert_eq!(index, self.stack.len());
        self.arena
            .push(DecisionPoint::new(resource, violation.time, candidates));
        Some(index)
    }

    fn execute<E: PropagationEngine>(&mut self, engine: &mut E, index: usize) {
        let Some(choice) = self.arena[index].next_choice(&self.oracle) else {
            return;
        };
        self.workspace.add_precedence(engine, choice);
        self.stack.push(index);
        self.current = None;
        self.workspace.statistics_mut().decisions_executed += 1;
    }

    /// Pops the top decision point, retracts its choice and makes it current.
    fn backtrack<E: PropagationEngine>(&mut self, engine: &mut E) -> Result<(), SearchError> {
        debug_assert!(self.current.is_none());
        let index = self.stack.pop().ok_or(SearchError::EmptyDecisionStack)?;
        let choice = self.arena[index].undo()?;
        self.workspace.remove_precedence(engine, &choice);
        self.current = Some(index);
        self.workspace.statistics_mut().backtracks += 1;
        Ok(())
    }

    fn discard(&mut self, index: usize) {
        debug_assert_eq!(index + 1, self.arena.len());
        self.arena.truncate(index);
        self.current = None;
    }

    fn record_if_better<E: PropagationEngine>(&mut self, engine: &E) {
        if engine.violation() > 0.0 {
            return;
        }
        let makespan = self.project.makespan(engine);
        if self.upper_bound.is_some_and(|upper| makespan >= upper) {
            return;
        }
        self.upper_bound = Some(makespan);
        self.workspace.record_best(makespan, self.budget.elapsed());
        self.workspace.record_history();
        info!(
            "{}: new best makespan {} at depth {} after {:?}",
            NAME,
            makespan,
            self.stack.len(),
            self.budget.elapsed()
        );
    }

    fn finish<E: PropagationEngine>(
        mut self,
        engine: &mut E,
        termination: TerminationReason,
    ) -> SolveOutcome {
        self.workspace.restore_best_solution(engine);
        self.arena.clear();
        self.stack.clear();
        let elapsed = self.budget.stop();
        info!(
            "{}: {} after {:?}, best makespan {:?}, {}",
            NAME,
            termination,
            elapsed,
            self.workspace.best_makespan(),
            self.workspace.statistics()
        );
        self.workspace
            .into_outcome(NAME, elapsed, termination, self.timed_out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{ActivityId, MockEngine, ResourceId};
    use proptest::prelude::*;
    use std::time::Duration;

    /// Unit-capacity machine with a sink; `jobs` are (duration, release).
    fn machine(jobs: &[(i64, i64)]) -> (MockEngine, ResourceId, Vec<ActivityId>, Project) {
        let mut engine = MockEngine::new();
        let r = engine.add_resource("machine", 1.0);
        let acts: Vec<ActivityId> = jobs
            .iter()
            .enumerate()
            .map(|(i, &(duration, release))| {
                let a = engine.add_activity(format!("j{i}"), duration, release, 1000);
                engine.add_demand(r, a, 1.0);
                a
            })
            .collect();
        engine.add_sink("end", 10_000);
        let project = Project::from_engine(&engine).unwrap();
        (engine, r, acts, project)
    }

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn config() -> ExhaustiveConfig {
        init_logging();
        ExhaustiveConfig::default().with_timeout(Duration::from_secs(30))
    }

    #[test]
    fn test_finds_optimal_order() {
        // Running j0 first gives 20, j1 first gives 25.
        let (mut engine, r, acts, project) = machine(&[(10, 0), (10, 5)]);

        let outcome = ExhaustiveSolver::new(config())
            .solve(&mut engine, &project)
            .unwrap();

        assert_eq!(outcome.best_makespan, Some(20));
        assert_eq!(outcome.termination, TerminationReason::Exhausted);
        assert_eq!(outcome.makespan_history, vec![25, 20]);
        assert_eq!(engine.posted_precedences(), vec![(r, acts[0], acts[1])]);
        assert_eq!(project.makespan(&engine), 20);
    }

    #[test]
    fn test_equal_bounds_return_immediately() {
        let (mut engine, _, _, project) = machine(&[(10, 0), (10, 5), (10, 0)]);

        let outcome = ExhaustiveSolver::new(config().with_lower_bound(30).with_upper_bound(30))
            .solve(&mut engine, &project)
            .unwrap();

        assert_eq!(outcome.termination, TerminationReason::BoundsCrossed);
        assert_eq!(outcome.statistics.decisions_executed, 0);
        assert_eq!(outcome.best_makespan, None);
        assert!(engine.posted_precedences().is_empty());
    }

    #[test]
    fn test_upper_bound_prunes_equal_schedules() {
        let (mut engine, _, _, project) = machine(&[(10, 0), (10, 5)]);

        let outcome = ExhaustiveSolver::new(config().with_upper_bound(20))
            .solve(&mut engine, &project)
            .unwrap();

        assert_eq!(outcome.best_makespan, None, "nothing shorter than 20 exists");
        assert_eq!(outcome.termination, TerminationReason::Exhausted);
        assert!(
            engine.posted_precedences().is_empty(),
            "the caller's starting state is left in place"
        );
    }

    #[test]
    fn test_lower_bound_stops_at_first_matching_schedule() {
        let (mut engine, _, _, project) = machine(&[(10, 0), (10, 5)]);

        let outcome = ExhaustiveSolver::new(config().with_lower_bound(25))
            .solve(&mut engine, &project)
            .unwrap();

        assert_eq!(outcome.termination, TerminationReason::BoundsCrossed);
        assert_eq!(outcome.best_makespan, Some(25));
    }

    #[test]
    fn test_oracle_steers_first_descent() {
        let (mut engine, r, acts, project) = machine(&[(10, 0), (10, 5)]);
        let preferred = Precedence::new(ResourceView::new(r), acts[0], acts[1], 0);

        let outcome = ExhaustiveSolver::new(config().with_oracle([preferred]))
            .solve(&mut engine, &project)
            .unwrap();

        assert_eq!(outcome.makespan_history, vec![20], "optimum found on the first descent");
        assert_eq!(outcome.best_makespan, Some(20));
    }

    #[test]
    fn test_zero_timeout_executes_nothing() {
        let (mut engine, _, _, project) = machine(&[(10, 0), (10, 5)]);

        let outcome = ExhaustiveSolver::new(config().with_timeout(Duration::ZERO))
            .solve(&mut engine, &project)
            .unwrap();

        assert!(outcome.timed_out);
        assert_eq!(outcome.termination, TerminationReason::TimedOut);
        assert_eq!(outcome.statistics.decisions_executed, 0);
    }

    #[test]
    fn test_inconsistent_branch_is_pruned() {
        // j1 must start by t=5, so j0 before j1 is inconsistent.
        let mut engine = MockEngine::new();
        let r = engine.add_resource("machine", 1.0);
        let j0 = engine.add_activity("j0", 10, 0, 1000);
        let j1 = engine.add_activity("j1", 10, 0, 5);
        engine.add_demand(r, j0, 1.0);
        engine.add_demand(r, j1, 1.0);
        engine.add_sink("end", 10_000);
        let project = Project::from_engine(&engine).unwrap();

        let outcome = ExhaustiveSolver::new(config())
            .solve(&mut engine, &project)
            .unwrap();

        assert_eq!(outcome.best_makespan, Some(20));
        assert_eq!(engine.posted_precedences(), vec![(r, j1, j0)]);
        assert_eq!(engine.violation(), 0.0);
    }

    #[test]
    fn test_round_robin_rotates_between_tied_resources() {
        let mut engine = MockEngine::new();
        let r0 = engine.add_resource("left", 1.0);
        let r1 = engine.add_resource("right", 1.0);
        for r in [r0, r1] {
            for name in ["x", "y"] {
                let a = engine.add_activity(format!("{name}{}", r.0), 10, 0, 1000);
                engine.add_demand(r, a, 1.0);
            }
        }
        let project = Project::from_engine(&engine).unwrap();
        let cfg = config();
        let mut search = BranchAndBound::new(&cfg, &project);

        let first = search.next_decision_point(&engine).unwrap();
        assert_eq!(search.arena[first].resource().id(), r0);
        search.discard(first);
        let second = search.next_decision_point(&engine).unwrap();
        assert_eq!(search.arena[second].resource().id(), r1);

        let cfg = config().with_scan_policy(ScanPolicy::FromFirst);
        let mut search = BranchAndBound::new(&cfg, &project);
        let first = search.next_decision_point(&engine).unwrap();
        search.discard(first);
        let second = search.next_decision_point(&engine).unwrap();
        assert_eq!(search.arena[second].resource().id(), r0);
    }

    #[test]
    fn test_backtrack_on_empty_stack_is_an_error() {
        let (mut engine, _, _, project) = machine(&[(10, 0)]);
        let cfg = config();
        let mut search = BranchAndBound::new(&cfg, &project);
        assert_eq!(
            search.backtrack(&mut engine),
            Err(SearchError::EmptyDecisionStack)
        );
    }

    #[test]
    fn test_single_oversized_activity_has_no_decisions() {
        let mut engine = MockEngine::new();
        let r = engine.add_resource("machine", 1.0);
        let a = engine.add_activity("heavy", 10, 0, 100);
        engine.add_demand(r, a, 2.0);
        engine.add_sink("end", 1000);
        let project = Project::from_engine(&engine).unwrap();

        let outcome = ExhaustiveSolver::new(config())
            .solve(&mut engine, &project)
            .unwrap();

        assert_eq!(outcome.best_makespan, None);
        assert_eq!(outcome.termination, TerminationReason::Exhausted);
        assert_eq!(outcome.statistics.decisions_executed, 0);
        assert!(engine.posted_precedences().is_empty());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_never_exceeds_upper_bound(
            jobs in proptest::collection::vec((1i64..15, 0i64..20), 2..5),
            slack in 0i64..30,
        ) {
            let (mut engine, _, _, project) = machine(&jobs);
            let total: i64 = jobs.iter().map(|j| j.0).sum();
            let upper = total + slack;

            let outcome = ExhaustiveSolver::new(config().with_upper_bound(upper))
                .solve(&mut engine, &project)
                .unwrap();

            if let Some(best) = outcome.best_makespan {
                prop_assert!(best < upper);
                prop_assert_eq!(project.makespan(&engine), best);
            }
            prop_assert!(outcome.makespan_history.windows(2).all(|w| w[1] < w[0]));
            prop_assert!(outcome.makespan_history.iter().all(|&m| m < upper));
        }
    }
}
