//! Iterative-Flatten-Relax execution loop.
//!
//! # Algorithm
//!
//! 1. Flatten: while some resource is over capacity, post the tightest
//!    admissible ordering between two activities in its conflict set.
//!    Orderings that make the engine inconsistent are retracted and become
//!    no-goods.
//! 2. Keep the schedule if it is violation-free and shorter than the best.
//! 3. Relax: retract each critical precedence with a fixed probability
//!    (at least one), then flatten again.
//! 4. Stop on stagnation, on reaching the lower bound, or on timeout, and
//!    reinstate the best schedule.

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::IfrConfig;
use crate::engine::{PropagationEngine, ResourceView};
use crate::error::SearchError;
use crate::model::{Precedence, Project};
use crate::nogood::NoGoodRegistry;
use crate::solver::{Budget, ScheduleSolver, SolveOutcome, TerminationReason, Workspace};

/// Iterative-Flatten-Relax solver.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_pcp::engine::MockEngine;
/// use u_pcp::ifr::{IfrConfig, IfrSolver};
/// use u_pcp::model::Project;
/// use u_pcp::solver::ScheduleSolver;
///
/// let mut engine = MockEngine::new();
/// let crane = engine.add_resource("crane", 1.0);
/// for name in ["a", "b", "c"] {
///     let act = engine.add_activity(name, 10, 0, 100);
///     engine.add_demand(crane, act, 1.0);
/// }
/// engine.add_sink("end", 1000);
///
/// let project = Project::from_engine(&engine).unwrap();
/// let config = IfrConfig::default()
///     .with_timeout(Duration::from_secs(5))
///     .with_max_stable(20)
///     .with_seed(1);
/// let outcome = IfrSolver::new(config).solve(&mut engine, &project).unwrap();
/// assert_eq!(outcome.best_makespan, Some(30));
/// ```
#[derive(Debug, Clone, Default)]
pub struct IfrSolver {
    config: IfrConfig,
}

impl IfrSolver {
    /// Creates a solver with `config`.
    pub fn new(config: IfrConfig) -> Self {
        Self { config }
    }

    /// The solver configuration.
    pub fn config(&self) -> &IfrConfig {
        &self.config
    }

    /// Runs the search with a caller-supplied random source.
    pub fn solve_with_rng<E: PropagationEngine, R: Rng>(
        &self,
        engine: &mut E,
        project: &Project,
        rng: &mut R,
    ) -> Result<SolveOutcome, SearchError> {
        self.config.validate().map_err(SearchError::InvalidConfig)?;
        debug!(
            "{}: {} resources, {} activities, timeout {:?}, lower bound {}",
            NAME,
            project.resources().len(),
            project.activities().len(),
            self.config.timeout,
            self.config.lower_bound
        );

        engine.propagate();
        let mut search = FlattenRelax::new(&self.config, project);
        let termination = search.run(engine, rng);
        Ok(search.finish(engine, termination))
    }
}

const NAME: &str = "IFIR";

impl ScheduleSolver for IfrSolver {
    fn name(&self) -> &'static str {
        NAME
    }

    fn solve<E: PropagationEngine>(
        &mut self,
        engine: &mut E,
        project: &Project,
    ) -> Result<SolveOutcome, SearchError> {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };
        self.solve_with_rng(engine, project, &mut rng)
    }
}

/// State of one flatten/relax run.
struct FlattenRelax<'a> {
    config: &'a IfrConfig,
    project: &'a Project,
    budget: Budget,
    workspace: Workspace,
    nogoods: NoGoodRegistry,
    stable: usize,
    timed_out: bool,
}

impl<'a> FlattenRelax<'a> {
    fn new(config: &'a IfrConfig, project: &'a Project) -> Self {
        Self {
            config,
            project,
            budget: Budget::start(config.timeout),
            workspace: Workspace::new(),
            nogoods: NoGoodRegistry::new(config.tabu_tenure),
            stable: 0,
            timed_out: false,
        }
    }

    fn run<E: PropagationEngine, R: Rng>(
        &mut self,
        engine: &mut E,
        rng: &mut R,
    ) -> TerminationReason {
        loop {
            let clean = self.flatten(engine);
            self.update_solution(engine, clean);
            self.update_critical_precedences(engine);

            if self.stable > self.config.max_stable {
                return TerminationReason::StabilityLimit;
            }
            if self
                .workspace
                .best_makespan()
                .is_some_and(|best| best <= self.config.lower_bound)
            {
                return TerminationReason::BoundsCrossed;
            }
            if self.timed_out || self.budget.is_exhausted() {
                self.timed_out = true;
                return TerminationReason::TimedOut;
            }

            self.relax(engine, rng);
            self.nogoods.advance();
            self.workspace.statistics_mut().iterations += 1;
        }
    }

    /// Posts precedences until no resource is over capacity or a full pass
    /// makes no progress. Returns `true` only if the last pass completed and
    /// found no violation.
    fn flatten<E: PropagationEngine>(&mut self, engine: &mut E) -> bool {
        let project = self.project;
        loop {
            let mut violated = false;
            let mut posted = false;
            for &resource in project.resources() {
                if self.budget.is_exhausted() {
                    self.timed_out = true;
                    return false;
                }
                if let Some(violation) = resource.max_violation(engine) {
                    violated = true;
                    if self.post_precedence(engine, resource, violation.time) {
                        posted = true;
                    }
                }
            }
            if !violated {
                return true;
            }
            if !posted {
                return false;
            }
            if self.budget.is_exhausted() {
                self.timed_out = true;
                return false;
            }
        }
    }

    /// Tries the admissible orderings of the conflict at `time` in candidate
    /// order and keeps the first one the engine accepts.
    fn post_precedence<E: PropagationEngine>(
        &mut self,
        engine: &mut E,
        resource: ResourceView,
        time: i64,
    ) -> bool {
        let pairs = resource.conflict_pairs(engine, time);
        if pairs.is_empty() {
            warn!(
                "{} over capacity at t={} but its conflict set has fewer than two activities",
                resource.name(engine),
                time
            );
            return false;
        }

        let mut candidates: Vec<Precedence> = pairs
            .into_iter()
            .filter(|&(pred, succ)| pred != succ && !self.nogoods.is_forbidden(pred, succ))
            .map(|(pred, succ)| Precedence::from_engine(&*engine, resource, pred, succ))
            .filter(|p| !self.workspace.applied().contains(p))
            .collect();
        self.config.candidate_order.rank(&mut candidates);

        for candidate in candidates {
            self.workspace.add_precedence(engine, candidate);
            if engine.violation() > 0.0 {
                self.workspace.remove_precedence(engine, &candidate);
                self.nogoods.forbid(candidate.pred(), candidate.succ());
                self.workspace.statistics_mut().no_goods += 1;
                debug!("no-good {} on {}", candidate, resource);
            } else {
                return true;
            }
        }
        false
    }

    fn update_solution<E: PropagationEngine>(&mut self, engine: &E, clean: bool) {
        let makespan = self.project.makespan(engine);
        let feasible = clean && engine.violation() <= 0.0;
        let improved = feasible
            && self
                .workspace
                .best_makespan()
                .map_or(true, |best| makespan < best);

        if improved {
            self.workspace.record_best(makespan, self.budget.elapsed());
            self.stable = 0;
            info!(
                "{}: new best makespan {} after {:?} ({} precedences)",
                NAME,
                makespan,
                self.budget.elapsed(),
                self.workspace.applied().len()
            );
        } else {
            self.stable += 1;
        }
        self.workspace.record_history();
    }

    fn update_critical_precedences<E: PropagationEngine>(&mut self, engine: &E) {
        let Some(slack) = self.config.critical_slack else {
            return;
        };
        self.workspace.mark_critical(|p| {
            let gap = engine.activity_bounds(p.succ()).start.lb
                - engine.activity_bounds(p.pred()).end.lb;
            gap <= slack
        });
    }

    /// Retracts a random subset of the critical precedences, always at least
    /// one, with propagation suspended until the end.
    fn relax<E: PropagationEngine, R: Rng>(&mut self, engine: &mut E, rng: &mut R) {
        let snapshot: Vec<Precedence> = self.workspace.applied().iter().copied().collect();
        let mut retracted = 0usize;

        engine.set_auto_propagation(false);
        for p in snapshot.iter().filter(|p| p.is_critical()) {
            if self.budget.is_exhausted() {
                self.timed_out = true;
                break;
            }
            if rng.random_bool(self.config.relax_probability) {
                self.workspace.remove_precedence(engine, p);
                retracted += 1;
            }
        }
        if retracted == 0 {
            if let Some(first) = snapshot.iter().find(|p| p.is_critical()) {
                self.workspace.remove_precedence(engine, first);
                retracted = 1;
            }
        }
        engine.set_auto_propagation(true);

        debug!(
            "relax: retracted {} of {} precedences",
            retracted,
            snapshot.len()
        );
    }

    fn finish<E: PropagationEngine>(
        mut self,
        engine: &mut E,
        termination: TerminationReason,
    ) -> SolveOutcome {
        self.workspace.restore_best_solution(engine);
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
