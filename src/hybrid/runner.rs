//! Two-phase solve: flatten/relax for an incumbent, then branch and bound.

use std::time::Duration;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::HybridConfig;
use crate::engine::PropagationEngine;
use crate::error::SearchError;
use crate::exhaustive::ExhaustiveSolver;
use crate::ifr::IfrSolver;
use crate::model::Project;
use crate::solver::{Budget, ScheduleSolver, SolveOutcome};

const NAME: &str = "Hybrid";

/// Runs [`IfrSolver`] for an incumbent and an oracle, then
/// [`ExhaustiveSolver`] bounded by that incumbent.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_pcp::engine::MockEngine;
/// use u_pcp::hybrid::{HybridConfig, HybridSolver};
/// use u_pcp::ifr::IfrConfig;
/// use u_pcp::model::Project;
/// use u_pcp::solver::ScheduleSolver;
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
/// let config = HybridConfig::default()
///     .with_timeout(Duration::from_secs(10))
///     .with_ifr(IfrConfig::default().with_max_stable(10).with_seed(3));
/// let outcome = HybridSolver::new(config).solve(&mut engine, &project).unwrap();
/// assert_eq!(outcome.best_makespan, Some(20));
/// ```
#[derive(Debug, Clone, Default)]
pub struct HybridSolver {
    config: HybridConfig,
}

impl HybridSolver {
    /// Creates a solver with `config`.
    pub fn new(config: HybridConfig) -> Self {
        Self { config }
    }

    /// The solver configuration.
    pub fn config(&self) -> &HybridConfig {
        &self.config
    }

    /// Runs both phases with a caller-supplied random source for the
    /// flatten/relax phase.
    pub fn solve_with_rng<E: PropagationEngine, R: Rng>(
        &self,
        engine: &mut E,
        project: &Project,
        rng: &mut R,
    ) -> Result<SolveOutcome, SearchError> {
        self.config.validate().map_err(SearchError::InvalidConfig)?;
        let mut budget = Budget::start(self.config.timeout);
        let (ifr_budget, exhaustive_share) = self.config.split_budget();
        let lower_bound = self.config.lower_bound;

        let ifr_config = self
            .config
            .ifr
            .clone()
            .with_timeout(ifr_budget)
            .with_lower_bound(lower_bound);
        let incumbent = IfrSolver::new(ifr_config).solve_with_rng(engine, project, rng)?;
        debug!(
            "{}: incumbent {:?} after {:?} ({})",
            NAME, incumbent.best_makespan, incumbent.elapsed, incumbent.termination
        );

        let exhaustive_budget = exhaustive_timeout(exhaustive_share, &budget);
        let proven = incumbent
            .best_makespan
            .is_some_and(|best| best <= lower_bound);
        if exhaustive_budget.is_zero() || proven {
            let elapsed = budget.stop();
            return Ok(relabel(incumbent, elapsed));
        }

        incumbent.undo(engine);
        let mut exhaustive_config = self
            .config
            .exhaustive
            .clone()
            .with_timeout(exhaustive_budget)
            .with_lower_bound(lower_bound)
            .with_oracle(incumbent.solution.iter().copied());
        exhaustive_config.upper_bound = incumbent.best_makespan.or(self.config.upper_bound);

        let offset = budget.elapsed();
        let refined = ExhaustiveSolver::new(exhaustive_config).solve(engine, project)?;
        let improved = match (refined.best_makespan, incumbent.best_makespan) {
            (Some(found), Some(known)) => found < known,
            (found, None) => found.is_some(),
            (None, Some(_)) => false,
        };

        let mut statistics = incumbent.statistics;
        statistics.merge(&refined.statistics);
        let timed_out = incumbent.timed_out || refined.timed_out;

        let outcome = if improved {
            let mut history = incumbent.makespan_history;
            history.extend(&refined.makespan_history);
            SolveOutcome {
                solver: NAME.to_string(),
                best_makespan: refined.best_makespan,
                solution: refined.solution,
                elapsed: budget.stop(),
                time_to_best: offset + refined.time_to_best,
                termination: refined.termination,
                timed_out,
                makespan_history: history,
                statistics,
            }
        } else {
            refined.undo(engine);
            incumbent.reapply(engine);
            SolveOutcome {
                termination: refined.termination,
                timed_out,
                statistics,
                ..relabel(incumbent, budget.stop())
            }
        };

        info!(
            "{}: best makespan {:?} ({}) after {:?}",
            NAME,
            outcome.best_makespan,
            if improved { "improved by exhaustive search" } else { "kept incumbent" },
            outcome.elapsed
        );
        Ok(outcome)
    }
}

/// Exhaustive phase budget: its planned share, cut to what the first phase
/// left of the total.
fn exhaustive_timeout(share: Duration, budget: &Budget) -> Duration {
    share.min(budget.remaining())
}

/// The first-phase outcome reported under this solver's name.
fn relabel(incumbent: SolveOutcome, elapsed: Duration) -> SolveOutcome {
    let time_to_best = if incumbent.best_makespan.is_some() {
        incumbent.time_to_best
    } else {
        elapsed
    };
    SolveOutcome {
        solver: NAME.to_string(),
        elapsed,
        time_to_best,
        ..incumbent
    }
}

impl ScheduleSolver for HybridSolver {
    fn name(&self) -> &'static str {
        NAME
    }

    fn solve<E: PropagationEngine>(
        &mut self,
        engine: &mut E,
        project: &Project,
    ) -> Result<SolveOutcome, SearchError> {
        let mut rng = match self.config.ifr.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };
        self.solve_with_rng(engine, project, &mut rng)
    }
}
