//! Iterative-Flatten-Relax configuration.

use std::time::Duration;

use crate::model::CandidateOrder;
use crate::nogood::DEFAULT_TENURE;

/// Configuration parameters for the Iterative-Flatten-Relax solver.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_pcp::ifr::IfrConfig;
///
/// let config = IfrConfig::default()
///     .with_timeout(Duration::from_secs(5))
///     .with_lower_bound(42)
///     .with_relax_probability(0.3)
///     .with_seed(7);
/// assert_eq!(config.max_stable, 10_000);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IfrConfig {
    /// Wall-clock budget.
    pub timeout: Duration,
    /// Stop as soon as the best makespan is at or below this value.
    pub lower_bound: i64,
    /// Stop after this many consecutive iterations without improvement.
    pub max_stable: usize,
    /// Chance that the relax phase retracts each critical precedence.
    pub relax_probability: f64,
    /// Iterations an inconsistent ordering stays forbidden.
    pub tabu_tenure: usize,
    /// When set, only precedences whose successor starts at most this long
    /// after the predecessor ends are critical. `None` marks all of them.
    pub critical_slack: Option<i64>,
    /// Order in which conflict candidates are tried.
    pub candidate_order: CandidateOrder,
    /// Random seed (None for random).
    pub seed: Option<u64>,
}

impl Default for IfrConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            lower_bound: 0,
            max_stable: 10_000,
            relax_probability: 0.2,
            tabu_tenure: DEFAULT_TENURE,
            critical_slack: None,
            candidate_order: CandidateOrder::default(),
            seed: None,
        }
    }
}

impl IfrConfig {
    /// Sets the wall-clock budget.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the makespan at which search stops.
    pub fn with_lower_bound(mut self, bound: i64) -> Self {
        self.lower_bound = bound;
        self
    }

    /// Sets the number of iterations without improvement before stopping.
    pub fn with_max_stable(mut self, n: usize) -> Self {
        self.max_stable = n;
        self
    }

    /// Sets the chance of retracting each critical precedence.
    pub fn with_relax_probability(mut self, p: f64) -> Self {
        self.relax_probability = p;
        self
    }

    /// Sets how many iterations a no-good stays active.
    pub fn with_tabu_tenure(mut self, tenure: usize) -> Self {
        self.tabu_tenure = tenure;
        self
    }

    /// Restricts the relax phase to precedences with at most `slack`.
    pub fn with_critical_slack(mut self, slack: i64) -> Self {
        self.critical_slack = Some(slack);
        self
    }

    /// Sets the ranking of conflict orderings.
    pub fn with_candidate_order(mut self, order: CandidateOrder) -> Self {
        self.candidate_order = order;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.relax_probability) {
            return Err(format!(
                "relax_probability must be in [0, 1], got {}",
                self.relax_probability
            ));
        }
        if self.tabu_tenure == 0 {
            return Err("tabu_tenure must be at least 1".into());
        }
        Ok(())
    }
}
