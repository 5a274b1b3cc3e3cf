//! Hybrid orchestrator configuration.

use std::time::Duration;

use crate::exhaustive::ExhaustiveConfig;
use crate::ifr::IfrConfig;

/// Configuration parameters for the hybrid solver.
///
/// `ifr` and `exhaustive` act as templates: their time budgets, bounds and
/// oracle are overwritten per phase, everything else is used as given.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_pcp::hybrid::HybridConfig;
///
/// let config = HybridConfig::default()
///     .with_timeout(Duration::from_secs(10))
///     .with_ifr_fraction(0.25);
/// let (ifr, exhaustive) = config.split_budget();
/// assert_eq!(ifr, Duration::from_millis(2500));
/// assert_eq!(exhaustive, Duration::from_millis(7500));
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HybridConfig {
    /// Total wall-clock budget of both phases.
    pub timeout: Duration,
    /// Target makespan; both phases stop once it is reached.
    pub lower_bound: i64,
    /// Upper bound for the exhaustive phase when the first phase finds no
    /// feasible schedule.
    pub upper_bound: Option<i64>,
    /// Share of the budget given to the flatten/relax phase.
    pub ifr_fraction: f64,
    /// Settings of the flatten/relax phase.
    pub ifr: IfrConfig,
    /// Settings of the exhaustive phase.
    pub exhaustive: ExhaustiveConfig,
}

impl Default for HybridConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            lower_bound: 0,
            upper_bound: None,
            ifr_fraction: 0.5,
            ifr: IfrConfig::default(),
            exhaustive: ExhaustiveConfig::default(),
        }
    }
}

impl HybridConfig {
    /// Sets the total wall-clock budget.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the makespan at which both phases stop.
    pub fn with_lower_bound(mut self, bound: i64) -> Self {
        self.lower_bound = bound;
        self
    }

    /// Sets the fallback upper bound of the exhaustive phase.
    pub fn with_upper_bound(mut self, bound: i64) -> Self {
        self.upper_bound = Some(bound);
        self
    }

    /// Sets the share of the budget given to the first phase.
    pub fn with_ifr_fraction(mut self, fraction: f64) -> Self {
        self.ifr_fraction = fraction;
        self
    }

    /// Sets the first-phase configuration.
    pub fn with_ifr(mut self, ifr: IfrConfig) -> Self {
        self.ifr = ifr;
        self
    }

    /// Sets the exhaustive-phase configuration.
    pub fn with_exhaustive(mut self, exhaustive: ExhaustiveConfig) -> Self {
        self.exhaustive = exhaustive;
        self
    }

    /// Budgets of the two phases. They always add up to `timeout`.
    pub fn split_budget(&self) -> (Duration, Duration) {
        let ifr = self.timeout.mul_f64(self.ifr_fraction);
        (ifr, self.timeout.saturating_sub(ifr))
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.ifr_fraction) {
            return Err(format!(
                "ifr_fraction must be in [0, 1], got {}",
                self.ifr_fraction
            ));
        }
        self.ifr.validate()
    }
}
