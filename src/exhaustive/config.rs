//! Branch-and-bound configuration.

use std::time::Duration;

use crate::model::{CandidateOrder, Precedence};

/// Where the sweep for the next decision point starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScanPolicy {
    /// Each sweep starts one resource after the previous sweep's start, so
    /// resources with equally bad violations take turns.
    #[default]
    RoundRobin,
    /// Every sweep starts at the first resource.
    FromFirst,
}

/// Configuration parameters for the exhaustive solver.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_pcp::exhaustive::{ExhaustiveConfig, ScanPolicy};
///
/// let config = ExhaustiveConfig::default()
///     .with_timeout(Duration::from_secs(10))
///     .with_lower_bound(40)
///     .with_upper_bound(55)
///     .with_scan_policy(ScanPolicy::FromFirst);
/// assert_eq!(config.upper_bound, Some(55));
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExhaustiveConfig {
    /// Wall-clock budget.
    pub timeout: Duration,
    /// The search stops once the best makespan is at or below this value.
    pub lower_bound: i64,
    /// Only schedules strictly shorter than this are accepted. `None` means
    /// unbounded.
    pub upper_bound: Option<i64>,
    /// Preferred orderings, tried first wherever they appear as candidates.
    pub oracle: Vec<Precedence>,
    /// Resource sweep policy.
    pub scan_policy: ScanPolicy,
    /// Order of the remaining candidates.
    pub candidate_order: CandidateOrder,
}

impl Default for ExhaustiveConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            lower_bound: 0,
            upper_bound: None,
            oracle: Vec::new(),
            scan_policy: ScanPolicy::default(),
            candidate_order: CandidateOrder::default(),
        }
    }
}

impl ExhaustiveConfig {
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

    /// Sets the makespan every accepted schedule must beat.
    pub fn with_upper_bound(mut self, bound: i64) -> Self {
        self.upper_bound = Some(bound);
        self
    }

    /// Sets the precedences tried first at each decision point.
    pub fn with_oracle<I: IntoIterator<Item = Precedence>>(mut self, oracle: I) -> Self {
        self.oracle = oracle.into_iter().collect();
        self
    }

    /// Sets how resources are swept for violations.
    pub fn with_scan_policy(mut self, policy: ScanPolicy) -> Self {
        self.scan_policy = policy;
        self
    }

    /// Sets the ranking of candidates at a decision point.
    pub fn with_candidate_order(mut self, order: CandidateOrder) -> Self {
        self.candidate_order = order;
        self
    }
}
