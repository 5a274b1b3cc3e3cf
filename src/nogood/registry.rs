//! Iteration-stamped registry of forbidden orderings.

use std::collections::HashMap;

use crate::engine::ActivityId;

/// Number of iterations a pair stays forbidden unless configured otherwise.
pub const DEFAULT_TENURE: usize = 1;

/// Forbidden `(pred, succ)` pairs keyed to the iteration they expire at.
///
/// # Examples
///
/// ```
/// use u_pcp::engine::ActivityId;
/// use u_pcp::nogood::NoGoodRegistry;
///
/// let mut nogoods = NoGoodRegistry::new(2);
/// nogoods.forbid(ActivityId(0), ActivityId(1));
/// assert!(nogoods.is_forbidden(ActivityId(0), ActivityId(1)));
/// assert!(!nogoods.is_forbidden(ActivityId(1), ActivityId(0)));
///
/// nogoods.advance();
/// assert!(nogoods.is_forbidden(ActivityId(0), ActivityId(1)));
/// nogoods.advance();
/// assert!(!nogoods.is_forbidden(ActivityId(0), ActivityId(1)));
/// ```
#[derive(Debug, Clone)]
pub struct NoGoodRegistry {
    tenure: usize,
    iteration: usize,
    expiry: HashMap<(ActivityId, ActivityId), usize>,
}

impl Default for NoGoodRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_TENURE)
    }
}

impl NoGoodRegistry {
    /// Creates an empty registry whose entries last `tenure` iterations.
    pub fn new(tenure: usize) -> Self {
        Self {
            tenure,
            iteration: 0,
            expiry: HashMap::new(),
        }
    }

    /// Forbids `pred < succ` until `tenure` more iterations have passed.
    /// Renewing an existing entry pushes its expiry forward.
    pub fn forbid(&mut self, pred: ActivityId, succ: ActivityId) {
        self.expiry
            .insert((pred, succ), self.iteration + self.tenure);
    }

    /// Whether `pred < succ` is currently forbidden.
    pub fn is_forbidden(&self, pred: ActivityId, succ: ActivityId) -> bool {
        self.expiry
            .get(&(pred, succ))
            .is_some_and(|&expires| expires > self.iteration)
    }

    /// Moves to the next iteration.
    pub fn advance(&mut self) {
        self.iteration += 1;
    }

    /// Current iteration counter.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Iterations a new no-good stays active.
    pub fn tenure(&self) -> usize {
        self.tenure
    }

    /// Stored entries, stale ones included.
    pub fn len(&self) -> usize {
        self.expiry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expiry.is_empty()
    }

    /// Entries still in force.
    pub fn active(&self) -> usize {
        self.expiry
            .values()
            .filter(|&&expires| expires > self.iteration)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_unknown_pair_is_allowed() {
        let nogoods = NoGoodRegistry::default();
        assert!(!nogoods.is_forbidden(ActivityId(0), ActivityId(1)));
        assert!(nogoods.is_empty());
    }

    #[test]
    fn test_default_tenure_expires_after_one_iteration() {
        let mut nogoods = NoGoodRegistry::default();
        nogoods.forbid(ActivityId(3), ActivityId(4));
        assert!(nogoods.is_forbidden(ActivityId(3), ActivityId(4)));
        nogoods.advance();
        assert!(!nogoods.is_forbidden(ActivityId(3), ActivityId(4)));
        assert_eq!(nogoods.len(), 1, "stale entries are kept");
        assert_eq!(nogoods.active(), 0);
    }

    #[test]
    fn test_renewal_extends_expiry() {
        let mut nogoods = NoGoodRegistry::new(2);
        nogoods.forbid(ActivityId(0), ActivityId(1));
        nogoods.advance();
        nogoods.forbid(ActivityId(0), ActivityId(1));
        nogoods.advance();
        nogoods.advance();
        assert!(!nogoods.is_forbidden(ActivityId(0), ActivityId(1)));

        let mut renewed = NoGoodRegistry::new(2);
        renewed.forbid(ActivityId(0), ActivityId(1));
        renewed.advance();
        renewed.forbid(ActivityId(0), ActivityId(1));
        renewed.advance();
        assert!(
            renewed.is_forbidden(ActivityId(0), ActivityId(1)),
            "renewed at iteration 1 with tenure 2 lasts through iteration 2"
        );
    }

    proptest! {
        #[test]
        fn prop_forbidden_for_exactly_tenure_iterations(
            tenure in 1usize..20,
            warmup in 0usize..50,
            pred in 0usize..10,
            succ in 0usize..10,
        ) {
            let mut nogoods = NoGoodRegistry::new(tenure);
            for _ in 0..warmup {
                nogoods.advance();
            }
            let (p, s) = (ActivityId(pred), ActivityId(succ));
            nogoods.forbid(p, s);
            for _ in 0..tenure {
                prop_assert!(nogoods.is_forbidden(p, s));
                nogoods.advance();
            }
            prop_assert!(!nogoods.is_forbidden(p, s));
        }
    }
}
