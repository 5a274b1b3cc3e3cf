//! Decision points of the branch-and-bound tree.

use std::collections::HashSet;

use log::error;

use crate::engine::ResourceView;
use crate::error::SearchError;
use crate::model::Precedence;

/// One branching point: a conflict on `resource` at `time` and the orderings
/// that may resolve it.
#[derive(Debug, Clone)]
pub struct DecisionPoint {
    resource: ResourceView,
    time: i64,
    candidates: Vec<Precedence>,
    executed: Option<Precedence>,
}

impl DecisionPoint {
    /// Creates a point whose untried candidates are `candidates`, already in
    /// trial order.
    pub fn new(resource: ResourceView, time: i64, candidates: Vec<Precedence>) -> Self {
        Self {
            resource,
            time,
            candidates,
            executed: None,
        }
    }

    /// Resource whose violation opened this point.
    pub fn resource(&self) -> ResourceView {
        self.resource
    }

    /// Time of that violation.
    pub fn time(&self) -> i64 {
        self.time
    }

    /// Untried candidates.
    pub fn remaining(&self) -> &[Precedence] {
        &self.candidates
    }

    /// Whether an untried candidate remains.
    pub fn has_next(&self) -> bool {
        !self.candidates.is_empty()
    }

    /// Choice currently applied on behalf of this point.
    pub fn executed(&self) -> Option<Precedence> {
        self.executed
    }

    /// Removes and returns the next candidate: the first one in `oracle`,
    /// otherwise the first in trial order. The choice is remembered for
    /// [`undo`](Self::undo).
    pub fn next_choice(&mut self, oracle: &HashSet<Precedence>) -> Option<Precedence> {
        if self.candidates.is_empty() {
            return None;
        }
        let index = self
            .candidates
            .iter()
            .position(|c| oracle.contains(c))
            .unwrap_or(0);
        let choice = self.candidates.remove(index);
        self.executed = Some(choice);
        Some(choice)
    }

    /// Hands back the executed choice so the caller can retract it.
    ///
    /// # Errors
    ///
    /// [`SearchError::UndoWithoutChoice`] if nothing was executed.
    pub fn undo(&mut self) -> Result<Precedence, SearchError> {
        self.executed.take().ok_or_else(|| {
            let err = SearchError::UndoWithoutChoice {
                resource: self.resource.id(),
                time: self.time,
            };
            error!("{err}");
            err
        })
    }
}
