//! Ordered set of applied precedences.

use std::collections::HashSet;

use super::precedence::Precedence;

/// Precedences in application order with constant-time membership.
#[derive(Debug, Clone, Default)]
pub struct PrecedenceSet {
    items: Vec<Precedence>,
    index: HashSet<Precedence>,
}

impl PrecedenceSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `p`; returns `false` and leaves the set unchanged if an equal
    /// precedence is already present.
    pub fn insert(&mut self, p: Precedence) -> bool {
        if !self.index.insert(p) {
            return false;
        }
        self.items.push(p);
        true
    }

    /// Removes `p`; returns whether it was present.
    pub fn remove(&mut self, p: &Precedence) -> bool {
        if !self.index.remove(p) {
            return false;
        }
        self.items.retain(|q| q != p);
        true
    }

    /// Whether an equal precedence is present.
    pub fn contains(&self, p: &Precedence) -> bool {
        self.index.contains(p)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.index.clear();
    }

    /// Iterates in application order.
    pub fn iter(&self) -> std::slice::Iter<'_, Precedence> {
        self.items.iter()
    }

    /// Members in application order.
    pub fn as_slice(&self) -> &[Precedence] {
        &self.items
    }

    /// Re-evaluates the critical flag of every member.
    pub fn mark_critical<F: FnMut(&Precedence) -> bool>(&mut self, mut is_critical: F) {
        for p in &mut self.items {
            *p = p.with_critical(is_critical(p));
        }
    }
}

impl FromIterator<Precedence> for PrecedenceSet {
    fn from_iter<I: IntoIterator<Item = Precedence>>(iter: I) -> Self {
        let mut set = Self::new();
        for p in iter {
            set.insert(p);
        }
        set
    }
}

impl<'a> IntoIterator for &'a PrecedenceSet {
    type Item = &'a Precedence;
    type IntoIter = std::slice::Iter<'a, Precedence>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Renders precedences as `{pred<succ}` tokens ordered by predecessor then
/// successor.
pub fn solution_string(precedences: &[Precedence]) -> String {
    let mut sorted = precedences.to_vec();
    sorted.sort();
    sorted.iter().map(ToString::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{ActivityId, ResourceId, ResourceView};

    fn prec(pred: usize, succ: usize) -> Precedence {
        Precedence::new(
            ResourceView::new(ResourceId(0)),
            ActivityId(pred),
            ActivityId(succ),
            0,
        )
    }

    #[test]
    fn test_insert_rejects_duplicates() {
        let mut set = PrecedenceSet::new();
        assert!(set.insert(prec(1, 2)));
        assert!(!set.insert(prec(1, 2)));
        assert!(set.insert(prec(2, 1)));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut set: PrecedenceSet = [prec(3, 4), prec(1, 2), prec(5, 6)].into_iter().collect();
        assert!(set.remove(&prec(1, 2)));
        assert!(!set.remove(&prec(1, 2)));
        assert!(!set.contains(&prec(1, 2)));
        assert_eq!(set.as_slice(), &[prec(3, 4), prec(5, 6)]);
    }

    #[test]
    fn test_mark_critical() {
        let mut set: PrecedenceSet = [prec(1, 2), prec(2, 3)].into_iter().collect();
        set.mark_critical(|p| p.pred() == ActivityId(2));
        let flags: Vec<bool> = set.iter().map(|p| p.is_critical()).collect();
        assert_eq!(flags, vec![false, true]);
    }

    #[test]
    fn test_solution_string_is_sorted() {
        let set: PrecedenceSet = [prec(3, 1), prec(1, 2), prec(1, 0)].into_iter().collect();
        assert_eq!(solution_string(set.as_slice()), "{1<0}{1<2}{3<1}");
        assert_eq!(solution_string(&[]), "");
    }
}
