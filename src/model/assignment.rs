//! Role bindings and assignments.

use std::collections::HashSet;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Index of a role in the configured role table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RoleId(pub usize);

/// Index of a candidate in the candidate list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CandidateId(pub usize);

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// The value bound to a role variable.
///
/// `Unfilled` is tagged with its own role, so the sentinels of two roles
/// are never equal and one all-different constraint covers every role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RoleBinding {
    Real(CandidateId),
    Unfilled(RoleId),
}

impl RoleBinding {
    pub fn candidate(self) -> Option<CandidateId> {
        match self {
            RoleBinding::Real(c) => Some(c),
            RoleBinding::Unfilled(_) => None,
        }
    }

    pub fn is_filled(self) -> bool {
        matches!(self, RoleBinding::Real(_))
    }
}

/// One binding per role, indexed by [`RoleId`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Assignment {
    bindings: Vec<RoleBinding>,
}

impl Assignment {
    /// Every role bound to its sentinel.
    pub fn unfilled(role_count: usize) -> Self {
        Self {
            bindings: (0..role_count)
                .map(|r| RoleBinding::Unfilled(RoleId(r)))
                .collect(),
        }
    }

    pub fn from_bindings(bindings: Vec<RoleBinding>) -> Self {
        Self { bindings }
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Binding of `role`. Out-of-range roles read as unfilled.
    pub fn get(&self, role: RoleId) -> RoleBinding {
        self.bindings
            .get(role.0)
            .copied()
            .unwrap_or(RoleBinding::Unfilled(role))
    }

    /// Rebinds `role`.
    ///
    /// # Panics
    /// Panics if `role` is out of range; unlike [`Assignment::get`], there is
    /// no binding to write to.
    pub fn set(&mut self, role: RoleId, binding: RoleBinding) {
        self.bindings[role.0] = binding;
    }

    pub fn candidate(&self, role: RoleId) -> Option<CandidateId> {
        self.get(role).candidate()
    }

    pub fn bindings(&self) -> &[RoleBinding] {
        &self.bindings
    }

    /// (role, candidate) pairs for every filled role.
    pub fn cast(&self) -> impl Iterator<Item = (RoleId, CandidateId)> + '_ {
        self.bindings
            .iter()
            .enumerate()
            .filter_map(|(r, b)| b.candidate().map(|c| (RoleId(r), c)))
    }

    pub fn filled_count(&self) -> usize {
        self.bindings.iter().filter(|b| b.is_filled()).count()
    }

    /// All bindings pairwise different (no candidate plays two roles).
    pub fn is_distinct(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.bindings.len());
        self.bindings.iter().all(|b| seen.insert(*b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels_are_distinct() {
        let a = Assignment::unfilled(3);
        assert!(a.is_distinct());
        assert_eq!(a.filled_count(), 0);
        assert_ne!(
            RoleBinding::Unfilled(RoleId(0)),
            RoleBinding::Unfilled(RoleId(1))
        );
    }

    #[test]
    fn test_repeated_candidate_detected() {
        let mut a = Assignment::unfilled(2);
        a.set(RoleId(0), RoleBinding::Real(CandidateId(7)));
        assert!(a.is_distinct());
        a.set(RoleId(1), RoleBinding::Real(CandidateId(7)));
        assert!(!a.is_distinct());
    }

    #[test]
    fn test_out_of_range_reads_unfilled() {
        let a = Assignment::unfilled(1);
        assert_eq!(a.get(RoleId(5)), RoleBinding::Unfilled(RoleId(5)));
        assert_eq!(a.candidate(RoleId(5)), None);
    }

    #[test]
    #[should_panic]
    fn test_out_of_range_set_panics() {
        let mut a = Assignment::unfilled(1);
        a.set(RoleId(5), RoleBinding::Real(CandidateId(0)));
    }

    #[test]
    fn test_cast_iterates_filled_roles() {
        let a = Assignment::from_bindings(vec![
            RoleBinding::Unfilled(RoleId(0)),
            RoleBinding::Real(CandidateId(4)),
        ]);
        assert_eq!(a.cast().collect::<Vec<_>>(), vec![(RoleId(1), CandidateId(4))]);
        assert_eq!(a.candidate(RoleId(0)), None);
        assert_eq!(a.get(RoleId(9)), RoleBinding::Unfilled(RoleId(9)));
    }
}
