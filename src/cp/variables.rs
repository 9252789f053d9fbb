//! CP variable types.

use crate::model::{CandidateId, RoleBinding, RoleId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A real value in a role variable's domain, with its score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DomainValue {
    pub candidate: CandidateId,
    pub score: i64,
}

/// A finite-domain variable for one role.
///
/// The domain is the listed candidates plus the role's own sentinel
/// (`RoleBinding::Unfilled(role)`), which is always present. Real values are
/// kept best score first; equal scores keep insertion order.
///
/// # Examples
///
/// ```
/// use u_casting::cp::RoleVar;
/// use u_casting::model::{CandidateId, RoleBinding, RoleId};
///
/// let var = RoleVar::new(RoleId(0), "zeus")
///     .with_value(CandidateId(0), 3)
///     .with_value(CandidateId(1), 5);
/// assert_eq!(var.domain_size(), 3);
/// assert_eq!(var.best_score(), Some(5));
/// assert!(var.contains(RoleBinding::Unfilled(RoleId(0))));
/// assert!(!var.contains(RoleBinding::Unfilled(RoleId(1))));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RoleVar {
    /// The role this variable decides.
    pub role: RoleId,
    /// Variable name (the role name).
    pub name: String,
    /// Eligible candidates, best score first.
    pub domain: Vec<DomainValue>,
}

impl RoleVar {
    /// Creates a variable whose domain is only the sentinel.
    pub fn new(role: RoleId, name: impl Into<String>) -> Self {
        Self {
            role,
            name: name.into(),
            domain: Vec::new(),
        }
    }

    /// Adds a candidate to the domain.
    pub fn with_value(mut self, candidate: CandidateId, score: i64) -> Self {
        let at = self.domain.partition_point(|v| v.score >= score);
        self.domain.insert(at, DomainValue { candidate, score });
        self
    }

    /// Number of values including the sentinel.
    pub fn domain_size(&self) -> usize {
        self.domain.len() + 1
    }

    /// Whether the sentinel is the only value.
    pub fn is_fixed(&self) -> bool {
        self.domain.is_empty()
    }

    pub fn sentinel(&self) -> RoleBinding {
        RoleBinding::Unfilled(self.role)
    }

    pub fn score_of(&self, candidate: CandidateId) -> Option<i64> {
        self.domain
            .iter()
            .find(|v| v.candidate == candidate)
            .map(|v| v.score)
    }

    pub fn best_score(&self) -> Option<i64> {
        self.domain.first().map(|v| v.score)
    }

    /// Largest score magnitude in the domain (0 if empty).
    pub fn max_abs_score(&self) -> i64 {
        self.domain
            .iter()
            .map(|v| v.score.saturating_abs())
            .max()
            .unwrap_or(0)
    }

    pub fn contains(&self, binding: RoleBinding) -> bool {
        match binding {
            RoleBinding::Real(c) => self.score_of(c).is_some(),
            RoleBinding::Unfilled(r) => r == self.role,
        }
    }

    /// Domain values in branching order: real values, then the sentinel.
    pub fn values(&self) -> impl Iterator<Item = RoleBinding> + '_ {
        self.domain
            .iter()
            .map(|v| RoleBinding::Real(v.candidate))
            .chain(std::iter::once(self.sentinel()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_only() {
        let v = RoleVar::new(RoleId(2), "zeus");
        assert!(v.is_fixed());
        assert_eq!(v.domain_size(), 1);
        assert_eq!(v.best_score(), None);
        assert_eq!(v.values().collect::<Vec<_>>(), vec![RoleBinding::Unfilled(RoleId(2))]);
    }

    #[test]
    fn test_domain_sorted_best_first() {
        let v = RoleVar::new(RoleId(0), "zeus")
            .with_value(CandidateId(0), 3)
            .with_value(CandidateId(1), 5)
            .with_value(CandidateId(2), 3)
            .with_value(CandidateId(3), -2);
        let order: Vec<_> = v.domain.iter().map(|d| d.candidate.0).collect();
        assert_eq!(order, vec![1, 0, 2, 3]);
        assert_eq!(v.max_abs_score(), 5);
        assert_eq!(v.score_of(CandidateId(3)), Some(-2));
        assert_eq!(v.score_of(CandidateId(9)), None);
    }

    #[test]
    fn test_values_end_with_sentinel() {
        let v = RoleVar::new(RoleId(1), "hera").with_value(CandidateId(4), 1);
        let values: Vec<_> = v.values().collect();
        assert_eq!(
            values,
            vec![RoleBinding::Real(CandidateId(4)), RoleBinding::Unfilled(RoleId(1))]
        );
    }
}
