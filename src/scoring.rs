//! Compatibility score of a (candidate, role) pair.

use crate::model::{Candidate, Role};

/// `bias + Σ candidate.value(a)` over the role's attributes.
///
/// The bias makes casting any willing candidate strictly better than leaving
/// the role empty when preferences would otherwise sum to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scorer {
    pub bias: i64,
}

impl Scorer {
    pub fn new(bias: i64) -> Self {
        Self { bias }
    }

    pub fn score(&self, candidate: &Candidate, role: &Role) -> i64 {
        role.attributes
            .iter()
            .fold(self.bias, |acc, a| acc + candidate.value(a))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Preference;

    #[test]
    fn test_bias_only() {
        let role = Role::new("zeus", ["sunEve", "spy"]);
        let c = Candidate::new("a");
        assert_eq!(Scorer::new(3).score(&c, &role), 3);
    }

    #[test]
    fn test_preferences_add() {
        let role = Role::new("zeus", ["sunEve", "spy", "liar"]);
        let c = Candidate::new("a")
            .with_preference("sunEve", Preference::Preferred)
            .with_preference("spy", Preference::Preferred)
            .with_preference("liar", Preference::Neutral)
            .with_preference("priest", Preference::Preferred);
        assert_eq!(Scorer::new(3).score(&c, &role), 5);
    }

    #[test]
    fn test_veto_counts_negative() {
        let role = Role::new("zeus", ["sunEve", "spy"]);
        let c = Candidate::new("a").with_preference("spy", Preference::Veto);
        assert_eq!(Scorer::new(0).score(&c, &role), -1);
    }
}
