//! Eligibility listings: who may play what, and how well.
//!
//! Useful for checking applications before a run, e.g. to spot a role
//! nobody can play or an applicant who can play nothing.

use crate::eligibility::Eligibility;
use crate::model::{Candidate, CastingConfig};
use crate::scoring::Scorer;
use std::cmp::Reverse;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A scored option: a candidate key for a role, or a role name for a candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScoredOption {
    pub name: String,
    pub score: i64,
}

/// Candidates who may play `role`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RoleOptions {
    pub role: String,
    /// Best score first.
    pub candidates: Vec<ScoredOption>,
}

/// Roles `candidate` may play.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CandidateOptions {
    pub candidate: String,
    /// Best score first.
    pub roles: Vec<ScoredOption>,
}

/// For every role, the permitted candidates and their scores.
pub fn plausible(config: &CastingConfig, candidates: &[Candidate]) -> Vec<RoleOptions> {
    let eligibility = Eligibility::new(&config.vocabulary);
    let scorer = Scorer::new(config.bias);
    config
        .roles
        .iter()
        .map(|role| {
            let mut options: Vec<ScoredOption> = candidates
                .iter()
                .filter(|c| eligibility.permit(c, role))
                .map(|c| ScoredOption {
                    name: c.key.clone(),
                    score: scorer.score(c, role),
                })
                .collect();
            options.sort_by_key(|o| Reverse(o.score));
            RoleOptions {
                role: role.name.clone(),
                candidates: options,
            }
        })
        .collect()
}

/// For every candidate, the roles they may play and their scores.
pub fn preferences(config: &CastingConfig, candidates: &[Candidate]) -> Vec<CandidateOptions> {
    let eligibility = Eligibility::new(&config.vocabulary);
    let scorer = Scorer::new(config.bias);
    candidates
        .iter()
        .map(|c| {
            let mut options: Vec<ScoredOption> = config
                .roles
                .iter()
                .filter(|role| eligibility.permit(c, role))
                .map(|role| ScoredOption {
                    name: role.name.clone(),
                    score: scorer.score(c, role),
                })
                .collect();
            options.sort_by_key(|o| Reverse(o.score));
            CandidateOptions {
                candidate: c.key.clone(),
                roles: options,
            }
        })
        .collect()
}
