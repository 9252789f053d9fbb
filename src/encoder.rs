//! Builds the constraint model from configuration and candidates.

use crate::cp::{CpModel, RoleVar, SessionObjective, SessionTerm};
use crate::eligibility::Eligibility;
use crate::error::{ConfigError, Result};
use crate::model::{Candidate, CandidateId, CastingConfig, RoleId};
use crate::scoring::Scorer;
use std::collections::HashSet;
use tracing::debug;

/// Encodes a casting problem.
///
/// - one variable per configured role (same order), domain = permitted
///   candidates plus the role's sentinel; roles none of whose sessions are
///   active get a sentinel-only domain
/// - one all-different constraint over every role
/// - one objective term per active session that has roles
///
/// Fails on invalid configuration, duplicate candidate keys, or score
/// ranges that could overflow.
pub fn encode(config: &CastingConfig, candidates: &[Candidate]) -> Result<CpModel> {
    config.validate()?;

    let mut keys = HashSet::with_capacity(candidates.len());
    for c in candidates {
        if !keys.insert(c.key.as_str()) {
            return Err(ConfigError::DuplicateCandidate(c.key.clone()));
        }
    }

    let active = config.active_sessions();
    let eligibility = Eligibility::new(&config.vocabulary);
    let scorer = Scorer::new(config.bias);

    let mut model = CpModel::new("casting", candidates.len());
    for (i, role) in config.roles.iter().enumerate() {
        let mut var = RoleVar::new(RoleId(i), role.name.as_str());
        if role.sessions(&config.vocabulary).any(|s| active.contains(&s)) {
            for (j, candidate) in candidates.iter().enumerate() {
                if eligibility.permit(candidate, role) {
                    var = var.with_value(CandidateId(j), scorer.score(candidate, role));
                }
            }
        } else {
            debug!(role = %role.name, "role has no active session; left unfilled");
        }
        if var.is_fixed() {
            debug!(role = %role.name, "no eligible candidates");
        }
        model.add_var(var);
    }

    model.add_all_different((0..config.roles.len()).map(RoleId).collect());

    let mut sessions = Vec::with_capacity(active.len());
    for session in active {
        let roles: Vec<RoleId> = config
            .roles
            .iter()
            .enumerate()
            .filter(|(_, r)| r.carries(session))
            .map(|(i, _)| RoleId(i))
            .collect();
        if roles.is_empty() {
            debug!(session, "active session has no roles");
            continue;
        }
        sessions.push(SessionTerm {
            name: session.to_string(),
            roles,
        });
    }
    model.set_objective(SessionObjective { sessions });

    model.validate()?;

    debug!(
        roles = model.var_count(),
        candidates = candidates.len(),
        sessions = model.objective.sessions.len(),
        domain_values = model.vars.iter().map(|v| v.domain.len()).sum::<usize>(),
        "encoded casting model"
    );
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Preference, Role, Vocabulary};

    fn config() -> CastingConfig {
        CastingConfig::default()
            .with_vocabulary(
                Vocabulary::new()
                    .with_sessions(["friEve", "satEve"])
                    .with_traits(["spy", "liar"]),
            )
            .with_role(Role::new("fri.zeus", ["friEve", "spy"]))
            .with_role(Role::new("fri.hera", ["friEve", "liar"]))
            .with_role(Role::new("sat.zeus", ["satEve", "spy"]))
            .with_bias(3)
    }

    fn candidates() -> Vec<Candidate> {
        vec![
            Candidate::new("ana")
                .with_availability(["friEve"])
                .with_preference("spy", Preference::Preferred),
            Candidate::new("bo")
                .with_availability(["friEve", "satEve"])
                .with_preference("liar", Preference::Veto),
        ]
    }

    #[test]
    fn test_domains() {
        let model = encode(&config(), &candidates()).unwrap();
        assert_eq!(model.var_count(), 3);

        let zeus = &model.vars[0];
        assert_eq!(zeus.score_of(CandidateId(0)), Some(4));
        assert_eq!(zeus.score_of(CandidateId(1)), Some(3));

        let hera = &model.vars[1];
        assert_eq!(hera.score_of(CandidateId(0)), Some(3));
        assert_eq!(hera.score_of(CandidateId(1)), None);

        let sat = &model.vars[2];
        assert_eq!(sat.domain.len(), 1);
        assert_eq!(sat.score_of(CandidateId(1)), Some(3));
    }

    #[test]
    fn test_sessions_and_constraint() {
        let model = encode(&config(), &candidates()).unwrap();
        assert_eq!(model.constraint_count(), 1);
        let names: Vec<_> = model.objective.sessions.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["friEve", "satEve"]);
        assert_eq!(model.objective.sessions[0].roles, vec![RoleId(0), RoleId(1)]);
    }

    #[test]
    fn test_inactive_session_roles_fixed() {
        let model = encode(&config().with_sessions(["satEve"]), &candidates()).unwrap();
        assert!(model.vars[0].is_fixed());
        assert!(model.vars[1].is_fixed());
        assert!(!model.vars[2].is_fixed());
        assert_eq!(model.objective.sessions.len(), 1);
    }

    #[test]
    fn test_duplicate_candidate() {
        let mut cs = candidates();
        cs.push(Candidate::new("ana"));
        assert_eq!(
            encode(&config(), &cs),
            Err(ConfigError::DuplicateCandidate("ana".into()))
        );
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let bad = config().with_role(Role::new("ghost", ["spy"]));
        assert_eq!(
            encode(&bad, &candidates()),
            Err(ConfigError::MissingSession("ghost".into()))
        );
    }

    #[test]
    fn test_empty_problem() {
        let model = encode(&CastingConfig::default(), &[]).unwrap();
        assert_eq!(model.var_count(), 0);
        assert!(model.objective.sessions.is_empty());
    }
}
