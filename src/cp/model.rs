//! CP model definition.

use super::variables::RoleVar;
use crate::error::ConfigError;
use crate::model::{Assignment, RoleId};
use crate::session;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A constraint in the CP model.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Constraint {
    /// Pairwise distinct bindings over the listed role variables.
    ///
    /// Sentinels are role-tagged, so this only ever forbids one candidate
    /// playing two roles.
    AllDifferent {
        vars: Vec<RoleId>,
    },
}

/// The roles making up one session.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SessionTerm {
    /// Session identifier.
    pub name: String,
    /// Roles carrying this session.
    pub roles: Vec<RoleId>,
}

/// Session-gated objective: a session contributes the sum of its roles'
/// scores if every role in it is filled, and nothing otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SessionObjective {
    pub sessions: Vec<SessionTerm>,
}

/// A casting problem in constraint form.
///
/// # Examples
///
/// ```
/// use u_casting::cp::{CpModel, RoleVar, SessionObjective, SessionTerm};
/// use u_casting::model::{CandidateId, RoleId};
///
/// let mut model = CpModel::new("example", 2);
/// let zeus = model.add_var(RoleVar::new(RoleId(0), "zeus").with_value(CandidateId(0), 3));
/// let hera = model.add_var(RoleVar::new(RoleId(1), "hera").with_value(CandidateId(1), 4));
/// model.add_all_different(vec![zeus, hera]);
/// model.set_objective(SessionObjective {
///     sessions: vec![SessionTerm { name: "sunEve".into(), roles: vec![zeus, hera] }],
/// });
/// assert!(model.validate().is_ok());
/// assert_eq!(model.upper_bound(), Some(7));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CpModel {
    /// Model name.
    pub name: String,
    /// One variable per role; `vars[i].role == RoleId(i)`.
    pub vars: Vec<RoleVar>,
    /// Constraints.
    pub constraints: Vec<Constraint>,
    /// Objective to maximize.
    pub objective: SessionObjective,
    /// Number of candidates the domains draw from.
    pub candidate_count: usize,
}

impl CpModel {
    /// Creates a new empty model.
    pub fn new(name: impl Into<String>, candidate_count: usize) -> Self {
        Self {
            name: name.into(),
            vars: Vec::new(),
            constraints: Vec::new(),
            objective: SessionObjective::default(),
            candidate_count,
        }
    }

    /// Adds a role variable and returns its id.
    pub fn add_var(&mut self, var: RoleVar) -> RoleId {
        let id = var.role;
        self.vars.push(var);
        id
    }

    /// Adds a constraint.
    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    /// Convenience: add an all-different constraint.
    pub fn add_all_different(&mut self, vars: Vec<RoleId>) {
        self.constraints.push(Constraint::AllDifferent { vars });
    }

    /// Sets the objective.
    pub fn set_objective(&mut self, objective: SessionObjective) {
        self.objective = objective;
    }

    pub fn var(&self, role: RoleId) -> Option<&RoleVar> {
        self.vars.get(role.0)
    }

    /// Validates the model for consistency.
    ///
    /// Checks variable numbering, that every referenced role and candidate
    /// exists, and that objective accumulation cannot overflow.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (i, var) in self.vars.iter().enumerate() {
            if var.role.0 != i {
                return Err(ConfigError::InvalidModel(format!(
                    "variable `{}` at position {i} has id {}",
                    var.name, var.role
                )));
            }
            if let Some(v) = var
                .domain
                .iter()
                .find(|v| v.candidate.0 >= self.candidate_count)
            {
                return Err(ConfigError::InvalidModel(format!(
                    "variable `{}` references undefined candidate {}",
                    var.name, v.candidate
                )));
            }
            let mut seen = std::collections::HashSet::new();
            if let Some(v) = var.domain.iter().find(|v| !seen.insert(v.candidate)) {
                return Err(ConfigError::InvalidModel(format!(
                    "variable `{}` lists candidate {} twice",
                    var.name, v.candidate
                )));
            }
        }

        for constraint in &self.constraints {
            match constraint {
                Constraint::AllDifferent { vars } => self.check_roles(vars)?,
            }
        }
        for term in &self.objective.sessions {
            self.check_roles(&term.roles)?;
        }

        self.magnitude_bound().map(|_| ()).ok_or(ConfigError::ScoreOverflow)
    }

    fn check_roles(&self, roles: &[RoleId]) -> Result<(), ConfigError> {
        match roles.iter().find(|r| r.0 >= self.vars.len()) {
            Some(r) => Err(ConfigError::InvalidModel(format!("undefined variable: {r}"))),
            None => Ok(()),
        }
    }

    /// Sum of the largest score magnitudes over every session membership,
    /// or `None` if it overflows.
    fn magnitude_bound(&self) -> Option<i64> {
        self.objective.sessions.iter().try_fold(0i64, |acc, term| {
            term.roles.iter().try_fold(acc, |acc, r| {
                acc.checked_add(self.vars.get(r.0).map_or(0, RoleVar::max_abs_score))
            })
        })
    }

    /// An upper bound on the objective: every session filled with each
    /// role's best candidate, ignoring distinctness. Sessions that cannot
    /// complete or sum below zero count as zero.
    pub fn upper_bound(&self) -> Option<i64> {
        self.objective.sessions.iter().try_fold(0i64, |acc, term| {
            let full = term.roles.iter().try_fold(0i64, |sum, r| {
                let best = self.vars.get(r.0)?.best_score()?;
                sum.checked_add(best)
            });
            acc.checked_add(full.unwrap_or(0).max(0))
        })
    }

    /// Objective value of `assignment`.
    pub fn evaluate(&self, assignment: &Assignment) -> i64 {
        session::objective(&self.objective, &self.vars, assignment)
    }

    /// Whether `assignment` binds every variable within its domain and
    /// satisfies every constraint.
    pub fn is_feasible(&self, assignment: &Assignment) -> bool {
        if assignment.len() != self.vars.len() {
            return false;
        }
        let in_domain = self
            .vars
            .iter()
            .all(|v| v.contains(assignment.get(v.role)));
        in_domain
            && self.constraints.iter().all(|c| match c {
                Constraint::AllDifferent { vars } => {
                    let mut seen = std::collections::HashSet::new();
                    vars.iter().all(|r| seen.insert(assignment.get(*r)))
                }
            })
    }

    /// Returns the number of role variables.
    pub fn var_count(&self) -> usize {
        self.vars.len()
    }

    /// Returns the number of constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CandidateId, RoleBinding};

    fn two_role_model() -> CpModel {
        let mut model = CpModel::new("test", 2);
        let a = model.add_var(
            RoleVar::new(RoleId(0), "a")
                .with_value(CandidateId(0), 3)
                .with_value(CandidateId(1), 2),
        );
        let b = model.add_var(RoleVar::new(RoleId(1), "b").with_value(CandidateId(0), 4));
        model.add_all_different(vec![a, b]);
        model.set_objective(SessionObjective {
            sessions: vec![SessionTerm {
                name: "s".into(),
                roles: vec![a, b],
            }],
        });
        model
    }

    #[test]
    fn test_model_creation() {
        let model = two_role_model();
        assert_eq!(model.var_count(), 2);
        assert_eq!(model.constraint_count(), 1);
        assert!(model.validate().is_ok());
        assert_eq!(model.upper_bound(), Some(7));
    }

    #[test]
    fn test_undefined_variable() {
        let mut model = CpModel::new("test", 0);
        model.add_all_different(vec![RoleId(3)]);
        assert!(matches!(model.validate(), Err(ConfigError::InvalidModel(_))));
    }

    #[test]
    fn test_undefined_candidate() {
        let mut model = CpModel::new("test", 1);
        model.add_var(RoleVar::new(RoleId(0), "a").with_value(CandidateId(5), 1));
        assert!(matches!(model.validate(), Err(ConfigError::InvalidModel(_))));
    }

    #[test]
    fn test_misnumbered_variable() {
        let mut model = CpModel::new("test", 0);
        model.add_var(RoleVar::new(RoleId(1), "a"));
        assert!(matches!(model.validate(), Err(ConfigError::InvalidModel(_))));
    }

    #[test]
    fn test_overflow_detected() {
        let mut model = CpModel::new("test", 2);
        let a = model.add_var(RoleVar::new(RoleId(0), "a").with_value(CandidateId(0), i64::MAX));
        let b = model.add_var(RoleVar::new(RoleId(1), "b").with_value(CandidateId(1), i64::MAX));
        model.set_objective(SessionObjective {
            sessions: vec![SessionTerm {
                name: "s".into(),
                roles: vec![a, b],
            }],
        });
        assert_eq!(model.validate(), Err(ConfigError::ScoreOverflow));
    }

    #[test]
    fn test_feasibility() {
        let model = two_role_model();
        let mut a = Assignment::unfilled(2);
        assert!(model.is_feasible(&a));

        a.set(RoleId(0), RoleBinding::Real(CandidateId(1)));
        a.set(RoleId(1), RoleBinding::Real(CandidateId(0)));
        assert!(model.is_feasible(&a));
        assert_eq!(model.evaluate(&a), 6);

        // candidate 1 is not eligible for role b
        a.set(RoleId(1), RoleBinding::Real(CandidateId(1)));
        assert!(!model.is_feasible(&a));

        // candidate 0 twice
        a.set(RoleId(0), RoleBinding::Real(CandidateId(0)));
        a.set(RoleId(1), RoleBinding::Real(CandidateId(0)));
        assert!(!model.is_feasible(&a));

        // foreign sentinel
        let b = Assignment::from_bindings(vec![
            RoleBinding::Unfilled(RoleId(1)),
            RoleBinding::Unfilled(RoleId(1)),
        ]);
        assert!(!model.is_feasible(&b));
    }

    #[test]
    fn test_upper_bound_ignores_incompletable_sessions() {
        let mut model = CpModel::new("test", 1);
        let a = model.add_var(RoleVar::new(RoleId(0), "a").with_value(CandidateId(0), 3));
        let b = model.add_var(RoleVar::new(RoleId(1), "b"));
        model.set_objective(SessionObjective {
            sessions: vec![SessionTerm {
                name: "s".into(),
                roles: vec![a, b],
            }],
        });
        assert_eq!(model.upper_bound(), Some(0));
    }
}
