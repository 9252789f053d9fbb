//! Session completion rule.
//!
//! Only fully cast sessions count: a session one role short contributes
//! zero, not a partial score. These functions are the single definition of
//! the objective, shared by the exact solver, the annealer and tests.

use crate::cp::{RoleVar, SessionObjective, SessionTerm};
use crate::model::{Assignment, RoleBinding};

/// Whether every role of `term` is bound to a real candidate.
pub fn is_complete(term: &SessionTerm, assignment: &Assignment) -> bool {
    term.roles.iter().all(|r| assignment.get(*r).is_filled())
}

/// Contribution of one session.
///
/// A binding outside its role's domain counts as not filled.
pub fn session_value(term: &SessionTerm, vars: &[RoleVar], assignment: &Assignment) -> i64 {
    let mut total = 0;
    for role in &term.roles {
        let score = match assignment.get(*role) {
            RoleBinding::Real(c) => vars.get(role.0).and_then(|v| v.score_of(c)),
            RoleBinding::Unfilled(_) => None,
        };
        match score {
            Some(s) => total += s,
            None => return 0,
        }
    }
    total
}

/// Total objective: the sum of every session's contribution.
pub fn objective(objective: &SessionObjective, vars: &[RoleVar], assignment: &Assignment) -> i64 {
    objective
        .sessions
        .iter()
        .map(|term| session_value(term, vars, assignment))
        .sum()
}
