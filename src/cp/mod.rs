//! Constraint Programming (CP) layer for casting.
//!
//! A casting problem in constraint form: one finite-domain variable per
//! role, a global all-different constraint, and a session-gated objective.
//!
//! # Key Components
//!
//! - **Variables**: [`RoleVar`] — eligible candidates plus the role's sentinel
//! - **Constraints**: [`Constraint`] — all-different over role bindings
//! - **Objective**: [`SessionObjective`] — only complete sessions score
//! - **Model**: [`CpModel`] — container for the above
//! - **Solver**: [`CpSolver`] trait, with [`BranchAndBoundSolver`] as the
//!   built-in exact search
//!
//! # References
//!
//! Rossi, van Beek & Walsh (2006), "Handbook of Constraint Programming"

mod model;
mod solver;
mod variables;

pub use model::{Constraint, CpModel, SessionObjective, SessionTerm};
pub use solver::{
    BranchAndBoundSolver, CpSolution, CpSolver, SearchStats, SolverConfig, SolverStatus,
};
pub use variables::{DomainValue, RoleVar};
