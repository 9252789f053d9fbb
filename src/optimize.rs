//! The optimizer: validated problem in, verdict out.
//!
//! [`Optimizer`] validates and encodes a casting problem once, then answers
//! any number of independent threshold queries against it.

use crate::cp::{
    BranchAndBoundSolver, CpModel, CpSolution, CpSolver, SearchStats, SolverConfig, SolverStatus,
};
use crate::encoder;
use crate::error::Result;
use crate::model::{Assignment, Candidate, CastingConfig};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One line of a cast list.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CastLine {
    pub role: String,
    /// Candidate key, or `None` if the role is unfilled.
    pub candidate: Option<String>,
    /// Score of the pairing, if filled.
    pub score: Option<i64>,
}

/// A successful casting.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Casting {
    pub assignment: Assignment,
    /// Objective value; strictly above the requested threshold.
    pub score: i64,
    /// Whether the search proved no better assignment exists.
    pub proven_optimal: bool,
    /// One line per role, in configuration order.
    pub lines: Vec<CastLine>,
    pub stats: SearchStats,
}

/// Outcome of one optimization run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Verdict {
    /// An assignment scoring above the threshold.
    Satisfied(Casting),
    /// Proven: no assignment scores above the threshold.
    Unsatisfiable,
    /// Resource limits or cancellation ended the search first. Says nothing
    /// about satisfiability.
    Unknown,
}

impl Verdict {
    pub fn is_satisfied(&self) -> bool {
        matches!(self, Verdict::Satisfied(_))
    }

    pub fn casting(&self) -> Option<&Casting> {
        match self {
            Verdict::Satisfied(c) => Some(c),
            _ => None,
        }
    }

    /// Achieved score, if satisfied.
    pub fn score(&self) -> Option<i64> {
        self.casting().map(|c| c.score)
    }
}

/// A validated, encoded casting problem.
///
/// # Examples
///
/// ```
/// use u_casting::model::{Candidate, CastingConfig, Preference, Role, Vocabulary};
/// use u_casting::optimize::{Optimizer, Verdict};
///
/// let config = CastingConfig::default()
///     .with_vocabulary(Vocabulary::new().with_sessions(["sunEve"]).with_traits(["spy"]))
///     .with_role(Role::new("zeus", ["sunEve", "spy"]))
///     .with_bias(3);
/// let candidates = vec![Candidate::new("ana@example.com")
///     .with_availability(["sunEve"])
///     .with_preference("spy", Preference::Preferred)];
///
/// let optimizer = Optimizer::new(config, candidates).unwrap();
/// assert_eq!(optimizer.optimize(3).score(), Some(4));
/// assert_eq!(optimizer.optimize(4), Verdict::Unsatisfiable);
/// ```
#[derive(Debug, Clone)]
pub struct Optimizer {
    config: CastingConfig,
    candidates: Vec<Candidate>,
    model: CpModel,
    solver_config: SolverConfig,
}

impl Optimizer {
    /// Validates the configuration and encodes the problem.
    pub fn new(config: CastingConfig, candidates: Vec<Candidate>) -> Result<Self> {
        let model = encoder::encode(&config, &candidates)?;
        Ok(Self {
            config,
            candidates,
            model,
            solver_config: SolverConfig::default(),
        })
    }

    /// Replaces the solver configuration after validating it.
    pub fn with_solver_config(mut self, solver_config: SolverConfig) -> Result<Self> {
        solver_config.validate()?;
        self.solver_config = solver_config;
        Ok(self)
    }

    pub fn config(&self) -> &CastingConfig {
        &self.config
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn model(&self) -> &CpModel {
        &self.model
    }

    pub fn solver_config(&self) -> &SolverConfig {
        &self.solver_config
    }

    /// Objective value of any proposed assignment.
    pub fn evaluate(&self, assignment: &Assignment) -> i64 {
        self.model.evaluate(assignment)
    }

    /// Searches for an assignment scoring strictly above `threshold`.
    pub fn optimize(&self, threshold: i64) -> Verdict {
        self.solve_with(&BranchAndBoundSolver::new(), threshold, &self.solver_config)
    }

    /// Like [`Optimizer::optimize`], aborting with [`Verdict::Unknown`] once
    /// `cancel` is set (unless an assignment was already found).
    pub fn optimize_with_cancel(&self, threshold: i64, cancel: Arc<AtomicBool>) -> Verdict {
        let solver = BranchAndBoundSolver::new().with_cancel(cancel);
        self.solve_with(&solver, threshold, &self.solver_config)
    }

    /// Runs any [`CpSolver`] against the encoded model.
    pub fn solve_with<S: CpSolver>(
        &self,
        solver: &S,
        threshold: i64,
        config: &SolverConfig,
    ) -> Verdict {
        let solution = solver.solve(&self.model, threshold, config);
        let verdict = self.verdict(solution, threshold);
        match &verdict {
            Verdict::Satisfied(c) => info!(
                threshold,
                score = c.score,
                filled = c.assignment.filled_count(),
                proven_optimal = c.proven_optimal,
                "casting found"
            ),
            Verdict::Unsatisfiable => info!(threshold, "no casting above threshold"),
            Verdict::Unknown => warn!(threshold, "search ended without a verdict"),
        }
        verdict
    }

    fn verdict(&self, solution: CpSolution, threshold: i64) -> Verdict {
        match solution.status {
            SolverStatus::Infeasible => Verdict::Unsatisfiable,
            SolverStatus::Unknown => Verdict::Unknown,
            SolverStatus::ModelInvalid => {
                warn!("solver rejected a validated model");
                Verdict::Unknown
            }
            SolverStatus::Optimal | SolverStatus::Feasible => {
                let Some(assignment) = solution.assignment else {
                    warn!("solver reported success without an assignment");
                    return Verdict::Unknown;
                };
                // Any CpSolver output is rechecked against the model.
                let score = self.model.evaluate(&assignment);
                if !self.model.is_feasible(&assignment) || score <= threshold {
                    warn!(score, threshold, "solver returned an invalid assignment");
                    return Verdict::Unknown;
                }
                Verdict::Satisfied(Casting {
                    lines: self.lines(&assignment),
                    score,
                    proven_optimal: solution.status == SolverStatus::Optimal,
                    assignment,
                    stats: solution.stats,
                })
            }
        }
    }

    fn lines(&self, assignment: &Assignment) -> Vec<CastLine> {
        self.model
            .vars
            .iter()
            .map(|var| {
                let candidate = assignment.candidate(var.role);
                CastLine {
                    role: var.name.clone(),
                    candidate: candidate.map(|c| self.candidates[c.0].key.clone()),
                    score: candidate.and_then(|c| var.score_of(c)),
                }
            })
            .collect()
    }
}
