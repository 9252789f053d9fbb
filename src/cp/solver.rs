//! CP solver interface and branch-and-bound implementation.

use super::model::CpModel;
use crate::anneal::{AnnealConfig, AnnealRunner};
use crate::error::ConfigError;
use crate::model::{Assignment, CandidateId, RoleBinding, RoleId};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Status of the solver after execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SolverStatus {
    /// Best solution found and proven maximal.
    Optimal,
    /// A solution above the threshold, not proven maximal.
    Feasible,
    /// Proven: nothing exceeds the threshold.
    Infeasible,
    /// Model or configuration failed validation.
    ModelInvalid,
    /// A resource limit or cancellation ended the search without a solution.
    Unknown,
}

/// Search effort counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchStats {
    /// Search nodes expanded.
    pub nodes: u64,
    /// Nodes cut off by the bound.
    pub pruned: u64,
    /// Wall time in milliseconds, warm start included.
    pub solve_time_ms: u64,
    /// Objective of the warm-start assignment, if one was computed.
    pub warm_start_score: Option<i64>,
}

/// Solution from a CP solver.
#[derive(Debug, Clone)]
pub struct CpSolution {
    /// Solver status.
    pub status: SolverStatus,
    /// The assignment, when one was found.
    pub assignment: Option<Assignment>,
    /// Objective value of `assignment`.
    pub objective_value: Option<i64>,
    pub stats: SearchStats,
}

impl CpSolution {
    /// Creates an empty solution with the given status.
    pub fn empty(status: SolverStatus) -> Self {
        Self {
            status,
            assignment: None,
            objective_value: None,
            stats: SearchStats::default(),
        }
    }

    /// Whether a feasible solution was found.
    pub fn is_solution_found(&self) -> bool {
        matches!(self.status, SolverStatus::Optimal | SolverStatus::Feasible)
    }
}

/// Solver configuration.
///
/// # Examples
///
/// ```
/// use u_casting::anneal::AnnealConfig;
/// use u_casting::cp::SolverConfig;
///
/// let config = SolverConfig::default()
///     .with_time_limit_ms(5_000)
///     .with_stop_after_first(false)
///     .with_warm_start(AnnealConfig::default().with_seed(1));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolverConfig {
    /// Maximum solve time in milliseconds. Must be positive.
    pub time_limit_ms: u64,
    /// Maximum search nodes. 0 = no limit.
    pub node_limit: u64,
    /// Stop at the first assignment above the threshold. When false the
    /// search keeps improving and proves optimality if it completes.
    pub stop_after_first: bool,
    /// Annealing run before the exact search.
    pub warm_start: Option<AnnealConfig>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit_ms: 60_000,
            node_limit: 0,
            stop_after_first: true,
            warm_start: None,
        }
    }
}

impl SolverConfig {
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = ms;
        self
    }

    pub fn with_node_limit(mut self, nodes: u64) -> Self {
        self.node_limit = nodes;
        self
    }

    pub fn with_stop_after_first(mut self, stop: bool) -> Self {
        self.stop_after_first = stop;
        self
    }

    pub fn with_warm_start(mut self, anneal: AnnealConfig) -> Self {
        self.warm_start = Some(anneal);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.time_limit_ms == 0 {
            return Err(ConfigError::InvalidSolverConfig(
                "time_limit_ms must be positive".into(),
            ));
        }
        if let Some(anneal) = &self.warm_start {
            anneal.validate()?;
        }
        Ok(())
    }
}

/// Trait for CP solver implementations.
///
/// A solver looks for an assignment whose objective is strictly greater
/// than `threshold`. Each call is an independent solve.
pub trait CpSolver {
    /// Solves the model and returns a solution.
    fn solve(&self, model: &CpModel, threshold: i64, config: &SolverConfig) -> CpSolution;
}

/// Exact depth-first branch and bound.
///
/// Roles are branched session by session (most promising session first,
/// smallest domain first within a session), candidates best score first,
/// the sentinel last. A node is cut when the optimistic bound cannot beat
/// the threshold (or the incumbent, when not stopping at the first hit).
/// The bound counts each session at the sum of its bound scores plus each
/// open role's best unused candidate, and zero for sessions that can no
/// longer complete. Roles whose sessions are all dead take their sentinel
/// without branching.
#[derive(Debug, Clone, Default)]
pub struct BranchAndBoundSolver {
    cancel: Option<Arc<AtomicBool>>,
}

impl BranchAndBoundSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aborts the search (with [`SolverStatus::Unknown`] or a not-proven
    /// [`SolverStatus::Feasible`]) once `flag` is set.
    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }
}

impl CpSolver for BranchAndBoundSolver {
    fn solve(&self, model: &CpModel, threshold: i64, config: &SolverConfig) -> CpSolution {
        if let Err(e) = model.validate().and_then(|_| config.validate()) {
            debug!(error = %e, "refusing to solve");
            return CpSolution::empty(SolverStatus::ModelInvalid);
        }

        let start = Instant::now();
        let mut stats = SearchStats::default();
        let mut search = Search::new(model, threshold, config, self.cancel.clone(), start);

        if let Some(anneal) = &config.warm_start {
            let warm =
                AnnealRunner::run_until(model, anneal, self.cancel.clone(), search.deadline);
            debug!(
                score = warm.best_score,
                iterations = warm.iterations,
                timed_out = warm.timed_out,
                "warm start"
            );
            stats.warm_start_score = Some(warm.best_score);
            if warm.best_score > threshold {
                if config.stop_after_first {
                    stats.solve_time_ms = elapsed_ms(start);
                    return CpSolution {
                        status: SolverStatus::Feasible,
                        assignment: Some(warm.best),
                        objective_value: Some(warm.best_score),
                        stats,
                    };
                }
                search.best = Some((warm.best, warm.best_score));
            }
        }

        search.dive(0);

        stats.nodes = search.nodes;
        stats.pruned = search.pruned;
        stats.solve_time_ms = elapsed_ms(start);

        let status = match (&search.best, search.aborted) {
            (None, true) => SolverStatus::Unknown,
            (None, false) => SolverStatus::Infeasible,
            (Some(_), true) => SolverStatus::Feasible,
            (Some(_), false) if config.stop_after_first => SolverStatus::Feasible,
            (Some(_), false) => SolverStatus::Optimal,
        };
        debug!(
            ?status,
            nodes = stats.nodes,
            pruned = stats.pruned,
            ms = stats.solve_time_ms,
            "search finished"
        );

        let (assignment, objective_value) = match search.best {
            Some((a, v)) => (Some(a), Some(v)),
            None => (None, None),
        };
        CpSolution {
            status,
            assignment,
            objective_value,
            stats,
        }
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Nodes between clock and cancellation checks.
const CHECK_INTERVAL: u64 = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Open,
    Filled(CandidateId, i64),
    Unfilled,
}

struct Search<'a> {
    model: &'a CpModel,
    order: Vec<usize>,
    memberships: Vec<Vec<usize>>,
    slots: Vec<Slot>,
    used: Vec<bool>,
    threshold: i64,
    stop_after_first: bool,
    best: Option<(Assignment, i64)>,
    nodes: u64,
    pruned: u64,
    node_limit: u64,
    deadline: Option<Instant>,
    cancel: Option<Arc<AtomicBool>>,
    aborted: bool,
}

impl<'a> Search<'a> {
    fn new(
        model: &'a CpModel,
        threshold: i64,
        config: &SolverConfig,
        cancel: Option<Arc<AtomicBool>>,
        start: Instant,
    ) -> Self {
        let mut memberships = vec![Vec::new(); model.vars.len()];
        for (t, term) in model.objective.sessions.iter().enumerate() {
            for r in &term.roles {
                memberships[r.0].push(t);
            }
        }
        Self {
            model,
            order: branching_order(model),
            memberships,
            slots: vec![Slot::Open; model.vars.len()],
            used: vec![false; model.candidate_count],
            threshold,
            stop_after_first: config.stop_after_first,
            best: None,
            nodes: 0,
            pruned: 0,
            node_limit: config.node_limit,
            deadline: start.checked_add(Duration::from_millis(config.time_limit_ms)),
            cancel,
            aborted: false,
        }
    }

    /// Returns true when the search must stop.
    fn dive(&mut self, depth: usize) -> bool {
        if self.out_of_budget() {
            self.aborted = true;
            return true;
        }
        self.nodes += 1;

        let bar = self.bar();
        if self.bound() <= bar {
            self.pruned += 1;
            return false;
        }

        if depth == self.order.len() {
            let assignment = self.snapshot();
            let value = self.model.evaluate(&assignment);
            if value > bar {
                self.best = Some((assignment, value));
                return self.stop_after_first;
            }
            return false;
        }

        let model = self.model;
        let i = self.order[depth];
        if !self.is_idle(i) {
            for v in &model.vars[i].domain {
                let c = v.candidate.0;
                if self.used[c] {
                    continue;
                }
                self.used[c] = true;
                self.slots[i] = Slot::Filled(v.candidate, v.score);
                let stop = self.dive(depth + 1);
                self.used[c] = false;
                self.slots[i] = Slot::Open;
                if stop {
                    return true;
                }
            }
        }

        self.slots[i] = Slot::Unfilled;
        let stop = self.dive(depth + 1);
        self.slots[i] = Slot::Open;
        stop
    }

    fn out_of_budget(&self) -> bool {
        if self.node_limit > 0 && self.nodes >= self.node_limit {
            return true;
        }
        if self.nodes % CHECK_INTERVAL != 0 {
            return false;
        }
        if let Some(flag) = &self.cancel {
            if flag.load(Ordering::Relaxed) {
                return true;
            }
        }
        matches!(self.deadline, Some(d) if Instant::now() >= d)
    }

    /// Value an assignment must exceed to be worth recording.
    fn bar(&self) -> i64 {
        match &self.best {
            Some((_, score)) => (*score).max(self.threshold),
            None => self.threshold,
        }
    }

    fn bound(&self) -> i64 {
        self.model
            .objective
            .sessions
            .iter()
            .map(|term| self.session_bound(&term.roles))
            .sum()
    }

    fn session_bound(&self, roles: &[RoleId]) -> i64 {
        let mut total = 0i64;
        for r in roles {
            let score = match self.slots[r.0] {
                Slot::Filled(_, s) => Some(s),
                Slot::Unfilled => None,
                Slot::Open => self.best_unused(r.0),
            };
            match score {
                Some(s) => total += s,
                None => return 0,
            }
        }
        total.max(0)
    }

    fn best_unused(&self, var: usize) -> Option<i64> {
        self.model.vars[var]
            .domain
            .iter()
            .find(|v| !self.used[v.candidate.0])
            .map(|v| v.score)
    }

    fn is_dead(&self, roles: &[RoleId]) -> bool {
        roles.iter().any(|r| match self.slots[r.0] {
            Slot::Unfilled => true,
            Slot::Filled(..) => false,
            Slot::Open => self.best_unused(r.0).is_none(),
        })
    }

    /// Whether every session of `var` is dead, so its binding cannot matter.
    fn is_idle(&self, var: usize) -> bool {
        self.memberships[var]
            .iter()
            .all(|&t| self.is_dead(&self.model.objective.sessions[t].roles))
    }

    fn snapshot(&self) -> Assignment {
        Assignment::from_bindings(
            self.slots
                .iter()
                .enumerate()
                .map(|(i, slot)| match slot {
                    Slot::Filled(c, _) => RoleBinding::Real(*c),
                    _ => RoleBinding::Unfilled(RoleId(i)),
                })
                .collect(),
        )
    }
}

/// Sessions by descending potential, roles within a session by ascending
/// domain size, then roles outside every session.
fn branching_order(model: &CpModel) -> Vec<usize> {
    let mut sessions: Vec<(i64, usize)> = model
        .objective
        .sessions
        .iter()
        .enumerate()
        .map(|(t, term)| {
            let potential = term.roles.iter().fold(0i64, |acc, r| {
                acc.saturating_add(model.vars[r.0].best_score().unwrap_or(0))
            });
            (potential, t)
        })
        .collect();
    sessions.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

    let mut placed = vec![false; model.vars.len()];
    let mut order = Vec::with_capacity(model.vars.len());
    for (_, t) in sessions {
        let mut roles: Vec<usize> = model.objective.sessions[t]
            .roles
            .iter()
            .map(|r| r.0)
            .filter(|&i| !placed[i])
            .collect();
        roles.sort_by_key(|&i| model.vars[i].domain_size());
        for i in roles {
            if !placed[i] {
                placed[i] = true;
                order.push(i);
            }
        }
    }
    order.extend((0..model.vars.len()).filter(|&i| !placed[i]));
    order
}
