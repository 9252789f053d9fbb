//! Annealing loop over feasible assignments.

use super::config::{AnnealConfig, CoolingSchedule};
use crate::cp::CpModel;
use crate::model::{Assignment, RoleBinding, RoleId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Result of an annealing run.
#[derive(Debug, Clone)]
pub struct AnnealResult {
    /// Best feasible assignment seen.
    pub best: Assignment,

    /// Objective of `best`.
    pub best_score: i64,

    /// Moves evaluated.
    pub iterations: usize,

    /// Accepted moves (including improvements).
    pub accepted_moves: usize,

    /// Strictly improving moves.
    pub improving_moves: usize,

    /// Whether cancelled externally.
    pub cancelled: bool,

    /// Whether the deadline passed before the schedule finished.
    pub timed_out: bool,
}

/// Runs simulated annealing on a [`CpModel`], maximizing its objective.
pub struct AnnealRunner;

impl AnnealRunner {
    /// Runs annealing.
    ///
    /// # Panics
    /// Panics if the configuration is invalid (call [`AnnealConfig::validate`]
    /// first to get a descriptive error).
    pub fn run(model: &CpModel, config: &AnnealConfig) -> AnnealResult {
        Self::run_with_cancel(model, config, None)
    }

    /// Runs annealing with an optional cancellation token.
    pub fn run_with_cancel(
        model: &CpModel,
        config: &AnnealConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> AnnealResult {
        Self::run_until(model, config, cancel, None)
    }

    /// Runs annealing until the schedule ends, `cancel` is set or
    /// `deadline` passes, returning the best assignment seen so far.
    pub fn run_until(
        model: &CpModel,
        config: &AnnealConfig,
        cancel: Option<Arc<AtomicBool>>,
        deadline: Option<Instant>,
    ) -> AnnealResult {
        config.validate().expect("invalid AnnealConfig");

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };

        let mut current = greedy(model);
        let mut current_score = model.evaluate(&current);
        let mut best = current.clone();
        let mut best_score = current_score;

        let movable: Vec<usize> = (0..model.vars.len())
            .filter(|&i| !model.vars[i].is_fixed())
            .collect();

        let mut temperature = config.initial_temperature;
        let mut iterations = 0usize;
        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;
        let mut cancelled = false;
        let mut timed_out = false;

        'outer: while !movable.is_empty() && temperature > config.min_temperature {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }
            if matches!(deadline, Some(d) if Instant::now() >= d) {
                timed_out = true;
                break;
            }

            let inner = match config.cooling {
                CoolingSchedule::LundyMees { .. } => 1,
                CoolingSchedule::Geometric { .. } => config.iterations_per_temperature,
            };

            for _ in 0..inner {
                if config.max_iterations > 0 && iterations >= config.max_iterations {
                    break 'outer;
                }
                iterations += 1;

                let role = movable[rng.random_range(0..movable.len())];
                let next = neighbor(model, &current, role, &mut rng);
                if next == current {
                    continue;
                }
                let score = model.evaluate(&next);
                let delta = (score - current_score) as f64;

                let accept = if delta > 0.0 {
                    improving_moves += 1;
                    true
                } else {
                    rng.random::<f64>() < (delta / temperature).exp()
                };

                if accept {
                    current = next;
                    current_score = score;
                    accepted_moves += 1;
                    if current_score > best_score {
                        best = current.clone();
                        best_score = current_score;
                    }
                }
            }

            temperature = match config.cooling {
                CoolingSchedule::Geometric { alpha } => temperature * alpha,
                CoolingSchedule::LundyMees { beta } => temperature / (1.0 + beta * temperature),
            };
        }

        AnnealResult {
            best,
            best_score,
            iterations,
            accepted_moves,
            improving_moves,
            cancelled,
            timed_out,
        }
    }
}

/// Each role in turn takes its best unused candidate.
fn greedy(model: &CpModel) -> Assignment {
    let mut used = vec![false; model.candidate_count];
    let bindings = model
        .vars
        .iter()
        .map(|var| {
            match var.domain.iter().find(|v| !used[v.candidate.0]) {
                Some(v) => {
                    used[v.candidate.0] = true;
                    RoleBinding::Real(v.candidate)
                }
                None => var.sentinel(),
            }
        })
        .collect();
    Assignment::from_bindings(bindings)
}

/// Rebinds `role` to a random domain value, keeping the assignment feasible.
///
/// If the new candidate already plays another role, that role receives the
/// moved role's previous candidate when eligible, and its sentinel otherwise.
fn neighbor<R: Rng>(model: &CpModel, current: &Assignment, role: usize, rng: &mut R) -> Assignment {
    let var = &model.vars[role];
    let pick = rng.random_range(0..var.domain_size());
    let value = var.values().nth(pick).unwrap_or_else(|| var.sentinel());

    let mut next = current.clone();
    let previous = current.get(var.role);
    next.set(var.role, value);

    if let RoleBinding::Real(c) = value {
        let holder = current
            .bindings()
            .iter()
            .position(|b| *b == RoleBinding::Real(c))
            .filter(|&j| j != role);
        if let Some(j) = holder {
            let other = &model.vars[j];
            let back = match previous {
                RoleBinding::Real(p) if other.contains(previous) => RoleBinding::Real(p),
                _ => other.sentinel(),
            };
            next.set(RoleId(j), back);
        }
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cp::{RoleVar, SessionObjective, SessionTerm};
    use crate::model::CandidateId;

    /// Greedy picks c0 for role a, blocking the better joint casting.
    fn trap_model() -> CpModel {
        let mut model = CpModel::new("trap", 2);
        let a = model.add_var(
            RoleVar::new(RoleId(0), "a")
                .with_value(CandidateId(0), 5)
                .with_value(CandidateId(1), 4),
        );
        let b = model.add_var(RoleVar::new(RoleId(1), "b").with_value(CandidateId(0), 5));
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
    fn test_greedy_is_feasible() {
        let model = trap_model();
        let g = greedy(&model);
        assert!(model.is_feasible(&g));
        assert_eq!(g.candidate(RoleId(0)), Some(CandidateId(0)));
        assert_eq!(g.candidate(RoleId(1)), None);
    }

    #[test]
    fn test_anneal_escapes_greedy_trap() {
        let model = trap_model();
        let config = AnnealConfig::default().with_seed(42);
        let result = AnnealRunner::run(&model, &config);
        assert!(model.is_feasible(&result.best));
        assert_eq!(result.best_score, 9);
        assert_eq!(model.evaluate(&result.best), result.best_score);
    }

    #[test]
    fn test_neighbors_stay_feasible() {
        let model = trap_model();
        let mut rng = StdRng::seed_from_u64(3);
        let mut current = greedy(&model);
        for _ in 0..200 {
            let role = rng.random_range(0..2);
            current = neighbor(&model, &current, role, &mut rng);
            assert!(model.is_feasible(&current));
        }
    }

    #[test]
    fn test_deterministic_with_seed() {
        let model = trap_model();
        let config = AnnealConfig::default().with_seed(11).with_max_iterations(500);
        let r1 = AnnealRunner::run(&model, &config);
        let r2 = AnnealRunner::run(&model, &config);
        assert_eq!(r1.best, r2.best);
        assert_eq!(r1.iterations, r2.iterations);
    }

    #[test]
    fn test_cancel_before_start() {
        let model = trap_model();
        let flag = Arc::new(AtomicBool::new(true));
        let result = AnnealRunner::run_with_cancel(&model, &AnnealConfig::default(), Some(flag));
        assert!(result.cancelled);
        assert_eq!(result.iterations, 0);
    }

    #[test]
    fn test_deadline_stops_slow_schedule() {
        let model = trap_model();
        // Millions of temperature levels without a deadline.
        let config = AnnealConfig::default()
            .with_cooling(CoolingSchedule::LundyMees { beta: 2e-6 })
            .with_max_iterations(0)
            .with_seed(1);
        let start = Instant::now();
        let deadline = start + std::time::Duration::from_millis(10);
        let result = AnnealRunner::run_until(&model, &config, None, Some(deadline));
        assert!(result.timed_out);
        assert!(!result.cancelled);
        assert!(start.elapsed() < std::time::Duration::from_secs(1));
        assert!(model.is_feasible(&result.best));
    }

    #[test]
    fn test_expired_deadline_keeps_greedy() {
        let model = trap_model();
        let result = AnnealRunner::run_until(
            &model,
            &AnnealConfig::default(),
            None,
            Some(Instant::now()),
        );
        assert!(result.timed_out);
        assert_eq!(result.iterations, 0);
        assert_eq!(result.best, greedy(&model));
    }

    #[test]
    fn test_nothing_to_move() {
        let model = CpModel::new("empty", 0);
        let result = AnnealRunner::run(&model, &AnnealConfig::default());
        assert_eq!(result.best_score, 0);
        assert_eq!(result.iterations, 0);
    }
}
