//! Simulated annealing over casting assignments.
//!
//! A quick heuristic that produces good feasible assignments before the
//! exact search starts. Moves keep every intermediate assignment feasible:
//! a role takes a new value from its domain, and a candidate taken from
//! another role is swapped back or replaced by that role's sentinel.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Lundy & Mees (1986), "Convergence of an Annealing Algorithm"

mod config;
mod runner;

pub use config::{AnnealConfig, CoolingSchedule};
pub use runner::{AnnealResult, AnnealRunner};
