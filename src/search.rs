//! Caller-side threshold search.
//!
//! The optimizer answers "is there a casting scoring above `t`?". Finding a
//! good `t` is the caller's job; [`ThresholdSearch`] does it by probing an
//! initial threshold and then bisecting between the best score achieved and
//! the model's upper bound. Every probe is an independent solve under the
//! optimizer's solver configuration, so each one is bounded by its time
//! limit.

use crate::optimize::{Casting, Optimizer, Verdict};
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Threshold search parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ThresholdSearchConfig {
    /// First threshold probed. Failing here means nothing can be cast.
    pub initial_threshold: i64,
    /// Maximum number of probes, the first included.
    pub max_probes: usize,
}

impl Default for ThresholdSearchConfig {
    fn default() -> Self {
        Self {
            initial_threshold: 0,
            max_probes: 64,
        }
    }
}

impl ThresholdSearchConfig {
    pub fn with_initial_threshold(mut self, t: i64) -> Self {
        self.initial_threshold = t;
        self
    }

    pub fn with_max_probes(mut self, n: usize) -> Self {
        self.max_probes = n;
        self
    }
}

/// Result of one probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ProbeOutcome {
    Satisfied(i64),
    Unsatisfiable,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Probe {
    pub threshold: i64,
    pub outcome: ProbeOutcome,
}

/// Result of a threshold search.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchOutcome {
    /// Best casting found, if any probe succeeded.
    pub best: Option<Casting>,
    /// Every probe in order.
    pub probes: Vec<Probe>,
    /// Whether `best` is proven maximal (or, with no `best`, proven that
    /// nothing beats the initial threshold). False if any probe came back
    /// unknown or the probe budget ran out.
    pub proven: bool,
}

/// Drives repeated [`Optimizer::optimize`] calls.
///
/// # Examples
///
/// ```
/// use u_casting::model::{Candidate, CastingConfig, Role, Vocabulary};
/// use u_casting::optimize::Optimizer;
/// use u_casting::search::ThresholdSearch;
///
/// let config = CastingConfig::default()
///     .with_vocabulary(Vocabulary::new().with_sessions(["sunEve"]))
///     .with_role(Role::new("zeus", ["sunEve"]))
///     .with_role(Role::new("hera", ["sunEve"]));
/// let candidates = vec![
///     Candidate::new("ana").with_availability(["sunEve"]),
///     Candidate::new("bo").with_availability(["sunEve"]),
/// ];
/// let optimizer = Optimizer::new(config, candidates).unwrap();
/// let outcome = ThresholdSearch::new(&optimizer).run();
/// assert_eq!(outcome.best.map(|c| c.score), Some(6));
/// assert!(outcome.proven);
/// ```
#[derive(Debug, Clone)]
pub struct ThresholdSearch<'a> {
    optimizer: &'a Optimizer,
    config: ThresholdSearchConfig,
}

impl<'a> ThresholdSearch<'a> {
    pub fn new(optimizer: &'a Optimizer) -> Self {
        Self {
            optimizer,
            config: ThresholdSearchConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ThresholdSearchConfig) -> Self {
        self.config = config;
        self
    }

    /// Runs the search.
    pub fn run(&self) -> SearchOutcome {
        let mut probes = Vec::new();
        let mut best = match self.probe(self.config.initial_threshold, &mut probes) {
            Verdict::Satisfied(c) => c,
            Verdict::Unsatisfiable => return outcome(None, probes, true),
            Verdict::Unknown => return outcome(None, probes, false),
        };

        // Invariant: some casting scores `lo`; none is known to score above `hi`.
        let mut lo = best.score;
        let mut hi = self.optimizer.model().upper_bound().unwrap_or(i64::MAX).max(lo);
        let mut proven = true;

        while lo < hi && probes.len() < self.config.max_probes {
            let mid = midpoint(lo, hi);
            match self.probe(mid, &mut probes) {
                Verdict::Satisfied(c) => {
                    lo = c.score;
                    best = c;
                }
                Verdict::Unsatisfiable => hi = mid,
                Verdict::Unknown => {
                    proven = false;
                    hi = mid;
                }
            }
        }
        if lo < hi {
            proven = false;
        }

        debug!(best = lo, probes = probes.len(), proven, "threshold search finished");
        outcome(Some(best), probes, proven)
    }

    /// Runs one independent solve per threshold, concurrently with the
    /// `parallel` feature. Results are in input order.
    pub fn probe_many(&self, thresholds: &[i64]) -> Vec<Verdict> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            thresholds
                .par_iter()
                .map(|&t| self.optimizer.optimize(t))
                .collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            thresholds
                .iter()
                .map(|&t| self.optimizer.optimize(t))
                .collect()
        }
    }

    fn probe(&self, threshold: i64, probes: &mut Vec<Probe>) -> Verdict {
        let verdict = self.optimizer.optimize(threshold);
        let outcome = match &verdict {
            Verdict::Satisfied(c) => ProbeOutcome::Satisfied(c.score),
            Verdict::Unsatisfiable => ProbeOutcome::Unsatisfiable,
            Verdict::Unknown => ProbeOutcome::Unknown,
        };
        probes.push(Probe { threshold, outcome });
        verdict
    }
}

fn outcome(best: Option<Casting>, probes: Vec<Probe>, proven: bool) -> SearchOutcome {
    SearchOutcome {
        best,
        probes,
        proven,
    }
}

/// `lo <= result < hi` for `lo < hi`, without overflow.
fn midpoint(lo: i64, hi: i64) -> i64 {
    (lo as i128 + (hi as i128 - lo as i128) / 2) as i64
}
