//! Role-casting optimization.
//!
//! Assigns a fixed set of named roles to a pool of candidates, each with
//! stated availability, preferences and hard vetoes, so as to maximize a
//! score that only rewards fully cast sessions.
//!
//! - **Model** ([`model`]): vocabulary, roles, candidates, configuration,
//!   assignments.
//! - **Eligibility** ([`eligibility`]): may a candidate fill a role?
//! - **Scoring** ([`scoring`]): bias plus the candidate's preferences over
//!   the role's attributes.
//! - **Encoding** ([`encoder`], [`cp`]): one finite-domain variable per
//!   role, a per-role sentinel for "unfilled", one all-different constraint,
//!   and a session-gated objective.
//! - **Session rule** ([`session`]): only complete sessions score.
//! - **Optimizer** ([`optimize`]): satisfied above a threshold,
//!   unsatisfiable, or unknown.
//! - **Annealing** ([`anneal`]): optional heuristic warm start.
//! - **Reports** ([`report`]) and **threshold search** ([`search`]):
//!   caller-side helpers built on the public contract.
//!
//! # Example
//!
//! ```
//! use u_casting::model::{
//!     expand_templates, Candidate, CastingConfig, Preference, RoleTemplate, Vocabulary,
//! };
//! use u_casting::optimize::Optimizer;
//!
//! let templates = vec![
//!     RoleTemplate::new("zeus", ["spy", "liar"]),
//!     RoleTemplate::new("hera", ["noble"]),
//! ];
//! let config = CastingConfig::default()
//!     .with_vocabulary(
//!         Vocabulary::new()
//!             .with_sessions(["friEve"])
//!             .with_traits(["spy", "liar", "noble"]),
//!     )
//!     .with_roles(expand_templates(&templates, &["friEve"]));
//!
//! let candidates = vec![
//!     Candidate::new("ana@example.com")
//!         .with_availability(["friEve"])
//!         .with_preference("spy", Preference::Preferred),
//!     Candidate::new("bo@example.com")
//!         .with_availability(["friEve"])
//!         .with_preference("spy", Preference::Veto),
//! ];
//!
//! let optimizer = Optimizer::new(config, candidates).unwrap();
//! let verdict = optimizer.optimize(0);
//! let casting = verdict.casting().unwrap();
//! assert_eq!(casting.score, 7);
//! assert_eq!(casting.lines[0].candidate.as_deref(), Some("ana@example.com"));
//! ```

pub mod anneal;
pub mod cp;
pub mod eligibility;
pub mod encoder;
mod error;
pub mod model;
pub mod optimize;
pub mod report;
pub mod scoring;
pub mod search;
pub mod session;

pub use error::{ConfigError, Result};
