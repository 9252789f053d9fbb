//! Domain model for casting.
//!
//! - [`Vocabulary`] — the closed set of session and trait attributes
//! - [`Role`], [`RoleTemplate`] — castable slots, optionally replicated per session
//! - [`Candidate`] — applicants with availability and [`Preference`]s
//! - [`CastingConfig`] — everything the encoder needs, validated once
//! - [`Assignment`], [`RoleBinding`] — solver output

mod assignment;
mod attribute;
mod candidate;
mod config;
mod role;

pub use assignment::{Assignment, CandidateId, RoleBinding, RoleId};
pub use attribute::{Attribute, AttributeKind, Preference, Vocabulary};
pub use candidate::Candidate;
pub use config::{CastingConfig, MAX_BIAS};
pub use role::{expand_templates, Role, RoleTemplate};
