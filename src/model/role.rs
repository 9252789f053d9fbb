//! Roles and per-session role templates.

use super::attribute::Vocabulary;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A castable slot.
///
/// `attributes` holds both the session identifiers the role belongs to and
/// the traits it embodies; the vocabulary tells them apart.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Role {
    /// Unique role name.
    pub name: String,
    /// Session and trait attributes, in declaration order.
    pub attributes: Vec<String>,
}

impl Role {
    pub fn new<I, S>(name: impl Into<String>, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            attributes: attributes.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether the role lists `attribute`.
    pub fn carries(&self, attribute: &str) -> bool {
        self.attributes.iter().any(|a| a == attribute)
    }

    /// Session identifiers among the role's attributes.
    pub fn sessions<'a>(&'a self, vocab: &'a Vocabulary) -> impl Iterator<Item = &'a str> + 'a {
        self.attributes
            .iter()
            .map(String::as_str)
            .filter(move |a| vocab.is_session(a))
    }
}

/// A role description without a session, replicated per session.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RoleTemplate {
    pub name: String,
    /// Trait attributes only.
    pub attributes: Vec<String>,
}

impl RoleTemplate {
    pub fn new<I, S>(name: impl Into<String>, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            attributes: attributes.into_iter().map(Into::into).collect(),
        }
    }
}

/// Instantiates every template once per session.
///
/// The role for template `t` in session `s` is named `"{s}.{t}"` and carries
/// `s` followed by the template's attributes. Roles are grouped by session.
///
/// # Examples
///
/// ```
/// use u_casting::model::{expand_templates, RoleTemplate};
///
/// let templates = vec![RoleTemplate::new("zeus", ["spy", "liar"])];
/// let roles = expand_templates(&templates, &["friEve", "satEve"]);
/// assert_eq!(roles.len(), 2);
/// assert_eq!(roles[1].name, "satEve.zeus");
/// assert_eq!(roles[1].attributes, vec!["satEve", "spy", "liar"]);
/// ```
pub fn expand_templates<S: AsRef<str>>(templates: &[RoleTemplate], sessions: &[S]) -> Vec<Role> {
    sessions
        .iter()
        .flat_map(|session| {
            let session = session.as_ref();
            templates.iter().map(move |t| Role {
                name: format!("{session}.{}", t.name),
                attributes: std::iter::once(session.to_string())
                    .chain(t.attributes.iter().cloned())
                    .collect(),
            })
        })
        .collect()
}
