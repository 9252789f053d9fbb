//! Candidates: typed applicant records.

use super::attribute::Preference;
use std::collections::{BTreeSet, HashMap};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An applicant with availability and per-attribute preferences.
///
/// Built once from normalized input and never mutated afterwards.
///
/// # Examples
///
/// ```
/// use u_casting::model::{Candidate, Preference};
///
/// let c = Candidate::new("ana@example.com")
///     .with_availability(["friEve"])
///     .with_preference("spy", Preference::Preferred)
///     .with_preference("liar", Preference::Veto);
/// assert!(c.is_available("friEve"));
/// assert_eq!(c.value("spy"), 1);
/// assert_eq!(c.value("priest"), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Candidate {
    /// Unique key, e.g. an e-mail address.
    pub key: String,
    /// Stated preferences; absent attributes are neutral.
    pub preferences: HashMap<String, Preference>,
    /// Sessions the candidate can attend.
    pub availability: BTreeSet<String>,
}

impl Candidate {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            preferences: HashMap::new(),
            availability: BTreeSet::new(),
        }
    }

    pub fn with_preference(mut self, attribute: impl Into<String>, pref: Preference) -> Self {
        self.preferences.insert(attribute.into(), pref);
        self
    }

    pub fn with_availability<I, S>(mut self, sessions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.availability.extend(sessions.into_iter().map(Into::into));
        self
    }

    pub fn preference(&self, attribute: &str) -> Preference {
        self.preferences.get(attribute).copied().unwrap_or_default()
    }

    /// Signed value in {-1, 0, +1}.
    pub fn value(&self, attribute: &str) -> i64 {
        self.preference(attribute).value()
    }

    pub fn is_available(&self, session: &str) -> bool {
        self.availability.contains(session)
    }
}
