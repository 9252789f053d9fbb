//! Attribute vocabulary and candidate preference values.

use crate::error::ConfigError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What an attribute stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum AttributeKind {
    /// A session identifier (e.g. one run of an event).
    Session,
    /// A trait or vetoable flag.
    Trait,
}

/// A named entry of the closed vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Attribute {
    pub name: String,
    pub kind: AttributeKind,
}

/// A candidate's stance on one attribute.
///
/// An attribute the candidate did not mention is [`Preference::Neutral`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "i64", into = "i64"))]
pub enum Preference {
    /// Absolute veto (-1): never cast in a role carrying this attribute.
    Veto,
    /// No opinion (0).
    #[default]
    Neutral,
    /// Strong preference (+1).
    Preferred,
}

impl Preference {
    /// Signed contribution to a score.
    pub fn value(self) -> i64 {
        match self {
            Preference::Veto => -1,
            Preference::Neutral => 0,
            Preference::Preferred => 1,
        }
    }

    pub fn is_veto(self) -> bool {
        self == Preference::Veto
    }
}

impl TryFrom<i64> for Preference {
    type Error = ConfigError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Preference::Veto),
            0 => Ok(Preference::Neutral),
            1 => Ok(Preference::Preferred),
            other => Err(ConfigError::InvalidPreference(other)),
        }
    }
}

impl From<Preference> for i64 {
    fn from(p: Preference) -> i64 {
        p.value()
    }
}

/// The closed set of attributes known at configuration time.
///
/// Lookups are linear; vocabularies are a few dozen entries.
///
/// # Examples
///
/// ```
/// use u_casting::model::Vocabulary;
///
/// let vocab = Vocabulary::new()
///     .with_sessions(["friEve", "satEve"])
///     .with_traits(["spy", "liar"]);
/// assert!(vocab.is_session("friEve"));
/// assert!(!vocab.is_session("spy"));
/// assert_eq!(vocab.len(), 4);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vocabulary {
    attributes: Vec<Attribute>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one attribute. Duplicates are reported by [`Vocabulary::validate`].
    pub fn with_attribute(mut self, name: impl Into<String>, kind: AttributeKind) -> Self {
        self.attributes.push(Attribute {
            name: name.into(),
            kind,
        });
        self
    }

    pub fn with_sessions<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names
            .into_iter()
            .fold(self, |v, n| v.with_attribute(n, AttributeKind::Session))
    }

    pub fn with_traits<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names
            .into_iter()
            .fold(self, |v, n| v.with_attribute(n, AttributeKind::Trait))
    }

    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Whether `name` is a session identifier.
    pub fn is_session(&self, name: &str) -> bool {
        matches!(self.get(name), Some(a) if a.kind == AttributeKind::Session)
    }

    /// Session identifiers in declaration order.
    pub fn sessions(&self) -> impl Iterator<Item = &str> {
        self.attributes
            .iter()
            .filter(|a| a.kind == AttributeKind::Session)
            .map(|a| a.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Rejects names declared more than once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (i, attr) in self.attributes.iter().enumerate() {
            if self.attributes[..i].iter().any(|a| a.name == attr.name) {
                return Err(ConfigError::DuplicateAttribute(attr.name.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preference_values() {
        assert_eq!(Preference::Veto.value(), -1);
        assert_eq!(Preference::Neutral.value(), 0);
        assert_eq!(Preference::Preferred.value(), 1);
        assert_eq!(Preference::default(), Preference::Neutral);
        assert!(Preference::Veto.is_veto());
    }

    #[test]
    fn test_preference_try_from() {
        assert_eq!(Preference::try_from(-1), Ok(Preference::Veto));
        assert_eq!(Preference::try_from(1), Ok(Preference::Preferred));
        assert_eq!(
            Preference::try_from(2),
            Err(ConfigError::InvalidPreference(2))
        );
    }

    #[test]
    fn test_vocabulary_kinds() {
        let vocab = Vocabulary::new()
            .with_sessions(["sunEve"])
            .with_traits(["priest", "spy"]);
        assert!(vocab.is_session("sunEve"));
        assert!(!vocab.is_session("priest"));
        assert!(!vocab.is_session("missing"));
        assert!(vocab.contains("spy"));
        assert_eq!(vocab.sessions().collect::<Vec<_>>(), vec!["sunEve"]);
        assert!(vocab.validate().is_ok());
    }

    #[test]
    fn test_vocabulary_duplicate() {
        let vocab = Vocabulary::new()
            .with_sessions(["sunEve"])
            .with_traits(["sunEve"]);
        assert_eq!(
            vocab.validate(),
            Err(ConfigError::DuplicateAttribute("sunEve".into()))
        );
    }
}
