//! Casting configuration: vocabulary, role table, bias and active sessions.

use super::attribute::Vocabulary;
use super::role::Role;
use crate::error::ConfigError;
use std::collections::HashSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Largest accepted bias magnitude.
pub const MAX_BIAS: i64 = i32::MAX as i64;

/// Configuration consumed by the encoder and optimizer.
///
/// # Examples
///
/// ```
/// use u_casting::model::{CastingConfig, Role, Vocabulary};
///
/// let config = CastingConfig::default()
///     .with_vocabulary(Vocabulary::new().with_sessions(["sunEve"]).with_traits(["spy"]))
///     .with_role(Role::new("zeus", ["sunEve", "spy"]))
///     .with_bias(3);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CastingConfig {
    /// The closed attribute vocabulary.
    pub vocabulary: Vocabulary,

    /// Role table.
    pub roles: Vec<Role>,

    /// Reward for casting any willing candidate at all.
    pub bias: i64,

    /// Sessions that are happening. Empty means all vocabulary sessions.
    pub sessions: Vec<String>,
}

impl Default for CastingConfig {
    fn default() -> Self {
        Self {
            vocabulary: Vocabulary::new(),
            roles: Vec::new(),
            bias: 3,
            sessions: Vec::new(),
        }
    }
}

impl CastingConfig {
    pub fn with_vocabulary(mut self, vocabulary: Vocabulary) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.roles.push(role);
        self
    }

    pub fn with_roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.roles.extend(roles);
        self
    }

    pub fn with_bias(mut self, bias: i64) -> Self {
        self.bias = bias;
        self
    }

    pub fn with_sessions<I, S>(mut self, sessions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sessions = sessions.into_iter().map(Into::into).collect();
        self
    }

    /// Active session identifiers.
    pub fn active_sessions(&self) -> Vec<&str> {
        if self.sessions.is_empty() {
            self.vocabulary.sessions().collect()
        } else {
            self.sessions.iter().map(String::as_str).collect()
        }
    }

    /// Checks the configuration once, before any encoding or search.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.vocabulary.validate()?;

        if !(-MAX_BIAS..=MAX_BIAS).contains(&self.bias) {
            return Err(ConfigError::BiasOutOfRange(self.bias));
        }

        let mut names = HashSet::new();
        for role in &self.roles {
            if !names.insert(role.name.as_str()) {
                return Err(ConfigError::DuplicateRole(role.name.clone()));
            }
            let mut seen = HashSet::new();
            for attr in &role.attributes {
                if !self.vocabulary.contains(attr) {
                    return Err(ConfigError::UnknownAttribute {
                        role: role.name.clone(),
                        attribute: attr.clone(),
                    });
                }
                if !seen.insert(attr.as_str()) {
                    return Err(ConfigError::RepeatedRoleAttribute {
                        role: role.name.clone(),
                        attribute: attr.clone(),
                    });
                }
            }
            if role.sessions(&self.vocabulary).next().is_none() {
                return Err(ConfigError::MissingSession(role.name.clone()));
            }
        }

        for session in &self.sessions {
            if !self.vocabulary.is_session(session) {
                return Err(ConfigError::UnknownSession(session.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> CastingConfig {
        CastingConfig::default().with_vocabulary(
            Vocabulary::new()
                .with_sessions(["friEve", "satEve"])
                .with_traits(["spy", "liar"]),
        )
    }

    #[test]
    fn test_default_bias() {
        assert_eq!(CastingConfig::default().bias, 3);
    }

    #[test]
    fn test_validate_ok() {
        let config = base().with_role(Role::new("zeus", ["friEve", "spy"]));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_attribute() {
        let config = base().with_role(Role::new("zeus", ["friEve", "priest"]));
        assert_eq!(
            config.validate(),
            Err(ConfigError::UnknownAttribute {
                role: "zeus".into(),
                attribute: "priest".into()
            })
        );
    }

    #[test]
    fn test_missing_session() {
        let config = base().with_role(Role::new("zeus", ["spy"]));
        assert_eq!(
            config.validate(),
            Err(ConfigError::MissingSession("zeus".into()))
        );
    }

    #[test]
    fn test_duplicate_role() {
        let config = base()
            .with_role(Role::new("zeus", ["friEve"]))
            .with_role(Role::new("zeus", ["satEve"]));
        assert_eq!(
            config.validate(),
            Err(ConfigError::DuplicateRole("zeus".into()))
        );
    }

    #[test]
    fn test_repeated_role_attribute() {
        let config = base().with_role(Role::new("zeus", ["friEve", "spy", "spy"]));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::RepeatedRoleAttribute { .. })
        ));
    }

    #[test]
    fn test_unknown_active_session() {
        let config = base().with_sessions(["spy"]);
        assert_eq!(
            config.validate(),
            Err(ConfigError::UnknownSession("spy".into()))
        );
    }

    #[test]
    fn test_bias_range() {
        assert!(base().with_bias(MAX_BIAS).validate().is_ok());
        assert_eq!(
            base().with_bias(i64::MIN).validate(),
            Err(ConfigError::BiasOutOfRange(i64::MIN))
        );
    }

    #[test]
    fn test_active_sessions_default_to_vocabulary() {
        assert_eq!(base().active_sessions(), vec!["friEve", "satEve"]);
        assert_eq!(base().with_sessions(["satEve"]).active_sessions(), vec!["satEve"]);
    }
}
