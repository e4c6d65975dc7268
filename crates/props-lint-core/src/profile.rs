//! Configuration profiles and rule profile scoping.

use std::fmt;

/// A configuration profile.
///
/// Properties files carry a base (unprefixed) set of keys plus optional
/// profile-prefixed overrides (`%prod.some.key=value`). Validation always
/// runs under exactly one active profile; lookups under a named profile
/// fall back to the base set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Profile {
    /// The unprefixed property set, used as fallback for named profiles.
    Base,
    /// A named profile such as `prod` or `dev`.
    Named(String),
}

impl Profile {
    /// Creates a named profile.
    ///
    /// # Errors
    ///
    /// Returns error if the name is empty or contains characters outside
    /// `[A-Za-z0-9_-]`.
    pub fn named(name: &str) -> Result<Self, InvalidProfile> {
        if name.is_empty() {
            return Err(InvalidProfile::Empty);
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(InvalidProfile::InvalidName {
                name: name.to_string(),
            });
        }
        Ok(Self::Named(name.to_string()))
    }

    /// Returns true for the base profile.
    #[must_use]
    pub fn is_base(&self) -> bool {
        matches!(self, Self::Base)
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base => write!(f, "base"),
            Self::Named(name) => write!(f, "{name}"),
        }
    }
}

/// Error for malformed profile names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidProfile {
    /// Profile name is empty.
    #[error("profile name must not be empty")]
    Empty,

    /// Profile name contains invalid characters.
    #[error("invalid profile name `{name}`: must be [A-Za-z0-9_-]")]
    InvalidName {
        /// The invalid name.
        name: String,
    },
}

/// The set of profiles a rule applies to.
///
/// Rules conventionally exempt `dev` and `test`, which is the default
/// scope. A rule whose scope excludes the active profile is skipped
/// entirely: it contributes neither a pass nor a violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileScope {
    /// Applies under every profile, base included.
    All,
    /// Applies under every profile except the listed ones.
    Except(Vec<Profile>),
    /// Applies only under the listed profiles.
    Only(Vec<Profile>),
}

impl ProfileScope {
    /// Tests whether a rule with this scope applies under `profile`.
    #[must_use]
    pub fn applies_to(&self, profile: &Profile) -> bool {
        match self {
            Self::All => true,
            Self::Except(excluded) => !excluded.contains(profile),
            Self::Only(included) => included.contains(profile),
        }
    }
}

impl Default for ProfileScope {
    /// All profiles except `dev` and `test`.
    fn default() -> Self {
        Self::Except(vec![
            Profile::Named("dev".to_string()),
            Profile::Named("test".to_string()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- Profile --

    #[test]
    fn named_profile_valid() {
        assert!(Profile::named("prod").is_ok());
        assert!(Profile::named("stage-2").is_ok());
        assert!(Profile::named("ci_nightly").is_ok());
    }

    #[test]
    fn named_profile_empty_rejected() {
        assert!(matches!(Profile::named(""), Err(InvalidProfile::Empty)));
    }

    #[test]
    fn named_profile_invalid_chars_rejected() {
        assert!(matches!(
            Profile::named("pr od"),
            Err(InvalidProfile::InvalidName { .. })
        ));
        assert!(matches!(
            Profile::named("prod.eu"),
            Err(InvalidProfile::InvalidName { .. })
        ));
    }

    #[test]
    fn profile_display() {
        assert_eq!(Profile::Base.to_string(), "base");
        assert_eq!(Profile::named("prod").unwrap().to_string(), "prod");
    }

    // -- ProfileScope --

    #[test]
    fn default_scope_exempts_dev_and_test() {
        let scope = ProfileScope::default();
        assert!(scope.applies_to(&Profile::Base));
        assert!(scope.applies_to(&Profile::named("prod").unwrap()));
        assert!(!scope.applies_to(&Profile::named("dev").unwrap()));
        assert!(!scope.applies_to(&Profile::named("test").unwrap()));
    }

    #[test]
    fn only_scope_is_exclusive() {
        let scope = ProfileScope::Only(vec![Profile::named("prod").unwrap()]);
        assert!(scope.applies_to(&Profile::named("prod").unwrap()));
        assert!(!scope.applies_to(&Profile::Base));
        assert!(!scope.applies_to(&Profile::named("dev").unwrap()));
    }

    #[test]
    fn all_scope_includes_everything() {
        let scope = ProfileScope::All;
        assert!(scope.applies_to(&Profile::Base));
        assert!(scope.applies_to(&Profile::named("test").unwrap()));
    }
}
