//! Rule presets for common validation profiles.

use props_lint_core::{Catalogue, CatalogueError, ProfileScope, Rule};

use crate::{consumer, producer, security, streams};

/// Preset rule sets for props-lint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Recommended rules with dev/test exempted.
    Recommended,
    /// Every recommended rule, enforced in every profile.
    Strict,
    /// A minimal core for gradual adoption.
    Minimal,
}

impl Preset {
    /// Builds the catalogue for this preset.
    ///
    /// # Errors
    ///
    /// Returns an error if a built-in rule definition is invalid.
    pub fn catalogue(self) -> Result<Catalogue, CatalogueError> {
        match self {
            Self::Recommended => recommended_catalogue(),
            Self::Strict => strict_catalogue(),
            Self::Minimal => minimal_catalogue(),
        }
    }
}

/// Returns every built-in rule, in evaluation order.
///
/// Groups run security first, then producer, consumer, and streams.
///
/// # Errors
///
/// Returns an error if a built-in rule definition is invalid.
pub fn all_rules() -> Result<Vec<Rule>, CatalogueError> {
    let mut rules = security::rules()?;
    rules.extend(producer::rules()?);
    rules.extend(consumer::rules()?);
    rules.extend(streams::rules()?);
    Ok(rules)
}

/// Builds the recommended catalogue.
///
/// Every built-in rule with its default scope, which exempts the
/// `dev` and `test` profiles.
///
/// # Errors
///
/// Returns an error if a built-in rule definition is invalid.
pub fn recommended_catalogue() -> Result<Catalogue, CatalogueError> {
    Catalogue::builder().rules(all_rules()?).build()
}

/// Builds the strict catalogue.
///
/// The recommended rules rescoped to apply in every profile, dev and
/// test included.
///
/// # Errors
///
/// Returns an error if a built-in rule definition is invalid.
pub fn strict_catalogue() -> Result<Catalogue, CatalogueError> {
    let rules = all_rules()?
        .into_iter()
        .map(|rule| rule.with_scope(ProfileScope::All))
        .collect::<Vec<_>>();
    Catalogue::builder().rules(rules).build()
}

/// Builds the minimal catalogue.
///
/// For gradual adoption, only the two rules with the highest
/// incident cost: `security-protocol` and `producer-acks`.
///
/// # Errors
///
/// Returns an error if a built-in rule definition is invalid.
pub fn minimal_catalogue() -> Result<Catalogue, CatalogueError> {
    const KEEP: [&str; 2] = ["security-protocol", "producer-acks"];
    let rules = all_rules()?
        .into_iter()
        .filter(|rule| KEEP.contains(&rule.id()))
        .collect::<Vec<_>>();
    Catalogue::builder().rules(rules).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use props_lint_core::{Profile, PropertyStore, Validator};

    #[test]
    fn all_rule_ids_are_unique() {
        // builder() rejects duplicates, so building is the check.
        let catalogue = recommended_catalogue().expect("recommended catalogue builds");
        assert!(catalogue.len() >= 20);
    }

    #[test]
    fn strict_preset_enforces_in_dev() {
        let store = PropertyStore::parse("kafka-streams.producer.acks=1\n");
        let dev = Profile::named("dev").expect("valid");

        let recommended = Validator::new(recommended_catalogue().expect("builds"))
            .validate(&store, &dev);
        assert!(recommended.passed());

        let strict = Validator::new(strict_catalogue().expect("builds")).validate(&store, &dev);
        assert!(strict
            .violations
            .iter()
            .any(|v| v.rule_id == "producer-acks"));
    }

    #[test]
    fn minimal_preset_contains_only_the_core_rules() {
        let catalogue = minimal_catalogue().expect("minimal catalogue builds");
        let ids: Vec<&str> = catalogue.iter().map(Rule::id).collect();
        assert_eq!(ids, ["security-protocol", "producer-acks"]);
    }

    #[test]
    fn presets_dispatch_to_their_catalogues() {
        assert_eq!(
            Preset::Minimal.catalogue().expect("builds").len(),
            minimal_catalogue().expect("builds").len()
        );
        assert_eq!(
            Preset::Strict.catalogue().expect("builds").len(),
            recommended_catalogue().expect("builds").len()
        );
    }
}
