//! The ordered rule catalogue and its registration builder.

use crate::rule::Rule;

/// Errors in catalogue construction.
///
/// A catalogue whose definition is invalid is a programming error in the
/// rule set, reported before any evaluation begins.
#[derive(Debug, thiserror::Error)]
pub enum CatalogueError {
    /// Two rules share the same identifier.
    #[error("duplicate rule id `{id}`")]
    DuplicateRuleId {
        /// The duplicated identifier.
        id: String,
    },

    /// A rule has an empty identifier.
    #[error("rule at registration index {index} has an empty id")]
    EmptyRuleId {
        /// Zero-based registration index of the offending rule.
        index: usize,
    },

    /// A pattern failed to compile.
    #[error(transparent)]
    Pattern(#[from] crate::rule::PatternError),
}

/// Builder for registering rules into a [`Catalogue`].
///
/// This is the extension point: collaborators add rules here without
/// touching the validator or the store.
#[derive(Debug, Default)]
pub struct CatalogueBuilder {
    rules: Vec<Rule>,
}

impl CatalogueBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a rule. Registration order determines violation order
    /// in the report.
    #[must_use]
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Registers multiple rules in order.
    #[must_use]
    pub fn rules<I>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = Rule>,
    {
        self.rules.extend(rules);
        self
    }

    /// Builds the catalogue.
    ///
    /// # Errors
    ///
    /// Returns an error if any rule id is empty or duplicated.
    pub fn build(self) -> Result<Catalogue, CatalogueError> {
        let mut seen = std::collections::HashSet::new();
        for (index, rule) in self.rules.iter().enumerate() {
            if rule.id().is_empty() {
                return Err(CatalogueError::EmptyRuleId { index });
            }
            if !seen.insert(rule.id()) {
                return Err(CatalogueError::DuplicateRuleId {
                    id: rule.id().to_string(),
                });
            }
        }
        Ok(Catalogue { rules: self.rules })
    }
}

/// A fixed, ordered set of rules evaluated in one run.
///
/// Constructed explicitly at startup and passed into the validator; no
/// process-wide default catalogue exists, so independently configured
/// runs can coexist in one process.
#[derive(Debug, Clone)]
pub struct Catalogue {
    rules: Vec<Rule>,
}

impl Catalogue {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> CatalogueBuilder {
        CatalogueBuilder::new()
    }

    /// Returns the rules in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if no rules are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Looks up a rule by identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::RuleKind;

    fn exact(id: &str) -> Rule {
        Rule::new(
            id,
            "",
            RuleKind::ExactValue {
                key: "k".to_string(),
                expected: "v".to_string(),
            },
        )
    }

    #[test]
    fn builder_preserves_registration_order() {
        let catalogue = Catalogue::builder()
            .rule(exact("first"))
            .rules([exact("second"), exact("third")])
            .build()
            .unwrap();
        let ids: Vec<&str> = catalogue.iter().map(Rule::id).collect();
        assert_eq!(ids, ["first", "second", "third"]);
    }

    #[test]
    fn duplicate_id_rejected() {
        let result = Catalogue::builder()
            .rule(exact("same"))
            .rule(exact("same"))
            .build();
        assert!(matches!(
            result,
            Err(CatalogueError::DuplicateRuleId { .. })
        ));
    }

    #[test]
    fn empty_id_rejected() {
        let result = Catalogue::builder().rule(exact("")).build();
        assert!(matches!(result, Err(CatalogueError::EmptyRuleId { index: 0 })));
    }

    #[test]
    fn get_finds_rule_by_id() {
        let catalogue = Catalogue::builder().rule(exact("a")).build().unwrap();
        assert!(catalogue.get("a").is_some());
        assert!(catalogue.get("b").is_none());
    }

    #[test]
    fn empty_catalogue_is_allowed() {
        let catalogue = Catalogue::builder().build().unwrap();
        assert!(catalogue.is_empty());
        assert_eq!(catalogue.len(), 0);
    }
}
