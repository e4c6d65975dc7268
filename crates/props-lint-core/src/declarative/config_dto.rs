//! Serde DTOs for the declarative rules file.
//!
//! These types mirror the TOML surface exactly and perform no
//! validation; [`loader`](super::loader) converts them to domain rules.

use serde::Deserialize;

/// Top-level structure of a declarative rules file.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogueDto {
    /// Rule definitions, in file order (which becomes registration order).
    #[serde(default)]
    pub rules: Vec<RuleDto>,
}

/// One `[[rules]]` entry.
///
/// A flat bag of optional fields; which fields are mandatory depends on
/// `type` and is enforced by the loader.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RuleDto {
    /// Rule identifier, unique within the file.
    pub id: String,

    /// Rule variant: `exact-value`, `optional-exact-value`, `one-of`,
    /// `numeric-range`, `regex-match`, `ratio-or-ordering`,
    /// `mutual-exclusivity`, `conditional-range`, `must-be-absent`.
    #[serde(rename = "type")]
    pub rule_type: String,

    /// Human-readable explanation.
    #[serde(default)]
    pub description: String,

    /// Target key for single-key variants.
    #[serde(default)]
    pub key: Option<String>,

    /// Key set for `mutual-exclusivity`.
    #[serde(default)]
    pub keys: Option<Vec<String>>,

    /// Expected value for exact-value variants.
    #[serde(default)]
    pub expected: Option<String>,

    /// Allowed values for `one-of`.
    #[serde(default)]
    pub allowed: Option<Vec<String>>,

    /// Whether absence is itself a failure (variant-specific default).
    #[serde(default)]
    pub required: Option<bool>,

    /// Lower bound for numeric variants.
    #[serde(default)]
    pub min: Option<i64>,

    /// Upper bound for numeric variants.
    #[serde(default)]
    pub max: Option<i64>,

    /// Whether numeric bounds are inclusive (default: true).
    #[serde(default)]
    pub inclusive: Option<bool>,

    /// Full-value regex for `regex-match`.
    #[serde(default)]
    pub pattern: Option<String>,

    /// First key for `ratio-or-ordering`.
    #[serde(default)]
    pub key_a: Option<String>,

    /// Second key for `ratio-or-ordering`.
    #[serde(default)]
    pub key_b: Option<String>,

    /// Relation name: `greater-than`, `greater-or-equal`, `less-than`,
    /// `less-or-equal`, `multiple-between`.
    #[serde(default)]
    pub relation: Option<String>,

    /// Lower multiple bound for `multiple-between`.
    #[serde(default)]
    pub min_multiple: Option<f64>,

    /// Upper multiple bound for `multiple-between`.
    #[serde(default)]
    pub max_multiple: Option<f64>,

    /// Documented default for `key-a` when absent.
    #[serde(default)]
    pub default_a: Option<i64>,

    /// Documented default for `key-b` when absent.
    #[serde(default)]
    pub default_b: Option<i64>,

    /// Whether zero keys set fails `mutual-exclusivity`.
    #[serde(default)]
    pub require_exactly_one: Option<bool>,

    /// Guard key for `conditional-range`.
    #[serde(default)]
    pub guard_key: Option<String>,

    /// Guard value for `conditional-range`.
    #[serde(default)]
    pub guard_value: Option<String>,

    /// Target key for `conditional-range`.
    #[serde(default)]
    pub target_key: Option<String>,

    /// Sanctioned overrides for `must-be-absent`.
    #[serde(default)]
    pub allowed_overrides: Option<Vec<String>>,

    /// Profiles the rule is skipped under. Mutually exclusive with
    /// `only-profiles`; default is `["dev", "test"]`.
    #[serde(default)]
    pub skip_profiles: Option<Vec<String>>,

    /// Profiles the rule is restricted to.
    #[serde(default)]
    pub only_profiles: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_parses() {
        let dto: CatalogueDto = toml::from_str("").unwrap();
        assert!(dto.rules.is_empty());
    }

    #[test]
    fn kebab_case_fields_parse() {
        let dto: CatalogueDto = toml::from_str(
            r#"
[[rules]]
id = "timeouts"
type = "ratio-or-ordering"
key-a = "a"
key-b = "b"
relation = "greater-than"
default-a = 60000
only-profiles = ["prod"]
"#,
        )
        .unwrap();
        let rule = &dto.rules[0];
        assert_eq!(rule.key_a.as_deref(), Some("a"));
        assert_eq!(rule.default_a, Some(60_000));
        assert_eq!(rule.only_profiles.as_deref(), Some(&["prod".to_string()][..]));
    }
}
