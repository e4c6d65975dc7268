//! DTO → domain rule conversion with validation.

use crate::catalogue::{Catalogue, CatalogueError};
use crate::profile::{InvalidProfile, Profile, ProfileScope};
use crate::rule::{PatternError, Relation, Rule, RuleKind, ValuePattern};

use super::config_dto::{CatalogueDto, RuleDto};

use std::path::{Path, PathBuf};

/// Errors loading a declarative rules file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// IO error reading the rules file.
    #[error("failed to read rules file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// TOML syntax or structure error.
    #[error("failed to parse rules file: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// A field required by the rule type is missing.
    #[error("rule `{rule_id}`: type `{rule_type}` requires field `{field}`")]
    MissingField {
        /// The rule with the missing field.
        rule_id: String,
        /// The declared rule type.
        rule_type: String,
        /// The missing field name.
        field: String,
    },

    /// The `type` field names no known variant.
    #[error("rule `{rule_id}`: unknown rule type `{rule_type}`")]
    UnknownRuleType {
        /// The offending rule.
        rule_id: String,
        /// The unknown type name.
        rule_type: String,
    },

    /// The `relation` field names no known relation.
    #[error(
        "rule `{rule_id}`: unknown relation `{value}`, expected: greater-than, \
         greater-or-equal, less-than, less-or-equal, multiple-between"
    )]
    UnknownRelation {
        /// The offending rule.
        rule_id: String,
        /// The unknown relation name.
        value: String,
    },

    /// A regex pattern failed to compile.
    #[error("rule `{rule_id}`: {source}")]
    Pattern {
        /// The offending rule.
        rule_id: String,
        /// The underlying pattern error.
        source: PatternError,
    },

    /// Both `skip-profiles` and `only-profiles` are set.
    #[error("rule `{rule_id}`: at most one of `skip-profiles` or `only-profiles` may be set")]
    ConflictingScope {
        /// The offending rule.
        rule_id: String,
    },

    /// A profile name in the scope lists is malformed.
    #[error("rule `{rule_id}`: {source}")]
    Profile {
        /// The offending rule.
        rule_id: String,
        /// The underlying profile error.
        source: InvalidProfile,
    },

    /// Catalogue-level error (duplicate or empty ids).
    #[error(transparent)]
    Catalogue(#[from] CatalogueError),
}

/// Loads a catalogue from declarative TOML text.
///
/// # Errors
///
/// Returns the first definition error encountered; a file with an
/// invalid rule definition never produces a partial catalogue.
pub fn load_catalogue_from_str(text: &str) -> Result<Catalogue, LoadError> {
    let dto: CatalogueDto = toml::from_str(text).map_err(|e| LoadError::Parse {
        message: e.to_string(),
    })?;
    let rules = dto
        .rules
        .into_iter()
        .map(convert_rule)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Catalogue::builder().rules(rules).build()?)
}

/// Loads a catalogue from a declarative TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or any definition is
/// invalid.
pub fn load_catalogue_from_file(path: &Path) -> Result<Catalogue, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    load_catalogue_from_str(&text)
}

fn convert_rule(dto: RuleDto) -> Result<Rule, LoadError> {
    let scope = convert_scope(&dto)?;
    let kind = convert_kind(&dto)?;
    Ok(Rule::new(dto.id, dto.description, kind).with_scope(scope))
}

fn convert_scope(dto: &RuleDto) -> Result<ProfileScope, LoadError> {
    let parse_profiles = |names: &[String]| -> Result<Vec<Profile>, LoadError> {
        names
            .iter()
            .map(|n| {
                Profile::named(n).map_err(|e| LoadError::Profile {
                    rule_id: dto.id.clone(),
                    source: e,
                })
            })
            .collect()
    };

    match (&dto.skip_profiles, &dto.only_profiles) {
        (Some(_), Some(_)) => Err(LoadError::ConflictingScope {
            rule_id: dto.id.clone(),
        }),
        (Some(skip), None) => Ok(ProfileScope::Except(parse_profiles(skip)?)),
        (None, Some(only)) => Ok(ProfileScope::Only(parse_profiles(only)?)),
        (None, None) => Ok(ProfileScope::default()),
    }
}

fn convert_kind(dto: &RuleDto) -> Result<RuleKind, LoadError> {
    let require = |field: &str, value: Option<&String>| -> Result<String, LoadError> {
        value.cloned().ok_or_else(|| LoadError::MissingField {
            rule_id: dto.id.clone(),
            rule_type: dto.rule_type.clone(),
            field: field.to_string(),
        })
    };
    let require_i64 = |field: &str, value: Option<i64>| -> Result<i64, LoadError> {
        value.ok_or_else(|| LoadError::MissingField {
            rule_id: dto.id.clone(),
            rule_type: dto.rule_type.clone(),
            field: field.to_string(),
        })
    };

    match dto.rule_type.as_str() {
        "exact-value" => Ok(RuleKind::ExactValue {
            key: require("key", dto.key.as_ref())?,
            expected: require("expected", dto.expected.as_ref())?,
        }),

        "optional-exact-value" => Ok(RuleKind::OptionalExactValue {
            key: require("key", dto.key.as_ref())?,
            expected: require("expected", dto.expected.as_ref())?,
        }),

        "one-of" => Ok(RuleKind::OneOf {
            key: require("key", dto.key.as_ref())?,
            allowed: dto.allowed.clone().ok_or_else(|| LoadError::MissingField {
                rule_id: dto.id.clone(),
                rule_type: dto.rule_type.clone(),
                field: "allowed".to_string(),
            })?,
            required: dto.required.unwrap_or(false),
        }),

        "numeric-range" => Ok(RuleKind::NumericRange {
            key: require("key", dto.key.as_ref())?,
            min: require_i64("min", dto.min)?,
            max: dto.max,
            inclusive: dto.inclusive.unwrap_or(true),
            required: dto.required.unwrap_or(false),
        }),

        "regex-match" => {
            let raw = require("pattern", dto.pattern.as_ref())?;
            let pattern = ValuePattern::new(&raw).map_err(|e| LoadError::Pattern {
                rule_id: dto.id.clone(),
                source: e,
            })?;
            Ok(RuleKind::RegexMatch {
                key: require("key", dto.key.as_ref())?,
                pattern,
                required: dto.required.unwrap_or(false),
            })
        }

        "ratio-or-ordering" => Ok(RuleKind::RatioOrOrdering {
            key_a: require("key-a", dto.key_a.as_ref())?,
            key_b: require("key-b", dto.key_b.as_ref())?,
            relation: convert_relation(dto)?,
            default_a: dto.default_a,
            default_b: dto.default_b,
        }),

        "mutual-exclusivity" => Ok(RuleKind::MutualExclusivity {
            keys: dto.keys.clone().ok_or_else(|| LoadError::MissingField {
                rule_id: dto.id.clone(),
                rule_type: dto.rule_type.clone(),
                field: "keys".to_string(),
            })?,
            require_exactly_one: dto.require_exactly_one.unwrap_or(false),
        }),

        "conditional-range" => Ok(RuleKind::ConditionalRange {
            guard_key: require("guard-key", dto.guard_key.as_ref())?,
            guard_value: require("guard-value", dto.guard_value.as_ref())?,
            target_key: require("target-key", dto.target_key.as_ref())?,
            min: require_i64("min", dto.min)?,
            max: dto.max,
            required: dto.required.unwrap_or(true),
        }),

        "must-be-absent" => Ok(RuleKind::MustBeAbsent {
            key: require("key", dto.key.as_ref())?,
            allowed_overrides: dto.allowed_overrides.clone().unwrap_or_default(),
        }),

        other => Err(LoadError::UnknownRuleType {
            rule_id: dto.id.clone(),
            rule_type: other.to_string(),
        }),
    }
}

fn convert_relation(dto: &RuleDto) -> Result<Relation, LoadError> {
    let name = dto.relation.as_deref().ok_or_else(|| LoadError::MissingField {
        rule_id: dto.id.clone(),
        rule_type: dto.rule_type.clone(),
        field: "relation".to_string(),
    })?;

    match name {
        "greater-than" => Ok(Relation::GreaterThan),
        "greater-or-equal" => Ok(Relation::GreaterOrEqual),
        "less-than" => Ok(Relation::LessThan),
        "less-or-equal" => Ok(Relation::LessOrEqual),
        "multiple-between" => {
            let min = dto.min_multiple.ok_or_else(|| LoadError::MissingField {
                rule_id: dto.id.clone(),
                rule_type: dto.rule_type.clone(),
                field: "min-multiple".to_string(),
            })?;
            let max = dto.max_multiple.ok_or_else(|| LoadError::MissingField {
                rule_id: dto.id.clone(),
                rule_type: dto.rule_type.clone(),
                field: "max-multiple".to_string(),
            })?;
            Ok(Relation::MultipleBetween { min, max })
        }
        other => Err(LoadError::UnknownRelation {
            rule_id: dto.id.clone(),
            value: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- Happy path --

    #[test]
    fn load_empty_file() {
        let catalogue = load_catalogue_from_str("").unwrap();
        assert!(catalogue.is_empty());
    }

    #[test]
    fn load_full_catalogue() {
        let catalogue = load_catalogue_from_str(
            r#"
[[rules]]
id = "producer-acks"
type = "exact-value"
key = "kafka-streams.producer.acks"
expected = "all"
description = "Producer must wait for all in-sync replicas."

[[rules]]
id = "compression"
type = "one-of"
key = "kafka-streams.producer.compression.type"
allowed = ["snappy", "lz4", "zstd"]
required = true

[[rules]]
id = "standby-replicas"
type = "numeric-range"
key = "kafka-streams.num.standby.replicas"
min = 0
max = 2

[[rules]]
id = "topic-shape"
type = "regex-match"
key = "topics"
pattern = "[\\w-]+(,[\\w-]+)*"

[[rules]]
id = "timeout-ordering"
type = "ratio-or-ordering"
key-a = "default.api.timeout.ms"
key-b = "request.timeout.ms"
relation = "greater-than"
default-a = 60000
default-b = 30000

[[rules]]
id = "app-id"
type = "mutual-exclusivity"
keys = ["application-id", "application.id"]
require-exactly-one = true

[[rules]]
id = "eos-commit"
type = "conditional-range"
guard-key = "processing.guarantee"
guard-value = "exactly_once_v2"
target-key = "commit.interval.ms"
min = 1
max = 1000

[[rules]]
id = "no-auto-create"
type = "must-be-absent"
key = "auto.create.topics.enable"
allowed-overrides = ["false"]
"#,
        )
        .unwrap();

        assert_eq!(catalogue.len(), 8);
        let ids: Vec<&str> = catalogue.iter().map(Rule::id).collect();
        assert_eq!(ids[0], "producer-acks");
        assert_eq!(ids[7], "no-auto-create");
    }

    #[test]
    fn default_scope_exempts_dev_and_test() {
        let catalogue = load_catalogue_from_str(
            r#"
[[rules]]
id = "r"
type = "exact-value"
key = "k"
expected = "v"
"#,
        )
        .unwrap();
        let rule = catalogue.get("r").unwrap();
        assert!(!rule.applies_to(&Profile::named("dev").unwrap()));
        assert!(rule.applies_to(&Profile::named("prod").unwrap()));
    }

    #[test]
    fn only_profiles_narrows_scope() {
        let catalogue = load_catalogue_from_str(
            r#"
[[rules]]
id = "r"
type = "exact-value"
key = "k"
expected = "v"
only-profiles = ["prod"]
"#,
        )
        .unwrap();
        let rule = catalogue.get("r").unwrap();
        assert!(rule.applies_to(&Profile::named("prod").unwrap()));
        assert!(!rule.applies_to(&Profile::Base));
    }

    // -- Error cases --

    #[test]
    fn rejects_unknown_rule_type() {
        let result = load_catalogue_from_str(
            r#"
[[rules]]
id = "bad"
type = "fuzzy-match"
key = "k"
"#,
        );
        assert!(matches!(result, Err(LoadError::UnknownRuleType { .. })));
    }

    #[test]
    fn rejects_missing_field() {
        let result = load_catalogue_from_str(
            r#"
[[rules]]
id = "bad"
type = "exact-value"
key = "k"
"#,
        );
        assert!(matches!(
            result,
            Err(LoadError::MissingField { ref field, .. }) if field == "expected"
        ));
    }

    #[test]
    fn rejects_bad_pattern_at_load_time() {
        let result = load_catalogue_from_str(
            r#"
[[rules]]
id = "bad"
type = "regex-match"
key = "k"
pattern = "(unclosed"
"#,
        );
        assert!(matches!(result, Err(LoadError::Pattern { .. })));
    }

    #[test]
    fn rejects_unknown_relation() {
        let result = load_catalogue_from_str(
            r#"
[[rules]]
id = "bad"
type = "ratio-or-ordering"
key-a = "a"
key-b = "b"
relation = "roughly-equal"
"#,
        );
        assert!(matches!(result, Err(LoadError::UnknownRelation { .. })));
    }

    #[test]
    fn rejects_conflicting_scope() {
        let result = load_catalogue_from_str(
            r#"
[[rules]]
id = "bad"
type = "exact-value"
key = "k"
expected = "v"
skip-profiles = ["dev"]
only-profiles = ["prod"]
"#,
        );
        assert!(matches!(result, Err(LoadError::ConflictingScope { .. })));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let result = load_catalogue_from_str(
            r#"
[[rules]]
id = "same"
type = "exact-value"
key = "k"
expected = "v"

[[rules]]
id = "same"
type = "exact-value"
key = "k2"
expected = "v2"
"#,
        );
        assert!(matches!(
            result,
            Err(LoadError::Catalogue(CatalogueError::DuplicateRuleId { .. }))
        ));
    }

    #[test]
    fn rejects_invalid_toml() {
        let result = load_catalogue_from_str("[[rules]\nid=");
        assert!(matches!(result, Err(LoadError::Parse { .. })));
    }

    #[test]
    fn multiple_between_requires_bounds() {
        let result = load_catalogue_from_str(
            r#"
[[rules]]
id = "bad"
type = "ratio-or-ordering"
key-a = "a"
key-b = "b"
relation = "multiple-between"
min-multiple = 3.0
"#,
        );
        assert!(matches!(
            result,
            Err(LoadError::MissingField { ref field, .. }) if field == "max-multiple"
        ));
    }
}
