//! Rule variants and their evaluation semantics.
//!
//! Rules form a closed sum type rather than an open trait hierarchy:
//! evaluation stays exhaustive-checkable, and adding a variant is a
//! compile error everywhere it matters instead of a silent fallthrough.

use crate::profile::{Profile, ProfileScope};
use crate::store::PropertyStore;
use crate::types::{Violation, ViolationKind, ABSENT};

use regex::Regex;
use std::fmt;

/// A validated, pre-compiled regular expression for value shape checks.
///
/// The pattern is compiled once at rule construction and anchored to the
/// full value, so a bad pattern is a catalogue-definition error and never
/// an evaluation-time one.
#[derive(Debug, Clone)]
pub struct ValuePattern {
    raw: String,
    compiled: Regex,
}

impl ValuePattern {
    /// Compiles a full-value pattern.
    ///
    /// # Errors
    ///
    /// Returns error if the pattern is empty or has invalid regex syntax.
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        if pattern.is_empty() {
            return Err(PatternError::Empty);
        }
        let compiled =
            Regex::new(&format!("^(?:{pattern})$")).map_err(|e| PatternError::Invalid {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            raw: pattern.to_string(),
            compiled,
        })
    }

    /// Tests whether the full value matches this pattern.
    #[must_use]
    pub fn matches(&self, value: &str) -> bool {
        self.compiled.is_match(value)
    }

    /// Returns the pattern as written, without the anchoring.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl PartialEq for ValuePattern {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for ValuePattern {}

/// Errors in value pattern construction.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PatternError {
    /// Pattern is empty.
    #[error("value pattern must not be empty")]
    Empty,

    /// Pattern has invalid regex syntax.
    #[error("invalid value pattern `{pattern}`: {reason}")]
    Invalid {
        /// The invalid pattern.
        pattern: String,
        /// Why it's invalid.
        reason: String,
    },
}

/// Comparison between two keys' numeric values.
#[derive(Debug, Clone, PartialEq)]
pub enum Relation {
    /// First value strictly greater than the second.
    GreaterThan,
    /// First value greater than or equal to the second.
    GreaterOrEqual,
    /// First value strictly less than the second.
    LessThan,
    /// First value less than or equal to the second.
    LessOrEqual,
    /// First value within `[second * min, second * max]`.
    MultipleBetween {
        /// Lower multiple bound.
        min: f64,
        /// Upper multiple bound.
        max: f64,
    },
}

impl Relation {
    /// Tests whether the relation holds for `(a, b)`.
    #[must_use]
    pub fn holds(&self, a: i64, b: i64) -> bool {
        match self {
            Self::GreaterThan => a > b,
            Self::GreaterOrEqual => a >= b,
            Self::LessThan => a < b,
            Self::LessOrEqual => a <= b,
            #[allow(clippy::cast_precision_loss)]
            Self::MultipleBetween { min, max } => {
                let (a, b) = (a as f64, b as f64);
                a >= b * min && a <= b * max
            }
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GreaterThan => write!(f, "strictly greater than"),
            Self::GreaterOrEqual => write!(f, "greater than or equal to"),
            Self::LessThan => write!(f, "strictly less than"),
            Self::LessOrEqual => write!(f, "less than or equal to"),
            Self::MultipleBetween { min, max } => {
                write!(f, "within [{min}x, {max}x] of")
            }
        }
    }
}

/// The constraint a rule checks, one variant per rule taxonomy entry.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleKind {
    /// Resolved value must equal `expected` exactly; absent is a failure.
    ExactValue {
        /// Target key.
        key: String,
        /// Required value, compared case-sensitively.
        expected: String,
    },

    /// Like [`RuleKind::ExactValue`], but an absent key is acceptable.
    OptionalExactValue {
        /// Target key.
        key: String,
        /// Required value when the key is present.
        expected: String,
    },

    /// Resolved value must be a member of `allowed`.
    OneOf {
        /// Target key.
        key: String,
        /// Acceptable values.
        allowed: Vec<String>,
        /// Whether absence is itself a failure.
        required: bool,
    },

    /// Resolved value must be an integer within the given bounds.
    NumericRange {
        /// Target key.
        key: String,
        /// Lower bound.
        min: i64,
        /// Upper bound; `None` means unbounded above.
        max: Option<i64>,
        /// Whether the bounds are inclusive.
        inclusive: bool,
        /// Whether absence is itself a failure.
        required: bool,
    },

    /// Resolved value must fully match a pre-compiled pattern.
    RegexMatch {
        /// Target key.
        key: String,
        /// Compiled full-value pattern.
        pattern: ValuePattern,
        /// Whether absence is itself a failure.
        required: bool,
    },

    /// Two keys' numeric values must satisfy a relation.
    ///
    /// Documented defaults stand in for absent keys; they are explicit
    /// rule parameters, never hard-coded in the evaluator. A key that is
    /// absent with no documented default makes the rule pass trivially.
    RatioOrOrdering {
        /// First key of the comparison.
        key_a: String,
        /// Second key of the comparison.
        key_b: String,
        /// Relation required between the two resolved values.
        relation: Relation,
        /// Documented default for `key_a` when absent.
        default_a: Option<i64>,
        /// Documented default for `key_b` when absent.
        default_b: Option<i64>,
    },

    /// At most one of the keys may be set.
    MutualExclusivity {
        /// The key set.
        keys: Vec<String>,
        /// Whether zero keys set is also a failure.
        require_exactly_one: bool,
    },

    /// A numeric range on `target_key` that applies only while
    /// `guard_key` resolves to `guard_value`.
    ConditionalRange {
        /// Key whose value activates the constraint.
        guard_key: String,
        /// Guard value that activates the constraint.
        guard_value: String,
        /// Key the range applies to.
        target_key: String,
        /// Lower bound, inclusive.
        min: i64,
        /// Upper bound, inclusive; `None` means unbounded above.
        max: Option<i64>,
        /// Whether the target must be set while the guard matches.
        required: bool,
    },

    /// The key must be absent, or hold one of the sanctioned overrides.
    MustBeAbsent {
        /// Target key.
        key: String,
        /// Values that justify overriding the default; empty means the
        /// key must be wholly absent.
        allowed_overrides: Vec<String>,
    },
}

/// A single, immutable validation rule.
///
/// Defined once at catalogue construction and never mutated during
/// evaluation. Rules only read the store; they cannot see each other's
/// results.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    id: String,
    description: String,
    scope: ProfileScope,
    kind: RuleKind,
}

impl Rule {
    /// Creates a rule with the default profile scope (all except
    /// `dev` and `test`).
    #[must_use]
    pub fn new(id: impl Into<String>, description: impl Into<String>, kind: RuleKind) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            scope: ProfileScope::default(),
            kind,
        }
    }

    /// Overrides the profile scope.
    #[must_use]
    pub fn with_scope(mut self, scope: ProfileScope) -> Self {
        self.scope = scope;
        self
    }

    /// Returns the rule identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the human-readable explanation.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the profile scope.
    #[must_use]
    pub fn scope(&self) -> &ProfileScope {
        &self.scope
    }

    /// Returns the constraint variant.
    #[must_use]
    pub fn kind(&self) -> &RuleKind {
        &self.kind
    }

    /// Tests whether this rule applies under `profile`.
    #[must_use]
    pub fn applies_to(&self, profile: &Profile) -> bool {
        self.scope.applies_to(profile)
    }

    /// Returns the keys this rule examines.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        match &self.kind {
            RuleKind::ExactValue { key, .. }
            | RuleKind::OptionalExactValue { key, .. }
            | RuleKind::OneOf { key, .. }
            | RuleKind::NumericRange { key, .. }
            | RuleKind::RegexMatch { key, .. }
            | RuleKind::MustBeAbsent { key, .. } => vec![key],
            RuleKind::RatioOrOrdering { key_a, key_b, .. } => vec![key_a, key_b],
            RuleKind::MutualExclusivity { keys, .. } => keys.iter().map(String::as_str).collect(),
            RuleKind::ConditionalRange { target_key, .. } => vec![target_key],
        }
    }

    /// Evaluates this rule against the store under the active profile.
    ///
    /// Assumes the caller has already checked [`applies_to`](Self::applies_to);
    /// profile scoping is the validator's concern.
    #[must_use]
    pub fn evaluate(&self, store: &PropertyStore, profile: &Profile) -> Option<Violation> {
        match &self.kind {
            RuleKind::ExactValue { key, expected } => {
                match store.resolve(profile, key) {
                    Some(v) if v == expected => None,
                    Some(v) => Some(self.fail(vec![key], format!("`{expected}`"), v, profile)),
                    None => Some(self.fail(vec![key], format!("`{expected}`"), ABSENT, profile)),
                }
            }

            RuleKind::OptionalExactValue { key, expected } => {
                match store.resolve(profile, key) {
                    Some(v) if v != expected => {
                        Some(self.fail(vec![key], format!("`{expected}`"), v, profile))
                    }
                    _ => None,
                }
            }

            RuleKind::OneOf {
                key,
                allowed,
                required,
            } => {
                let expected = format!("one of [{}]", allowed.join(", "));
                match store.resolve(profile, key) {
                    Some(v) if allowed.iter().any(|a| a == v) => None,
                    Some(v) => Some(self.fail(vec![key], expected, v, profile)),
                    None if *required => Some(self.fail(vec![key], expected, ABSENT, profile)),
                    None => None,
                }
            }

            RuleKind::NumericRange {
                key,
                min,
                max,
                inclusive,
                required,
            } => {
                let expected = range_expected(*min, *max, *inclusive);
                let raw = match store.resolve(profile, key) {
                    Some(v) => v,
                    None if *required => {
                        return Some(self.fail(vec![key], expected, ABSENT, profile))
                    }
                    None => return None,
                };
                let value = match self.parse_int(key, raw, profile) {
                    Ok(n) => n,
                    Err(violation) => return Some(violation),
                };
                let in_range = if *inclusive {
                    value >= *min && max.map_or(true, |m| value <= m)
                } else {
                    value > *min && max.map_or(true, |m| value < m)
                };
                if in_range {
                    None
                } else {
                    Some(self.fail(vec![key], expected, raw, profile))
                }
            }

            RuleKind::RegexMatch {
                key,
                pattern,
                required,
            } => {
                let expected = format!("value matching `{}`", pattern.as_str());
                match store.resolve(profile, key) {
                    Some(v) if pattern.matches(v) => None,
                    Some(v) => Some(self.fail(vec![key], expected, v, profile)),
                    None if *required => Some(self.fail(vec![key], expected, ABSENT, profile)),
                    None => None,
                }
            }

            RuleKind::RatioOrOrdering {
                key_a,
                key_b,
                relation,
                default_a,
                default_b,
            } => {
                let (a, a_defaulted) = match self.resolve_with_default(
                    store, profile, key_a, *default_a,
                ) {
                    Ok(Some(pair)) => pair,
                    Ok(None) => return None,
                    Err(violation) => return Some(violation),
                };
                let (b, b_defaulted) = match self.resolve_with_default(
                    store, profile, key_b, *default_b,
                ) {
                    Ok(Some(pair)) => pair,
                    Ok(None) => return None,
                    Err(violation) => return Some(violation),
                };
                if relation.holds(a, b) {
                    return None;
                }
                let mark = |defaulted: bool| if defaulted { " (default)" } else { "" };
                Some(self.fail(
                    vec![key_a, key_b],
                    format!("`{key_a}` {relation} `{key_b}`"),
                    format!(
                        "{key_a}={a}{}, {key_b}={b}{}",
                        mark(a_defaulted),
                        mark(b_defaulted)
                    ),
                    profile,
                ))
            }

            RuleKind::MutualExclusivity {
                keys,
                require_exactly_one,
            } => {
                let present: Vec<&str> = keys
                    .iter()
                    .filter(|k| store.resolve(profile, k).is_some())
                    .map(String::as_str)
                    .collect();
                let all: Vec<&str> = keys.iter().map(String::as_str).collect();
                if present.len() > 1 {
                    return Some(self.fail(
                        all,
                        "at most one of the keys set",
                        format!("{} set: {}", present.len(), present.join(", ")),
                        profile,
                    ));
                }
                if present.is_empty() && *require_exactly_one {
                    return Some(self.fail(
                        all,
                        "exactly one of the keys set",
                        "none set",
                        profile,
                    ));
                }
                None
            }

            RuleKind::ConditionalRange {
                guard_key,
                guard_value,
                target_key,
                min,
                max,
                required,
            } => {
                if store.resolve(profile, guard_key) != Some(guard_value.as_str()) {
                    return None;
                }
                let expected = format!(
                    "{} when `{guard_key}` is `{guard_value}`",
                    range_expected(*min, *max, true)
                );
                let raw = match store.resolve(profile, target_key) {
                    Some(v) => v,
                    None if *required => {
                        return Some(self.fail(vec![target_key], expected, ABSENT, profile))
                    }
                    None => return None,
                };
                let value = match self.parse_int(target_key, raw, profile) {
                    Ok(n) => n,
                    Err(violation) => return Some(violation),
                };
                if value >= *min && max.map_or(true, |m| value <= m) {
                    None
                } else {
                    Some(self.fail(vec![target_key], expected, raw, profile))
                }
            }

            RuleKind::MustBeAbsent {
                key,
                allowed_overrides,
            } => {
                let expected = if allowed_overrides.is_empty() {
                    ABSENT.to_string()
                } else {
                    format!("{ABSENT} or one of [{}]", allowed_overrides.join(", "))
                };
                match store.resolve(profile, key) {
                    Some(v) if !allowed_overrides.iter().any(|a| a == v) => {
                        Some(self.fail(vec![key], expected, v, profile))
                    }
                    _ => None,
                }
            }
        }
    }

    /// Builds a constraint violation for this rule.
    fn fail(
        &self,
        keys: Vec<&str>,
        expected: impl Into<String>,
        actual: impl Into<String>,
        profile: &Profile,
    ) -> Violation {
        Violation::new(
            &self.id,
            keys.into_iter().map(String::from).collect(),
            expected,
            actual,
            profile.to_string(),
        )
    }

    /// Parses an integer value, converting failure to a
    /// [`ViolationKind::MalformedValue`] violation.
    fn parse_int(&self, key: &str, raw: &str, profile: &Profile) -> Result<i64, Violation> {
        raw.parse::<i64>().map_err(|_| {
            self.fail(vec![key], "a syntactically valid integer", raw, profile)
                .with_kind(ViolationKind::MalformedValue)
        })
    }

    /// Resolves a key to an integer, falling back to a documented default.
    ///
    /// `Ok(None)` means the key is absent and no default is documented:
    /// the rule passes trivially.
    fn resolve_with_default(
        &self,
        store: &PropertyStore,
        profile: &Profile,
        key: &str,
        default: Option<i64>,
    ) -> Result<Option<(i64, bool)>, Violation> {
        match store.resolve(profile, key) {
            Some(raw) => self.parse_int(key, raw, profile).map(|n| Some((n, false))),
            None => Ok(default.map(|n| (n, true))),
        }
    }
}

/// Renders the expected-range description for numeric rules.
fn range_expected(min: i64, max: Option<i64>, inclusive: bool) -> String {
    match (max, inclusive) {
        (Some(max), true) => format!("integer in [{min}, {max}]"),
        (Some(max), false) => format!("integer in ({min}, {max})"),
        (None, true) => format!("integer >= {min}"),
        (None, false) => format!("integer > {min}"),
    }
}
