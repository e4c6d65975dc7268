//! Core types for rule violations and validation reports.

use serde::{Deserialize, Serialize};

/// The value rendered for a key that resolved to nothing.
pub const ABSENT: &str = "absent";

/// Classification of a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViolationKind {
    /// The resolved value failed the rule's semantic constraint.
    ConstraintFailed,
    /// A numeric rule received a value that is not a valid integer.
    MalformedValue,
    /// A rule panicked during evaluation; the run still completed.
    EvaluationError,
}

impl std::fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConstraintFailed => write!(f, "constraint-failed"),
            Self::MalformedValue => write!(f, "malformed-value"),
            Self::EvaluationError => write!(f, "evaluation-error"),
        }
    }
}

/// A single rule-check failure.
///
/// Violations are value objects: they carry enough detail to be
/// independently actionable and are collected in rule registration order
/// for deterministic reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Identifier of the rule that failed (e.g., "producer-acks").
    pub rule_id: String,
    /// The key, or keys for multi-key rules, the rule examined.
    pub keys: Vec<String>,
    /// Human-readable description of the expected constraint.
    pub expected: String,
    /// The value observed, or [`ABSENT`].
    pub actual: String,
    /// The profile the rule was evaluated under.
    pub profile: String,
    /// Classification of the failure.
    pub kind: ViolationKind,
}

impl Violation {
    /// Creates a new constraint violation.
    #[must_use]
    pub fn new(
        rule_id: impl Into<String>,
        keys: Vec<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
        profile: impl Into<String>,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            keys,
            expected: expected.into(),
            actual: actual.into(),
            profile: profile.into(),
            kind: ViolationKind::ConstraintFailed,
        }
    }

    /// Sets the violation kind.
    #[must_use]
    pub fn with_kind(mut self, kind: ViolationKind) -> Self {
        self.kind = kind;
        self
    }

    /// Formats the violation for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        use std::fmt::Write;
        let mut output = format!("{} [{}]\n", self.rule_id, self.kind);
        let _ = writeln!(output, "  key: {}", self.keys.join(", "));
        let _ = writeln!(output, "  expected: {}", self.expected);
        let _ = writeln!(output, "  actual: {}", self.actual);
        let _ = writeln!(output, "  profile: {}", self.profile);
        output
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}: expected {}, got {} (profile {})",
            self.rule_id,
            self.keys.join(", "),
            self.expected,
            self.actual,
            self.profile
        )
    }
}

/// The aggregate result of one validation run.
///
/// Created fresh per run and discarded after rendering. The `passed`
/// verdict is derived solely from the violation list; structural parse
/// errors are surfaced separately by the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Report {
    /// All violations, in rule registration order.
    pub violations: Vec<Violation>,
    /// Number of rules evaluated under the active profile.
    pub rules_evaluated: usize,
    /// Number of rules skipped because their scope excluded the profile.
    pub rules_skipped: usize,
}

impl Report {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no rule produced a violation.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns violations of a given kind.
    #[must_use]
    pub fn by_kind(&self, kind: ViolationKind) -> Vec<&Violation> {
        self.violations.iter().filter(|v| v.kind == kind).collect()
    }

    /// Formats the summary line for terminal output.
    #[must_use]
    pub fn format_summary(&self) -> String {
        if self.passed() {
            format!(
                "Validation successful: {} rule(s) evaluated, {} skipped, no violations",
                self.rules_evaluated, self.rules_skipped
            )
        } else {
            format!(
                "Found {} violation(s) in {} rule(s) evaluated ({} skipped)",
                self.violations.len(),
                self.rules_evaluated,
                self.rules_skipped
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_violation(kind: ViolationKind) -> Violation {
        Violation::new(
            "producer-acks",
            vec!["kafka-streams.producer.acks".to_string()],
            "`all`",
            "1",
            "prod",
        )
        .with_kind(kind)
    }

    // -- Violation --

    #[test]
    fn violation_defaults_to_constraint_failed() {
        let v = Violation::new("r", vec!["k".to_string()], "e", "a", "base");
        assert_eq!(v.kind, ViolationKind::ConstraintFailed);
    }

    #[test]
    fn violation_format_has_all_four_fields() {
        let v = make_violation(ViolationKind::ConstraintFailed);
        let text = v.format();
        assert!(text.contains("producer-acks"));
        assert!(text.contains("kafka-streams.producer.acks"));
        assert!(text.contains("expected: `all`"));
        assert!(text.contains("actual: 1"));
    }

    #[test]
    fn violation_display_is_single_line() {
        let v = make_violation(ViolationKind::MalformedValue);
        assert!(!format!("{v}").contains('\n'));
    }

    // -- Report --

    #[test]
    fn empty_report_passes() {
        let report = Report::new();
        assert!(report.passed());
        assert!(report.format_summary().contains("Validation successful"));
    }

    #[test]
    fn report_with_violation_fails() {
        let mut report = Report::new();
        report.rules_evaluated = 3;
        report
            .violations
            .push(make_violation(ViolationKind::ConstraintFailed));
        assert!(!report.passed());
        assert!(report.format_summary().contains("1 violation(s)"));
    }

    #[test]
    fn by_kind_filters() {
        let mut report = Report::new();
        report
            .violations
            .push(make_violation(ViolationKind::ConstraintFailed));
        report
            .violations
            .push(make_violation(ViolationKind::MalformedValue));
        assert_eq!(report.by_kind(ViolationKind::MalformedValue).len(), 1);
    }
}
