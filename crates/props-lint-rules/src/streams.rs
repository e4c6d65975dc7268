//! Streams topology and processing-guarantee rules.

use props_lint_core::{CatalogueError, Rule, RuleKind, ValuePattern};

/// Returns the streams rules.
///
/// # Errors
///
/// Returns an error if a value pattern fails to compile.
pub fn rules() -> Result<Vec<Rule>, CatalogueError> {
    Ok(vec![
        Rule::new(
            "standby-replicas",
            "Standby replicas beyond 2 multiply state-store disk usage.",
            RuleKind::NumericRange {
                key: "kafka-streams.num.standby.replicas".to_string(),
                min: 0,
                max: Some(2),
                inclusive: true,
                required: false,
            },
        ),
        Rule::new(
            "application-id",
            "Exactly one application id spelling must be present.",
            RuleKind::MutualExclusivity {
                keys: vec![
                    "kafka-streams.application-id".to_string(),
                    "kafka-streams.application.id".to_string(),
                ],
                require_exactly_one: true,
            },
        ),
        Rule::new(
            "processing-guarantee",
            "Processing guarantee must be a supported mode.",
            RuleKind::OneOf {
                key: "kafka-streams.processing.guarantee".to_string(),
                allowed: vec![
                    "at_least_once".to_string(),
                    "exactly_once_v2".to_string(),
                ],
                required: false,
            },
        ),
        Rule::new(
            "eos-commit-interval",
            "Exactly-once processing needs a short, explicit commit interval.",
            RuleKind::ConditionalRange {
                guard_key: "kafka-streams.processing.guarantee".to_string(),
                guard_value: "exactly_once_v2".to_string(),
                target_key: "kafka-streams.commit.interval.ms".to_string(),
                min: 1,
                max: Some(1_000),
                required: true,
            },
        ),
        Rule::new(
            "state-dir-shape",
            "The state directory must be an absolute path.",
            RuleKind::RegexMatch {
                key: "kafka-streams.state.dir".to_string(),
                pattern: ValuePattern::new(r"(/[A-Za-z0-9._-]+)+")?,
                required: false,
            },
        ),
        Rule::new(
            "topology-optimization",
            "Topology optimization, when set, must enable every optimization.",
            RuleKind::OptionalExactValue {
                key: "kafka-streams.topology.optimization".to_string(),
                expected: "all".to_string(),
            },
        ),
        Rule::new(
            "no-auto-create-topics",
            "Topic auto-creation hides missing-topology mistakes until production.",
            RuleKind::MustBeAbsent {
                key: "kafka-streams.auto.create.topics.enable".to_string(),
                allowed_overrides: vec!["false".to_string()],
            },
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use props_lint_core::{Catalogue, Profile, PropertyStore, Validator};

    fn validate(text: &str) -> props_lint_core::Report {
        let catalogue = Catalogue::builder()
            .rules(rules().expect("streams rules are well-formed"))
            .build()
            .expect("catalogue builds");
        Validator::new(catalogue).validate(
            &PropertyStore::parse(text),
            &Profile::named("prod").expect("valid"),
        )
    }

    #[test]
    fn typical_streams_config_passes() {
        let report = validate(
            "kafka-streams.application-id=orders-enricher\n\
             kafka-streams.num.standby.replicas=1\n\
             kafka-streams.state.dir=/var/lib/kafka-streams\n",
        );
        assert!(report.passed(), "{:#?}", report.violations);
    }

    #[test]
    fn both_application_id_spellings_are_rejected() {
        let report = validate(
            "kafka-streams.application-id=orders-enricher\n\
             kafka-streams.application.id=orders-enricher\n",
        );
        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.violations[0].rule_id, "application-id");
        assert_eq!(report.violations[0].keys.len(), 2);
    }

    #[test]
    fn eos_without_commit_interval_is_rejected() {
        let report = validate(
            "kafka-streams.application-id=orders-enricher\n\
             kafka-streams.processing.guarantee=exactly_once_v2\n",
        );
        let ids: Vec<&str> = report.violations.iter().map(|v| v.rule_id.as_str()).collect();
        assert_eq!(ids, ["eos-commit-interval"]);
    }

    #[test]
    fn eos_with_short_commit_interval_passes() {
        let report = validate(
            "kafka-streams.application-id=orders-enricher\n\
             kafka-streams.processing.guarantee=exactly_once_v2\n\
             kafka-streams.commit.interval.ms=100\n",
        );
        assert!(report.passed(), "{:#?}", report.violations);
    }

    #[test]
    fn relative_state_dir_is_rejected() {
        let report = validate(
            "kafka-streams.application-id=orders-enricher\n\
             kafka-streams.state.dir=tmp/state\n",
        );
        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.violations[0].rule_id, "state-dir-shape");
    }
}
