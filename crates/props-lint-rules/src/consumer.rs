//! Consumer throughput and timeout rules.

use props_lint_core::{CatalogueError, Relation, Rule, RuleKind};

/// Returns the consumer rules.
///
/// # Errors
///
/// Returns an error if a rule definition is invalid.
pub fn rules() -> Result<Vec<Rule>, CatalogueError> {
    Ok(vec![
        Rule::new(
            "max-poll-records",
            "Poll batches above 10000 records risk rebalance storms.",
            RuleKind::NumericRange {
                key: "kafka-streams.consumer.max.poll.records".to_string(),
                min: 1,
                max: Some(10_000),
                inclusive: true,
                required: false,
            },
        ),
        Rule::new(
            "offset-reset",
            "Offset reset must be an explicit, known policy.",
            RuleKind::OneOf {
                key: "kafka-streams.consumer.auto.offset.reset".to_string(),
                allowed: vec!["earliest".to_string(), "latest".to_string()],
                required: false,
            },
        ),
        Rule::new(
            "isolation-level",
            "Isolation level, when set, must be read_committed.",
            RuleKind::OptionalExactValue {
                key: "kafka-streams.consumer.isolation.level".to_string(),
                expected: "read_committed".to_string(),
            },
        ),
        Rule::new(
            "api-timeout-ordering",
            "The API timeout must exceed the request timeout or calls can expire early.",
            RuleKind::RatioOrOrdering {
                key_a: "kafka-streams.consumer.default.api.timeout.ms".to_string(),
                key_b: "kafka-streams.consumer.request.timeout.ms".to_string(),
                relation: Relation::GreaterThan,
                default_a: Some(60_000),
                default_b: Some(30_000),
            },
        ),
        Rule::new(
            "session-heartbeat-ratio",
            "Session timeout should sit between 3x and 100x the heartbeat interval.",
            RuleKind::RatioOrOrdering {
                key_a: "kafka-streams.consumer.session.timeout.ms".to_string(),
                key_b: "kafka-streams.consumer.heartbeat.interval.ms".to_string(),
                relation: Relation::MultipleBetween {
                    min: 3.0,
                    max: 100.0,
                },
                default_a: Some(45_000),
                default_b: Some(3_000),
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
            .rules(rules().expect("consumer rules are well-formed"))
            .build()
            .expect("catalogue builds");
        Validator::new(catalogue).validate(
            &PropertyStore::parse(text),
            &Profile::named("prod").expect("valid"),
        )
    }

    #[test]
    fn broker_defaults_pass_without_any_keys() {
        // Every consumer rule is either optional or has defaults.
        let report = validate("");
        assert!(report.passed(), "{:#?}", report.violations);
    }

    #[test]
    fn oversized_poll_batch_is_flagged() {
        let report = validate("kafka-streams.consumer.max.poll.records=20000\n");
        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.violations[0].rule_id, "max-poll-records");
    }

    #[test]
    fn request_timeout_above_default_api_timeout_is_flagged() {
        let report = validate("kafka-streams.consumer.request.timeout.ms=90000\n");
        let ids: Vec<&str> = report.violations.iter().map(|v| v.rule_id.as_str()).collect();
        assert_eq!(ids, ["api-timeout-ordering"]);
    }

    #[test]
    fn heartbeat_too_close_to_session_timeout_is_flagged() {
        let report = validate(
            "kafka-streams.consumer.session.timeout.ms=10000\n\
             kafka-streams.consumer.heartbeat.interval.ms=9000\n",
        );
        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.violations[0].rule_id, "session-heartbeat-ratio");
    }
}
