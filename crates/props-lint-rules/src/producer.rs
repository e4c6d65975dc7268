//! Producer durability and throughput rules.

use props_lint_core::{CatalogueError, Rule, RuleKind};

/// Returns the producer rules.
///
/// # Errors
///
/// Returns an error if a rule definition is invalid.
pub fn rules() -> Result<Vec<Rule>, CatalogueError> {
    Ok(vec![
        Rule::new(
            "producer-acks",
            "Producer must wait for all in-sync replicas before acknowledging.",
            RuleKind::ExactValue {
                key: "kafka-streams.producer.acks".to_string(),
                expected: "all".to_string(),
            },
        ),
        Rule::new(
            "producer-compression",
            "Producer compression must be an approved codec.",
            RuleKind::OneOf {
                key: "kafka-streams.producer.compression.type".to_string(),
                allowed: vec![
                    "snappy".to_string(),
                    "lz4".to_string(),
                    "zstd".to_string(),
                ],
                required: true,
            },
        ),
        Rule::new(
            "producer-idempotence",
            "Idempotence, when configured explicitly, must not be turned off.",
            RuleKind::OptionalExactValue {
                key: "kafka-streams.producer.enable.idempotence".to_string(),
                expected: "true".to_string(),
            },
        ),
        Rule::new(
            "producer-retries",
            "Retries, when configured, must be a non-negative integer.",
            RuleKind::NumericRange {
                key: "kafka-streams.producer.retries".to_string(),
                min: 0,
                max: None,
                inclusive: true,
                required: false,
            },
        ),
        Rule::new(
            "producer-batch-size-default",
            "Batch size overrides need deliberate justification; the broker default is fine.",
            RuleKind::MustBeAbsent {
                key: "kafka-streams.producer.batch.size".to_string(),
                allowed_overrides: vec!["16384".to_string()],
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
            .rules(rules().expect("producer rules are well-formed"))
            .build()
            .expect("catalogue builds");
        Validator::new(catalogue).validate(
            &PropertyStore::parse(text),
            &Profile::named("prod").expect("valid"),
        )
    }

    #[test]
    fn durable_producer_config_passes() {
        let report = validate(
            "kafka-streams.producer.acks=all\n\
             kafka-streams.producer.compression.type=zstd\n\
             kafka-streams.producer.retries=10\n",
        );
        assert!(report.passed(), "{:#?}", report.violations);
    }

    #[test]
    fn weak_acks_and_gzip_both_reported() {
        let report = validate(
            "kafka-streams.producer.acks=1\n\
             kafka-streams.producer.compression.type=gzip\n",
        );
        let ids: Vec<&str> = report.violations.iter().map(|v| v.rule_id.as_str()).collect();
        assert_eq!(ids, ["producer-acks", "producer-compression"]);
    }

    #[test]
    fn batch_size_override_is_flagged() {
        let report = validate(
            "kafka-streams.producer.acks=all\n\
             kafka-streams.producer.compression.type=lz4\n\
             kafka-streams.producer.batch.size=1048576\n",
        );
        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.violations[0].rule_id, "producer-batch-size-default");
    }
}
