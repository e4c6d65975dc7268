//! Broker security rules.

use props_lint_core::{CatalogueError, Rule, RuleKind, ValuePattern};

/// Returns the security rules.
///
/// # Errors
///
/// Returns an error if a value pattern fails to compile.
pub fn rules() -> Result<Vec<Rule>, CatalogueError> {
    Ok(vec![
        Rule::new(
            "security-protocol",
            "Brokers must be reached over SASL_SSL outside dev/test.",
            RuleKind::ExactValue {
                key: "kafka-streams.security.protocol".to_string(),
                expected: "SASL_SSL".to_string(),
            },
        ),
        Rule::new(
            "sasl-mechanism",
            "If a SASL mechanism is configured it must be an approved one.",
            RuleKind::OneOf {
                key: "kafka-streams.sasl.mechanism".to_string(),
                allowed: vec![
                    "PLAIN".to_string(),
                    "SCRAM-SHA-256".to_string(),
                    "SCRAM-SHA-512".to_string(),
                    "AWS_MSK_IAM".to_string(),
                ],
                required: false,
            },
        ),
        Rule::new(
            "bootstrap-servers-shape",
            "Bootstrap servers must be a host:port list or a deploy-time placeholder.",
            RuleKind::RegexMatch {
                key: "kafka.bootstrap.servers".to_string(),
                pattern: ValuePattern::new(
                    r"\$\{[^}]+\}|[A-Za-z0-9.\-]+:\d{1,5}(,[A-Za-z0-9.\-]+:\d{1,5})*",
                )?,
                required: true,
            },
        ),
        Rule::new(
            "ssl-endpoint-identification",
            "Endpoint identification, when set, must stay on https.",
            RuleKind::OptionalExactValue {
                key: "kafka-streams.ssl.endpoint.identification.algorithm".to_string(),
                expected: "https".to_string(),
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
            .rules(rules().expect("security rules are well-formed"))
            .build()
            .expect("catalogue builds");
        Validator::new(catalogue).validate(
            &PropertyStore::parse(text),
            &Profile::named("prod").expect("valid"),
        )
    }

    #[test]
    fn placeholder_bootstrap_value_is_accepted() {
        let report = validate(
            "kafka-streams.security.protocol=SASL_SSL\n\
             kafka.bootstrap.servers=${KAFKA_BOOTSTRAP_SERVERS:localhost:9092}\n",
        );
        assert!(report.passed(), "{:#?}", report.violations);
    }

    #[test]
    fn plaintext_protocol_is_rejected() {
        let report = validate(
            "kafka-streams.security.protocol=PLAINTEXT\n\
             kafka.bootstrap.servers=broker-1:9092,broker-2:9092\n",
        );
        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.violations[0].rule_id, "security-protocol");
    }

    #[test]
    fn missing_bootstrap_servers_is_rejected() {
        let report = validate("kafka-streams.security.protocol=SASL_SSL\n");
        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.violations[0].rule_id, "bootstrap-servers-shape");
    }
}
