//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_RULES: &str = r#"# props-lint rule catalogue
# Each [[rules]] entry is one constraint on the properties file.
# Rules skip the dev and test profiles unless scoped otherwise.

[[rules]]
id = "security-protocol"
type = "exact-value"
key = "kafka-streams.security.protocol"
expected = "SASL_SSL"
description = "Brokers must be reached over SASL_SSL."

[[rules]]
id = "producer-acks"
type = "exact-value"
key = "kafka-streams.producer.acks"
expected = "all"

[[rules]]
id = "producer-compression"
type = "one-of"
key = "kafka-streams.producer.compression.type"
allowed = ["snappy", "lz4", "zstd"]
required = true

[[rules]]
id = "max-poll-records"
type = "numeric-range"
key = "kafka-streams.consumer.max.poll.records"
min = 1
max = 10000

# [[rules]]
# id = "api-timeout-ordering"
# type = "ratio-or-ordering"
# key-a = "kafka-streams.consumer.default.api.timeout.ms"
# key-b = "kafka-streams.consumer.request.timeout.ms"
# relation = "greater-than"
# default-a = 60000
# default-b = 30000
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let rules_path = Path::new("props-lint.toml");

    if rules_path.exists() && !force {
        bail!(
            "Rules file already exists at {}. Use --force to overwrite.",
            rules_path.display()
        );
    }

    std::fs::write(rules_path, DEFAULT_RULES)?;

    println!("Created props-lint.toml");
    println!("\nNext steps:");
    println!("  1. Edit props-lint.toml to fit your application");
    println!("  2. Run: props-lint check --rules props-lint.toml");

    Ok(())
}

#[cfg(test)]
mod tests {
    use props_lint_core::declarative::load_catalogue_from_str;

    #[test]
    fn starter_rules_file_is_loadable() {
        let catalogue = load_catalogue_from_str(super::DEFAULT_RULES).unwrap();
        assert_eq!(catalogue.len(), 4);
    }
}
