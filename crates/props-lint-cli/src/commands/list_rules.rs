//! List rules command implementation.

use anyhow::{Context, Result};
use props_lint_rules::all_rules;

/// Runs the list-rules command.
pub fn run() -> Result<()> {
    let rules = all_rules().context("failed to build built-in rules")?;

    println!("Built-in rules:\n");
    println!("{:<30} Description", "Id");
    println!("{}", "-".repeat(80));

    for rule in &rules {
        println!("{:<30} {}", rule.id(), rule.description());
    }

    println!("\nPresets:");
    println!("  recommended  - every rule, dev/test profiles exempt (default)");
    println!("  strict       - every rule in every profile");
    println!("  minimal      - security-protocol and producer-acks only");

    println!("\nUse --rules to load a declarative catalogue instead, e.g.:");
    println!("  props-lint check --rules props-lint.toml");

    Ok(())
}
