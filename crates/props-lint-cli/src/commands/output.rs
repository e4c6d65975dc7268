//! Shared output formatting for validation reports.

use anyhow::Result;
use props_lint_core::{ParseError, Report, ViolationKind};
use serde::Serialize;

use crate::OutputFormat;

/// Print a validation report in the specified format.
pub fn print(report: &Report, parse_errors: &[ParseError], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(report, parse_errors),
        OutputFormat::Json => return print_json(report, parse_errors),
        OutputFormat::Compact => print_compact(report, parse_errors),
    }
    Ok(())
}

fn print_text(report: &Report, parse_errors: &[ParseError]) {
    for error in parse_errors {
        println!("\x1b[31mparse error\x1b[0m {error}");
        println!("  | {}", error.text);
        println!();
    }

    for violation in &report.violations {
        let indicator = match violation.kind {
            ViolationKind::ConstraintFailed => "\x1b[31mviolation\x1b[0m",
            ViolationKind::MalformedValue => "\x1b[33mmalformed\x1b[0m",
            ViolationKind::EvaluationError => "\x1b[35merror\x1b[0m",
        };

        println!("{} {}", indicator, violation.rule_id);
        println!("  key: {}", violation.keys.join(", "));
        println!("  expected: {}", violation.expected);
        println!("  actual: {}", violation.actual);
        println!("  profile: {}", violation.profile);
        println!();
    }

    let ok = report.passed() && parse_errors.is_empty();
    let color = if ok { "\x1b[32m" } else { "\x1b[31m" };
    if parse_errors.is_empty() {
        println!("{}{}\x1b[0m", color, report.format_summary());
    } else {
        println!(
            "{}{} ({} structural error(s))\x1b[0m",
            color,
            report.format_summary(),
            parse_errors.len()
        );
    }
}

#[derive(Serialize)]
struct JsonParseError<'a> {
    line: usize,
    text: &'a str,
    message: String,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    #[serde(flatten)]
    report: &'a Report,
    parse_errors: Vec<JsonParseError<'a>>,
    passed: bool,
}

fn print_json(report: &Report, parse_errors: &[ParseError]) -> Result<()> {
    let output = JsonOutput {
        report,
        parse_errors: parse_errors
            .iter()
            .map(|e| JsonParseError {
                line: e.line,
                text: &e.text,
                message: e.to_string(),
            })
            .collect(),
        passed: report.passed() && parse_errors.is_empty(),
    };
    let json = serde_json::to_string_pretty(&output)?;
    println!("{json}");
    Ok(())
}

fn print_compact(report: &Report, parse_errors: &[ParseError]) {
    for error in parse_errors {
        println!("parse-error: {error}");
    }
    for violation in &report.violations {
        println!("{violation}");
    }
}
