//! Validator: drives the catalogue against a store and aggregates results.

use crate::catalogue::Catalogue;
use crate::profile::Profile;
use crate::store::PropertyStore;
use crate::types::{Report, Violation, ViolationKind};

use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{debug, info};

/// Evaluates a catalogue against a property store.
///
/// Error aggregation is the central design commitment: the full catalogue
/// is iterated regardless of earlier failures, and every violation
/// reaches the report. Each [`validate`](Validator::validate) call is a
/// pure function of its inputs, so distinct files or profiles can be
/// validated concurrently without coordination.
#[derive(Debug)]
pub struct Validator {
    catalogue: Catalogue,
}

impl Validator {
    /// Creates a validator over an explicitly constructed catalogue.
    #[must_use]
    pub fn new(catalogue: Catalogue) -> Self {
        Self { catalogue }
    }

    /// Returns the catalogue this validator evaluates.
    #[must_use]
    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    /// Validates the store under the active profile.
    ///
    /// Rules whose scope excludes the profile are skipped and contribute
    /// neither a pass nor a violation. No rule evaluation escapes the
    /// catalogue boundary: a panicking rule is converted to an
    /// [`ViolationKind::EvaluationError`] violation and the run completes.
    #[must_use]
    pub fn validate(&self, store: &PropertyStore, profile: &Profile) -> Report {
        let mut report = Report::new();

        for rule in self.catalogue.iter() {
            if !rule.applies_to(profile) {
                debug!(rule = rule.id(), %profile, "skipping out-of-scope rule");
                report.rules_skipped += 1;
                continue;
            }
            report.rules_evaluated += 1;

            let outcome = catch_unwind(AssertUnwindSafe(|| rule.evaluate(store, profile)));
            match outcome {
                Ok(Some(violation)) => report.violations.push(violation),
                Ok(None) => {}
                Err(panic) => {
                    report.violations.push(
                        Violation::new(
                            rule.id(),
                            rule.keys().into_iter().map(String::from).collect(),
                            rule.description(),
                            panic_message(&panic),
                            profile.to_string(),
                        )
                        .with_kind(ViolationKind::EvaluationError),
                    );
                }
            }
        }

        info!(
            %profile,
            evaluated = report.rules_evaluated,
            skipped = report.rules_skipped,
            violations = report.violations.len(),
            "validation complete"
        );

        report
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("rule panicked: {s}")
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("rule panicked: {s}")
    } else {
        "rule panicked".to_string()
    }
}
