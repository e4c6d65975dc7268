//! # props-lint-core
//!
//! Core engine for validating properties-style configuration files
//! against a declarative rule catalogue.
//!
//! The engine has three parts:
//!
//! - [`PropertyStore`] — a profile-aware key/value store parsed from
//!   properties text, with `%profile.` override resolution
//! - [`Rule`] / [`Catalogue`] — a closed set of rule variants, each a
//!   pure function from a store to at most one [`Violation`]
//! - [`Validator`] — drives the catalogue and aggregates every
//!   violation into a [`Report`]; it never stops at the first failure
//!
//! ## Example
//!
//! ```ignore
//! use props_lint_core::{Catalogue, Profile, PropertyStore, Rule, RuleKind, Validator};
//!
//! let store = PropertyStore::parse("kafka-streams.producer.acks=all\n");
//! let catalogue = Catalogue::builder()
//!     .rule(Rule::new(
//!         "producer-acks",
//!         "Producer must wait for all in-sync replicas.",
//!         RuleKind::ExactValue {
//!             key: "kafka-streams.producer.acks".to_string(),
//!             expected: "all".to_string(),
//!         },
//!     ))
//!     .build()?;
//!
//! let report = Validator::new(catalogue).validate(&store, &Profile::named("prod")?);
//! assert!(report.passed());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod catalogue;
mod profile;
mod rule;
mod store;
mod types;
mod validator;

/// Declarative TOML catalogue support.
pub mod declarative;

pub use catalogue::{Catalogue, CatalogueBuilder, CatalogueError};
pub use profile::{InvalidProfile, Profile, ProfileScope};
pub use rule::{PatternError, Relation, Rule, RuleKind, ValuePattern};
pub use store::{
    ParseDiagnostic, ParseError, ParseErrorKind, PropertyEntry, PropertyStore, StoreError,
};
pub use types::{Report, Violation, ViolationKind, ABSENT};
pub use validator::Validator;
