//! # props-lint-rules
//!
//! Built-in rule catalogue for props-lint.
//!
//! This crate provides the curated Kafka-Streams rule set, grouped by
//! the part of the client configuration they guard.
//!
//! ## Rule Groups
//!
//! | Group | Rules | Description |
//! |-------|-------|-------------|
//! | `security` | `security-protocol`, `sasl-mechanism`, `bootstrap-servers-shape`, `ssl-endpoint-identification` | Broker transport and authentication |
//! | `producer` | `producer-acks`, `producer-compression`, `producer-idempotence`, `producer-retries`, `producer-batch-size-default` | Durability and throughput |
//! | `consumer` | `max-poll-records`, `offset-reset`, `isolation-level`, `api-timeout-ordering`, `session-heartbeat-ratio` | Poll batches and timeout ordering |
//! | `streams` | `standby-replicas`, `application-id`, `processing-guarantee`, `eos-commit-interval`, `state-dir-shape`, `topology-optimization`, `no-auto-create-topics` | Topology and processing guarantees |
//!
//! ## Usage
//!
//! ```ignore
//! use props_lint_core::{Profile, PropertyStore, Validator};
//! use props_lint_rules::recommended_catalogue;
//!
//! let store = PropertyStore::from_file("src/main/resources/application.properties")?;
//! let report = Validator::new(recommended_catalogue()?)
//!     .validate(&store, &Profile::named("prod")?);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod presets;

pub mod consumer;
pub mod producer;
pub mod security;
pub mod streams;

pub use presets::{
    all_rules, minimal_catalogue, recommended_catalogue, strict_catalogue, Preset,
};
