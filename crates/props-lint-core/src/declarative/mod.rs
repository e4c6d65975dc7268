//! Declarative rule catalogues defined in TOML.
//!
//! A `[[rules]]` file lets a team extend or replace the built-in
//! catalogue without recompiling. The pipeline is
//! TOML → DTO ([`config_dto`]) → validated domain rules ([`loader`]):
//! serde stays at the edge, and every definition error (missing field,
//! unknown type, bad pattern, duplicate id) surfaces at load time,
//! before any evaluation begins.

pub mod config_dto;
pub mod loader;

pub use config_dto::{CatalogueDto, RuleDto};
pub use loader::{load_catalogue_from_file, load_catalogue_from_str, LoadError};
