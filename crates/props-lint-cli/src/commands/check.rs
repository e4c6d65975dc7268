//! Check command implementation.

use anyhow::{Context, Result};
use props_lint_core::declarative::load_catalogue_from_file;
use props_lint_core::{Catalogue, Profile, PropertyStore, Validator};
use std::path::Path;

use crate::{OutputFormat, PresetArg};

/// Runs the check command.
pub fn run(
    path: &Path,
    profile: &str,
    preset: PresetArg,
    rules_file: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let profile = parse_profile(profile)?;
    let catalogue = load_catalogue(preset, rules_file)?;

    let store = PropertyStore::from_file(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    tracing::info!(
        "Validating {} as profile {} with {} rules",
        path.display(),
        profile,
        catalogue.len()
    );

    let report = Validator::new(catalogue).validate(&store, &profile);

    super::output::print(&report, store.parse_errors(), format)?;

    // Structural errors fail the run even when every rule passed.
    if !report.passed() || store.has_parse_errors() {
        std::process::exit(1);
    }

    Ok(())
}

fn parse_profile(name: &str) -> Result<Profile> {
    if name == "base" {
        return Ok(Profile::Base);
    }
    Profile::named(name).with_context(|| format!("invalid profile name: {name}"))
}

fn load_catalogue(preset: PresetArg, rules_file: Option<&Path>) -> Result<Catalogue> {
    match rules_file {
        Some(p) => {
            tracing::info!("Using rules file: {}", p.display());
            load_catalogue_from_file(p)
                .with_context(|| format!("failed to load rules file: {}", p.display()))
        }
        None => props_lint_rules::Preset::from(preset)
            .catalogue()
            .context("failed to build built-in catalogue"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_maps_to_the_base_profile() {
        assert_eq!(parse_profile("base").unwrap(), Profile::Base);
    }

    #[test]
    fn named_profiles_are_validated() {
        assert!(parse_profile("prod").is_ok());
        assert!(parse_profile("no spaces").is_err());
    }

    #[test]
    fn presets_build_without_a_rules_file() {
        let catalogue = load_catalogue(PresetArg::Minimal, None).unwrap();
        assert_eq!(catalogue.len(), 2);
    }

    #[test]
    fn explicit_rules_file_takes_precedence_over_preset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("props-lint.toml");
        std::fs::write(
            &path,
            "[[rules]]\nid = \"only-rule\"\ntype = \"exact-value\"\nkey = \"k\"\nexpected = \"v\"\n",
        )
        .unwrap();

        let catalogue = load_catalogue(PresetArg::Recommended, Some(&path)).unwrap();
        assert_eq!(catalogue.len(), 1);
        assert!(catalogue.get("only-rule").is_some());
    }

    #[test]
    fn missing_rules_file_is_an_error() {
        let result = load_catalogue(
            PresetArg::Recommended,
            Some(Path::new("/nonexistent/rules.toml")),
        );
        assert!(result.is_err());
    }
}
