//! props-lint CLI tool.
//!
//! Usage:
//! ```bash
//! props-lint check [OPTIONS] [PATH]
//! props-lint list-rules
//! props-lint init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

/// Declarative validator for Kafka-Streams properties files
#[derive(Parser)]
#[command(name = "props-lint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a properties file against the rule catalogue
    Check {
        /// Properties file to validate
        #[arg(default_value = "src/main/resources/application.properties")]
        path: PathBuf,

        /// Profile to validate as (e.g. prod, staging)
        #[arg(short, long, default_value = "base")]
        profile: String,

        /// Built-in preset to use when no rules file is given
        #[arg(long, default_value = "recommended")]
        preset: PresetArg,

        /// Path to a declarative TOML rules file
        #[arg(short, long)]
        rules: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// List the built-in rules
    ListRules,

    /// Write a starter declarative rules file
    Init {
        /// Overwrite an existing rules file
        #[arg(long)]
        force: bool,
    },
}

/// Output format for validation reports.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-violation compact format.
    Compact,
}

/// Built-in preset selection.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum PresetArg {
    /// Every built-in rule, dev/test exempt.
    #[default]
    Recommended,
    /// Every built-in rule in every profile.
    Strict,
    /// Core security and durability rules only.
    Minimal,
}

impl From<PresetArg> for props_lint_rules::Preset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Recommended => Self::Recommended,
            PresetArg::Strict => Self::Strict,
            PresetArg::Minimal => Self::Minimal,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Check {
            path,
            profile,
            preset,
            rules,
            format,
        } => commands::check::run(&path, &profile, preset, rules.as_deref(), format),
        Commands::ListRules => commands::list_rules::run(),
        Commands::Init { force } => commands::init::run(force),
    }
}
