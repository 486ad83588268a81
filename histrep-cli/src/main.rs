//! Histrep — snapshot report synchronizer CLI.
//!
//! # Usage
//!
//! ```text
//! histrep generate --resource <s3|securitygroup> --scan <file> \
//!     --container <name>... --path <key> [--exclude-fields a,b] [--commit]
//! histrep update --resource <s3|securitygroup> --events <file> \
//!     --container <name> --path <key> [--scan <file>] \
//!     [--exclude-fields a,b] [--commit] [--export-if-missing]
//! ```
//!
//! The snapshot store is a directory tree under `--store-root`; provider
//! SDK glue is out of scope and lives behind the same trait.

mod adapter;
mod commands;

use std::str::FromStr;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{generate::GenerateArgs, update::UpdateArgs};
use histrep_core::ResourceConfig;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "histrep",
    version,
    about = "Keep denormalized snapshot reports in sync with a change-event stream",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Full rebuild: scan the source of truth and dump a fresh report.
    Generate(GenerateArgs),

    /// Incremental sync: apply a batch of change records to a report.
    Update(UpdateArgs),
}

// ---------------------------------------------------------------------------
// Shared resource argument — parsed from CLI strings, yields the config
// ---------------------------------------------------------------------------

/// Thin wrapper so clap can parse a resource type from CLI args.
#[derive(Debug, Clone)]
pub struct ResourceArg(pub ResourceConfig);

impl FromStr for ResourceArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "s3" => Ok(Self(ResourceConfig::s3())),
            "securitygroup" => Ok(Self(ResourceConfig::security_group())),
            other => Err(format!(
                "unknown resource type '{other}'; expected: s3, securitygroup"
            )),
        }
    }
}

/// Split a CSV `--exclude-fields` value into field names.
pub(crate) fn csv_fields(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_owned)
        .collect()
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Generate(args) => args.run(),
        Commands::Update(args) => args.run(),
    }
}
