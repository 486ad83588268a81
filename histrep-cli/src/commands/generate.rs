//! `histrep generate` — full rebuild and fan-out dump.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use histrep_engine::{export, ExportOutcome};
use histrep_store::{FsStore, Locator, RetryPolicy};

use crate::adapter::JsonFileAdapter;
use crate::{csv_fields, ResourceArg};

/// Arguments for `histrep generate`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Resource type to generate the report for.
    #[arg(long)]
    pub resource: ResourceArg,

    /// JSON-array file holding the full scan of the source of truth.
    #[arg(long)]
    pub scan: PathBuf,

    /// Container(s) to dump the report to; repeat for fan-out.
    #[arg(long = "container", required = true)]
    pub containers: Vec<String>,

    /// Object path of the report within each container.
    #[arg(long)]
    pub path: String,

    /// Comma-separated top-level fields to exclude from the final report.
    #[arg(long, default_value = "Name,_version")]
    pub exclude_fields: String,

    /// Root directory of the snapshot store.
    #[arg(long, default_value = ".")]
    pub store_root: PathBuf,

    /// Actually write to the store; without this flag nothing is saved.
    #[arg(short, long)]
    pub commit: bool,
}

impl GenerateArgs {
    pub fn run(self) -> Result<()> {
        if !self.commit {
            tracing::warn!("commit flag not set -- not saving anything");
        }

        let config = self
            .resource
            .0
            .with_excluded_fields(csv_fields(&self.exclude_fields));
        let adapter = JsonFileAdapter::new(config, Some(self.scan));
        let store = FsStore::new(&self.store_root);
        let targets: Vec<Locator> = self
            .containers
            .iter()
            .map(|container| Locator::new(container, &self.path))
            .collect();

        let outcome = export(
            &store,
            &adapter,
            &targets,
            &RetryPolicy::default(),
            self.commit,
        )
        .context("report generation failed")?;

        match outcome {
            ExportOutcome::Exported {
                item_count,
                targets,
            } => {
                println!(
                    "{} exported {item_count} item(s) to {targets} target(s)",
                    "✓".green()
                );
            }
            ExportOutcome::WouldExport { item_count } => {
                println!(
                    "{} would export {item_count} item(s) (commit flag not set)",
                    "~".yellow()
                );
            }
        }
        Ok(())
    }
}
