//! `histrep update` — apply a batch of change records to a report.

use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use clap::Args;
use colored::Colorize;
use serde_json::Value;

use histrep_engine::{sync, SyncOptions, SyncOutcome};
use histrep_store::{FsStore, Locator, RetryPolicy};

use crate::adapter::JsonFileAdapter;
use crate::{csv_fields, ResourceArg};

/// Arguments for `histrep update`.
#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Resource type of the report being updated.
    #[arg(long)]
    pub resource: ResourceArg,

    /// JSON-array file of ordered change-stream records.
    #[arg(long)]
    pub events: PathBuf,

    /// Container holding the snapshot document.
    #[arg(long)]
    pub container: String,

    /// Object path of the snapshot document.
    #[arg(long)]
    pub path: String,

    /// JSON-array scan file; required with --export-if-missing.
    #[arg(long)]
    pub scan: Option<PathBuf>,

    /// Comma-separated top-level fields to exclude from the final report.
    #[arg(long, default_value = "Name,_version")]
    pub exclude_fields: String,

    /// Root directory of the snapshot store.
    #[arg(long, default_value = ".")]
    pub store_root: PathBuf,

    /// Actually write to the store; without this flag nothing is saved.
    #[arg(short, long)]
    pub commit: bool,

    /// Fall back to a full rebuild when the snapshot document is absent.
    #[arg(long)]
    pub export_if_missing: bool,
}

impl UpdateArgs {
    pub fn run(self) -> Result<()> {
        ensure!(
            !self.export_if_missing || self.scan.is_some(),
            "--export-if-missing requires --scan (the rebuild needs a scan source)"
        );
        if !self.commit {
            tracing::warn!("commit flag not set -- not saving anything");
        }

        let records = read_records(&self.events)?;
        let config = self
            .resource
            .0
            .with_excluded_fields(csv_fields(&self.exclude_fields));
        let adapter = JsonFileAdapter::new(config, self.scan);
        let store = FsStore::new(&self.store_root);
        let locator = Locator::new(&self.container, &self.path);

        let outcome = sync(
            &store,
            &adapter,
            &locator,
            &records,
            SyncOptions {
                commit: self.commit,
                export_if_missing: self.export_if_missing,
            },
            &RetryPolicy::default(),
        )
        .with_context(|| format!("record update failed for {locator}"))?;

        print_outcome(&locator, &outcome);
        Ok(())
    }
}

fn read_records(path: &PathBuf) -> Result<Vec<Value>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read events file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("events file {} is not a JSON array", path.display()))
}

fn print_outcome(locator: &Locator, outcome: &SyncOutcome) {
    match outcome {
        SyncOutcome::Updated {
            applied,
            dropped,
            item_count,
        } => {
            println!(
                "{} '{locator}' updated ({applied} applied, {dropped} dropped, {item_count} item(s))",
                "✓".green()
            );
        }
        SyncOutcome::WouldUpdate {
            applied,
            dropped,
            item_count,
        } => {
            println!(
                "{} [dry-run] '{locator}' would hold {item_count} item(s) \
                 ({applied} applied, {dropped} dropped)",
                "~".yellow()
            );
        }
        SyncOutcome::Rebuilt { item_count } => {
            println!(
                "{} '{locator}' was missing; exported a full report ({item_count} item(s))",
                "✓".green()
            );
        }
        SyncOutcome::SkippedMissing => {
            println!(
                "{} '{locator}' does not exist and export-if-missing is not in effect; skipped",
                "✗".red()
            );
        }
    }
}
