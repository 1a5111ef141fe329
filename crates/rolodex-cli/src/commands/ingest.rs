use crate::commands::{print_json, Context};
use crate::error::invalid_input;
use anyhow::{Context as _, Result};
use rolodex_core::{BatchResult, BatchSummary, MatchTier, Record};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, clap::Args)]
pub struct IngestArgs {
    /// JSON file holding an array of records or a saved store
    pub batch: PathBuf,
    /// Classify the batch without writing the store
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Serialize)]
pub struct IngestReport {
    pub store: String,
    pub saved: bool,
    pub summary: BatchSummary,
    pub decisions: Vec<Decision>,
}

#[derive(Debug, Serialize)]
pub struct Decision {
    pub outcome: &'static str,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<MatchTier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

pub fn ingest(ctx: &mut Context, args: IngestArgs) -> Result<()> {
    let candidates = read_batch(&args.batch)?;
    let result = ctx.store.process_batch(candidates);

    let saved = !args.dry_run;
    if saved {
        ctx.store
            .save(&ctx.store_path)
            .with_context(|| format!("save store {}", ctx.store_path.display()))?;
    }

    let report = IngestReport {
        store: ctx.store_path.display().to_string(),
        saved,
        summary: result.summary(),
        decisions: decisions(&result),
    };
    if ctx.json {
        return print_json(&report);
    }

    let summary = &report.summary;
    println!(
        "processed {}: {} added, {} updated, {} ignored, {} invalid",
        summary.total_processed,
        summary.added,
        summary.updated,
        summary.duplicates_ignored,
        summary.invalid
    );
    for (tier, count) in &summary.by_tier {
        println!("  {tier}: {count}");
    }
    if !summary.fuzzy_tier_active {
        println!("note: store too large for fuzzy name matching");
    }
    for decision in report.decisions.iter().filter(|d| d.outcome == "invalid") {
        println!(
            "invalid: {:?} ({})",
            decision.name,
            decision.reason.as_deref().unwrap_or_default()
        );
    }
    if saved {
        println!("saved {}", report.store);
    } else {
        println!("dry run, store not written");
    }
    Ok(())
}

/// Accepts a bare array of records or a saved store object.
fn read_batch(path: &Path) -> Result<Vec<Record>> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read batch {}", path.display()))?;
    let value: Value = serde_json::from_str(&contents)
        .with_context(|| format!("parse batch {}", path.display()))?;
    let records = match value {
        Value::Array(items) => Value::Array(items),
        Value::Object(mut map) => match map.remove("registros").or_else(|| map.remove("records")) {
            Some(records) => records,
            None => return Err(invalid_input("batch object has no records array")),
        },
        _ => return Err(invalid_input("batch must be a JSON array of records")),
    };
    serde_json::from_value(records).with_context(|| format!("parse records in {}", path.display()))
}

fn decisions(result: &BatchResult) -> Vec<Decision> {
    let added = result.added.iter().map(|record| Decision {
        outcome: "added",
        name: record.name.clone(),
        tier: None,
        position: None,
        reason: None,
    });
    let updated = result.updated.iter().map(|outcome| Decision {
        outcome: "updated",
        name: outcome.merged.name.clone(),
        tier: Some(outcome.tier),
        position: Some(outcome.position),
        reason: None,
    });
    let ignored = result.duplicates_ignored.iter().map(|outcome| Decision {
        outcome: "ignored",
        name: outcome.candidate.name.clone(),
        tier: Some(outcome.tier),
        position: Some(outcome.position),
        reason: None,
    });
    let invalid = result.invalid.iter().map(|outcome| Decision {
        outcome: "invalid",
        name: outcome.record.name.clone(),
        tier: None,
        position: None,
        reason: Some(outcome.reason.to_string()),
    });
    added.chain(updated).chain(ignored).chain(invalid).collect()
}
