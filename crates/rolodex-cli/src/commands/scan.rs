use crate::commands::{print_json, Context};
use anyhow::Result;
use rolodex_core::MatchTier;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct PairView {
    pub tier: MatchTier,
    pub score: f64,
    pub first: RecordRef,
    pub second: RecordRef,
}

#[derive(Debug, Serialize)]
pub struct RecordRef {
    pub position: usize,
    pub name: String,
}

pub fn scan(ctx: &Context) -> Result<()> {
    let consolidator = ctx.store.consolidator();
    let pairs: Vec<PairView> = consolidator
        .scan_duplicates()
        .into_iter()
        .map(|pair| PairView {
            tier: pair.tier,
            score: pair.score,
            first: record_ref(ctx, pair.first),
            second: record_ref(ctx, pair.second),
        })
        .collect();

    if ctx.json {
        return print_json(&pairs);
    }
    if pairs.is_empty() {
        println!("no likely duplicates");
        return Ok(());
    }
    for pair in &pairs {
        println!(
            "[{}] {:.0}  #{} {}  <->  #{} {}",
            pair.tier.as_str(),
            pair.score,
            pair.first.position,
            pair.first.name,
            pair.second.position,
            pair.second.name
        );
    }
    Ok(())
}

fn record_ref(ctx: &Context, position: usize) -> RecordRef {
    let name = ctx
        .store
        .records()
        .get(position)
        .map(|record| record.name.clone())
        .unwrap_or_default();
    RecordRef { position, name }
}
