use crate::commands::{print_json, Context};
use crate::error::invalid_input;
use anyhow::Result;
use rolodex_core::Record;
use serde::Serialize;

#[derive(Debug, clap::Args)]
pub struct ShowArgs {
    /// Name fragment, phone number or email address
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct Found<'a> {
    pub position: usize,
    #[serde(flatten)]
    pub record: &'a Record,
}

pub fn show(ctx: &Context, args: ShowArgs) -> Result<()> {
    let query = args.query.trim();
    if query.is_empty() {
        return Err(invalid_input("query must not be empty"));
    }

    let found = find(ctx, query);
    if ctx.json {
        return print_json(&found);
    }
    if found.is_empty() {
        println!("no records match {query:?}");
        return Ok(());
    }
    for item in &found {
        print_record(item.position, item.record);
    }
    Ok(())
}

/// Exact lookups through the phone and email indices, then a substring match
/// on normalized names.
fn find<'a>(ctx: &'a Context, query: &str) -> Vec<Found<'a>> {
    let consolidator = ctx.store.consolidator();
    let normalizer = &consolidator.options().normalizer;
    let index = consolidator.index();

    let mut positions: Vec<usize> = Vec::new();
    if let Some(email) = normalizer.email(query).filter(|e| e.contains('@')) {
        positions.extend(index.email(&email));
    }
    if let Some(phone) = normalizer.phone(query) {
        positions.extend(index.phone(&phone));
    }
    let needle = normalizer.name(query);
    if !needle.is_empty() {
        positions.extend(
            consolidator
                .records()
                .iter()
                .enumerate()
                .filter(|(_, record)| normalizer.name(&record.name).contains(&needle))
                .map(|(position, _)| position),
        );
    }
    positions.sort_unstable();
    positions.dedup();

    positions
        .into_iter()
        .filter_map(|position| {
            consolidator
                .get(position)
                .map(|record| Found { position, record })
        })
        .collect()
}

fn print_record(position: usize, record: &Record) {
    println!("#{position} {} ({})", record.name, record.kind.as_str());
    for phone in &record.phones {
        println!("  phone: {phone}");
    }
    let optional = [
        ("email", record.email()),
        ("website", record.website()),
        ("address", record.address()),
        ("city", record.city()),
    ];
    for (label, value) in optional {
        if let Some(value) = value {
            println!("  {label}: {value}");
        }
    }
    if !record.specialties.is_empty() {
        let specialties: Vec<&str> = record.specialties.iter().map(String::as_str).collect();
        println!("  specialties: {}", specialties.join(", "));
    }
    if let Some(rating) = record.rating {
        println!("  rating: {rating}");
    }
    if let Some(updated) = &record.last_updated {
        println!("  updated: {updated}");
    }
}
