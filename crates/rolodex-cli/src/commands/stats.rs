use crate::commands::{print_json, Context};
use anyhow::Result;

pub fn stats(ctx: &Context) -> Result<()> {
    let stats = ctx.store.statistics();
    if ctx.json {
        return print_json(&stats);
    }

    println!("total: {}", stats.total);
    println!("with phone: {}", stats.with_phone);
    println!("with email: {}", stats.with_email);
    println!("with website: {}", stats.with_website);
    println!("with address: {}", stats.with_address);
    println!("phone and email: {}", stats.fully_contactable);
    if !stats.by_type.is_empty() {
        println!("by type:");
        for (kind, count) in &stats.by_type {
            println!("  {kind}: {count}");
        }
    }
    if !stats.by_city.is_empty() {
        println!("by city:");
        for (city, count) in &stats.by_city {
            println!("  {city}: {count}");
        }
    }
    Ok(())
}
