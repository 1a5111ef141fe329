use anyhow::Result;
use rolodex_store::Store;
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;

pub mod completions;
pub mod ingest;
pub mod scan;
pub mod show;
pub mod stats;

pub struct Context {
    pub store: Store,
    pub store_path: PathBuf,
    pub json: bool,
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
