pub mod error;
pub mod file;
pub mod paths;

use crate::error::Result;
use rolodex_core::{BatchResult, Consolidator, EngineOptions, Record, Statistics};
use std::path::Path;
use tracing::info;

/// A consolidator bound to its on-disk store file format.
///
/// Persistence is whole-file: `load` replaces the in-memory records and
/// `save` overwrites the file. Callers must serialize saves to one path.
#[derive(Debug, Clone, Default)]
pub struct Store {
    consolidator: Consolidator,
}

impl Store {
    pub fn new(options: EngineOptions) -> Self {
        Self {
            consolidator: Consolidator::new(options),
        }
    }

    pub fn open(path: &Path, options: EngineOptions) -> Result<Self> {
        let mut store = Self::new(options);
        store.load(path)?;
        Ok(store)
    }

    /// Replaces the records with the contents of `path`.
    ///
    /// A missing file yields an empty store. A file that cannot be parsed is
    /// logged and treated as empty. Other read failures are returned.
    pub fn load(&mut self, path: &Path) -> Result<()> {
        let records = file::read_records(path)?;
        info!(path = %path.display(), records = records.len(), "store loaded");
        self.consolidator.replace_records(records);
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        file::write_records(path, self.consolidator.records())?;
        info!(
            path = %path.display(),
            records = self.consolidator.len(),
            "store saved"
        );
        Ok(())
    }

    pub fn process_batch<I>(&mut self, candidates: I) -> BatchResult
    where
        I: IntoIterator<Item = Record>,
    {
        self.consolidator.process_batch(candidates)
    }

    pub fn statistics(&self) -> Statistics {
        self.consolidator.statistics()
    }

    pub fn records(&self) -> &[Record] {
        self.consolidator.records()
    }

    pub fn consolidator(&self) -> &Consolidator {
        &self.consolidator
    }

    pub fn consolidator_mut(&mut self) -> &mut Consolidator {
        &mut self.consolidator
    }
}
