use crate::detect::{DuplicateDetector, DuplicateMatch, MatchTier};
use crate::domain::Record;
use crate::error::CoreError;
use crate::index::RecordIndex;
use crate::merge::merge_records;
use crate::options::EngineOptions;
use crate::similarity::Similarity;
use crate::time::now_timestamp;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateOutcome {
    pub position: usize,
    pub tier: MatchTier,
    pub original: Record,
    pub merged: Record,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateOutcome {
    pub position: usize,
    pub tier: MatchTier,
    pub candidate: Record,
    pub existing: Record,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvalidOutcome {
    pub record: Record,
    #[serde(serialize_with = "serialize_display")]
    pub reason: CoreError,
}

/// Itemized outcome of one batch, one bucket per classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchResult {
    pub added: Vec<Record>,
    pub updated: Vec<UpdateOutcome>,
    pub duplicates_ignored: Vec<DuplicateOutcome>,
    pub invalid: Vec<InvalidOutcome>,
    /// False when the store was too large for the fuzzy name tier for at
    /// least one candidate of the batch.
    pub fuzzy_tier_active: bool,
}

impl Default for BatchResult {
    fn default() -> Self {
        Self {
            added: Vec::new(),
            updated: Vec::new(),
            duplicates_ignored: Vec::new(),
            invalid: Vec::new(),
            fuzzy_tier_active: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub added: usize,
    pub updated: usize,
    pub duplicates_ignored: usize,
    pub invalid: usize,
    pub total_processed: usize,
    pub fuzzy_tier_active: bool,
    pub by_tier: BTreeMap<&'static str, usize>,
}

impl BatchResult {
    pub fn total_processed(&self) -> usize {
        self.added.len() + self.updated.len() + self.duplicates_ignored.len() + self.invalid.len()
    }

    pub fn summary(&self) -> BatchSummary {
        let mut by_tier = BTreeMap::new();
        let tiers = self
            .updated
            .iter()
            .map(|u| u.tier)
            .chain(self.duplicates_ignored.iter().map(|d| d.tier));
        for tier in tiers {
            *by_tier.entry(tier.as_str()).or_insert(0) += 1;
        }
        BatchSummary {
            added: self.added.len(),
            updated: self.updated.len(),
            duplicates_ignored: self.duplicates_ignored.len(),
            invalid: self.invalid.len(),
            total_processed: self.total_processed(),
            fuzzy_tier_active: self.fuzzy_tier_active,
            by_tier,
        }
    }
}

/// Exclusive owner of one store's records and lookup indices.
#[derive(Debug, Clone)]
pub struct Consolidator {
    records: Vec<Record>,
    index: RecordIndex,
    options: EngineOptions,
    similarity: Similarity,
}

impl Default for Consolidator {
    fn default() -> Self {
        Self::new(EngineOptions::default())
    }
}

impl Consolidator {
    pub fn new(options: EngineOptions) -> Self {
        let similarity = Similarity::new(options.normalizer.names.clone());
        Self::with_similarity(options, similarity)
    }

    pub fn with_similarity(options: EngineOptions, similarity: Similarity) -> Self {
        Self {
            records: Vec::new(),
            index: RecordIndex::default(),
            options,
            similarity,
        }
    }

    pub fn from_records(records: Vec<Record>, options: EngineOptions) -> Self {
        let mut consolidator = Self::new(options);
        consolidator.replace_records(records);
        consolidator
    }

    /// Swaps in a new record list and rebuilds every index from it.
    pub fn replace_records(&mut self, records: Vec<Record>) {
        self.records = records;
        self.index.rebuild(&self.records, &self.options.normalizer);
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    pub fn get(&self, position: usize) -> Option<&Record> {
        self.records.get(position)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn similarity(&self) -> &Similarity {
        &self.similarity
    }

    pub fn index(&self) -> &RecordIndex {
        &self.index
    }

    pub(crate) fn detector(&self) -> DuplicateDetector<'_> {
        DuplicateDetector {
            records: &self.records,
            index: &self.index,
            options: &self.options,
            similarity: &self.similarity,
        }
    }

    pub fn find_duplicate(&self, candidate: &Record) -> Option<DuplicateMatch> {
        self.detector().find(candidate)
    }

    pub fn process_batch<I>(&mut self, candidates: I) -> BatchResult
    where
        I: IntoIterator<Item = Record>,
    {
        let now = now_timestamp();
        self.process_batch_at(&now, candidates)
    }

    /// Classifies each candidate in input order, stamping changes with `now`.
    pub fn process_batch_at<I>(&mut self, now: &str, candidates: I) -> BatchResult
    where
        I: IntoIterator<Item = Record>,
    {
        let mut result = BatchResult::default();

        for candidate in candidates {
            if let Err(reason) = candidate.validate() {
                debug!(name = %candidate.name, %reason, "candidate invalid");
                result.invalid.push(InvalidOutcome {
                    record: candidate,
                    reason,
                });
                continue;
            }

            let detector = self.detector();
            if !detector.fuzzy_tier_active() {
                result.fuzzy_tier_active = false;
            }

            match detector.find(&candidate) {
                Some(found) => {
                    let existing = &self.records[found.position];
                    let merged =
                        merge_records(existing, &candidate, &self.options.normalizer, now);
                    if merged.same_content(existing) {
                        debug!(
                            tier = found.tier.as_str(),
                            position = found.position,
                            "duplicate carries no new data"
                        );
                        result.duplicates_ignored.push(DuplicateOutcome {
                            position: found.position,
                            tier: found.tier,
                            candidate,
                            existing: existing.clone(),
                        });
                        continue;
                    }

                    debug!(
                        tier = found.tier.as_str(),
                        position = found.position,
                        "duplicate merged"
                    );
                    let original =
                        std::mem::replace(&mut self.records[found.position], merged.clone());
                    self.index
                        .insert(found.position, &merged, &self.options.normalizer);
                    result.updated.push(UpdateOutcome {
                        position: found.position,
                        tier: found.tier,
                        original,
                        merged,
                    });
                }
                None => {
                    let mut record = candidate;
                    record.last_updated = Some(now.to_string());
                    let position = self.records.len();
                    self.index
                        .insert(position, &record, &self.options.normalizer);
                    self.records.push(record.clone());
                    debug!(position, "candidate added");
                    result.added.push(record);
                }
            }
        }

        result
    }
}

fn serialize_display<S: Serializer>(value: &CoreError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

#[cfg(test)]
mod tests {
    use super::{BatchResult, Consolidator};
    use crate::detect::MatchTier;
    use crate::domain::Record;
    use crate::error::CoreError;

    const NOW: &str = "2030-01-15T13:45:00Z";

    #[test]
    fn invalid_candidates_have_no_side_effects() {
        let mut consolidator = Consolidator::default();
        let result = consolidator.process_batch_at(NOW, [Record::new("Sin contacto")]);
        assert_eq!(result.invalid.len(), 1);
        assert_eq!(result.invalid[0].reason, CoreError::NoContactChannel);
        assert!(consolidator.is_empty());
    }

    #[test]
    fn added_records_are_stamped() {
        let mut consolidator = Consolidator::default();
        let mut record = Record::new("Bufete Ruiz");
        record.website = Some("ruiz.es".to_string());
        let result = consolidator.process_batch_at(NOW, [record]);
        assert_eq!(result.added.len(), 1);
        assert_eq!(consolidator.records()[0].last_updated.as_deref(), Some(NOW));
    }

    #[test]
    fn summary_counts_tiers() {
        let mut consolidator = Consolidator::default();
        let mut record = Record::new("Bufete Ruiz");
        record.email = Some("info@ruiz.es".to_string());
        let result = consolidator.process_batch_at(NOW, [record.clone(), record]);
        let summary = result.summary();
        assert_eq!(summary.added, 1);
        assert_eq!(summary.duplicates_ignored, 1);
        assert_eq!(summary.total_processed, 2);
        assert_eq!(summary.by_tier.get(MatchTier::ExactHash.as_str()), Some(&1));
        assert!(summary.fuzzy_tier_active);
    }

    #[test]
    fn empty_batch_result_reports_fuzzy_active() {
        let result = BatchResult::default();
        assert_eq!(result.total_processed(), 0);
        assert!(result.fuzzy_tier_active);
    }
}
