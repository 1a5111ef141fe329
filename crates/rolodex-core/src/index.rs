use crate::domain::{IdentityKey, Normalizer, Record};
use std::collections::{BTreeSet, HashMap};

/// Lookup tables kept in lock-step with the record list.
///
/// Entries are only ever added: a merge never removes a phone or email from a
/// record and positions are stable, so an entry written for an older version
/// of a record still points at the same entity.
#[derive(Debug, Clone, Default)]
pub struct RecordIndex {
    by_identity: HashMap<IdentityKey, usize>,
    by_phone: HashMap<String, BTreeSet<usize>>,
    by_email: HashMap<String, usize>,
}

impl RecordIndex {
    pub fn build(records: &[Record], normalizer: &Normalizer) -> Self {
        let mut index = Self::default();
        index.rebuild(records, normalizer);
        index
    }

    pub fn rebuild(&mut self, records: &[Record], normalizer: &Normalizer) {
        self.clear();
        for (position, record) in records.iter().enumerate() {
            self.insert(position, record, normalizer);
        }
    }

    pub fn clear(&mut self) {
        self.by_identity.clear();
        self.by_phone.clear();
        self.by_email.clear();
    }

    pub fn insert(&mut self, position: usize, record: &Record, normalizer: &Normalizer) {
        self.by_identity
            .insert(IdentityKey::of(record, normalizer), position);
        for phone in normalizer.phones(record) {
            self.by_phone.entry(phone).or_default().insert(position);
        }
        if let Some(email) = normalizer.record_email(record) {
            // Last writer wins.
            self.by_email.insert(email, position);
        }
    }

    pub fn identity(&self, key: &IdentityKey) -> Option<usize> {
        self.by_identity.get(key).copied()
    }

    pub fn phone(&self, normalized: &str) -> impl Iterator<Item = usize> + '_ {
        self.by_phone
            .get(normalized)
            .into_iter()
            .flat_map(|positions| positions.iter().copied())
    }

    pub fn email(&self, normalized: &str) -> Option<usize> {
        self.by_email.get(normalized).copied()
    }

    pub fn phone_groups(&self) -> impl Iterator<Item = (&str, &BTreeSet<usize>)> {
        self.by_phone
            .iter()
            .map(|(phone, positions)| (phone.as_str(), positions))
    }

    /// True when every lookup the record should answer points at `position`.
    pub fn covers(&self, position: usize, record: &Record, normalizer: &Normalizer) -> bool {
        if self.identity(&IdentityKey::of(record, normalizer)) != Some(position) {
            return false;
        }
        let phones_ok = normalizer
            .phones(record)
            .iter()
            .all(|phone| self.phone(phone).any(|p| p == position));
        let email_ok = normalizer
            .record_email(record)
            .map_or(true, |email| self.by_email.contains_key(&email));
        phones_ok && email_ok
    }

    pub fn identity_len(&self) -> usize {
        self.by_identity.len()
    }

    pub fn phone_len(&self) -> usize {
        self.by_phone.len()
    }

    pub fn email_len(&self) -> usize {
        self.by_email.len()
    }
}
