use crate::domain::normalizer::Normalizer;
use crate::domain::record::Record;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Fingerprint of normalized name, primary phone and email.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityKey(String);

impl IdentityKey {
    pub fn of(record: &Record, normalizer: &Normalizer) -> Self {
        let name = normalizer.name(&record.name);
        let phone = normalizer.primary_phone(record).unwrap_or_default();
        let email = normalizer.record_email(record).unwrap_or_default();

        let mut hasher = Sha256::new();
        hasher.update(format!("{name}|{phone}|{email}"));
        Self(format!("{:x}", hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
