use crate::domain::{IdentityKey, Normalizer, Record};
use crate::index::RecordIndex;
use crate::options::EngineOptions;
use crate::similarity::Similarity;
use serde::{Serialize, Serializer};
use tracing::debug;

/// Detection strategy that matched, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MatchTier {
    ExactHash,
    Phone,
    Email,
    NameSimilar,
}

impl MatchTier {
    pub const fn as_str(self) -> &'static str {
        match self {
            MatchTier::ExactHash => "exact_hash",
            MatchTier::Phone => "phone",
            MatchTier::Email => "email",
            MatchTier::NameSimilar => "name_similar",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "exact_hash" => Some(MatchTier::ExactHash),
            "phone" => Some(MatchTier::Phone),
            "email" => Some(MatchTier::Email),
            "name_similar" => Some(MatchTier::NameSimilar),
            _ => None,
        }
    }

    pub const fn all() -> &'static [MatchTier] {
        &[
            MatchTier::ExactHash,
            MatchTier::Phone,
            MatchTier::Email,
            MatchTier::NameSimilar,
        ]
    }
}

impl Serialize for MatchTier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DuplicateMatch {
    pub position: usize,
    pub tier: MatchTier,
}

/// Runs the four-tier cascade against one store's records and index.
pub(crate) struct DuplicateDetector<'a> {
    pub records: &'a [Record],
    pub index: &'a RecordIndex,
    pub options: &'a EngineOptions,
    pub similarity: &'a Similarity,
}

impl DuplicateDetector<'_> {
    pub fn fuzzy_tier_active(&self) -> bool {
        self.records.len() <= self.options.fuzzy_scan_limit
    }

    /// First matching tier wins; later tiers are not consulted.
    pub fn find(&self, candidate: &Record) -> Option<DuplicateMatch> {
        let normalizer = &self.options.normalizer;

        let key = IdentityKey::of(candidate, normalizer);
        if let Some(position) = self.index.identity(&key) {
            return Some(DuplicateMatch {
                position,
                tier: MatchTier::ExactHash,
            });
        }

        let candidate_name = normalizer.name(&candidate.name);

        for phone in normalizer.phones(candidate) {
            for position in self.index.phone(&phone) {
                let existing_name = normalizer.name(&self.records[position].name);
                let score = self
                    .similarity
                    .score_normalized(&candidate_name, &existing_name);
                if score > self.options.phone_name_threshold {
                    return Some(DuplicateMatch {
                        position,
                        tier: MatchTier::Phone,
                    });
                }
                debug!(phone = %phone, position, score, "shared phone but names differ");
            }
        }

        if let Some(email) = normalizer.record_email(candidate) {
            if let Some(position) = self.index.email(&email) {
                return Some(DuplicateMatch {
                    position,
                    tier: MatchTier::Email,
                });
            }
        }

        if candidate_name.is_empty() {
            return None;
        }
        if !self.fuzzy_tier_active() {
            debug!(
                records = self.records.len(),
                limit = self.options.fuzzy_scan_limit,
                "fuzzy name tier skipped"
            );
            return None;
        }

        for (position, existing) in self.records.iter().enumerate() {
            let score = self
                .similarity
                .score_normalized(&candidate_name, &normalizer.name(&existing.name));
            if score >= self.options.fuzzy_name_threshold
                && shares_contact(candidate, existing, normalizer)
            {
                return Some(DuplicateMatch {
                    position,
                    tier: MatchTier::NameSimilar,
                });
            }
        }

        None
    }
}

/// True when the records share a phone, an email or a website domain.
pub fn shares_contact(a: &Record, b: &Record, normalizer: &Normalizer) -> bool {
    let phones_b = normalizer.phones(b);
    if normalizer
        .phones(a)
        .iter()
        .any(|phone| phones_b.contains(phone))
    {
        return true;
    }

    if let (Some(left), Some(right)) = (normalizer.record_email(a), normalizer.record_email(b)) {
        if left == right {
            return true;
        }
    }

    matches!(
        (normalizer.record_domain(a), normalizer.record_domain(b)),
        (Some(left), Some(right)) if left == right
    )
}

#[cfg(test)]
mod tests {
    use super::{shares_contact, MatchTier};
    use crate::domain::{Normalizer, Record};

    #[test]
    fn parse_round_trip() {
        for tier in MatchTier::all() {
            assert_eq!(MatchTier::parse(tier.as_str()), Some(*tier));
        }
        assert!(MatchTier::parse("hash_exacto").is_none());
    }

    #[test]
    fn shares_contact_checks_each_channel() {
        let normalizer = Normalizer::default();
        let mut a = Record::new("Alfa");
        let mut b = Record::new("Alfa");
        assert!(!shares_contact(&a, &b, &normalizer));

        a.website = Some("https://www.alfa.es/contacto".to_string());
        b.website = Some("alfa.es".to_string());
        assert!(shares_contact(&a, &b, &normalizer));

        b.website = None;
        a.email = Some("Info@alfa.es".to_string());
        b.email = Some("info@alfa.es".to_string());
        assert!(shares_contact(&a, &b, &normalizer));

        b.email = None;
        a.phones = vec!["911 234 567".to_string()];
        b.phones = vec!["0034911234567".to_string()];
        assert!(shares_contact(&a, &b, &normalizer));
    }
}
