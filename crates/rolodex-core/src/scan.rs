use crate::batch::Consolidator;
use crate::detect::{shares_contact, MatchTier};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Two stored records that look like one entity. `first < second`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicatePair {
    pub first: usize,
    pub second: usize,
    pub tier: MatchTier,
    pub score: f64,
}

impl Consolidator {
    /// Read-only review of the store for pairs the cascade would have merged.
    ///
    /// Uses the same rules as batch detection: a shared phone with a name
    /// score above the phone threshold, a shared email, or a fuzzy name match
    /// confirmed by shared contact data. The fuzzy pass is skipped above the
    /// configured store size. Nothing is merged.
    pub fn scan_duplicates(&self) -> Vec<DuplicatePair> {
        let records = self.records();
        let options = self.options();
        let normalizer = &options.normalizer;
        let similarity = self.similarity();
        let names: Vec<String> = records.iter().map(|r| normalizer.name(&r.name)).collect();
        let score = |a: usize, b: usize| similarity.score_normalized(&names[a], &names[b]);

        let mut pairs: BTreeMap<(usize, usize), DuplicatePair> = BTreeMap::new();
        let mut record_pair = |a: usize, b: usize, tier: MatchTier, value: f64| {
            let key = (a.min(b), a.max(b));
            pairs.entry(key).or_insert(DuplicatePair {
                first: key.0,
                second: key.1,
                tier,
                score: value,
            });
        };

        for (_phone, positions) in self.index().phone_groups() {
            let positions: Vec<usize> = positions.iter().copied().collect();
            for (i, &a) in positions.iter().enumerate() {
                for &b in &positions[i + 1..] {
                    let value = score(a, b);
                    if value > options.phone_name_threshold {
                        record_pair(a, b, MatchTier::Phone, value);
                    }
                }
            }
        }

        let mut by_email: HashMap<String, Vec<usize>> = HashMap::new();
        for (position, record) in records.iter().enumerate() {
            if let Some(email) = normalizer.record_email(record) {
                by_email.entry(email).or_default().push(position);
            }
        }
        for positions in by_email.values() {
            for (i, &a) in positions.iter().enumerate() {
                for &b in &positions[i + 1..] {
                    record_pair(a, b, MatchTier::Email, score(a, b));
                }
            }
        }

        if records.len() <= options.fuzzy_scan_limit {
            for a in 0..records.len() {
                for b in a + 1..records.len() {
                    let value = score(a, b);
                    if value >= options.fuzzy_name_threshold
                        && shares_contact(&records[a], &records[b], normalizer)
                    {
                        record_pair(a, b, MatchTier::NameSimilar, value);
                    }
                }
            }
        }

        let mut pairs: Vec<DuplicatePair> = pairs.into_values().collect();
        pairs.sort_by(|a, b| {
            a.tier
                .cmp(&b.tier)
                .then_with(|| a.first.cmp(&b.first))
                .then_with(|| a.second.cmp(&b.second))
        });
        pairs
    }
}

#[cfg(test)]
mod tests {
    use crate::batch::Consolidator;
    use crate::detect::MatchTier;
    use crate::domain::Record;
    use crate::options::EngineOptions;

    fn record(name: &str, phone: Option<&str>, email: Option<&str>, web: Option<&str>) -> Record {
        let mut record = Record::new(name);
        record.phones = phone.map(|p| vec![p.to_string()]).unwrap_or_default();
        record.email = email.map(str::to_string);
        record.website = web.map(str::to_string);
        record
    }

    #[test]
    fn scan_reports_each_pair_once_with_first_tier() {
        let records = vec![
            record("Ruiz S.L.", Some("911234567"), Some("info@ruiz.es"), None),
            record("Ruiz Abogados", Some("+34 911 234 567"), Some("info@ruiz.es"), None),
            record("Despacho Alfa", None, Some("alfa@alfa.es"), Some("https://alfa.es")),
            record("Despacho Alfa S.L.", None, None, Some("www.alfa.es/contacto")),
            record("Omega", Some("600000000"), None, None),
        ];
        let consolidator = Consolidator::from_records(records, EngineOptions::default());
        let pairs = consolidator.scan_duplicates();

        assert_eq!(pairs.len(), 2);
        assert_eq!((pairs[0].first, pairs[0].second), (0, 1));
        assert_eq!(pairs[0].tier, MatchTier::Phone);
        assert_eq!((pairs[1].first, pairs[1].second), (2, 3));
        assert_eq!(pairs[1].tier, MatchTier::NameSimilar);
    }

    #[test]
    fn scan_ignores_name_only_lookalikes() {
        let records = vec![
            record("Despacho Alfa", None, Some("a@alfa.es"), None),
            record("Despacho Alfa", None, Some("b@alfa.es"), None),
        ];
        let consolidator = Consolidator::from_records(records, EngineOptions::default());
        assert!(consolidator.scan_duplicates().is_empty());
    }
}
