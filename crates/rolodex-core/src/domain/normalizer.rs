use crate::domain::email::normalize_email;
use crate::domain::name::{normalize_name, NameRules};
use crate::domain::phone::{normalize_phone, PhoneRules};
use crate::domain::record::Record;
use crate::domain::website::website_domain;

/// Bundles the configured phone and name rules so callers normalize consistently.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Normalizer {
    pub phone: PhoneRules,
    pub names: NameRules,
}

impl Normalizer {
    pub fn new(phone: PhoneRules, names: NameRules) -> Self {
        Self { phone, names }
    }

    pub fn phone(&self, raw: &str) -> Option<String> {
        normalize_phone(raw, &self.phone)
    }

    pub fn name(&self, raw: &str) -> String {
        normalize_name(raw, &self.names)
    }

    pub fn email(&self, raw: &str) -> Option<String> {
        normalize_email(raw)
    }

    /// Normalized phones of a record, de-duplicated, in record order.
    pub fn phones(&self, record: &Record) -> Vec<String> {
        let mut out: Vec<String> = Vec::with_capacity(record.phones.len());
        for phone in &record.phones {
            if let Some(normalized) = self.phone(phone) {
                if !out.contains(&normalized) {
                    out.push(normalized);
                }
            }
        }
        out
    }

    pub fn primary_phone(&self, record: &Record) -> Option<String> {
        record.phones.first().and_then(|phone| self.phone(phone))
    }

    pub fn record_email(&self, record: &Record) -> Option<String> {
        record.email().and_then(|email| self.email(email))
    }

    pub fn record_domain(&self, record: &Record) -> Option<String> {
        record.website().and_then(website_domain)
    }
}

#[cfg(test)]
mod tests {
    use super::Normalizer;
    use crate::domain::Record;

    #[test]
    fn phones_are_deduplicated_by_normalized_form() {
        let mut record = Record::new("Bufete Ruiz");
        record.phones = vec![
            "911 234 567".to_string(),
            "+34911234567".to_string(),
            "".to_string(),
            "600 000 000".to_string(),
        ];
        let normalizer = Normalizer::default();
        assert_eq!(
            normalizer.phones(&record),
            vec!["+34911234567".to_string(), "+34600000000".to_string()]
        );
        assert_eq!(
            normalizer.primary_phone(&record).as_deref(),
            Some("+34911234567")
        );
    }
}
