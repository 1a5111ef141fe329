use crate::batch::Consolidator;
use crate::domain::Record;
use serde::Serialize;
use std::collections::BTreeMap;

pub const UNKNOWN_CITY: &str = "unknown";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub total: usize,
    pub with_phone: usize,
    pub with_email: usize,
    pub with_website: usize,
    pub with_address: usize,
    pub fully_contactable: usize,
    pub by_type: BTreeMap<String, usize>,
    pub by_city: BTreeMap<String, usize>,
}

impl Statistics {
    pub fn from_records(records: &[Record]) -> Self {
        let mut stats = Statistics {
            total: records.len(),
            ..Statistics::default()
        };

        for record in records {
            let phone = record.has_phone();
            let email = record.email().is_some();
            let website = record.website().is_some();
            stats.with_phone += usize::from(phone);
            stats.with_email += usize::from(email);
            stats.with_website += usize::from(website);
            stats.with_address += usize::from(record.address().is_some());
            stats.fully_contactable += usize::from(phone && email && website);

            *stats
                .by_type
                .entry(record.kind.as_str().to_string())
                .or_insert(0) += 1;
            let city = record.city().map(str::trim).unwrap_or(UNKNOWN_CITY);
            *stats.by_city.entry(city.to_string()).or_insert(0) += 1;
        }

        stats
    }
}

impl Consolidator {
    pub fn statistics(&self) -> Statistics {
        Statistics::from_records(self.records())
    }
}
