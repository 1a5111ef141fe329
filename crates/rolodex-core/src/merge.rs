use crate::domain::record::present;
use crate::domain::{Normalizer, Record};

/// Folds `incoming` into `existing`, which stays authoritative.
///
/// Phones are unioned by normalized form keeping the original spellings,
/// specialties and languages are unioned, and the remaining contact fields are
/// only filled where `existing` is empty. Name, type and provenance are never
/// taken from `incoming`. `last_updated` is set to `now`.
pub fn merge_records(
    existing: &Record,
    incoming: &Record,
    normalizer: &Normalizer,
    now: &str,
) -> Record {
    let mut merged = existing.clone();

    let mut known = normalizer.phones(existing);
    for phone in &incoming.phones {
        if let Some(normalized) = normalizer.phone(phone) {
            if !known.contains(&normalized) {
                known.push(normalized);
                merged.phones.push(phone.clone());
            }
        }
    }

    merged
        .specialties
        .extend(incoming.specialties.iter().cloned());
    merged.languages.extend(incoming.languages.iter().cloned());

    fill_if_empty(&mut merged.email, &incoming.email);
    fill_if_empty(&mut merged.website, &incoming.website);
    fill_if_empty(&mut merged.address, &incoming.address);
    fill_if_empty(&mut merged.city, &incoming.city);
    fill_if_empty(&mut merged.district, &incoming.district);
    fill_if_empty(&mut merged.postal_code, &incoming.postal_code);
    fill_if_empty(&mut merged.opening_hours, &incoming.opening_hours);

    if merged.rating.is_none() {
        merged.rating = incoming.rating;
    }

    merged.last_updated = Some(now.to_string());
    merged
}

fn fill_if_empty(target: &mut Option<String>, incoming: &Option<String>) {
    if present(target).is_some() {
        return;
    }
    if let Some(value) = present(incoming) {
        *target = Some(value.to_string());
    }
}
