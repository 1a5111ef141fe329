use rolodex_core::{Consolidator, EngineOptions, MatchTier, NameScorer, Record, Similarity};
use std::sync::Arc;

const FIRST_RUN: &str = "2030-01-15T13:45:00Z";
const SECOND_RUN: &str = "2030-01-16T09:00:00Z";

fn record(name: &str, phones: &[&str], email: Option<&str>, website: Option<&str>) -> Record {
    let mut record = Record::new(name);
    record.phones = phones.iter().map(|p| p.to_string()).collect();
    record.email = email.map(str::to_string);
    record.website = website.map(str::to_string);
    record
}

fn scenario_batch() -> Vec<Record> {
    vec![
        record("Juan Pérez Abogados", &["911234567"], None, None),
        record(
            "Juan Perez Abogados S.L.",
            &["+34 911 234 567"],
            Some("info@jperez.es"),
            None,
        ),
    ]
}

fn assert_indexed(consolidator: &Consolidator) {
    let normalizer = &consolidator.options().normalizer;
    for (position, record) in consolidator.records().iter().enumerate() {
        assert!(
            consolidator.index().covers(position, record, normalizer),
            "record {position} not reachable through the index"
        );
    }
}

/// Scores every pair of distinct names the same.
#[derive(Debug)]
struct FixedScorer(f64);

impl NameScorer for FixedScorer {
    fn label(&self) -> &'static str {
        "fixed"
    }

    fn score(&self, _a: &str, _b: &str) -> f64 {
        self.0
    }
}

fn with_fixed_score(score: f64) -> Consolidator {
    let options = EngineOptions::default();
    let similarity =
        Similarity::with_scorer(options.normalizer.names.clone(), Arc::new(FixedScorer(score)));
    Consolidator::with_similarity(options, similarity)
}

#[test]
fn shared_phone_merges_and_fills_email() {
    let mut consolidator = Consolidator::default();
    let result = consolidator.process_batch_at(FIRST_RUN, scenario_batch());

    assert_eq!(result.added.len(), 1);
    assert_eq!(result.updated.len(), 1);
    assert!(result.duplicates_ignored.is_empty());
    assert!(result.invalid.is_empty());

    let update = &result.updated[0];
    assert_eq!(update.tier, MatchTier::Phone);
    assert_eq!(update.position, 0);
    assert_eq!(update.original.email, None);

    assert_eq!(consolidator.len(), 1);
    let stored = &consolidator.records()[0];
    assert_eq!(stored.name, "Juan Pérez Abogados");
    assert_eq!(stored.email.as_deref(), Some("info@jperez.es"));
    assert_eq!(stored.phones, vec!["911234567".to_string()]);
    assert_eq!(stored.last_updated.as_deref(), Some(FIRST_RUN));
    assert_indexed(&consolidator);
}

#[test]
fn reprocessing_a_batch_is_idempotent() {
    let mut consolidator = Consolidator::default();
    consolidator.process_batch_at(FIRST_RUN, scenario_batch());
    let snapshot = consolidator.records().to_vec();

    let second = consolidator.process_batch_at(SECOND_RUN, scenario_batch());
    assert!(second.added.is_empty());
    assert!(second.updated.is_empty());
    assert_eq!(second.duplicates_ignored.len(), 2);
    assert_eq!(consolidator.records(), snapshot.as_slice());
    assert_indexed(&consolidator);
}

#[test]
fn exact_hash_short_circuits_later_tiers() {
    let existing = record(
        "Despacho Alfa",
        &["911234567"],
        Some("info@alfa.es"),
        Some("https://alfa.es"),
    );
    let mut consolidator =
        Consolidator::from_records(vec![existing.clone()], EngineOptions::default());

    let mut candidate = existing;
    candidate.address = Some("Calle Mayor 1".to_string());
    let result = consolidator.process_batch_at(FIRST_RUN, [candidate]);

    assert_eq!(result.updated.len(), 1);
    assert_eq!(result.updated[0].tier, MatchTier::ExactHash);
    assert_eq!(
        consolidator.records()[0].address.as_deref(),
        Some("Calle Mayor 1")
    );
}

#[test]
fn similar_names_without_shared_data_stay_apart() {
    let a = record(
        "Despacho Martinez Lopez",
        &["911111111"],
        Some("info@martinezlopez.es"),
        Some("https://martinezlopez.es"),
    );
    let b = record(
        "Despacho Martines Lopez",
        &["922222222"],
        Some("contacto@martineslopez.com"),
        Some("https://martineslopez.com"),
    );

    let mut consolidator = Consolidator::default();
    assert!(consolidator.similarity().score(&a.name, &b.name) >= 85.0);

    let result = consolidator.process_batch_at(FIRST_RUN, [a, b]);
    assert_eq!(result.added.len(), 2);
    assert!(result.updated.is_empty());
    assert_eq!(consolidator.len(), 2);
}

#[test]
fn fuzzy_name_with_shared_domain_merges() {
    let a = record("Despacho Alfa", &[], None, Some("https://www.alfa.es"));
    let b = record(
        "Despacho Alfa S.L.",
        &["600111222"],
        None,
        Some("alfa.es/contacto"),
    );

    let mut consolidator = Consolidator::default();
    let result = consolidator.process_batch_at(FIRST_RUN, [a, b]);

    assert_eq!(result.added.len(), 1);
    assert_eq!(result.updated.len(), 1);
    assert_eq!(result.updated[0].tier, MatchTier::NameSimilar);
    assert_eq!(consolidator.records()[0].phones, vec!["600111222".to_string()]);
    assert_indexed(&consolidator);
}

#[test]
fn shared_email_matches_when_names_differ() {
    let a = record("Alfa Consultores", &[], Some("Info@Alfa.es"), None);
    let b = record("Gestoria Integral", &["600111222"], Some("info@alfa.es"), None);

    let mut consolidator = Consolidator::default();
    let result = consolidator.process_batch_at(FIRST_RUN, [a, b]);

    assert_eq!(result.updated.len(), 1);
    assert_eq!(result.updated[0].tier, MatchTier::Email);
}

#[test]
fn shared_phone_with_unrelated_name_is_not_a_match() {
    let a = record("Alfa", &["911234567"], None, None);
    let b = record("Omega Gestoria Integral", &["911234567"], None, None);

    let mut consolidator = Consolidator::default();
    let result = consolidator.process_batch_at(FIRST_RUN, [a, b]);

    assert_eq!(result.added.len(), 2);
    assert_indexed(&consolidator);
}

#[test]
fn fuzzy_tier_is_skipped_above_the_ceiling() {
    let options = EngineOptions {
        fuzzy_scan_limit: 1,
        ..EngineOptions::default()
    };
    let existing = vec![
        record("Despacho Alfa", &[], None, Some("https://alfa.es")),
        record("Omega", &["600000000"], None, None),
    ];
    let mut consolidator = Consolidator::from_records(existing, options);

    let candidate = record("Despacho Alfa S.L.", &[], None, Some("alfa.es"));
    let result = consolidator.process_batch_at(FIRST_RUN, [candidate]);

    assert!(!result.fuzzy_tier_active);
    assert_eq!(result.added.len(), 1);
    assert_eq!(consolidator.len(), 3);
}

#[test]
fn merge_never_nulls_existing_fields() {
    let mut existing = record(
        "Despacho Alfa",
        &["911234567"],
        Some("info@alfa.es"),
        Some("https://alfa.es"),
    );
    existing.city = Some("Madrid".to_string());
    existing.rating = Some(4.2);
    existing.specialties = ["asilo".to_string()].into_iter().collect();
    let mut consolidator =
        Consolidator::from_records(vec![existing.clone()], EngineOptions::default());

    let mut candidate = record("Despacho Alfa", &["911 234 567", "600111222"], None, None);
    candidate.city = Some("Sevilla".to_string());
    candidate.specialties = ["arraigo".to_string()].into_iter().collect();
    consolidator.process_batch_at(FIRST_RUN, [candidate]);

    let merged = &consolidator.records()[0];
    assert_eq!(merged.email, existing.email);
    assert_eq!(merged.website, existing.website);
    assert_eq!(merged.city.as_deref(), Some("Madrid"));
    assert_eq!(merged.rating, Some(4.2));
    assert!(merged.specialties.is_superset(&existing.specialties));
    assert_eq!(merged.phones.len(), 2);
    assert_eq!(merged.phones[0], "911234567");
}

#[test]
fn invalid_records_are_reported_with_reason() {
    let mut consolidator = Consolidator::default();
    let result = consolidator.process_batch_at(
        FIRST_RUN,
        [
            record("", &["911234567"], None, None),
            record("Sin Contacto", &[], None, None),
        ],
    );
    assert_eq!(result.invalid.len(), 2);
    assert_eq!(result.invalid[0].reason.to_string(), "name is required");
    assert!(consolidator.is_empty());
}

#[test]
fn labelled_phone_still_matches_on_phone() {
    let mut consolidator = Consolidator::default();
    let first = consolidator.process_batch_at(
        FIRST_RUN,
        vec![record("Bufete Ruiz", &["Tel/Fax: 912 345 678"], None, None)],
    );
    assert_eq!(first.added.len(), 1);

    let second = consolidator.process_batch_at(
        SECOND_RUN,
        vec![record("Bufete Ruiz", &["912345678"], Some("info@ruiz.es"), None)],
    );
    assert!(second.added.is_empty());
    assert_eq!(second.updated.len(), 1);
    assert_eq!(second.updated[0].tier, MatchTier::Phone);
    assert_eq!(consolidator.len(), 1);
    assert_eq!(consolidator.records()[0].phones.len(), 1);
    assert_indexed(&consolidator);
}

#[test]
fn phone_tier_requires_score_above_threshold() {
    let stored = record("Alfa Consultores", &["911111111"], None, None);
    let incoming = record("Beta Gestores", &["911 111 111"], Some("beta@beta.es"), None);

    let mut at_threshold = with_fixed_score(60.0);
    at_threshold.process_batch_at(FIRST_RUN, vec![stored.clone()]);
    assert!(at_threshold.find_duplicate(&incoming).is_none());
    let result = at_threshold.process_batch_at(SECOND_RUN, vec![incoming.clone()]);
    assert_eq!(result.added.len(), 1);

    let mut above = with_fixed_score(60.5);
    above.process_batch_at(FIRST_RUN, vec![stored]);
    let found = above.find_duplicate(&incoming).expect("phone match");
    assert_eq!(found.tier, MatchTier::Phone);
    assert_eq!(found.position, 0);
}

#[test]
fn fuzzy_tier_accepts_score_at_threshold() {
    let stored = record("Alfa Consultores", &[], None, Some("https://alfa.es"));
    let incoming = record("Alfa Consulting", &[], None, Some("www.alfa.es/contacto"));

    let mut at_threshold = with_fixed_score(85.0);
    at_threshold.process_batch_at(FIRST_RUN, vec![stored.clone()]);
    let found = at_threshold.find_duplicate(&incoming).expect("name match");
    assert_eq!(found.tier, MatchTier::NameSimilar);

    let mut below = with_fixed_score(84.9);
    below.process_batch_at(FIRST_RUN, vec![stored]);
    assert!(below.find_duplicate(&incoming).is_none());
}
