//! Behavioural properties of the derivation pipeline, exercised end to end
//! from raw JSON through `derive_at`.

use chrono::{DateTime, Duration, FixedOffset, Utc};
use serde_json::{json, Value};
use talent_lens_core::criteria::{CriteriaStore, DateRange, FilterCriteria, SortKey};
use talent_lens_core::mapper::{ApplicantMapper, RecordMapper, SessionMapper};
use talent_lens_core::models::{ApplicantStatus, SessionStatus};
use talent_lens_core::pipeline::{derive, derive_at};

fn now() -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339("2026-10-17T18:00:00+00:00").unwrap()
}

fn iso(at: DateTime<FixedOffset>) -> String {
    at.with_timezone(&Utc).to_rfc3339()
}

fn applicant(id: &str, name: &str, status: &str, created: DateTime<FixedOffset>) -> Value {
    json!({
        "id": id,
        "user": { "name": name, "location": "Remote" },
        "status": status,
        "skills": ["Rust"],
        "created_at": iso(created),
    })
}

fn ids<S>(records: &[talent_lens_core::models::DisplayRecord<S>]) -> Vec<String> {
    records.iter().map(|r| r.id.clone()).collect()
}

/// A mixed bag of applicants with some shared names and timestamps.
fn roster() -> Vec<Value> {
    let t = now();
    vec![
        applicant("a1", "Nia", "applied", t - Duration::hours(1)),
        applicant("a2", "omar", "hired", t - Duration::days(3)),
        applicant("a3", "Lee", "rejected", t - Duration::days(3)),
        applicant("a4", "Nia", "shortlisted", t - Duration::days(40)),
        applicant("a5", "Kofi", "hired", t - Duration::days(12)),
        applicant("a6", "lee", "invited", t - Duration::days(3)),
    ]
}

#[test]
fn derive_is_idempotent() {
    let raw = roster();
    let mut store = CriteriaStore::new();
    store.toggle_status(ApplicantStatus::Hired);
    store.toggle_status(ApplicantStatus::Rejected);
    store.set_sort(SortKey::NameDesc);

    let first = derive_at(&ApplicantMapper, &raw, store.criteria(), store.sort(), "", now());
    let second = derive_at(&ApplicantMapper, &raw, store.criteria(), store.sort(), "", now());
    assert_eq!(first, second);
}

#[test]
fn derive_does_not_mutate_its_inputs() {
    let raw = roster();
    let raw_before = raw.clone();
    let criteria = FilterCriteria::<ApplicantStatus> {
        location: "remote".into(),
        date_range: DateRange::Month,
        ..Default::default()
    };
    let criteria_before = criteria.clone();

    let _ = derive(&ApplicantMapper, &raw, &criteria, SortKey::Oldest, "ni");
    assert_eq!(raw, raw_before);
    assert_eq!(criteria, criteria_before);
}

#[test]
fn empty_criteria_keep_every_mapped_record() {
    let raw = roster();
    let mapped = ApplicantMapper.map_all(&raw);

    // Order after sorting differs; membership must not.
    let out = derive_at(
        &ApplicantMapper,
        &raw,
        &FilterCriteria::default(),
        SortKey::Newest,
        "",
        now(),
    );
    assert_eq!(out.len(), mapped.len());
    let mut out_ids = ids(&out);
    let mut mapped_ids = ids(&mapped);
    out_ids.sort();
    mapped_ids.sort();
    assert_eq!(out_ids, mapped_ids);
}

#[test]
fn empty_criteria_keep_input_order_when_keys_tie() {
    let t = now();
    let raw: Vec<Value> = ["q", "w", "e", "r"]
        .iter()
        .map(|id| applicant(id, "Same", "applied", t))
        .collect();
    let out = derive_at(
        &ApplicantMapper,
        &raw,
        &FilterCriteria::default(),
        SortKey::Newest,
        "",
        now(),
    );
    assert_eq!(ids(&out), vec!["q", "w", "e", "r"]);
}

#[test]
fn sort_is_stable_for_every_key() {
    let raw = roster();
    for key in SortKey::all() {
        let out = derive_at(&ApplicantMapper, &raw, &FilterCriteria::default(), *key, "", now());
        let pos = |id: &str| out.iter().position(|r| r.id == id).unwrap();
        match key {
            // a2, a3, a6 share a timestamp and appear in that input order.
            SortKey::Newest | SortKey::Oldest => {
                assert!(pos("a2") < pos("a3"), "{key}");
                assert!(pos("a3") < pos("a6"), "{key}");
            }
            // Both "Nia" records tie; a1 precedes a4 in the input.
            SortKey::NameAsc | SortKey::NameDesc => {
                assert!(pos("a1") < pos("a4"), "{key}");
            }
        }
    }
}

#[test]
fn status_filter_is_exact() {
    let raw = roster();
    let criteria = FilterCriteria::<ApplicantStatus> {
        statuses: [ApplicantStatus::Hired].into_iter().collect(),
        ..Default::default()
    };
    let out = derive_at(&ApplicantMapper, &raw, &criteria, SortKey::Newest, "", now());
    assert!(out.iter().all(|r| r.status == ApplicantStatus::Hired));

    let hired_in_input = ApplicantMapper
        .map_all(&raw)
        .into_iter()
        .filter(|r| r.status == ApplicantStatus::Hired)
        .count();
    assert_eq!(out.len(), hired_in_input);
}

#[test]
fn skills_filter_uses_or_semantics() {
    let t = now();
    let raw = vec![
        json!({ "id": "1", "name": "A", "skills": ["react"], "created_at": iso(t) }),
        json!({ "id": "2", "name": "B", "skills": ["FIGMA", "Sketch"], "created_at": iso(t) }),
        json!({ "id": "3", "name": "C", "skills": ["Vue"], "created_at": iso(t) }),
        json!({ "id": "4", "name": "D", "created_at": iso(t) }),
    ];
    let mut store = CriteriaStore::<ApplicantStatus>::new();
    store.toggle_skill("React");
    store.toggle_skill("Figma");

    let out = derive_at(&ApplicantMapper, &raw, store.criteria(), SortKey::NameAsc, "", now());
    assert_eq!(ids(&out), vec!["1", "2"]);
}

#[test]
fn today_bucket_keeps_only_same_day_records() {
    let t = now();
    let raw = vec![
        json!({ "id": "now", "name": "Now", "created_at": iso(t) }),
        json!({ "id": "25h", "name": "Yesterday", "created_at": iso(t - Duration::hours(25)) }),
        json!({ "id": "2d", "name": "Older", "created_at": iso(t - Duration::days(2)) }),
    ];
    let criteria = FilterCriteria::<ApplicantStatus> {
        date_range: DateRange::Today,
        ..Default::default()
    };
    let out = derive_at(&ApplicantMapper, &raw, &criteria, SortKey::Newest, "", now());
    assert_eq!(ids(&out), vec!["now"]);
}

#[test]
fn combined_filter_then_name_sort() {
    let t = now();
    let raw = vec![
        applicant("1", "Uma", "applied", t - Duration::days(1)),
        applicant("2", "Yara", "hired", t - Duration::days(2)),
        applicant("3", "Dev", "hired", t - Duration::days(3)),
        applicant("4", "Ari", "rejected", t - Duration::days(4)),
        applicant("5", "Bo", "shortlisted", t - Duration::days(5)),
    ];
    let mut store = CriteriaStore::new();
    store.toggle_status(ApplicantStatus::Hired);
    store.set_sort(SortKey::NameAsc);

    let out = derive_at(&ApplicantMapper, &raw, store.criteria(), store.sort(), "", now());
    let names: Vec<&str> = out.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Dev", "Yara"]);
}

#[test]
fn unmatched_location_yields_empty_result() {
    let raw = roster();
    let mut store = CriteriaStore::<ApplicantStatus>::new();
    store.set_location("Atlantis");
    let out = derive_at(&ApplicantMapper, &raw, store.criteria(), store.sort(), "", now());
    assert!(out.is_empty());
}

#[test]
fn sessions_filter_by_status_and_topic_query() {
    let t = now();
    let raw = vec![
        json!({ "id": "s1", "mentor": { "name": "Ife" }, "topic": "Portfolio review", "status": "upcoming", "created_at": iso(t) }),
        json!({ "id": "s2", "mentor": { "name": "Jon" }, "topic": "Mock interview", "status": "completed", "created_at": iso(t) }),
        json!({ "id": "s3", "mentor": { "name": "Kai" }, "topic": "Portfolio deep dive", "status": "in_progress", "created_at": iso(t) }),
    ];
    let mut store = CriteriaStore::new();
    store.toggle_status(SessionStatus::Upcoming);
    store.toggle_status(SessionStatus::InProgress);

    let out = derive_at(
        &SessionMapper::default(),
        &raw,
        store.criteria(),
        SortKey::NameDesc,
        "portfolio",
        now(),
    );
    assert_eq!(ids(&out), vec!["s3", "s1"]);
}
