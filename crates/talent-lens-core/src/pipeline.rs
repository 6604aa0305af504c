//! Derivation Pipeline: raw records + criteria + sort + query → ordered view.
//!
//! # Steps
//!
//! 1. Map each raw record with a [`RecordMapper`].
//! 2. Keep records whose `name` or `subtitle` contains the query
//!    (case-insensitive; a blank query keeps everything).
//! 3. Keep records passing the composed [`Predicate`](crate::predicate::Predicate).
//! 4. Stable-sort a new vector with the selected comparator.
//!
//! [`derive_at`] is referentially transparent: the same inputs and `now`
//! always give the same list, and the inputs are never modified. An empty
//! input or a fully filtered input yields an empty vector.
//!
//! [`ListView`] binds one view's data, criteria, and query together and
//! memoizes the derived list. It also hands out [`FetchTicket`]s so a
//! response to a superseded fetch can be dropped instead of overwriting
//! fresher data.

use chrono::{DateTime, FixedOffset, Local};
use serde_json::Value;
use std::sync::Arc;

use crate::comparator::comparator;
use crate::criteria::{CriteriaStore, FilterCriteria, SortKey};
use crate::mapper::RecordMapper;
use crate::models::{DisplayRecord, RecordStatus};
use crate::predicate::{build_predicate, DateWindow};
use crate::text::contains_folded;

/// Free-text match on `name` and `subtitle`. `query_lower` must be trimmed
/// and lower-cased; an empty query matches everything.
pub fn matches_query<S>(record: &DisplayRecord<S>, query_lower: &str) -> bool {
    contains_folded(&record.name, query_lower) || contains_folded(&record.subtitle, query_lower)
}

/// Runs the full pipeline as of `now`.
pub fn derive_at<M: RecordMapper>(
    mapper: &M,
    raw: &[Value],
    criteria: &FilterCriteria<M::Status>,
    sort: SortKey,
    query: &str,
    now: DateTime<FixedOffset>,
) -> Vec<DisplayRecord<M::Status>> {
    let mapped = mapper.map_all(raw);
    derive_records(&mapped, criteria, sort, query, now)
}

/// Runs the full pipeline, capturing "now" from the local clock once.
pub fn derive<M: RecordMapper>(
    mapper: &M,
    raw: &[Value],
    criteria: &FilterCriteria<M::Status>,
    sort: SortKey,
    query: &str,
) -> Vec<DisplayRecord<M::Status>> {
    derive_at(mapper, raw, criteria, sort, query, Local::now().fixed_offset())
}

/// Steps 2–4 over records that are already mapped.
pub fn derive_records<S: RecordStatus>(
    records: &[DisplayRecord<S>],
    criteria: &FilterCriteria<S>,
    sort: SortKey,
    query: &str,
    now: DateTime<FixedOffset>,
) -> Vec<DisplayRecord<S>> {
    let query_lower = query.trim().to_lowercase();
    let predicate = build_predicate(criteria, now);

    let mut selected: Vec<&DisplayRecord<S>> = records
        .iter()
        .filter(|r| matches_query(*r, &query_lower))
        .filter(|r| predicate.matches(*r))
        .collect();

    let cmp = comparator::<S>(sort);
    selected.sort_by(|a, b| cmp(*a, *b));

    tracing::debug!(
        total = records.len(),
        matched = selected.len(),
        sort = %sort,
        active_filters = criteria.active_count(),
        query = %query_lower,
        "derived list"
    );

    selected.into_iter().cloned().collect()
}

/// Handle for one fetch started by a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

impl FetchTicket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

struct CacheKey<S> {
    generation: u64,
    criteria: Arc<FilterCriteria<S>>,
    sort: SortKey,
    query: String,
    window: DateWindow,
}

/// One list view: its mapped records, criteria, query, and memoized output.
///
/// Records are mapped once when they arrive; filter and sort changes only
/// re-run steps 2–4. Recomputation happens lazily on the next read.
pub struct ListView<M: RecordMapper> {
    mapper: M,
    records: Vec<DisplayRecord<M::Status>>,
    generation: u64,
    issued: u64,
    store: CriteriaStore<M::Status>,
    query: String,
    cache: Option<(CacheKey<M::Status>, Vec<DisplayRecord<M::Status>>)>,
    recomputations: u64,
}

impl<M: RecordMapper> ListView<M> {
    pub fn new(mapper: M) -> Self {
        Self::with_store(mapper, CriteriaStore::new())
    }

    pub fn with_store(mapper: M, store: CriteriaStore<M::Status>) -> Self {
        Self {
            mapper,
            records: Vec::new(),
            generation: 0,
            issued: 0,
            store,
            query: String::new(),
            cache: None,
            recomputations: 0,
        }
    }

    pub fn store(&self) -> &CriteriaStore<M::Status> {
        &self.store
    }

    /// Mutable access for criteria and sort changes.
    pub fn store_mut(&mut self) -> &mut CriteriaStore<M::Status> {
        &mut self.store
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
    }

    /// Mapped records in arrival order, before filtering.
    pub fn records(&self) -> &[DisplayRecord<M::Status>] {
        &self.records
    }

    /// How many times the list has actually been recomputed.
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }

    /// Marks the start of a fetch. Only the newest ticket's response is kept.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.issued += 1;
        FetchTicket(self.issued)
    }

    /// Installs the response for `ticket` unless a newer fetch has started
    /// since. Returns whether the records were installed.
    pub fn accept(&mut self, ticket: FetchTicket, raw: &[Value]) -> bool {
        if ticket.0 < self.issued {
            tracing::debug!(
                ticket = ticket.0,
                newest = self.issued,
                "discarding stale fetch response"
            );
            return false;
        }
        self.replace_records(raw);
        true
    }

    /// Replaces the data set unconditionally.
    pub fn replace_records(&mut self, raw: &[Value]) {
        self.records = self.mapper.map_all(raw);
        self.generation += 1;
    }

    /// The derived list as of `now`, recomputed only if an input changed.
    pub fn items_at(&mut self, now: DateTime<FixedOffset>) -> &[DisplayRecord<M::Status>] {
        let window = DateWindow::resolve(self.store.criteria().date_range, now);
        let fresh = match &self.cache {
            Some((key, _)) => {
                key.generation == self.generation
                    && Arc::ptr_eq(&key.criteria, self.store.criteria())
                    && key.sort == self.store.sort()
                    && key.query == self.query
                    && key.window == window
            }
            None => false,
        };

        if !fresh {
            let items = derive_records(
                &self.records,
                self.store.criteria(),
                self.store.sort(),
                &self.query,
                now,
            );
            let key = CacheKey {
                generation: self.generation,
                criteria: Arc::clone(self.store.criteria()),
                sort: self.store.sort(),
                query: self.query.clone(),
                window,
            };
            self.cache = Some((key, items));
            self.recomputations += 1;
        }

        match &self.cache {
            Some((_, items)) => items.as_slice(),
            None => &[],
        }
    }

    /// The derived list as of the local clock.
    pub fn items(&mut self) -> &[DisplayRecord<M::Status>] {
        self.items_at(Local::now().fixed_offset())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::DateRange;
    use crate::mapper::{ApplicantMapper, SessionMapper};
    use crate::models::{ApplicantStatus, SessionStatus};
    use serde_json::json;

    fn now() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2026-10-17T12:00:00+00:00").unwrap()
    }

    fn applicants() -> Vec<Value> {
        vec![
            json!({"id": "1", "name": "Zed", "status": "applied", "role": "Designer", "created_at": "2026-10-01T00:00:00Z"}),
            json!({"id": "2", "name": "amy", "status": "hired", "role": "Rust Engineer", "created_at": "2026-10-02T00:00:00Z"}),
            json!({"id": "3", "name": "Bea", "status": "hired", "role": "Frontend", "created_at": "2026-10-03T00:00:00Z"}),
        ]
    }

    fn ids<S>(records: &[DisplayRecord<S>]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn query_matches_name_or_subtitle() {
        let c = FilterCriteria::default();
        let out = derive_at(&ApplicantMapper, &applicants(), &c, SortKey::Oldest, "  RUST ", now());
        assert_eq!(ids(&out), vec!["2"]);
        let out = derive_at(&ApplicantMapper, &applicants(), &c, SortKey::Oldest, "be", now());
        assert_eq!(ids(&out), vec!["3"]);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let out = derive_at(
            &SessionMapper::default(),
            &[],
            &FilterCriteria::<SessionStatus>::default(),
            SortKey::Newest,
            "anything",
            now(),
        );
        assert!(out.is_empty());
    }

    #[test]
    fn view_memoizes_until_an_input_changes() {
        let mut view = ListView::new(ApplicantMapper);
        view.replace_records(&applicants());

        assert_eq!(ids(view.items_at(now())), vec!["3", "2", "1"]);
        assert_eq!(ids(view.items_at(now())), vec!["3", "2", "1"]);
        assert_eq!(view.recomputations(), 1);

        // Re-applying the same date range is a no-op for the store.
        view.store_mut().set_date_range(DateRange::All);
        view.items_at(now());
        assert_eq!(view.recomputations(), 1);

        view.store_mut().toggle_status(ApplicantStatus::Hired);
        view.store_mut().set_sort(SortKey::NameAsc);
        assert_eq!(ids(view.items_at(now())), vec!["2", "3"]);
        assert_eq!(view.recomputations(), 2);

        view.set_query("bea");
        assert_eq!(ids(view.items_at(now())), vec!["3"]);
        assert_eq!(view.recomputations(), 3);
    }

    #[test]
    fn stale_fetch_response_is_discarded() {
        let mut view = ListView::new(ApplicantMapper);
        let first = view.begin_fetch();
        let second = view.begin_fetch();

        let fresh = vec![json!({"id": "new", "name": "Fresh"})];
        assert!(view.accept(second, &fresh));

        let stale = vec![json!({"id": "old", "name": "Stale"})];
        assert!(!view.accept(first, &stale));

        assert_eq!(ids(view.items_at(now())), vec!["new"]);
    }

    #[test]
    fn new_data_invalidates_cache() {
        let mut view = ListView::new(ApplicantMapper);
        view.replace_records(&applicants());
        assert_eq!(view.items_at(now()).len(), 3);

        let ticket = view.begin_fetch();
        view.accept(ticket, &applicants()[..1]);
        assert_eq!(ids(view.items_at(now())), vec!["1"]);
        assert_eq!(view.recomputations(), 2);
    }
}
