//! Predicate Composer: [`FilterCriteria`] → one inclusion test.
//!
//! Clauses run in a fixed order and stop at the first failure:
//!
//! 1. status: `statuses` empty, or the record's status is in it
//! 2. location: `location` empty, or case-insensitive exact match
//! 3. skills: `skills` empty, or any record skill matches any wanted skill
//! 4. date: the record's `created_at` falls inside the [`DateWindow`]
//!
//! All clauses are ANDed. "Now" is fixed when the predicate is built, so a
//! single derivation evaluates every record against the same instant.

use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use std::collections::BTreeSet;

use crate::criteria::{DateRange, FilterCriteria};
use crate::models::{DisplayRecord, RecordStatus};
use crate::text::casefold_eq;

/// Half-open `[from, until)` interval on `created_at`; `None` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub from: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}

impl DateWindow {
    pub const UNBOUNDED: DateWindow = DateWindow {
        from: None,
        until: None,
    };

    /// Computes the bucket bounds relative to `now`.
    ///
    /// `today` uses the calendar day of `now` in `now`'s own UTC offset.
    pub fn resolve(range: DateRange, now: DateTime<FixedOffset>) -> Self {
        match range {
            DateRange::All => Self::UNBOUNDED,
            DateRange::Today => {
                let offset = *now.offset();
                let start = now
                    .date_naive()
                    .and_hms_opt(0, 0, 0)
                    .and_then(|midnight| offset.from_local_datetime(&midnight).single())
                    .map(|dt| dt.with_timezone(&Utc));
                DateWindow {
                    from: start,
                    until: start.map(|s| s + Duration::days(1)),
                }
            }
            DateRange::Week => Self::since(now - Duration::days(7)),
            DateRange::Month => Self::since(now - Duration::days(30)),
        }
    }

    fn since(from: DateTime<FixedOffset>) -> Self {
        DateWindow {
            from: Some(from.with_timezone(&Utc)),
            until: None,
        }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.from.map_or(true, |from| at >= from) && self.until.map_or(true, |until| at < until)
    }
}

/// Combined inclusion test built from one [`FilterCriteria`] snapshot.
#[derive(Debug, Clone)]
pub struct Predicate<S> {
    statuses: BTreeSet<S>,
    location: String,
    skills: Vec<String>,
    window: DateWindow,
}

/// Builds the composed predicate for `criteria`, evaluated as of `now`.
pub fn build_predicate<S: RecordStatus>(
    criteria: &FilterCriteria<S>,
    now: DateTime<FixedOffset>,
) -> Predicate<S> {
    Predicate {
        statuses: criteria.statuses.clone(),
        location: criteria.location.clone(),
        skills: criteria.skills.iter().cloned().collect(),
        window: DateWindow::resolve(criteria.date_range, now),
    }
}

impl<S: RecordStatus> Predicate<S> {
    pub fn matches(&self, record: &DisplayRecord<S>) -> bool {
        self.status_clause(record)
            && self.location_clause(record)
            && self.skills_clause(record)
            && self.window.contains(record.created_at)
    }

    /// The predicate as a plain closure, for `Iterator::filter` and friends.
    pub fn into_fn(self) -> impl Fn(&DisplayRecord<S>) -> bool {
        move |record| self.matches(record)
    }

    pub fn window(&self) -> DateWindow {
        self.window
    }

    fn status_clause(&self, record: &DisplayRecord<S>) -> bool {
        self.statuses.is_empty() || self.statuses.contains(&record.status)
    }

    fn location_clause(&self, record: &DisplayRecord<S>) -> bool {
        self.location.is_empty() || casefold_eq(&self.location, &record.location)
    }

    fn skills_clause(&self, record: &DisplayRecord<S>) -> bool {
        self.skills.is_empty()
            || record
                .skills
                .iter()
                .any(|have| self.skills.iter().any(|want| casefold_eq(have, want)))
    }
}
