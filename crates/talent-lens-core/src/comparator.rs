//! Comparator Selector: [`SortKey`] → ordering over [`DisplayRecord`]s.
//!
//! Comparators report `Equal` for records with the same key; callers sort
//! with the stable `slice::sort_by`, so ties keep their pre-sort order.

use std::cmp::Ordering;

use crate::criteria::SortKey;
use crate::models::{DisplayRecord, RecordStatus};
use crate::text::casefold_cmp;

/// Ordering function over two records.
pub type Comparator<S> = fn(&DisplayRecord<S>, &DisplayRecord<S>) -> Ordering;

pub fn comparator<S: RecordStatus>(key: SortKey) -> Comparator<S> {
    match key {
        SortKey::Newest => newest_first::<S>,
        SortKey::Oldest => oldest_first::<S>,
        SortKey::NameAsc => name_asc::<S>,
        SortKey::NameDesc => name_desc::<S>,
    }
}

fn newest_first<S>(a: &DisplayRecord<S>, b: &DisplayRecord<S>) -> Ordering {
    b.created_at.cmp(&a.created_at)
}

fn oldest_first<S>(a: &DisplayRecord<S>, b: &DisplayRecord<S>) -> Ordering {
    a.created_at.cmp(&b.created_at)
}

fn name_asc<S>(a: &DisplayRecord<S>, b: &DisplayRecord<S>) -> Ordering {
    casefold_cmp(&a.name, &b.name)
}

fn name_desc<S>(a: &DisplayRecord<S>, b: &DisplayRecord<S>) -> Ordering {
    casefold_cmp(&b.name, &a.name)
}

/// Sorts a copy of `records` by `key`; the input is left untouched.
pub fn sorted<S: RecordStatus>(records: &[DisplayRecord<S>], key: SortKey) -> Vec<DisplayRecord<S>> {
    let mut out = records.to_vec();
    out.sort_by(comparator(key));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SessionStatus;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn rec(id: &str, name: &str, secs: i64) -> DisplayRecord<SessionStatus> {
        DisplayRecord::new(id, name, SessionStatus::Upcoming, at(secs))
    }

    fn ids(records: &[DisplayRecord<SessionStatus>]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn newest_and_oldest() {
        let input = vec![rec("a", "A", 20), rec("b", "B", 30), rec("c", "C", 10)];
        assert_eq!(ids(&sorted(&input, SortKey::Newest)), vec!["b", "a", "c"]);
        assert_eq!(ids(&sorted(&input, SortKey::Oldest)), vec!["c", "a", "b"]);
    }

    #[test]
    fn names_ignore_case() {
        let input = vec![rec("1", "bob", 0), rec("2", "Alice", 0), rec("3", "carol", 0)];
        assert_eq!(ids(&sorted(&input, SortKey::NameAsc)), vec!["2", "1", "3"]);
        assert_eq!(ids(&sorted(&input, SortKey::NameDesc)), vec!["3", "1", "2"]);
    }

    #[test]
    fn ties_keep_input_order_for_every_key() {
        let input = vec![rec("x", "Same", 5), rec("y", "Same", 5), rec("z", "Same", 5)];
        for key in SortKey::all() {
            assert_eq!(ids(&sorted(&input, *key)), vec!["x", "y", "z"], "{key}");
        }
    }

    #[test]
    fn sorted_does_not_touch_input() {
        let input = vec![rec("a", "B", 1), rec("b", "A", 2)];
        let snapshot = input.clone();
        let _ = sorted(&input, SortKey::NameAsc);
        assert_eq!(input, snapshot);
    }
}
