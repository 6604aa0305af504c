//! Filter criteria, sort key, and the Criteria Store that owns them.
//!
//! A list view keeps exactly one [`CriteriaStore`]. User actions (toggling a
//! status chip, typing a location, choosing a sort option) go through its
//! mutation methods. Each effective mutation swaps in a fresh
//! `Arc<FilterCriteria>`, so a consumer can detect change with
//! [`Arc::ptr_eq`] instead of a deep comparison.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::ParseError;
use crate::models::RecordStatus;

/// Recency bucket applied to `created_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateRange {
    #[default]
    All,
    /// Same calendar day as "now".
    Today,
    /// `created_at >= now - 7 days`.
    Week,
    /// `created_at >= now - 30 days`.
    Month,
}

impl DateRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateRange::All => "all",
            DateRange::Today => "today",
            DateRange::Week => "week",
            DateRange::Month => "month",
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DateRange {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "" => Ok(DateRange::All),
            "today" => Ok(DateRange::Today),
            "week" => Ok(DateRange::Week),
            "month" => Ok(DateRange::Month),
            _ => Err(ParseError::UnknownDateRange(s.to_string())),
        }
    }
}

/// The single active ordering of a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    Newest,
    Oldest,
    NameAsc,
    NameDesc,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Newest => "newest",
            SortKey::Oldest => "oldest",
            SortKey::NameAsc => "name-asc",
            SortKey::NameDesc => "name-desc",
        }
    }

    pub fn all() -> &'static [SortKey] {
        &[
            SortKey::Newest,
            SortKey::Oldest,
            SortKey::NameAsc,
            SortKey::NameDesc,
        ]
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "newest" => Ok(SortKey::Newest),
            "oldest" => Ok(SortKey::Oldest),
            "name-asc" => Ok(SortKey::NameAsc),
            "name-desc" => Ok(SortKey::NameDesc),
            _ => Err(ParseError::UnknownSortKey(s.to_string())),
        }
    }
}

/// Independent, user-controlled filter values.
///
/// Every field's empty value means "don't care", never "match nothing".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    rename_all = "camelCase",
    default,
    bound(serialize = "S: RecordStatus", deserialize = "S: RecordStatus")
)]
pub struct FilterCriteria<S> {
    /// Empty means any status.
    pub statuses: BTreeSet<S>,
    /// Exact match, case-insensitive. Empty means any location.
    pub location: String,
    /// At least one must match, case-insensitive. Empty means any skills.
    pub skills: BTreeSet<String>,
    pub date_range: DateRange,
}

impl<S> Default for FilterCriteria<S> {
    fn default() -> Self {
        Self {
            statuses: BTreeSet::new(),
            location: String::new(),
            skills: BTreeSet::new(),
            date_range: DateRange::All,
        }
    }
}

impl<S: RecordStatus> FilterCriteria<S> {
    /// True when no field restricts anything.
    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }

    /// Number of fields holding a non-default value (the filter badge count).
    pub fn active_count(&self) -> usize {
        [
            !self.statuses.is_empty(),
            !self.location.is_empty(),
            !self.skills.is_empty(),
            self.date_range != DateRange::All,
        ]
        .iter()
        .filter(|active| **active)
        .count()
    }
}

/// Owner of one view's [`FilterCriteria`] and [`SortKey`].
///
/// Mutations are synchronous. A mutation that leaves the value unchanged
/// keeps the existing `Arc` and revision.
#[derive(Debug, Clone)]
pub struct CriteriaStore<S> {
    criteria: Arc<FilterCriteria<S>>,
    sort: SortKey,
    revision: u64,
}

impl<S: RecordStatus> Default for CriteriaStore<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: RecordStatus> CriteriaStore<S> {
    pub fn new() -> Self {
        Self {
            criteria: Arc::new(FilterCriteria::default()),
            sort: SortKey::default(),
            revision: 0,
        }
    }

    /// Store seeded with a view's configured defaults.
    pub fn with_defaults(sort: SortKey, date_range: DateRange) -> Self {
        Self {
            criteria: Arc::new(FilterCriteria {
                date_range,
                ..FilterCriteria::default()
            }),
            sort,
            revision: 0,
        }
    }

    pub fn criteria(&self) -> &Arc<FilterCriteria<S>> {
        &self.criteria
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }

    /// Bumped once per effective change to criteria or sort.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn replace(&mut self, next: FilterCriteria<S>) {
        if next != *self.criteria {
            self.criteria = Arc::new(next);
            self.revision += 1;
        }
    }

    fn edit(&mut self, f: impl FnOnce(&mut FilterCriteria<S>)) {
        let mut next = FilterCriteria::clone(&self.criteria);
        f(&mut next);
        self.replace(next);
    }

    /// Adds the status if absent, removes it if present.
    pub fn toggle_status(&mut self, status: S) {
        self.edit(|c| {
            if !c.statuses.remove(&status) {
                c.statuses.insert(status);
            }
        });
    }

    /// Replaces the location filter; an empty string clears it.
    pub fn set_location(&mut self, value: &str) {
        let value = value.trim().to_string();
        self.edit(|c| c.location = value);
    }

    /// Adds the skill if absent, removes it if present. Stored as typed;
    /// matching against records is case-insensitive.
    pub fn toggle_skill(&mut self, skill: &str) {
        let skill = skill.trim();
        if skill.is_empty() {
            return;
        }
        self.edit(|c| {
            if !c.skills.remove(skill) {
                c.skills.insert(skill.to_string());
            }
        });
    }

    pub fn set_date_range(&mut self, bucket: DateRange) {
        self.edit(|c| c.date_range = bucket);
    }

    /// Resets every filter field to its empty value. The sort key is kept.
    pub fn clear(&mut self) {
        self.replace(FilterCriteria::default());
    }

    /// Commits a draft edited elsewhere (e.g. in a filter modal).
    pub fn apply(&mut self, criteria: FilterCriteria<S>) {
        self.replace(criteria);
    }

    pub fn set_sort(&mut self, key: SortKey) {
        if key != self.sort {
            self.sort = key;
            self.revision += 1;
        }
    }
}
