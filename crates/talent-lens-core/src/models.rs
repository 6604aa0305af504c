//! Core data models for the list-derivation pipeline.
//!
//! Every page that lists applicants or mentorship sessions works on the same
//! flat [`DisplayRecord`] shape, parameterized over the closed status set of
//! its record kind ([`ApplicantStatus`] or [`SessionStatus`]).

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use crate::error::ParseError;

/// Colour bucket a status badge is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTone {
    Neutral,
    Info,
    Progress,
    Warning,
    Success,
    Danger,
}

/// Label and tone shown for a record's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusBadge {
    pub label: &'static str,
    pub tone: StatusTone,
}

/// The closed status set of one record kind.
///
/// Implementors are small `Copy` enums. The wire form returned by
/// [`as_str`](RecordStatus::as_str) is snake_case and matches what the
/// backend sends.
pub trait RecordStatus:
    Copy + Eq + Ord + Hash + fmt::Debug + Send + Sync + Serialize + DeserializeOwned + 'static
{
    /// Human-readable kind name used in error messages (e.g. `"applicant"`).
    const KIND: &'static str;

    /// Every variant, in display order.
    fn all() -> &'static [Self];

    /// Wire value, e.g. `"in_progress"`.
    fn as_str(&self) -> &'static str;

    /// Display label, e.g. `"In progress"`.
    fn label(&self) -> &'static str;

    fn tone(&self) -> StatusTone;

    /// Status assumed when a raw record carries no recognizable status.
    fn fallback() -> Self;

    /// Lenient parse: case-insensitive, `-` and spaces count as `_`.
    fn parse(value: &str) -> Option<Self> {
        let norm = normalize_token(value);
        Self::all().iter().copied().find(|s| s.as_str() == norm)
    }

    /// Badge for this status, optionally adjusted by an interview sub-status.
    fn badge(&self, _interview: Option<InterviewStatus>) -> StatusBadge {
        StatusBadge {
            label: self.label(),
            tone: self.tone(),
        }
    }
}

/// Strict parse of a status token into `S`, reporting the kind on failure.
pub fn parse_status<S: RecordStatus>(value: &str) -> Result<S, ParseError> {
    S::parse(value).ok_or_else(|| ParseError::UnknownStatus {
        kind: S::KIND,
        value: value.to_string(),
    })
}

fn normalize_token(value: &str) -> String {
    value
        .trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════
// Applicants
// ═══════════════════════════════════════════════════════════════════════

/// Where an application stands in the hiring pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicantStatus {
    Invited,
    Applied,
    Shortlisted,
    Rejected,
    Hired,
}

impl ApplicantStatus {
    /// Terminal statuses are never overridden by interview state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ApplicantStatus::Rejected | ApplicantStatus::Hired)
    }
}

impl RecordStatus for ApplicantStatus {
    const KIND: &'static str = "applicant";

    fn all() -> &'static [Self] {
        &[
            ApplicantStatus::Invited,
            ApplicantStatus::Applied,
            ApplicantStatus::Shortlisted,
            ApplicantStatus::Rejected,
            ApplicantStatus::Hired,
        ]
    }

    fn as_str(&self) -> &'static str {
        match self {
            ApplicantStatus::Invited => "invited",
            ApplicantStatus::Applied => "applied",
            ApplicantStatus::Shortlisted => "shortlisted",
            ApplicantStatus::Rejected => "rejected",
            ApplicantStatus::Hired => "hired",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ApplicantStatus::Invited => "Invited",
            ApplicantStatus::Applied => "Applied",
            ApplicantStatus::Shortlisted => "Shortlisted",
            ApplicantStatus::Rejected => "Rejected",
            ApplicantStatus::Hired => "Hired",
        }
    }

    fn tone(&self) -> StatusTone {
        match self {
            ApplicantStatus::Invited => StatusTone::Info,
            ApplicantStatus::Applied => StatusTone::Neutral,
            ApplicantStatus::Shortlisted => StatusTone::Progress,
            ApplicantStatus::Rejected => StatusTone::Danger,
            ApplicantStatus::Hired => StatusTone::Success,
        }
    }

    fn fallback() -> Self {
        ApplicantStatus::Applied
    }

    fn badge(&self, interview: Option<InterviewStatus>) -> StatusBadge {
        display_status(*self, interview)
    }
}

/// Interview sub-status attached to an application. Display only; it never
/// takes part in filtering or sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewStatus {
    Scheduled,
    Rescheduled,
    Cancelled,
}

impl InterviewStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match normalize_token(value).as_str() {
            "scheduled" => Some(InterviewStatus::Scheduled),
            "rescheduled" => Some(InterviewStatus::Rescheduled),
            "cancelled" | "canceled" => Some(InterviewStatus::Cancelled),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewStatus::Scheduled => "scheduled",
            InterviewStatus::Rescheduled => "rescheduled",
            InterviewStatus::Cancelled => "cancelled",
        }
    }
}

/// Badge for an application, taking its interview sub-status into account.
///
/// This is the only place the interview override is decided: while the
/// application is open (`invited`, `applied`, `shortlisted`) an interview
/// sub-status replaces the label and tone; `hired` and `rejected` always
/// show as themselves.
pub fn display_status(status: ApplicantStatus, interview: Option<InterviewStatus>) -> StatusBadge {
    match interview {
        Some(sub) if !status.is_terminal() => match sub {
            InterviewStatus::Scheduled => StatusBadge {
                label: "Interview scheduled",
                tone: StatusTone::Info,
            },
            InterviewStatus::Rescheduled => StatusBadge {
                label: "Interview rescheduled",
                tone: StatusTone::Warning,
            },
            InterviewStatus::Cancelled => StatusBadge {
                label: "Interview cancelled",
                tone: StatusTone::Danger,
            },
        },
        _ => StatusBadge {
            label: status.label(),
            tone: status.tone(),
        },
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Mentorship sessions
// ═══════════════════════════════════════════════════════════════════════

/// Lifecycle of a mentorship session, as reported by the server.
///
/// Transitions are owned by the backend; this type only names the states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Pending,
    Upcoming,
    InProgress,
    PendingCompletion,
    Disputed,
    Completed,
    Cancelled,
}

impl RecordStatus for SessionStatus {
    const KIND: &'static str = "session";

    fn all() -> &'static [Self] {
        &[
            SessionStatus::Pending,
            SessionStatus::Upcoming,
            SessionStatus::InProgress,
            SessionStatus::PendingCompletion,
            SessionStatus::Disputed,
            SessionStatus::Completed,
            SessionStatus::Cancelled,
        ]
    }

    fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Pending => "pending",
            SessionStatus::Upcoming => "upcoming",
            SessionStatus::InProgress => "in_progress",
            SessionStatus::PendingCompletion => "pending_completion",
            SessionStatus::Disputed => "disputed",
            SessionStatus::Completed => "completed",
            SessionStatus::Cancelled => "cancelled",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            SessionStatus::Pending => "Pending",
            SessionStatus::Upcoming => "Upcoming",
            SessionStatus::InProgress => "In progress",
            SessionStatus::PendingCompletion => "Awaiting completion",
            SessionStatus::Disputed => "Disputed",
            SessionStatus::Completed => "Completed",
            SessionStatus::Cancelled => "Cancelled",
        }
    }

    fn tone(&self) -> StatusTone {
        match self {
            SessionStatus::Pending => StatusTone::Warning,
            SessionStatus::Upcoming => StatusTone::Info,
            SessionStatus::InProgress => StatusTone::Progress,
            SessionStatus::PendingCompletion => StatusTone::Warning,
            SessionStatus::Disputed => StatusTone::Danger,
            SessionStatus::Completed => StatusTone::Success,
            SessionStatus::Cancelled => StatusTone::Neutral,
        }
    }

    fn fallback() -> Self {
        SessionStatus::Pending
    }

    fn parse(value: &str) -> Option<Self> {
        match normalize_token(value).as_str() {
            "canceled" => Some(SessionStatus::Cancelled),
            norm => Self::all().iter().copied().find(|s| s.as_str() == norm),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Records
// ═══════════════════════════════════════════════════════════════════════

/// Which listing a collection of raw records belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Applicants,
    Sessions,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Applicants => "applicants",
            RecordKind::Sessions => "sessions",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "applicants" | "applicant" | "applications" => Ok(RecordKind::Applicants),
            "sessions" | "session" => Ok(RecordKind::Sessions),
            _ => Err(ParseError::UnknownRecordKind(s.to_string())),
        }
    }
}

/// Normalized, flat record the pipeline filters and sorts.
///
/// Produced only by a [`RecordMapper`](crate::mapper::RecordMapper). Optional
/// source fields are already defaulted: absent text is `""`, absent skills
/// are an empty list, and `created_at` is always a parsed instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayRecord<S> {
    pub id: String,
    pub name: String,
    pub status: S,
    pub location: String,
    pub skills: Vec<String>,
    pub created_at: DateTime<Utc>,
    /// Secondary searchable text: role for applicants, topic for sessions.
    pub subtitle: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interview: Option<InterviewStatus>,
    /// Display-only fields (opportunity title, email, mentor, ...).
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub details: BTreeMap<String, String>,
}

impl<S: RecordStatus> DisplayRecord<S> {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        status: S,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status,
            location: String::new(),
            skills: Vec::new(),
            created_at,
            subtitle: String::new(),
            interview: None,
            details: BTreeMap::new(),
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_skills<I, T>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.skills = skills.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = subtitle.into();
        self
    }

    pub fn with_interview(mut self, interview: Option<InterviewStatus>) -> Self {
        self.interview = interview;
        self
    }

    /// Adds a display-only field. Empty values are not stored.
    pub fn with_detail(mut self, key: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.is_empty() {
            self.details.insert(key.to_string(), value);
        }
        self
    }

    pub fn badge(&self) -> StatusBadge {
        self.status.badge(self.interview)
    }
}
