//! Record Mapper: raw API JSON → [`DisplayRecord`].
//!
//! The backend returns applicants and sessions in several shapes: flat
//! objects, objects with nested `user` / `talent.profile` / `mentor`
//! sub-objects, camelCase or snake_case keys, skills as strings or as
//! `{ "name": ... }` objects. Mappers read each field from an ordered list of
//! candidate paths and take the first usable value.
//!
//! Mapping is pure and total: no field is ever missing from the output.
//!
//! | Field | Absent / unusable input becomes |
//! |-------|---------------------------------|
//! | text fields | `""` |
//! | `skills` | `[]` |
//! | `status` | [`RecordStatus::fallback`] |
//! | `created_at` | Unix epoch |
//! | `id` | `anon-<sha256 prefix of the raw JSON>` |

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::models::{
    ApplicantStatus, DisplayRecord, InterviewStatus, RecordStatus, SessionStatus,
};

/// Converts one raw backend record into a [`DisplayRecord`].
pub trait RecordMapper {
    type Status: RecordStatus;

    fn map(&self, raw: &Value) -> DisplayRecord<Self::Status>;

    /// Maps every record, preserving input order.
    fn map_all(&self, raw: &[Value]) -> Vec<DisplayRecord<Self::Status>> {
        raw.iter().map(|r| self.map(r)).collect()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Applicants
// ═══════════════════════════════════════════════════════════════════════

const APPLICANT_ID: &[&str] = &["id", "application_id", "applicationId", "_id"];
const APPLICANT_NAME: &[&str] = &[
    "name",
    "full_name",
    "fullName",
    "user.name",
    "user.full_name",
    "user.fullName",
    "talent.name",
    "talent.user.name",
    "applicant.name",
];
const NAME_PREFIXES: &[&str] = &["", "user.", "talent.user.", "talent.", "applicant."];
const APPLICANT_STATUS: &[&str] = &[
    "status",
    "application_status",
    "applicationStatus",
    "application.status",
];
const APPLICANT_LOCATION: &[&str] = &[
    "location",
    "user.location",
    "profile.location",
    "user.profile.location",
    "talent.location",
    "talent.profile.location",
    "applicant.location",
];
const APPLICANT_SKILLS: &[&str] = &[
    "skills",
    "profile.skills",
    "user.skills",
    "user.profile.skills",
    "talent.skills",
    "talent.profile.skills",
    "applicant.skills",
];
const APPLICANT_ROLE: &[&str] = &[
    "role",
    "job_title",
    "jobTitle",
    "profile.role",
    "user.role",
    "talent.role",
    "talent.profile.role",
    "headline",
    "profile.headline",
];
const APPLICANT_CREATED: &[&str] = &[
    "created_at",
    "createdAt",
    "applied_at",
    "appliedAt",
    "date_applied",
    "application.created_at",
];
const APPLICANT_INTERVIEW: &[&str] = &[
    "interview.status",
    "interview_status",
    "interviewStatus",
    "latest_interview.status",
];
const APPLICANT_OPPORTUNITY: &[&str] = &[
    "opportunity.title",
    "opportunity_title",
    "opportunityTitle",
    "job.title",
];
const APPLICANT_EMAIL: &[&str] = &["email", "user.email", "talent.user.email", "applicant.email"];

/// Maps recruiter-side application records.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApplicantMapper;

impl RecordMapper for ApplicantMapper {
    type Status = ApplicantStatus;

    fn map(&self, raw: &Value) -> DisplayRecord<ApplicantStatus> {
        let name = match text_at(raw, APPLICANT_NAME) {
            n if !n.is_empty() => n,
            _ => composed_name(raw),
        };
        let interview = text_opt(raw, APPLICANT_INTERVIEW).and_then(|s| InterviewStatus::parse(&s));

        DisplayRecord::new(
            record_id(raw, APPLICANT_ID),
            name,
            status_at(raw, APPLICANT_STATUS),
            timestamp_at(raw, APPLICANT_CREATED),
        )
        .with_location(text_at(raw, APPLICANT_LOCATION))
        .with_skills(skills_at(raw, APPLICANT_SKILLS))
        .with_subtitle(text_at(raw, APPLICANT_ROLE))
        .with_interview(interview)
        .with_detail("opportunity", text_at(raw, APPLICANT_OPPORTUNITY))
        .with_detail("email", text_at(raw, APPLICANT_EMAIL))
    }
}

/// `first_name` + `last_name` under any of the usual prefixes.
fn composed_name(raw: &Value) -> String {
    for prefix in NAME_PREFIXES {
        let first = text_at(
            raw,
            &[
                format!("{prefix}first_name").as_str(),
                format!("{prefix}firstName").as_str(),
            ],
        );
        let last = text_at(
            raw,
            &[
                format!("{prefix}last_name").as_str(),
                format!("{prefix}lastName").as_str(),
            ],
        );
        let joined = format!("{first} {last}");
        if !joined.trim().is_empty() {
            return joined.trim().to_string();
        }
    }
    String::new()
}

// ═══════════════════════════════════════════════════════════════════════
// Sessions
// ═══════════════════════════════════════════════════════════════════════

/// Whose name a session row is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Counterpart {
    /// Talent-side view: sessions are listed by mentor.
    #[default]
    Mentor,
    /// Mentor-side view: sessions are listed by mentee.
    Mentee,
}

const SESSION_ID: &[&str] = &["id", "session_id", "sessionId", "_id"];
const SESSION_STATUS: &[&str] = &["status", "session_status", "sessionStatus"];
const SESSION_TOPIC: &[&str] = &["topic", "title", "session_type", "sessionType", "agenda"];
const SESSION_CREATED: &[&str] = &[
    "created_at",
    "createdAt",
    "booked_at",
    "bookedAt",
    "scheduled_at",
    "scheduledAt",
];
const SESSION_SCHEDULED: &[&str] = &["scheduled_at", "scheduledAt", "start_time", "startTime", "date"];
const SESSION_LOCATION: &[&str] = &["location", "meeting_type", "meetingType", "mode"];
const MENTOR_NAME: &[&str] = &[
    "mentor.name",
    "mentor.full_name",
    "mentor.user.name",
    "mentor_name",
    "mentorName",
];
const MENTEE_NAME: &[&str] = &[
    "mentee.name",
    "mentee.full_name",
    "mentee.user.name",
    "mentee_name",
    "menteeName",
    "talent.name",
    "talent.user.name",
];
const SESSION_SKILLS: &[&str] = &[
    "skills",
    "tags",
    "mentor.skills",
    "mentor.expertise",
    "mentor.profile.skills",
    "expertise",
];

/// Maps mentorship session records.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionMapper {
    pub counterpart: Counterpart,
}

impl SessionMapper {
    pub fn new(counterpart: Counterpart) -> Self {
        Self { counterpart }
    }
}

impl RecordMapper for SessionMapper {
    type Status = SessionStatus;

    fn map(&self, raw: &Value) -> DisplayRecord<SessionStatus> {
        let (primary, other, other_key) = match self.counterpart {
            Counterpart::Mentor => (MENTOR_NAME, MENTEE_NAME, "mentee"),
            Counterpart::Mentee => (MENTEE_NAME, MENTOR_NAME, "mentor"),
        };
        let name = match text_at(raw, primary) {
            n if !n.is_empty() => n,
            _ => text_at(raw, &["name"]),
        };

        DisplayRecord::new(
            record_id(raw, SESSION_ID),
            name,
            status_at(raw, SESSION_STATUS),
            timestamp_at(raw, SESSION_CREATED),
        )
        .with_location(text_at(raw, SESSION_LOCATION))
        .with_skills(skills_at(raw, SESSION_SKILLS))
        .with_subtitle(text_at(raw, SESSION_TOPIC))
        .with_detail(other_key, text_at(raw, other))
        .with_detail("scheduledAt", text_at(raw, SESSION_SCHEDULED))
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Field access
// ═══════════════════════════════════════════════════════════════════════

/// Follows a dotted path (`"talent.profile.location"`) through nested objects.
pub fn lookup<'a>(raw: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(raw, |node, key| node.as_object().and_then(|m| m.get(key)))
}

fn scalar_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => {
            let t = s.trim();
            (!t.is_empty()).then(|| t.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn text_opt(raw: &Value, paths: &[&str]) -> Option<String> {
    paths
        .iter()
        .filter_map(|p| lookup(raw, p))
        .find_map(scalar_text)
}

/// First non-empty string or number at any of `paths`, or `""`.
pub fn text_at(raw: &Value, paths: &[&str]) -> String {
    text_opt(raw, paths).unwrap_or_default()
}

fn skill_name(v: &Value) -> Option<String> {
    match v {
        Value::Object(m) => ["name", "label", "title", "skill"]
            .iter()
            .filter_map(|k| m.get(*k))
            .find_map(scalar_text),
        other => scalar_text(other),
    }
}

/// Skills from the first path holding a non-empty array, or a comma-separated
/// string. Order is preserved; blank entries are dropped.
pub fn skills_at(raw: &Value, paths: &[&str]) -> Vec<String> {
    for path in paths {
        let skills: Vec<String> = match lookup(raw, path) {
            Some(Value::Array(items)) => items.iter().filter_map(skill_name).collect(),
            Some(Value::String(s)) => s
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            _ => continue,
        };
        if !skills.is_empty() {
            return skills;
        }
    }
    Vec::new()
}

fn status_at<S: RecordStatus>(raw: &Value, paths: &[&str]) -> S {
    match text_opt(raw, paths) {
        Some(text) => S::parse(&text).unwrap_or_else(|| {
            tracing::debug!(kind = S::KIND, status = %text, "unrecognized status, using fallback");
            S::fallback()
        }),
        None => S::fallback(),
    }
}

/// Parses a JSON timestamp: RFC 3339, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DD`,
/// or integer epoch seconds / milliseconds.
pub fn parse_timestamp(v: &Value) -> Option<DateTime<Utc>> {
    match v {
        Value::String(s) => parse_timestamp_str(s.trim()),
        Value::Number(n) => {
            let raw = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
            // Anything past year 5138 in seconds is taken as milliseconds.
            if raw.unsigned_abs() >= 100_000_000_000 {
                DateTime::from_timestamp_millis(raw)
            } else {
                DateTime::from_timestamp(raw, 0)
            }
        }
        _ => None,
    }
}

fn parse_timestamp_str(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn timestamp_at(raw: &Value, paths: &[&str]) -> DateTime<Utc> {
    paths
        .iter()
        .filter_map(|p| lookup(raw, p))
        .find_map(parse_timestamp)
        .unwrap_or_default()
}

/// The record's own id, or a deterministic content hash when it has none.
fn record_id(raw: &Value, paths: &[&str]) -> String {
    if let Some(id) = text_opt(raw, paths) {
        return id;
    }
    let mut hasher = Sha256::new();
    hasher.update(raw.to_string().as_bytes());
    let digest = hex::encode(hasher.finalize());
    format!("anon-{}", &digest[..16])
}
