//! `lens statuses`: the status catalogue of each record kind.

use anyhow::Result;
use serde::Serialize;

use talent_lens_core::models::{
    display_status, ApplicantStatus, InterviewStatus, RecordKind, RecordStatus, SessionStatus,
    StatusTone,
};

/// One selectable status with its badge.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatusEntry {
    pub value: &'static str,
    pub label: &'static str,
    pub tone: StatusTone,
}

fn entries<S: RecordStatus>() -> Vec<StatusEntry> {
    S::all()
        .iter()
        .map(|s| StatusEntry {
            value: s.as_str(),
            label: s.label(),
            tone: s.tone(),
        })
        .collect()
}

/// Every status of `kind`, in display order.
pub fn catalogue(kind: RecordKind) -> Vec<StatusEntry> {
    match kind {
        RecordKind::Applicants => entries::<ApplicantStatus>(),
        RecordKind::Sessions => entries::<SessionStatus>(),
    }
}

/// Interview badges shown in place of a non-terminal applicant status.
pub fn interview_badges() -> Vec<StatusEntry> {
    [
        InterviewStatus::Scheduled,
        InterviewStatus::Rescheduled,
        InterviewStatus::Cancelled,
    ]
    .into_iter()
    .map(|i| {
        let badge = display_status(ApplicantStatus::Shortlisted, Some(i));
        StatusEntry {
            value: i.as_str(),
            label: badge.label,
            tone: badge.tone,
        }
    })
    .collect()
}

/// Status catalogue of one kind as emitted by `lens statuses --json` and
/// `GET /statuses/{kind}`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatusCatalogue {
    pub kind: RecordKind,
    pub statuses: Vec<StatusEntry>,
    /// Empty for sessions.
    pub interview_overrides: Vec<StatusEntry>,
}

impl StatusCatalogue {
    pub fn for_kind(kind: RecordKind) -> Self {
        let interview_overrides = match kind {
            RecordKind::Applicants => interview_badges(),
            RecordKind::Sessions => Vec::new(),
        };
        Self {
            kind,
            statuses: catalogue(kind),
            interview_overrides,
        }
    }
}

pub fn run_statuses(kind: RecordKind, json: bool) -> Result<()> {
    let cat = StatusCatalogue::for_kind(kind);

    if json {
        println!("{}", serde_json::to_string_pretty(&cat)?);
        return Ok(());
    }

    println!("{:<20} {:<22} TONE", "STATUS", "LABEL");
    for e in &cat.statuses {
        println!("{:<20} {:<22} {}", e.value, e.label, tone_name(e.tone));
    }

    if !cat.interview_overrides.is_empty() {
        println!();
        println!("Interview overrides (non-terminal statuses only):");
        for e in &cat.interview_overrides {
            println!("  {:<18} {:<22} {}", e.value, e.label, tone_name(e.tone));
        }
    }
    Ok(())
}

fn tone_name(tone: StatusTone) -> &'static str {
    match tone {
        StatusTone::Neutral => "neutral",
        StatusTone::Info => "info",
        StatusTone::Progress => "progress",
        StatusTone::Warning => "warning",
        StatusTone::Success => "success",
        StatusTone::Danger => "danger",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applicant_catalogue_in_display_order() {
        let values: Vec<_> = catalogue(RecordKind::Applicants)
            .iter()
            .map(|e| e.value)
            .collect();
        assert_eq!(
            values,
            vec!["invited", "applied", "shortlisted", "rejected", "hired"]
        );
    }

    #[test]
    fn session_catalogue_labels() {
        let list = catalogue(RecordKind::Sessions);
        assert_eq!(list.len(), 7);
        let disputed = list.iter().find(|e| e.value == "disputed").unwrap();
        assert_eq!(disputed.tone, StatusTone::Danger);
    }

    #[test]
    fn catalogue_json_carries_interview_overrides() {
        let v = serde_json::to_value(StatusCatalogue::for_kind(RecordKind::Applicants)).unwrap();
        assert_eq!(v["kind"], "applicants");
        assert_eq!(v["statuses"].as_array().unwrap().len(), 5);
        assert_eq!(v["interviewOverrides"][1]["value"], "rescheduled");
        assert_eq!(v["interviewOverrides"][1]["tone"], "warning");

        let v = serde_json::to_value(StatusCatalogue::for_kind(RecordKind::Sessions)).unwrap();
        assert!(v["interviewOverrides"].as_array().unwrap().is_empty());
    }

    #[test]
    fn interview_badges_cover_every_sub_status() {
        let labels: Vec<_> = interview_badges().iter().map(|e| e.label).collect();
        assert_eq!(
            labels,
            vec!["Interview scheduled", "Interview rescheduled", "Interview cancelled"]
        );
    }
}
