//! Parse errors for the string forms of criteria and status values.
//!
//! The derivation pipeline itself is total and never fails. These errors only
//! surface at the edges, where user input (CLI flags, HTTP bodies, config
//! values) is turned into typed criteria.

use thiserror::Error;

/// Failure to parse a user-supplied token into a typed value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Not one of `newest`, `oldest`, `name-asc`, `name-desc`.
    #[error("unknown sort key: '{0}' (expected newest, oldest, name-asc, or name-desc)")]
    UnknownSortKey(String),

    /// Not one of `all`, `today`, `week`, `month`.
    #[error("unknown date range: '{0}' (expected all, today, week, or month)")]
    UnknownDateRange(String),

    /// Not a member of the closed status set for this record kind.
    #[error("unknown {kind} status: '{value}'")]
    UnknownStatus { kind: &'static str, value: String },

    /// Not one of `applicants`, `sessions`.
    #[error("unknown record kind: '{0}' (expected applicants or sessions)")]
    UnknownRecordKind(String),
}
