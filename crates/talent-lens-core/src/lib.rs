//! # Talent Lens Core
//!
//! Pure list-derivation logic shared by every Talent Lens frontend: record
//! mapping, filter criteria, predicate composition, sorting, and the
//! derivation pipeline that ties them together.
//!
//! This crate contains no tokio, HTTP client, filesystem I/O, or other
//! native-only dependencies, so the same code can run behind a CLI, an HTTP
//! handler, or a `wasm32-unknown-unknown` UI binding.
//!
//! ```text
//! raw JSON ──▶ mapper ──▶ query ──▶ predicate ──▶ comparator ──▶ view
//!                          ▲          ▲               ▲
//!                          └──── CriteriaStore ───────┘
//! ```
//!
//! ```rust
//! use chrono::DateTime;
//! use serde_json::json;
//! use talent_lens_core::criteria::{CriteriaStore, SortKey};
//! use talent_lens_core::mapper::ApplicantMapper;
//! use talent_lens_core::models::ApplicantStatus;
//! use talent_lens_core::pipeline::derive_at;
//!
//! let raw = vec![
//!     json!({ "id": 1, "name": "Bea", "status": "hired" }),
//!     json!({ "id": 2, "name": "Al", "status": "applied" }),
//!     json!({ "id": 3, "name": "Ann", "status": "hired" }),
//! ];
//! let mut store = CriteriaStore::new();
//! store.toggle_status(ApplicantStatus::Hired);
//! store.set_sort(SortKey::NameAsc);
//!
//! let now = DateTime::parse_from_rfc3339("2026-10-17T09:00:00Z").unwrap();
//! let view = derive_at(&ApplicantMapper, &raw, store.criteria(), store.sort(), "", now);
//! let names: Vec<_> = view.iter().map(|r| r.name.as_str()).collect();
//! assert_eq!(names, ["Ann", "Bea"]);
//! ```

pub mod comparator;
pub mod criteria;
pub mod error;
pub mod mapper;
pub mod models;
pub mod pipeline;
pub mod predicate;
pub mod text;
