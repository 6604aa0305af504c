//! # Talent Lens
//!
//! Filter, sort, and search applicant and mentorship-session listings pulled
//! from a talent marketplace API.
//!
//! The list logic itself lives in [`talent_lens_core`]; this crate adds the
//! native surfaces around it: configuration, raw-record sources, the `lens`
//! CLI commands, and an HTTP binding.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌──────────────────┐   ┌──────────┐
//! │ RecordSource│──▶│ talent-lens-core │──▶│   CLI    │
//! │ file / HTTP │   │ map·filter·sort  │   │  (lens)  │
//! └─────────────┘   └────────┬─────────┘   └──────────┘
//!                            │
//!                            ▼
//!                       ┌──────────┐
//!                       │   HTTP   │
//!                       │ /derive  │
//!                       └──────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`source`] | File and HTTP record sources |
//! | [`list`] | `lens list` |
//! | [`statuses`] | `lens statuses` |
//! | [`server`] | HTTP server |
//! | [`logging`] | Tracing subscriber setup |

pub mod config;
pub mod list;
pub mod logging;
pub mod server;
pub mod source;
pub mod statuses;
