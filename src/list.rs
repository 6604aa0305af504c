//! `lens list`: fetch, derive, and print one listing.
//!
//! Flags are applied to a [`CriteriaStore`] through its mutation operations,
//! seeded with the `[view]` defaults, and the resulting criteria drive the
//! derivation pipeline. Output is a fixed-width table on a terminal and JSON
//! otherwise, unless `--format` says which.

use anyhow::{bail, Result};
use clap::Args;
use serde::Serialize;
use serde_json::Value;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use talent_lens_core::criteria::{CriteriaStore, DateRange, SortKey};
use talent_lens_core::mapper::{ApplicantMapper, RecordMapper, SessionMapper};
use talent_lens_core::models::{parse_status, DisplayRecord, RecordKind, RecordStatus, StatusBadge};
use talent_lens_core::pipeline::derive;

use crate::config::{Config, ViewConfig};
use crate::source::{source_from_config, ServerFilters};

/// Filter, sort, and output flags for `lens list`.
#[derive(Debug, Clone, Default, Args)]
pub struct ListArgs {
    /// Record kind to list (`applicants` or `sessions`). Defaults to `source.kind`.
    #[arg(long)]
    pub kind: Option<RecordKind>,

    /// Keep records with this status. Repeatable or comma-separated.
    #[arg(long = "status", value_delimiter = ',')]
    pub statuses: Vec<String>,

    /// Keep records listing this skill (any of several). Repeatable or comma-separated.
    #[arg(long = "skill", value_delimiter = ',')]
    pub skills: Vec<String>,

    /// Location to keep (exact match, case-insensitive).
    #[arg(long)]
    pub location: Option<String>,

    /// Creation date bucket: `all`, `today`, `week`, or `month`.
    #[arg(long)]
    pub date_range: Option<DateRange>,

    /// Sort order: `newest`, `oldest`, `name-asc`, or `name-desc`.
    #[arg(long)]
    pub sort: Option<SortKey>,

    /// Free-text search over name and role/topic.
    #[arg(long, short)]
    pub query: Option<String>,

    /// Output format: `table` or `json`.
    #[arg(long)]
    pub format: Option<String>,

    /// Maximum rows to print (at least 1). Defaults to `view.limit`.
    #[arg(long)]
    pub limit: Option<NonZeroUsize>,

    /// Read raw records from this JSON file instead of the configured source.
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Server-side search term forwarded to the API.
    #[arg(long)]
    pub search: Option<String>,

    /// Restrict applicants to one opportunity (server-side).
    #[arg(long)]
    pub opportunity: Option<String>,

    /// Server-side role filter.
    #[arg(long)]
    pub role: Option<String>,
}

impl ListArgs {
    fn server_filters(&self) -> ServerFilters {
        ServerFilters {
            search: self.search.clone(),
            opportunity_id: self.opportunity.clone(),
            role: self.role.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    pub fn parse(value: Option<&str>) -> Result<Self> {
        match value {
            None => Ok(Self::default_for_tty()),
            Some("table") => Ok(Self::Table),
            Some("json") => Ok(Self::Json),
            Some(other) => bail!("Unknown format: {}. Use table or json.", other),
        }
    }

    /// Table when stdout is a terminal, JSON when piped.
    pub fn default_for_tty() -> Self {
        if atty::is(atty::Stream::Stdout) {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// A derived record as emitted by `lens list --format json` and `POST /derive`.
#[derive(Debug, Serialize)]
pub struct RenderedRecord<'a, S: RecordStatus> {
    #[serde(flatten)]
    pub record: &'a DisplayRecord<S>,
    pub badge: StatusBadge,
}

impl<'a, S: RecordStatus> RenderedRecord<'a, S> {
    pub fn new(record: &'a DisplayRecord<S>) -> Self {
        Self {
            record,
            badge: record.badge(),
        }
    }
}

#[derive(Serialize)]
struct ListOutput<'a, S: RecordStatus> {
    total: usize,
    matched: usize,
    items: Vec<RenderedRecord<'a, S>>,
}

/// Builds the criteria store for one run from `[view]` defaults and flags.
///
/// Repeating a status or skill does not toggle it back off.
pub fn build_store<S: RecordStatus>(args: &ListArgs, view: &ViewConfig) -> Result<CriteriaStore<S>> {
    let mut store = CriteriaStore::with_defaults(view.default_sort, view.default_date_range);

    for raw in &args.statuses {
        if raw.trim().is_empty() {
            continue;
        }
        let status = parse_status::<S>(raw)?;
        if !store.criteria().statuses.contains(&status) {
            store.toggle_status(status);
        }
    }

    for skill in &args.skills {
        let wanted = skill.trim();
        if !store.criteria().skills.contains(wanted) {
            store.toggle_skill(wanted);
        }
    }

    if let Some(location) = &args.location {
        store.set_location(location);
    }
    if let Some(range) = args.date_range {
        store.set_date_range(range);
    }
    if let Some(sort) = args.sort {
        store.set_sort(sort);
    }

    Ok(store)
}

pub async fn run_list(config: &Config, args: &ListArgs) -> Result<()> {
    let kind = args.kind.unwrap_or(config.source.kind);
    let format = OutputFormat::parse(args.format.as_deref())?;
    let source = source_from_config(&config.source, args.input.clone())?;

    tracing::info!(source = %source.name(), kind = %kind, "fetching records");
    let raw = source.fetch(&args.server_filters()).await?;

    let output = match kind {
        RecordKind::Applicants => render(&ApplicantMapper, &raw, args, config, format)?,
        RecordKind::Sessions => render(
            &SessionMapper::new(config.source.counterpart()),
            &raw,
            args,
            config,
            format,
        )?,
    };
    print!("{}", output);
    Ok(())
}

fn render<M: RecordMapper>(
    mapper: &M,
    raw: &[Value],
    args: &ListArgs,
    config: &Config,
    format: OutputFormat,
) -> Result<String> {
    let store = build_store::<M::Status>(args, &config.view)?;
    let query = args.query.as_deref().unwrap_or("");
    let items = derive(mapper, raw, store.criteria(), store.sort(), query);

    let limit = args
        .limit
        .map(NonZeroUsize::get)
        .or(config.view.limit)
        .unwrap_or(items.len());
    let shown = &items[..limit.min(items.len())];

    match format {
        OutputFormat::Table => Ok(format_table(shown, items.len())),
        OutputFormat::Json => {
            let out = ListOutput {
                total: raw.len(),
                matched: items.len(),
                items: shown.iter().map(RenderedRecord::new).collect(),
            };
            Ok(serde_json::to_string_pretty(&out)? + "\n")
        }
    }
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let cut: String = s.chars().take(width.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

/// Renders rows as a fixed-width table with a `shown of matched` footer.
pub fn format_table<S: RecordStatus>(rows: &[DisplayRecord<S>], matched: usize) -> String {
    if matched == 0 {
        return "No matching records.\n".to_string();
    }

    let mut out = format!(
        "{:<16} {:<24} {:<22} {:<18} {}\n",
        "ID", "NAME", "STATUS", "LOCATION", "CREATED"
    );
    for r in rows {
        out.push_str(&format!(
            "{:<16} {:<24} {:<22} {:<18} {}\n",
            truncate(&r.id, 16),
            truncate(&r.name, 24),
            r.badge().label,
            truncate(&r.location, 18),
            r.created_at.format("%Y-%m-%d %H:%M"),
        ));
    }
    out.push_str(&format!("\n{} of {} records\n", rows.len(), matched));
    out
}
