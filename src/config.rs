//! TOML configuration parsing.
//!
//! ```toml
//! [source]
//! kind = "applicants"          # or "sessions"
//! url = "https://api.example.com/v1/applications"
//! token_env = "LENS_API_TOKEN"
//! timeout_secs = 30
//! # path = "./data/applicants.json"   (instead of url)
//!
//! [view]
//! default_sort = "newest"
//! default_date_range = "all"
//! limit = 50
//!
//! [server]
//! bind = "127.0.0.1:7340"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use talent_lens_core::criteria::{DateRange, SortKey};
use talent_lens_core::mapper::Counterpart;
use talent_lens_core::models::RecordKind;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    #[serde(default = "default_kind")]
    pub kind: RecordKind,
    /// Local JSON file holding the raw records.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// HTTP endpoint returning the raw records.
    #[serde(default)]
    pub url: Option<String>,
    /// Environment variable holding a bearer token for `url`.
    #[serde(default)]
    pub token_env: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Whose name session rows are listed under (`mentor` or `mentee`).
    #[serde(default = "default_counterpart")]
    pub counterpart: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: default_kind(),
            path: None,
            url: None,
            token_env: None,
            timeout_secs: default_timeout_secs(),
            counterpart: default_counterpart(),
        }
    }
}

impl SourceConfig {
    pub fn counterpart(&self) -> Counterpart {
        match self.counterpart.as_str() {
            "mentee" => Counterpart::Mentee,
            _ => Counterpart::Mentor,
        }
    }
}

fn default_kind() -> RecordKind {
    RecordKind::Applicants
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_counterpart() -> String {
    "mentor".to_string()
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ViewConfig {
    #[serde(default)]
    pub default_sort: SortKey,
    #[serde(default)]
    pub default_date_range: DateRange,
    /// Maximum rows printed by `lens list`.
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:7340".to_string()
}

impl Config {
    /// Defaults used when no config file exists (e.g. `lens list --input`).
    pub fn minimal() -> Self {
        Self {
            source: SourceConfig::default(),
            view: ViewConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.source.path.is_some() && config.source.url.is_some() {
        anyhow::bail!("source.path and source.url are mutually exclusive");
    }

    if let Some(url) = &config.source.url {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            anyhow::bail!("source.url must start with http:// or https://, got '{}'", url);
        }
    }

    if config.source.timeout_secs == 0 {
        anyhow::bail!("source.timeout_secs must be > 0");
    }

    match config.source.counterpart.as_str() {
        "mentor" | "mentee" => {}
        other => anyhow::bail!(
            "Unknown source.counterpart: '{}'. Must be mentor or mentee.",
            other
        ),
    }

    if config.view.limit == Some(0) {
        anyhow::bail!("view.limit must be >= 1");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml_src: &str) -> Result<Config> {
        let config: Config = toml::from_str(toml_src)?;
        validate(&config)?;
        Ok(config)
    }

    #[test]
    fn empty_file_uses_defaults() {
        let cfg = parse("").unwrap();
        assert_eq!(cfg.source.kind, RecordKind::Applicants);
        assert_eq!(cfg.view.default_sort, SortKey::Newest);
        assert_eq!(cfg.view.default_date_range, DateRange::All);
        assert_eq!(cfg.server.bind, "127.0.0.1:7340");
        assert_eq!(cfg.source.counterpart(), Counterpart::Mentor);
    }

    #[test]
    fn full_file() {
        let cfg = parse(
            r#"
[source]
kind = "sessions"
url = "https://api.example.com/sessions"
token_env = "LENS_TOKEN"
counterpart = "mentee"

[view]
default_sort = "name-asc"
default_date_range = "week"
limit = 20

[server]
bind = "0.0.0.0:9000"
"#,
        )
        .unwrap();
        assert_eq!(cfg.source.kind, RecordKind::Sessions);
        assert_eq!(cfg.source.counterpart(), Counterpart::Mentee);
        assert_eq!(cfg.view.default_sort, SortKey::NameAsc);
        assert_eq!(cfg.view.default_date_range, DateRange::Week);
        assert_eq!(cfg.view.limit, Some(20));
    }

    #[test]
    fn rejects_path_and_url_together() {
        let err = parse(
            r#"
[source]
path = "a.json"
url = "https://x"
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("mutually exclusive"));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(parse("[source]\nurl = \"ftp://x\"").is_err());
        assert!(parse("[source]\ntimeout_secs = 0").is_err());
        assert!(parse("[source]\ncounterpart = \"admin\"").is_err());
        assert!(parse("[view]\nlimit = 0").is_err());
        assert!(parse("[view]\ndefault_sort = \"random\"").is_err());
    }
}
