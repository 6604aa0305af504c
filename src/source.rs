//! Raw-data sources.
//!
//! A [`RecordSource`] returns the backend's raw JSON records for one listing.
//! The server may already have narrowed them with [`ServerFilters`]; the
//! derivation pipeline applies its finer-grained filters on top.
//!
//! | Source | Config | Server-side filters |
//! |--------|--------|---------------------|
//! | [`FileSource`] | `source.path` | ignored |
//! | [`HttpSource`] | `source.url` | sent as query parameters |

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::SourceConfig;

/// Coarse filters the backend understands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerFilters {
    pub search: Option<String>,
    pub opportunity_id: Option<String>,
    pub role: Option<String>,
}

impl ServerFilters {
    /// Non-empty filters as `(name, value)` query pairs.
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        [
            ("search", self.search.as_deref()),
            ("opportunity_id", self.opportunity_id.as_deref()),
            ("role", self.role.as_deref()),
        ]
        .into_iter()
        .filter_map(|(k, v)| v.map(str::trim).filter(|v| !v.is_empty()).map(|v| (k, v)))
        .collect()
    }
}

/// Supplier of raw records.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Short label for logs (`"file:<path>"`, `"http:<url>"`).
    fn name(&self) -> String;

    async fn fetch(&self, filters: &ServerFilters) -> Result<Vec<Value>>;
}

/// Reads records from a JSON file on disk.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RecordSource for FileSource {
    fn name(&self) -> String {
        format!("file:{}", self.path.display())
    }

    async fn fetch(&self, _filters: &ServerFilters) -> Result<Vec<Value>> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read records file: {}", self.path.display()))?;
        let json: Value = serde_json::from_str(&content)
            .with_context(|| format!("Records file is not valid JSON: {}", self.path.display()))?;
        extract_records(json)
    }
}

/// Fetches records from the marketplace REST API.
pub struct HttpSource {
    url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, token: Option<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            url: url.into(),
            token,
            client,
        })
    }
}

#[async_trait]
impl RecordSource for HttpSource {
    fn name(&self) -> String {
        format!("http:{}", self.url)
    }

    async fn fetch(&self, filters: &ServerFilters) -> Result<Vec<Value>> {
        let mut req = self.client.get(&self.url).query(&filters.query_pairs());
        if let Some(token) = &self.token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        let response = req
            .send()
            .await
            .with_context(|| format!("Request to {} failed", self.url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let excerpt: String = body.chars().take(200).collect();
            bail!("API error {} from {}: {}", status, self.url, excerpt);
        }

        let json: Value = response
            .json()
            .await
            .with_context(|| format!("Response from {} is not valid JSON", self.url))?;
        extract_records(json)
    }
}

/// Builds the source described by `[source]`, or a file source for an
/// explicit `--input` path.
pub fn source_from_config(
    config: &SourceConfig,
    input: Option<PathBuf>,
) -> Result<Box<dyn RecordSource>> {
    if let Some(path) = input.or_else(|| config.path.clone()) {
        return Ok(Box::new(FileSource::new(path)));
    }

    match &config.url {
        Some(url) => {
            let token = match &config.token_env {
                Some(var) => Some(
                    std::env::var(var)
                        .with_context(|| format!("source.token_env '{}' is not set", var))?,
                ),
                None => None,
            };
            let source = HttpSource::new(url, token, Duration::from_secs(config.timeout_secs))?;
            Ok(Box::new(source))
        }
        None => bail!("No record source: pass --input or set source.path / source.url in config"),
    }
}

const ENVELOPE_KEYS: &[&str] = &[
    "data",
    "results",
    "items",
    "applicants",
    "applications",
    "sessions",
];

/// Unwraps the record array from a response body.
///
/// Accepts a bare array, or an object holding the array under one of the
/// usual envelope keys, one level deep (`{"data": {"items": [...]}}`).
pub fn extract_records(json: Value) -> Result<Vec<Value>> {
    match json {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => {
            for key in ENVELOPE_KEYS {
                match map.remove(*key) {
                    Some(Value::Array(items)) => return Ok(items),
                    Some(Value::Object(inner)) => {
                        if let Some(items) = ENVELOPE_KEYS
                            .iter()
                            .find_map(|k| inner.get(*k).and_then(Value::as_array))
                        {
                            return Ok(items.clone());
                        }
                    }
                    _ => {}
                }
            }
            bail!(
                "Response object has no record array under any of: {}",
                ENVELOPE_KEYS.join(", ")
            )
        }
        other => bail!("Expected a JSON array of records, got {}", json_type(&other)),
    }
}

fn json_type(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extract_bare_array() {
        let items = extract_records(json!([{"id": 1}, {"id": 2}])).unwrap();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn extract_envelopes() {
        assert_eq!(extract_records(json!({"data": [{"id": 1}]})).unwrap().len(), 1);
        assert_eq!(
            extract_records(json!({"sessions": [{"id": 1}, {"id": 2}], "total": 2}))
                .unwrap()
                .len(),
            2
        );
        assert_eq!(
            extract_records(json!({"data": {"items": [{"id": 1}], "page": 1}}))
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn extract_rejects_other_shapes() {
        assert!(extract_records(json!({"message": "ok"})).is_err());
        let err = extract_records(json!("nope")).unwrap_err();
        assert!(err.to_string().contains("a string"));
    }

    #[test]
    fn query_pairs_skip_blank_filters() {
        let filters = ServerFilters {
            search: Some("  ".into()),
            opportunity_id: Some("42".into()),
            role: None,
        };
        assert_eq!(filters.query_pairs(), vec![("opportunity_id", "42")]);
    }

    #[tokio::test]
    async fn file_source_reads_envelope() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), r#"{"applicants": [{"id": "a"}]}"#).unwrap();

        let source = FileSource::new(tmp.path());
        let items = source.fetch(&ServerFilters::default()).await.unwrap();
        assert_eq!(items, vec![json!({"id": "a"})]);
        assert!(source.name().starts_with("file:"));
    }

    #[tokio::test]
    async fn file_source_reports_invalid_json() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "not json").unwrap();
        let err = FileSource::new(tmp.path())
            .fetch(&ServerFilters::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not valid JSON"));
    }

    #[test]
    fn source_from_config_requires_something() {
        let cfg = SourceConfig::default();
        assert!(source_from_config(&cfg, None).is_err());
        let src = source_from_config(&cfg, Some(PathBuf::from("x.json"))).unwrap();
        assert_eq!(src.name(), "file:x.json");
    }
}
