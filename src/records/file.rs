use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;
use tracing::debug;

use super::models::{records_from_values, RawMatchRecord};
use super::provider::MatchSource;
use super::table::ScrapedTable;

/// Accepted on-disk shapes: a plain array of records, or the scraped table.
#[derive(Deserialize)]
#[serde(untagged)]
enum Payload {
    Records(Vec<Value>),
    Table(ScrapedTable),
}

/// Decode a JSON payload holding either a record array or a `{headers, rows}` table.
pub fn parse_payload(bytes: &[u8]) -> Result<Vec<RawMatchRecord>> {
    let payload: Payload =
        serde_json::from_slice(bytes).context("Expected a record array or a {headers, rows} table")?;
    Ok(match payload {
        Payload::Records(values) => records_from_values(values),
        Payload::Table(table) => table.into_records(),
    })
}

/// Match source backed by a JSON export of a previous scrape.
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileSource { path: path.into() }
    }
}

#[async_trait]
impl MatchSource for JsonFileSource {
    fn name(&self) -> &str {
        "JsonFile"
    }

    async fn fetch_matches(&self) -> Result<Vec<RawMatchRecord>> {
        debug!("Reading match records from {}", self.path.display());
        let bytes = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        parse_payload(&bytes)
    }
}
