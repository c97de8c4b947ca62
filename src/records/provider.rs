use anyhow::Result;
use async_trait::async_trait;

use super::models::RawMatchRecord;

/// Trait that every head-to-head record source must implement.
#[async_trait]
pub trait MatchSource: Send + Sync {
    /// Return every head-to-head row the source knows about, oldest or
    /// newest first; the engine reorders by date itself.
    async fn fetch_matches(&self) -> Result<Vec<RawMatchRecord>>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}
