//! scheduler/policy.rs
//! "Only fetch if N seconds have passed since the last fetch" policy.
//!
//! The cursor lives in the timestamp side table under the policy's name and
//! the last result in the cache side table under the same name, so a skipped
//! crawl can still answer with what the previous crawl returned.

use std::time::Duration;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;
use tracing::{debug, warn};

use crate::constants::TIMESTAMP_FORMAT;
use crate::store::StateStore;
use crate::types::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlDecision {
    /// No cursor yet: record one and report nothing for this cycle.
    FirstRun,
    /// Too soon after the last crawl.
    Skip { elapsed: Duration },
    /// Crawl the window starting at `since`.
    Due { since: DateTime<Utc> },
}

#[derive(Debug, Clone)]
pub struct CrawlPolicy {
    name: String,
    min_interval: Duration,
}

impl CrawlPolicy {
    pub fn new(name: impl Into<String>, min_interval: Duration) -> Self {
        Self {
            name: name.into(),
            min_interval,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Last crawl time. An unparsable cursor counts as no cursor.
    pub fn last_crawl(&self, store: &StateStore) -> Option<DateTime<Utc>> {
        let raw = store.time(&self.name)?;
        match NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT) {
            Ok(ts) => Some(ts.and_utc()),
            Err(e) => {
                warn!(cursor = %self.name, raw, error = %e, "unparsable crawl cursor, treating as first run");
                None
            }
        }
    }

    pub fn decide(&self, store: &StateStore, now: DateTime<Utc>) -> CrawlDecision {
        let Some(since) = self.last_crawl(store) else {
            return CrawlDecision::FirstRun;
        };
        // A cursor in the future (clock skew) reads as zero elapsed.
        let elapsed = (now - since).to_std().unwrap_or(Duration::ZERO);
        if elapsed < self.min_interval {
            debug!(cursor = %self.name, elapsed_secs = elapsed.as_secs(), "skipping crawl");
            CrawlDecision::Skip { elapsed }
        } else {
            CrawlDecision::Due { since }
        }
    }

    pub fn mark_crawled(&self, store: &mut StateStore, now: DateTime<Utc>) -> Result<()> {
        store.update_time(&self.name, now.format(TIMESTAMP_FORMAT).to_string())
    }

    pub fn cached_result(&self, store: &StateStore, default: Value) -> Value {
        store.cached(&self.name, default)
    }

    pub fn store_result(&self, store: &mut StateStore, value: Value) -> Result<()> {
        store.set_cached(&self.name, value)
    }
}
