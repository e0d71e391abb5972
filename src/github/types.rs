use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::github::error::SearchError;

/// Issue-level state of a pull request. `Closed` conflates merged and
/// closed-without-merging; see `PullRequest::merged` for the distinction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrState {
    Open,
    Closed,
}

/// PR author. Defaults to empty strings when the provider has no author
/// data for the item (deleted accounts).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub login: String,
    pub avatar_url: String,
}

/// Normalized projection of a search-API issue record. Request-scoped and
/// read-only; recomputed on every query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequest {
    pub id: u64,
    /// Repository-local sequence number, not globally unique
    pub number: u64,
    pub title: String,
    /// Canonical web URL for the pull request
    pub url: String,
    pub state: PrState,
    /// True only if the state is closed AND the follow-up detail lookup
    /// confirmed a merge
    pub merged: bool,
    pub created_at: DateTime<Utc>,
    pub author: Author,
}

/// Aggregate pull-request counts by disposition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrStats {
    pub open: u64,
    /// Closed without merging
    pub closed: u64,
    pub merged: u64,
    /// Always `open + closed + merged`, computed, never fetched
    pub total: u64,
}

impl PrStats {
    pub fn from_counts(open: u64, closed: u64, merged: u64) -> Self {
        Self {
            open,
            closed,
            merged,
            total: open + closed + merged,
        }
    }
}

/// Result of a stats aggregation. Sub-queries that failed contributed a
/// zero count; their errors are recorded here instead of being thrown.
#[derive(Debug, Clone)]
pub struct StatsSnapshot {
    pub stats: PrStats,
    pub failures: Vec<SearchError>,
}

impl StatsSnapshot {
    /// True when every sub-query succeeded
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Result of a listing. A failed primary search yields an empty list with
/// the error attached; per-item merge-check failures degrade silently.
#[derive(Debug, Clone)]
pub struct ListSnapshot {
    pub items: Vec<PullRequest>,
    pub error: Option<SearchError>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_is_sum_of_counts() {
        let stats = PrStats::from_counts(5, 3, 2);
        assert_eq!(stats.total, 10);
        assert_eq!(stats.total, stats.open + stats.closed + stats.merged);
    }

    #[test]
    fn test_total_with_zeroed_counts() {
        let stats = PrStats::from_counts(0, 0, 0);
        assert_eq!(stats.total, 0);

        let stats = PrStats::from_counts(7, 0, 0);
        assert_eq!(stats.total, 7);
    }

    #[test]
    fn test_snapshot_completeness() {
        let snapshot = StatsSnapshot {
            stats: PrStats::default(),
            failures: vec![],
        };
        assert!(snapshot.is_complete());

        let snapshot = StatsSnapshot {
            stats: PrStats::default(),
            failures: vec![SearchError::Api("boom".to_string())],
        };
        assert!(!snapshot.is_complete());
    }
}
