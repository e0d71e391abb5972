//! Lean serde projections of the GitHub payloads the aggregator reads.
//!
//! Only the consumed fields are modeled, and every one of them is lenient:
//! a search item with a deleted author (`"user": null`) or a missing
//! self-link must not poison the rest of the page.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Body of a `/search/issues` response
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResults {
    #[serde(default)]
    pub(crate) total_count: u64,
    #[serde(default)]
    pub(crate) items: Vec<SearchItem>,
}

/// One issue-shaped search record
#[derive(Debug, Deserialize)]
pub(crate) struct SearchItem {
    pub(crate) id: u64,
    pub(crate) number: u64,
    pub(crate) title: String,
    pub(crate) html_url: String,
    pub(crate) state: String,
    #[serde(default)]
    pub(crate) user: Option<SearchAuthor>,
    pub(crate) created_at: DateTime<Utc>,
    #[serde(default)]
    pub(crate) pull_request: Option<PullLink>,
}

/// Author block; absent entirely for deleted accounts
#[derive(Debug, Deserialize)]
pub(crate) struct SearchAuthor {
    #[serde(default)]
    pub(crate) login: String,
    #[serde(default)]
    pub(crate) avatar_url: String,
}

/// The item's self-referential link to the pull-request-detail endpoint
#[derive(Debug, Deserialize)]
pub(crate) struct PullLink {
    #[serde(default)]
    pub(crate) url: Option<String>,
}

/// The slice of a pull-request-detail response that settles merge status
#[derive(Debug, Deserialize)]
pub(crate) struct PullDetail {
    #[serde(default)]
    pub(crate) merged: Option<bool>,
    #[serde(default)]
    pub(crate) merged_at: Option<DateTime<Utc>>,
}

impl PullDetail {
    /// `merged` when the endpoint reports it, else infer from `merged_at`
    pub(crate) fn is_merged(&self) -> bool {
        self.merged.unwrap_or_else(|| self.merged_at.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_with_null_user_deserializes() {
        let item: SearchItem = serde_json::from_str(
            r#"{
                "id": 1,
                "number": 7,
                "title": "t",
                "html_url": "https://github.com/octo/widgets/pull/7",
                "state": "open",
                "user": null,
                "created_at": "2025-01-01T00:00:00Z"
            }"#,
        )
        .unwrap();
        assert!(item.user.is_none());
        assert!(item.pull_request.is_none());
    }

    #[test]
    fn test_pull_link_url_may_be_absent() {
        let item: SearchItem = serde_json::from_str(
            r#"{
                "id": 1,
                "number": 7,
                "title": "t",
                "html_url": "https://github.com/octo/widgets/pull/7",
                "state": "closed",
                "user": {"login": "octocat", "avatar_url": "https://a.test/1"},
                "created_at": "2025-01-01T00:00:00Z",
                "pull_request": {}
            }"#,
        )
        .unwrap();
        assert!(item.pull_request.unwrap().url.is_none());
    }

    #[test]
    fn test_empty_search_results_default() {
        let results: SearchResults = serde_json::from_str(r#"{"total_count": 3}"#).unwrap();
        assert_eq!(results.total_count, 3);
        assert!(results.items.is_empty());
    }

    #[test]
    fn test_merge_status_falls_back_to_timestamp() {
        let detail: PullDetail =
            serde_json::from_str(r#"{"merged_at": "2025-01-03T00:00:00Z"}"#).unwrap();
        assert!(detail.is_merged());

        let detail: PullDetail = serde_json::from_str(r#"{"merged": false}"#).unwrap();
        assert!(!detail.is_merged());

        let detail: PullDetail = serde_json::from_str(r#"{}"#).unwrap();
        assert!(!detail.is_merged());
    }
}
