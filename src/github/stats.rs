use octocrab::Octocrab;
use serde::Serialize;
use tokio_retry::{strategy::ExponentialBackoff, Retry};

use crate::github::client::API_TIMEOUT;
use crate::github::error::{classify, SearchError};
use crate::github::query::stats_queries;
use crate::github::types::{PrStats, StatsSnapshot};
use crate::github::wire::SearchResults;

#[derive(Serialize)]
struct CountParams<'a> {
    q: &'a str,
    per_page: u8,
}

/// Run one count-only search query and return its `total_count`.
///
/// A single result page is requested since only the count metadata is
/// consumed.
async fn count_prs(client: &Octocrab, query: &str) -> Result<u64, SearchError> {
    // Retry strategy: exponential backoff with 3 attempts
    let retry_strategy = ExponentialBackoff::from_millis(100)
        .max_delay(std::time::Duration::from_secs(5))
        .take(3);

    let params = CountParams {
        q: query,
        per_page: 1,
    };

    let results: SearchResults = Retry::spawn(retry_strategy, || async {
        let send = client.get("/search/issues", Some(&params));
        match tokio::time::timeout(API_TIMEOUT, send).await {
            Ok(result) => result.map_err(|e| classify(&e)),
            Err(_) => Err(SearchError::Api(format!(
                "search timed out after {}s",
                API_TIMEOUT.as_secs()
            ))),
        }
    })
    .await?;

    Ok(results.total_count)
}

/// Aggregate open / closed-without-merging / merged counts for a user,
/// optionally scoped to one `owner/repo`.
///
/// Never returns an error: a failed sub-query contributes a zero count and
/// its reason is recorded in the snapshot. `total` is always recomputed
/// from whatever counts were obtained.
pub async fn fetch_pr_stats(
    client: &Octocrab,
    username: &str,
    repo: Option<&str>,
) -> StatsSnapshot {
    let [open_query, closed_query, merged_query] = stats_queries(username, repo);
    let mut failures = Vec::new();

    let mut count = |label: &'static str, result: Result<u64, SearchError>| match result {
        Ok(n) => n,
        Err(e) => {
            eprintln!("Warning: {} PR count failed: {}", label, e);
            failures.push(e);
            0
        }
    };

    // The three queries are independent; sequential issue keeps the
    // request footprint gentle on the search rate limit.
    let open = count("open", count_prs(client, &open_query).await);
    let closed = count("closed", count_prs(client, &closed_query).await);
    let merged = count("merged", count_prs(client, &merged_query).await);

    StatsSnapshot {
        stats: PrStats::from_counts(open, closed, merged),
        failures,
    }
}
