use futures::stream::{self, StreamExt};
use octocrab::Octocrab;
use serde::Serialize;
use tokio_retry::{strategy::ExponentialBackoff, Retry};
use url::Url;

use crate::github::client::API_TIMEOUT;
use crate::github::error::{classify, SearchError};
use crate::github::query::{list_query, StateFilter};
use crate::github::types::{Author, ListSnapshot, PrState, PullRequest};
use crate::github::wire::{PullDetail, SearchItem, SearchResults};

/// One page is enough; the search API caps pages at 100 items.
const PAGE_SIZE: u8 = 100;

/// Bound on in-flight merge-status lookups. Keeps the fan-out polite to
/// the API rate limit while hiding most of the per-item latency.
const MAX_CONCURRENT_MERGE_CHECKS: usize = 10;

#[derive(Serialize)]
struct ListParams<'a> {
    q: &'a str,
    sort: &'static str,
    order: &'static str,
    per_page: u8,
}

/// owner/repo/number triple addressing the pull-request-detail endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
struct PullRef {
    owner: String,
    repo: String,
    number: u64,
}

/// Parse an API self-link of the form
/// `https://api.github.com/repos/{owner}/{repo}/pulls/{number}`.
fn parse_pull_ref(url: &Url) -> Option<PullRef> {
    let segments: Vec<&str> = url.path().split('/').filter(|s| !s.is_empty()).collect();
    match segments.as_slice() {
        ["repos", owner, repo, "pulls", number] => Some(PullRef {
            owner: (*owner).to_string(),
            repo: (*repo).to_string(),
            number: number.parse().ok()?,
        }),
        _ => None,
    }
}

/// Run the primary search query, newest activity first.
async fn search_pull_requests(
    client: &Octocrab,
    query: &str,
) -> Result<Vec<SearchItem>, SearchError> {
    let retry_strategy = ExponentialBackoff::from_millis(100)
        .max_delay(std::time::Duration::from_secs(5))
        .take(3);

    let params = ListParams {
        q: query,
        sort: "updated",
        order: "desc",
        per_page: PAGE_SIZE,
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

    Ok(results.items)
}

/// Ask the pull-request-detail endpoint whether the PR was actually merged.
/// The search API's `closed` state conflates merged and closed-unmerged.
async fn check_merged(client: &Octocrab, pull: &PullRef) -> Result<bool, SearchError> {
    let route = format!(
        "/repos/{}/{}/pulls/{}",
        pull.owner, pull.repo, pull.number
    );
    let get = client.get::<PullDetail, _, ()>(route, None);
    match tokio::time::timeout(API_TIMEOUT, get).await {
        Ok(result) => result
            .map(|detail| detail.is_merged())
            .map_err(|e| classify(&e)),
        Err(_) => Err(SearchError::Api(format!(
            "merge check timed out after {}s",
            API_TIMEOUT.as_secs()
        ))),
    }
}

/// Normalize one search item, resolving merge status for closed PRs.
///
/// Returns None when the item's self-link is missing or unparseable; a
/// failed merge check keeps the item with `merged = false`.
async fn resolve_item(client: &Octocrab, item: SearchItem) -> Option<PullRequest> {
    let closed = item.state == "closed";

    let merged = if closed {
        let link = item.pull_request.as_ref()?.url.as_deref()?;
        let pull = parse_pull_ref(&Url::parse(link).ok()?)?;
        match check_merged(client, &pull).await {
            Ok(merged) => merged,
            Err(e) => {
                eprintln!("Warning: merge check failed for PR #{}: {}", item.number, e);
                false
            }
        }
    } else {
        // An open PR cannot be merged; skip the lookup entirely
        false
    };

    // Deleted accounts come through with no author block; normalize to
    // empty strings rather than dropping the item
    let author = item
        .user
        .map(|u| Author {
            login: u.login,
            avatar_url: u.avatar_url,
        })
        .unwrap_or_default();

    Some(PullRequest {
        id: item.id,
        number: item.number,
        title: item.title,
        url: item.html_url,
        state: if closed { PrState::Closed } else { PrState::Open },
        merged,
        created_at: item.created_at,
        author,
    })
}

/// List a user's pull requests with resolved merge status, optionally
/// scoped to one `owner/repo` and filtered by state.
///
/// Output preserves the provider's descending last-updated order. Merge
/// lookups run through a bounded, order-preserving fan-out. A failed
/// primary search yields an empty list with the error attached; nothing
/// is propagated as `Err`.
pub async fn fetch_pull_requests(
    client: &Octocrab,
    username: &str,
    repo: Option<&str>,
    state: StateFilter,
) -> ListSnapshot {
    let query = list_query(username, repo, state);

    let items = match search_pull_requests(client, &query).await {
        Ok(items) => items,
        Err(e) => {
            eprintln!("Warning: pull request search failed: {}", e);
            return ListSnapshot {
                items: Vec::new(),
                error: Some(e),
            };
        }
    };

    // buffered (not buffer_unordered): emission order must match the
    // search order for UI stability
    let resolved: Vec<Option<PullRequest>> = stream::iter(items)
        .map(|item| resolve_item(client, item))
        .buffered(MAX_CONCURRENT_MERGE_CHECKS)
        .collect()
        .await;

    ListSnapshot {
        items: resolved.into_iter().flatten().collect(),
        error: None,
    }
}
