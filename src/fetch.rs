use octocrab::Octocrab;

use crate::cache::{self, CacheConfig};
use crate::github::{self, ListSnapshot, PrStats, PullRequest, StateFilter, StatsSnapshot};

/// Shared inputs for the stats and listing fetch paths
pub struct FetchOptions<'a> {
    pub token: &'a str,
    pub username: &'a str,
    pub repo: Option<&'a str>,
    pub verbose: bool,
}

/// Fetch aggregate stats, consulting the response cache first.
///
/// Degraded snapshots (any sub-query failed) are never written to the
/// cache so a transient failure cannot pin zeroed counts for a full TTL.
pub async fn fetch_stats(
    client: &Octocrab,
    opts: &FetchOptions<'_>,
    cache_config: &CacheConfig,
) -> StatsSnapshot {
    let cache_path = cache::get_cache_path();
    let key = cache::stats_key(opts.token, opts.username, opts.repo);

    if cache_config.enabled {
        if let Some(stats) = cache::load::<PrStats>(&cache_path, &key, cache_config.ttl) {
            if opts.verbose {
                eprintln!("Stats served from cache ({})", key);
            }
            return StatsSnapshot {
                stats,
                failures: vec![],
            };
        }
    } else if opts.verbose {
        eprintln!("Cache: disabled (--no-cache)");
    }

    let snapshot = github::fetch_pr_stats(client, opts.username, opts.repo).await;

    if cache_config.enabled && snapshot.is_complete() {
        cache::store(&cache_path, &key, &snapshot.stats);
    }

    snapshot
}

/// Fetch the normalized listing, consulting the response cache first.
///
/// Only clean results are cached; a failed primary search is always
/// retried on the next invocation.
pub async fn fetch_list(
    client: &Octocrab,
    opts: &FetchOptions<'_>,
    state: StateFilter,
    cache_config: &CacheConfig,
) -> ListSnapshot {
    let cache_path = cache::get_cache_path();
    let key = cache::list_key(opts.token, opts.username, opts.repo, state);

    if cache_config.enabled {
        if let Some(items) = cache::load::<Vec<PullRequest>>(&cache_path, &key, cache_config.ttl) {
            if opts.verbose {
                eprintln!("Listing served from cache ({})", key);
            }
            return ListSnapshot { items, error: None };
        }
    } else if opts.verbose {
        eprintln!("Cache: disabled (--no-cache)");
    }

    let snapshot = github::fetch_pull_requests(client, opts.username, opts.repo, state).await;

    if cache_config.enabled && snapshot.error.is_none() {
        cache::store(&cache_path, &key, &snapshot.items);
    }

    snapshot
}
