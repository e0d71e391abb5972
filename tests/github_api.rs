//! Aggregator tests against a mocked GitHub API.
//!
//! octocrab is pointed at a wiremock server, so these cover the real
//! request/response path: query construction, count extraction, merge
//! resolution, and the degrade-don't-fail policies.

use std::sync::Once;

use octocrab::Octocrab;
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pr_pulse::github::{
    create_client_with_base_uri, fetch_pr_stats, fetch_pull_requests, PrState, StateFilter,
};

static CRYPTO_PROVIDER: Once = Once::new();

fn mock_client(server: &MockServer) -> Octocrab {
    // rustls 0.23 needs a process-wide crypto provider before any TLS
    // config is built, and the test binary has no main() to install one
    CRYPTO_PROVIDER.call_once(|| {
        rustls::crypto::ring::default_provider()
            .install_default()
            .expect("failed to install rustls crypto provider");
    });
    create_client_with_base_uri("test-token", &server.uri()).expect("client should build")
}

fn user_json(login: &str) -> Value {
    json!({
        "login": login,
        "id": 1,
        "node_id": "MDQ6VXNlcjE=",
        "gravatar_id": "",
        "url": "https://api.github.com/users/octocat",
        "avatar_url": "https://avatars.githubusercontent.com/u/1",
        "html_url": "https://github.com/octocat",
        "followers_url": "https://api.github.com/users/octocat/followers",
        "following_url": "https://api.github.com/users/octocat/following",
        "gists_url": "https://api.github.com/users/octocat/gists",
        "starred_url": "https://api.github.com/users/octocat/starred",
        "subscriptions_url": "https://api.github.com/users/octocat/subscriptions",
        "organizations_url": "https://api.github.com/users/octocat/orgs",
        "repos_url": "https://api.github.com/users/octocat/repos",
        "events_url": "https://api.github.com/users/octocat/events",
        "received_events_url": "https://api.github.com/users/octocat/received_events",
        "type": "User",
        "site_admin": false
    })
}

/// A search-API issue record shaped the way octocrab expects it
fn issue_json(number: u64, state: &str, pull_url: &str) -> Value {
    json!({
        "id": 1000 + number,
        "node_id": "MDU6SXNzdWUx",
        "number": number,
        "title": format!("PR number {}", number),
        "state": state,
        "html_url": format!("https://github.com/octo/widgets/pull/{}", number),
        "user": user_json("octocat"),
        "labels": [],
        "body": "body",
        "created_at": "2025-01-01T00:00:00Z",
        "updated_at": "2025-01-02T00:00:00Z",
        "url": format!("https://api.github.com/repos/octo/widgets/issues/{}", number),
        "repository_url": "https://api.github.com/repos/octo/widgets",
        "labels_url": format!("https://api.github.com/repos/octo/widgets/issues/{}/labels{{/name}}", number),
        "comments_url": format!("https://api.github.com/repos/octo/widgets/issues/{}/comments", number),
        "events_url": format!("https://api.github.com/repos/octo/widgets/issues/{}/events", number),
        "comments": 0,
        "assignees": [],
        "author_association": "NONE",
        "locked": false,
        "pull_request": {
            "url": pull_url,
            "html_url": format!("https://github.com/octo/widgets/pull/{}", number),
            "diff_url": format!("https://github.com/octo/widgets/pull/{}.diff", number),
            "patch_url": format!("https://github.com/octo/widgets/pull/{}.patch", number)
        }
    })
}

fn search_body(total_count: u64, items: Vec<Value>) -> Value {
    json!({
        "total_count": total_count,
        "incomplete_results": false,
        "items": items
    })
}

fn pull_detail_json(number: u64, merged: bool) -> Value {
    json!({
        "id": 2000 + number,
        "node_id": "MDExOlB1bGxSZXF1ZXN0MQ==",
        "number": number,
        "url": format!("https://api.github.com/repos/octo/widgets/pulls/{}", number),
        "html_url": format!("https://github.com/octo/widgets/pull/{}", number),
        "state": "closed",
        "title": format!("PR number {}", number),
        "user": user_json("octocat"),
        "created_at": "2025-01-01T00:00:00Z",
        "updated_at": "2025-01-02T00:00:00Z",
        "closed_at": "2025-01-03T00:00:00Z",
        "merged": merged,
        "merged_at": if merged { json!("2025-01-03T00:00:00Z") } else { Value::Null }
    })
}

async fn mount_search(server: &MockServer, q: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path("/search/issues"))
        .and(query_param("q", q))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_pull_detail(server: &MockServer, number: u64, merged: bool) {
    Mock::given(method("GET"))
        .and(path(format!("/repos/octo/widgets/pulls/{}", number)))
        .respond_with(ResponseTemplate::new(200).set_body_json(pull_detail_json(number, merged)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn stats_sums_the_three_counts() {
    let server = MockServer::start().await;
    mount_search(&server, "is:pr is:open author:octocat", search_body(5, vec![])).await;
    mount_search(
        &server,
        "is:pr is:closed is:unmerged author:octocat",
        search_body(3, vec![]),
    )
    .await;
    mount_search(
        &server,
        "is:pr is:merged author:octocat",
        search_body(2, vec![]),
    )
    .await;

    let client = mock_client(&server);
    let snapshot = fetch_pr_stats(&client, "octocat", None).await;

    assert!(snapshot.is_complete());
    assert_eq!(snapshot.stats.open, 5);
    assert_eq!(snapshot.stats.closed, 3);
    assert_eq!(snapshot.stats.merged, 2);
    assert_eq!(snapshot.stats.total, 10);
}

#[tokio::test]
async fn stats_scopes_every_query_to_the_repo() {
    let server = MockServer::start().await;
    mount_search(
        &server,
        "is:pr is:open author:octocat repo:octo/widgets",
        search_body(4, vec![]),
    )
    .await;
    mount_search(
        &server,
        "is:pr is:closed is:unmerged author:octocat repo:octo/widgets",
        search_body(2, vec![]),
    )
    .await;
    mount_search(
        &server,
        "is:pr is:merged author:octocat repo:octo/widgets",
        search_body(1, vec![]),
    )
    .await;

    let client = mock_client(&server);
    let snapshot = fetch_pr_stats(&client, "octocat", Some("octo/widgets")).await;

    assert!(snapshot.is_complete());
    assert_eq!(snapshot.stats.total, 7);

    // Every search request carried the repo clause
    let requests = server.received_requests().await.unwrap();
    let queries: Vec<String> = requests
        .iter()
        .filter_map(|r| {
            r.url
                .query_pairs()
                .find(|(k, _)| k == "q")
                .map(|(_, v)| v.to_string())
        })
        .collect();
    assert_eq!(queries.len(), 3);
    for q in &queries {
        assert!(
            q.contains("repo:octo/widgets"),
            "missing repo clause in '{}'",
            q
        );
    }
}

#[tokio::test]
async fn stats_fail_open_keeps_the_total_invariant() {
    let server = MockServer::start().await;
    // Only the open query is answered; the other two 404 and degrade to 0
    mount_search(&server, "is:pr is:open author:octocat", search_body(5, vec![])).await;

    let client = mock_client(&server);
    let snapshot = fetch_pr_stats(&client, "octocat", None).await;

    assert_eq!(snapshot.stats.open, 5);
    assert_eq!(snapshot.stats.closed, 0);
    assert_eq!(snapshot.stats.merged, 0);
    assert_eq!(snapshot.stats.total, 5);
    assert_eq!(snapshot.failures.len(), 2);
    assert_eq!(
        snapshot.stats.total,
        snapshot.stats.open + snapshot.stats.closed + snapshot.stats.merged
    );
}

#[tokio::test]
async fn list_resolves_merge_status_and_drops_unparseable_items() {
    let server = MockServer::start().await;
    let api = server.uri();

    let items = vec![
        // open: no detail lookup
        issue_json(1, "open", &format!("{}/repos/octo/widgets/pulls/1", api)),
        // closed and actually merged
        issue_json(2, "closed", &format!("{}/repos/octo/widgets/pulls/2", api)),
        // closed, detail lookup blows up: kept with merged = false
        issue_json(3, "closed", &format!("{}/repos/octo/widgets/pulls/3", api)),
        // closed with an unparseable self-link: dropped
        issue_json(4, "closed", "https://example.com/not-a-pr"),
    ];
    mount_search(&server, "is:pr author:octocat", search_body(4, items)).await;
    mount_pull_detail(&server, 2, true).await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/widgets/pulls/3"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = mock_client(&server);
    let snapshot = fetch_pull_requests(&client, "octocat", None, StateFilter::All).await;

    assert!(snapshot.error.is_none());
    // Raw item count was 4; the unparseable one is gone
    assert_eq!(snapshot.items.len(), 3);

    // Search order is preserved
    let numbers: Vec<u64> = snapshot.items.iter().map(|pr| pr.number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);

    assert_eq!(snapshot.items[0].state, PrState::Open);
    assert!(!snapshot.items[0].merged);

    assert_eq!(snapshot.items[1].state, PrState::Closed);
    assert!(snapshot.items[1].merged);

    assert_eq!(snapshot.items[2].state, PrState::Closed);
    assert!(!snapshot.items[2].merged);

    // Normalization carried the provider fields through
    assert_eq!(snapshot.items[0].id, 1001);
    assert_eq!(snapshot.items[0].author.login, "octocat");
    assert_eq!(
        snapshot.items[0].url,
        "https://github.com/octo/widgets/pull/1"
    );
}

#[tokio::test]
async fn list_keeps_items_whose_author_account_is_gone() {
    let server = MockServer::start().await;
    let api = server.uri();

    // A deleted account surfaces as "user": null; it must not take the
    // rest of the page down with it
    let mut ghost = issue_json(1, "open", &format!("{}/repos/octo/widgets/pulls/1", api));
    ghost["user"] = Value::Null;
    let items = vec![
        ghost,
        issue_json(2, "open", &format!("{}/repos/octo/widgets/pulls/2", api)),
    ];
    mount_search(&server, "is:pr author:octocat", search_body(2, items)).await;

    let client = mock_client(&server);
    let snapshot = fetch_pull_requests(&client, "octocat", None, StateFilter::All).await;

    assert!(snapshot.error.is_none());
    assert_eq!(snapshot.items.len(), 2);
    assert_eq!(snapshot.items[0].author.login, "");
    assert_eq!(snapshot.items[0].author.avatar_url, "");
    assert_eq!(snapshot.items[1].author.login, "octocat");
}

#[tokio::test]
async fn list_open_filter_builds_an_open_only_query() {
    let server = MockServer::start().await;
    let api = server.uri();
    let items = vec![issue_json(
        7,
        "open",
        &format!("{}/repos/octo/widgets/pulls/7", api),
    )];
    mount_search(&server, "is:pr author:octocat is:open", search_body(1, items)).await;

    let client = mock_client(&server);
    let snapshot = fetch_pull_requests(&client, "octocat", None, StateFilter::Open).await;

    assert!(snapshot.error.is_none());
    assert_eq!(snapshot.items.len(), 1);

    let requests = server.received_requests().await.unwrap();
    let q = requests[0]
        .url
        .query_pairs()
        .find(|(k, _)| k == "q")
        .map(|(_, v)| v.to_string())
        .unwrap();
    assert!(q.contains("is:open"));
    assert!(!q.contains("is:closed"));
    assert!(!q.contains("is:merged"));
}

#[tokio::test]
async fn list_primary_failure_yields_empty_with_error() {
    let server = MockServer::start().await;
    // Nothing mounted: the search 404s through every retry

    let client = mock_client(&server);
    let snapshot = fetch_pull_requests(&client, "octocat", None, StateFilter::All).await;

    assert!(snapshot.items.is_empty());
    assert!(snapshot.error.is_some());
}

#[tokio::test]
async fn repeated_calls_are_idempotent() {
    let server = MockServer::start().await;
    let api = server.uri();

    mount_search(&server, "is:pr is:open author:octocat", search_body(5, vec![])).await;
    mount_search(
        &server,
        "is:pr is:closed is:unmerged author:octocat",
        search_body(3, vec![]),
    )
    .await;
    mount_search(
        &server,
        "is:pr is:merged author:octocat",
        search_body(2, vec![]),
    )
    .await;

    let items = vec![
        issue_json(1, "open", &format!("{}/repos/octo/widgets/pulls/1", api)),
        issue_json(2, "closed", &format!("{}/repos/octo/widgets/pulls/2", api)),
    ];
    mount_search(&server, "is:pr author:octocat", search_body(2, items)).await;
    mount_pull_detail(&server, 2, true).await;

    let client = mock_client(&server);

    let first = fetch_pr_stats(&client, "octocat", None).await;
    let second = fetch_pr_stats(&client, "octocat", None).await;
    assert_eq!(first.stats, second.stats);
    assert!(first.is_complete() && second.is_complete());

    let first = fetch_pull_requests(&client, "octocat", None, StateFilter::All).await;
    let second = fetch_pull_requests(&client, "octocat", None, StateFilter::All).await;
    assert_eq!(first.items, second.items);
}
