use std::fmt;

/// Failure taxonomy for search and detail lookups.
///
/// The aggregator never propagates these as `Err` from its public
/// operations; they surface in `StatsSnapshot::failures` and
/// `ListSnapshot::error` so callers can tell "no pull requests" apart
/// from "the query failed" while still rendering whatever data was
/// assembled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// Invalid or expired token (HTTP 401)
    Auth(String),
    /// Primary or secondary rate limit exceeded (HTTP 403)
    RateLimit(String),
    /// Repository missing or token lacks access
    NotFound(String),
    /// Anything else: network failure, timeout, malformed response
    Api(String),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::Auth(msg) => write!(f, "Authentication failed: {}", msg),
            SearchError::RateLimit(msg) => write!(f, "Rate limit exceeded: {}", msg),
            SearchError::NotFound(msg) => write!(f, "Not found: {}", msg),
            SearchError::Api(msg) => write!(f, "GitHub API error: {}", msg),
        }
    }
}

impl std::error::Error for SearchError {}

/// Classify an octocrab error by sniffing its debug output.
///
/// octocrab flattens GitHub's error responses into a handful of variants,
/// so the status code and message text are the only reliable signal.
pub(crate) fn classify(e: &octocrab::Error) -> SearchError {
    let error_str = format!("{:?}", e);
    if error_str.contains("do not have permission") || error_str.contains("resources do not exist")
    {
        SearchError::NotFound(
            "Repository not found or no access. Check repo name and token permissions (needs 'repo' scope for private repos).".to_string(),
        )
    } else if error_str.contains("401") || error_str.contains("Bad credentials") {
        SearchError::Auth("GitHub token may be invalid or expired".to_string())
    } else if error_str.contains("rate limit") || error_str.contains("403") {
        SearchError::RateLimit("Wait a few minutes and try again".to_string())
    } else {
        SearchError::Api(format!("{}", e))
    }
}
