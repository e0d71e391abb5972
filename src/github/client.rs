use anyhow::{Context, Result};
use octocrab::Octocrab;
use std::time::Duration;

/// Upper bound on any single API call. GitHub's search endpoint can stall
/// under load and octocrab's default client would wait indefinitely.
pub(crate) const API_TIMEOUT: Duration = Duration::from_secs(30);

/// Create an authenticated GitHub client using a personal access token
pub fn create_client(token: &str) -> Result<Octocrab> {
    Octocrab::builder()
        .personal_token(token.to_string())
        .build()
        .context("Failed to create GitHub client")
}

/// Create a client pointed at a non-default API base, e.g. a GitHub
/// Enterprise instance or a mock server in tests.
pub fn create_client_with_base_uri(token: &str, base_uri: &str) -> Result<Octocrab> {
    Octocrab::builder()
        .personal_token(token.to_string())
        .base_uri(base_uri)
        .context("Invalid API base URI")?
        .build()
        .context("Failed to create GitHub client")
}
