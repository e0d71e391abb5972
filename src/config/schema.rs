use serde::{Deserialize, Serialize};

use crate::github::StateFilter;

/// User-level defaults; every field can be overridden by a CLI flag.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// GitHub login whose pull requests are aggregated
    pub username: Option<String>,
    /// Optional "owner/repo" scope for every query
    pub repo: Option<String>,
    /// Default state filter for listings
    pub state: Option<StateFilter>,
    /// Response-cache TTL as a humantime string, e.g. "5m" or "90s"
    pub cache_ttl: Option<String>,
}
