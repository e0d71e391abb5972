pub mod client;
pub mod error;
pub mod list;
pub mod query;
pub mod stats;
pub mod types;
pub(crate) mod wire;

pub use client::{create_client, create_client_with_base_uri};
pub use error::SearchError;
pub use list::fetch_pull_requests;
pub use query::StateFilter;
pub use stats::fetch_pr_stats;
pub use types::{Author, ListSnapshot, PrState, PrStats, PullRequest, StatsSnapshot};
