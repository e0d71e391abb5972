//! GitHub pull request analytics.
//!
//! The core is the aggregator in [`github`]: per-author open/closed/merged
//! counts from three count-only search queries, and a normalized listing
//! whose closed items get their merge status resolved through per-item
//! detail lookups. Both operations absorb failures and surface them as
//! typed data rather than errors. The remaining modules are the CLI shell:
//! config, credential resolution, a TTL response cache, and terminal
//! output.

pub mod browser;
pub mod cache;
pub mod config;
pub mod credentials;
pub mod fetch;
pub mod github;
pub mod output;
