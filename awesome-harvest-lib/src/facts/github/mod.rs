//! GitHub REST access
//!
//! [`Client`] handles authentication and response classification, [`RepoApi`]
//! wraps the per-repository endpoints, and [`orgs`] the organization lookups.

mod client;
pub mod orgs;
mod repo;
pub mod types;

pub use client::{ApiResult, Client, RateLimitInfo, extract_rate_limit_from_headers, last_page_from_link};
pub use repo::{RepoApi, State};
