//! Data gathering for awesome-list entries
//!
//! This module loads the awesome list and collects everything known about each
//! listed project.
//!
//! # Implementation Model
//!
//! - [`awesome`] fetches the list's Markdown through the GitHub contents API,
//!   caches it, and parses it into rubrics and entries.
//! - [`github`] is a small REST client plus typed per-repository queries.
//! - [`Enricher`] drives those queries for one entry and assembles a
//!   [`ProjectRecord`], falling back to defaults for optional data.
//! - [`DependentsCrawler`] scrapes the "used by" pages GitHub has no API for.
//! - [`RateGuard`] stalls the run when the API quota runs low.
//! - [`OrganizationMemo`] remembers organizations already written so each one
//!   is emitted once.
//!
//! Everything runs sequentially; no two requests are ever in flight.

pub mod awesome;
mod contributors;
mod dependents;
mod enricher;
pub mod github;
mod governance;
mod organization_record;
mod organizations;
mod platform;
mod progress;
mod project_record;
mod rate_guard;
mod references;
mod repo_spec;
mod retry;
mod timestamps;

pub use contributors::distribution_score;
pub use dependents::{DEFAULT_MAX_PAGES, DependentsCrawler, DependentsPage, parse_page};
pub use enricher::{EnrichSettings, Enricher, Enrichment, average_reviews, is_active, license_name};
pub use governance::{Governance, funding_platforms};
pub use organization_record::{ORGANIZATION_COLUMNS, OrganizationRecord};
pub use organizations::OrganizationMemo;
pub use platform::{Platform, url_namespace};
pub use progress::Progress;
pub use project_record::{PROJECT_COLUMNS, ProjectRecord};
pub use rate_guard::{DEFAULT_MIN_REMAINING, RateGuard, countdown};
pub use references::extract_references;
pub use repo_spec::RepoSpec;
pub use retry::{RetryState, with_single_retry};
pub use timestamps::{TIMESTAMP_FORMAT, format_timestamp, parse_http_date};
