//! One row of the organizations output

use crate::facts::github::types::{Organization, SearchRepository, SearchResult};
use crate::facts::timestamps::format_timestamp;
use serde::{Deserialize, Serialize};

/// Column names of the organizations CSV, in output order
pub const ORGANIZATION_COLUMNS: [&str; 12] = [
    "organization_name",
    "organization_user_name",
    "organization_github_url",
    "organization_website",
    "organization_location",
    "organization_country",
    "organization_form",
    "organization_avatar",
    "organization_public_repos",
    "organization_created",
    "organization_last_update",
    "organization_rubric",
];

/// A GitHub organization, keyed by `organization_user_name` (the login).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizationRecord {
    pub organization_name: Option<String>,
    pub organization_user_name: String,
    pub organization_github_url: Option<String>,
    pub organization_website: Option<String>,
    pub organization_location: Option<String>,
    pub organization_country: Option<String>,
    pub organization_form: Option<String>,
    pub organization_avatar: Option<String>,
    pub organization_public_repos: Option<u64>,
    pub organization_created: Option<String>,
    pub organization_last_update: Option<String>,
    pub organization_rubric: Option<String>,
}

impl OrganizationRecord {
    /// Build the record for an organization first seen under `rubric`.
    ///
    /// Country and legal form are not known to GitHub and stay empty.
    #[must_use]
    pub fn from_github(org: Organization, repos: &SearchResult<SearchRepository>, rubric: &str) -> Self {
        Self {
            organization_name: org.name,
            organization_user_name: org.login,
            organization_github_url: org.html_url,
            organization_website: org.blog.filter(|b| !b.is_empty()),
            organization_location: org.location,
            organization_country: None,
            organization_form: None,
            organization_avatar: org.avatar_url,
            organization_public_repos: Some(repos.total_count),
            organization_created: org.created_at.map(format_timestamp),
            organization_last_update: repos.items.first().and_then(|r| r.updated_at).map(format_timestamp),
            organization_rubric: Some(rubric.to_string()),
        }
    }
}
