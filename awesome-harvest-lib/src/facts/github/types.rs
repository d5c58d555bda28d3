//! Serde shapes of the GitHub REST responses the harvest reads.
//!
//! Only the fields actually consumed are declared; everything else is ignored.

use crate::Result;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use ohno::{IntoAppError, bail};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub owner: Account,
    pub clone_url: Option<String>,
    pub homepage: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub topics: Vec<String>,

    /// Present only when the repository is owned by an organization
    pub organization: Option<Account>,
}

/// One item of a directory listing (`/contents/{path}`)
#[derive(Debug, Clone, Deserialize)]
pub struct ContentEntry {
    pub path: String,
}

/// A single file fetched through `/contents/{path}` or `/readme`
#[derive(Debug, Clone, Deserialize)]
pub struct FileContent {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub encoding: String,
}

impl FileContent {
    /// Decode the base64 payload into UTF-8 text.
    pub fn decode(&self) -> Result<String> {
        if !self.encoding.is_empty() && self.encoding != "base64" {
            bail!("unsupported content encoding '{}'", self.encoding);
        }

        let compact: String = self.content.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        let bytes = STANDARD.decode(compact).into_app_err("decoding base64 file content")?;
        String::from_utf8(bytes).into_app_err("file content is not valid UTF-8")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LicenseResponse {
    pub license: Option<License>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct License {
    pub spdx_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    pub number: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IssueSummary {
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    pub tag_name: String,
    pub published_at: Option<DateTime<Utc>>,
}

/// Stargazer as returned with the `application/vnd.github.star+json` media type
#[derive(Debug, Clone, Deserialize)]
pub struct Stargazer {
    pub starred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContributorStats {
    pub total: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Commit {
    pub commit: CommitDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitDetail {
    pub committer: Option<Signature>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Signature {
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Organization {
    pub login: String,
    pub name: Option<String>,
    pub html_url: Option<String>,
    pub blog: Option<String>,
    pub location: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult<T> {
    pub total_count: u64,
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchRepository {
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitResponse {
    pub resources: RateLimitResources,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitResources {
    pub core: RateLimitCore,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitCore {
    pub limit: u64,
    pub remaining: u64,
    pub reset: i64,
}
