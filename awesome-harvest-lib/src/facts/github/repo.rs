//! Per-repository GitHub queries

use super::client::{ApiResult, Client, last_page_from_link, with_query};
use super::types::{
    Commit, ContentEntry, ContributorStats, FileContent, IssueSummary, LicenseResponse, PullRequest, Release, Repository,
    Stargazer,
};
use crate::Result;
use crate::facts::RepoSpec;
use crate::facts::timestamps::parse_http_date;
use chrono::{DateTime, SecondsFormat, Utc};
use core::time::Duration;
use ohno::{IntoAppError, bail};
use reqwest::StatusCode;
use reqwest::header::{LAST_MODIFIED, LINK};
use std::collections::HashMap;

const LOG_TARGET: &str = "    github";
const STAR_MEDIA_TYPE: &str = "application/vnd.github.star+json";
const STARGAZER_PAGE_SIZE: u32 = 100;
const STATS_POLL_ATTEMPTS: u32 = 3;
const STATS_POLL_DELAY: Duration = Duration::from_secs(2);

/// Issue and pull request states accepted by the list endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum State {
    Open,
    Closed,
}

/// Queries scoped to one repository
#[derive(Debug, Clone, Copy)]
pub struct RepoApi<'a> {
    client: &'a Client,
    spec: &'a RepoSpec,
}

impl<'a> RepoApi<'a> {
    #[must_use]
    pub const fn new(client: &'a Client, spec: &'a RepoSpec) -> Self {
        Self { client, spec }
    }

    fn path(&self, suffix: &str) -> String {
        format!("{}{suffix}", self.spec.api_path())
    }

    pub async fn repository(&self) -> Result<Repository> {
        self.client.get_json(&self.spec.api_path()).await
    }

    /// Directory listing (`""` for the root); `None` when the directory does not exist.
    pub async fn contents(&self, dir: &str) -> Result<Option<Vec<ContentEntry>>> {
        let suffix = if dir.is_empty() {
            "/contents".to_string()
        } else {
            format!("/contents/{dir}")
        };
        self.client.get_optional_json(&self.path(&suffix)).await
    }

    /// Decoded text of one file; `None` when the file does not exist.
    pub async fn file_text(&self, file: &str) -> Result<Option<String>> {
        let content: Option<FileContent> = self.client.get_optional_json(&self.path(&format!("/contents/{file}"))).await?;
        content.map(|c| c.decode()).transpose()
    }

    /// Decoded README text; `None` when the repository has no README.
    pub async fn readme(&self) -> Result<Option<String>> {
        let content: Option<FileContent> = self.client.get_optional_json(&self.path("/readme")).await?;
        content.map(|c| c.decode()).transpose()
    }

    /// Issues in the given state. GitHub's issue list includes pull requests.
    pub async fn count_issues(&self, state: State, since: Option<DateTime<Utc>>) -> Result<u64> {
        let state: &str = state.into();
        let mut path = self.path(&format!("/issues?state={state}"));
        if let Some(since) = since {
            path = with_query(&path, &format!("since={}", iso8601(since)));
        }
        self.client.count(&path).await
    }

    pub async fn count_pulls(&self, state: State) -> Result<u64> {
        let state: &str = state.into();
        self.client.count(&self.path(&format!("/pulls?state={state}"))).await
    }

    pub async fn count_commits(&self, since: Option<DateTime<Utc>>) -> Result<u64> {
        let path = since.map_or_else(
            || self.path("/commits"),
            |since| self.path(&format!("/commits?since={}", iso8601(since))),
        );
        self.client.count(&path).await
    }

    pub async fn count_good_first_issues(&self) -> Result<u64> {
        self.client
            .count(&self.path("/issues?state=open&labels=good%20first%20issue"))
            .await
    }

    pub async fn count_contributors(&self) -> Result<u64> {
        self.client.count(&self.path("/contributors")).await
    }

    /// Numbers of the first `limit` closed pull requests.
    pub async fn closed_pull_numbers(&self, limit: u32) -> Result<Vec<u64>> {
        let pulls: Vec<PullRequest> = self
            .client
            .get_json(&self.path(&format!("/pulls?state=closed&per_page={limit}")))
            .await?;
        Ok(pulls.into_iter().take(limit as usize).map(|p| p.number).collect())
    }

    pub async fn count_reviews(&self, pull_number: u64) -> Result<u64> {
        self.client.count(&self.path(&format!("/pulls/{pull_number}/reviews"))).await
    }

    /// Time of the most recent commit.
    ///
    /// Read from the `Last-Modified` header of the commit list, falling back to
    /// the newest commit's committer date.
    pub async fn last_commit_date(&self) -> Result<Option<DateTime<Utc>>> {
        let resp = self.client.get_response(&self.path("/commits?per_page=1")).await?;

        if let Some(ts) = resp
            .headers()
            .get(LAST_MODIFIED)
            .and_then(|h| h.to_str().ok())
            .and_then(parse_http_date)
        {
            return Ok(Some(ts));
        }

        let commits: Vec<Commit> = resp.json().await.into_app_err("parsing commit list")?;
        Ok(commits
            .into_iter()
            .next()
            .and_then(|c| c.commit.committer)
            .and_then(|s| s.date))
    }

    /// Last update time of the most recently updated closed issue.
    pub async fn last_closed_issue(&self) -> Result<Option<DateTime<Utc>>> {
        let issues: Vec<IssueSummary> = self
            .client
            .get_json(&self.path("/issues?state=closed&sort=updated&direction=desc&per_page=1"))
            .await?;
        Ok(issues.into_iter().next().map(|i| i.updated_at))
    }

    pub async fn license(&self) -> Result<Option<LicenseResponse>> {
        self.client.get_optional_json(&self.path("/license")).await
    }

    /// Languages ordered by byte count, largest first.
    pub async fn languages(&self) -> Result<Vec<String>> {
        let bytes: HashMap<String, u64> = self.client.get_json(&self.path("/languages")).await?;
        Ok(sort_languages(bytes))
    }

    pub async fn latest_release(&self) -> Result<Option<Release>> {
        self.client.get_optional_json(&self.path("/releases/latest")).await
    }

    /// Commit totals per contributor; `None` while GitHub is still computing them.
    pub async fn contributor_totals(&self) -> Result<Option<Vec<u64>>> {
        let path = self.path("/stats/contributors");

        for attempt in 1..=STATS_POLL_ATTEMPTS {
            let resp = match self.client.api_call(&path, None).await {
                ApiResult::Success(resp) => resp,
                ApiResult::NotFound => return Ok(None),
                ApiResult::RateLimited(_) => bail!("GitHub rate limit exhausted while fetching '{path}'"),
                ApiResult::Failed(e) => return Err(e),
            };

            match resp.status() {
                StatusCode::ACCEPTED => {
                    log::debug!(target: LOG_TARGET, "Contributor statistics for '{}' not ready (attempt {attempt})", self.spec);
                    if attempt < STATS_POLL_ATTEMPTS {
                        tokio::time::sleep(STATS_POLL_DELAY).await;
                    }
                }
                StatusCode::NO_CONTENT => return Ok(Some(Vec::new())),
                _ => {
                    let stats: Vec<ContributorStats> = resp.json().await.into_app_err("parsing contributor statistics")?;
                    return Ok(Some(stats.into_iter().map(|s| s.total).collect()));
                }
            }
        }

        Ok(None)
    }

    /// Stars given at or after `cutoff`.
    ///
    /// Stargazers are listed oldest first, so pages are walked from the last one
    /// backwards until a star older than the cutoff shows up.
    pub async fn stars_since(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        let base = self.path(&format!("/stargazers?per_page={STARGAZER_PAGE_SIZE}"));

        let first = self.client.get_response_as(&base, Some(STAR_MEDIA_TYPE)).await?;
        let last_page = first
            .headers()
            .get(LINK)
            .and_then(|h| h.to_str().ok())
            .and_then(last_page_from_link)
            .unwrap_or(1);

        if last_page <= 1 {
            let stars: Vec<Stargazer> = first.json().await.into_app_err("parsing stargazers")?;
            return Ok(count_recent(&stars, cutoff).0);
        }

        let mut total = 0;
        for page in (1..=last_page).rev() {
            let stars: Vec<Stargazer> = self
                .client
                .get_json_as(&with_query(&base, &format!("page={page}")), STAR_MEDIA_TYPE)
                .await?;

            let (recent, reached_older) = count_recent(&stars, cutoff);
            total += recent;
            if reached_older {
                break;
            }
        }

        Ok(total)
    }
}

fn iso8601(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn sort_languages(bytes: HashMap<String, u64>) -> Vec<String> {
    let mut languages: Vec<_> = bytes.into_iter().collect();
    languages.sort_by(|(a_name, a_bytes), (b_name, b_bytes)| b_bytes.cmp(a_bytes).then_with(|| a_name.cmp(b_name)));
    languages.into_iter().map(|(name, _)| name).collect()
}

/// Number of stars at or after `cutoff`, and whether any older star was seen.
fn count_recent(stars: &[Stargazer], cutoff: DateTime<Utc>) -> (u64, bool) {
    let recent = stars.iter().filter(|s| s.starred_at >= cutoff).count() as u64;
    (recent, recent < stars.len() as u64)
}
