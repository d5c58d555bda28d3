//! Per-entry GitHub enrichment
//!
//! [`Enricher::enrich`] turns one awesome-list entry into a [`ProjectRecord`].
//! Missing optional data (license, release, funding file, README, dependents)
//! leaves the matching columns at their defaults; any other failure is
//! returned so the caller can retry the entry.

use crate::Result;
use crate::facts::RepoSpec;
use crate::facts::awesome::Entry;
use crate::facts::contributors::distribution_score;
use crate::facts::dependents::{DEFAULT_MAX_PAGES, DependentsCrawler};
use crate::facts::github::types::LicenseResponse;
use crate::facts::github::{Client, RepoApi, State, orgs};
use crate::facts::governance::{FUNDING_FILE, Governance, funding_platforms};
use crate::facts::organization_record::OrganizationRecord;
use crate::facts::organizations::OrganizationMemo;
use crate::facts::platform::Platform;
use crate::facts::project_record::ProjectRecord;
use crate::facts::references::extract_references;
use crate::facts::timestamps::{days_between, format_timestamp};
use chrono::{DateTime, Utc};
use ohno::EnrichableExt;

const LOG_TARGET: &str = "  enricher";

const LICENSE_UNDEFINED: &str = "UNDEFINED";
const LICENSE_CUSTOM: &str = "CUSTOM";
const SPDX_NOASSERTION: &str = "NOASSERTION";

/// Tuning knobs for enrichment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrichSettings {
    /// Closed pull requests inspected for review counts
    pub review_sample_size: u32,

    /// Length of the trailing activity window
    pub activity_window_days: u32,

    pub dependents_max_pages: u32,
}

impl Default for EnrichSettings {
    fn default() -> Self {
        Self {
            review_sample_size: 10,
            activity_window_days: 365,
            dependents_max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

/// The outcome of enriching one entry
#[derive(Debug, Clone)]
pub struct Enrichment {
    pub project: ProjectRecord,

    /// Set when the entry belongs to an organization not seen before
    pub new_organization: Option<OrganizationRecord>,
}

/// Gathers GitHub data for awesome-list entries
#[derive(Debug)]
pub struct Enricher<'a> {
    client: &'a Client,
    crawler: &'a DependentsCrawler,
    settings: EnrichSettings,
}

impl<'a> Enricher<'a> {
    #[must_use]
    pub const fn new(client: &'a Client, crawler: &'a DependentsCrawler, settings: EnrichSettings) -> Self {
        Self {
            client,
            crawler,
            settings,
        }
    }

    /// Build the full record for a GitHub-hosted entry.
    ///
    /// Organizations found in `memo` are reused without remote calls; a newly
    /// seen organization is returned in [`Enrichment::new_organization`] and is
    /// not added to `memo` here.
    pub async fn enrich(&self, entry: &Entry, rubric: &str, memo: &OrganizationMemo, now: DateTime<Utc>) -> Result<Enrichment> {
        let spec = RepoSpec::parse_str(&entry.url)?;
        log::info!(target: LOG_TARGET, "Enriching '{spec}' from rubric '{rubric}'");

        let api = RepoApi::new(self.client, &spec);
        let window_start = now - chrono::Duration::days(i64::from(self.settings.activity_window_days));

        let repo = api
            .repository()
            .await
            .map_err(|e| e.enrich_with(|| format!("could not fetch repository '{spec}'")))?;
        let root = api.contents("").await?.unwrap_or_default();

        let dependents = soft(self.crawler.crawl(&spec, self.settings.dependents_max_pages).await, "dependents", &spec)
            .unwrap_or_default();

        let closed_issues = api.count_issues(State::Closed, None).await?;
        let open_issues = api.count_issues(State::Open, None).await?;
        let closed_pulls = api.count_pulls(State::Closed).await?;
        let open_pulls = api.count_pulls(State::Open).await?;
        let reviews_per_pr = self.reviews_per_pr(&api, closed_pulls).await?;

        let issues_closed_recently = api.count_issues(State::Closed, Some(window_start)).await?;
        let commits_recently = api.count_commits(Some(window_start)).await?;
        let active = is_active(repo.archived, issues_closed_recently, commits_recently);

        let last_commit = api.last_commit_date().await?;
        let last_issue_closed = if closed_issues > 0 {
            api.last_closed_issue().await?
        } else {
            None
        };
        let total_commits = api.count_commits(None).await?;

        let license = license_name(soft(api.license().await, "license", &spec).flatten().as_ref());
        let languages = api.languages().await?;

        let readme = soft(api.readme().await, "README", &spec).flatten();
        let refs = readme.as_deref().map(extract_references).unwrap_or_default();

        let dot_github = soft(api.contents(".github").await, ".github directory", &spec)
            .flatten()
            .unwrap_or_default();
        let donation_platforms = if dot_github.iter().any(|e| e.path == FUNDING_FILE) {
            soft(self.funding(&api).await, "funding information", &spec).flatten()
        } else {
            None
        };
        let governance = Governance::scan(root.iter().chain(dot_github.iter()).map(|e| e.path.as_str()));

        let contributor_totals = api.contributor_totals().await?;
        let release = soft(api.latest_release().await, "latest release", &spec).flatten();
        let good_first_issues = api.count_good_first_issues().await?;
        let contributors = api.count_contributors().await?;

        let stars_recently = if repo.stargazers_count > 0 {
            api.stars_since(window_start).await?
        } else {
            0
        };

        let mut project = ProjectRecord {
            project_name: Some(entry.name.clone()),
            oneliner: Some(entry.oneliner()),
            git_namespace: Some(spec.owner().to_string()),
            git_url: repo.clone_url,
            platform: Some(Platform::GitHub.to_string()),
            topics: Some(repo.topics.join(",")),
            rubric: Some(rubric.to_string()),
            last_commit_date: last_commit.map(format_timestamp),
            stargazers_count: Some(repo.stargazers_count),
            number_of_dependents: Some(dependents.len() as u64),
            stars_last_year: Some(stars_recently),
            project_active: Some(active),
            dominating_language: languages.first().cloned(),
            languages: Some(languages.join(",")),
            homepage: repo.homepage.filter(|h| !h.is_empty()),
            readme_content: readme,
            refs: Some(refs.join(",")),
            project_created: Some(format_timestamp(repo.created_at)),
            project_age_in_days: Some(days_between(repo.created_at, now)),
            license: Some(license),
            total_commits_last_year: Some(commits_recently),
            total_number_of_commits: Some(total_commits),
            last_issue_closed: last_issue_closed.map(format_timestamp),
            open_issues: Some(open_issues),
            closed_pullrequests: Some(closed_pulls),
            closed_issues: Some(closed_issues),
            issues_closed_last_year: Some(issues_closed_recently),
            days_until_last_issue_closed: last_issue_closed.map(|ts| days_between(ts, now)),
            open_pullrequests: Some(open_pulls),
            reviews_per_pr: Some(reviews_per_pr),
            development_distribution_score: contributor_totals.as_deref().and_then(distribution_score),
            last_released_date: release.as_ref().and_then(|r| r.published_at).map(format_timestamp),
            last_release_tag_name: release.map(|r| r.tag_name),
            good_first_issue: Some(good_first_issues),
            contributors: Some(contributors),
            accepts_donations: Some(donation_platforms.is_some()),
            donation_platforms: donation_platforms.map(|p| p.join(",")),
            code_of_conduct: Some(governance.code_of_conduct),
            contribution_guide: Some(governance.contribution_guide),
            dependents_repos: Some(dependents.join(",")),
            ..ProjectRecord::default()
        };

        let new_organization = match repo.organization {
            None => None,
            Some(account) => {
                if let Some(known) = memo.get(&account.login) {
                    project.set_organization(known);
                    None
                } else {
                    let record = self.organization(&account.login, rubric).await?;
                    project.set_organization(&record);
                    Some(record)
                }
            }
        };

        Ok(Enrichment {
            project,
            new_organization,
        })
    }

    async fn reviews_per_pr(&self, api: &RepoApi<'_>, closed_pulls: u64) -> Result<f64> {
        if closed_pulls == 0 {
            return Ok(0.0);
        }

        let sample = api.closed_pull_numbers(self.settings.review_sample_size).await?;
        let mut total_reviews = 0;
        for number in &sample {
            total_reviews += api.count_reviews(*number).await?;
        }

        Ok(average_reviews(total_reviews, sample.len()))
    }

    /// Declared funding platforms; `None` when the listed file cannot be fetched.
    async fn funding(&self, api: &RepoApi<'_>) -> Result<Option<Vec<String>>> {
        let Some(yaml) = api.file_text(FUNDING_FILE).await? else {
            log::debug!(target: LOG_TARGET, "'{FUNDING_FILE}' is listed but could not be fetched");
            return Ok(None);
        };
        funding_platforms(&yaml).map(Some)
    }

    async fn organization(&self, login: &str, rubric: &str) -> Result<OrganizationRecord> {
        log::info!(target: LOG_TARGET, "Fetching new organization '{login}'");

        let profile = orgs::organization(self.client, login)
            .await
            .map_err(|e| e.enrich_with(|| format!("could not fetch organization '{login}'")))?;
        let repos = orgs::owned_repositories(self.client, login)
            .await
            .map_err(|e| e.enrich_with(|| format!("could not search repositories of '{login}'")))?;

        Ok(OrganizationRecord::from_github(profile, &repos, rubric))
    }
}

/// An entry is inactive when it is archived or saw neither closed issues nor commits in the window.
#[must_use]
pub const fn is_active(archived: bool, issues_closed_recently: u64, commits_recently: u64) -> bool {
    !(archived || (issues_closed_recently == 0 && commits_recently == 0))
}

/// Mean number of reviews over the sampled pull requests; 0 for an empty sample.
#[must_use]
#[expect(clippy::cast_precision_loss, reason = "review counts are small")]
pub fn average_reviews(total_reviews: u64, sampled: usize) -> f64 {
    if sampled == 0 {
        return 0.0;
    }
    total_reviews as f64 / sampled as f64
}

/// License column value for a `/license` response (`None` when the repository has none).
#[must_use]
pub fn license_name(response: Option<&LicenseResponse>) -> String {
    let Some(response) = response else {
        return LICENSE_UNDEFINED.to_string();
    };

    match response.license.as_ref().and_then(|l| l.spdx_id.as_deref()) {
        Some(id) if id != SPDX_NOASSERTION => id.to_string(),
        _ => LICENSE_CUSTOM.to_string(),
    }
}

fn soft<T>(result: Result<T>, what: &str, spec: &RepoSpec) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!(target: LOG_TARGET, "Could not fetch {what} for '{spec}': {e:#}");
            None
        }
    }
}
