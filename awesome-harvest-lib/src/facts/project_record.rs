//! One row of the projects output

use crate::facts::awesome::Entry;
use crate::facts::organization_record::OrganizationRecord;
use crate::facts::platform::{Platform, url_namespace};
use serde::{Deserialize, Serialize};

/// Column names of the projects CSV, in output order
pub const PROJECT_COLUMNS: [&str; 52] = [
    "project_name",
    "oneliner",
    "git_namespace",
    "git_url",
    "platform",
    "topics",
    "rubric",
    "last_commit_date",
    "stargazers_count",
    "number_of_dependents",
    "stars_last_year",
    "project_active",
    "dominating_language",
    "organization",
    "organization_user_name",
    "languages",
    "homepage",
    "readme_content",
    "refs",
    "project_created",
    "project_age_in_days",
    "license",
    "total_commits_last_year",
    "total_number_of_commits",
    "last_issue_closed",
    "open_issues",
    "closed_pullrequests",
    "closed_issues",
    "issues_closed_last_year",
    "days_until_last_issue_closed",
    "open_pullrequests",
    "reviews_per_pr",
    "development_distribution_score",
    "last_released_date",
    "last_release_tag_name",
    "good_first_issue",
    "contributors",
    "accepts_donations",
    "donation_platforms",
    "code_of_conduct",
    "contribution_guide",
    "dependents_repos",
    "organization_name",
    "organization_github_url",
    "organization_website",
    "organization_location",
    "organization_country",
    "organization_form",
    "organization_avatar",
    "organization_public_repos",
    "organization_created",
    "organization_last_update",
];

/// Everything known about one awesome-list entry.
///
/// Field order matches [`PROJECT_COLUMNS`]; unset fields are written as empty cells.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub project_name: Option<String>,
    pub oneliner: Option<String>,
    pub git_namespace: Option<String>,
    pub git_url: Option<String>,
    pub platform: Option<String>,
    pub topics: Option<String>,
    pub rubric: Option<String>,
    pub last_commit_date: Option<String>,
    pub stargazers_count: Option<u64>,
    pub number_of_dependents: Option<u64>,
    pub stars_last_year: Option<u64>,
    pub project_active: Option<bool>,
    pub dominating_language: Option<String>,
    pub organization: Option<String>,
    pub organization_user_name: Option<String>,
    pub languages: Option<String>,
    pub homepage: Option<String>,
    pub readme_content: Option<String>,
    pub refs: Option<String>,
    pub project_created: Option<String>,
    pub project_age_in_days: Option<i64>,
    pub license: Option<String>,
    pub total_commits_last_year: Option<u64>,
    pub total_number_of_commits: Option<u64>,
    pub last_issue_closed: Option<String>,
    pub open_issues: Option<u64>,
    pub closed_pullrequests: Option<u64>,
    pub closed_issues: Option<u64>,
    pub issues_closed_last_year: Option<u64>,
    pub days_until_last_issue_closed: Option<i64>,
    pub open_pullrequests: Option<u64>,
    pub reviews_per_pr: Option<f64>,
    pub development_distribution_score: Option<f64>,
    pub last_released_date: Option<String>,
    pub last_release_tag_name: Option<String>,
    pub good_first_issue: Option<u64>,
    pub contributors: Option<u64>,
    pub accepts_donations: Option<bool>,
    pub donation_platforms: Option<String>,
    pub code_of_conduct: Option<bool>,
    pub contribution_guide: Option<bool>,
    pub dependents_repos: Option<String>,
    pub organization_name: Option<String>,
    pub organization_github_url: Option<String>,
    pub organization_website: Option<String>,
    pub organization_location: Option<String>,
    pub organization_country: Option<String>,
    pub organization_form: Option<String>,
    pub organization_avatar: Option<String>,
    pub organization_public_repos: Option<u64>,
    pub organization_created: Option<String>,
    pub organization_last_update: Option<String>,
}

impl ProjectRecord {
    /// The reduced record written for entries not hosted on GitHub.
    ///
    /// GitLab entries carry their URL as `git_url`, everything else as `homepage`.
    #[must_use]
    pub fn minimal(entry: &Entry, rubric: &str, platform: Platform) -> Self {
        let mut record = Self {
            project_name: Some(entry.name.clone()),
            oneliner: Some(entry.oneliner()),
            git_namespace: Some(url_namespace(&entry.url)),
            platform: Some(platform.to_string()),
            rubric: Some(rubric.to_string()),
            ..Self::default()
        };

        if platform == Platform::GitLab {
            record.git_url = Some(entry.url.clone());
        } else {
            record.homepage = Some(entry.url.clone());
        }

        record
    }

    /// Copy the organization columns from a known organization.
    pub fn set_organization(&mut self, org: &OrganizationRecord) {
        self.organization.clone_from(&org.organization_name);
        self.organization_user_name = Some(org.organization_user_name.clone());
        self.organization_name.clone_from(&org.organization_name);
        self.organization_github_url.clone_from(&org.organization_github_url);
        self.organization_website.clone_from(&org.organization_website);
        self.organization_location.clone_from(&org.organization_location);
        self.organization_country.clone_from(&org.organization_country);
        self.organization_form.clone_from(&org.organization_form);
        self.organization_avatar.clone_from(&org.organization_avatar);
        self.organization_public_repos = org.organization_public_repos;
        self.organization_created.clone_from(&org.organization_created);
        self.organization_last_update.clone_from(&org.organization_last_update);
    }
}
