//! Scrape of GitHub's "used by" listing
//!
//! GitHub exposes no API for dependent repositories, so the HTML listing at
//! `{web_base}/{owner}/{repo}/network/dependents` is walked page by page.

use crate::Result;
use crate::facts::RepoSpec;
use core::time::Duration;
use ohno::{IntoAppError, app_err};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

const LOG_TARGET: &str = "dependents";
const USER_AGENT: &str = "awesome-harvest";

/// Default number of listing pages to visit
pub const DEFAULT_MAX_PAGES: u32 = 20;

const ROW_SELECTOR: &str = "div.Box-row";
const OWNER_SELECTOR: &str = "a[data-repository-hovercards-enabled]";
const REPO_SELECTOR: &str = r#"a[data-hovercard-type="repository"]"#;
const PAGINATION_SELECTOR: &str = "div.paginate-container a";

/// One parsed listing page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependentsPage {
    /// `owner/repo` of every dependent listed on the page
    pub repos: Vec<String>,

    /// The next page, if the page links to one
    pub next: Option<Url>,
}

/// Walks the dependents listing of a repository
#[derive(Debug, Clone)]
pub struct DependentsCrawler {
    client: reqwest::Client,
    web_base: String,
}

impl DependentsCrawler {
    /// Create a crawler for the web host at `web_base` (e.g. `https://github.com`).
    ///
    /// Uses its own unauthenticated HTTP client; the API token is never sent to web pages.
    pub fn new(web_base: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .into_app_err("unable to create HTTP client")?;

        Ok(Self {
            client,
            web_base: web_base.into().trim_end_matches('/').to_string(),
        })
    }

    /// Collect dependents across at most `max_pages` pages.
    ///
    /// Stops when a page repeats any already collected repository (that page is
    /// dropped whole) or when there is no next page.
    pub async fn crawl(&self, repo: &RepoSpec, max_pages: u32) -> Result<Vec<String>> {
        let start = format!("{}/{}/network/dependents", self.web_base, repo.path());
        let mut url = Url::parse(&start).into_app_err_with(|| format!("invalid dependents URL '{start}'"))?;

        let mut collected = Vec::new();
        let mut seen = HashSet::new();

        for page_num in 1..=max_pages {
            let html = self.fetch(&url).await?;
            let page = parse_page(&html, &url);
            log::debug!(target: LOG_TARGET, "Page {page_num} of '{repo}' lists {} dependents", page.repos.len());

            if page.repos.iter().any(|r| seen.contains(r)) {
                log::debug!(target: LOG_TARGET, "Page {page_num} of '{repo}' repeats earlier results, stopping");
                break;
            }

            for r in page.repos {
                let _ = seen.insert(r.clone());
                collected.push(r);
            }

            match page.next {
                Some(next) => url = next,
                None => break,
            }
        }

        Ok(collected)
    }

    async fn fetch(&self, url: &Url) -> Result<String> {
        let resp = self.client.get(url.as_str()).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(app_err!("GET {url} failed with HTTP status {}", status.as_u16()));
        }

        resp.text().await.into_app_err_with(|| format!("reading '{url}'"))
    }
}

/// Extract the dependents and the next-page link from one listing page.
#[must_use]
pub fn parse_page(html: &str, page_url: &Url) -> DependentsPage {
    let (Ok(row_sel), Ok(owner_sel), Ok(repo_sel), Ok(pagination_sel)) = (
        Selector::parse(ROW_SELECTOR),
        Selector::parse(OWNER_SELECTOR),
        Selector::parse(REPO_SELECTOR),
        Selector::parse(PAGINATION_SELECTOR),
    ) else {
        return DependentsPage::default();
    };

    let document = Html::parse_document(html);

    let repos = document
        .select(&row_sel)
        .filter_map(|row| {
            let owner = anchor_text(row.select(&owner_sel).next()?);
            let name = anchor_text(row.select(&repo_sel).next()?);
            Some(format!("{owner}/{name}"))
        })
        .collect();

    let anchors: Vec<_> = document.select(&pagination_sel).collect();
    let next_anchor = if anchors.len() > 1 { anchors.get(1) } else { anchors.first() };
    let next = next_anchor
        .and_then(|a| a.value().attr("href"))
        .and_then(|href| page_url.join(href).ok());

    DependentsPage { repos, next }
}

fn anchor_text(anchor: ElementRef<'_>) -> String {
    anchor.text().collect::<String>().trim().to_string()
}
