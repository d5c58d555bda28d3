use crate::Result;
use core::fmt::{Display, Formatter};
use ohno::bail;
use url::Url;

/// The `owner/name` pair identifying a GitHub repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoSpec {
    owner: String,
    repo: String,
}

impl RepoSpec {
    /// Take the first two path segments of a repository URL as owner and name.
    pub fn parse(url: &Url) -> Result<Self> {
        let segments: Vec<_> = url.path_segments().map(Iterator::collect).unwrap_or_default();

        if segments.len() < 2 {
            bail!("invalid repository URL format: {url}");
        }

        if segments[0].is_empty() || segments[1].is_empty() {
            bail!("invalid repository URL: empty owner or repo name: {url}");
        }

        Ok(Self::new(segments[0], segments[1].trim_end_matches(".git")))
    }

    /// Parse a URL string, as found in an awesome-list entry.
    pub fn parse_str(url: &str) -> Result<Self> {
        match Url::parse(url) {
            Ok(url) => Self::parse(&url),
            Err(e) => bail!("invalid repository URL '{url}': {e}"),
        }
    }

    #[must_use]
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    #[must_use]
    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// `owner/name`
    #[must_use]
    pub fn path(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    /// API path prefix for this repository, e.g. `/repos/acme/foo`
    #[must_use]
    pub fn api_path(&self) -> String {
        format!("/repos/{}/{}", self.owner, self.repo)
    }
}

impl Display for RepoSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}
