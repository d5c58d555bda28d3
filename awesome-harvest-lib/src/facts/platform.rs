use strum::Display;
use url::Url;

/// Where an awesome-list entry is hosted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Platform {
    GitHub,
    GitLab,
    Custom,
}

impl Platform {
    /// Classify an entry URL by its exact host; unparseable URLs are `Custom`.
    #[must_use]
    pub fn from_url(url: &str) -> Self {
        match Url::parse(url).ok().as_ref().and_then(Url::host_str) {
            Some("github.com") => Self::GitHub,
            Some("gitlab.com") => Self::GitLab,
            _ => Self::Custom,
        }
    }
}

/// The directory part of a URL's path: `group/sub` for `https://host/group/sub/proj/`.
#[must_use]
pub fn url_namespace(url: &str) -> String {
    let path = Url::parse(url).map(|u| u.path().to_string()).unwrap_or_default();
    let trimmed = path.trim_matches('/');

    trimmed.rsplit_once('/').map(|(dir, _)| dir.to_string()).unwrap_or_default()
}
