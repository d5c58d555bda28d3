//! Scholarly references mentioned in a README

use regex::Regex;
use url::Url;

/// Parentheses are allowed when balanced, as in `10.1002/(SICI)...` DOIs.
const URL_PATTERN: &str = r#"https?://(?:[^\s()<>\[\]{}"'`]|\([^\s()<>\[\]{}"'`]*\))+"#;
const REFERENCE_HOSTS: [&str; 4] = ["doi.org", "zenodo.org", "theoj.org", "arxiv.org"];

/// Every DOI, Zenodo, JOSS, or arXiv link in `text`, in order of appearance.
///
/// Badge images (any URL mentioning "svg") are excluded.
#[must_use]
pub fn extract_references(text: &str) -> Vec<String> {
    let Ok(url_re) = Regex::new(URL_PATTERN) else {
        return Vec::new();
    };

    url_re
        .find_iter(text)
        .map(|m| m.as_str().trim_end_matches(['.', ',', ';', ':', '!', '?', '*', '_']))
        .filter(|candidate| !candidate.contains("svg"))
        .filter(|candidate| {
            Url::parse(candidate)
                .ok()
                .and_then(|u| u.host_str().map(|h| REFERENCE_HOSTS.contains(&h)))
                .unwrap_or(false)
        })
        .map(str::to_string)
        .collect()
}
