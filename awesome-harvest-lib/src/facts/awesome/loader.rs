use super::AwesomeList;
use crate::Result;
use crate::facts::RepoSpec;
use crate::facts::github::Client;
use crate::facts::github::types::FileContent;
use camino::Utf8Path;
use ohno::{EnrichableExt, IntoAppError};
use std::fs;

const LOG_TARGET: &str = "   awesome";

/// Fetch the awesome list's Markdown, cache it locally, and parse the cached copy.
///
/// The cache is always overwritten; a failed fetch is fatal rather than
/// falling back to a stale copy.
pub async fn load_awesome_list(
    client: &Client,
    source: &RepoSpec,
    filename: &str,
    cache_path: &Utf8Path,
) -> Result<AwesomeList> {
    log::info!(target: LOG_TARGET, "Fetching '{filename}' from '{source}'");

    let file: FileContent = client
        .get_json(&format!("{}/contents/{filename}", source.api_path()))
        .await
        .map_err(|e| e.enrich_with(|| format!("could not fetch '{filename}' from '{source}'")))?;

    let markdown = file
        .decode()
        .map_err(|e| e.enrich_with(|| format!("could not decode '{filename}' from '{source}'")))?;

    if let Some(parent) = cache_path.parent()
        && !parent.as_str().is_empty()
    {
        fs::create_dir_all(parent).into_app_err_with(|| format!("creating cache directory '{parent}'"))?;
    }

    fs::write(cache_path, &markdown).into_app_err_with(|| format!("writing cache file '{cache_path}'"))?;
    log::debug!(target: LOG_TARGET, "Cached {} bytes at '{cache_path}'", markdown.len());

    AwesomeList::from_file(cache_path)
}
