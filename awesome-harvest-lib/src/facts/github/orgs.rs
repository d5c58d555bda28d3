use super::client::Client;
use super::types::{Organization, SearchRepository, SearchResult};
use crate::Result;

/// Organization profile.
pub async fn organization(client: &Client, login: &str) -> Result<Organization> {
    client.get_json(&format!("/orgs/{login}")).await
}

/// Repositories owned by `login`, most recently updated first.
///
/// Only the first item is requested; `total_count` still covers the whole set.
pub async fn owned_repositories(client: &Client, login: &str) -> Result<SearchResult<SearchRepository>> {
    client
        .get_json(&format!("/search/repositories?q=user:{login}&sort=updated&per_page=1"))
        .await
}
