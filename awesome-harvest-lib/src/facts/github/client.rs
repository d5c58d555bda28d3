//! GitHub REST API client
//!
//! Thin wrapper over `reqwest` that authenticates every request, classifies
//! responses, and exposes the pagination tricks the enrichment relies on.

use super::types::RateLimitResponse;
use crate::Result;
use chrono::{DateTime, Utc};
use core::time::Duration;
use ohno::{EnrichableExt, IntoAppError, app_err, bail};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, LINK};
use serde::de::DeserializeOwned;
use url::Url;

const LOG_TARGET: &str = "    github";
const USER_AGENT: &str = "awesome-harvest";
const DEFAULT_ACCEPT: &str = "application/vnd.github+json";

/// Rate limit information, from response headers or the `/rate_limit` endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitInfo {
    pub remaining: u64,
    pub limit: u64,
    pub reset_at: DateTime<Utc>,
}

/// Result of a GitHub API call
#[derive(Debug)]
pub enum ApiResult {
    /// Request succeeded
    Success(reqwest::Response),

    /// The requested resource does not exist (404)
    NotFound,

    /// Quota exhausted
    RateLimited(Option<RateLimitInfo>),

    /// Any other failure
    Failed(ohno::AppError),
}

/// GitHub API client
#[derive(Debug, Clone)]
#[expect(clippy::struct_field_names, reason = "client field stores the underlying HTTP client")]
pub struct Client {
    client: reqwest::Client,
    base_url: String,
}

impl Client {
    /// Create a new client authenticated with `token` against the given API base URL.
    pub fn new(token: &str, base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let mut auth_val = HeaderValue::from_str(&format!("token {token}"))?;
        auth_val.set_sensitive(true);

        let mut headers = HeaderMap::new();
        let _ = headers.insert(AUTHORIZATION, auth_val);
        let _ = headers.insert(ACCEPT, HeaderValue::from_static(DEFAULT_ACCEPT));

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Make an API call and classify the result
    pub async fn api_call(&self, path: &str, accept: Option<&str>) -> ApiResult {
        let url = format!("{}{path}", self.base_url);
        log::trace!(target: LOG_TARGET, "GET {url}");

        let mut request = self.client.get(&url);
        if let Some(accept) = accept {
            request = request.header(ACCEPT, accept);
        }

        let resp = match request.send().await {
            Ok(r) => r,
            Err(e) => return ApiResult::Failed(e.into()),
        };

        let status = resp.status();
        if status.is_success() {
            return ApiResult::Success(resp);
        }

        let rate_limit = extract_rate_limit_from_headers(resp.headers());
        match status.as_u16() {
            429 => ApiResult::RateLimited(rate_limit),
            403 if rate_limit.is_some_and(|r| r.remaining == 0) => ApiResult::RateLimited(rate_limit),
            404 => ApiResult::NotFound,
            code => ApiResult::Failed(app_err!("GET {url} failed with HTTP status {code}")),
        }
    }

    /// GET `path`, treating anything but success as an error.
    pub async fn get_response(&self, path: &str) -> Result<reqwest::Response> {
        self.get_response_as(path, None).await
    }

    /// GET `path` with an optional custom media type.
    pub async fn get_response_as(&self, path: &str, accept: Option<&str>) -> Result<reqwest::Response> {
        match self.api_call(path, accept).await {
            ApiResult::Success(resp) => Ok(resp),
            ApiResult::NotFound => bail!("GitHub resource '{path}' not found"),
            ApiResult::RateLimited(Some(info)) => {
                bail!("GitHub rate limit exhausted while fetching '{path}' (resets at {})", info.reset_at)
            }
            ApiResult::RateLimited(None) => bail!("GitHub rate limit exhausted while fetching '{path}'"),
            ApiResult::Failed(e) => Err(e),
        }
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let resp = self.get_response(path).await?;
        resp.json::<T>().await.into_app_err_with(|| format!("parsing response from '{path}'"))
    }

    /// GET `path` with a custom media type and deserialize the body.
    pub async fn get_json_as<T: DeserializeOwned>(&self, path: &str, accept: &str) -> Result<T> {
        let resp = self.get_response_as(path, Some(accept)).await?;
        resp.json::<T>().await.into_app_err_with(|| format!("parsing response from '{path}'"))
    }

    /// Like [`Self::get_json`], but a 404 yields `None`.
    pub async fn get_optional_json<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        match self.api_call(path, None).await {
            ApiResult::Success(resp) => {
                let value = resp
                    .json::<T>()
                    .await
                    .into_app_err_with(|| format!("parsing response from '{path}'"))?;
                Ok(Some(value))
            }
            ApiResult::NotFound => Ok(None),
            ApiResult::RateLimited(_) => bail!("GitHub rate limit exhausted while fetching '{path}'"),
            ApiResult::Failed(e) => Err(e),
        }
    }

    /// Count the items of a list endpoint without paging through it.
    ///
    /// Requests one item per page and reads the page number of the `rel="last"`
    /// link; without a `Link` header every item fits on the single page.
    pub async fn count(&self, path: &str) -> Result<u64> {
        let resp = self.get_response(&with_query(path, "per_page=1")).await?;

        if let Some(last) = resp
            .headers()
            .get(LINK)
            .and_then(|h| h.to_str().ok())
            .and_then(last_page_from_link)
        {
            return Ok(last);
        }

        let items: Vec<serde_json::Value> = resp
            .json()
            .await
            .into_app_err_with(|| format!("parsing list response from '{path}'"))?;
        Ok(items.len() as u64)
    }

    /// Current core quota
    pub async fn rate_limit(&self) -> Result<RateLimitInfo> {
        let resp: RateLimitResponse = self
            .get_json("/rate_limit")
            .await
            .map_err(|e| e.enrich_with(|| "querying rate limit".to_string()))?;

        let core = resp.resources.core;
        let Some(reset_at) = DateTime::from_timestamp(core.reset, 0) else {
            bail!("invalid rate limit reset timestamp {}", core.reset);
        };

        Ok(RateLimitInfo {
            remaining: core.remaining,
            limit: core.limit,
            reset_at,
        })
    }
}

/// Append a query parameter to a path that may already carry a query string.
#[must_use]
pub fn with_query(path: &str, param: &str) -> String {
    if path.contains('?') {
        format!("{path}&{param}")
    } else {
        format!("{path}?{param}")
    }
}

/// Extract the `page` number from the `rel="last"` entry of a `Link` header.
#[must_use]
pub fn last_page_from_link(header: &str) -> Option<u64> {
    header
        .split(',')
        .find(|part| part.contains(r#"rel="last""#))
        .and_then(|part| {
            let start = part.find('<')? + 1;
            let end = part.find('>')?;
            part.get(start..end)
        })
        .and_then(|target| Url::parse(target).ok())
        .and_then(|url| url.query_pairs().find(|(k, _)| k == "page").and_then(|(_, v)| v.parse().ok()))
}

/// Extract rate limit information from API response headers
#[must_use]
pub fn extract_rate_limit_from_headers(headers: &HeaderMap) -> Option<RateLimitInfo> {
    let remaining = headers.get("x-ratelimit-remaining")?.to_str().ok()?.parse::<u64>().ok()?;
    let limit = headers
        .get("x-ratelimit-limit")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_default();
    let reset_timestamp = headers.get("x-ratelimit-reset")?.to_str().ok()?.parse::<i64>().ok()?;
    let reset_at = DateTime::from_timestamp(reset_timestamp, 0)?;

    Some(RateLimitInfo { remaining, limit, reset_at })
}
