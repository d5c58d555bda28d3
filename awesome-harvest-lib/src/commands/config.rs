use crate::Result;
use crate::facts::EnrichSettings;
use camino::Utf8Path;
use core::time::Duration;
use ohno::{IntoAppError, app_err};
use serde::{Deserialize, Serialize};
use std::fs;

/// The default configuration TOML content, embedded from `default_config.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_config.toml");

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Pause the run when fewer API requests than this remain
    pub min_remaining_requests: u64,

    /// Maximum number of dependents pages scraped per project
    pub dependents_max_pages: u32,

    /// Closed pull requests sampled for review counts
    pub review_sample_size: u32,

    /// Length of the trailing activity window, in days
    pub activity_window_days: u32,

    /// Extra seconds to wait past the rate limit reset time
    pub rate_limit_buffer_secs: u64,

    /// Timeout applied to every HTTP request, in seconds
    pub request_timeout_secs: u64,

    pub api_base_url: String,

    pub web_base_url: String,
}

impl Config {
    /// Load configuration from a file, or use the defaults when no file is given
    ///
    /// Keys missing from the file keep their values from `default_config.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or fails validation
    pub fn load(config_path: Option<&Utf8Path>) -> Result<Self> {
        let mut table: toml::Table = toml::from_str(DEFAULT_CONFIG_TOML).into_app_err("parsing built-in configuration")?;

        let source = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading configuration file '{path}'"))?;
            let overrides: toml::Table =
                toml::from_str(&text).into_app_err_with(|| format!("parsing configuration file '{path}'"))?;
            table.extend(overrides);
            path.as_str()
        } else {
            "built-in configuration"
        };

        let config: Self = toml::Value::Table(table)
            .try_into()
            .into_app_err_with(|| format!("invalid settings in '{source}'"))?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.review_sample_size == 0 {
            return Err(app_err!("review_sample_size must be at least 1"));
        }

        if self.activity_window_days == 0 {
            return Err(app_err!("activity_window_days must be at least 1"));
        }

        if self.request_timeout_secs == 0 {
            return Err(app_err!("request_timeout_secs must be at least 1"));
        }

        for (name, value) in [("api_base_url", &self.api_base_url), ("web_base_url", &self.web_base_url)] {
            let _ = url::Url::parse(value).into_app_err_with(|| format!("{name} is not a valid URL: '{value}'"))?;
        }

        Ok(())
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    #[must_use]
    pub const fn rate_limit_buffer(&self) -> Duration {
        Duration::from_secs(self.rate_limit_buffer_secs)
    }

    #[must_use]
    pub const fn enrich_settings(&self) -> EnrichSettings {
        EnrichSettings {
            review_sample_size: self.review_sample_size,
            activity_window_days: self.activity_window_days,
            dependents_max_pages: self.dependents_max_pages,
        }
    }
}
