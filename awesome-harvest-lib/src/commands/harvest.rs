//! The harvest pipeline
//!
//! Loads the awesome list, opens the CSV outputs, then walks every entry in
//! document order: wait for API quota, enrich, write. Setup failures abort the
//! run; failures of single entries are retried once and then reported at the end.

use super::ProgressReporter;
use super::config::Config;
use crate::facts::awesome::load_awesome_list;
use crate::facts::github::Client;
use crate::facts::{
    DependentsCrawler, Enricher, Platform, Progress, ProjectRecord, RateGuard, RepoSpec, RetryState,
    with_single_retry,
};
use crate::reports::{CsvSink, RunSummary, generate_failures, generate_summary};
use crate::{Host, Result};
use camino::Utf8PathBuf;
use chrono::Utc;
use clap::{Args, ValueEnum};
use ohno::bail;
use std::io::{IsTerminal, Write, stderr, stdout};

const LOG_TARGET: &str = "   harvest";

/// Color mode configuration for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Always use colors
    Always,

    /// Never use colors
    Never,

    /// Use colors if the output is a terminal, otherwise don't use colors
    Auto,
}

impl ColorMode {
    fn enabled(self, is_terminal: bool) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => is_terminal,
        }
    }
}

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    None,

    /// Only error messages
    Error,

    /// Warning and error messages
    Warn,

    /// Info, warning, and error messages
    Info,

    /// Debug, info, warning, and error messages
    Debug,

    /// Trace, debug, info, warning, and error messages
    Trace,
}

#[derive(Args, Debug)]
pub struct HarvestArgs {
    /// Repository holding the awesome list
    #[arg(
        long,
        value_name = "URL",
        default_value = "https://github.com/protontypes/open-sustainable-technology"
    )]
    pub awesome_repo_url: String,

    /// Markdown file of the awesome list within its repository
    #[arg(long, value_name = "NAME", default_value = "README.md")]
    pub awesome_readme_filename: String,

    /// Where the fetched awesome list is cached
    #[arg(long, value_name = "PATH", default_value = "./.awesome-cache.md")]
    pub local_readme_path: Utf8PathBuf,

    /// Output file for project rows (rewritten every run)
    #[arg(long, value_name = "PATH", default_value = "./csv/projects.csv")]
    pub projects_csv_path: Utf8PathBuf,

    /// Output file for organization rows (extended across runs)
    #[arg(long, value_name = "PATH", default_value = "./csv/github_organizations.csv")]
    pub orgs_csv_path: Utf8PathBuf,

    /// GitHub personal access token
    #[arg(long, value_name = "TOKEN", env = "GITHUB_API_KEY", hide_env_values = true)]
    pub github_api_key: Option<String>,

    /// Path to a TOML file overriding the default tuning settings
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none")]
    pub log_level: LogLevel,

    /// Control when to use colored output
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: ColorMode,
}

/// Run the whole pipeline.
pub async fn harvest<H: Host>(host: &mut H, args: &HarvestArgs) -> Result<()> {
    init_logging(args.log_level);

    let Some(token) = args.github_api_key.as_deref().filter(|t| !t.trim().is_empty()) else {
        let _ = writeln!(
            host.error(),
            "A GitHub API key is required: pass --github-api-key or set GITHUB_API_KEY"
        );
        bail!("no GitHub API key provided");
    };

    let config = Config::load(args.config.as_deref())?;
    let client = Client::new(token, config.api_base_url.as_str(), config.request_timeout())?;
    let crawler = DependentsCrawler::new(config.web_base_url.as_str(), config.request_timeout())?;
    let guard = RateGuard::new(config.min_remaining_requests, config.rate_limit_buffer());
    let enricher = Enricher::new(&client, &crawler, config.enrich_settings());

    let _ = writeln!(host.output(), "Starting harvest of {}", args.awesome_repo_url);

    let _ = writeln!(host.output(), "Step 1: Fetching and parsing Awesome list README...");
    let source = RepoSpec::parse_str(&args.awesome_repo_url)?;
    let list = load_awesome_list(&client, &source, &args.awesome_readme_filename, &args.local_readme_path).await?;
    let _ = writeln!(
        host.output(),
        "Found {} projects in {} rubrics.",
        list.entry_count(),
        list.rubrics().len()
    );

    let _ = writeln!(host.output(), "Step 2: Initializing CSV output files...");
    let (mut sink, mut memo) = CsvSink::open(&args.projects_csv_path, &args.orgs_csv_path)?;

    let _ = writeln!(host.output(), "Step 3: Processing projects...");
    let progress = ProgressReporter::new(
        stderr().is_terminal() && args.log_level == LogLevel::None,
        args.color.enabled(stderr().is_terminal()),
    );
    progress.set_phase("Processing");
    progress.set_length(list.entry_count() as u64);

    let mut summary = RunSummary::default();

    for (rubric, entry) in list.entries() {
        progress.set_message(&format!("Processing: {}", entry.name));
        let platform = Platform::from_url(&entry.url);
        log::info!(target: LOG_TARGET, "Processing '{}' ({}) as a {platform} project", entry.name, entry.url);

        let record = if platform == Platform::GitHub {
            let outcome = {
                let (guard, client, enricher, memo, progress) = (&guard, &client, &enricher, &memo, &progress);
                with_single_retry(move |state| async move {
                    if state == RetryState::Retrying {
                        log::info!(target: LOG_TARGET, "Retrying '{}'", entry.url);
                    }
                    guard.wait_if_needed(client, progress).await?;
                    enricher.enrich(entry, &rubric.key, memo, Utc::now()).await
                })
                .await
            };

            match outcome {
                Ok(enrichment) => {
                    if let Some(org) = enrichment.new_organization
                        && !memo.contains(&org.organization_user_name)
                    {
                        sink.write_organization(&org)?;
                        let _ = memo.insert(org);
                        summary.organizations_written += 1;
                    }
                    Some(enrichment.project)
                }
                Err(e) => {
                    log::error!(target: LOG_TARGET, "Giving up on '{}': {e:#}", entry.url);
                    summary.failures.push(entry.url.clone());
                    None
                }
            }
        } else {
            Some(ProjectRecord::minimal(entry, &rubric.key, platform))
        };

        if let Some(record) = record {
            sink.write_project(&record)?;
            summary.projects_written += 1;
        }

        progress.advance();
    }

    progress.done();
    sink.finish()?;

    report(host, &summary, args.color);
    Ok(())
}

fn report<H: Host>(host: &mut H, summary: &RunSummary, color: ColorMode) {
    let mut text = String::new();
    if generate_summary(summary, color.enabled(stdout().is_terminal()), &mut text).is_ok() {
        let _ = write!(host.output(), "{text}");
    }

    let mut text = String::new();
    if generate_failures(summary, color.enabled(stderr().is_terminal()), &mut text).is_ok() {
        let _ = write!(host.error(), "{text}");
    }
}

/// Initialize logger based on log level
fn init_logging(log_level: LogLevel) {
    let level = match log_level {
        LogLevel::None => return,
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    };

    let env = env_logger::Env::default().filter_or("RUST_LOG", level);

    // A logger may already be installed when the pipeline runs more than once in a process.
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(matches!(log_level, LogLevel::Debug | LogLevel::Trace))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::host::TestHost;

    fn args(key: Option<&str>) -> HarvestArgs {
        HarvestArgs {
            awesome_repo_url: "https://github.com/acme/awesome".to_string(),
            awesome_readme_filename: "README.md".to_string(),
            local_readme_path: Utf8PathBuf::from("unused.md"),
            projects_csv_path: Utf8PathBuf::from("unused/projects.csv"),
            orgs_csv_path: Utf8PathBuf::from("unused/orgs.csv"),
            github_api_key: key.map(str::to_string),
            config: None,
            log_level: LogLevel::None,
            color: ColorMode::Never,
        }
    }

    #[test]
    fn test_color_mode() {
        assert!(ColorMode::Always.enabled(false));
        assert!(!ColorMode::Never.enabled(true));
        assert!(ColorMode::Auto.enabled(true));
        assert!(!ColorMode::Auto.enabled(false));
    }

    #[tokio::test]
    async fn test_missing_key_fails() {
        let mut host = TestHost::new();
        let result = harvest(&mut host, &args(None)).await;

        let _ = result.unwrap_err();
        assert!(host.error_text().contains("GitHub API key is required"));
        assert!(host.output_text().is_empty());
    }

    #[tokio::test]
    async fn test_blank_key_fails() {
        let mut host = TestHost::new();
        let _ = harvest(&mut host, &args(Some("  "))).await.unwrap_err();
        assert!(host.error_text().contains("GitHub API key is required"));
    }

    #[test]
    fn test_report_lists_failures_on_error_stream() {
        let mut host = TestHost::new();
        let summary = RunSummary {
            projects_written: 2,
            organizations_written: 0,
            failures: vec!["https://github.com/acme/broken".to_string()],
        };

        report(&mut host, &summary, ColorMode::Never);

        assert!(host.output_text().contains("2 projects written"));
        assert!(host.error_text().contains("https://github.com/acme/broken"));
    }
}
