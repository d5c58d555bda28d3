//! Command-line interface and orchestration for awesome-harvest
//!
//! `run` parses the command line with clap and hands the arguments to the
//! harvest pipeline, which coordinates the rest of the crate:
//!
//! 1. Load configuration and build the GitHub client
//! 2. Fetch, cache, and parse the awesome list
//! 3. Open the CSV outputs and seed the organization memo
//! 4. Enrich every entry, retrying a failed one once
//! 5. Report totals and failed entries
//!
//! Tuning settings come from an optional TOML file (`--config`), falling back
//! to the embedded `default_config.toml`.

mod config;
mod harvest;
mod host;
mod progress_reporter;
mod run;

#[cfg(debug_assertions)]
pub use config::Config;

pub use harvest::{ColorMode, HarvestArgs, LogLevel, harvest};
pub use host::Host;
pub use progress_reporter::ProgressReporter;
pub use run::run;
