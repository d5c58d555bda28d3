#![doc(hidden)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core library for awesome-harvest
//!
//! This library holds all functionality of the awesome-harvest tool, which reads a
//! curated "awesome list", enriches every listed project with activity data from
//! GitHub, and writes the results to CSV files.
//!
//! # Module Organization
//!
//! - [`commands`]: Command-line interface and the pipeline driver
//! - [`facts`]: Awesome-list loading, GitHub queries, and per-project enrichment
//! - [`reports`]: CSV output

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

#[cfg(any(debug_assertions, test))]
pub mod commands;
#[cfg(not(any(debug_assertions, test)))]
mod commands;

#[cfg(any(debug_assertions, test))]
pub mod facts;
#[cfg(not(any(debug_assertions, test)))]
mod facts;

#[cfg(any(debug_assertions, test))]
pub mod reports;
#[cfg(not(any(debug_assertions, test)))]
mod reports;

pub use crate::commands::{Host, run};
