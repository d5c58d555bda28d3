//! Output of harvest results
//!
//! - [`CsvSink`] writes the projects and organizations CSV files.
//! - The summary generators render the end-of-run totals and the list of
//!   entries that could not be harvested, optionally colored.

mod csv;
mod summary;

pub use csv::CsvSink;
pub use summary::{RunSummary, generate as generate_summary, generate_failures};
