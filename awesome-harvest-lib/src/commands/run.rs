//! Command-line entry point for awesome-harvest

use super::harvest::{HarvestArgs, harvest};
use crate::{Host, Result};
use clap::Parser;
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "awesome-harvest", version, author, long_about = None)]
#[command(about = "Enrich the projects of an awesome list with GitHub data and export them to CSV")]
#[command(styles = CLAP_STYLES)]
struct Cli {
    #[command(flatten)]
    harvest: HarvestArgs,
}

/// Parse the command line and run the harvest
///
/// # Arguments
///
/// * `args` - An iterator of command-line arguments (typically from `std::env::args()`)
///
/// # Errors
///
/// Returns an error if setup fails: missing credential, unreadable awesome list,
/// or unwritable outputs. Failures of individual entries are reported, not returned.
pub async fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    let cli = Cli::parse_from(args);
    harvest(host, &cli.harvest).await
}
