use core::fmt::Write;
use owo_colors::OwoColorize;

/// Outcome of a harvest run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub projects_written: usize,
    pub organizations_written: usize,

    /// URLs of entries that failed twice and were skipped
    pub failures: Vec<String>,
}

/// Render the end-of-run totals.
pub fn generate<W: Write>(summary: &RunSummary, use_colors: bool, writer: &mut W) -> core::fmt::Result {
    let headline = "Harvest complete";
    if use_colors {
        write!(writer, "{}", headline.green().bold())?;
    } else {
        write!(writer, "{headline}")?;
    }

    writeln!(
        writer,
        ": {} projects written, {} new organizations.",
        summary.projects_written, summary.organizations_written
    )
}

/// Render the list of entries that could not be harvested; empty when nothing failed.
pub fn generate_failures<W: Write>(summary: &RunSummary, use_colors: bool, writer: &mut W) -> core::fmt::Result {
    if summary.failures.is_empty() {
        return Ok(());
    }

    let heading = format!("Unable to gather information for {} project(s):", summary.failures.len());
    if use_colors {
        writeln!(writer, "{}", heading.red().bold())?;
    } else {
        writeln!(writer, "{heading}")?;
    }

    for url in &summary.failures {
        writeln!(writer, "  {url}")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(failures: &[&str]) -> RunSummary {
        RunSummary {
            projects_written: 3,
            organizations_written: 1,
            failures: failures.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn test_generate_plain() {
        let mut out = String::new();
        generate(&summary(&[]), false, &mut out).unwrap();
        assert_eq!(out, "Harvest complete: 3 projects written, 1 new organizations.\n");
    }

    #[test]
    fn test_generate_colored_contains_escape_codes() {
        let mut out = String::new();
        generate(&summary(&[]), true, &mut out).unwrap();
        assert!(out.contains("\u{1b}["));
        assert!(out.contains("3 projects written"));
    }

    #[test]
    fn test_no_failures_renders_nothing() {
        let mut out = String::new();
        generate_failures(&summary(&[]), false, &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_failures_listed() {
        let mut out = String::new();
        generate_failures(&summary(&["https://github.com/acme/broken"]), false, &mut out).unwrap();
        assert_eq!(
            out,
            "Unable to gather information for 1 project(s):\n  https://github.com/acme/broken\n"
        );
    }
}
