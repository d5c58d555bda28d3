//! Markdown to rubric/entry parsing
//!
//! Every heading of level two or deeper opens a rubric. Link list items inside a
//! rubric become entries; in-page anchor links (table of contents) are skipped.

use super::{Entry, Rubric};
use regex::Regex;

const HEADING_PATTERN: &str = r"^(#{1,6})\s+(.+?)\s*#*\s*$";
const ENTRY_PATTERN: &str = r"^\s*[-*+]\s+\[(?P<name>[^\]]+)\]\((?P<url>(?:[^()\s]|\([^()\s]*\))+)\)(?P<rest>.*)$";

pub fn parse_rubrics(markdown: &str) -> Vec<Rubric> {
    let (Ok(heading_re), Ok(entry_re)) = (Regex::new(HEADING_PATTERN), Regex::new(ENTRY_PATTERN)) else {
        return Vec::new();
    };

    let mut rubrics: Vec<Rubric> = Vec::new();
    let mut current: Option<Rubric> = None;

    for line in markdown.lines() {
        if let Some(caps) = heading_re.captures(line) {
            if let Some(done) = current.take() {
                rubrics.push(done);
            }

            if caps[1].len() >= 2 {
                current = Some(Rubric::new(caps[2].trim()));
            }
            continue;
        }

        let Some(rubric) = current.as_mut() else {
            continue;
        };

        if let Some(caps) = entry_re.captures(line) {
            let url = caps["url"].trim();
            if url.starts_with('#') {
                continue;
            }

            rubric.entries.push(Entry::new(caps["name"].trim(), url, caps["rest"].trim()));
        }
    }

    if let Some(done) = current {
        rubrics.push(done);
    }

    rubrics.retain(|r| !r.entries.is_empty());
    rubrics
}
