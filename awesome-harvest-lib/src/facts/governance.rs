//! Community health signals found in a repository's file layout

use crate::Result;
use ohno::{IntoAppError, bail};
use serde_yaml::Value;

/// Path of the GitHub sponsorship file
pub const FUNDING_FILE: &str = ".github/FUNDING.yml";

/// Presence of community documents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Governance {
    pub code_of_conduct: bool,
    pub contribution_guide: bool,
}

impl Governance {
    /// Look for code-of-conduct and contributing documents among `paths`, ignoring case.
    pub fn scan<'a>(paths: impl IntoIterator<Item = &'a str>) -> Self {
        paths.into_iter().fold(Self::default(), |mut acc, path| {
            let lower = path.to_lowercase();
            acc.code_of_conduct |= lower.contains("code_of_conduct");
            acc.contribution_guide |= lower.contains("contributing");
            acc
        })
    }
}

/// The funding platform names declared in a `FUNDING.yml` document, in file order.
pub fn funding_platforms(yaml: &str) -> Result<Vec<String>> {
    let doc: Value = serde_yaml::from_str(yaml).into_app_err("parsing FUNDING.yml")?;

    let Value::Mapping(mapping) = doc else {
        bail!("FUNDING.yml is not a mapping");
    };

    Ok(mapping
        .keys()
        .filter_map(|k| match k {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
        .collect())
}
