use super::parser;
use crate::Result;
use camino::Utf8Path;
use ohno::IntoAppError;
use std::fs;

/// One project listed in the awesome list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub url: String,

    /// Raw description line following the link, e.g. `- A tool for X`
    pub text: String,
}

impl Entry {
    #[must_use]
    pub fn new(name: impl Into<String>, url: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            text: text.into(),
        }
    }

    /// The description with its two-character list-marker prefix removed.
    #[must_use]
    pub fn oneliner(&self) -> String {
        self.text.chars().skip(2).collect()
    }
}

/// A named section of the awesome list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rubric {
    pub key: String,
    pub entries: Vec<Entry>,
}

impl Rubric {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            entries: Vec::new(),
        }
    }
}

/// The parsed awesome list, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AwesomeList {
    rubrics: Vec<Rubric>,
}

impl AwesomeList {
    #[must_use]
    pub fn parse(markdown: &str) -> Self {
        Self {
            rubrics: parser::parse_rubrics(markdown),
        }
    }

    pub fn from_file(path: &Utf8Path) -> Result<Self> {
        let markdown = fs::read_to_string(path).into_app_err_with(|| format!("reading awesome list '{path}'"))?;
        Ok(Self::parse(&markdown))
    }

    #[must_use]
    pub fn rubrics(&self) -> &[Rubric] {
        &self.rubrics
    }

    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.rubrics.iter().map(|r| r.entries.len()).sum()
    }

    /// Iterate over every entry together with the rubric it belongs to.
    pub fn entries(&self) -> impl Iterator<Item = (&Rubric, &Entry)> {
        self.rubrics.iter().flat_map(|rubric| rubric.entries.iter().map(move |entry| (rubric, entry)))
    }
}
