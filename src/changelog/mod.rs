//! Changelog document model
//!
//! A changelog is an ordered list of versions, each holding direct change
//! lines and named subsections:
//!
//! ```text
//! ## HEAD
//!
//! ### Bug Fixes
//!
//!   * Fix the thing (#123)
//!
//! ## 1.2.0 / 2015-01-20
//!
//!   * Release (#120)
//! ```
//!
//! Documents are parsed fresh for every update, mutated once and rendered
//! back, so ordering rests entirely on the version sort key.

mod parse;
mod render;

use crate::error::Result;

/// The pending-release version label
pub const HEAD: &str = "HEAD";

/// A single change bullet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeLine {
    /// Summary text (HTML-escaped when built from a PR title)
    pub summary: String,
    /// Issue/PR reference such as `#1234`
    pub reference: Option<String>,
}

impl ChangeLine {
    /// Create a change line from already-escaped text
    ///
    /// Whitespace runs (newlines included) collapse to single spaces and the
    /// summary is trimmed, so every line renders as one bullet.
    pub fn new(summary: impl AsRef<str>, reference: Option<String>) -> Self {
        Self {
            summary: collapse_whitespace(summary.as_ref()),
            reference,
        }
    }

    /// Change line for a merged pull request; the title is HTML-escaped
    pub fn for_pull_request(title: &str, number: u64) -> Self {
        Self {
            summary: escape_html(&collapse_whitespace(title)),
            reference: Some(format!("#{number}")),
        }
    }

    /// Whether the line carries neither summary nor reference
    pub fn is_empty(&self) -> bool {
        self.summary.trim().is_empty() && self.reference.is_none()
    }
}

/// A named group of change lines within a version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subsection {
    /// Section heading, e.g. "Bug Fixes"
    pub name: String,
    /// Change lines in insertion order
    pub lines: Vec<ChangeLine>,
}

/// One version block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    /// Version label, e.g. `HEAD` or `1.2.0`
    pub label: String,
    /// Release date as written after ` / ` in the header
    pub date: Option<String>,
    /// Change lines listed directly under the version header
    pub lines: Vec<ChangeLine>,
    /// Subsections in insertion order
    pub subsections: Vec<Subsection>,
    sort_key: i64,
}

impl Version {
    fn new(label: &str, sort_key: i64) -> Self {
        Self {
            label: label.to_string(),
            date: None,
            lines: Vec::new(),
            subsections: Vec::new(),
            sort_key,
        }
    }

    /// Find a subsection by name
    pub fn subsection(&self, name: &str) -> Option<&Subsection> {
        self.subsections.iter().find(|s| s.name == name)
    }

    fn subsection_or_create(&mut self, name: &str) -> &mut Subsection {
        let idx = match self.subsections.iter().position(|s| s.name == name) {
            Some(idx) => idx,
            None => {
                self.subsections.push(Subsection {
                    name: name.to_string(),
                    lines: Vec::new(),
                });
                self.subsections.len() - 1
            }
        };
        &mut self.subsections[idx]
    }
}

/// Base sort key by version class: unreleased < HEAD < tagged
fn class_key(label: &str) -> i64 {
    match label.trim() {
        "" => -1,
        HEAD => 0,
        _ => 1,
    }
}

/// An in-memory changelog document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Changelog {
    versions: Vec<Version>,
}

impl Changelog {
    /// Create an empty changelog
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a changelog document; empty input yields an empty changelog
    pub fn parse(text: &str) -> Result<Self> {
        parse::parse(text)
    }

    /// Versions in document order
    pub fn versions(&self) -> &[Version] {
        &self.versions
    }

    /// Find a version by label
    pub fn version(&self, label: &str) -> Option<&Version> {
        self.versions.iter().find(|v| v.label == label)
    }

    /// Find a subsection by version label and name
    pub fn subsection(&self, label: &str, name: &str) -> Option<&Subsection> {
        self.version(label)?.subsection(name)
    }

    /// Find a version by label, creating it in sort order if missing.
    ///
    /// A new tagged version sorts after every existing tagged version.
    pub fn get_or_create_version(&mut self, label: &str) -> &mut Version {
        let idx = match self.versions.iter().position(|v| v.label == label) {
            Some(idx) => idx,
            None => self.insert_version(label),
        };
        &mut self.versions[idx]
    }

    fn insert_version(&mut self, label: &str) -> usize {
        let mut key = class_key(label);
        if key > 0
            && let Some(last) = self.versions.last()
            && last.sort_key > 0
        {
            key = last.sort_key + 1;
        }

        // Equivalent to append + stable sort on an already sorted list
        let idx = self.versions.partition_point(|v| v.sort_key <= key);
        self.versions.insert(idx, Version::new(label, key));
        idx
    }

    /// Find a subsection, creating the version and/or subsection if missing
    pub fn get_or_create_subsection(&mut self, label: &str, name: &str) -> &mut Subsection {
        self.get_or_create_version(label).subsection_or_create(name)
    }

    /// Append a line directly under a version; empty lines are ignored
    pub fn add_line_to_version(&mut self, label: &str, line: ChangeLine) {
        if line.is_empty() {
            return;
        }
        self.get_or_create_version(label).lines.push(line);
    }

    /// Append a line to a version's subsection; empty lines are ignored
    pub fn add_line_to_subsection(&mut self, label: &str, name: &str, line: ChangeLine) {
        if line.is_empty() {
            return;
        }
        self.get_or_create_subsection(label, name).lines.push(line);
    }
}

/// Record a merged pull request under `HEAD` and render the result.
///
/// With no `section` the line goes directly under `HEAD`; otherwise it goes
/// into that `HEAD` subsection.
pub fn add_merge_reference(
    contents: &str,
    section: Option<&str>,
    title: &str,
    number: u64,
) -> Result<String> {
    let mut changelog = Changelog::parse(contents)?;
    let line = ChangeLine::for_pull_request(title, number);

    match section {
        Some(name) => changelog.add_line_to_subsection(HEAD, name, line),
        None => changelog.add_line_to_version(HEAD, line),
    }

    Ok(changelog.to_string())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Escape text for inclusion in Markdown that may be rendered as HTML
fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&#39;"),
            '"' => out.push_str("&#34;"),
            _ => out.push(c),
        }
    }
    out
}
