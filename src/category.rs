//! Changelog categories
//!
//! Maps the category phrase of a merge command (`+bug fix`) to a slug, the
//! changelog section the pull request is listed under, and the labels applied
//! to it. Unknown slugs pass through unchanged everywhere: callers treat a
//! slug with no category as "no section heading match, nothing to label".

/// A changelog category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    /// Command token stem matched against normalized phrases
    pub prefix: &'static str,
    /// Normalized category key
    pub slug: &'static str,
    /// Changelog section heading
    pub section: &'static str,
    /// Labels applied on merge
    pub labels: &'static [&'static str],
}

/// Slug that explicitly asks for no changelog section
pub const SECTION_NONE: &str = "none";

/// Known categories. Order matters: normalization takes the first prefix match.
pub const CATEGORIES: &[Category] = &[
    Category {
        prefix: "major",
        slug: "major-enhancements",
        section: "Major Enhancements",
        labels: &["feature"],
    },
    Category {
        prefix: "minor",
        slug: "minor-enhancements",
        section: "Minor Enhancements",
        labels: &["enhancement"],
    },
    Category {
        prefix: "bug",
        slug: "bug-fixes",
        section: "Bug Fixes",
        labels: &["bug", "fix"],
    },
    Category {
        prefix: "fix",
        slug: "fix",
        section: "Bug Fixes",
        labels: &["bug", "fix"],
    },
    Category {
        prefix: "dev",
        slug: "development-fixes",
        section: "Development Fixes",
        labels: &["internal", "fix"],
    },
    Category {
        prefix: "doc",
        slug: "documentation",
        section: "Documentation",
        labels: &["documentation"],
    },
    Category {
        prefix: "port",
        slug: "forward-ports",
        section: "Forward Ports",
        labels: &["forward-port"],
    },
    Category {
        prefix: "site",
        slug: "site-enhancements",
        section: "Site Enhancements",
        labels: &["documentation"],
    },
];

/// Lower-case a phrase and join its words with hyphens
pub fn downcase_and_hyphenize(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Normalize a raw category phrase to a slug.
///
/// Returns the slug of the first category whose prefix starts the hyphenized
/// phrase, or the hyphenized phrase itself when nothing matches.
pub fn normalize(raw: &str) -> String {
    let token = downcase_and_hyphenize(raw);
    CATEGORIES
        .iter()
        .find(|c| token.starts_with(c.prefix))
        .map_or(token, |c| c.slug.to_string())
}

/// Changelog section for a slug, or the slug itself if it is unknown
pub fn section_for(slug: &str) -> &str {
    CATEGORIES
        .iter()
        .find(|c| c.slug == slug)
        .map_or(slug, |c| c.section)
}

/// Changelog section for an optional command slug.
///
/// No slug, an empty slug, or the explicit slug `none` mean "no section":
/// the entry goes directly under the version header.
pub fn changelog_section(slug: Option<&str>) -> Option<String> {
    slug.filter(|s| !s.is_empty() && *s != SECTION_NONE)
        .map(|s| section_for(s).to_string())
}

/// Labels for a changelog section; empty if the section is unknown
pub fn labels_for(section: &str) -> Vec<String> {
    CATEGORIES
        .iter()
        .find(|c| c.section == section)
        .map(|c| c.labels.iter().map(|l| (*l).to_string()).collect())
        .unwrap_or_default()
}
