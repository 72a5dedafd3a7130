//! Changelog parsing

use super::{ChangeLine, Changelog};
use crate::error::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;

static VERSION_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^##[ \t]+(.*?)(?:[ \t]+/[ \t]+(\S.*?))?[ \t]*$").expect("version header pattern")
});

static SUBSECTION_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^###[ \t]+(.*?)[ \t]*$").expect("subsection header pattern"));

static BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*[*-](?:[ \t]+(.*?))?[ \t]*$").expect("bullet pattern"));

static TRAILING_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(.*?)[ \t]+)?\(((?:[\w.-]+/[\w.-]+)?#\d+|@[\w-]+)\)$")
        .expect("reference pattern")
});

/// Where the next change line belongs
enum Cursor {
    /// Before the first version header
    Start,
    /// Directly under a version
    Version(String),
    /// Inside a version's subsection
    Subsection(String, String),
}

fn change_line(text: &str) -> ChangeLine {
    TRAILING_REFERENCE.captures(text).map_or_else(
        || ChangeLine::new(text, None),
        |caps| {
            let summary = caps.get(1).map_or("", |m| m.as_str());
            ChangeLine::new(summary, Some(caps[2].to_string()))
        },
    )
}

pub(super) fn parse(text: &str) -> Result<Changelog> {
    let mut changelog = Changelog::new();
    let mut cursor = Cursor::Start;
    // Whether the previous non-blank line was a bullet (continuations attach to it)
    let mut in_bullet = false;

    for (idx, raw) in text.lines().enumerate() {
        let unrecognized = || Error::ChangelogParse {
            line: idx + 1,
            content: raw.to_string(),
        };

        if raw.trim().is_empty() {
            in_bullet = false;
            continue;
        }

        if let Some(caps) = SUBSECTION_HEADER.captures(raw) {
            let (Cursor::Version(label) | Cursor::Subsection(label, _)) = &cursor else {
                return Err(unrecognized());
            };
            let label = label.clone();
            let name = caps[1].to_string();
            changelog.get_or_create_subsection(&label, &name);
            cursor = Cursor::Subsection(label, name);
            in_bullet = false;
            continue;
        }

        if let Some(caps) = VERSION_HEADER.captures(raw) {
            let label = caps[1].to_string();
            let version = changelog.get_or_create_version(&label);
            if let Some(date) = caps.get(2) {
                version.date = Some(date.as_str().to_string());
            }
            cursor = Cursor::Version(label);
            in_bullet = false;
            continue;
        }

        if let Some(caps) = BULLET.captures(raw) {
            let line = change_line(caps.get(1).map_or("", |m| m.as_str()));
            match &cursor {
                Cursor::Start => return Err(unrecognized()),
                Cursor::Version(label) => changelog.get_or_create_version(label).lines.push(line),
                Cursor::Subsection(label, name) => changelog
                    .get_or_create_subsection(label, name)
                    .lines
                    .push(line),
            }
            in_bullet = true;
            continue;
        }

        // Indented text right after a bullet continues its summary
        if in_bullet && raw.starts_with([' ', '\t']) {
            let lines = match &cursor {
                Cursor::Version(label) => &mut changelog.get_or_create_version(label).lines,
                Cursor::Subsection(label, name) => {
                    &mut changelog.get_or_create_subsection(label, name).lines
                }
                Cursor::Start => return Err(unrecognized()),
            };
            if let Some(last) = lines.last_mut() {
                let continued = format!("{} {}", last.summary, raw.trim());
                *last = match last.reference.take() {
                    Some(reference) => ChangeLine::new(continued, Some(reference)),
                    None => change_line(&continued),
                };
                continue;
            }
        }

        return Err(unrecognized());
    }

    Ok(changelog)
}
