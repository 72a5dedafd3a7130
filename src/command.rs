//! Merge command grammar
//!
//! A merge command is an at-mention of the bot followed by a colon and one of
//! `merge`, `:shipit:` or `:ship:`, optionally followed by `+` and a category
//! phrase running to the end of the line:
//!
//! ```text
//! @jekyllbot: merge +bug fix
//! @jekyllbot: :shipit:
//! ```
//!
//! Only the first command in a comment counts.

use crate::category;
use crate::error::{Error, Result};
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

const KEYWORDS: &str = r"((?i:merge)|:shipit:|:ship:)";
const CATEGORY: &str = r"(?:[ \t]+\+([a-zA-Z_ \t-]+))?";

static ANY_MENTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("@[a-zA-Z0-9_-]+:[ \t]+{KEYWORDS}{CATEGORY}"))
        .expect("merge command pattern is valid")
});

/// A recognized merge command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeCommand {
    /// Normalized category slug, if the command named one
    pub category: Option<String>,
}

/// Recognizes merge commands addressed to the bot
#[derive(Debug, Clone)]
pub struct CommandParser {
    pattern: Cow<'static, Regex>,
}

impl Default for CommandParser {
    fn default() -> Self {
        Self::any_mention()
    }
}

impl CommandParser {
    /// Parser accepting commands addressed to any `@login`
    pub fn any_mention() -> Self {
        Self {
            pattern: Cow::Borrowed(&*ANY_MENTION),
        }
    }

    /// Parser accepting only commands addressed to `login` (case-insensitive)
    pub fn for_login(login: &str) -> Result<Self> {
        let login = login.trim().trim_start_matches('@');
        if login.is_empty() {
            return Err(Error::Config("bot login is empty".to_string()));
        }

        let pattern = Regex::new(&format!(
            "@(?i:{}):[ \t]+{KEYWORDS}{CATEGORY}",
            regex::escape(login)
        ))
        .map_err(|e| Error::Config(format!("invalid bot login {login:?}: {e}")))?;

        Ok(Self {
            pattern: Cow::Owned(pattern),
        })
    }

    /// Parse the first merge command in `text`, if any
    pub fn parse(&self, text: &str) -> Option<MergeCommand> {
        let captures = self.pattern.captures(text)?;

        let category = captures
            .get(2)
            .map(|phrase| category::normalize(phrase.as_str()))
            .filter(|slug| !slug.is_empty());

        Some(MergeCommand { category })
    }
}

/// Parse a merge command addressed to any `@login`
pub fn parse_merge_command(text: &str) -> Option<MergeCommand> {
    CommandParser::any_mention().parse(text)
}
