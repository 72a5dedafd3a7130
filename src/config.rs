//! Bot configuration, loaded from TOML.
//!
//! Every field has a default, so a missing file or an empty table is valid.

use crate::error::{Error, Result};
use crate::types::Committer;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory name for shipit configuration within the user config dir.
const CONFIG_DIR: &str = "shipit";

/// Filename for the configuration.
const CONFIG_FILE: &str = "config.toml";

/// Top-level bot configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Login the merge command must mention; any mention when unset
    pub bot_login: Option<String>,
    /// Head branches that are never deleted after a merge
    pub protected_branches: Vec<String>,
    /// Changelog settings
    pub changelog: ChangelogConfig,
    /// GitHub connection settings
    pub github: GitHubConfig,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            bot_login: None,
            protected_branches: ["master", "main", "gh-pages"]
                .into_iter()
                .map(String::from)
                .collect(),
            changelog: ChangelogConfig::default(),
            github: GitHubConfig::default(),
        }
    }
}

/// Changelog file settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangelogConfig {
    /// Path of the changelog within the repository
    pub path: String,
    /// Attempts at the fetch/update/commit cycle when the file changed underneath
    pub max_attempts: u32,
    /// Name recorded as committer of changelog updates
    pub committer_name: String,
    /// Email recorded as committer of changelog updates
    pub committer_email: String,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        Self {
            path: "History.markdown".to_string(),
            max_attempts: 1,
            committer_name: "jekyllbot".to_string(),
            committer_email: "jekyllbot@jekyllrb.com".to_string(),
        }
    }
}

impl ChangelogConfig {
    /// Commit identity for changelog updates
    pub fn committer(&self) -> Committer {
        Committer {
            name: self.committer_name.clone(),
            email: self.committer_email.clone(),
        }
    }
}

/// GitHub connection settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// GitHub Enterprise host (None for github.com)
    pub host: Option<String>,
}

/// Default config path: `<config dir>/shipit/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
}

impl BotConfig {
    /// Parse configuration from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)
            .map_err(|e| Error::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from disk.
    ///
    /// Returns the default configuration if the file doesn't exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Load from `path`, or from the default location when `None`
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path.map(Path::to_path_buf).or_else(default_config_path) {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.changelog.max_attempts == 0 {
            return Err(Error::Config(
                "changelog.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.changelog.path.trim().is_empty() {
            return Err(Error::Config("changelog.path is empty".to_string()));
        }
        Ok(())
    }
}
