//! Shared command context for CLI commands
//!
//! Extracts common setup code shared by the commands that talk to GitHub.

use shipit::auth::get_github_auth;
use shipit::config::BotConfig;
use shipit::error::Result;
use shipit::merge::BotContext;
use shipit::platform::GitHubService;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Build a bot context for commands that interact with the platform
///
/// - Load configuration (defaults when the file is missing)
/// - Resolve a GitHub token
/// - Create the GitHub service for the configured host
pub async fn command_context(config_path: Option<&Path>) -> Result<BotContext> {
    let config = BotConfig::load_or_default(config_path)?;

    let auth = get_github_auth().await?;
    debug!(source = ?auth.source, "resolved GitHub token");

    let platform = GitHubService::new(&auth.token, config.github.host.as_deref())?;
    BotContext::new(Arc::new(platform), config)
}
