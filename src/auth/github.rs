//! GitHub token discovery

use super::AuthSource;
use crate::error::{Error, Result};
use tokio::process::Command;
use tracing::debug;

/// Environment variables checked for a token, in order
const TOKEN_VARS: [&str; 3] = ["GITHUB_ACCESS_TOKEN", "GITHUB_TOKEN", "GH_TOKEN"];

/// A resolved GitHub token
#[derive(Debug, Clone)]
pub struct GitHubAuthConfig {
    /// API token
    pub token: String,
    /// Where the token came from
    pub source: AuthSource,
}

/// Find a token among [`TOKEN_VARS`] using the given lookup.
///
/// Blank values are skipped.
pub fn resolve_env_token<F>(lookup: F) -> Option<GitHubAuthConfig>
where
    F: Fn(&str) -> Option<String>,
{
    TOKEN_VARS.iter().find_map(|var| {
        let token = lookup(var)?.trim().to_string();
        if token.is_empty() {
            return None;
        }
        debug!(var, "using GitHub token from environment");
        Some(GitHubAuthConfig {
            token,
            source: AuthSource::EnvVar,
        })
    })
}

/// Get a GitHub token from the environment, falling back to `gh auth token`
pub async fn get_github_auth() -> Result<GitHubAuthConfig> {
    if let Some(config) = resolve_env_token(|var| std::env::var(var).ok()) {
        return Ok(config);
    }

    let output = Command::new("gh")
        .args(["auth", "token"])
        .output()
        .await
        .map_err(|e| Error::Auth(format!("no token in environment and gh unavailable: {e}")))?;

    if !output.status.success() {
        return Err(Error::Auth(
            "no token in environment and `gh auth token` failed".to_string(),
        ));
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() {
        return Err(Error::Auth("`gh auth token` returned nothing".to_string()));
    }

    debug!("using GitHub token from gh CLI");
    Ok(GitHubAuthConfig {
        token,
        source: AuthSource::Cli,
    })
}
