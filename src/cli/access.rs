//! Access commands - query the authorization resolver

use crate::cli::context::command_context;
use crate::cli::style::Stylize;
use anstream::println;
use shipit::error::Result;
use std::path::Path;

fn verdict(allowed: bool) -> String {
    if allowed { "yes".success() } else { "no".warn() }
}

/// Run the check-access command
pub async fn run_check_access(
    config_path: Option<&Path>,
    owner: &str,
    repo: &str,
    login: &str,
) -> Result<()> {
    let ctx = command_context(config_path).await?;
    let allowed = ctx.access().has_push_access(owner, repo, login).await;
    println!("{login} can push to {owner}/{repo}: {}", verdict(allowed));
    Ok(())
}

/// Run the is-owner command
pub async fn run_is_owner(config_path: Option<&Path>, org: &str, login: &str) -> Result<()> {
    let ctx = command_context(config_path).await?;
    let owner = ctx.access().is_org_owner(org, login).await;
    println!("{login} owns {org}: {}", verdict(owner));
    Ok(())
}
