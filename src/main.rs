//! shipit - comment-driven merges for GitHub

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Merge, label, and record pull requests from `@bot: merge` comments
#[derive(Parser)]
#[command(name = "shipit", version, about)]
struct Cli {
    /// Path to the config file (default: <config dir>/shipit/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Handle a saved webhook payload
    Handle {
        /// Webhook event name (issue_comment or pull_request_review)
        #[arg(long)]
        event: String,
        /// Payload file, or `-` for stdin
        payload: PathBuf,
    },
    /// Check whether a user can push to a repository
    CheckAccess {
        /// Repository owner (organization)
        owner: String,
        /// Repository name
        repo: String,
        /// User login
        login: String,
    },
    /// Check whether a user owns an organization
    IsOwner {
        /// Organization login
        org: String,
        /// User login
        login: String,
    },
    /// Print a changelog with a merged PR added (offline)
    Preview {
        /// Changelog file
        history: PathBuf,
        /// PR title
        #[arg(long)]
        title: String,
        /// PR number
        #[arg(long)]
        number: u64,
        /// Category phrase, as written after `+` in a merge command
        #[arg(long)]
        category: Option<String>,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "shipit=debug" } else { "shipit=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    init_tracing(args.verbose);

    match args.command {
        Command::Handle { event, payload } => {
            cli::run_handle(args.config.as_deref(), &event, &payload).await?;
        }
        Command::CheckAccess { owner, repo, login } => {
            cli::run_check_access(args.config.as_deref(), &owner, &repo, &login).await?;
        }
        Command::IsOwner { org, login } => {
            cli::run_is_owner(args.config.as_deref(), &org, &login).await?;
        }
        Command::Preview {
            history,
            title,
            number,
            category,
        } => {
            cli::run_preview(&history, &title, number, category.as_deref())?;
        }
    }

    Ok(())
}
