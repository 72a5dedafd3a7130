//! Merge execution - effectful operations
//!
//! Authorizes the commenter, merges, then runs the three post-merge actions
//! (labels, branch deletion, changelog) concurrently. Only the merge is
//! all-or-nothing: post-merge failures are reported in the outcome and never
//! undo the merge or stop the other actions.

use crate::access::{AccessCache, AccessResolver};
use crate::changelog::add_merge_reference;
use crate::command::CommandParser;
use crate::config::BotConfig;
use crate::error::{Error, Result};
use crate::event::MergeEvent;
use crate::merge::plan::{
    MergeRequest, PostMergePlan, changelog_commit_message, merge_commit_message,
    parse_merge_request, plan_post_merge,
};
use crate::platform::PlatformService;
use crate::types::{FileUpdate, MergeMethod, MergeResult};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Branch assumed when the default branch cannot be determined
const FALLBACK_BRANCH: &str = "master";

/// Everything an orchestration needs: forge access, caches, settings
pub struct BotContext {
    platform: Arc<dyn PlatformService>,
    access: Arc<AccessCache>,
    parser: CommandParser,
    config: BotConfig,
}

impl BotContext {
    /// Create a context with a fresh access cache
    pub fn new(platform: Arc<dyn PlatformService>, config: BotConfig) -> Result<Self> {
        let parser = match config.bot_login.as_deref() {
            Some(login) => CommandParser::for_login(login)?,
            None => CommandParser::any_mention(),
        };

        Ok(Self {
            platform,
            access: Arc::new(AccessCache::new()),
            parser,
            config,
        })
    }

    /// Share an existing access cache (e.g. across server requests)
    #[must_use]
    pub fn with_access_cache(mut self, access: Arc<AccessCache>) -> Self {
        self.access = access;
        self
    }

    /// Forge client
    pub fn platform(&self) -> &dyn PlatformService {
        self.platform.as_ref()
    }

    /// Authorization resolver backed by this context's cache
    pub fn access(&self) -> AccessResolver<'_> {
        AccessResolver::new(self.platform.as_ref(), &self.access)
    }

    /// Merge command parser
    pub const fn parser(&self) -> &CommandParser {
        &self.parser
    }

    /// Bot settings
    pub const fn config(&self) -> &BotConfig {
        &self.config
    }
}

/// A post-merge action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostMergeAction {
    /// Apply category labels
    Label,
    /// Delete the head branch
    DeleteBranch,
    /// Record the PR in the changelog
    UpdateChangelog,
}

impl std::fmt::Display for PostMergeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Label => write!(f, "label"),
            Self::DeleteBranch => write!(f, "delete branch"),
            Self::UpdateChangelog => write!(f, "update changelog"),
        }
    }
}

/// How a post-merge action ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionStatus {
    /// Completed
    Done,
    /// Not attempted
    Skipped(String),
    /// Attempted and failed
    Failed(String),
}

/// Result of one post-merge action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionReport {
    /// Which action
    pub action: PostMergeAction,
    /// How it ended
    pub status: ActionStatus,
}

/// Result of a successful merge and its post-merge actions
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    /// The request that was served
    pub request: MergeRequest,
    /// The merge itself
    pub merge: MergeResult,
    /// One report per post-merge action
    pub actions: Vec<ActionReport>,
}

impl MergeOutcome {
    /// Status of one post-merge action
    pub fn status(&self, action: PostMergeAction) -> Option<&ActionStatus> {
        self.actions
            .iter()
            .find(|r| r.action == action)
            .map(|r| &r.status)
    }

    /// Post-merge actions that failed
    pub fn failures(&self) -> impl Iterator<Item = &ActionReport> {
        self.actions
            .iter()
            .filter(|r| matches!(r.status, ActionStatus::Failed(_)))
    }

    /// Whether every post-merge action completed or was deliberately skipped
    pub fn is_clean(&self) -> bool {
        self.failures().next().is_none()
    }
}

fn report(action: PostMergeAction, reference: &str, result: Result<ActionStatus>) -> ActionReport {
    let status = result.unwrap_or_else(|e| ActionStatus::Failed(e.to_string()));
    match &status {
        ActionStatus::Done => info!(reference, %action, "post-merge action done"),
        ActionStatus::Skipped(reason) => {
            warn!(reference, %action, reason = %reason, "post-merge action skipped");
        }
        ActionStatus::Failed(reason) => {
            warn!(reference, %action, error = %reason, "post-merge action failed");
        }
    }
    ActionReport { action, status }
}

/// Handle a merge command end to end (EFFECTFUL)
///
/// Errors are returned only for the parse, authorization and merge stages;
/// after a successful merge the outcome is always `Ok`.
pub async fn merge_and_label(ctx: &BotContext, event: &MergeEvent) -> Result<MergeOutcome> {
    debug!(event = ?event, "received {} event", event.name());

    let request = parse_merge_request(event, &ctx.parser)?;
    let reference = request.reference();
    info!(
        reference,
        commenter = %request.commenter,
        section = ?request.section,
        "merge requested"
    );

    if !ctx
        .access()
        .has_push_access(&request.repo.owner, &request.repo.name, &request.commenter)
        .await
    {
        warn!(reference, commenter = %request.commenter, "commenter lacks push access");
        return Err(Error::Unauthorized {
            login: request.commenter.clone(),
            repo: request.repo.to_string(),
        });
    }

    let merge = ctx
        .platform
        .merge_pr(
            &request.repo,
            request.number,
            &merge_commit_message(request.number),
            MergeMethod::Squash,
        )
        .await
        .map_err(|e| Error::MergeFailed {
            reference: reference.clone(),
            message: e.to_string(),
        })?;

    if !merge.merged {
        return Err(Error::MergeFailed {
            reference,
            message: merge
                .message
                .unwrap_or_else(|| "merge was not performed".to_string()),
        });
    }
    info!(reference, sha = ?merge.sha, "merged");

    let pr = ctx
        .platform
        .get_pr_details(&request.repo, request.number)
        .await?
        .ok_or_else(|| Error::MissingPullRequest(reference.clone()))?;

    let plan = plan_post_merge(&request, &pr, &ctx.config.protected_branches);
    debug!(reference, ?plan, "post-merge plan");

    let (labels, branch, changelog) = tokio::join!(
        apply_labels(ctx, &request, &plan),
        delete_branch(ctx, &request, &plan),
        update_changelog(ctx, &request, &plan),
    );

    Ok(MergeOutcome {
        request,
        merge,
        actions: vec![
            report(PostMergeAction::Label, &reference, labels),
            report(PostMergeAction::DeleteBranch, &reference, branch),
            report(PostMergeAction::UpdateChangelog, &reference, changelog),
        ],
    })
}

async fn apply_labels(
    ctx: &BotContext,
    request: &MergeRequest,
    plan: &PostMergePlan,
) -> Result<ActionStatus> {
    if plan.labels.is_empty() {
        return Ok(ActionStatus::Skipped(format!(
            "no labels for section {:?}",
            plan.section.as_deref().unwrap_or("none")
        )));
    }

    ctx.platform
        .add_labels(&request.repo, request.number, &plan.labels)
        .await?;
    Ok(ActionStatus::Done)
}

async fn delete_branch(
    ctx: &BotContext,
    request: &MergeRequest,
    plan: &PostMergePlan,
) -> Result<ActionStatus> {
    let Some(branch) = &plan.branch_to_delete else {
        return Ok(ActionStatus::Skipped(
            "head branch is protected or lives in another account".to_string(),
        ));
    };

    ctx.platform.delete_branch(&request.repo, branch).await?;
    Ok(ActionStatus::Done)
}

async fn update_changelog(
    ctx: &BotContext,
    request: &MergeRequest,
    plan: &PostMergePlan,
) -> Result<ActionStatus> {
    let settings = &ctx.config.changelog;

    let branch = match ctx.platform.default_branch(&request.repo).await {
        Ok(branch) => branch,
        Err(e) => {
            warn!(repo = %request.repo, error = %e, "falling back to {FALLBACK_BRANCH}");
            FALLBACK_BRANCH.to_string()
        }
    };

    let mut attempt = 1;
    loop {
        let current = ctx
            .platform
            .get_file(&request.repo, &settings.path, &branch)
            .await?;
        let (contents, sha) = current.map_or((String::new(), None), |file| {
            (file.content, Some(file.sha))
        });

        let content = add_merge_reference(
            &contents,
            plan.section.as_deref(),
            &plan.title,
            request.number,
        )?;

        let update = FileUpdate {
            path: settings.path.clone(),
            message: changelog_commit_message(request.number),
            content,
            sha,
            branch: branch.clone(),
            committer: settings.committer(),
        };

        match ctx.platform.put_file(&request.repo, &update).await {
            Ok(()) => return Ok(ActionStatus::Done),
            Err(Error::FileConflict(path)) if attempt < settings.max_attempts => {
                warn!(path, attempt, "changelog changed underneath, retrying");
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
