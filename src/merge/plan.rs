//! Merge planning - pure functions
//!
//! Turns an inbound event into a [`MergeRequest`] and, once the pull request
//! is merged, decides what the post-merge actions should do. No I/O happens
//! here.

use crate::category;
use crate::command::{CommandParser, MergeCommand};
use crate::error::{Error, Result};
use crate::event::{IssueCommentEvent, MergeEvent, PullRequestReviewEvent};
use crate::types::{PullRequestDetails, RepoRef};

/// A merge requested by a comment or review
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRequest {
    /// Repository of the pull request
    pub repo: RepoRef,
    /// Pull request number
    pub number: u64,
    /// Login of the user who asked for the merge
    pub commenter: String,
    /// Changelog section; `None` lists the PR directly under `HEAD`
    pub section: Option<String>,
}

impl MergeRequest {
    /// `owner/name#number`
    pub fn reference(&self) -> String {
        self.repo.issue_ref(self.number)
    }
}

fn section_for_command(command: &MergeCommand) -> Option<String> {
    category::changelog_section(command.category.as_deref())
}

fn from_issue_comment(event: &IssueCommentEvent, parser: &CommandParser) -> Result<MergeRequest> {
    if event.issue.pull_request.is_none() {
        return Err(Error::NotPullRequest);
    }

    let body = event.comment.body.as_deref().unwrap_or_default();
    let command = parser.parse(body).ok_or(Error::NotMergeCommand)?;

    Ok(MergeRequest {
        repo: RepoRef::new(&event.repo.owner.login, &event.repo.name),
        number: event.issue.number,
        commenter: event.comment.user.login.clone(),
        section: section_for_command(&command),
    })
}

fn from_review(event: &PullRequestReviewEvent, parser: &CommandParser) -> Result<MergeRequest> {
    if event.action != "submitted" {
        return Err(Error::ReviewNotSubmitted(event.action.clone()));
    }

    let body = event.review.body.as_deref().unwrap_or_default();
    let command = parser.parse(body).ok_or(Error::NotMergeCommand)?;

    Ok(MergeRequest {
        repo: RepoRef::new(&event.repo.owner.login, &event.repo.name),
        number: event.pull_request.number,
        commenter: event.review.user.login.clone(),
        section: section_for_command(&command),
    })
}

/// Extract a merge request from an event (PURE)
pub fn parse_merge_request(event: &MergeEvent, parser: &CommandParser) -> Result<MergeRequest> {
    match event {
        MergeEvent::IssueComment(event) => from_issue_comment(event, parser),
        MergeEvent::PullRequestReview(event) => from_review(event, parser),
    }
}

/// Whether the merged PR's head branch may be deleted.
///
/// Only branches living in the merging repository's owner account are
/// deleted, and never a protected branch.
pub fn is_deletable<S: AsRef<str>>(pr: &PullRequestDetails, owner: &str, protected: &[S]) -> bool {
    pr.head_owner.as_deref() == Some(owner)
        && !pr.head_ref.is_empty()
        && !protected.iter().any(|p| p.as_ref() == pr.head_ref)
}

/// Commit message for the squash merge
pub fn merge_commit_message(number: u64) -> String {
    format!("Merge pull request {number}")
}

/// Commit message for the changelog update
pub fn changelog_commit_message(number: u64) -> String {
    format!("Update history to reflect merge of #{number} [ci skip]")
}

/// What the post-merge actions should do
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostMergePlan {
    /// Labels to apply (empty: labeling is skipped)
    pub labels: Vec<String>,
    /// Branch to delete, if deletable
    pub branch_to_delete: Option<String>,
    /// Changelog section for the entry (`None`: directly under `HEAD`)
    pub section: Option<String>,
    /// PR title for the changelog entry
    pub title: String,
}

/// Plan the post-merge actions (PURE)
pub fn plan_post_merge<S: AsRef<str>>(
    request: &MergeRequest,
    pr: &PullRequestDetails,
    protected: &[S],
) -> PostMergePlan {
    let labels = request
        .section
        .as_deref()
        .map(category::labels_for)
        .unwrap_or_default();

    let branch_to_delete =
        is_deletable(pr, &request.repo.owner, protected).then(|| pr.head_ref.clone());

    PostMergePlan {
        labels,
        branch_to_delete,
        section: request.section.clone(),
        title: pr.title.clone(),
    }
}
