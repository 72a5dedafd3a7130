//! Inbound webhook events
//!
//! Only the fields shipit reads are modelled; everything else in the GitHub
//! payload is ignored during deserialization.

use crate::error::{Error, Result};
use serde::Deserialize;

/// A user or organization account
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Account {
    /// Account login
    pub login: String,
}

/// Repository the event happened in
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EventRepository {
    /// Repository owner
    pub owner: Account,
    /// Repository name
    pub name: String,
}

/// Links present only when an issue is a pull request
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PullRequestLinks {
    /// API URL of the pull request
    #[serde(default)]
    pub url: Option<String>,
}

/// Issue a comment was posted on
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Issue {
    /// Issue number
    pub number: u64,
    /// Set when the issue is a pull request
    #[serde(default)]
    pub pull_request: Option<PullRequestLinks>,
}

/// An issue comment
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Comment {
    /// Comment author
    pub user: Account,
    /// Comment text
    #[serde(default)]
    pub body: Option<String>,
}

/// `issue_comment` event
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct IssueCommentEvent {
    /// Event action (`created`, `edited`, ...)
    #[serde(default)]
    pub action: Option<String>,
    /// Account that triggered the event
    #[serde(default)]
    pub sender: Option<Account>,
    /// Repository
    #[serde(rename = "repository")]
    pub repo: EventRepository,
    /// Issue commented on
    pub issue: Issue,
    /// The comment
    pub comment: Comment,
}

/// Pull request a review belongs to
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReviewedPullRequest {
    /// Pull request number
    pub number: u64,
}

/// A pull request review
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Review {
    /// Review author
    pub user: Account,
    /// Review text
    #[serde(default)]
    pub body: Option<String>,
}

/// `pull_request_review` event
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PullRequestReviewEvent {
    /// Event action (`submitted`, `edited`, `dismissed`)
    #[serde(default)]
    pub action: String,
    /// Repository
    #[serde(rename = "repository")]
    pub repo: EventRepository,
    /// Reviewed pull request
    pub pull_request: ReviewedPullRequest,
    /// The review
    pub review: Review,
}

/// An event that may carry a merge command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeEvent {
    /// Comment on an issue or pull request
    IssueComment(IssueCommentEvent),
    /// Pull request review
    PullRequestReview(PullRequestReviewEvent),
}

impl MergeEvent {
    /// Decode a payload given its webhook event name (`X-GitHub-Event`)
    pub fn from_payload(event_name: &str, payload: &[u8]) -> Result<Self> {
        match event_name {
            "issue_comment" => Ok(Self::IssueComment(serde_json::from_slice(payload)?)),
            "pull_request_review" => Ok(Self::PullRequestReview(serde_json::from_slice(payload)?)),
            other => Err(Error::UnsupportedEvent(other.to_string())),
        }
    }

    /// Webhook event name for this event
    pub const fn name(&self) -> &'static str {
        match self {
            Self::IssueComment(_) => "issue_comment",
            Self::PullRequestReview(_) => "pull_request_review",
        }
    }
}
