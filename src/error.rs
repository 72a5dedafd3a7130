//! Error types for shipit

use thiserror::Error;

/// Errors surfaced by shipit
#[derive(Debug, Error)]
pub enum Error {
    /// Comment was posted on a plain issue
    #[error("comment not on a pull request")]
    NotPullRequest,

    /// Comment or review body holds no merge command
    #[error("not a merge request comment")]
    NotMergeCommand,

    /// Review event with an action other than `submitted`
    #[error("review action is {0:?}, not submitted")]
    ReviewNotSubmitted(String),

    /// Event name shipit does not handle
    #[error("not an issue_comment or pull_request_review event: {0}")]
    UnsupportedEvent(String),

    /// Commenter cannot push to the repository
    #[error("{login} isn't allowed to merge on {repo}")]
    Unauthorized {
        /// Commenter login
        login: String,
        /// Repository (owner/name)
        repo: String,
    },

    /// The forge refused the merge
    #[error("error merging {reference}: {message}")]
    MergeFailed {
        /// Pull request reference (owner/name#number)
        reference: String,
        /// Reason given by the forge
        message: String,
    },

    /// Pull request metadata was unavailable after a merge
    #[error("pull request {0} not found after merge")]
    MissingPullRequest(String),

    /// File write rejected because the content SHA is stale
    #[error("{0} changed since it was read")]
    FileConflict(String),

    /// Changelog contains a line shipit does not understand
    #[error("changelog line {line}: unrecognized content {content:?}")]
    ChangelogParse {
        /// 1-based line number
        line: usize,
        /// Offending line
        content: String,
    },

    /// GitHub API error
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Authentication error
    #[error("authentication error: {0}")]
    Auth(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Payload decoding error
    #[error("invalid payload: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<octocrab::Error> for Error {
    fn from(e: octocrab::Error) -> Self {
        Self::GitHubApi(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Self::GitHubApi(e.to_string())
    }
}

/// Result alias using shipit's [`Error`]
pub type Result<T> = std::result::Result<T, Error>;
