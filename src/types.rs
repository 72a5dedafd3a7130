//! Core types for shipit

use serde::{Deserialize, Serialize};

/// A repository identity (owner + name)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoRef {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub name: String,
}

impl RepoRef {
    /// Create a repository reference
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Reference to a pull request or issue in this repository (`owner/name#N`)
    pub fn issue_ref(&self, number: u64) -> String {
        format!("{self}#{number}")
    }
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// An organization account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    /// Numeric organization ID
    pub id: u64,
    /// Organization login
    pub login: String,
}

/// A team within an organization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Numeric team ID
    pub id: u64,
    /// Team slug
    pub slug: String,
    /// Numeric ID of the organization owning the team
    pub org_id: u64,
}

/// A user account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User login
    pub login: String,
}

/// A user's membership in a team
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipState {
    /// Member who has accepted the invitation
    Active,
    /// Invited but not yet accepted
    Pending,
    /// Not a member (the forge answered 404)
    NotMember,
}

/// Permission bits a team holds on a repository
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct RepoPermissions {
    /// Administer the repository
    #[serde(default)]
    pub admin: bool,
    /// Maintain the repository
    #[serde(default)]
    pub maintain: bool,
    /// Push to the repository
    #[serde(default)]
    pub push: bool,
    /// Triage issues and pull requests
    #[serde(default)]
    pub triage: bool,
    /// Read the repository
    #[serde(default)]
    pub pull: bool,
}

/// A team-repository relationship
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRepository {
    /// Repository full name (owner/name)
    pub full_name: String,
    /// Permissions the team holds on the repository
    pub permissions: RepoPermissions,
}

impl TeamRepository {
    /// Whether the relationship grants push (or admin) rights
    pub const fn can_push(&self) -> bool {
        self.permissions.push || self.permissions.admin
    }
}

/// Pull request metadata needed after a merge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestDetails {
    /// PR number
    pub number: u64,
    /// PR title
    pub title: String,
    /// Head branch name
    pub head_ref: String,
    /// Owner login of the repository holding the head branch
    /// (`None` when the head repository was deleted)
    pub head_owner: Option<String>,
    /// Base branch name
    pub base_ref: String,
    /// Web URL for the PR
    pub html_url: String,
}

/// Merge strategy/method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMethod {
    /// Squash all commits into one
    Squash,
    /// Create a merge commit
    Merge,
    /// Rebase commits onto base branch
    Rebase,
}

impl std::fmt::Display for MergeMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Squash => write!(f, "squash"),
            Self::Merge => write!(f, "merge"),
            Self::Rebase => write!(f, "rebase"),
        }
    }
}

/// Result of a merge operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeResult {
    /// Whether the merge was successful
    pub merged: bool,
    /// The SHA of the merge commit (if successful)
    pub sha: Option<String>,
    /// Message from the merge operation (especially on failure)
    pub message: Option<String>,
}

/// Decoded file contents plus the blob SHA guarding updates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContents {
    /// UTF-8 file body
    pub content: String,
    /// Blob SHA at the time of reading
    pub sha: String,
}

/// Identity recorded as the committer of bot-authored commits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Committer {
    /// Committer name
    pub name: String,
    /// Committer email
    pub email: String,
}

/// A request to create or replace a file on a branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpdate {
    /// Path within the repository
    pub path: String,
    /// Commit message
    pub message: String,
    /// New UTF-8 file body
    pub content: String,
    /// SHA of the blob being replaced; `None` creates the file
    pub sha: Option<String>,
    /// Branch to commit to
    pub branch: String,
    /// Commit identity
    pub committer: Committer,
}
