//! Platform services for GitHub
//!
//! Everything shipit needs from the forge goes through [`PlatformService`],
//! so the orchestrator and the access resolver can run against a mock.

mod github;

pub use github::GitHubService;

use crate::error::Result;
use crate::types::{
    FileContents, FileUpdate, MembershipState, MergeMethod, MergeResult, Organization,
    PullRequestDetails, RepoRef, Team, TeamRepository, User,
};
use async_trait::async_trait;

/// Platform service trait for the forge operations shipit consumes
#[async_trait]
pub trait PlatformService: Send + Sync {
    // =========================================================================
    // Organization and team lookups (authorization)
    // =========================================================================

    /// List the teams of an organization.
    ///
    /// The returned teams carry `org_id == 0`; callers attach the owning
    /// organization ID from [`get_org`](Self::get_org).
    async fn list_teams(&self, org: &str) -> Result<Vec<Team>>;

    /// Get organization metadata
    async fn get_org(&self, org: &str) -> Result<Organization>;

    /// Get a user's membership in a team, by numeric IDs.
    ///
    /// A 404 from the forge is reported as `Ok(MembershipState::NotMember)`;
    /// any other failure is an error.
    async fn get_team_membership(
        &self,
        org_id: u64,
        team_id: u64,
        login: &str,
    ) -> Result<MembershipState>;

    /// Get the team-repository relationship, or `None` if the team does not
    /// manage the repository.
    async fn get_team_repo(
        &self,
        org_id: u64,
        team_id: u64,
        repo: &RepoRef,
    ) -> Result<Option<TeamRepository>>;

    /// List organization members with the admin (owner) role
    async fn list_org_admins(&self, org: &str) -> Result<Vec<User>>;

    // =========================================================================
    // Pull request operations
    // =========================================================================

    /// Merge a PR with the given commit message
    async fn merge_pr(
        &self,
        repo: &RepoRef,
        pr_number: u64,
        commit_message: &str,
        method: MergeMethod,
    ) -> Result<MergeResult>;

    /// Get PR metadata, or `None` if the forge returned nothing
    async fn get_pr_details(
        &self,
        repo: &RepoRef,
        pr_number: u64,
    ) -> Result<Option<PullRequestDetails>>;

    /// Add labels to an issue or PR
    async fn add_labels(&self, repo: &RepoRef, number: u64, labels: &[String]) -> Result<()>;

    // =========================================================================
    // Git data and contents
    // =========================================================================

    /// Delete a branch (`refs/heads/<branch>`)
    async fn delete_branch(&self, repo: &RepoRef, branch: &str) -> Result<()>;

    /// Get the repository's default branch name
    async fn default_branch(&self, repo: &RepoRef) -> Result<String>;

    /// Get a file's contents at a ref, or `None` if the file does not exist
    async fn get_file(
        &self,
        repo: &RepoRef,
        path: &str,
        git_ref: &str,
    ) -> Result<Option<FileContents>>;

    /// Create or update a file.
    ///
    /// A stale `sha` is reported as [`Error::FileConflict`](crate::error::Error::FileConflict).
    async fn put_file(&self, repo: &RepoRef, update: &FileUpdate) -> Result<()>;
}
