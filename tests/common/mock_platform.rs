//! Mock platform service for testing
//!
//! These are test utilities - not all may be used in current tests but are
//! available for future test development.

#![allow(dead_code)]

use async_trait::async_trait;
use shipit::error::{Error, Result};
use shipit::platform::PlatformService;
use shipit::types::{
    FileContents, FileUpdate, MembershipState, MergeMethod, MergeResult, Organization,
    PullRequestDetails, RepoRef, Team, TeamRepository, User,
};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

/// Call record for `merge_pr`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePrCall {
    pub repo: RepoRef,
    pub pr_number: u64,
    pub commit_message: String,
    pub method: MergeMethod,
}

/// Call record for `add_labels`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddLabelsCall {
    pub number: u64,
    pub labels: Vec<String>,
}

/// Call record for `get_team_membership`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipCall {
    pub org_id: u64,
    pub team_id: u64,
    pub login: String,
}

/// Simple mock platform service for testing
///
/// Features:
/// - Configurable responses for organizations, teams, PRs and files
/// - Call tracking for verification
/// - Error injection for failure path testing
/// - Files behave like a tiny content store: writes bump the SHA
pub struct MockPlatformService {
    // Authorization data
    teams: Mutex<HashMap<String, Vec<Team>>>,
    orgs: Mutex<HashMap<String, Organization>>,
    memberships: Mutex<HashMap<(u64, u64, String), MembershipState>>,
    team_repos: Mutex<HashMap<(u64, u64, String), TeamRepository>>,
    org_admins: Mutex<HashMap<String, Vec<User>>>,
    // PR data
    pr_details: Mutex<HashMap<u64, PullRequestDetails>>,
    merge_responses: Mutex<HashMap<u64, MergeResult>>,
    // Repository data
    default_branch: Mutex<String>,
    files: Mutex<HashMap<String, FileContents>>,
    next_sha: AtomicU64,
    // Call tracking
    list_teams_calls: Mutex<Vec<String>>,
    membership_calls: Mutex<Vec<MembershipCall>>,
    team_repo_calls: Mutex<Vec<(u64, u64, String)>>,
    list_admins_calls: Mutex<Vec<String>>,
    merge_pr_calls: Mutex<Vec<MergePrCall>>,
    get_pr_details_calls: Mutex<Vec<u64>>,
    add_labels_calls: Mutex<Vec<AddLabelsCall>>,
    delete_branch_calls: Mutex<Vec<String>>,
    get_file_calls: Mutex<Vec<(String, String)>>,
    put_file_calls: Mutex<Vec<FileUpdate>>,
    // Error injection
    error_on_list_teams: Mutex<Option<String>>,
    error_on_membership: Mutex<Option<String>>,
    error_on_team_repo: Mutex<Option<String>>,
    error_on_merge_pr: Mutex<Option<String>>,
    error_on_add_labels: Mutex<Option<String>>,
    error_on_delete_branch: Mutex<Option<String>>,
    error_on_default_branch: Mutex<Option<String>>,
    error_on_get_file: Mutex<Option<String>>,
    /// Number of upcoming `put_file` calls that report a stale SHA
    put_file_conflicts: AtomicU32,
    /// When set, `get_pr_details` answers `None` for every PR
    pr_details_missing: Mutex<bool>,
}

impl Default for MockPlatformService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPlatformService {
    /// Create an empty mock; the default branch is `main`
    pub fn new() -> Self {
        Self {
            teams: Mutex::new(HashMap::new()),
            orgs: Mutex::new(HashMap::new()),
            memberships: Mutex::new(HashMap::new()),
            team_repos: Mutex::new(HashMap::new()),
            org_admins: Mutex::new(HashMap::new()),
            pr_details: Mutex::new(HashMap::new()),
            merge_responses: Mutex::new(HashMap::new()),
            default_branch: Mutex::new("main".to_string()),
            files: Mutex::new(HashMap::new()),
            next_sha: AtomicU64::new(1),
            list_teams_calls: Mutex::new(Vec::new()),
            membership_calls: Mutex::new(Vec::new()),
            team_repo_calls: Mutex::new(Vec::new()),
            list_admins_calls: Mutex::new(Vec::new()),
            merge_pr_calls: Mutex::new(Vec::new()),
            get_pr_details_calls: Mutex::new(Vec::new()),
            add_labels_calls: Mutex::new(Vec::new()),
            delete_branch_calls: Mutex::new(Vec::new()),
            get_file_calls: Mutex::new(Vec::new()),
            put_file_calls: Mutex::new(Vec::new()),
            error_on_list_teams: Mutex::new(None),
            error_on_membership: Mutex::new(None),
            error_on_team_repo: Mutex::new(None),
            error_on_merge_pr: Mutex::new(None),
            error_on_add_labels: Mutex::new(None),
            error_on_delete_branch: Mutex::new(None),
            error_on_default_branch: Mutex::new(None),
            error_on_get_file: Mutex::new(None),
            put_file_conflicts: AtomicU32::new(0),
            pr_details_missing: Mutex::new(false),
        }
    }

    // === Response setup ===

    /// Register an organization and its teams (team `org_id` is ignored)
    pub fn set_org(&self, login: &str, id: u64, team_ids: &[(u64, &str)]) {
        self.orgs.lock().unwrap().insert(
            login.to_string(),
            Organization {
                id,
                login: login.to_string(),
            },
        );
        let teams = team_ids
            .iter()
            .map(|(team_id, slug)| Team {
                id: *team_id,
                slug: (*slug).to_string(),
                org_id: 0,
            })
            .collect();
        self.teams.lock().unwrap().insert(login.to_string(), teams);
    }

    /// Set a user's membership state in a team
    pub fn set_membership(&self, org_id: u64, team_id: u64, login: &str, state: MembershipState) {
        self.memberships
            .lock()
            .unwrap()
            .insert((org_id, team_id, login.to_string()), state);
    }

    /// Give a team a relationship to a repository
    pub fn set_team_repo(&self, org_id: u64, team_id: u64, repo: &str, push: bool, admin: bool) {
        let mut relationship = TeamRepository {
            full_name: repo.to_string(),
            permissions: Default::default(),
        };
        relationship.permissions.pull = true;
        relationship.permissions.push = push;
        relationship.permissions.admin = admin;
        self.team_repos
            .lock()
            .unwrap()
            .insert((org_id, team_id, repo.to_string()), relationship);
    }

    /// Set the owners of an organization
    pub fn set_org_admins(&self, org: &str, logins: &[&str]) {
        let users = logins
            .iter()
            .map(|login| User {
                login: (*login).to_string(),
            })
            .collect();
        self.org_admins
            .lock()
            .unwrap()
            .insert(org.to_string(), users);
    }

    /// Set the response for `get_pr_details` for a specific PR
    pub fn set_pr_details_response(&self, details: PullRequestDetails) {
        self.pr_details
            .lock()
            .unwrap()
            .insert(details.number, details);
    }

    /// Make `get_pr_details` return `None`
    pub fn set_pr_details_missing(&self) {
        *self.pr_details_missing.lock().unwrap() = true;
    }

    /// Set the response for `merge_pr` for a specific PR
    pub fn set_merge_response(&self, pr_number: u64, result: MergeResult) {
        self.merge_responses
            .lock()
            .unwrap()
            .insert(pr_number, result);
    }

    /// Set the default branch
    pub fn set_default_branch(&self, branch: &str) {
        *self.default_branch.lock().unwrap() = branch.to_string();
    }

    /// Seed a file
    pub fn set_file(&self, path: &str, content: &str) {
        let sha = format!("sha{}", self.next_sha.fetch_add(1, Ordering::SeqCst));
        self.files.lock().unwrap().insert(
            path.to_string(),
            FileContents {
                content: content.to_string(),
                sha,
            },
        );
    }

    /// Current content of a file
    pub fn file(&self, path: &str) -> Option<FileContents> {
        self.files.lock().unwrap().get(path).cloned()
    }

    // === Error injection methods ===

    /// Make `list_teams` return an error
    pub fn fail_list_teams(&self, msg: &str) {
        *self.error_on_list_teams.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `get_team_membership` return an error
    pub fn fail_membership(&self, msg: &str) {
        *self.error_on_membership.lock().unwrap() = Some(msg.to_string());
    }

    /// Let `get_team_membership` succeed again
    pub fn clear_membership_failure(&self) {
        *self.error_on_membership.lock().unwrap() = None;
    }

    /// Make `get_team_repo` return an error
    pub fn fail_team_repo(&self, msg: &str) {
        *self.error_on_team_repo.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `merge_pr` return an error
    pub fn fail_merge_pr(&self, msg: &str) {
        *self.error_on_merge_pr.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `add_labels` return an error
    pub fn fail_add_labels(&self, msg: &str) {
        *self.error_on_add_labels.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `delete_branch` return an error
    pub fn fail_delete_branch(&self, msg: &str) {
        *self.error_on_delete_branch.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `default_branch` return an error
    pub fn fail_default_branch(&self, msg: &str) {
        *self.error_on_default_branch.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `get_file` return an error
    pub fn fail_get_file(&self, msg: &str) {
        *self.error_on_get_file.lock().unwrap() = Some(msg.to_string());
    }

    /// Make the next `count` writes fail with a stale-SHA conflict
    pub fn conflict_next_puts(&self, count: u32) {
        self.put_file_conflicts.store(count, Ordering::SeqCst);
    }

    // === Call verification methods ===

    /// Get all orgs `list_teams` was called with
    pub fn get_list_teams_calls(&self) -> Vec<String> {
        self.list_teams_calls.lock().unwrap().clone()
    }

    /// Get all `get_team_membership` calls
    pub fn get_membership_calls(&self) -> Vec<MembershipCall> {
        self.membership_calls.lock().unwrap().clone()
    }

    /// Get all `get_team_repo` calls
    pub fn get_team_repo_calls(&self) -> Vec<(u64, u64, String)> {
        self.team_repo_calls.lock().unwrap().clone()
    }

    /// Get all orgs `list_org_admins` was called with
    pub fn get_list_admins_calls(&self) -> Vec<String> {
        self.list_admins_calls.lock().unwrap().clone()
    }

    /// Get all `merge_pr` calls
    pub fn get_merge_pr_calls(&self) -> Vec<MergePrCall> {
        self.merge_pr_calls.lock().unwrap().clone()
    }

    /// Get all `get_pr_details` calls
    pub fn get_pr_details_calls(&self) -> Vec<u64> {
        self.get_pr_details_calls.lock().unwrap().clone()
    }

    /// Get all `add_labels` calls
    pub fn get_add_labels_calls(&self) -> Vec<AddLabelsCall> {
        self.add_labels_calls.lock().unwrap().clone()
    }

    /// Get all branches `delete_branch` was called with
    pub fn get_delete_branch_calls(&self) -> Vec<String> {
        self.delete_branch_calls.lock().unwrap().clone()
    }

    /// Get all `(path, ref)` pairs `get_file` was called with
    pub fn get_file_calls(&self) -> Vec<(String, String)> {
        self.get_file_calls.lock().unwrap().clone()
    }

    /// Get all `put_file` calls
    pub fn get_put_file_calls(&self) -> Vec<FileUpdate> {
        self.put_file_calls.lock().unwrap().clone()
    }

    /// Get count of `merge_pr` calls
    pub fn merge_call_count(&self) -> usize {
        self.merge_pr_calls.lock().unwrap().len()
    }

    /// Assert that `merge_pr` was NOT called
    pub fn assert_merge_not_called(&self) {
        let calls = self.get_merge_pr_calls();
        assert!(
            calls.is_empty(),
            "Expected merge_pr NOT to be called but it was: {calls:?}"
        );
    }

    /// Assert that no post-merge side effect happened
    pub fn assert_no_post_merge_actions(&self) {
        assert!(self.get_add_labels_calls().is_empty(), "labels were applied");
        assert!(self.get_delete_branch_calls().is_empty(), "branch was deleted");
        assert!(self.get_put_file_calls().is_empty(), "changelog was written");
    }
}

fn injected(slot: &Mutex<Option<String>>) -> Result<()> {
    match slot.lock().unwrap().as_ref() {
        Some(msg) => Err(Error::GitHubApi(msg.clone())),
        None => Ok(()),
    }
}

#[async_trait]
impl PlatformService for MockPlatformService {
    async fn list_teams(&self, org: &str) -> Result<Vec<Team>> {
        self.list_teams_calls.lock().unwrap().push(org.to_string());
        injected(&self.error_on_list_teams)?;

        Ok(self
            .teams
            .lock()
            .unwrap()
            .get(org)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_org(&self, org: &str) -> Result<Organization> {
        self.orgs
            .lock()
            .unwrap()
            .get(org)
            .cloned()
            .ok_or_else(|| Error::GitHubApi(format!("/orgs/{org}: not found")))
    }

    async fn get_team_membership(
        &self,
        org_id: u64,
        team_id: u64,
        login: &str,
    ) -> Result<MembershipState> {
        self.membership_calls.lock().unwrap().push(MembershipCall {
            org_id,
            team_id,
            login: login.to_string(),
        });
        injected(&self.error_on_membership)?;

        Ok(self
            .memberships
            .lock()
            .unwrap()
            .get(&(org_id, team_id, login.to_string()))
            .copied()
            .unwrap_or(MembershipState::NotMember))
    }

    async fn get_team_repo(
        &self,
        org_id: u64,
        team_id: u64,
        repo: &RepoRef,
    ) -> Result<Option<TeamRepository>> {
        self.team_repo_calls
            .lock()
            .unwrap()
            .push((org_id, team_id, repo.to_string()));
        injected(&self.error_on_team_repo)?;

        Ok(self
            .team_repos
            .lock()
            .unwrap()
            .get(&(org_id, team_id, repo.to_string()))
            .cloned())
    }

    async fn list_org_admins(&self, org: &str) -> Result<Vec<User>> {
        self.list_admins_calls.lock().unwrap().push(org.to_string());
        Ok(self
            .org_admins
            .lock()
            .unwrap()
            .get(org)
            .cloned()
            .unwrap_or_default())
    }

    async fn merge_pr(
        &self,
        repo: &RepoRef,
        pr_number: u64,
        commit_message: &str,
        method: MergeMethod,
    ) -> Result<MergeResult> {
        self.merge_pr_calls.lock().unwrap().push(MergePrCall {
            repo: repo.clone(),
            pr_number,
            commit_message: commit_message.to_string(),
            method,
        });
        injected(&self.error_on_merge_pr)?;

        let responses = self.merge_responses.lock().unwrap();
        responses.get(&pr_number).cloned().ok_or_else(|| {
            Error::GitHubApi(format!(
                "merge_pr: no response configured for PR #{pr_number}"
            ))
        })
    }

    async fn get_pr_details(
        &self,
        _repo: &RepoRef,
        pr_number: u64,
    ) -> Result<Option<PullRequestDetails>> {
        self.get_pr_details_calls.lock().unwrap().push(pr_number);
        if *self.pr_details_missing.lock().unwrap() {
            return Ok(None);
        }

        let responses = self.pr_details.lock().unwrap();
        responses.get(&pr_number).cloned().map(Some).ok_or_else(|| {
            Error::GitHubApi(format!(
                "get_pr_details: no response configured for PR #{pr_number}"
            ))
        })
    }

    async fn add_labels(&self, _repo: &RepoRef, number: u64, labels: &[String]) -> Result<()> {
        self.add_labels_calls.lock().unwrap().push(AddLabelsCall {
            number,
            labels: labels.to_vec(),
        });
        injected(&self.error_on_add_labels)
    }

    async fn delete_branch(&self, _repo: &RepoRef, branch: &str) -> Result<()> {
        self.delete_branch_calls
            .lock()
            .unwrap()
            .push(branch.to_string());
        injected(&self.error_on_delete_branch)
    }

    async fn default_branch(&self, _repo: &RepoRef) -> Result<String> {
        injected(&self.error_on_default_branch)?;
        Ok(self.default_branch.lock().unwrap().clone())
    }

    async fn get_file(
        &self,
        _repo: &RepoRef,
        path: &str,
        git_ref: &str,
    ) -> Result<Option<FileContents>> {
        self.get_file_calls
            .lock()
            .unwrap()
            .push((path.to_string(), git_ref.to_string()));
        injected(&self.error_on_get_file)?;

        Ok(self.files.lock().unwrap().get(path).cloned())
    }

    async fn put_file(&self, _repo: &RepoRef, update: &FileUpdate) -> Result<()> {
        self.put_file_calls.lock().unwrap().push(update.clone());

        if self
            .put_file_conflicts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            // Someone else committed in between: the stored file moves on
            let current = self.file(&update.path).map(|f| f.content).unwrap_or_default();
            self.set_file(&update.path, &current);
            return Err(Error::FileConflict(update.path.clone()));
        }

        let mut files = self.files.lock().unwrap();
        let current_sha = files.get(&update.path).map(|f| f.sha.clone());
        if current_sha != update.sha {
            return Err(Error::FileConflict(update.path.clone()));
        }

        let sha = format!("sha{}", self.next_sha.fetch_add(1, Ordering::SeqCst));
        files.insert(
            update.path.clone(),
            FileContents {
                content: update.content.clone(),
                sha,
            },
        );
        Ok(())
    }
}
