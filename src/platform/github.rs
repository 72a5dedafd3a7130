//! GitHub platform service implementation

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{
    FileContents, FileUpdate, MembershipState, MergeMethod, MergeResult, Organization,
    PullRequestDetails, RepoPermissions, RepoRef, Team, TeamRepository, User,
};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use octocrab::Octocrab;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

const ACCEPT_JSON: &str = "application/vnd.github+json";
/// Media type that makes the team-repository endpoint return permission bits
const ACCEPT_REPOSITORY: &str = "application/vnd.github.v3.repository+json";

// REST response types for endpoints octocrab does not wrap

#[derive(Deserialize)]
struct RestTeam {
    id: u64,
    slug: String,
}

#[derive(Deserialize)]
struct RestMembership {
    state: String,
}

#[derive(Deserialize)]
struct RestTeamRepository {
    full_name: String,
    #[serde(default)]
    permissions: RepoPermissions,
}

#[derive(Deserialize)]
struct RestContent {
    sha: String,
    #[serde(default)]
    content: String,
}

#[derive(Serialize)]
struct RestFileUpdate<'a> {
    message: &'a str,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
    branch: &'a str,
    committer: &'a crate::types::Committer,
}

/// GitHub service using octocrab
pub struct GitHubService {
    client: Octocrab,
    /// Token for raw HTTP requests (team, org and contents endpoints)
    token: String,
    /// HTTP client for raw requests
    http_client: Client,
    /// API base URL for raw requests, without trailing slash
    api_base: String,
}

impl GitHubService {
    /// Create a new GitHub service for github.com or a GitHub Enterprise host
    pub fn new(token: &str, host: Option<&str>) -> Result<Self> {
        let api_base = host.map_or_else(
            || "https://api.github.com".to_string(),
            |h| format!("https://{h}/api/v3"),
        );
        Self::with_api_base(token, &api_base)
    }

    /// Create a GitHub service against an explicit API base URL
    pub fn with_api_base(token: &str, api_base: &str) -> Result<Self> {
        let api_base = api_base.trim_end_matches('/').to_string();

        let client = Octocrab::builder()
            .personal_token(token.to_string())
            .base_uri(api_base.as_str())
            .map_err(|e| Error::GitHubApi(e.to_string()))?
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        let http_client = Client::builder()
            .user_agent("shipit")
            .build()
            .map_err(|e| Error::GitHubApi(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            token: token.to_string(),
            http_client,
            api_base,
        })
    }

    fn request(&self, method: Method, path: &str, accept: &str) -> RequestBuilder {
        self.http_client
            .request(method, format!("{}{path}", self.api_base))
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", accept)
            .header("X-GitHub-Api-Version", "2022-11-28")
    }

    /// GET a JSON document, mapping 404 to `None`
    async fn get_json<T: DeserializeOwned>(&self, path: &str, accept: &str) -> Result<Option<T>> {
        let response = self.request(Method::GET, path, accept).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!(path, "GET returned 404");
            return Ok(None);
        }

        let response = ensure_success(response, path).await?;
        Ok(Some(response.json().await?))
    }

    /// GET a JSON document that must exist
    async fn get_required<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.get_json(path, ACCEPT_JSON)
            .await?
            .ok_or_else(|| Error::GitHubApi(format!("{path}: not found")))
    }
}

async fn ensure_success(response: Response, what: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(Error::GitHubApi(format!("{what}: HTTP {status}: {body}")))
}

/// Percent-encode each segment of a repository path, keeping the slashes
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Helper to convert octocrab PR to our `PullRequestDetails` type
fn details_from_octocrab(pr: &octocrab::models::pulls::PullRequest) -> PullRequestDetails {
    PullRequestDetails {
        number: pr.number,
        title: pr.title.clone().unwrap_or_default(),
        head_ref: pr.head.ref_field.clone(),
        head_owner: pr
            .head
            .repo
            .as_ref()
            .and_then(|r| r.owner.as_ref())
            .map(|owner| owner.login.clone()),
        base_ref: pr.base.ref_field.clone(),
        html_url: pr
            .html_url
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default(),
    }
}

#[async_trait]
impl PlatformService for GitHubService {
    async fn list_teams(&self, org: &str) -> Result<Vec<Team>> {
        debug!(org, "listing teams");
        let path = format!("/orgs/{}/teams?per_page=100", urlencoding::encode(org));
        let teams: Vec<RestTeam> = self.get_required(&path).await?;

        debug!(org, count = teams.len(), "listed teams");
        Ok(teams
            .into_iter()
            .map(|t| Team {
                id: t.id,
                slug: t.slug,
                org_id: 0,
            })
            .collect())
    }

    async fn get_org(&self, org: &str) -> Result<Organization> {
        debug!(org, "getting organization");
        let path = format!("/orgs/{}", urlencoding::encode(org));
        self.get_required(&path).await
    }

    async fn get_team_membership(
        &self,
        org_id: u64,
        team_id: u64,
        login: &str,
    ) -> Result<MembershipState> {
        debug!(org_id, team_id, login, "checking team membership");
        let path = format!(
            "/organizations/{org_id}/team/{team_id}/memberships/{}",
            urlencoding::encode(login)
        );

        let state = match self.get_json::<RestMembership>(&path, ACCEPT_JSON).await? {
            None => MembershipState::NotMember,
            Some(m) if m.state == "active" => MembershipState::Active,
            Some(_) => MembershipState::Pending,
        };

        debug!(org_id, team_id, login, ?state, "checked team membership");
        Ok(state)
    }

    async fn get_team_repo(
        &self,
        org_id: u64,
        team_id: u64,
        repo: &RepoRef,
    ) -> Result<Option<TeamRepository>> {
        debug!(org_id, team_id, %repo, "checking team repository");
        let path = format!(
            "/organizations/{org_id}/team/{team_id}/repos/{}/{}",
            urlencoding::encode(&repo.owner),
            urlencoding::encode(&repo.name)
        );

        let result = self
            .get_json::<RestTeamRepository>(&path, ACCEPT_REPOSITORY)
            .await?
            .map(|r| TeamRepository {
                full_name: r.full_name,
                permissions: r.permissions,
            });

        debug!(org_id, team_id, %repo, managed = result.is_some(), "checked team repository");
        Ok(result)
    }

    async fn list_org_admins(&self, org: &str) -> Result<Vec<User>> {
        debug!(org, "listing organization owners");
        let path = format!(
            "/orgs/{}/members?role=admin&per_page=100",
            urlencoding::encode(org)
        );
        self.get_required(&path).await
    }

    async fn merge_pr(
        &self,
        repo: &RepoRef,
        pr_number: u64,
        commit_message: &str,
        method: MergeMethod,
    ) -> Result<MergeResult> {
        debug!(pr_number, %method, "merging PR");

        let octocrab_method = match method {
            MergeMethod::Squash => octocrab::params::pulls::MergeMethod::Squash,
            MergeMethod::Merge => octocrab::params::pulls::MergeMethod::Merge,
            MergeMethod::Rebase => octocrab::params::pulls::MergeMethod::Rebase,
        };

        let result = self
            .client
            .pulls(&repo.owner, &repo.name)
            .merge(pr_number)
            .method(octocrab_method)
            .message(commit_message)
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("Merge failed: {e}")))?;

        let merge_result = MergeResult {
            merged: result.merged,
            sha: result.sha,
            message: result.message,
        };

        debug!(
            pr_number,
            merged = merge_result.merged,
            sha = ?merge_result.sha,
            "merge complete"
        );
        Ok(merge_result)
    }

    async fn get_pr_details(
        &self,
        repo: &RepoRef,
        pr_number: u64,
    ) -> Result<Option<PullRequestDetails>> {
        debug!(pr_number, "getting PR details");

        let pr = self
            .client
            .pulls(&repo.owner, &repo.name)
            .get(pr_number)
            .await?;

        let details = details_from_octocrab(&pr);
        debug!(pr_number, head_ref = %details.head_ref, "got PR details");
        Ok(Some(details))
    }

    async fn add_labels(&self, repo: &RepoRef, number: u64, labels: &[String]) -> Result<()> {
        debug!(number, ?labels, "adding labels");
        self.client
            .issues(&repo.owner, &repo.name)
            .add_labels(number, labels)
            .await?;
        debug!(number, "added labels");
        Ok(())
    }

    async fn delete_branch(&self, repo: &RepoRef, branch: &str) -> Result<()> {
        debug!(%repo, branch, "deleting branch");
        self.client
            .repos(&repo.owner, &repo.name)
            .delete_ref(&octocrab::params::repos::Reference::Branch(
                branch.to_string(),
            ))
            .await?;
        debug!(%repo, branch, "deleted branch");
        Ok(())
    }

    async fn default_branch(&self, repo: &RepoRef) -> Result<String> {
        debug!(%repo, "getting default branch");
        let info = self.client.repos(&repo.owner, &repo.name).get().await?;
        info.default_branch
            .ok_or_else(|| Error::GitHubApi(format!("{repo} has no default branch")))
    }

    async fn get_file(
        &self,
        repo: &RepoRef,
        path: &str,
        git_ref: &str,
    ) -> Result<Option<FileContents>> {
        debug!(%repo, path, git_ref, "getting file contents");
        let url = format!(
            "/repos/{}/{}/contents/{}?ref={}",
            urlencoding::encode(&repo.owner),
            urlencoding::encode(&repo.name),
            encode_path(path),
            urlencoding::encode(git_ref)
        );

        let Some(raw) = self.get_json::<RestContent>(&url, ACCEPT_JSON).await? else {
            debug!(%repo, path, "file does not exist");
            return Ok(None);
        };

        // The API wraps base64 payloads at 60 columns
        let packed: String = raw.content.split_whitespace().collect();
        let bytes = BASE64
            .decode(packed)
            .map_err(|e| Error::GitHubApi(format!("{path}: invalid base64 content: {e}")))?;
        let content = String::from_utf8(bytes)
            .map_err(|e| Error::GitHubApi(format!("{path}: content is not UTF-8: {e}")))?;

        debug!(%repo, path, sha = %raw.sha, "got file contents");
        Ok(Some(FileContents {
            content,
            sha: raw.sha,
        }))
    }

    async fn put_file(&self, repo: &RepoRef, update: &FileUpdate) -> Result<()> {
        debug!(%repo, path = %update.path, sha = ?update.sha, "writing file");
        let url = format!(
            "/repos/{}/{}/contents/{}",
            urlencoding::encode(&repo.owner),
            urlencoding::encode(&repo.name),
            encode_path(&update.path)
        );

        let body = RestFileUpdate {
            message: &update.message,
            content: BASE64.encode(update.content.as_bytes()),
            sha: update.sha.as_deref(),
            branch: &update.branch,
            committer: &update.committer,
        };

        let response = self
            .request(Method::PUT, &url, ACCEPT_JSON)
            .json(&body)
            .send()
            .await?;

        if response.status() == StatusCode::CONFLICT {
            return Err(Error::FileConflict(update.path.clone()));
        }
        ensure_success(response, &update.path).await?;

        debug!(%repo, path = %update.path, "wrote file");
        Ok(())
    }
}
