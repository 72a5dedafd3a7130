//! Push-access authorization via organization teams
//!
//! A user may merge when they are an active member of some team of the
//! repository owner's organization that holds `push` or `admin` on the
//! repository. Lookups fail closed: any forge error means "no access".

mod cache;

pub use cache::AccessCache;

use crate::platform::PlatformService;
use crate::types::{MembershipState, RepoRef, Team, User};
use std::sync::Arc;
use tracing::{debug, warn};

/// Answers authorization questions, caching forge answers in an [`AccessCache`]
pub struct AccessResolver<'a> {
    platform: &'a dyn PlatformService,
    cache: &'a AccessCache,
}

impl<'a> AccessResolver<'a> {
    /// Create a resolver over a platform and a shared cache
    pub const fn new(platform: &'a dyn PlatformService, cache: &'a AccessCache) -> Self {
        Self { platform, cache }
    }

    /// Whether `login` can push to `org/repo`
    pub async fn has_push_access(&self, org: &str, repo: &str, login: &str) -> bool {
        let repo = RepoRef::new(org, repo);
        for team in self.teams_for_org(org).await.iter() {
            if self.is_team_member(team, login).await && self.team_has_push_access(team, &repo).await
            {
                debug!(login, %repo, team = %team.slug, "push access granted");
                return true;
            }
        }
        debug!(login, %repo, "no team grants push access");
        false
    }

    /// Whether `login` is an owner (admin-role member) of `org`
    pub async fn is_org_owner(&self, org: &str, login: &str) -> bool {
        self.owners_for_org(org)
            .await
            .iter()
            .any(|owner| owner.login == login)
    }

    async fn teams_for_org(&self, org: &str) -> Arc<[Team]> {
        if let Some(teams) = self.cache.teams(org) {
            debug!(org, "teams cache hit");
            return teams;
        }

        let teams = match self.platform.list_teams(org).await {
            Ok(teams) => teams,
            Err(e) => {
                warn!(org, error = %e, "failed to list teams");
                return Arc::from([]);
            }
        };
        let org_data = match self.platform.get_org(org).await {
            Ok(org_data) => org_data,
            Err(e) => {
                warn!(org, error = %e, "failed to get organization");
                return Arc::from([]);
            }
        };

        let teams = teams
            .into_iter()
            .map(|team| Team {
                org_id: org_data.id,
                ..team
            })
            .collect();
        self.cache.store_teams(org, teams)
    }

    async fn is_team_member(&self, team: &Team, login: &str) -> bool {
        if let Some(answer) = self.cache.membership(team.org_id, team.id, login) {
            debug!(team = %team.slug, login, answer, "membership cache hit");
            return answer;
        }

        match self
            .platform
            .get_team_membership(team.org_id, team.id, login)
            .await
        {
            Ok(state) => {
                let is_member = state == MembershipState::Active;
                self.cache
                    .store_membership(team.org_id, team.id, login, is_member);
                is_member
            }
            Err(e) => {
                // Not cached: the next check asks again
                warn!(team = %team.slug, login, error = %e, "failed to check team membership");
                false
            }
        }
    }

    async fn team_has_push_access(&self, team: &Team, repo: &RepoRef) -> bool {
        let cached = self
            .cache
            .team_repo(team.org_id, team.id, &repo.owner, &repo.name);

        let relationship = match cached {
            Some(relationship) => relationship,
            None => match self.platform.get_team_repo(team.org_id, team.id, repo).await {
                Ok(Some(relationship)) => {
                    self.cache.store_team_repo(
                        team.org_id,
                        team.id,
                        &repo.owner,
                        &repo.name,
                        relationship.clone(),
                    );
                    relationship
                }
                Ok(None) => return false,
                Err(e) => {
                    warn!(team = %team.slug, %repo, error = %e, "failed to check team repository");
                    return false;
                }
            },
        };

        relationship.can_push()
    }

    async fn owners_for_org(&self, org: &str) -> Arc<[User]> {
        if let Some(owners) = self.cache.org_owners(org) {
            return owners;
        }

        match self.platform.list_org_admins(org).await {
            Ok(owners) => self.cache.store_org_owners(org, owners),
            Err(e) => {
                warn!(org, error = %e, "failed to list organization owners");
                Arc::from([])
            }
        }
    }
}
