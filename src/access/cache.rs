//! Process-lifetime caches for authorization lookups.
//!
//! Entries are never evicted or expired. Locks are held only for the map
//! operation itself, never across a forge call, so two concurrent lookups
//! for the same key may both query the forge; the later write wins.

use crate::types::{Team, TeamRepository, User};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Key for a team membership answer
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct MembershipKey {
    org_id: u64,
    team_id: u64,
    login: String,
}

/// Key for a team-repository relationship
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct TeamRepoKey {
    org_id: u64,
    team_id: u64,
    owner: String,
    repo: String,
}

/// Shared authorization cache
#[derive(Debug, Default)]
pub struct AccessCache {
    teams: RwLock<HashMap<String, Arc<[Team]>>>,
    memberships: RwLock<HashMap<MembershipKey, bool>>,
    team_repos: RwLock<HashMap<TeamRepoKey, TeamRepository>>,
    org_owners: RwLock<HashMap<String, Arc<[User]>>>,
}

fn read<K, V, Q, R>(map: &RwLock<HashMap<K, V>>, key: &Q, f: impl FnOnce(&V) -> R) -> Option<R>
where
    K: std::borrow::Borrow<Q> + Eq + std::hash::Hash,
    Q: Eq + std::hash::Hash + ?Sized,
{
    map.read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(key)
        .map(f)
}

fn write<K: Eq + std::hash::Hash, V>(map: &RwLock<HashMap<K, V>>, key: K, value: V) {
    map.write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(key, value);
}

impl AccessCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached teams of an organization
    pub fn teams(&self, org: &str) -> Option<Arc<[Team]>> {
        read(&self.teams, org, Arc::clone)
    }

    /// Cache the teams of an organization
    pub fn store_teams(&self, org: &str, teams: Vec<Team>) -> Arc<[Team]> {
        let teams: Arc<[Team]> = teams.into();
        write(&self.teams, org.to_string(), Arc::clone(&teams));
        teams
    }

    /// Cached membership answer: `None` when unknown
    pub fn membership(&self, org_id: u64, team_id: u64, login: &str) -> Option<bool> {
        let key = MembershipKey {
            org_id,
            team_id,
            login: login.to_string(),
        };
        read(&self.memberships, &key, |answer| *answer)
    }

    /// Pin a membership answer
    pub fn store_membership(&self, org_id: u64, team_id: u64, login: &str, is_member: bool) {
        let key = MembershipKey {
            org_id,
            team_id,
            login: login.to_string(),
        };
        write(&self.memberships, key, is_member);
    }

    /// Cached team-repository relationship
    pub fn team_repo(
        &self,
        org_id: u64,
        team_id: u64,
        owner: &str,
        repo: &str,
    ) -> Option<TeamRepository> {
        let key = TeamRepoKey {
            org_id,
            team_id,
            owner: owner.to_string(),
            repo: repo.to_string(),
        };
        read(&self.team_repos, &key, Clone::clone)
    }

    /// Cache a team-repository relationship
    pub fn store_team_repo(
        &self,
        org_id: u64,
        team_id: u64,
        owner: &str,
        repo: &str,
        relationship: TeamRepository,
    ) {
        let key = TeamRepoKey {
            org_id,
            team_id,
            owner: owner.to_string(),
            repo: repo.to_string(),
        };
        write(&self.team_repos, key, relationship);
    }

    /// Cached owners (admin-role members) of an organization
    pub fn org_owners(&self, org: &str) -> Option<Arc<[User]>> {
        read(&self.org_owners, org, Arc::clone)
    }

    /// Cache the owners of an organization
    pub fn store_org_owners(&self, org: &str, owners: Vec<User>) -> Arc<[User]> {
        let owners: Arc<[User]> = owners.into();
        write(&self.org_owners, org.to_string(), Arc::clone(&owners));
        owners
    }
}
