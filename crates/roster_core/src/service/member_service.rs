//! Member use-case service.
//!
//! # Responsibility
//! - Provide registration and bulk-maintenance entry points for callers.
//! - Make the post-bulk reload step explicit through `BulkOutcome`/`reload`.
//!
//! # Invariants
//! - Service APIs never bypass repository validation.
//! - Service layer remains storage-agnostic.

use crate::model::member::{Member, Team, TeamId};
use crate::repo::error::RepoResult;
use crate::repo::member_repo::MemberRepository;
use log::warn;

/// Result of a set-based write.
///
/// Every `Member` read before the write is stale: it still shows the old
/// values, or describes a row that no longer exists. Re-read them
/// (see [`MemberService::reload`]) before using them again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "members read before a bulk write are stale; reload them"]
pub struct BulkOutcome {
    pub affected: usize,
}

/// Use-case service wrapper over a member repository.
pub struct MemberService<R: MemberRepository> {
    repo: R,
}

impl<R: MemberRepository> MemberService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn register_team(&self, name: &str) -> RepoResult<Team> {
        self.repo.save_team(name)
    }

    /// Registers a member, optionally on an existing team.
    pub fn register_member(
        &self,
        username: Option<&str>,
        age: i32,
        team_id: Option<TeamId>,
    ) -> RepoResult<Member> {
        self.repo.save_member(username, age, team_id)
    }

    /// Renames every member younger than `age_below` to `replacement`.
    pub fn rename_younger_than(
        &self,
        age_below: i32,
        replacement: &str,
    ) -> RepoResult<BulkOutcome> {
        let affected = self.repo.bulk_rename(age_below, replacement)?;
        Ok(BulkOutcome { affected })
    }

    pub fn increment_ages(&self, delta: i32) -> RepoResult<BulkOutcome> {
        let affected = self.repo.bulk_increment_age(delta)?;
        Ok(BulkOutcome { affected })
    }

    pub fn delete_older_than(&self, threshold: i32) -> RepoResult<BulkOutcome> {
        let affected = self.repo.bulk_delete_by_age_greater_than(threshold)?;
        Ok(BulkOutcome { affected })
    }

    /// Re-reads snapshots by id; members deleted in the meantime are dropped.
    pub fn reload(&self, members: &[Member]) -> RepoResult<Vec<Member>> {
        let mut fresh = Vec::with_capacity(members.len());
        for member in members {
            match self.repo.find_member(member.id)? {
                Some(reloaded) => fresh.push(reloaded),
                None => warn!(
                    "event=member_reload module=service status=dropped member_id={}",
                    member.id
                ),
            }
        }
        Ok(fresh)
    }
}
