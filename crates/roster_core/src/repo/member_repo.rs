//! Member/team repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist teams and members, and read them back as snapshots.
//! - Execute `MemberQuery` values and set-based bulk statements.
//!
//! # Invariants
//! - Write paths validate before SQL mutations.
//! - Bulk operations bypass every in-process copy of affected members; the
//!   caller must re-read members obtained before the bulk call.

use crate::model::member::{Member, MemberId, Team, TeamId, TeamRef};
use crate::query::expr::Column;
use crate::query::mutation::{age_delta_out_of_range, render_delete, render_update, Assignment};
use crate::query::predicate::Predicate;
use crate::query::projection::{MemberProjection, Projection};
use crate::query::select::MemberQuery;
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::executor::QueryExecutor;
use log::{debug, info, warn};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection};

/// Repository interface for member/team persistence.
pub trait MemberRepository: QueryExecutor {
    fn save_team(&self, name: &str) -> RepoResult<Team>;
    /// Persists a member, optionally assigned to an existing team.
    fn save_member(
        &self,
        username: Option<&str>,
        age: i32,
        team_id: Option<TeamId>,
    ) -> RepoResult<Member>;
    fn find_team(&self, id: TeamId) -> RepoResult<Option<Team>>;
    fn find_member(&self, id: MemberId) -> RepoResult<Option<Member>>;
    /// All members in id order.
    fn find_all(&self) -> RepoResult<Vec<Member>>;
    fn find_by_username(&self, username: &str) -> RepoResult<Vec<Member>>;
    /// Inverse side of the membership relation, in id order.
    fn members_of_team(&self, team_id: TeamId) -> RepoResult<Vec<Member>>;
    /// Sets `username = replacement` on every member with `age < age_below`.
    fn bulk_rename(&self, age_below: i32, replacement: &str) -> RepoResult<usize>;
    /// Adds `delta` to every member's age.
    ///
    /// Writes nothing and fails with `InvalidArgument` when any resulting age
    /// would fall outside `0..=i32::MAX`.
    fn bulk_increment_age(&self, delta: i32) -> RepoResult<usize>;
    /// Deletes every member with `age > threshold`.
    fn bulk_delete_by_age_greater_than(&self, threshold: i32) -> RepoResult<usize>;
}

/// SQLite-backed member repository over a caller-owned connection.
pub struct SqliteMemberRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMemberRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Rejects the whole statement if any matched member would leave the
    /// valid age range.
    fn ensure_age_delta_fits(&self, filter: &Predicate, delta: i64) -> RepoResult<()> {
        let offending = MemberQuery::new()
            .filter(filter.clone())
            .filter(age_delta_out_of_range(delta));
        let rejected = self.count(&offending)?;
        if rejected > 0 {
            warn!(
                "event=bulk_write module=repo status=rejected operation=update delta={delta} out_of_range={rejected}"
            );
            return Err(RepoError::InvalidArgument(format!(
                "adding {delta} to age would move {rejected} member(s) outside 0..={}",
                i32::MAX
            )));
        }
        Ok(())
    }

    fn execute_bulk(
        &self,
        operation: &'static str,
        sql: &str,
        binds: Vec<Value>,
    ) -> RepoResult<usize> {
        let affected = self.conn.execute(sql, params_from_iter(binds))?;
        info!(
            "event=bulk_write module=repo status=ok operation={operation} affected={affected} note=reload_members_read_before_this_call"
        );
        Ok(affected)
    }
}

impl QueryExecutor for SqliteMemberRepository<'_> {
    fn fetch<P: Projection>(
        &self,
        query: &MemberQuery,
        projection: &P,
    ) -> RepoResult<Vec<P::Output>> {
        let rendered =
            query.render_select(&projection.select_list(), projection.requires_team());
        debug!(
            "event=query_fetch module=repo status=start sql={}",
            rendered.sql
        );

        let mut stmt = self.conn.prepare(&rendered.sql)?;
        let mut rows = stmt.query(params_from_iter(rendered.binds))?;
        let mut mapped = Vec::new();
        while let Some(row) = rows.next()? {
            mapped.push(projection.map_row(row)?);
        }

        debug!("event=query_fetch module=repo status=ok rows={}", mapped.len());
        Ok(mapped)
    }

    fn count_for<P: Projection>(&self, query: &MemberQuery, projection: &P) -> RepoResult<u64> {
        let rendered = query.render_count(projection.requires_team());
        debug!(
            "event=query_count module=repo status=start sql={}",
            rendered.sql
        );

        let total: i64 = self.conn.query_row(
            &rendered.sql,
            params_from_iter(rendered.binds),
            |row| row.get(0),
        )?;
        u64::try_from(total)
            .map_err(|_| RepoError::InvalidData(format!("negative row count {total}")))
    }

    fn update(&self, assignments: &[Assignment], filter: &Predicate) -> RepoResult<usize> {
        let rendered = render_update(assignments, filter)?;
        for assignment in assignments {
            if let Assignment::Add {
                column: Column::MemberAge,
                delta,
            } = assignment
            {
                self.ensure_age_delta_fits(filter, *delta)?;
            }
        }
        self.execute_bulk("update", &rendered.sql, rendered.binds)
    }

    fn delete(&self, filter: &Predicate) -> RepoResult<usize> {
        let rendered = render_delete(filter)?;
        self.execute_bulk("delete", &rendered.sql, rendered.binds)
    }
}

impl MemberRepository for SqliteMemberRepository<'_> {
    fn save_team(&self, name: &str) -> RepoResult<Team> {
        Team::validate_name(name)?;

        self.conn.execute("INSERT INTO teams (name) VALUES (?1);", [name])?;
        Ok(Team {
            id: self.conn.last_insert_rowid(),
            name: name.to_string(),
        })
    }

    fn save_member(
        &self,
        username: Option<&str>,
        age: i32,
        team_id: Option<TeamId>,
    ) -> RepoResult<Member> {
        Member::validate_fields(age)?;
        if let Some(id) = team_id {
            if self.find_team(id)?.is_none() {
                return Err(RepoError::NotFound(format!("team {id}")));
            }
        }

        self.conn.execute(
            "INSERT INTO members (username, age, team_id) VALUES (?1, ?2, ?3);",
            params![username, age, team_id],
        )?;
        Ok(Member {
            id: self.conn.last_insert_rowid(),
            username: username.map(str::to_string),
            age,
            team: team_id.map(|id| TeamRef::Unloaded { id }),
        })
    }

    fn find_team(&self, id: TeamId) -> RepoResult<Option<Team>> {
        let mut stmt = self
            .conn
            .prepare("SELECT team_id, name FROM teams WHERE team_id = ?1;")?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(Team {
                id: row.get("team_id")?,
                name: row.get("name")?,
            }));
        }
        Ok(None)
    }

    fn find_member(&self, id: MemberId) -> RepoResult<Option<Member>> {
        let query = MemberQuery::new().filter(Column::MemberId.eq(id));
        self.fetch_one(&query, &MemberProjection::new())
    }

    fn find_all(&self) -> RepoResult<Vec<Member>> {
        let query = MemberQuery::new().order_by(Column::MemberId.asc());
        self.fetch(&query, &MemberProjection::new())
    }

    fn find_by_username(&self, username: &str) -> RepoResult<Vec<Member>> {
        let query = MemberQuery::new()
            .filter(Column::MemberName.eq(username.to_string()))
            .order_by(Column::MemberId.asc());
        self.fetch(&query, &MemberProjection::new())
    }

    fn members_of_team(&self, team_id: TeamId) -> RepoResult<Vec<Member>> {
        let query = MemberQuery::new()
            .filter(Column::MemberTeamId.eq(team_id))
            .order_by(Column::MemberId.asc());
        self.fetch(&query, &MemberProjection::new())
    }

    fn bulk_rename(&self, age_below: i32, replacement: &str) -> RepoResult<usize> {
        self.update(
            &[Assignment::set(Column::MemberName, replacement.to_string())],
            &Column::MemberAge.lt(age_below),
        )
    }

    fn bulk_increment_age(&self, delta: i32) -> RepoResult<usize> {
        self.update(
            &[Assignment::add(Column::MemberAge, i64::from(delta))],
            &Predicate::always(),
        )
    }

    fn bulk_delete_by_age_greater_than(&self, threshold: i32) -> RepoResult<usize> {
        self.delete(&Column::MemberAge.gt(threshold))
    }
}
