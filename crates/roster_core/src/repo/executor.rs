//! Query-execution contract.
//!
//! # Invariants
//! - Every call runs synchronously on the caller's connection; nothing is
//!   issued in parallel and nothing is retried.
//! - Zero matching rows is never an error for `fetch`, `count`, `update` or
//!   `delete`.
//! - `count_for` and `fetch` render the same FROM clause for a given query and
//!   projection.

use crate::query::mutation::Assignment;
use crate::query::predicate::Predicate;
use crate::query::projection::{MemberProjection, Projection};
use crate::query::select::MemberQuery;
use crate::repo::error::{RepoError, RepoResult};

/// Executes member queries and set-based member mutations.
pub trait QueryExecutor {
    /// Runs the content query and maps every row through `projection`.
    fn fetch<P: Projection>(
        &self,
        query: &MemberQuery,
        projection: &P,
    ) -> RepoResult<Vec<P::Output>>;

    /// Counts the rows `fetch(query, projection)` would return without the
    /// query's offset and limit. Joins match the content query exactly,
    /// including the implicit team join a team-reading projection adds.
    fn count_for<P: Projection>(&self, query: &MemberQuery, projection: &P) -> RepoResult<u64>;

    /// Applies `assignments` to every member matching `filter`.
    ///
    /// Previously read member snapshots are not touched; reload them.
    fn update(&self, assignments: &[Assignment], filter: &Predicate) -> RepoResult<usize>;

    /// Deletes every member matching `filter`.
    ///
    /// Previously read member snapshots are not touched; reload them.
    fn delete(&self, filter: &Predicate) -> RepoResult<usize>;

    /// Counts matching member entities (see [`QueryExecutor::count_for`]).
    fn count(&self, query: &MemberQuery) -> RepoResult<u64> {
        self.count_for(query, &MemberProjection::new())
    }

    /// Returns the only matching row, `None` when nothing matches.
    ///
    /// The query's own limit is replaced by a two-row lookahead, so a
    /// `limit(1)` query matching several rows still fails.
    ///
    /// # Errors
    /// - `NonUniqueResult` when more than one row matches.
    fn fetch_one<P: Projection>(
        &self,
        query: &MemberQuery,
        projection: &P,
    ) -> RepoResult<Option<P::Output>> {
        let mut rows = self.fetch(&query.clone().limit(2), projection)?;
        if rows.len() > 1 {
            return Err(RepoError::NonUniqueResult {
                matched: rows.len(),
            });
        }
        Ok(rows.pop())
    }

    /// Like [`QueryExecutor::fetch_one`], but a missing row is an error.
    ///
    /// # Errors
    /// - `NotFound` when nothing matches.
    /// - `NonUniqueResult` when more than one row matches.
    fn fetch_required<P: Projection>(
        &self,
        query: &MemberQuery,
        projection: &P,
    ) -> RepoResult<P::Output> {
        self.fetch_one(query, projection)?
            .ok_or_else(|| RepoError::NotFound("member query matched no rows".to_string()))
    }

    /// Returns the first row in query order, if any.
    fn fetch_first<P: Projection>(
        &self,
        query: &MemberQuery,
        projection: &P,
    ) -> RepoResult<Option<P::Output>> {
        let mut rows = self.fetch(&query.clone().limit(1), projection)?;
        Ok(rows.pop())
    }
}

impl<E: QueryExecutor + ?Sized> QueryExecutor for &E {
    fn fetch<P: Projection>(
        &self,
        query: &MemberQuery,
        projection: &P,
    ) -> RepoResult<Vec<P::Output>> {
        (**self).fetch(query, projection)
    }

    fn count_for<P: Projection>(&self, query: &MemberQuery, projection: &P) -> RepoResult<u64> {
        (**self).count_for(query, projection)
    }

    fn update(&self, assignments: &[Assignment], filter: &Predicate) -> RepoResult<usize> {
        (**self).update(assignments, filter)
    }

    fn delete(&self, filter: &Predicate) -> RepoResult<usize> {
        (**self).delete(filter)
    }
}
