//! Paginated member/team search over any [`QueryExecutor`].
//!
//! # Invariants
//! - Content queries inner-join members to teams without fetching; team
//!   fields are projected, never materialized on entities.
//! - Rows are ordered by member id so pages are stable.
//! - `search_page_simple` always issues the count query.
//! - `search_page_complex` skips the count query only on a short first page.

use crate::model::condition::MemberSearchCondition;
use crate::model::member::Member;
use crate::model::row::MemberTeamRow;
use crate::page::{CountDecision, Page, PageRequest};
use crate::query::expr::Column;
use crate::query::predicate::Predicate;
use crate::query::projection::{
    MemberProjection, MemberTeamProjection, Projection, ProjectionStyle,
};
use crate::query::select::MemberQuery;
use crate::repo::error::RepoResult;
use crate::repo::executor::QueryExecutor;
use crate::search::predicates::{condition_filter, condition_filter_builder};
use log::debug;

/// How a search condition becomes a filter. Both produce equal filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterStyle {
    /// Fold of independent optional predicates.
    #[default]
    WhereParams,
    /// Imperative accumulator.
    Builder,
}

impl FilterStyle {
    fn filter(self, condition: &MemberSearchCondition) -> Predicate {
        match self {
            Self::WhereParams => condition_filter(condition),
            Self::Builder => condition_filter_builder(condition),
        }
    }
}

/// Search entry points bound to one executor.
pub struct MemberSearch<E: QueryExecutor> {
    executor: E,
    filter_style: FilterStyle,
    projection: MemberTeamProjection,
}

impl<E: QueryExecutor> MemberSearch<E> {
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            filter_style: FilterStyle::default(),
            projection: MemberTeamProjection::default(),
        }
    }

    pub fn with_filter_style(mut self, filter_style: FilterStyle) -> Self {
        self.filter_style = filter_style;
        self
    }

    pub fn with_projection_style(mut self, style: ProjectionStyle) -> Self {
        self.projection = MemberTeamProjection::new(style);
        self
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    fn base_query(&self, condition: &MemberSearchCondition) -> MemberQuery {
        MemberQuery::new()
            .join_team()
            .filter(self.filter_style.filter(condition))
            .order_by(Column::MemberId.asc())
    }

    /// All matching rows, unpaged.
    pub fn search(&self, condition: &MemberSearchCondition) -> RepoResult<Vec<MemberTeamRow>> {
        self.executor.fetch(&self.base_query(condition), &self.projection)
    }

    /// Content query plus an unconditional count query.
    pub fn search_page_simple(
        &self,
        condition: &MemberSearchCondition,
        request: &PageRequest,
    ) -> RepoResult<Page<MemberTeamRow>> {
        let query = self.base_query(condition);
        let results = self
            .executor
            .fetch(&query.clone().page(request), &self.projection)?;
        let total = self.executor.count_for(&query, &self.projection)?;

        debug!(
            "event=search_page module=search status=ok strategy=simple count_query=issued rows={} total={total}",
            results.len()
        );
        Page::from_counted(results, request, total)
    }

    /// Content query first; the count query runs only when the first page is
    /// full or the request is past the first page.
    pub fn search_page_complex(
        &self,
        condition: &MemberSearchCondition,
        request: &PageRequest,
    ) -> RepoResult<Page<MemberTeamRow>> {
        self.page_with_count_elision(self.base_query(condition), &self.projection, request)
    }

    /// Member entities (team unloaded) paged with count elision.
    pub fn search_members_page(
        &self,
        condition: &MemberSearchCondition,
        request: &PageRequest,
    ) -> RepoResult<Page<Member>> {
        let query = self.base_query(condition);
        let projection = MemberProjection::for_query(&query);
        self.page_with_count_elision(query, &projection, request)
    }

    fn page_with_count_elision<P: Projection>(
        &self,
        query: MemberQuery,
        projection: &P,
        request: &PageRequest,
    ) -> RepoResult<Page<P::Output>> {
        let results = self.executor.fetch(&query.clone().page(request), projection)?;
        let (page, decision) = Page::from_content(results, request, || {
            self.executor.count_for(&query, projection)
        })?;

        let count_query = match decision {
            CountDecision::Skip { .. } => "skipped",
            CountDecision::Issue => "issued",
        };
        debug!(
            "event=search_page module=search status=ok strategy=complex count_query={count_query} rows={} total={}",
            page.results.len(),
            page.total
        );
        Ok(page)
    }
}
