//! Member-rooted SELECT queries: joins, filter, grouping, ordering, paging.
//!
//! # Invariants
//! - The root is always `members m`; `teams t` enters only via `TeamSource`.
//! - A query whose filter, grouping, ordering or projection reads a team column
//!   but declares no team source gets an implicit inner relation join.
//! - The count query reuses the source, filter and implicit join decision but
//!   drops ordering and paging.

use crate::page::PageRequest;
use crate::query::bind_u64;
use crate::query::expr::{Column, OrderSpecifier};
use crate::query::predicate::Predicate;
use rusqlite::types::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
}

impl JoinKind {
    fn sql(self) -> &'static str {
        match self {
            Self::Inner => "INNER JOIN",
            Self::Left => "LEFT JOIN",
        }
    }
}

/// How `teams t` takes part in the query.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TeamSource {
    #[default]
    None,
    /// Join over the membership relation `t.team_id = m.team_id`, optionally
    /// narrowed by an extra ON predicate. `fetch` materializes the team on
    /// member entities.
    Relation {
        kind: JoinKind,
        on: Predicate,
        fetch: bool,
    },
    /// Left outer join on an arbitrary predicate, ignoring the relation.
    Unrelated { on: Predicate },
    /// `FROM members m, teams t`; pair rows with a WHERE predicate (theta join).
    Cross,
}

/// SQL text plus positional bind values.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedSql {
    pub sql: String,
    pub binds: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MemberQuery {
    team: TeamSource,
    filter: Predicate,
    group_by: Vec<Column>,
    order_by: Vec<OrderSpecifier>,
    offset: u64,
    limit: Option<u64>,
}

impl MemberQuery {
    pub fn new() -> Self {
        Self::default()
    }

    fn relation(mut self, kind: JoinKind, on: Predicate, fetch: bool) -> Self {
        self.team = TeamSource::Relation { kind, on, fetch };
        self
    }

    /// Inner join over the relation; team columns are readable but member
    /// entities keep an unloaded team reference.
    pub fn join_team(self) -> Self {
        self.relation(JoinKind::Inner, Predicate::always(), false)
    }

    /// Inner fetch join: member entities carry a loaded team.
    pub fn join_team_fetch(self) -> Self {
        self.relation(JoinKind::Inner, Predicate::always(), true)
    }

    pub fn left_join_team(self) -> Self {
        self.relation(JoinKind::Left, Predicate::always(), false)
    }

    pub fn left_join_team_fetch(self) -> Self {
        self.relation(JoinKind::Left, Predicate::always(), true)
    }

    /// Left join over the relation that only pairs teams matching `on`;
    /// every member stays in the result.
    pub fn left_join_team_on(self, on: Predicate) -> Self {
        self.relation(JoinKind::Left, on, false)
    }

    /// Left join on `on` alone, without the membership relation.
    pub fn left_join_unrelated_team(mut self, on: Predicate) -> Self {
        self.team = TeamSource::Unrelated { on };
        self
    }

    pub fn cross_join_team(mut self) -> Self {
        self.team = TeamSource::Cross;
        self
    }

    /// Adds `predicate` to the WHERE conjunction.
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.filter = std::mem::take(&mut self.filter).and(predicate);
        self
    }

    pub fn group_by(mut self, column: Column) -> Self {
        self.group_by.push(column);
        self
    }

    pub fn order_by(mut self, order: OrderSpecifier) -> Self {
        self.order_by.push(order);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Applies the request's offset and limit.
    pub fn page(self, request: &PageRequest) -> Self {
        self.offset(request.offset()).limit(request.limit())
    }

    pub fn team_source(&self) -> &TeamSource {
        &self.team
    }

    pub fn filter_predicate(&self) -> &Predicate {
        &self.filter
    }

    pub fn offset_value(&self) -> u64 {
        self.offset
    }

    pub fn limit_value(&self) -> Option<u64> {
        self.limit
    }

    /// Whether member entities read by this query carry a loaded team.
    pub fn fetches_team(&self) -> bool {
        matches!(self.team, TeamSource::Relation { fetch: true, .. })
    }

    fn needs_team(&self) -> bool {
        self.filter.references_team()
            || self.group_by.iter().any(|column| column.is_team())
            || self.order_by.iter().any(|order| order.column.is_team())
    }

    /// Renders the content query for a projection's select list.
    pub fn render_select(&self, select_list: &str, projection_needs_team: bool) -> RenderedSql {
        let mut sql = format!("SELECT {select_list}");
        let mut binds = Vec::new();
        self.render_from_where(projection_needs_team, &mut sql, &mut binds);
        self.render_group_by(&mut sql);

        if !self.order_by.is_empty() {
            let order = self
                .order_by
                .iter()
                .map(OrderSpecifier::render)
                .collect::<Vec<_>>()
                .join(", ");
            sql.push_str(" ORDER BY ");
            sql.push_str(&order);
        }

        if let Some(limit) = self.limit {
            sql.push_str(" LIMIT ?");
            binds.push(bind_u64(limit));
            if self.offset > 0 {
                sql.push_str(" OFFSET ?");
                binds.push(bind_u64(self.offset));
            }
        } else if self.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            binds.push(bind_u64(self.offset));
        }

        RenderedSql { sql, binds }
    }

    /// Renders `COUNT(*)` over the same source and filter, ignoring paging.
    ///
    /// `projection_needs_team` must match the value passed to
    /// [`MemberQuery::render_select`] so both statements share one FROM clause.
    pub fn render_count(&self, projection_needs_team: bool) -> RenderedSql {
        let mut binds = Vec::new();
        let sql = if self.group_by.is_empty() {
            let mut sql = String::from("SELECT COUNT(*)");
            self.render_from_where(projection_needs_team, &mut sql, &mut binds);
            sql
        } else {
            let mut inner = String::from("SELECT 1");
            self.render_from_where(projection_needs_team, &mut inner, &mut binds);
            self.render_group_by(&mut inner);
            format!("SELECT COUNT(*) FROM ({inner})")
        };
        RenderedSql { sql, binds }
    }

    fn render_from_where(
        &self,
        projection_needs_team: bool,
        sql: &mut String,
        binds: &mut Vec<Value>,
    ) {
        sql.push_str(" FROM members m");
        match &self.team {
            TeamSource::None => {
                if projection_needs_team || self.needs_team() {
                    sql.push_str(" INNER JOIN teams t ON t.team_id = m.team_id");
                }
            }
            TeamSource::Relation { kind, on, .. } => {
                sql.push(' ');
                sql.push_str(kind.sql());
                sql.push_str(" teams t ON t.team_id = m.team_id");
                if !on.is_always() {
                    sql.push_str(" AND ");
                    on.render(sql, binds);
                }
            }
            TeamSource::Unrelated { on } => {
                sql.push_str(" LEFT JOIN teams t ON ");
                if on.is_always() {
                    sql.push_str("1 = 1");
                } else {
                    on.render(sql, binds);
                }
            }
            TeamSource::Cross => sql.push_str(", teams t"),
        }

        if !self.filter.is_always() {
            sql.push_str(" WHERE ");
            self.filter.render(sql, binds);
        }
    }

    fn render_group_by(&self, sql: &mut String) {
        if self.group_by.is_empty() {
            return;
        }
        let columns = self
            .group_by
            .iter()
            .map(|column| column.qualified())
            .collect::<Vec<_>>()
            .join(", ");
        sql.push_str(" GROUP BY ");
        sql.push_str(&columns);
    }
}
