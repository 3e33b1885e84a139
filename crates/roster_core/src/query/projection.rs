//! Row-to-value projections.
//!
//! # Responsibility
//! - Pair a select list with the code that reads it back.
//! - Offer setter, field and constructor construction for flat DTOs; all
//!   three read the same columns and yield equal values.
//!
//! # Invariants
//! - Projections never issue queries; a member read without a fetch join
//!   keeps `TeamRef::Unloaded`.

use crate::model::member::{Member, Team, TeamRef};
use crate::model::row::{MemberDto, MemberTeamRow, UserDto};
use crate::query::expr::{Column, Expr};
use crate::query::select::MemberQuery;
use crate::repo::error::{RepoError, RepoResult};
use rusqlite::types::{FromSql, Value};
use rusqlite::Row;
use std::marker::PhantomData;

/// A select list together with its row mapper.
pub trait Projection {
    type Output;

    /// Comma-separated select expressions, in the order `map_row` reads them.
    fn select_list(&self) -> String;

    /// Whether the select list reads `teams t`.
    fn requires_team(&self) -> bool {
        false
    }

    fn map_row(&self, row: &Row<'_>) -> RepoResult<Self::Output>;
}

/// How a flat DTO is assembled from a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectionStyle {
    /// Start from `Default` and call setters by column alias.
    Setter,
    /// Struct literal filled by column alias.
    Field,
    /// Positional constructor reading columns by index.
    #[default]
    Constructor,
}

const MEMBER_TEAM_COLUMNS: &str = "m.member_id AS member_id, \
     m.username AS username, \
     m.age AS age, \
     t.team_id AS team_id, \
     t.name AS team_name";

/// Member joined with team, flattened into [`MemberTeamRow`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MemberTeamProjection {
    pub style: ProjectionStyle,
}

impl MemberTeamProjection {
    pub fn new(style: ProjectionStyle) -> Self {
        Self { style }
    }
}

impl Projection for MemberTeamProjection {
    type Output = MemberTeamRow;

    fn select_list(&self) -> String {
        MEMBER_TEAM_COLUMNS.to_string()
    }

    fn requires_team(&self) -> bool {
        true
    }

    fn map_row(&self, row: &Row<'_>) -> RepoResult<MemberTeamRow> {
        let mapped = match self.style {
            ProjectionStyle::Setter => {
                let mut dto = MemberTeamRow::default();
                dto.set_member_id(row.get("member_id")?);
                dto.set_username(row.get("username")?);
                dto.set_age(row.get("age")?);
                dto.set_team_id(row.get("team_id")?);
                dto.set_team_name(row.get("team_name")?);
                dto
            }
            ProjectionStyle::Field => MemberTeamRow {
                member_id: row.get("member_id")?,
                username: row.get("username")?,
                age: row.get("age")?,
                team_id: row.get("team_id")?,
                team_name: row.get("team_name")?,
            },
            ProjectionStyle::Constructor => MemberTeamRow::new(
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
            ),
        };
        Ok(mapped)
    }
}

/// Username and age into [`MemberDto`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MemberDtoProjection {
    pub style: ProjectionStyle,
}

impl MemberDtoProjection {
    pub fn new(style: ProjectionStyle) -> Self {
        Self { style }
    }
}

impl Projection for MemberDtoProjection {
    type Output = MemberDto;

    fn select_list(&self) -> String {
        "m.username AS username, m.age AS age".to_string()
    }

    fn map_row(&self, row: &Row<'_>) -> RepoResult<MemberDto> {
        let mapped = match self.style {
            ProjectionStyle::Setter => {
                let mut dto = MemberDto::default();
                dto.set_username(row.get("username")?);
                dto.set_age(row.get("age")?);
                dto
            }
            ProjectionStyle::Field => MemberDto {
                username: row.get("username")?,
                age: row.get("age")?,
            },
            ProjectionStyle::Constructor => MemberDto::new(row.get(0)?, row.get(1)?),
        };
        Ok(mapped)
    }
}

/// Username aliased to `name`, into [`UserDto`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UserDtoProjection;

impl Projection for UserDtoProjection {
    type Output = UserDto;

    fn select_list(&self) -> String {
        "m.username AS name, m.age AS age".to_string()
    }

    fn map_row(&self, row: &Row<'_>) -> RepoResult<UserDto> {
        Ok(UserDto {
            name: row.get("name")?,
            age: row.get("age")?,
        })
    }
}

/// Member entities. Team columns are read only under a fetch join.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemberProjection {
    fetch_team: bool,
}

impl MemberProjection {
    /// Member entities without team materialization.
    pub fn new() -> Self {
        Self::default()
    }

    /// Honors the query's fetch join, if any.
    pub fn for_query(query: &MemberQuery) -> Self {
        Self {
            fetch_team: query.fetches_team(),
        }
    }
}

impl Projection for MemberProjection {
    type Output = Member;

    fn select_list(&self) -> String {
        let mut list = String::from(
            "m.member_id AS member_id, m.username AS username, m.age AS age, m.team_id AS member_team_id",
        );
        if self.fetch_team {
            list.push_str(", t.team_id AS fetched_team_id, t.name AS fetched_team_name");
        }
        list
    }

    fn requires_team(&self) -> bool {
        self.fetch_team
    }

    fn map_row(&self, row: &Row<'_>) -> RepoResult<Member> {
        let member_team_id: Option<i64> = row.get("member_team_id")?;
        let team = if self.fetch_team {
            let fetched_id: Option<i64> = row.get("fetched_team_id")?;
            match (member_team_id, fetched_id) {
                (_, Some(id)) => {
                    let name: Option<String> = row.get("fetched_team_name")?;
                    let name = name.ok_or_else(|| {
                        RepoError::InvalidData(format!("team {id} has no name"))
                    })?;
                    Some(TeamRef::Loaded(Team { id, name }))
                }
                (Some(id), None) => Some(TeamRef::Unloaded { id }),
                (None, None) => None,
            }
        } else {
            member_team_id.map(|id| TeamRef::Unloaded { id })
        };

        Ok(Member {
            id: row.get("member_id")?,
            username: row.get("username")?,
            age: row.get("age")?,
            team,
        })
    }
}

/// Member entity paired with whatever team row the join produced.
///
/// Used with outer joins where the joined team may be absent or may not be
/// the member's own team (unrelated joins).
#[derive(Debug, Clone, Copy, Default)]
pub struct MemberWithTeamProjection;

impl Projection for MemberWithTeamProjection {
    type Output = (Member, Option<Team>);

    fn select_list(&self) -> String {
        let mut list = MemberProjection::new().select_list();
        list.push_str(", t.team_id AS joined_team_id, t.name AS joined_team_name");
        list
    }

    fn requires_team(&self) -> bool {
        true
    }

    fn map_row(&self, row: &Row<'_>) -> RepoResult<(Member, Option<Team>)> {
        let member = MemberProjection::new().map_row(row)?;
        let joined_id: Option<i64> = row.get("joined_team_id")?;
        let joined_name: Option<String> = row.get("joined_team_name")?;
        let team = match (joined_id, joined_name) {
            (Some(id), Some(name)) => Some(Team { id, name }),
            _ => None,
        };
        Ok((member, team))
    }
}

/// A single column read as `T`.
#[derive(Debug, Clone, Copy)]
pub struct ColumnProjection<T> {
    column: Column,
    _output: PhantomData<fn() -> T>,
}

impl<T: FromSql> ColumnProjection<T> {
    pub fn new(column: Column) -> Self {
        Self {
            column,
            _output: PhantomData,
        }
    }
}

impl<T: FromSql> Projection for ColumnProjection<T> {
    type Output = T;

    fn select_list(&self) -> String {
        self.column.qualified().to_string()
    }

    fn requires_team(&self) -> bool {
        self.column.is_team()
    }

    fn map_row(&self, row: &Row<'_>) -> RepoResult<T> {
        Ok(row.get(0)?)
    }
}

/// Untyped row of expression values, read positionally.
#[derive(Debug, Clone, PartialEq)]
pub struct Tuple {
    values: Vec<Value>,
}

impl Tuple {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn get_i64(&self, index: usize) -> Option<i64> {
        match self.values.get(index)? {
            Value::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Reads a REAL, widening INTEGER values (SQLite may return either for
    /// aggregates).
    pub fn get_f64(&self, index: usize) -> Option<f64> {
        match self.values.get(index)? {
            Value::Real(value) => Some(*value),
            Value::Integer(value) => Some(*value as f64),
            _ => None,
        }
    }

    pub fn get_text(&self, index: usize) -> Option<&str> {
        match self.values.get(index)? {
            Value::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }
}

/// Columns and aggregates into [`Tuple`] rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TupleProjection {
    exprs: Vec<Expr>,
}

impl TupleProjection {
    pub fn new(exprs: impl IntoIterator<Item = Expr>) -> Self {
        Self {
            exprs: exprs.into_iter().collect(),
        }
    }
}

impl Projection for TupleProjection {
    type Output = Tuple;

    fn select_list(&self) -> String {
        self.exprs
            .iter()
            .map(Expr::render)
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn requires_team(&self) -> bool {
        self.exprs.iter().any(Expr::references_team)
    }

    fn map_row(&self, row: &Row<'_>) -> RepoResult<Tuple> {
        let values = (0..self.exprs.len())
            .map(|index| row.get::<_, Value>(index))
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(Tuple { values })
    }
}
