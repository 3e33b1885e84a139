//! Set-based UPDATE/DELETE statements over `members`.
//!
//! Bulk statements run directly against the store. Member snapshots read
//! before a bulk statement keep their old values; callers re-read them.
//!
//! # Invariants
//! - A bulk statement never moves `age` outside `0..=i32::MAX`. Constant
//!   assignments are checked here; relative ones are checked by the executor
//!   against [`age_delta_out_of_range`] before the statement runs.

use crate::query::expr::Column;
use crate::query::predicate::Predicate;
use crate::query::select::RenderedSql;
use crate::repo::error::{RepoError, RepoResult};
use rusqlite::types::Value;

/// One `SET` item of a bulk update.
#[derive(Debug, Clone, PartialEq)]
pub enum Assignment {
    /// `column = value`
    Set { column: Column, value: Value },
    /// `column = column + delta`
    Add { column: Column, delta: i64 },
}

impl Assignment {
    pub fn set(column: Column, value: impl Into<Value>) -> Self {
        Self::Set {
            column,
            value: value.into(),
        }
    }

    pub fn add(column: Column, delta: i64) -> Self {
        Self::Add { column, delta }
    }

    fn column(&self) -> Column {
        match self {
            Self::Set { column, .. } | Self::Add { column, .. } => *column,
        }
    }
}

/// Rows whose `age` would leave `0..=i32::MAX` after adding `delta`.
pub fn age_delta_out_of_range(delta: i64) -> Predicate {
    if delta >= 0 {
        Column::MemberAge.gt(i64::from(i32::MAX).saturating_sub(delta))
    } else {
        Column::MemberAge.lt(delta.saturating_neg())
    }
}

/// Renders `UPDATE members AS m SET ... [WHERE ...]`.
///
/// # Errors
/// - `InvalidArgument` for an empty assignment list, a team/id column
///   assignment, a constant age outside `0..=i32::MAX`, or a filter that reads
///   team columns.
pub fn render_update(assignments: &[Assignment], filter: &Predicate) -> RepoResult<RenderedSql> {
    if assignments.is_empty() {
        return Err(RepoError::InvalidArgument(
            "bulk update needs at least one assignment".to_string(),
        ));
    }
    ensure_member_filter(filter)?;

    let mut sql = String::from("UPDATE members AS m SET ");
    let mut binds = Vec::new();
    for (index, assignment) in assignments.iter().enumerate() {
        let column = assignment.column();
        if column.is_team() || column == Column::MemberId {
            return Err(RepoError::InvalidArgument(format!(
                "bulk update cannot assign `{}`",
                column.qualified()
            )));
        }
        if index > 0 {
            sql.push_str(", ");
        }
        match assignment {
            Assignment::Set { value, .. } => {
                if column == Column::MemberAge {
                    ensure_age_value(value)?;
                }
                sql.push_str(&format!("{} = ?", column.name()));
                binds.push(value.clone());
            }
            Assignment::Add { delta, .. } => {
                sql.push_str(&format!("{0} = {0} + ?", column.name()));
                binds.push(Value::Integer(*delta));
            }
        }
    }
    push_where(&mut sql, &mut binds, filter);

    Ok(RenderedSql { sql, binds })
}

/// Renders `DELETE FROM members AS m [WHERE ...]`.
pub fn render_delete(filter: &Predicate) -> RepoResult<RenderedSql> {
    ensure_member_filter(filter)?;

    let mut sql = String::from("DELETE FROM members AS m");
    let mut binds = Vec::new();
    push_where(&mut sql, &mut binds, filter);

    Ok(RenderedSql { sql, binds })
}

fn ensure_age_value(value: &Value) -> RepoResult<()> {
    match value {
        Value::Integer(age) if (0..=i64::from(i32::MAX)).contains(age) => Ok(()),
        other => Err(RepoError::InvalidArgument(format!(
            "member age must be an integer in 0..={}, got {other:?}",
            i32::MAX
        ))),
    }
}

fn ensure_member_filter(filter: &Predicate) -> RepoResult<()> {
    if filter.references_team() {
        return Err(RepoError::InvalidArgument(
            "bulk statements can only filter on member columns".to_string(),
        ));
    }
    Ok(())
}

fn push_where(sql: &mut String, binds: &mut Vec<Value>, filter: &Predicate) {
    if !filter.is_always() {
        sql.push_str(" WHERE ");
        filter.render(sql, binds);
    }
}

#[cfg(test)]
mod tests {
    use super::{age_delta_out_of_range, render_delete, render_update, Assignment};
    use crate::query::expr::Column;
    use crate::query::predicate::Predicate;
    use crate::repo::error::RepoError;
    use rusqlite::types::Value;

    #[test]
    fn update_renders_set_and_add_with_binds_in_order() {
        let rendered = render_update(
            &[
                Assignment::set(Column::MemberName, "removed".to_string()),
                Assignment::add(Column::MemberAge, 1),
            ],
            &Column::MemberAge.lt(28),
        )
        .unwrap();

        assert_eq!(
            rendered.sql,
            "UPDATE members AS m SET username = ?, age = age + ? WHERE m.age < ?"
        );
        assert_eq!(
            rendered.binds,
            vec![
                Value::Text("removed".to_string()),
                Value::Integer(1),
                Value::Integer(28)
            ]
        );
    }

    #[test]
    fn delete_without_filter_targets_every_row() {
        let rendered = render_delete(&Predicate::always()).unwrap();
        assert_eq!(rendered.sql, "DELETE FROM members AS m");
    }

    #[test]
    fn team_columns_are_rejected() {
        assert!(matches!(
            render_delete(&Column::TeamName.eq("teamA".to_string())),
            Err(RepoError::InvalidArgument(_))
        ));
        assert!(matches!(
            render_update(&[Assignment::set(Column::TeamName, 1)], &Predicate::always()),
            Err(RepoError::InvalidArgument(_))
        ));
        assert!(matches!(
            render_update(&[], &Predicate::always()),
            Err(RepoError::InvalidArgument(_))
        ));
    }

    #[test]
    fn constant_age_must_stay_in_range() {
        let too_old = Value::Integer(i64::from(i32::MAX) + 1);
        for bad in [Value::Integer(-1), too_old, Value::Null] {
            assert!(matches!(
                render_update(
                    &[Assignment::Set {
                        column: Column::MemberAge,
                        value: bad,
                    }],
                    &Predicate::always()
                ),
                Err(RepoError::InvalidArgument(_))
            ));
        }
        let zero = render_update(&[Assignment::set(Column::MemberAge, 0)], &Predicate::always());
        assert!(zero.is_ok());
    }

    #[test]
    fn age_delta_bounds_cover_both_directions() {
        let mut sql = String::new();
        let mut binds = Vec::new();
        age_delta_out_of_range(1).render(&mut sql, &mut binds);
        assert_eq!(sql, "m.age > ?");
        assert_eq!(binds, vec![Value::Integer(i64::from(i32::MAX) - 1)]);

        let mut sql = String::new();
        let mut binds = Vec::new();
        age_delta_out_of_range(-20).render(&mut sql, &mut binds);
        assert_eq!(sql, "m.age < ?");
        assert_eq!(binds, vec![Value::Integer(20)]);

        let mut binds = Vec::new();
        age_delta_out_of_range(i64::MIN).render(&mut String::new(), &mut binds);
        assert_eq!(binds, vec![Value::Integer(i64::MAX)]);
    }
}
