//! Typed query model over the `members m` / `teams t` schema.
//!
//! # Responsibility
//! - Express filters, joins, ordering, grouping and paging as values.
//! - Render those values into SQLite SQL plus positional bind values.
//! - Map result rows into entities, flat rows, tuples and scalars.
//!
//! # Invariants
//! - Caller-provided values only ever reach SQL as bind parameters.
//! - Bind values are emitted in the same order as their `?` placeholders.

pub mod expr;
pub mod mutation;
pub mod predicate;
pub mod projection;
pub mod select;

pub use expr::{Column, Direction, Expr, NullOrdering, OrderSpecifier};
pub use mutation::Assignment;
pub use predicate::{all_of, CompareOp, Operand, Predicate, PredicateBuilder};
pub use projection::{
    ColumnProjection, MemberDtoProjection, MemberProjection, MemberTeamProjection,
    MemberWithTeamProjection, Projection, ProjectionStyle, Tuple, TupleProjection,
    UserDtoProjection,
};
pub use select::{JoinKind, MemberQuery, RenderedSql, TeamSource};

use rusqlite::types::Value;

/// Converts an unsigned row count/offset into a SQLite integer bind.
pub(crate) fn bind_u64(value: u64) -> Value {
    Value::Integer(i64::try_from(value).unwrap_or(i64::MAX))
}
