//! Search condition predicates.
//!
//! Each single-purpose function returns `None` for absent or blank input so
//! callers can fold them with [`all_of`]. The accumulator variant appends the
//! same clauses in the same order.

use crate::model::condition::MemberSearchCondition;
use crate::query::expr::Column;
use crate::query::predicate::{all_of, Predicate, PredicateBuilder};

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}

pub fn username_eq(username: Option<&str>) -> Option<Predicate> {
    non_blank(username).map(|name| Column::MemberName.eq(name.to_string()))
}

pub fn team_name_eq(team_name: Option<&str>) -> Option<Predicate> {
    non_blank(team_name).map(|name| Column::TeamName.eq(name.to_string()))
}

pub fn age_goe(age: Option<i32>) -> Option<Predicate> {
    age.map(|age| Column::MemberAge.goe(age))
}

pub fn age_loe(age: Option<i32>) -> Option<Predicate> {
    age.map(|age| Column::MemberAge.loe(age))
}

/// Inclusive age range from whichever bounds are present.
pub fn age_between(goe: Option<i32>, loe: Option<i32>) -> Option<Predicate> {
    let range = all_of([age_goe(goe), age_loe(loe)]);
    (!range.is_always()).then_some(range)
}

/// Per-predicate composition of every condition field.
pub fn condition_filter(condition: &MemberSearchCondition) -> Predicate {
    all_of([
        username_eq(condition.username.as_deref()),
        team_name_eq(condition.team_name.as_deref()),
        age_goe(condition.age_goe),
        age_loe(condition.age_loe),
    ])
}

/// Accumulator composition of every condition field.
pub fn condition_filter_builder(condition: &MemberSearchCondition) -> Predicate {
    let mut builder = PredicateBuilder::new();

    if let Some(username) = non_blank(condition.username.as_deref()) {
        builder.and(Column::MemberName.eq(username.to_string()));
    }
    if let Some(team_name) = non_blank(condition.team_name.as_deref()) {
        builder.and(Column::TeamName.eq(team_name.to_string()));
    }
    if let Some(age) = condition.age_goe {
        builder.and(Column::MemberAge.goe(age));
    }
    if let Some(age) = condition.age_loe {
        builder.and(Column::MemberAge.loe(age));
    }

    builder.build()
}
