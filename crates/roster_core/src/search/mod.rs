//! Member search: sparse conditions to filters, and paginated search.
//!
//! # Responsibility
//! - Turn a `MemberSearchCondition` into a filter using either the
//!   per-predicate style or the accumulator style. Both yield the same filter.
//! - Run paged member/team searches with an always-count strategy and a
//!   count-elision strategy.

pub mod member_search;
pub mod predicates;
