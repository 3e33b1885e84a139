//! Domain model for the member/team roster.
//!
//! # Responsibility
//! - Define the persisted entities (`Team`, `Member`) and the read-only shapes
//!   produced by queries (`MemberTeamRow`, `MemberDto`, `UserDto`).
//! - Define the sparse search input (`MemberSearchCondition`).
//!
//! # Invariants
//! - Entities returned by queries are immutable snapshots of store state at
//!   query time. Bulk writes never update them in place.

pub mod condition;
pub mod member;
pub mod row;
