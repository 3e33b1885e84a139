//! Repository layer: the query-execution seam and its SQLite implementation.
//!
//! # Responsibility
//! - Define the `QueryExecutor` contract consumed by search and services.
//! - Keep SQL execution details inside the persistence boundary.
//!
//! # Invariants
//! - Writes validate input before any SQL mutation.
//! - Repository APIs return semantic errors (`NotFound`, `NonUniqueResult`,
//!   `InvalidArgument`) in addition to store transport errors.

pub mod error;
pub mod executor;
pub mod member_repo;
