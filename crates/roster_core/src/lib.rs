//! Core data-access logic for the member/team roster.
//! Dynamic filters, member/team projections, and paginated search over SQLite.

pub mod db;
pub mod logging;
pub mod model;
pub mod page;
pub mod query;
pub mod repo;
pub mod search;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LogConfig};
pub use model::condition::MemberSearchCondition;
pub use model::member::{Member, MemberId, MemberValidationError, Team, TeamId, TeamRef};
pub use model::row::{MemberDto, MemberTeamRow, UserDto};
pub use page::{decide_count, CountDecision, Page, PageRequest};
pub use query::{
    all_of, Assignment, Column, Expr, MemberQuery, Predicate, PredicateBuilder, Projection,
    ProjectionStyle,
};
pub use repo::error::{RepoError, RepoResult};
pub use repo::executor::QueryExecutor;
pub use repo::member_repo::{MemberRepository, SqliteMemberRepository};
pub use search::member_search::{FilterStyle, MemberSearch};
pub use service::member_service::{BulkOutcome, MemberService};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
