//! Member and team entities.
//!
//! # Invariants
//! - A member belongs to at most one team; the team is shared by many members.
//! - `Member::team` never performs I/O: a team that was not fetch-joined stays
//!   `TeamRef::Unloaded` for the lifetime of the snapshot.
//! - `age` stays within `0..=i32::MAX` for persisted members, including after
//!   bulk updates.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned member identity.
pub type MemberId = i64;

/// Store-assigned team identity.
pub type TeamId = i64;

/// Validation errors raised before member/team writes reach the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberValidationError {
    NegativeAge(i32),
    BlankTeamName,
}

impl Display for MemberValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NegativeAge(age) => write!(f, "member age must not be negative, got {age}"),
            Self::BlankTeamName => write!(f, "team name must not be blank"),
        }
    }
}

impl Error for MemberValidationError {}

/// Team entity. Owns the inverse side of the membership relation, which is
/// read through `MemberRepository::members_of_team` rather than stored here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
}

impl Team {
    /// Checks a team name before it is persisted.
    pub fn validate_name(name: &str) -> Result<(), MemberValidationError> {
        if name.trim().is_empty() {
            return Err(MemberValidationError::BlankTeamName);
        }
        Ok(())
    }
}

/// Non-owning reference from a member to its team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TeamRef {
    /// Only the foreign key was read; team columns were not joined-and-fetched.
    Unloaded { id: TeamId },
    /// Team columns were materialized by a fetch join.
    Loaded(Team),
}

impl TeamRef {
    pub fn id(&self) -> TeamId {
        match self {
            Self::Unloaded { id } => *id,
            Self::Loaded(team) => team.id,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    /// Returns the team when it was fetch-joined, `None` otherwise.
    pub fn loaded(&self) -> Option<&Team> {
        match self {
            Self::Loaded(team) => Some(team),
            Self::Unloaded { .. } => None,
        }
    }
}

/// Member entity snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub username: Option<String>,
    pub age: i32,
    pub team: Option<TeamRef>,
}

impl Member {
    /// Checks member fields before they are persisted.
    pub fn validate_fields(age: i32) -> Result<(), MemberValidationError> {
        if age < 0 {
            return Err(MemberValidationError::NegativeAge(age));
        }
        Ok(())
    }

    pub fn team_id(&self) -> Option<TeamId> {
        self.team.as_ref().map(TeamRef::id)
    }

    /// Whether the team association was materialized by a fetch join.
    ///
    /// Members without a team report `false`.
    pub fn is_team_loaded(&self) -> bool {
        self.team.as_ref().is_some_and(TeamRef::is_loaded)
    }
}
