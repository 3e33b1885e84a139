//! Flat read shapes produced by projections.
//!
//! These never reference live entities: every field is copied out of the
//! joined row, so holding one cannot observe later store changes.

use crate::model::member::{MemberId, TeamId};
use serde::{Deserialize, Serialize};

/// Member joined with its team, flattened.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberTeamRow {
    pub member_id: MemberId,
    pub username: Option<String>,
    pub age: i32,
    pub team_id: Option<TeamId>,
    pub team_name: Option<String>,
}

impl MemberTeamRow {
    /// Positional constructor used by constructor-style projection.
    pub fn new(
        member_id: MemberId,
        username: Option<String>,
        age: i32,
        team_id: Option<TeamId>,
        team_name: Option<String>,
    ) -> Self {
        Self {
            member_id,
            username,
            age,
            team_id,
            team_name,
        }
    }

    pub fn set_member_id(&mut self, member_id: MemberId) {
        self.member_id = member_id;
    }

    pub fn set_username(&mut self, username: Option<String>) {
        self.username = username;
    }

    pub fn set_age(&mut self, age: i32) {
        self.age = age;
    }

    pub fn set_team_id(&mut self, team_id: Option<TeamId>) {
        self.team_id = team_id;
    }

    pub fn set_team_name(&mut self, team_name: Option<String>) {
        self.team_name = team_name;
    }
}

/// Username and age only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDto {
    pub username: Option<String>,
    pub age: i32,
}

impl MemberDto {
    pub fn new(username: Option<String>, age: i32) -> Self {
        Self { username, age }
    }

    pub fn set_username(&mut self, username: Option<String>) {
        self.username = username;
    }

    pub fn set_age(&mut self, age: i32) {
        self.age = age;
    }
}

/// Same data as [`MemberDto`] under a different field name; filled through a
/// column alias (`username AS name`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDto {
    pub name: Option<String>,
    pub age: i32,
}
