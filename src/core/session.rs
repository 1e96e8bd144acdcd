//! Session and user models shared by every client component
//!
//! A [`Session`] is what the token store persists between page loads: the
//! bearer credentials plus a snapshot of the user they were issued to.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Portal role assigned to every account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Faculty,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Student, Role::Faculty, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Faculty => "faculty",
            Role::Admin => "admin",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Student => "Student",
            Role::Faculty => "Faculty",
            Role::Admin => "Administrator",
        }
    }

    /// Landing page for this role
    pub fn dashboard_path(&self) -> &'static str {
        match self {
            Role::Student => "/student/dashboard",
            Role::Faculty => "/faculty/dashboard",
            Role::Admin => "/admin/dashboard",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown role name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "student" => Ok(Role::Student),
            "faculty" => Ok(Role::Faculty),
            "admin" => Ok(Role::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// Snapshot of the signed-in user, taken at login or refresh time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: Role,
}

/// Bearer credentials plus the user they belong to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub user: UserRecord,
}

impl Session {
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: Option<String>,
        user: UserRecord,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token,
            user,
        }
    }

    pub fn role(&self) -> Role {
        self.user.role
    }
}

/// Backends disagree on whether ids are numbers or strings; keep them as strings.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}
