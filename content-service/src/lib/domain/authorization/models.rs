use std::fmt;
use std::str::FromStr;

use crate::authorization::errors::RoleKeyError;

/// Role reference data.
///
/// Precedence is decided by comparing `level`, never by key equality: any
/// operation permitted to a level is permitted to every higher level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub key: RoleKey,
    pub level: i32,
}

/// Well-known role identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleKey {
    User,
    Moderator,
    Admin,
}

impl RoleKey {
    /// Storage key for this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleKey::User => "user",
            RoleKey::Moderator => "moderator",
            RoleKey::Admin => "admin",
        }
    }
}

impl FromStr for RoleKey {
    type Err = RoleKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(RoleKey::User),
            "moderator" => Ok(RoleKey::Moderator),
            "admin" => Ok(RoleKey::Admin),
            other => Err(RoleKeyError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for RoleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
