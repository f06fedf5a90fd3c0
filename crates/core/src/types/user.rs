//! User roles and the signed-in identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::email::Email;

/// Permission level of a staff account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Store manager with full access.
    Admin,
    /// Regular staff account. New registrations get this role.
    #[default]
    User,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::User => write!(f, "user"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            _ => Err(format!("invalid user role: {s}")),
        }
    }
}

/// The identity held by the session store after a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Login email.
    pub email: Email,
    /// Display name shown in the header and greeting.
    pub name: String,
    /// Permission level.
    pub role: UserRole,
    /// When the login happened.
    pub logged_in_at: DateTime<Utc>,
}

impl CurrentUser {
    /// Returns true for store managers.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}
