//! Session and role domain models.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DigiFarmError;
use crate::route::Route;

/// Access tier of an authenticated user.
///
/// There is no hierarchy: an admin is not implicitly a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    /// The landing route for this role.
    pub fn home(self) -> Route {
        match self {
            Role::Admin => Route::AdminDashboard,
            Role::User => Route::UserDashboard,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DigiFarmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            other => Err(DigiFarmError::validation(format!("Unknown role '{}'", other))),
        }
    }
}

/// Authentication state of the single active user.
///
/// Fields are private so that `is_authenticated` can never disagree with
/// `role`: a session is authenticated exactly when it carries a role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    username: String,
    role: Option<Role>,
}

impl Session {
    /// The unauthenticated default.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub(crate) fn authenticated(username: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            role: Some(role),
        }
    }

    /// Username, empty when unauthenticated.
    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn is_authenticated(&self) -> bool {
        self.role.is_some()
    }

    /// Serializable view for the front end.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            username: self.username.clone(),
            role: self.role,
            is_authenticated: self.is_authenticated(),
        }
    }
}

/// Read-only copy of a [`Session`] handed to the view layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub username: String,
    pub role: Option<Role>,
    pub is_authenticated: bool,
}
