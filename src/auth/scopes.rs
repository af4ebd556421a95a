use serde::{Deserialize, Serialize};
use std::fmt;

/// A named permission granting access to one capability.
///
/// The set is closed; scopes are derived from the user's role flag on every
/// resolution and never stored or cached on the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    #[serde(rename = "tasks:read")]
    TasksRead,

    #[serde(rename = "tasks:write")]
    TasksWrite,

    #[serde(rename = "users:read")]
    UsersRead,

    #[serde(rename = "users:write")]
    UsersWrite,

    #[serde(rename = "admin")]
    Admin,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::TasksRead => "tasks:read",
            Self::TasksWrite => "tasks:write",
            Self::UsersRead => "users:read",
            Self::UsersWrite => "users:write",
            Self::Admin => "admin",
        };
        f.write_str(s)
    }
}

/// Resolve the permission set for a role flag.
///
/// Pure function: superusers hold all five scopes, everyone else holds the
/// task scopes only.
#[must_use]
pub fn scopes_for(is_superuser: bool) -> Vec<Scope> {
    if is_superuser {
        vec![
            Scope::TasksRead,
            Scope::TasksWrite,
            Scope::UsersRead,
            Scope::UsersWrite,
            Scope::Admin,
        ]
    } else {
        vec![Scope::TasksRead, Scope::TasksWrite]
    }
}
