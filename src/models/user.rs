use garde::Validate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The role granted to a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Full access, including the user registry.
    Admin,
    /// Can create and edit buildings and rooms.
    DataManager,
    /// Read-only access to the asset tree.
    Viewer,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Admin => "ADMIN",
            Role::DataManager => "DATA_MANAGER",
            Role::Viewer => "VIEWER",
        };
        f.write_str(name)
    }
}

/// The lifecycle status of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    Active,
    Disabled,
    Suspended,
}

/// Represents a user account as exposed by the registry API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// The unique identifier for the user.
    pub id: String,
    /// The user's full name.
    pub full_name: String,
    /// The user's login name.
    pub username: String,
    /// The user's email address.
    pub email: String,
    /// Whether the account may sign in.
    pub status: UserStatus,
    /// The role that gates mutating operations.
    pub role: Role,
}

impl User {
    /// Whether the account is allowed to sign in.
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}

/// A partial set of user fields, used for both registration and updates.
///
/// Absent fields are not serialized, so an update only touches what was set.
/// The service treats a blank `password` on update as "unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct UserInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[garde(length(min = 1, max = 255))]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[garde(length(min = 3, max = 255))]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[garde(email)]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[garde(skip)]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[garde(skip)]
    pub status: Option<UserStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[garde(skip)]
    pub role: Option<Role>,
}

impl UserInput {
    /// Drops an empty password so an edit form does not reset it.
    pub fn without_blank_password(mut self) -> Self {
        if self.password.as_deref().is_some_and(|p| p.trim().is_empty()) {
            self.password = None;
        }
        self
    }
}

/// A user row as held by the registry service, including the password hash.
#[derive(Clone, Debug)]
pub struct StoredUser {
    /// The public part of the account.
    pub user: User,
    /// The Argon2 PHC string for the user's password.
    pub password_hash: String,
}
