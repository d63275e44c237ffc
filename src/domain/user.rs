use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role assigned to a registered user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Client,
}

/// Represents a registered user in the system.
///
/// The `password` field is persisted with the rest of the record but is never
/// handed back to callers; read paths expose [`PublicUser`] instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub password: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a new User with a fresh id and creation timestamp.
    pub fn new(params: UserCreate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: params.name,
            email: params.email,
            role: params.role,
            password: params.password,
            created_at: Utc::now(),
        }
    }

    /// Applies the user-editable field set. `password` and `created_at` are
    /// not reachable through the update path.
    pub fn apply_update(&mut self, update: UserUpdate) {
        self.name = update.name;
        self.email = update.email;
        self.role = update.role;
    }
}

/// Caller-facing view of a [`User`] with the password stripped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// Payload for creating a new user.
#[derive(Clone, Deserialize)]
pub struct UserCreate {
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub password: String,
}

// Manual Debug so the password never reaches tracing output.
impl fmt::Debug for UserCreate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserCreate")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Payload for updating an existing user. Replaces the user-editable fields
/// wholesale rather than patching them individually.
#[derive(Debug, Clone, Deserialize)]
pub struct UserUpdate {
    pub name: String,
    pub email: String,
    pub role: UserRole,
}
