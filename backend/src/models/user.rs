//! Models that represent users, authentication payloads, and role metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::{fmt, str::FromStr};
use utoipa::ToSchema;
use validator::Validate;

use crate::types::{DepartmentId, UserId};

#[derive(Debug, Clone, Serialize, FromRow)]
/// Database representation of a registered account.
pub struct User {
    pub id: UserId,
    /// Login identifier; unique across all users and never changed after creation.
    pub email: String,
    /// Argon2 PHC string of the user's password.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Display name shown in listings and audit history.
    pub name: String,
    pub role: UserRole,
    /// Department the user belongs to; only meaningful for officers.
    pub department_id: Option<DepartmentId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
/// The closed set of roles a user can hold.
pub enum UserRole {
    /// Submits complaints and follows their own.
    #[default]
    Student,
    /// Triages complaints assigned to their department.
    DeptOfficer,
    /// Sees and manages every complaint and user.
    Admin,
}

impl UserRole {
    pub const ALL: [UserRole; 3] = [UserRole::Student, UserRole::DeptOfficer, UserRole::Admin];

    /// Returns the canonical SCREAMING_SNAKE_CASE representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Student => "STUDENT",
            UserRole::DeptOfficer => "DEPT_OFFICER",
            UserRole::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown user role `{0}`")]
pub struct UnknownRole(pub String);

impl FromStr for UserRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "STUDENT" => Ok(UserRole::Student),
            "DEPT_OFFICER" => Ok(UserRole::DeptOfficer),
            "ADMIN" => Ok(UserRole::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

text_column!(UserRole);

impl User {
    /// Constructs a new user with a fresh identifier and timestamps.
    pub fn new(
        email: String,
        password_hash: String,
        name: String,
        role: UserRole,
        department_id: Option<DepartmentId>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            email,
            password_hash,
            name,
            role,
            department_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn is_officer(&self) -> bool {
        self.role == UserRole::DeptOfficer
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Payload submitted to create an account.
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
    #[validate(length(min = 2))]
    pub name: String,
    /// Defaults to `STUDENT` when omitted.
    #[serde(default)]
    pub role: Option<UserRole>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub department_id: Option<DepartmentId>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
/// Credentials submitted by a user attempting to sign in.
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Public-facing representation of a user returned by the API.
pub struct UserResponse {
    #[schema(value_type = String)]
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    #[schema(value_type = Option<String>)]
    pub department_id: Option<DepartmentId>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        UserResponse {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
            department_id: user.department_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
/// Body returned by register, login and `me`.
pub struct AuthResponse {
    pub user: UserResponse,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
/// A user joined with the name of their department, for the admin directory.
pub struct UserDirectoryEntry {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub department_name: Option<String>,
}
