//! Identity store: users and departments.
//!
//! The `IdentityStore` trait is the seam handlers depend on; `PgIdentityStore`
//! is the PostgreSQL implementation and `MockIdentityStore` (tests only) the
//! mockall double.

use async_trait::async_trait;
use sqlx::PgPool;

use super::common::{constraint_violation, ConstraintViolation};
use crate::error::AppError;
use crate::models::{
    department::Department,
    user::{User, UserDirectoryEntry},
};
use crate::types::UserId;

const USER_COLUMNS: &str =
    "id, email, password_hash, name, role, department_id, created_at, updated_at";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn find_user_by_id(&self, id: UserId) -> Result<Option<User>, AppError>;

    /// Looks up a user by email, ignoring case.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Inserts a new user. A concurrent insert of the same email fails with
    /// `AppError::DuplicateEmail` because the unique index is checked atomically.
    async fn insert_user(&self, user: &User) -> Result<(), AppError>;

    /// All users ordered by name, each with their department name if any.
    async fn list_user_directory(&self) -> Result<Vec<UserDirectoryEntry>, AppError>;

    async fn list_departments(&self) -> Result<Vec<Department>, AppError>;
}

#[derive(Debug, Clone)]
pub struct PgIdentityStore {
    pool: PgPool,
}

impl PgIdentityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentityStore for PgIdentityStore {
    async fn find_user_by_id(&self, id: UserId) -> Result<Option<User>, AppError> {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let query = format!(
            "SELECT {} FROM users WHERE lower(email) = lower($1)",
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn insert_user(&self, user: &User) -> Result<(), AppError> {
        let result = sqlx::query(
            "INSERT INTO users (id, email, password_hash, name, role, department_id, created_at, \
             updated_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.name)
        .bind(user.role)
        .bind(user.department_id)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(err) => Err(match constraint_violation(&err) {
                Some(ConstraintViolation::Unique) => AppError::DuplicateEmail,
                Some(ConstraintViolation::ForeignKey) => {
                    AppError::Validation(vec!["departmentId: unknown_department".to_string()])
                }
                None => err.into(),
            }),
        }
    }

    async fn list_user_directory(&self) -> Result<Vec<UserDirectoryEntry>, AppError> {
        let rows = sqlx::query_as::<_, UserDirectoryEntry>(
            "SELECT u.id, u.name, u.email, u.role, d.name AS department_name \
             FROM users u LEFT JOIN departments d ON d.id = u.department_id \
             ORDER BY u.name ASC, u.email ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_departments(&self) -> Result<Vec<Department>, AppError> {
        let rows = sqlx::query_as::<_, Department>("SELECT id, name FROM departments ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}
