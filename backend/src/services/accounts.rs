//! Registration and sign-in.

use crate::{
    error::AppError,
    models::user::{LoginRequest, RegisterRequest, User},
    repositories::IdentityStore,
    services::credentials::{hash_password, verify_password, CredentialService},
    validation::rules::normalize_email,
};

/// A user together with a freshly signed session token.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub token: String,
}

/// Creates an account and signs the first session for it.
///
/// The payload has already passed validation. The email pre-check gives the
/// common case a clean error; the unique index in the store decides races.
pub async fn register(
    identities: &dyn IdentityStore,
    credentials: &CredentialService,
    request: RegisterRequest,
) -> Result<Session, AppError> {
    let email = normalize_email(&request.email);
    if identities.find_user_by_email(&email).await?.is_some() {
        return Err(AppError::DuplicateEmail);
    }

    let password_hash = hash_password(&request.password)?;
    let user = User::new(
        email,
        password_hash,
        request.name,
        request.role.unwrap_or_default(),
        request.department_id,
    );
    identities.insert_user(&user).await?;

    let token = credentials.sign_token(&user)?;
    tracing::info!(user_id = %user.id, role = %user.role, "User registered");
    Ok(Session { user, token })
}

pub async fn login(
    identities: &dyn IdentityStore,
    credentials: &CredentialService,
    request: LoginRequest,
) -> Result<Session, AppError> {
    let email = normalize_email(&request.email);
    let user = identities
        .find_user_by_email(&email)
        .await?
        .ok_or_else(invalid_credentials)?;

    if !verify_password(&request.password, &user.password_hash)? {
        tracing::warn!(user_id = %user.id, "Rejected sign-in with wrong password");
        return Err(invalid_credentials());
    }

    let token = credentials.sign_token(&user)?;
    tracing::info!(user_id = %user.id, "User signed in");
    Ok(Session { user, token })
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid email or password".to_string())
}
