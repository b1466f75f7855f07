pub mod auth;
pub mod complaints;
pub mod departments;

use crate::{error::AppError, middleware::SessionToken, models::user::User, state::AppState};

/// Resolves the session to a user or fails with `401`.
pub(crate) async fn require_user(state: &AppState, token: &SessionToken) -> Result<User, AppError> {
    state
        .credentials
        .resolve_identity(state.identities.as_ref(), token.as_deref())
        .await?
        .ok_or_else(|| AppError::Unauthorized("Unauthorized".to_string()))
}
