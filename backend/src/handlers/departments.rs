use axum::{extract::State, Json};

use crate::{error::AppError, models::department::Department, state::AppState};

/// Public: the sign-up form needs the list before anyone has a session.
pub async fn list_departments(
    State(state): State<AppState>,
) -> Result<Json<Vec<Department>>, AppError> {
    Ok(Json(state.identities.list_departments().await?))
}
