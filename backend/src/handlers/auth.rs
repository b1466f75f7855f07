use axum::{
    extract::State,
    http::header::SET_COOKIE,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::{
    error::AppError,
    handlers::require_user,
    middleware::SessionToken,
    models::user::{AuthResponse, LoginRequest, RegisterRequest, UserResponse},
    services::accounts::{self, Session},
    state::AppState,
    utils::cookies::{build_clear_cookie, build_session_cookie},
    validation::ValidJson,
};

pub async fn register(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<RegisterRequest>,
) -> Result<Response, AppError> {
    let session = accounts::register(state.identities.as_ref(), &state.credentials, payload).await?;
    Ok(session_response(&state, session))
}

pub async fn login(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<LoginRequest>,
) -> Result<Response, AppError> {
    let session = accounts::login(state.identities.as_ref(), &state.credentials, payload).await?;
    Ok(session_response(&state, session))
}

/// Tokens are stateless; signing out only expires the cookie.
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(SET_COOKIE, build_clear_cookie(state.config.cookie_options()))],
        Json(json!({ "message": "Logged out" })),
    )
}

pub async fn me(
    State(state): State<AppState>,
    token: SessionToken,
) -> Result<Json<AuthResponse>, AppError> {
    let user = require_user(&state, &token).await?;
    Ok(Json(AuthResponse {
        user: UserResponse::from(&user),
    }))
}

fn session_response(state: &AppState, session: Session) -> Response {
    let cookie = build_session_cookie(
        &session.token,
        state.credentials.session_ttl(),
        state.config.cookie_options(),
    );
    (
        [(SET_COOKIE, cookie)],
        Json(AuthResponse {
            user: UserResponse::from(&session.user),
        }),
    )
        .into_response()
}
