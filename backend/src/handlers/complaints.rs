use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppError,
    handlers::require_user,
    middleware::SessionToken,
    models::{
        attachment::{AddAttachmentsRequest, AttachmentResponse},
        complaint::{
            ComplaintDetailResponse, ComplaintResponse, CreateComplaintRequest,
            UpdateStatusRequest,
        },
    },
    services::complaints,
    state::AppState,
    types::ComplaintId,
    validation::ValidJson,
};

/// Parsed after the session check, so anonymous callers get 401 and a
/// malformed id reads as a missing complaint.
fn parse_complaint_id(raw: &str) -> Result<ComplaintId, AppError> {
    raw.parse()
        .map_err(|_| AppError::NotFound("Complaint not found".to_string()))
}

pub async fn list_complaints(
    State(state): State<AppState>,
    token: SessionToken,
) -> Result<Json<Vec<ComplaintResponse>>, AppError> {
    let user = require_user(&state, &token).await?;
    Ok(Json(
        complaints::list_visible(state.complaints.as_ref(), &user).await?,
    ))
}

pub async fn create_complaint(
    State(state): State<AppState>,
    token: SessionToken,
    ValidJson(payload): ValidJson<CreateComplaintRequest>,
) -> Result<(StatusCode, Json<ComplaintResponse>), AppError> {
    let user = require_user(&state, &token).await?;
    let created = complaints::submit(state.complaints.as_ref(), &user, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_complaint(
    State(state): State<AppState>,
    token: SessionToken,
    Path(raw_id): Path<String>,
) -> Result<Json<ComplaintDetailResponse>, AppError> {
    let user = require_user(&state, &token).await?;
    let id = parse_complaint_id(&raw_id)?;
    Ok(Json(
        complaints::load_detail(state.complaints.as_ref(), &user, id).await?,
    ))
}

pub async fn update_status(
    State(state): State<AppState>,
    token: SessionToken,
    Path(raw_id): Path<String>,
    ValidJson(payload): ValidJson<UpdateStatusRequest>,
) -> Result<Json<ComplaintResponse>, AppError> {
    let user = require_user(&state, &token).await?;
    let id = parse_complaint_id(&raw_id)?;
    Ok(Json(
        complaints::change_status(state.complaints.as_ref(), &user, id, payload).await?,
    ))
}

pub async fn add_attachments(
    State(state): State<AppState>,
    token: SessionToken,
    Path(raw_id): Path<String>,
    ValidJson(payload): ValidJson<AddAttachmentsRequest>,
) -> Result<(StatusCode, Json<Vec<AttachmentResponse>>), AppError> {
    let user = require_user(&state, &token).await?;
    let id = parse_complaint_id(&raw_id)?;
    let added = complaints::add_attachments(state.complaints.as_ref(), &user, id, payload).await?;
    Ok((StatusCode::CREATED, Json(added)))
}
