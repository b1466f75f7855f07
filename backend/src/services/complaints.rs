//! Complaint workflows: listing, detail, submission, status changes and
//! attachments. Every path loads the complaint, checks the policy, and only
//! then touches related data.

use chrono::Utc;

use crate::{
    error::AppError,
    models::{
        attachment::{AddAttachmentsRequest, Attachment, AttachmentResponse},
        audit_log::{AuditAction, AuditLog},
        complaint::{
            Complaint, ComplaintDetailResponse, ComplaintPermissions, ComplaintResponse,
            ComplaintStatus, CreateComplaintRequest, StatusChange, UpdateStatusRequest,
        },
        user::User,
    },
    policy,
    repositories::ComplaintStore,
    types::ComplaintId,
    validation::rules::normalize_optional_text,
};

/// Loads a complaint the viewer is allowed to see.
///
/// A missing complaint is `NotFound`; an existing one the viewer may not see
/// is `Forbidden`.
pub async fn find_viewable(
    store: &dyn ComplaintStore,
    viewer: &User,
    id: ComplaintId,
) -> Result<Complaint, AppError> {
    let complaint = store
        .find_complaint(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Complaint not found".to_string()))?;

    if !policy::can_view(viewer, &complaint) {
        tracing::warn!(complaint_id = %id, user_id = %viewer.id, "Denied complaint access");
        return Err(AppError::Forbidden("Unauthorized".to_string()));
    }
    Ok(complaint)
}

pub async fn list_visible(
    store: &dyn ComplaintStore,
    viewer: &User,
) -> Result<Vec<ComplaintResponse>, AppError> {
    let complaints = store.list_complaints(policy::listing_scope(viewer)).await?;
    Ok(complaints
        .into_iter()
        .filter(|complaint| policy::can_view(viewer, complaint))
        .map(|complaint| respond(viewer, complaint))
        .collect())
}

/// Everything the detail page and `GET /api/complaints/{id}` show.
pub async fn load_detail(
    store: &dyn ComplaintStore,
    viewer: &User,
    id: ComplaintId,
) -> Result<ComplaintDetailResponse, AppError> {
    let complaint = find_viewable(store, viewer, id).await?;
    let attachments = store.list_attachments(id).await?;
    let history = store.list_history(id).await?;

    let permissions = ComplaintPermissions {
        can_edit_status: policy::can_edit_status(viewer, &complaint),
        can_add_attachments: policy::can_add_attachments(viewer, &complaint),
        allowed_transitions: policy::allowed_transitions(viewer, &complaint),
    };

    Ok(ComplaintDetailResponse {
        complaint: respond(viewer, complaint),
        attachments: attachments.into_iter().map(AttachmentResponse::from).collect(),
        history: history.into_iter().map(Into::into).collect(),
        permissions,
    })
}

pub async fn submit(
    store: &dyn ComplaintStore,
    author: &User,
    request: CreateComplaintRequest,
) -> Result<ComplaintResponse, AppError> {
    let complaint = Complaint::new(
        author.id,
        request.title,
        request.description,
        request.category,
        request.assigned_dept_id,
    );
    let attachments: Vec<Attachment> = request
        .attachments
        .into_iter()
        .map(|input| Attachment::new(complaint.id, input, complaint.created_at))
        .collect();
    let entry = AuditLog::new(
        complaint.id,
        author.id,
        AuditAction::Created,
        Some(format!("Submitted with {} attachment(s)", attachments.len())),
        complaint.created_at,
    );

    store
        .insert_complaint(&complaint, &attachments, &entry)
        .await?;

    tracing::info!(
        complaint_id = %complaint.id,
        user_id = %author.id,
        attachments = attachments.len(),
        "Complaint submitted"
    );
    Ok(respond(author, complaint))
}

pub async fn change_status(
    store: &dyn ComplaintStore,
    actor: &User,
    id: ComplaintId,
    request: UpdateStatusRequest,
) -> Result<ComplaintResponse, AppError> {
    let complaint = find_viewable(store, actor, id).await?;
    if !policy::can_edit_status(actor, &complaint) {
        return Err(AppError::Forbidden(
            "Only the assigned department or an admin can change the status".to_string(),
        ));
    }

    let from = complaint.status;
    let to = request.status;
    if !policy::transition_allowed(actor.role, from, to) {
        return Err(AppError::BadRequest(format!(
            "Cannot move a complaint from {from} to {to}"
        )));
    }

    let resolution_summary = normalize_optional_text(request.resolution_summary);
    if to == ComplaintStatus::Resolved
        && resolution_summary.is_none()
        && complaint.resolution_summary.is_none()
    {
        return Err(AppError::Validation(vec![
            "resolutionSummary: required".to_string(),
        ]));
    }

    let internal_notes = normalize_optional_text(request.internal_notes);
    let note = normalize_optional_text(request.details);
    let now = Utc::now();

    let mut audit_entries = vec![AuditLog::new(
        id,
        actor.id,
        AuditAction::StatusChanged,
        Some(status_change_details(from, to, note.as_deref())),
        now,
    )];
    if internal_notes.is_some() && internal_notes != complaint.internal_notes {
        audit_entries.push(AuditLog::new(
            id,
            actor.id,
            AuditAction::NotesUpdated,
            None,
            now,
        ));
    }

    let change = StatusChange {
        complaint_id: id,
        expected_status: from,
        new_status: to,
        resolution_summary,
        internal_notes,
        updated_at: now,
        audit_entries,
    };
    let updated = store.apply_status_change(&change).await?;

    tracing::info!(
        complaint_id = %id,
        user_id = %actor.id,
        from = %from,
        to = %to,
        "Complaint status changed"
    );
    Ok(respond(actor, updated))
}

pub async fn add_attachments(
    store: &dyn ComplaintStore,
    actor: &User,
    id: ComplaintId,
    request: AddAttachmentsRequest,
) -> Result<Vec<AttachmentResponse>, AppError> {
    let complaint = find_viewable(store, actor, id).await?;
    if !policy::can_add_attachments(actor, &complaint) {
        return Err(AppError::Forbidden(
            "Only the complainant can add attachments to an open complaint".to_string(),
        ));
    }

    let now = Utc::now();
    let attachments: Vec<Attachment> = request
        .attachments
        .into_iter()
        .map(|input| Attachment::new(id, input, now))
        .collect();
    let names = attachments
        .iter()
        .map(|attachment| attachment.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let entry = AuditLog::new(id, actor.id, AuditAction::AttachmentAdded, Some(names), now);

    store.insert_attachments(&attachments, &entry).await?;

    tracing::info!(complaint_id = %id, count = attachments.len(), "Attachments added");
    Ok(attachments.into_iter().map(AttachmentResponse::from).collect())
}

fn respond(viewer: &User, complaint: Complaint) -> ComplaintResponse {
    let include_notes = policy::can_see_internal_notes(viewer, &complaint);
    ComplaintResponse::new(complaint, include_notes)
}

fn status_change_details(from: ComplaintStatus, to: ComplaintStatus, note: Option<&str>) -> String {
    match note {
        Some(note) => format!("{from} -> {to}: {note}"),
        None => format!("{from} -> {to}"),
    }
}
