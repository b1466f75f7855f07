use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::types::{AuditLogId, ComplaintId, UserId};

/// Action labels written to a complaint's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    Created,
    StatusChanged,
    NotesUpdated,
    AttachmentAdded,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Created => "CREATED",
            AuditAction::StatusChanged => "STATUS_CHANGED",
            AuditAction::NotesUpdated => "NOTES_UPDATED",
            AuditAction::AttachmentAdded => "ATTACHMENT_ADDED",
        }
    }
}

/// A history entry about to be appended. Entries are never updated once written.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditLog {
    pub id: AuditLogId,
    pub complaint_id: ComplaintId,
    pub actor_id: UserId,
    pub action: String,
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AuditLog {
    pub fn new(
        complaint_id: ComplaintId,
        actor_id: UserId,
        action: AuditAction,
        details: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: AuditLogId::new(),
            complaint_id,
            actor_id,
            action: action.as_str().to_string(),
            details,
            created_at,
        }
    }
}

/// A stored history entry joined with the actor's display name.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct AuditLogView {
    pub id: AuditLogId,
    pub actor_id: UserId,
    pub actor_name: String,
    pub action: String,
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogResponse {
    #[schema(value_type = String)]
    pub id: AuditLogId,
    #[schema(value_type = String)]
    pub actor_id: UserId,
    pub actor_name: String,
    pub action: String,
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<AuditLogView> for AuditLogResponse {
    fn from(entry: AuditLogView) -> Self {
        Self {
            id: entry.id,
            actor_id: entry.actor_id,
            actor_name: entry.actor_name,
            action: entry.action,
            details: entry.details,
            created_at: entry.created_at,
        }
    }
}
