//! Complaint records, their workflow status and the payloads that create or
//! move them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::{fmt, str::FromStr};
use utoipa::ToSchema;
use validator::Validate;

use super::{
    attachment::{AttachmentInput, AttachmentResponse},
    audit_log::{AuditLog, AuditLogResponse},
};
use crate::{
    types::{ComplaintId, DepartmentId, UserId},
    validation::rules,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplaintStatus {
    Submitted,
    InProgress,
    Escalated,
    Resolved,
    Closed,
}

impl ComplaintStatus {
    pub const ALL: [ComplaintStatus; 5] = [
        ComplaintStatus::Submitted,
        ComplaintStatus::InProgress,
        ComplaintStatus::Escalated,
        ComplaintStatus::Resolved,
        ComplaintStatus::Closed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComplaintStatus::Submitted => "SUBMITTED",
            ComplaintStatus::InProgress => "IN_PROGRESS",
            ComplaintStatus::Escalated => "ESCALATED",
            ComplaintStatus::Resolved => "RESOLVED",
            ComplaintStatus::Closed => "CLOSED",
        }
    }

    /// Badge colour used by the HTML views.
    pub fn badge_color(&self) -> &'static str {
        match self {
            ComplaintStatus::Submitted => "#3b82f6",
            ComplaintStatus::InProgress => "#eab308",
            ComplaintStatus::Escalated => "#ef4444",
            ComplaintStatus::Resolved => "#22c55e",
            ComplaintStatus::Closed => "#64748b",
        }
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown complaint status `{0}`")]
pub struct UnknownStatus(pub String);

impl FromStr for ComplaintStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ComplaintStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

text_column!(ComplaintStatus);

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Complaint {
    pub id: ComplaintId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub status: ComplaintStatus,
    pub complainant_id: UserId,
    pub assigned_dept_id: Option<DepartmentId>,
    /// Shown to everyone allowed to view the complaint.
    pub resolution_summary: Option<String>,
    /// Shown to assigned officers and admins only.
    pub internal_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Complaint {
    /// Builds a freshly submitted complaint owned by `complainant_id`.
    pub fn new(
        complainant_id: UserId,
        title: String,
        description: String,
        category: String,
        assigned_dept_id: Option<DepartmentId>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ComplaintId::new(),
            title,
            description,
            category,
            status: ComplaintStatus::Submitted,
            complainant_id,
            assigned_dept_id,
            resolution_summary: None,
            internal_notes: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Which complaints a listing query should consider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplaintScope {
    All,
    SubmittedBy(UserId),
    SubmittedByOrAssignedTo(UserId, DepartmentId),
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateComplaintRequest {
    #[serde(deserialize_with = "rules::trimmed")]
    #[validate(length(min = 3, max = 200))]
    pub title: String,
    #[serde(deserialize_with = "rules::trimmed")]
    #[validate(length(min = 10, max = 5000))]
    pub description: String,
    #[serde(deserialize_with = "rules::trimmed")]
    #[validate(length(min = 2, max = 100))]
    pub category: String,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub assigned_dept_id: Option<DepartmentId>,
    #[serde(default)]
    #[validate(nested)]
    pub attachments: Vec<AttachmentInput>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub status: ComplaintStatus,
    #[validate(length(min = 1, max = 5000))]
    pub resolution_summary: Option<String>,
    #[validate(length(max = 5000))]
    pub internal_notes: Option<String>,
    /// Free-text note recorded with the audit entry.
    #[validate(length(max = 1000))]
    pub details: Option<String>,
}

/// A compare-and-set status update plus the history entries it produces.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusChange {
    pub complaint_id: ComplaintId,
    pub expected_status: ComplaintStatus,
    pub new_status: ComplaintStatus,
    pub resolution_summary: Option<String>,
    pub internal_notes: Option<String>,
    pub updated_at: DateTime<Utc>,
    pub audit_entries: Vec<AuditLog>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
/// A complaint as seen by one particular viewer.
pub struct ComplaintResponse {
    #[schema(value_type = String)]
    pub id: ComplaintId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub status: ComplaintStatus,
    #[schema(value_type = String)]
    pub complainant_id: UserId,
    #[schema(value_type = Option<String>)]
    pub assigned_dept_id: Option<DepartmentId>,
    pub resolution_summary: Option<String>,
    /// Omitted entirely unless the viewer may read internal notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ComplaintResponse {
    pub fn new(complaint: Complaint, include_internal_notes: bool) -> Self {
        Self {
            id: complaint.id,
            title: complaint.title,
            description: complaint.description,
            category: complaint.category,
            status: complaint.status,
            complainant_id: complaint.complainant_id,
            assigned_dept_id: complaint.assigned_dept_id,
            resolution_summary: complaint.resolution_summary,
            internal_notes: complaint.internal_notes.filter(|_| include_internal_notes),
            created_at: complaint.created_at,
            updated_at: complaint.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
/// What the viewer is allowed to do next with a complaint.
pub struct ComplaintPermissions {
    pub can_edit_status: bool,
    pub can_add_attachments: bool,
    pub allowed_transitions: Vec<ComplaintStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintDetailResponse {
    pub complaint: ComplaintResponse,
    pub attachments: Vec<AttachmentResponse>,
    /// Newest entry first.
    pub history: Vec<AuditLogResponse>,
    pub permissions: ComplaintPermissions,
}
