//! Complaint store: complaints, their attachments and their audit trail.
//!
//! Every write that touches more than one table runs in a single transaction,
//! and audit entries are only ever inserted.

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};

use super::common::{constraint_violation, ConstraintViolation};
use crate::error::AppError;
use crate::models::{
    attachment::Attachment,
    audit_log::{AuditLog, AuditLogView},
    complaint::{Complaint, ComplaintScope, StatusChange},
};
use crate::types::ComplaintId;

const COMPLAINT_COLUMNS: &str = "id, title, description, category, status, complainant_id, \
     assigned_dept_id, resolution_summary, internal_notes, created_at, updated_at";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ComplaintStore: Send + Sync {
    /// Loads the complaint row only, without attachments or history.
    async fn find_complaint(&self, id: ComplaintId) -> Result<Option<Complaint>, AppError>;

    /// Newest first.
    async fn list_complaints(&self, scope: ComplaintScope) -> Result<Vec<Complaint>, AppError>;

    async fn list_attachments(&self, id: ComplaintId) -> Result<Vec<Attachment>, AppError>;

    /// Audit entries for a complaint, newest first.
    async fn list_history(&self, id: ComplaintId) -> Result<Vec<AuditLogView>, AppError>;

    async fn insert_complaint(
        &self,
        complaint: &Complaint,
        attachments: &[Attachment],
        entry: &AuditLog,
    ) -> Result<(), AppError>;

    async fn insert_attachments(
        &self,
        attachments: &[Attachment],
        entry: &AuditLog,
    ) -> Result<(), AppError>;

    /// Applies the change only if the complaint still has `expected_status`;
    /// otherwise fails with `AppError::Conflict` and writes nothing.
    async fn apply_status_change(&self, change: &StatusChange) -> Result<Complaint, AppError>;
}

#[derive(Debug, Clone)]
pub struct PgComplaintStore {
    pool: PgPool,
}

impl PgComplaintStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ComplaintStore for PgComplaintStore {
    async fn find_complaint(&self, id: ComplaintId) -> Result<Option<Complaint>, AppError> {
        let query = format!("SELECT {} FROM complaints WHERE id = $1", COMPLAINT_COLUMNS);
        let complaint = sqlx::query_as::<_, Complaint>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(complaint)
    }

    async fn list_complaints(&self, scope: ComplaintScope) -> Result<Vec<Complaint>, AppError> {
        let order = "ORDER BY created_at DESC, id DESC";
        let rows = match scope {
            ComplaintScope::All => {
                let query = format!("SELECT {} FROM complaints {}", COMPLAINT_COLUMNS, order);
                sqlx::query_as::<_, Complaint>(&query)
                    .fetch_all(&self.pool)
                    .await?
            }
            ComplaintScope::SubmittedBy(user_id) => {
                let query = format!(
                    "SELECT {} FROM complaints WHERE complainant_id = $1 {}",
                    COMPLAINT_COLUMNS, order
                );
                sqlx::query_as::<_, Complaint>(&query)
                    .bind(user_id)
                    .fetch_all(&self.pool)
                    .await?
            }
            ComplaintScope::SubmittedByOrAssignedTo(user_id, dept_id) => {
                let query = format!(
                    "SELECT {} FROM complaints WHERE complainant_id = $1 OR assigned_dept_id = $2 {}",
                    COMPLAINT_COLUMNS, order
                );
                sqlx::query_as::<_, Complaint>(&query)
                    .bind(user_id)
                    .bind(dept_id)
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(rows)
    }

    async fn list_attachments(&self, id: ComplaintId) -> Result<Vec<Attachment>, AppError> {
        let rows = sqlx::query_as::<_, Attachment>(
            "SELECT id, complaint_id, name, url, created_at FROM attachments \
             WHERE complaint_id = $1 ORDER BY created_at ASC, name ASC",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_history(&self, id: ComplaintId) -> Result<Vec<AuditLogView>, AppError> {
        let rows = sqlx::query_as::<_, AuditLogView>(
            "SELECT a.id, a.actor_id, u.name AS actor_name, a.action, a.details, a.created_at \
             FROM audit_logs a INNER JOIN users u ON u.id = a.actor_id \
             WHERE a.complaint_id = $1 \
             ORDER BY a.created_at DESC, a.seq DESC",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn insert_complaint(
        &self,
        complaint: &Complaint,
        attachments: &[Attachment],
        entry: &AuditLog,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            "INSERT INTO complaints (id, title, description, category, status, complainant_id, \
             assigned_dept_id, resolution_summary, internal_notes, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(complaint.id)
        .bind(&complaint.title)
        .bind(&complaint.description)
        .bind(&complaint.category)
        .bind(complaint.status)
        .bind(complaint.complainant_id)
        .bind(complaint.assigned_dept_id)
        .bind(&complaint.resolution_summary)
        .bind(&complaint.internal_notes)
        .bind(complaint.created_at)
        .bind(complaint.updated_at)
        .execute(&mut *tx)
        .await;
        if let Err(err) = inserted {
            return Err(match constraint_violation(&err) {
                Some(ConstraintViolation::ForeignKey) => {
                    AppError::Validation(vec!["assignedDeptId: unknown_department".to_string()])
                }
                _ => err.into(),
            });
        }

        for attachment in attachments {
            insert_attachment(&mut tx, attachment).await?;
        }
        insert_audit_entry(&mut tx, entry).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn insert_attachments(
        &self,
        attachments: &[Attachment],
        entry: &AuditLog,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        for attachment in attachments {
            insert_attachment(&mut tx, attachment).await?;
        }
        insert_audit_entry(&mut tx, entry).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn apply_status_change(&self, change: &StatusChange) -> Result<Complaint, AppError> {
        let mut tx = self.pool.begin().await?;

        let query = format!(
            "UPDATE complaints SET status = $1, \
             resolution_summary = COALESCE($2, resolution_summary), \
             internal_notes = COALESCE($3, internal_notes), updated_at = $4 \
             WHERE id = $5 AND status = $6 RETURNING {}",
            COMPLAINT_COLUMNS
        );
        let updated = sqlx::query_as::<_, Complaint>(&query)
            .bind(change.new_status)
            .bind(&change.resolution_summary)
            .bind(&change.internal_notes)
            .bind(change.updated_at)
            .bind(change.complaint_id)
            .bind(change.expected_status)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| {
                AppError::Conflict("Complaint status changed concurrently; reload and retry".into())
            })?;

        for entry in &change.audit_entries {
            insert_audit_entry(&mut tx, entry).await?;
        }

        tx.commit().await?;
        Ok(updated)
    }
}

async fn insert_attachment(
    conn: &mut PgConnection,
    attachment: &Attachment,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO attachments (id, complaint_id, name, url, created_at) \
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(attachment.id)
    .bind(attachment.complaint_id)
    .bind(&attachment.name)
    .bind(&attachment.url)
    .bind(attachment.created_at)
    .execute(&mut *conn)
    .await
    .map(|_| ())
}

async fn insert_audit_entry(conn: &mut PgConnection, entry: &AuditLog) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO audit_logs (id, complaint_id, actor_id, action, details, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(entry.id)
    .bind(entry.complaint_id)
    .bind(entry.actor_id)
    .bind(&entry.action)
    .bind(&entry.details)
    .bind(entry.created_at)
    .execute(&mut *conn)
    .await
    .map(|_| ())
}
