use axum::{
    extract::{Path, State},
    response::Html,
};

use super::{escape_html, layout, PageError};
use crate::{
    handlers::require_user,
    middleware::SessionToken,
    models::{
        attachment::AttachmentResponse,
        audit_log::AuditLogResponse,
        complaint::{ComplaintDetailResponse, ComplaintResponse},
    },
    services::complaints,
    state::AppState,
    types::ComplaintId,
    validation::rules,
};

pub async fn complaint_page(
    State(state): State<AppState>,
    token: SessionToken,
    Path(raw_id): Path<String>,
) -> Result<Html<String>, PageError> {
    let viewer = require_user(&state, &token).await?;
    // An id that cannot exist is just another missing complaint.
    let id: ComplaintId = raw_id.parse().map_err(|_| PageError::NotFound)?;
    let detail = complaints::load_detail(state.complaints.as_ref(), &viewer, id).await?;
    Ok(Html(render_complaint_detail(&detail)))
}

pub async fn my_complaints_page(
    State(state): State<AppState>,
    token: SessionToken,
) -> Result<Html<String>, PageError> {
    let viewer = require_user(&state, &token).await?;
    let visible = complaints::list_visible(state.complaints.as_ref(), &viewer).await?;
    Ok(Html(render_complaint_list(&visible)))
}

fn status_badge(complaint: &ComplaintResponse) -> String {
    format!(
        "<span class=\"badge\" style=\"background-color: {}\">{}</span>",
        complaint.status.badge_color(),
        complaint.status
    )
}

pub fn render_complaint_detail(detail: &ComplaintDetailResponse) -> String {
    let complaint = &detail.complaint;
    let mut body = format!(
        "<h1>{}</h1>\n{}\n<p class=\"category\">{}</p>\n<p class=\"description\">{}</p>\n\
         <p class=\"submitted\">Submitted {}</p>\n",
        escape_html(&complaint.title),
        status_badge(complaint),
        escape_html(&complaint.category),
        escape_html(&complaint.description),
        complaint.created_at.format("%Y-%m-%d %H:%M UTC"),
    );

    body.push_str("<section class=\"attachments\">\n<h2>Attachments</h2>\n");
    body.push_str(&render_attachments(&detail.attachments));
    body.push_str("</section>\n");

    if let Some(summary) = &complaint.resolution_summary {
        body.push_str(&format!(
            "<section class=\"resolution\">\n<h2>Resolution</h2>\n<p>{}</p>\n</section>\n",
            escape_html(summary)
        ));
    }
    if let Some(notes) = &complaint.internal_notes {
        body.push_str(&format!(
            "<section class=\"internal-notes\">\n<h2>Internal notes</h2>\n<p>{}</p>\n</section>\n",
            escape_html(notes)
        ));
    }

    body.push_str("<section class=\"history\">\n<h2>History</h2>\n");
    body.push_str(&render_history(&detail.history));
    body.push_str("</section>");

    layout(&complaint.title, &body)
}

fn render_attachments(attachments: &[AttachmentResponse]) -> String {
    if attachments.is_empty() {
        return "<p>No attachments.</p>\n".to_string();
    }
    let items: String = attachments
        .iter()
        .map(|attachment| {
            // Only web links become anchors.
            if rules::validate_web_url(&attachment.url).is_err() {
                return format!("<li>{}</li>\n", escape_html(&attachment.name));
            }
            format!(
                "<li><a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a></li>\n",
                escape_html(&attachment.url),
                escape_html(&attachment.name)
            )
        })
        .collect();
    format!("<ul>\n{items}</ul>\n")
}

/// Entries arrive newest first from the store and are shown in that order.
fn render_history(history: &[AuditLogResponse]) -> String {
    if history.is_empty() {
        return "<p>No activity yet.</p>\n".to_string();
    }
    let items: String = history
        .iter()
        .map(|entry| {
            let details = entry
                .details
                .as_deref()
                .map(|details| format!("<p>{}</p>", escape_html(details)))
                .unwrap_or_default();
            format!(
                "<li><strong>{}</strong> by {} <time>{}</time>{}</li>\n",
                escape_html(&entry.action),
                escape_html(&entry.actor_name),
                entry.created_at.format("%Y-%m-%d %H:%M UTC"),
                details
            )
        })
        .collect();
    format!("<ol>\n{items}</ol>\n")
}

pub fn render_complaint_list(complaints: &[ComplaintResponse]) -> String {
    if complaints.is_empty() {
        return layout(
            "My complaints",
            "<h1>My complaints</h1>\n<p>No complaints yet.</p>",
        );
    }
    let rows: String = complaints
        .iter()
        .map(|complaint| {
            format!(
                "<tr><td><a href=\"/dashboard/complaints/{}\">{}</a></td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                complaint.id,
                escape_html(&complaint.title),
                escape_html(&complaint.category),
                status_badge(complaint),
                complaint.created_at.format("%Y-%m-%d"),
            )
        })
        .collect();
    let body = format!(
        "<h1>My complaints</h1>\n<table>\n<thead><tr><th>Title</th><th>Category</th>\
         <th>Status</th><th>Submitted</th></tr></thead>\n<tbody>\n{rows}</tbody>\n</table>"
    );
    layout("My complaints", &body)
}
