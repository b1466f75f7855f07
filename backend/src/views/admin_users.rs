use axum::{extract::State, response::Html};

use super::{escape_html, layout, PageError};
use crate::{
    handlers::require_user, middleware::SessionToken, models::user::UserDirectoryEntry, policy,
    state::AppState,
};

const NO_DEPARTMENT: &str = "-";

pub async fn admin_users_page(
    State(state): State<AppState>,
    token: SessionToken,
) -> Result<Html<String>, PageError> {
    let viewer = require_user(&state, &token).await?;
    if !policy::can_list_users(&viewer) {
        tracing::warn!(user_id = %viewer.id, "Non-admin requested the user directory");
        return Err(PageError::Forbidden);
    }

    let entries = state.identities.list_user_directory().await?;
    Ok(Html(render_user_directory(&entries)))
}

pub fn render_user_directory(entries: &[UserDirectoryEntry]) -> String {
    let rows: String = entries
        .iter()
        .map(|entry| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                escape_html(&entry.name),
                escape_html(&entry.email),
                entry.role,
                escape_html(entry.department_name.as_deref().unwrap_or(NO_DEPARTMENT)),
            )
        })
        .collect();

    let body = format!(
        "<h1>Users</h1>\n<table>\n<thead><tr><th>Name</th><th>Email</th><th>Role</th>\
         <th>Department</th></tr></thead>\n<tbody>\n{rows}</tbody>\n</table>"
    );
    layout("Users", &body)
}
