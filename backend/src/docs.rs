#![allow(dead_code)] // OpenAPI doc stubs are only referenced by utoipa macros.

use crate::models::{
    attachment::{AddAttachmentsRequest, AttachmentInput, AttachmentResponse},
    audit_log::AuditLogResponse,
    complaint::{
        ComplaintDetailResponse, ComplaintPermissions, ComplaintResponse, ComplaintStatus,
        CreateComplaintRequest, UpdateStatusRequest,
    },
    department::Department,
    user::{AuthResponse, LoginRequest, RegisterRequest, UserResponse, UserRole},
};
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        register_doc,
        login_doc,
        logout_doc,
        me_doc,
        list_departments_doc,
        list_complaints_doc,
        create_complaint_doc,
        get_complaint_doc,
        update_status_doc,
        add_attachments_doc
    ),
    components(
        schemas(
            // auth
            RegisterRequest,
            LoginRequest,
            UserResponse,
            AuthResponse,
            UserRole,
            Department,
            // complaints
            CreateComplaintRequest,
            UpdateStatusRequest,
            ComplaintStatus,
            ComplaintResponse,
            ComplaintDetailResponse,
            ComplaintPermissions,
            AttachmentInput,
            AddAttachmentsRequest,
            AttachmentResponse,
            AuditLogResponse
        )
    ),
    modifiers(&SecuritySchemes),
    tags(
        (name = "Auth", description = "Registration, sign-in and the current session"),
        (name = "Complaints", description = "Submitting, triaging and amending complaints"),
        (name = "Departments", description = "Departments complaints can be assigned to")
    ),
    security(("BearerAuth" = []), ("SessionCookie" = []))
)]
pub struct ApiDoc;

struct SecuritySchemes;

impl Modify for SecuritySchemes {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();

        let mut bearer = Http::new(HttpAuthScheme::Bearer);
        bearer.bearer_format = Some("JWT".to_string());
        components.add_security_scheme("BearerAuth", SecurityScheme::Http(bearer));
        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("token"))),
        );
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created; session cookie set", body = AuthResponse),
        (status = 400, description = "Validation failure or email already registered")
    ),
    tag = "Auth",
    security(())
)]
fn register_doc() {}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in; session cookie set", body = AuthResponse),
        (status = 401, description = "Invalid email or password")
    ),
    tag = "Auth",
    security(())
)]
fn login_doc() {}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses((status = 200, description = "Session cookie cleared", body = serde_json::Value)),
    tag = "Auth",
    security(())
)]
fn logout_doc() {}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = AuthResponse),
        (status = 401, description = "No valid session")
    ),
    tag = "Auth"
)]
fn me_doc() {}

#[utoipa::path(
    get,
    path = "/api/departments",
    responses((status = 200, body = [Department])),
    tag = "Departments",
    security(())
)]
fn list_departments_doc() {}

#[utoipa::path(
    get,
    path = "/api/complaints",
    responses(
        (status = 200, description = "Complaints visible to the caller, newest first", body = [ComplaintResponse]),
        (status = 401, description = "No valid session")
    ),
    tag = "Complaints"
)]
fn list_complaints_doc() {}

#[utoipa::path(
    post,
    path = "/api/complaints",
    request_body = CreateComplaintRequest,
    responses(
        (status = 201, body = ComplaintResponse),
        (status = 400, description = "Validation failure"),
        (status = 401, description = "No valid session")
    ),
    tag = "Complaints"
)]
fn create_complaint_doc() {}

#[utoipa::path(
    get,
    path = "/api/complaints/{id}",
    params(("id" = String, Path, description = "Complaint id")),
    responses(
        (status = 200, body = ComplaintDetailResponse),
        (status = 403, description = "Caller may not view this complaint"),
        (status = 404, description = "No such complaint")
    ),
    tag = "Complaints"
)]
fn get_complaint_doc() {}

#[utoipa::path(
    patch,
    path = "/api/complaints/{id}/status",
    params(("id" = String, Path, description = "Complaint id")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, body = ComplaintResponse),
        (status = 400, description = "Transition not allowed or missing resolution summary"),
        (status = 403, description = "Caller may not change this complaint's status"),
        (status = 409, description = "Status changed concurrently")
    ),
    tag = "Complaints"
)]
fn update_status_doc() {}

#[utoipa::path(
    post,
    path = "/api/complaints/{id}/attachments",
    params(("id" = String, Path, description = "Complaint id")),
    request_body = AddAttachmentsRequest,
    responses(
        (status = 201, body = [AttachmentResponse]),
        (status = 403, description = "Only the complainant may amend an open complaint")
    ),
    tag = "Complaints"
)]
fn add_attachments_doc() {}
