//! Fixtures shared by unit tests across the crate.

use std::{net::SocketAddr, sync::Arc};

use axum::{body::to_bytes, response::Response, Router};

use crate::{
    app::build_router,
    config::Config,
    models::{
        complaint::{Complaint, ComplaintStatus},
        user::{User, UserRole},
    },
    repositories::{MockComplaintStore, MockIdentityStore},
    services::credentials::CredentialService,
    state::AppState,
    types::DepartmentId,
};

pub const TEST_JWT_SECRET: &str = "unit-test-secret-with-enough-length";

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://unused".into(),
        database_max_connections: 1,
        jwt_secret: TEST_JWT_SECRET.into(),
        session_ttl_hours: 24,
        production_mode: false,
        bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
    }
}

pub fn router_with(identities: MockIdentityStore, complaints: MockComplaintStore) -> Router {
    build_router(AppState::new(
        Arc::new(identities),
        Arc::new(complaints),
        test_config(),
    ))
}

/// An identity store that resolves session tokens for the given users.
pub fn identities_knowing(users: Vec<User>) -> MockIdentityStore {
    let mut identities = MockIdentityStore::new();
    identities
        .expect_find_user_by_id()
        .returning(move |id| Ok(users.iter().find(|user| user.id == id).cloned()));
    identities
}

pub fn bearer_for(user: &User) -> String {
    let token = CredentialService::new(TEST_JWT_SECRET, 24)
        .sign_token(user)
        .expect("sign test token");
    format!("Bearer {token}")
}

pub fn session_cookie_for(user: &User) -> String {
    let token = CredentialService::new(TEST_JWT_SECRET, 24)
        .sign_token(user)
        .expect("sign test token");
    format!("token={token}")
}

pub async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_str(&body_text(response).await).expect("json body")
}

pub fn user_with(role: UserRole, department_id: Option<DepartmentId>) -> User {
    let name = match role {
        UserRole::Student => "Sam Student",
        UserRole::DeptOfficer => "Olu Officer",
        UserRole::Admin => "Ada Admin",
    };
    User::new(
        format!("{}@example.edu", uuid::Uuid::new_v4().simple()),
        "not-a-real-hash".into(),
        name.into(),
        role,
        department_id,
    )
}

pub fn student() -> User {
    user_with(UserRole::Student, None)
}

pub fn officer(department_id: DepartmentId) -> User {
    user_with(UserRole::DeptOfficer, Some(department_id))
}

pub fn admin() -> User {
    user_with(UserRole::Admin, None)
}

pub fn complaint_by(complainant: &User, department_id: Option<DepartmentId>) -> Complaint {
    Complaint::new(
        complainant.id,
        "Leaking roof in block C".into(),
        "Water drips onto the desks whenever it rains.".into(),
        "Facilities".into(),
        department_id,
    )
}

pub fn complaint_in(
    complainant: &User,
    department_id: Option<DepartmentId>,
    status: ComplaintStatus,
) -> Complaint {
    let mut complaint = complaint_by(complainant, department_id);
    complaint.status = status;
    complaint
}
