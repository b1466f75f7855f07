use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    docs::ApiDoc,
    handlers::{auth, complaints, departments},
    middleware::{log_error_responses, request_id},
    state::AppState,
    views,
};

pub fn build_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me));

    let api_routes = Router::new()
        .route("/api/departments", get(departments::list_departments))
        .route(
            "/api/complaints",
            get(complaints::list_complaints).post(complaints::create_complaint),
        )
        .route("/api/complaints/{id}", get(complaints::get_complaint))
        .route(
            "/api/complaints/{id}/status",
            patch(complaints::update_status),
        )
        .route(
            "/api/complaints/{id}/attachments",
            post(complaints::add_attachments),
        );

    let page_routes = Router::new()
        .route(
            "/dashboard/admin/users",
            get(views::admin_users::admin_users_page),
        )
        .route(
            "/dashboard/my-complaints",
            get(views::complaints::my_complaints_page),
        )
        .route(
            "/dashboard/complaints/{id}",
            get(views::complaints::complaint_page),
        );

    Router::new()
        .merge(auth_routes)
        .merge(api_routes)
        .merge(page_routes)
        .merge(SwaggerUi::new("/api/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(axum_middleware::from_fn(request_id))
                .layer(axum_middleware::from_fn(log_error_responses)),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use crate::{
        middleware::REQUEST_ID_HEADER,
        models::department::Department,
        repositories::{MockComplaintStore, MockIdentityStore},
        test_support::{body_json, router_with},
        types::DepartmentId,
    };

    #[tokio::test]
    async fn departments_are_public_and_echo_request_id() {
        let mut identities = MockIdentityStore::new();
        identities.expect_list_departments().returning(|| {
            Ok(vec![Department {
                id: DepartmentId::new(),
                name: "Facilities".into(),
            }])
        });
        let app = router_with(identities, MockComplaintStore::new());

        let response = app
            .oneshot(
                Request::get("/api/departments")
                    .header(&REQUEST_ID_HEADER, "req-42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[&REQUEST_ID_HEADER], "req-42");
        let body = body_json(response).await;
        assert_eq!(body[0]["name"], "Facilities");
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let app = router_with(MockIdentityStore::new(), MockComplaintStore::new());
        let response = app
            .oneshot(
                Request::get("/api-doc/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body["paths"]["/api/auth/register"]["post"].is_object());
        assert!(body["paths"]["/api/complaints/{id}/status"]["patch"].is_object());
    }

    #[tokio::test]
    async fn store_failures_become_generic_500() {
        let mut identities = MockIdentityStore::new();
        identities.expect_list_departments().returning(|| {
            Err(crate::error::AppError::InternalServerError(anyhow::anyhow!(
                "connection reset by peer"
            )))
        });
        let app = router_with(identities, MockComplaintStore::new());

        let response = app
            .oneshot(Request::get("/api/departments").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Internal server error");
    }
}
