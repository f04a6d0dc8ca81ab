//! Operator admin API.
//!
//! Bearer-token protected; lets operators flip waffle switches and inspect
//! the processed code owner table.

pub mod auth;
pub mod handlers;

use axum::{
    middleware,
    routing::{get, put},
    Router,
};

use self::auth::admin_auth_middleware;
use self::handlers::*;
use crate::http::server::AppState;

pub fn setup_admin_router(state: AppState) -> Router {
    Router::new()
        .route("/admin/status", get(get_status))
        .route("/admin/switches", get(list_switches))
        .route("/admin/switches/{name}", put(set_switch))
        .route("/admin/code-owners", get(get_code_owners))
        .layer(middleware::from_fn_with_state(state.clone(), admin_auth_middleware))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;
    use crate::http::HttpServer;
    use crate::waffle::SwitchStore;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn admin_router() -> (Router, AppState) {
        let mut config = ServiceConfig::default();
        config.admin.api_key = "secret".into();
        let server = HttpServer::new(config);
        let state = server.state().clone();
        (setup_admin_router(state.clone()), state)
    }

    #[tokio::test]
    async fn test_requires_bearer_token() {
        let (router, _) = admin_router();
        let response = router
            .clone()
            .oneshot(Request::get("/admin/status").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = router
            .oneshot(
                Request::get("/admin/status")
                    .header("Authorization", "Bearer wrong")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_set_switch() {
        let (router, state) = admin_router();
        let response = router
            .oneshot(
                Request::put("/admin/switches/course_detail.course_detail_update_certificate_date")
                    .header("Authorization", "Bearer secret")
                    .header("Content-Type", "application/json")
                    .body(Body::from(r#"{"active": true}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["active"], true);
        assert_eq!(json["previous"], serde_json::Value::Null);
        assert!(state
            .switches
            .is_active("course_detail.course_detail_update_certificate_date"));
    }
}
