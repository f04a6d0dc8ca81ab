//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all views
//! - Wire up middleware (request ID, tracing, timeout, metrics, code owner)
//! - Serve the admin API on its own listener
//! - Apply settings reloads to live state
//! - Bind server to listener and shut down gracefully

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use axum::{body::Body, http::Request, middleware, Router};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::admin::setup_admin_router;
use crate::config::ServiceConfig;
use crate::course_detail::{CourseDetailStore, CourseDetailSwitches};
use crate::http::request::{record_request_metrics, UuidRequestId};
use crate::monitoring::{
    code_owner_middleware, CodeOwnerMappings, CodeOwnerMetricMiddleware, CodeOwnerState,
    CustomMetricSink, TracingMetricSink,
};
use crate::observability::tracing::make_request_span;
use crate::views::{lms_views, ViewRegistry, ViewState};
use crate::waffle::InMemorySwitchStore;

/// Live state shared by the server, the admin API and the reload task.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ArcSwap<ServiceConfig>>,
    pub mappings: Arc<ArcSwap<CodeOwnerMappings>>,
    pub switches: Arc<InMemorySwitchStore>,
    pub views: Arc<ViewRegistry>,
}

impl AppState {
    /// Swap in reloaded settings.
    ///
    /// The code owner table is rebuilt; switches listed in the new settings
    /// are re-seeded and operator changes to other switches are kept.
    pub fn apply_config(&self, config: ServiceConfig) {
        let mappings = CodeOwnerMappings::from_setting(config.code_owner_mappings.as_ref());
        tracing::info!(
            configured = mappings.is_configured(),
            mappings = %mappings,
            switches = config.waffle.switches.len(),
            "Applying reloaded settings"
        );
        self.mappings.store(Arc::new(mappings));
        self.switches.seed(&config.waffle.switches);
        self.config.store(Arc::new(config));
    }
}

/// HTTP server for the LMS views.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server reporting custom metrics on request spans.
    pub fn new(config: ServiceConfig) -> Self {
        Self::with_metric_sink(config, Arc::new(TracingMetricSink))
    }

    /// Create a new HTTP server reporting custom metrics to `sink`.
    pub fn with_metric_sink(config: ServiceConfig, sink: Arc<dyn CustomMetricSink>) -> Self {
        let mappings = CodeOwnerMappings::from_setting(config.code_owner_mappings.as_ref());
        let mappings = Arc::new(ArcSwap::from_pointee(mappings));
        let switches = Arc::new(InMemorySwitchStore::from_seeds(&config.waffle.switches));

        let (views_router, registry) = lms_views().into_parts();
        let views = Arc::new(registry);

        let code_owner_state = CodeOwnerState {
            middleware: Arc::new(CodeOwnerMetricMiddleware::new(mappings.clone(), sink)),
            views: views.clone(),
        };
        let view_state = ViewState {
            courses: Arc::new(CourseDetailStore::new()),
            switches: CourseDetailSwitches::new(switches.clone()),
        };

        let router = Self::build_router(&config, views_router, code_owner_state, view_state);

        let state = AppState {
            config: Arc::new(ArcSwap::from_pointee(config)),
            mappings,
            switches,
            views,
        };

        Self { router, state }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(
        config: &ServiceConfig,
        views_router: Router<ViewState>,
        code_owner_state: CodeOwnerState,
        view_state: ViewState,
    ) -> Router {
        views_router
            .route_layer(middleware::from_fn_with_state(code_owner_state, code_owner_middleware))
            .with_state(view_state)
            .layer(middleware::from_fn(record_request_metrics))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| make_request_span(request)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
    }

    /// The application router, for serving or driving in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Shared live state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Run the server until a shutdown signal arrives.
    ///
    /// Settings received on `config_updates` are applied while running.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<ServiceConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, views = self.state.views.len(), "HTTP server starting");

        let reload_state = self.state.clone();
        tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                reload_state.apply_config(config);
            }
        });

        let admin_config = self.state.config.load().admin.clone();
        if admin_config.enabled {
            let admin_listener = TcpListener::bind(&admin_config.bind_address).await?;
            let admin_router = setup_admin_router(self.state.clone());
            let mut admin_shutdown = shutdown.resubscribe();
            tracing::info!(address = %admin_config.bind_address, "Admin API starting");
            tokio::spawn(async move {
                let result = axum::serve(admin_listener, admin_router)
                    .with_graceful_shutdown(async move {
                        let _ = admin_shutdown.recv().await;
                    })
                    .await;
                if let Err(e) = result {
                    tracing::error!(error = %e, "Admin API failed");
                }
            });
        }

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitoring::custom_metrics::{RecordingMetricSink, CODE_OWNER, VIEW_FUNC_MODULE};
    use crate::waffle::SwitchStore;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    fn config(toml_text: &str) -> ServiceConfig {
        toml::from_str(toml_text).unwrap()
    }

    #[tokio::test]
    async fn test_routed_request_reports_code_owner() {
        let sink = Arc::new(RecordingMetricSink::new());
        let server = HttpServer::with_metric_sink(
            config(
                r#"
                [code_owner_mappings]
                team-blocks = ["lms_monitoring::views::xblock"]
                "#,
            ),
            sink.clone(),
        );

        let response = server
            .router()
            .oneshot(Request::get("/xblock/block-v1:edX+1").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(
            sink.get(VIEW_FUNC_MODULE).as_deref(),
            Some("lms_monitoring.views.xblock")
        );
        assert_eq!(sink.get(CODE_OWNER).as_deref(), Some("team-blocks"));
    }

    #[tokio::test]
    async fn test_unrouted_request_reports_nothing() {
        let sink = Arc::new(RecordingMetricSink::new());
        let server = HttpServer::with_metric_sink(
            config(
                r#"
                [code_owner_mappings]
                team-all = ["lms_monitoring"]
                "#,
            ),
            sink.clone(),
        );

        let response = server
            .router()
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(sink.calls().is_empty());
    }

    #[tokio::test]
    async fn test_incoming_request_id_is_kept() {
        let server = HttpServer::new(ServiceConfig::default());
        let response = server
            .router()
            .oneshot(
                Request::get("/heartbeat")
                    .header("x-request-id", "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()["x-request-id"], "abc-123");
    }

    #[test]
    fn test_apply_config_swaps_mappings_and_seeds_switches() {
        let server = HttpServer::new(ServiceConfig::default());
        let state = server.state();
        assert!(!state.mappings.load().is_configured());

        state.switches.set_active("ops.kept", true);
        state.apply_config(config(
            r#"
            [code_owner_mappings]
            team-red = ["openedx.core.djangoapps.xblock"]

            [waffle.switches]
            "course_detail.course_detail_update_certificate_date" = true
            "#,
        ));

        assert_eq!(state.mappings.load().code_owner_for_module("xblock"), Some("team-red"));
        let switches = state.switches.all();
        assert_eq!(switches.get("course_detail.course_detail_update_certificate_date"), Some(&true));
        assert_eq!(switches.get("ops.kept"), Some(&true));
    }
}
