//! Code owner middleware.
//!
//! # Responsibilities
//! - Find the module of the view serving the request
//! - Resolve that module to its code owner
//! - Report `view_func_module`, `code_owner` and mapping errors as custom metrics
//!
//! # Design Decisions
//! - Runs as a route layer, so only matched routes are considered
//! - Never changes the response; a bad setting only adds an error metric
//! - Reads the table through `ArcSwap`, so reloads never block requests

use std::sync::Arc;

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::{MatchedPath, State},
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::monitoring::code_owner::CodeOwnerMappings;
use crate::monitoring::custom_metrics::{
    CustomMetricSink, CODE_OWNER, CODE_OWNER_MAPPING_ERROR, VIEW_FUNC_MODULE,
};
use crate::observability::metrics;
use crate::views::ViewRegistry;

/// Sets code owner custom metrics for a view.
pub struct CodeOwnerMetricMiddleware {
    mappings: Arc<ArcSwap<CodeOwnerMappings>>,
    sink: Arc<dyn CustomMetricSink>,
}

impl CodeOwnerMetricMiddleware {
    pub fn new(mappings: Arc<ArcSwap<CodeOwnerMappings>>, sink: Arc<dyn CustomMetricSink>) -> Self {
        Self { mappings, sink }
    }

    /// Report the code owner of `view_func_module`.
    ///
    /// Emits nothing when no mappings are configured.
    pub fn process_view(&self, view_func_module: &str) {
        let mappings = self.mappings.load();
        if !mappings.is_configured() {
            return;
        }

        self.sink.set_custom_metric(VIEW_FUNC_MODULE, view_func_module);

        match mappings.code_owner_for_module(view_func_module) {
            Some(owner) => {
                self.sink.set_custom_metric(CODE_OWNER, owner);
                metrics::record_code_owner(owner);
            }
            None => {
                tracing::trace!(view_func_module, "No code owner for view module");
            }
        }

        if let Some(error) = mappings.error_summary() {
            self.sink.set_custom_metric(CODE_OWNER_MAPPING_ERROR, &error);
            metrics::record_code_owner_mapping_error();
        }
    }
}

/// State for [`code_owner_middleware`].
#[derive(Clone)]
pub struct CodeOwnerState {
    pub middleware: Arc<CodeOwnerMetricMiddleware>,
    pub views: Arc<ViewRegistry>,
}

/// Middleware function attaching code owner metrics to routed requests.
pub async fn code_owner_middleware(
    State(state): State<CodeOwnerState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let view_module = request
        .extensions()
        .get::<MatchedPath>()
        .and_then(|path| state.views.module_for(path.as_str()));

    if let Some(module) = view_module {
        state.middleware.process_view(module);
    }

    next.run(request).await
}
