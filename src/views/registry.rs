//! Route template → view module lookup.
//!
//! # Design Decisions
//! - Registered next to the route, so a route can't exist without its module
//! - Modules stored in dotted form to line up with `code_owner_mappings`
//! - Immutable after the router is built (thread-safe without locks)

use std::collections::HashMap;

use axum::{routing::MethodRouter, Router};

use crate::monitoring::code_owner::normalize_module_path;

/// Maps matched route templates to the module of their handler.
#[derive(Debug, Clone, Default)]
pub struct ViewRegistry {
    modules: HashMap<String, String>,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `path` is served by a handler in `module`.
    pub fn register(&mut self, path: &str, module: &str) {
        let module = normalize_module_path(module);
        if let Some(previous) = self.modules.insert(path.to_string(), module.clone()) {
            tracing::warn!(path, previous = %previous, module = %module, "View module replaced");
        }
    }

    /// Module of the handler serving `path`.
    pub fn module_for(&self, path: &str) -> Option<&str> {
        self.modules.get(path).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

/// Builds an axum router and its [`ViewRegistry`] together.
pub struct Views<S = ()> {
    router: Router<S>,
    registry: ViewRegistry,
}

impl<S> Views<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            router: Router::new(),
            registry: ViewRegistry::new(),
        }
    }

    /// Add a route whose handlers live in `module` (usually `module_path!()`).
    pub fn view(mut self, path: &str, method_router: MethodRouter<S>, module: &str) -> Self {
        self.registry.register(path, module);
        self.router = self.router.route(path, method_router);
        self
    }

    pub fn into_parts(self) -> (Router<S>, ViewRegistry) {
        (self.router, self.registry)
    }
}

impl<S> Default for Views<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;

    #[test]
    fn test_register_normalizes_module() {
        let mut registry = ViewRegistry::new();
        registry.register("/xblock/{usage_id}", "lms_monitoring::views::xblock");
        assert_eq!(
            registry.module_for("/xblock/{usage_id}"),
            Some("lms_monitoring.views.xblock")
        );
        assert_eq!(registry.module_for("/xblock/abc"), None);
    }

    #[test]
    fn test_views_builder_registers_each_route() {
        let (_router, registry) = Views::<()>::new()
            .view("/a", get(|| async { "a" }), "app.a")
            .view("/b", get(|| async { "b" }), "app.b")
            .into_parts();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.module_for("/b"), Some("app.b"));
    }
}
