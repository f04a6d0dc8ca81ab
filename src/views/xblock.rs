//! XBlock rendering views.

use axum::{extract::Path, Json};
use serde::Serialize;

pub const MODULE: &str = module_path!();

#[derive(Debug, Serialize)]
pub struct XBlockView {
    pub usage_id: String,
    pub view_name: &'static str,
}

/// Render the student view of a block.
pub async fn render_xblock(Path(usage_id): Path<String>) -> Json<XBlockView> {
    tracing::debug!(usage_id = %usage_id, "Rendering xblock");
    Json(XBlockView {
        usage_id,
        view_name: "student_view",
    })
}
