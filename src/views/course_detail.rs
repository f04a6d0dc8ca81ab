//! Course details API views.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::course_detail::{CourseDetails, CourseDetailsUpdate};
use crate::views::ViewState;

pub const MODULE: &str = module_path!();

pub async fn get_course_details(
    State(state): State<ViewState>,
    Path(course_id): Path<String>,
) -> Response {
    match state.courses.get(&course_id) {
        Some(details) => Json(details).into_response(),
        None => (StatusCode::NOT_FOUND, "Unknown course").into_response(),
    }
}

pub async fn update_course_details(
    State(state): State<ViewState>,
    Path(course_id): Path<String>,
    Json(update): Json<CourseDetailsUpdate>,
) -> Json<CourseDetails> {
    Json(state.courses.update(&course_id, update, &state.switches))
}
