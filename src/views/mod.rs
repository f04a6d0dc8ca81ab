//! LMS views and the registry tying routes to their modules.

pub mod course_detail;
pub mod heartbeat;
pub mod registry;
pub mod xblock;

use std::sync::Arc;

use axum::routing::get;

use crate::course_detail::{CourseDetailStore, CourseDetailSwitches};

pub use registry::{ViewRegistry, Views};

/// State shared by the LMS views.
#[derive(Clone)]
pub struct ViewState {
    pub courses: Arc<CourseDetailStore>,
    pub switches: CourseDetailSwitches,
}

/// All LMS views, each registered with its handler's module.
pub fn lms_views() -> Views<ViewState> {
    Views::new()
        .view("/heartbeat", get(heartbeat::heartbeat), heartbeat::MODULE)
        .view("/xblock/{usage_id}", get(xblock::render_xblock), xblock::MODULE)
        .view(
            "/api/courses/{course_id}/details",
            get(course_detail::get_course_details).put(course_detail::update_course_details),
            course_detail::MODULE,
        )
}
