//! Course details and the update workflow.
//!
//! `certificate_available_date` is only written when the
//! `course_detail.course_detail_update_certificate_date` switch is on.

pub mod waffle;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

pub use waffle::CourseDetailSwitches;

/// Scheduling details of a course run. Dates are ISO 8601 strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseDetails {
    pub course_id: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub enrollment_start: Option<String>,
    pub enrollment_end: Option<String>,
    pub certificate_available_date: Option<String>,
}

/// Fields a client may change. Absent fields are left alone.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CourseDetailsUpdate {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub enrollment_start: Option<String>,
    pub enrollment_end: Option<String>,
    pub certificate_available_date: Option<String>,
}

impl CourseDetails {
    pub fn new(course_id: impl Into<String>) -> Self {
        Self {
            course_id: course_id.into(),
            ..Self::default()
        }
    }

    /// Apply `update`, returning whether anything changed.
    pub fn update_from_json(&mut self, update: CourseDetailsUpdate, switches: &CourseDetailSwitches) -> bool {
        let mut dirty = false;
        dirty |= apply(&mut self.start_date, update.start_date);
        dirty |= apply(&mut self.end_date, update.end_date);
        dirty |= apply(&mut self.enrollment_start, update.enrollment_start);
        dirty |= apply(&mut self.enrollment_end, update.enrollment_end);

        if update.certificate_available_date.is_some() {
            if switches.course_detail_update_certificate_date() {
                dirty |= apply(&mut self.certificate_available_date, update.certificate_available_date);
            } else {
                tracing::debug!(
                    course_id = %self.course_id,
                    "Ignoring certificate_available_date, update switch is off"
                );
            }
        }

        dirty
    }
}

fn apply(field: &mut Option<String>, value: Option<String>) -> bool {
    match value {
        Some(value) if field.as_deref() != Some(value.as_str()) => {
            *field = Some(value);
            true
        }
        _ => false,
    }
}

/// In-memory course details keyed by course ID.
#[derive(Debug, Default)]
pub struct CourseDetailStore {
    courses: DashMap<String, CourseDetails>,
}

impl CourseDetailStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, course_id: &str) -> Option<CourseDetails> {
        self.courses.get(course_id).map(|r| r.value().clone())
    }

    /// Update (or create) a course's details and return the result.
    pub fn update(
        &self,
        course_id: &str,
        update: CourseDetailsUpdate,
        switches: &CourseDetailSwitches,
    ) -> CourseDetails {
        let mut entry = self
            .courses
            .entry(course_id.to_string())
            .or_insert_with(|| CourseDetails::new(course_id));
        if entry.update_from_json(update, switches) {
            tracing::info!(course_id, "Course details updated");
        }
        entry.value().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::waffle::InMemorySwitchStore;
    use std::sync::Arc;

    fn update_with_cert_date() -> CourseDetailsUpdate {
        CourseDetailsUpdate {
            start_date: Some("2026-01-05T00:00:00Z".into()),
            certificate_available_date: Some("2026-06-01T00:00:00Z".into()),
            ..CourseDetailsUpdate::default()
        }
    }

    #[test]
    fn test_certificate_date_ignored_when_switch_off() {
        let switches = CourseDetailSwitches::new(Arc::new(InMemorySwitchStore::new()));
        let mut details = CourseDetails::new("course-v1:edX+Demo+2026");

        assert!(details.update_from_json(update_with_cert_date(), &switches));
        assert_eq!(details.start_date.as_deref(), Some("2026-01-05T00:00:00Z"));
        assert_eq!(details.certificate_available_date, None);
    }

    #[test]
    fn test_certificate_date_applied_when_switch_on() {
        let store = Arc::new(InMemorySwitchStore::new());
        let switches = CourseDetailSwitches::new(store.clone());
        let _on = switches
            .namespace()
            .override_switch(waffle::COURSE_DETAIL_UPDATE_CERTIFICATE_DATE, true);

        let mut details = CourseDetails::new("course-v1:edX+Demo+2026");
        details.update_from_json(update_with_cert_date(), &switches);
        assert_eq!(
            details.certificate_available_date.as_deref(),
            Some("2026-06-01T00:00:00Z")
        );
    }

    #[test]
    fn test_unchanged_update_is_not_dirty() {
        let switches = CourseDetailSwitches::new(Arc::new(InMemorySwitchStore::new()));
        let mut details = CourseDetails::new("c");
        details.update_from_json(update_with_cert_date(), &switches);
        assert!(!details.update_from_json(update_with_cert_date(), &switches));
        assert!(!details.update_from_json(CourseDetailsUpdate::default(), &switches));
    }

    #[test]
    fn test_store_creates_on_first_update() {
        let store = CourseDetailStore::new();
        let switches = CourseDetailSwitches::new(Arc::new(InMemorySwitchStore::new()));
        assert!(store.get("c").is_none());

        let details = store.update("c", update_with_cert_date(), &switches);
        assert_eq!(details.course_id, "c");
        assert_eq!(store.get("c"), Some(details));
    }
}
