//! Waffle switches for the course details view.

use std::sync::Arc;

use crate::waffle::{SwitchStore, WaffleSwitchNamespace};

pub const WAFFLE_NAMESPACE: &str = "course_detail";

/// Allows `certificate_available_date` to be changed through course details.
pub const COURSE_DETAIL_UPDATE_CERTIFICATE_DATE: &str = "course_detail_update_certificate_date";

/// Switches in the `course_detail` namespace.
#[derive(Debug, Clone)]
pub struct CourseDetailSwitches {
    switches: WaffleSwitchNamespace,
}

impl CourseDetailSwitches {
    pub fn new(store: Arc<dyn SwitchStore>) -> Self {
        Self {
            switches: WaffleSwitchNamespace::new(WAFFLE_NAMESPACE, store),
        }
    }

    /// Returns true if the course_detail_update_certificate_date switch is enabled.
    pub fn course_detail_update_certificate_date(&self) -> bool {
        self.switches.is_enabled(COURSE_DETAIL_UPDATE_CERTIFICATE_DATE)
    }

    pub fn namespace(&self) -> &WaffleSwitchNamespace {
        &self.switches
    }
}
