//! Namespaced switch access.

use std::sync::Arc;

use crate::observability::metrics;
use crate::waffle::store::SwitchStore;

/// A group of switches sharing a name prefix.
///
/// The stored name of `switch` is `"{namespace}.{switch}"`.
#[derive(Clone)]
pub struct WaffleSwitchNamespace {
    name: String,
    store: Arc<dyn SwitchStore>,
}

impl WaffleSwitchNamespace {
    pub fn new(name: impl Into<String>, store: Arc<dyn SwitchStore>) -> Self {
        Self {
            name: name.into(),
            store,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fully qualified name of `switch`.
    pub fn namespaced_name(&self, switch: &str) -> String {
        format!("{}.{}", self.name, switch)
    }

    /// Live state of `switch`.
    pub fn is_enabled(&self, switch: &str) -> bool {
        let name = self.namespaced_name(switch);
        let enabled = self.store.is_active(&name);
        tracing::debug!(switch = %name, enabled, "Waffle switch checked");
        metrics::record_switch_check(&name, enabled);
        enabled
    }

    /// Force `switch` to `active` until the returned guard drops.
    pub fn override_switch(&self, switch: &str, active: bool) -> SwitchOverride {
        let name = self.namespaced_name(switch);
        let previous = self.store.set_active(&name, active);
        SwitchOverride {
            store: self.store.clone(),
            name,
            previous,
        }
    }
}

impl std::fmt::Debug for WaffleSwitchNamespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaffleSwitchNamespace")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Restores a switch's previous state on drop.
pub struct SwitchOverride {
    store: Arc<dyn SwitchStore>,
    name: String,
    previous: Option<bool>,
}

impl Drop for SwitchOverride {
    fn drop(&mut self) {
        match self.previous {
            Some(active) => {
                self.store.set_active(&self.name, active);
            }
            None => {
                self.store.remove(&self.name);
            }
        }
    }
}
