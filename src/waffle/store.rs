//! Switch storage.

use std::collections::BTreeMap;

use dashmap::DashMap;

/// Backing store for named boolean switches.
///
/// Reads go straight to the store every time; nothing is cached by callers.
pub trait SwitchStore: Send + Sync {
    /// Current state of `name`, `None` if the switch was never set.
    fn get(&self, name: &str) -> Option<bool>;

    /// Set `name`, returning the previous state.
    fn set_active(&self, name: &str, active: bool) -> Option<bool>;

    /// Forget `name`, returning the previous state.
    fn remove(&self, name: &str) -> Option<bool>;

    /// Snapshot of every known switch.
    fn all(&self) -> BTreeMap<String, bool>;

    /// Unknown switches are off.
    fn is_active(&self, name: &str) -> bool {
        self.get(name).unwrap_or(false)
    }
}

/// Concurrent in-process switch store, toggled through the admin API.
#[derive(Debug, Default)]
pub struct InMemorySwitchStore {
    switches: DashMap<String, bool>,
}

impl InMemorySwitchStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `seeds`.
    pub fn from_seeds(seeds: &BTreeMap<String, bool>) -> Self {
        let store = Self::new();
        store.seed(seeds);
        store
    }

    /// Apply configured switch states, leaving unlisted switches untouched.
    pub fn seed(&self, seeds: &BTreeMap<String, bool>) {
        for (name, active) in seeds {
            self.switches.insert(name.clone(), *active);
        }
        tracing::debug!(count = seeds.len(), "Waffle switches seeded");
    }
}

impl SwitchStore for InMemorySwitchStore {
    fn get(&self, name: &str) -> Option<bool> {
        self.switches.get(name).map(|r| *r.value())
    }

    fn set_active(&self, name: &str, active: bool) -> Option<bool> {
        self.switches.insert(name.to_string(), active)
    }

    fn remove(&self, name: &str) -> Option<bool> {
        self.switches.remove(name).map(|(_, active)| active)
    }

    fn all(&self) -> BTreeMap<String, bool> {
        self.switches
            .iter()
            .map(|r| (r.key().clone(), *r.value()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_switch_is_off() {
        let store = InMemorySwitchStore::new();
        assert_eq!(store.get("missing"), None);
        assert!(!store.is_active("missing"));
    }

    #[test]
    fn test_set_and_remove_report_previous_state() {
        let store = InMemorySwitchStore::new();
        assert_eq!(store.set_active("a.b", true), None);
        assert_eq!(store.set_active("a.b", false), Some(true));
        assert_eq!(store.remove("a.b"), Some(false));
        assert_eq!(store.remove("a.b"), None);
    }

    #[test]
    fn test_seed_overwrites_only_listed_switches() {
        let mut seeds = BTreeMap::new();
        seeds.insert("ns.one".to_string(), true);
        let store = InMemorySwitchStore::from_seeds(&seeds);
        store.set_active("ns.two", true);

        seeds.insert("ns.one".to_string(), false);
        store.seed(&seeds);

        let all = store.all();
        assert_eq!(all.get("ns.one"), Some(&false));
        assert_eq!(all.get("ns.two"), Some(&true));
    }
}
