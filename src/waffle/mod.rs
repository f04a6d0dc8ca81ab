//! Waffle switches: named booleans operators flip at runtime.
//!
//! # Data Flow
//! ```text
//! [waffle.switches] settings ─┐
//! admin API PUT ──────────────┼→ store.rs (SwitchStore)
//!                             │
//! feature code → namespace.rs (WaffleSwitchNamespace::is_enabled) → store read
//! ```

pub mod namespace;
pub mod store;

pub use namespace::{SwitchOverride, WaffleSwitchNamespace};
pub use store::{InMemorySwitchStore, SwitchStore};
