//! Settings subsystem.
//!
//! # Data Flow
//! ```text
//! settings file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated, immutable)
//!     → code owner table + switch seeds derived from it
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new settings
//!     → validation.rs validates
//!     → server swaps the code owner table and re-seeds switches
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal settings files
//! - Validation separates syntactic (serde) from semantic checks
//! - `code_owner_mappings` stays raw so a bad shape never blocks startup

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{AdminConfig, ListenerConfig, ObservabilityConfig, ServiceConfig, WaffleConfig};
