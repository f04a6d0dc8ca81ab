//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     broadcast → HTTP server and admin API stop accepting → drain → exit
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
