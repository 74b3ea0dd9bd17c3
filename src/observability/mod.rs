//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (config loads, routing builds, match decisions)
//!
//! Consumers:
//!     → logging.rs subscriber (stderr, pretty or JSON)
//! ```
//!
//! # Design Decisions
//! - Structured fields instead of formatted strings
//! - Per-request events at debug/trace level only, off by default

pub mod logging;

pub use logging::init_logging;
