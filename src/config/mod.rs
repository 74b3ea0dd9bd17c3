//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (read & deserialize)
//!     → validation.rs (parse every rule set, semantic checks)
//!     → RoutingTable (validated, immutable)
//!     → shared via Arc with the request path
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - Logging fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{LogFormat, LoggingConfig, RouterConfig, RoutingConfig};
pub use validation::ValidationError;
