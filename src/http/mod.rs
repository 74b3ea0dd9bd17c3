//! HTTP integration subsystem.
//!
//! # Data Flow
//! ```text
//! Request (already narrowed by the path router)
//!     → middleware.rs (select routing, tag request with cluster)
//!     → downstream handler forwards to the tagged cluster
//! ```

pub mod middleware;

pub use middleware::{cluster_selection, ClusterSelection, RoutingState};
