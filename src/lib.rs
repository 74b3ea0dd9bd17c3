//! Condition-based canary routing for an HTTP gateway.
//!
//! A routing is a small declarative block (`desc`, `deadline`, `rule`, `or`)
//! whose conditions read request headers, cookies and query parameters.
//! Matching requests are steered to the routing's cluster.

pub mod config;
pub mod http;
pub mod observability;
pub mod routing;

pub use config::RouterConfig;
pub use http::{ClusterSelection, RoutingState};
pub use routing::{Condition, Matcher, Routing, RoutingTable};
