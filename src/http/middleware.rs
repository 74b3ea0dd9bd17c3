//! Cluster selection middleware.
//!
//! # Responsibilities
//! - Evaluate the current routing table against each request
//! - Tag matching requests with a [`ClusterSelection`] extension
//! - Allow the whole table to be swapped atomically on reload
//!
//! # Design Decisions
//! - Never rejects: an unmatched request passes through untagged
//! - Each request works on one table snapshot, even across a reload
//! - Forwarding to the cluster is left to the downstream handler

use std::sync::Arc;

use arc_swap::ArcSwap;
use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};

use crate::routing::{Routing, RoutingTable};

/// Shared, swappable routing table.
#[derive(Clone)]
pub struct RoutingState {
    table: Arc<ArcSwap<RoutingTable>>,
}

impl RoutingState {
    pub fn new(table: RoutingTable) -> Self {
        Self {
            table: Arc::new(ArcSwap::from_pointee(table)),
        }
    }

    /// Replace the table; requests already running keep the old one.
    pub fn replace(&self, table: RoutingTable) {
        let routings = table.len();
        self.table.store(Arc::new(table));
        tracing::info!(routings, "Routing table replaced");
    }

    /// The table currently in effect.
    pub fn snapshot(&self) -> Arc<RoutingTable> {
        self.table.load_full()
    }
}

/// Decision attached to a request that matched a routing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterSelection {
    pub cluster: String,
    pub path_pattern: String,
    pub description: String,
}

impl From<&Routing> for ClusterSelection {
    fn from(routing: &Routing) -> Self {
        Self {
            cluster: routing.cluster().to_string(),
            path_pattern: routing.path_pattern().to_string(),
            description: routing.description().to_string(),
        }
    }
}

/// Tag the request with the cluster of the first matching routing, if any.
pub async fn cluster_selection(
    State(state): State<RoutingState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let selection = {
        let table = state.table.load();
        table.select(&req).map(ClusterSelection::from)
    };

    match selection {
        Some(selection) => {
            tracing::debug!(
                path = %req.uri().path(),
                cluster = %selection.cluster,
                "Request matched routing"
            );
            req.extensions_mut().insert(selection);
        }
        None => {
            tracing::debug!(path = %req.uri().path(), "No routing matched");
        }
    }

    next.run(req).await
}
