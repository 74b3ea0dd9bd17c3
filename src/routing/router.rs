//! Routing lookup.
//!
//! # Responsibilities
//! - Hold the candidate routings handed over by the path router
//! - Return the first routing whose conditions match the request
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - First match wins, in configuration order
//! - Explicit `None` rather than a silent default cluster

use crate::routing::extract::RequestAttributes;
use crate::routing::matcher::{Matcher, Routing};

/// Ordered, immutable set of candidate routings.
#[derive(Debug, Default)]
pub struct RoutingTable {
    routings: Vec<Routing>,
}

impl RoutingTable {
    pub fn new(routings: Vec<Routing>) -> Self {
        Self { routings }
    }

    /// First routing matching the request, if any.
    pub fn select<R: RequestAttributes + ?Sized>(&self, req: &R) -> Option<&Routing> {
        self.routings.iter().find(|routing| {
            let matched = routing.matches(req);
            tracing::trace!(
                cluster = %routing.cluster(),
                description = %routing.description(),
                matched,
                "Routing evaluated"
            );
            matched
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Routing> {
        self.routings.iter()
    }

    pub fn len(&self) -> usize {
        self.routings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routings.is_empty()
    }
}

impl FromIterator<Routing> for RoutingTable {
    fn from_iter<I: IntoIterator<Item = Routing>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
