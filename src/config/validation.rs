//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Parse every rule-set block into a Routing
//! - Reject empty cluster names and duplicate routing names
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Any error rejects the whole configuration; nothing is partially applied

use std::collections::HashSet;

use thiserror::Error;

use crate::config::schema::RouterConfig;
use crate::routing::{ParseError, Routing, RoutingTable};

/// A semantic problem in the configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("routing `{name}`: {source}")]
    InvalidRules {
        name: String,
        #[source]
        source: ParseError,
    },

    #[error("routing `{name}`: cluster must not be empty")]
    EmptyCluster { name: String },

    #[error("duplicate routing name `{name}`")]
    DuplicateName { name: String },
}

/// Build the routing table, collecting every problem found along the way.
pub fn validate_config(config: &RouterConfig) -> Result<RoutingTable, Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();
    let mut routings = Vec::with_capacity(config.routings.len());

    for entry in &config.routings {
        if !seen.insert(entry.name.as_str()) {
            errors.push(ValidationError::DuplicateName {
                name: entry.name.clone(),
            });
        }
        if entry.cluster.trim().is_empty() {
            errors.push(ValidationError::EmptyCluster {
                name: entry.name.clone(),
            });
        }
        match Routing::parse(&entry.rules, entry.cluster.as_str(), entry.path.as_str()) {
            Ok(routing) => routings.push(routing),
            Err(source) => errors.push(ValidationError::InvalidRules {
                name: entry.name.clone(),
                source,
            }),
        }
    }

    if errors.is_empty() {
        Ok(RoutingTable::new(routings))
    } else {
        Err(errors)
    }
}
