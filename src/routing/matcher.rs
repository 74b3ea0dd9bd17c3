//! Routing match logic.
//!
//! # Responsibilities
//! - Evaluate single conditions against a request
//! - Combine a routing's AND list and OR list into one decision
//!
//! # Design Decisions
//! - Empty AND list = always passes; empty OR list = never passes
//! - Final decision is `and_gate || or_gate`, so OR rules act as overrides
//! - Both gates short-circuit
//! - Deadline and path pattern are carried but never consulted here

use crate::routing::condition::Condition;
use crate::routing::extract::RequestAttributes;
use crate::routing::rule_set::RuleSet;
use crate::routing::types::ParseResult;

/// Trait for matching requests against conditions.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the request matches.
    fn matches<R: RequestAttributes + ?Sized>(&self, req: &R) -> bool;
}

impl Matcher for Condition {
    fn matches<R: RequestAttributes + ?Sized>(&self, req: &R) -> bool {
        self.evaluate(&self.extract(req))
    }
}

/// An immutable routing descriptor: where to send traffic, and when.
#[derive(Debug)]
pub struct Routing {
    description: String,
    deadline: i64,
    cluster: String,
    path_pattern: String,
    and_conditions: Vec<Condition>,
    or_conditions: Vec<Condition>,
}

impl Routing {
    /// Parse a rule-set block into a routing for `cluster`.
    ///
    /// `path_pattern` is stored for the path router and not interpreted.
    pub fn parse(
        text: &str,
        cluster: impl Into<String>,
        path_pattern: impl Into<String>,
    ) -> ParseResult<Self> {
        let routing = Self::new(RuleSet::parse(text)?, cluster, path_pattern);
        tracing::debug!(
            cluster = %routing.cluster,
            path = %routing.path_pattern,
            description = %routing.description,
            and_conditions = routing.and_conditions.len(),
            or_conditions = routing.or_conditions.len(),
            "Routing parsed"
        );
        Ok(routing)
    }

    /// Build a routing from an already parsed rule set.
    pub fn new(
        rules: RuleSet,
        cluster: impl Into<String>,
        path_pattern: impl Into<String>,
    ) -> Self {
        Self {
            description: rules.description,
            deadline: rules.deadline,
            cluster: cluster.into(),
            path_pattern: path_pattern.into(),
            and_conditions: rules.and_conditions,
            or_conditions: rules.or_conditions,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Stored expiry metadata; matching does not enforce it.
    pub fn deadline(&self) -> i64 {
        self.deadline
    }

    pub fn cluster(&self) -> &str {
        &self.cluster
    }

    pub fn path_pattern(&self) -> &str {
        &self.path_pattern
    }

    pub fn and_conditions(&self) -> &[Condition] {
        &self.and_conditions
    }

    pub fn or_conditions(&self) -> &[Condition] {
        &self.or_conditions
    }
}

impl Matcher for Routing {
    fn matches<R: RequestAttributes + ?Sized>(&self, req: &R) -> bool {
        // All AND conditions must pass; vacuously true when empty.
        let and_gate = self.and_conditions.iter().all(|c| c.matches(req));
        // Any OR condition passes; false when empty.
        and_gate || self.or_conditions.iter().any(|c| c.matches(req))
    }
}
