//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Configuration load:
//!     rule-set text
//!     → rule_set.rs (parse block: desc, deadline, rule, or)
//!     → condition.rs (parse each `$source_attr op value`)
//!     → Routing (immutable)
//!
//! Incoming request (headers, cookies, query):
//!     → router.rs (walk candidate routings in order)
//!     → matcher.rs (AND gate || OR gate)
//!     → extract.rs (pull the value) → operator.rs (compare)
//!     → Return: matched Routing or None
//! ```
//!
//! # Design Decisions
//! - Routings compiled at load time, immutable at runtime
//! - All validation up front; matching cannot fail
//! - Deterministic: same input always yields the same decision

pub mod condition;
pub mod extract;
pub mod matcher;
pub mod operator;
pub mod router;
pub mod rule_set;
pub mod types;

pub use condition::Condition;
pub use extract::RequestAttributes;
pub use matcher::{Matcher, Routing};
pub use router::RoutingTable;
pub use rule_set::RuleSet;
pub use types::{Operator, ParseError, SourceKind};
