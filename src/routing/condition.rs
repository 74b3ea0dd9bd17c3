//! Condition expressions.
//!
//! # Grammar
//! ```text
//! $<source>_<attribute> <operator> <value...>
//! ```
//! - `source` is `header`, `cookie` or `query` (case-sensitive)
//! - `attribute` runs up to the first whitespace and may contain `_` or operator characters
//! - `operator` is one of `==`, `<`, `<=`, `>`, `>=`, `in`, `~`
//! - `value` is the rest of the expression, trimmed; it may be empty or contain whitespace
//!
//! # Design Decisions
//! - Every token is validated here, once, so matching never re-parses
//! - `~` patterns are compiled at parse time and owned by the condition

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use regex::Regex;

use crate::routing::extract::{self, RequestAttributes};
use crate::routing::operator;
use crate::routing::types::{Operator, ParseError, ParseResult, SourceKind};

/// A single parsed predicate over one request attribute.
#[derive(Debug)]
pub struct Condition {
    source: SourceKind,
    attribute: String,
    operator: Operator,
    target: String,
    pattern: Option<Regex>,
}

impl Condition {
    /// Parse a condition expression such as `$query_uid in 100`.
    pub fn parse(expr: &str) -> ParseResult<Self> {
        let expr = expr.trim();
        let (selector, tail) = split_token(expr);
        let (op_token, target) = split_token(tail);

        let selector = selector
            .strip_prefix('$')
            .ok_or_else(|| ParseError::MissingPrefix {
                expr: expr.to_string(),
            })?;
        let (source, attribute) = selector
            .split_once('_')
            .ok_or_else(|| ParseError::MissingSeparator {
                expr: expr.to_string(),
            })?;
        let source: SourceKind = source.parse()?;
        if attribute.is_empty() {
            return Err(ParseError::EmptyAttribute {
                expr: expr.to_string(),
            });
        }

        if op_token.is_empty() {
            return Err(ParseError::MissingOperator {
                expr: expr.to_string(),
            });
        }
        let operator: Operator = op_token.parse()?;

        let pattern = match operator {
            Operator::RegexMatch => Some(Regex::new(target).map_err(|error| {
                ParseError::InvalidPattern {
                    pattern: target.to_string(),
                    error,
                }
            })?),
            _ => None,
        };

        Ok(Self {
            source,
            attribute: attribute.to_string(),
            operator,
            target: target.to_string(),
            pattern,
        })
    }

    pub fn source(&self) -> SourceKind {
        self.source
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Compiled pattern; present only for `~`.
    pub fn pattern(&self) -> Option<&Regex> {
        self.pattern.as_ref()
    }

    /// The request value this condition compares against.
    pub fn extract<'r, R>(&self, req: &'r R) -> Cow<'r, str>
    where
        R: RequestAttributes + ?Sized,
    {
        extract::extract(self.source, &self.attribute, req)
    }

    /// Evaluate the operator against an already extracted value.
    pub fn evaluate(&self, value: &str) -> bool {
        operator::evaluate(self.operator, value, &self.target, self.pattern.as_ref())
    }
}

impl FromStr for Condition {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "${}_{} {} {}",
            self.source, self.attribute, self.operator, self.target
        )
    }
}

/// Split off the leading token; the remainder has its leading whitespace removed.
fn split_token(s: &str) -> (&str, &str) {
    match s.find(char::is_whitespace) {
        Some(at) => (&s[..at], s[at..].trim_start()),
        None => (s, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fields() {
        let c = Condition::parse("$header_x-user-group == beta").unwrap();
        assert_eq!(c.source(), SourceKind::Header);
        assert_eq!(c.attribute(), "x-user-group");
        assert_eq!(c.operator(), Operator::Eq);
        assert_eq!(c.target(), "beta");
        assert!(c.pattern().is_none());
    }

    #[test]
    fn test_value_keeps_inner_text() {
        let c = Condition::parse("$header_abc_!= == abc== asd ").unwrap();
        assert_eq!(c.attribute(), "abc_!=");
        assert_eq!(c.operator(), Operator::Eq);
        assert_eq!(c.target(), "abc== asd");

        let c = Condition::parse("  $cookie_name\t in \t a  b  ").unwrap();
        assert_eq!(c.source(), SourceKind::Cookie);
        assert_eq!(c.operator(), Operator::In);
        assert_eq!(c.target(), "a  b");
    }

    #[test]
    fn test_empty_value_is_allowed() {
        let c = Condition::parse("$query_abc ==").unwrap();
        assert_eq!(c.target(), "");
        assert!(c.evaluate(""));
        assert!(!c.evaluate("x"));
    }

    #[test]
    fn test_regex_is_compiled_once() {
        let c = Condition::parse("$query_abc ~ ^1100").unwrap();
        assert_eq!(c.operator(), Operator::RegexMatch);
        assert_eq!(c.pattern().map(Regex::as_str), Some("^1100"));
        assert!(c.evaluate("11001a"));
        assert!(!c.evaluate("21100"));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            Condition::parse("$header_abc != abc"),
            Err(ParseError::UnknownOperator { op }) if op == "!="
        ));
        assert!(matches!(
            Condition::parse("header_abc == abc"),
            Err(ParseError::MissingPrefix { .. })
        ));
        assert!(matches!(
            Condition::parse("$headerabc == abc"),
            Err(ParseError::MissingSeparator { .. })
        ));
        assert!(matches!(
            Condition::parse("$body_abc == abc"),
            Err(ParseError::UnknownSource { kind }) if kind == "body"
        ));
        assert!(matches!(
            Condition::parse("$header_ == abc"),
            Err(ParseError::EmptyAttribute { .. })
        ));
        assert!(matches!(
            Condition::parse("$query_abc"),
            Err(ParseError::MissingOperator { .. })
        ));
        assert!(matches!(
            Condition::parse("$query_abc==10"),
            Err(ParseError::MissingOperator { .. })
        ));
        assert!(matches!(
            Condition::parse("$query_abc ~ (unclosed"),
            Err(ParseError::InvalidPattern { pattern, .. }) if pattern == "(unclosed"
        ));
        assert!(matches!(Condition::parse(""), Err(ParseError::MissingPrefix { .. })));
    }

    #[test]
    fn test_display_round_trips_expression() {
        let c: Condition = "$query_uid   >=   10".parse().unwrap();
        assert_eq!(c.to_string(), "$query_uid >= 10");
    }
}
