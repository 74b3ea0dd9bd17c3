//! Condition vocabulary and parse errors.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The part of a request a condition reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Header,
    Cookie,
    Query,
}

impl FromStr for SourceKind {
    type Err = ParseError;

    /// Case-sensitive: `Header` is not a source kind.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "header" => Ok(Self::Header),
            "cookie" => Ok(Self::Cookie),
            "query" => Ok(Self::Query),
            other => Err(ParseError::UnknownSource {
                kind: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Header => write!(f, "header"),
            Self::Cookie => write!(f, "cookie"),
            Self::Query => write!(f, "query"),
        }
    }
}

/// Comparison applied between the request value and the condition target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `==`
    Eq,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `in`: target is a substring of the request value.
    In,
    /// `~`: unanchored regex search.
    RegexMatch,
}

impl Operator {
    /// The token as written in a condition expression.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::In => "in",
            Self::RegexMatch => "~",
        }
    }
}

impl FromStr for Operator {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "==" => Ok(Self::Eq),
            "<" => Ok(Self::Lt),
            "<=" => Ok(Self::Le),
            ">" => Ok(Self::Gt),
            ">=" => Ok(Self::Ge),
            "in" => Ok(Self::In),
            "~" => Ok(Self::RegexMatch),
            other => Err(ParseError::UnknownOperator {
                op: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while building conditions and routings.
///
/// All of them happen at configuration load; matching itself cannot fail.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The selector token does not start with `$`.
    #[error("condition `{expr}` must start with `$`")]
    MissingPrefix { expr: String },

    /// No `_` between the source kind and the attribute name.
    #[error("condition `{expr}` has no `_` between source and attribute")]
    MissingSeparator { expr: String },

    /// `$header_` with nothing after the separator.
    #[error("condition `{expr}` has an empty attribute name")]
    EmptyAttribute { expr: String },

    #[error("unknown source `{kind}` (expected header, cookie or query)")]
    UnknownSource { kind: String },

    #[error("condition `{expr}` has no operator")]
    MissingOperator { expr: String },

    #[error("unsupported operator `{op}`")]
    UnknownOperator { op: String },

    /// The `~` target does not compile.
    #[error("invalid pattern `{pattern}`")]
    InvalidPattern {
        pattern: String,
        #[source]
        error: regex::Error,
    },

    /// Malformed rule-set text.
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("field `{field}` must be {expected}")]
    InvalidField {
        field: String,
        expected: &'static str,
    },

    /// A field name the rule-set format does not define.
    #[error("line {line}: unknown field `{field}`")]
    UnknownField { field: String, line: usize },

    /// A required field is absent.
    #[error("missing required field `{field}`")]
    MissingField { field: &'static str },

    #[error("field `{field}` is set more than once")]
    DuplicateField { field: String },

    /// A condition inside a rule set failed to parse.
    #[error("{field}[{index}]: {source}")]
    Rule {
        field: &'static str,
        index: usize,
        source: Box<ParseError>,
    },
}

/// Result type for parse operations.
pub type ParseResult<T> = Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_tokens() {
        for token in ["==", "<", "<=", ">", ">=", "in", "~"] {
            let op: Operator = token.parse().unwrap();
            assert_eq!(op.to_string(), token);
        }
        assert!("!=".parse::<Operator>().is_err());
        assert!("IN".parse::<Operator>().is_err());
        assert!("=".parse::<Operator>().is_err());
    }

    #[test]
    fn test_source_kind_is_case_sensitive() {
        assert_eq!("cookie".parse::<SourceKind>().unwrap(), SourceKind::Cookie);
        assert!(matches!(
            "Header".parse::<SourceKind>(),
            Err(ParseError::UnknownSource { kind }) if kind == "Header"
        ));
    }

    #[test]
    fn test_error_display() {
        let err = ParseError::Rule {
            field: "or",
            index: 1,
            source: Box::new(ParseError::UnknownOperator { op: "!=".into() }),
        };
        assert_eq!(err.to_string(), "or[1]: unsupported operator `!=`");

        let err = ParseError::Syntax {
            line: 3,
            message: "expected `=`".into(),
        };
        assert_eq!(err.to_string(), "line 3: expected `=`");

        let err = ParseError::UnknownField {
            field: "rules".into(),
            line: 2,
        };
        assert_eq!(err.to_string(), "line 2: unknown field `rules`");

        let err = ParseError::MissingField { field: "rule" };
        assert_eq!(err.to_string(), "missing required field `rule`");
    }
}
