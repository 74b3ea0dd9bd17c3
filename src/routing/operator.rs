//! Operator evaluation.
//!
//! Structural checks happen when a condition is parsed, so evaluation only
//! ever answers true or false. Numeric operators on non-numeric input are a
//! non-match, not an error.

use std::cmp::Ordering;

use regex::Regex;

use crate::routing::types::Operator;

/// Compare a request value against a condition target.
///
/// `pattern` is the target precompiled for [`Operator::RegexMatch`]; it is
/// ignored by every other operator.
pub fn evaluate(operator: Operator, source: &str, target: &str, pattern: Option<&Regex>) -> bool {
    match operator {
        Operator::Eq => source == target,
        Operator::Lt => compare_numeric(source, target) == Some(Ordering::Less),
        Operator::Le => matches!(
            compare_numeric(source, target),
            Some(Ordering::Less | Ordering::Equal)
        ),
        Operator::Gt => compare_numeric(source, target) == Some(Ordering::Greater),
        Operator::Ge => matches!(
            compare_numeric(source, target),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        Operator::In => source.contains(target),
        Operator::RegexMatch => pattern.is_some_and(|p| p.is_match(source)),
    }
}

/// Integers compare exactly; otherwise fall back to finite decimals.
fn compare_numeric(a: &str, b: &str) -> Option<Ordering> {
    if let (Ok(a), Ok(b)) = (a.parse::<i64>(), b.parse::<i64>()) {
        return Some(a.cmp(&b));
    }
    let a = parse_finite(a)?;
    let b = parse_finite(b)?;
    a.partial_cmp(&b)
}

fn parse_finite(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}
