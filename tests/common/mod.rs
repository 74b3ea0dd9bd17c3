//! Shared request builders for integration tests.

use axum::body::Body;
use axum::http::Request;

/// A GET request for `uri` with no headers.
pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// A GET request carrying one header.
#[allow(dead_code)]
pub fn get_with_header(uri: &str, name: &str, value: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(name, value)
        .body(Body::empty())
        .unwrap()
}

/// A GET request carrying one cookie.
#[allow(dead_code)]
pub fn get_with_cookie(uri: &str, name: &str, value: &str) -> Request<Body> {
    get_with_header(uri, "cookie", &format!("{name}={value}"))
}

/// A rule-set block with the usual description and deadline.
#[allow(dead_code)]
pub fn rule_set(rule: &str, or: Option<&str>) -> String {
    let mut text = format!("desc = \"test\";\ndeadline = 100;\nrule = {rule};\n");
    if let Some(or) = or {
        text.push_str(&format!("or = {or};\n"));
    }
    text
}
