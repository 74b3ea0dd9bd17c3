//! Request value extraction.
//!
//! # Responsibilities
//! - Look up a header, cookie or query parameter by name
//! - Return the empty string when the value is absent
//!
//! # Design Decisions
//! - Read-only access through [`RequestAttributes`], so any request type can be matched
//! - Borrow from the request wherever possible; only percent-decoded query values allocate
//! - Never fails: absence participates in operator evaluation like any other value

use std::borrow::Cow;

use axum::http::{header::COOKIE, request::Parts, HeaderMap, Request, Uri};
use url::form_urlencoded;

use crate::routing::types::SourceKind;

/// Read accessors a request must expose to be matched.
pub trait RequestAttributes {
    /// First value of the named header.
    fn header(&self, name: &str) -> Option<&str>;

    /// Value of the first cookie with this name.
    fn cookie(&self, name: &str) -> Option<&str>;

    /// First value bound to `name` in the decoded query string.
    fn query_param(&self, name: &str) -> Option<Cow<'_, str>>;
}

impl<B> RequestAttributes for Request<B> {
    fn header(&self, name: &str) -> Option<&str> {
        header_value(self.headers(), name)
    }

    fn cookie(&self, name: &str) -> Option<&str> {
        cookie_value(self.headers(), name)
    }

    fn query_param(&self, name: &str) -> Option<Cow<'_, str>> {
        query_value(self.uri(), name)
    }
}

impl RequestAttributes for Parts {
    fn header(&self, name: &str) -> Option<&str> {
        header_value(&self.headers, name)
    }

    fn cookie(&self, name: &str) -> Option<&str> {
        cookie_value(&self.headers, name)
    }

    fn query_param(&self, name: &str) -> Option<Cow<'_, str>> {
        query_value(&self.uri, name)
    }
}

/// Pull the value a condition compares against out of the request.
pub fn extract<'r, R>(source: SourceKind, name: &str, req: &'r R) -> Cow<'r, str>
where
    R: RequestAttributes + ?Sized,
{
    let value = match source {
        SourceKind::Header => req.header(name).map(Cow::Borrowed),
        SourceKind::Cookie => req.cookie(name).map(Cow::Borrowed),
        SourceKind::Query => req.query_param(name),
    };
    value.unwrap_or(Cow::Borrowed(""))
}

// HeaderMap lookups by &str are case-insensitive.
fn header_value<'h>(headers: &'h HeaderMap, name: &str) -> Option<&'h str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn cookie_value<'h>(headers: &'h HeaderMap, name: &str) -> Option<&'h str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|line| line.split(';'))
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| unquote(value.trim()))
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

fn query_value<'u>(uri: &'u Uri, name: &str) -> Option<Cow<'u, str>> {
    let query = uri.query()?;
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value)
}
