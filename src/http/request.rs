//! Request-side helpers.
//!
//! # Responsibilities
//! - Capture a body-less [`RequestHead`] before the request is consumed
//! - Read the protocol headers (`rid`, `fdi-version`)
//! - Read cookies for recipes that need them
//!
//! # Design Decisions
//! - Header lookups are case-insensitive (HeaderMap semantics)
//! - An empty `rid` header counts as absent

use axum::body::Body;
use axum::http::{header::COOKIE, HeaderMap, Method, Request, Uri};

/// Header naming the recipe that should own a request.
pub const HEADER_RID: &str = "rid";

/// Header carrying the frontend driver interface version.
pub const HEADER_FDI: &str = "fdi-version";

/// Cloneable view of a request without its body.
#[derive(Debug, Clone)]
pub struct RequestHead {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
}

impl RequestHead {
    pub fn from_request(req: &Request<Body>) -> Self {
        Self {
            method: req.method().clone(),
            uri: req.uri().clone(),
            headers: req.headers().clone(),
        }
    }

    pub fn path(&self) -> &str {
        self.uri.path()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn rid(&self) -> Option<&str> {
        get_rid_from_headers(&self.headers)
    }

    pub fn cookie(&self, name: &str) -> Option<String> {
        get_cookie(&self.headers, name)
    }
}

pub fn get_rid_from_headers(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(HEADER_RID)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Find a cookie value across every `Cookie` header.
pub fn get_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    for value in headers.get_all(COOKIE) {
        let Ok(value) = value.to_str() else {
            continue;
        };
        for pair in value.split(';') {
            let Some((key, val)) = pair.trim().split_once('=') else {
                continue;
            };
            if key.trim() == name {
                return Some(val.trim().to_string());
            }
        }
    }
    None
}
