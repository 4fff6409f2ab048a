//! Canonical path, domain and app-info value types.
//!
//! # Data Flow
//! ```text
//! AppInfo (raw strings from config or code)
//!     → url_domain.rs (scheme + host[:port])
//!     → url_path.rs   (lowercase, leading '/', no trailing '/')
//!     → app_info.rs   (NormalisedAppInfo, validated once)
//!
//! Per request:
//!     request path → NormalisedUrlPath → gateway path + request path
//! ```
//!
//! # Design Decisions
//! - Validation happens at construction; values are trusted afterwards
//! - Comparison is plain string comparison on the canonical form

pub mod app_info;
pub mod url_domain;
pub mod url_path;

pub use app_info::{AppInfo, NormalisedAppInfo};
pub use url_domain::NormalisedUrlDomain;
pub use url_path::NormalisedUrlPath;

use thiserror::Error;

/// Errors raised when a path or domain cannot be put in canonical form.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NormaliseError {
    #[error("Please provide a valid URL path: {0}")]
    InvalidPath(String),

    #[error("Please provide a valid domain name: {0}")]
    InvalidDomain(String),
}

/// True for inputs such as `api.example.com/path` or `localhost:3000`.
pub(crate) fn looks_like_domain(input: &str) -> bool {
    if input.starts_with("localhost") {
        return true;
    }
    let host = input.split('/').next().unwrap_or_default();
    let host = host.split(':').next().unwrap_or_default();
    !host.is_empty() && host.contains('.') && !host.starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_looks_like_domain() {
        assert!(looks_like_domain("localhost"));
        assert!(looks_like_domain("localhost:3000/auth"));
        assert!(looks_like_domain("api.example.com"));
        assert!(looks_like_domain("127.0.0.1:8080"));
        assert!(!looks_like_domain("auth"));
        assert!(!looks_like_domain("/auth.json"));
        assert!(!looks_like_domain(".hidden"));
    }
}
