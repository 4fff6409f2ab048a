//! Canonical URL domain (`scheme://host[:port]`).

use std::fmt;
use std::net::IpAddr;

use url::Url;

use super::{looks_like_domain, NormaliseError};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalisedUrlDomain {
    value: String,
}

impl NormalisedUrlDomain {
    /// Normalise a domain.
    ///
    /// With `ignore_protocol`, the scheme is chosen from the host: localhost
    /// and IP addresses get `http`, everything else `https`.
    pub fn new(input: &str, ignore_protocol: bool) -> Result<Self, NormaliseError> {
        let trimmed = input.trim().to_lowercase();
        let invalid = || NormaliseError::InvalidDomain(input.to_string());

        let candidate = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            trimmed
        } else if trimmed.starts_with('/') || trimmed.contains("://") {
            return Err(invalid());
        } else if looks_like_domain(&trimmed) {
            format!("http://{}", trimmed)
        } else {
            return Err(invalid());
        };

        let url = Url::parse(&candidate).map_err(|_| invalid())?;
        let host = url.host_str().ok_or_else(invalid)?;
        let authority = match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };

        let scheme = if ignore_protocol {
            if is_local_host(host) {
                "http"
            } else {
                "https"
            }
        } else {
            url.scheme()
        };

        Ok(Self {
            value: format!("{}://{}", scheme, authority),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

fn is_local_host(host: &str) -> bool {
    host.starts_with("localhost")
        || host
            .trim_start_matches('[')
            .trim_end_matches(']')
            .parse::<IpAddr>()
            .is_ok()
}

impl fmt::Display for NormalisedUrlDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}
