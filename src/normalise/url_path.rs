//! Canonical URL path.

use std::fmt;

use url::Url;

use super::{looks_like_domain, NormaliseError};

/// A path in canonical form: lowercase, leading `/`, no trailing `/`.
///
/// The root path is the empty string, so `"" + "/auth"` concatenates cleanly
/// when a gateway prefix is absent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NormalisedUrlPath {
    value: String,
}

impl NormalisedUrlPath {
    /// Normalise a path, or a full URL from which only the path is kept.
    pub fn new(input: &str) -> Result<Self, NormaliseError> {
        let trimmed = input.trim().to_lowercase();

        let url = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Url::parse(&trimmed)
        } else if !trimmed.starts_with('/') && looks_like_domain(&trimmed) {
            Url::parse(&format!("http://{}", trimmed))
        } else if trimmed.starts_with('/') {
            Url::parse(&format!("http://example.com{}", trimmed))
        } else {
            Url::parse(&format!("http://example.com/{}", trimmed))
        }
        .map_err(|_| NormaliseError::InvalidPath(input.to_string()))?;

        let value = url.path().trim_end_matches('/').to_string();
        Ok(Self { value })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Concatenate `other` onto this path.
    pub fn append_path(&self, other: &NormalisedUrlPath) -> NormalisedUrlPath {
        Self {
            value: format!("{}{}", self.value, other.value),
        }
    }

    /// Plain string-prefix test on the canonical forms.
    pub fn starts_with(&self, other: &NormalisedUrlPath) -> bool {
        self.value.starts_with(&other.value)
    }

    pub fn is_root(&self) -> bool {
        self.value.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for NormalisedUrlPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}
