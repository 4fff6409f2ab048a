//! CORS header aggregation.

use std::collections::BTreeSet;

use axum::http::{header::CONTENT_TYPE, HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

use super::SuperTokens;
use crate::error::ConfigError;
use crate::http::request::{HEADER_FDI, HEADER_RID};

impl SuperTokens {
    /// Protocol headers plus every recipe's headers, lowercased, sorted, deduplicated.
    pub fn all_cors_headers(&self) -> Vec<String> {
        let mut headers: BTreeSet<String> = [HEADER_RID, HEADER_FDI]
            .into_iter()
            .map(String::from)
            .collect();
        for recipe in self.recipe_modules() {
            headers.extend(
                recipe
                    .all_cors_headers()
                    .into_iter()
                    .map(|h| h.trim().to_lowercase()),
            );
        }
        headers.into_iter().collect()
    }

    /// CORS layer admitting the website domain with credentials.
    pub fn cors_layer(&self) -> Result<CorsLayer, ConfigError> {
        let origin = HeaderValue::from_str(self.app_info().website_domain.as_str())
            .map_err(|e| ConfigError::AppInfo(format!("website domain is not a valid origin: {}", e)))?;

        let mut allowed = vec![CONTENT_TYPE];
        for header in self.all_cors_headers() {
            let name = HeaderName::from_bytes(header.as_bytes()).map_err(|e| {
                ConfigError::AppInfo(format!("invalid CORS header {:?}: {}", header, e))
            })?;
            allowed.push(name);
        }

        Ok(CorsLayer::new()
            .allow_origin(AllowOrigin::exact(origin))
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::HEAD,
                Method::OPTIONS,
            ])
            .allow_headers(allowed)
            .allow_credentials(true))
    }
}
