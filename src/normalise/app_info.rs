//! Deployment description and its validated form.

use serde::{Deserialize, Serialize};

use super::{NormalisedUrlDomain, NormalisedUrlPath};
use crate::error::ConfigError;

const DEFAULT_API_BASE_PATH: &str = "/auth";
const DEFAULT_WEBSITE_BASE_PATH: &str = "/auth";

/// Raw app info as supplied by the integrator.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppInfo {
    /// Application name, used in telemetry and emails.
    pub app_name: String,

    /// Domain serving this API (e.g., "https://api.example.com").
    pub api_domain: String,

    /// Domain serving the frontend (e.g., "https://example.com").
    pub website_domain: String,

    /// Path prefix of the auth APIs (default: "/auth").
    pub api_base_path: Option<String>,

    /// Path prefix of the auth UI (default: "/auth").
    pub website_base_path: Option<String>,

    /// Prefix added by an API gateway in front of this server.
    pub api_gateway_path: Option<String>,
}

/// Validated app info. Immutable once built.
///
/// `api_base_path` already carries the gateway prefix, matching the full
/// paths the router builds from incoming requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalisedAppInfo {
    pub app_name: String,
    pub api_domain: NormalisedUrlDomain,
    pub website_domain: NormalisedUrlDomain,
    pub api_base_path: NormalisedUrlPath,
    pub website_base_path: NormalisedUrlPath,
    pub api_gateway_path: NormalisedUrlPath,
}

impl NormalisedAppInfo {
    /// Validate and canonicalise every field.
    pub fn new(input: &AppInfo) -> Result<Self, ConfigError> {
        if input.app_name.trim().is_empty() {
            return Err(ConfigError::AppInfo(
                "Please provide your appName inside the appInfo object when calling supertokens.init"
                    .to_string(),
            ));
        }
        if input.api_domain.trim().is_empty() {
            return Err(ConfigError::AppInfo(
                "Please provide your apiDomain inside the appInfo object when calling supertokens.init"
                    .to_string(),
            ));
        }
        if input.website_domain.trim().is_empty() {
            return Err(ConfigError::AppInfo(
                "Please provide your websiteDomain inside the appInfo object when calling supertokens.init"
                    .to_string(),
            ));
        }

        let api_gateway_path = match input.api_gateway_path.as_deref() {
            Some(path) => NormalisedUrlPath::new(path)?,
            None => NormalisedUrlPath::empty(),
        };

        Ok(Self {
            app_name: input.app_name.trim().to_string(),
            api_domain: NormalisedUrlDomain::new(&input.api_domain, false)?,
            website_domain: NormalisedUrlDomain::new(&input.website_domain, false)?,
            api_base_path: api_gateway_path.append_path(&NormalisedUrlPath::new(
                input.api_base_path.as_deref().unwrap_or(DEFAULT_API_BASE_PATH),
            )?),
            website_base_path: NormalisedUrlPath::new(
                input
                    .website_base_path
                    .as_deref()
                    .unwrap_or(DEFAULT_WEBSITE_BASE_PATH),
            )?,
            api_gateway_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> AppInfo {
        AppInfo {
            app_name: "Demo".into(),
            api_domain: "http://localhost:3001".into(),
            website_domain: "http://localhost:3000".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let info = NormalisedAppInfo::new(&input()).unwrap();
        assert_eq!(info.api_base_path.as_str(), "/auth");
        assert_eq!(info.website_base_path.as_str(), "/auth");
        assert!(info.api_gateway_path.is_root());
        assert_eq!(info.api_domain.as_str(), "http://localhost:3001");
    }

    #[test]
    fn test_custom_paths_are_normalised() {
        let mut raw = input();
        raw.api_base_path = Some("custom/".into());
        raw.api_gateway_path = Some("/Gateway/".into());
        let info = NormalisedAppInfo::new(&raw).unwrap();
        assert_eq!(info.api_gateway_path.as_str(), "/gateway");
        assert_eq!(info.api_base_path.as_str(), "/gateway/custom");
    }

    #[test]
    fn test_missing_fields() {
        let mut raw = input();
        raw.app_name = "  ".into();
        let err = NormalisedAppInfo::new(&raw).unwrap_err();
        assert!(err.to_string().contains("appName"));

        let mut raw = input();
        raw.website_domain = String::new();
        let err = NormalisedAppInfo::new(&raw).unwrap_err();
        assert!(err.to_string().contains("websiteDomain"));

        let mut raw = input();
        raw.api_domain = "/not-a-domain".into();
        assert!(matches!(
            NormalisedAppInfo::new(&raw),
            Err(ConfigError::Normalise(_))
        ));
    }
}
