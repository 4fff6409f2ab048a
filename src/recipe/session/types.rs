//! Session recipe configuration and API types.

use std::fmt;
use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::SuperTokensResult;
use crate::http::{Fallback, RequestHead};
use crate::normalise::NormalisedAppInfo;
use crate::querier::Querier;

/// What an API implementation produced.
pub enum ApiOutcome {
    /// Success; answered with 200 and this body, or `{}`.
    Ok(Option<Value>),

    /// The implementation built its own response (e.g. by passing through).
    Responded(Response),
}

impl fmt::Debug for ApiOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiOutcome::Ok(body) => f.debug_tuple("Ok").field(body).finish(),
            ApiOutcome::Responded(r) => f.debug_tuple("Responded").field(&r.status()).finish(),
        }
    }
}

/// One API implementation.
pub type ApiFn =
    Arc<dyn Fn(ApiOptions, UserContext) -> BoxFuture<'static, SuperTokensResult<ApiOutcome>> + Send + Sync>;

/// The recipe's API implementations. `None` turns an API into a pass-through.
#[derive(Clone, Default)]
pub struct ApiInterface {
    pub refresh_post: Option<ApiFn>,
    pub signout_post: Option<ApiFn>,
}

impl fmt::Debug for ApiInterface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiInterface")
            .field("refresh_post", &self.refresh_post.is_some())
            .field("signout_post", &self.signout_post.is_some())
            .finish()
    }
}

/// Rewrites the default API implementations.
pub type ApiOverride = Arc<dyn Fn(ApiInterface) -> ApiInterface + Send + Sync>;

/// Settings that can come from a config file.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct SessionSettings {
    /// Status used for unauthorised / try-refresh responses.
    pub session_expired_status_code: u16,

    /// Send and check anti-CSRF tokens.
    pub enable_anti_csrf: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            session_expired_status_code: 401,
            enable_anti_csrf: false,
        }
    }
}

#[derive(Clone, Default)]
pub struct SessionConfig {
    pub settings: SessionSettings,
    pub override_apis: Option<ApiOverride>,
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("settings", &self.settings)
            .field("override_apis", &self.override_apis.is_some())
            .finish()
    }
}

/// Everything an API implementation may use.
pub struct ApiOptions {
    pub req: Request<Body>,
    pub app_info: NormalisedAppInfo,
    pub querier: Arc<dyn Querier>,
    pub settings: Arc<SessionSettings>,
    pub recipe_id: String,

    /// Pass-through to the downstream handler.
    pub other_handler: Fallback,
}

/// Per-request value handed to API implementations.
#[derive(Debug, Clone)]
pub struct UserContext {
    pub request_id: Uuid,
    pub request: RequestHead,

    /// Free-form data an override may attach.
    pub values: Map<String, Value>,
}

impl UserContext {
    pub fn from_api(options: &ApiOptions) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            request: RequestHead::from_request(&options.req),
            values: Map::new(),
        }
    }
}
