//! Recipe capability and the recipes shipped with the crate.
//!
//! # Data Flow
//! ```text
//! init(TypeInput { recipe_list, .. })
//!     → each RecipeListFunction(app_info, querier)
//!     → Arc<dyn RecipeModule>, in registration order
//!
//! Per request (owned by the dispatcher):
//!     return_api_id_if_can_handle_request → Some(ApiId) | None
//!     handle_api_request                  → Response | error chain
//!     handle_error                        → handled | not handled | escalate
//! ```
//!
//! # Design Decisions
//! - Recipes are standalone trait objects composed in a list, never layered
//! - Recipe ids are expected to be unique; duplicates are not rejected
//! - API ids mean nothing outside the recipe that issued them

pub mod session;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;

use crate::error::{ConfigError, SuperTokensError, SuperTokensResult};
use crate::http::{Fallback, RequestHead};
use crate::normalise::{NormalisedAppInfo, NormalisedUrlPath};
use crate::querier::Querier;

/// Identifies one endpoint within a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ApiId(String);

impl ApiId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApiId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The capability set every recipe presents to the dispatcher.
#[async_trait]
pub trait RecipeModule: Send + Sync {
    fn recipe_id(&self) -> &str;

    /// Which of this recipe's APIs, if any, serves `method path`.
    ///
    /// `path` already includes the gateway prefix.
    fn return_api_id_if_can_handle_request(
        &self,
        path: &NormalisedUrlPath,
        method: &Method,
    ) -> SuperTokensResult<Option<ApiId>>;

    async fn handle_api_request(
        &self,
        id: &ApiId,
        req: Request<Body>,
        fallback: Fallback,
        path: &NormalisedUrlPath,
        method: &Method,
    ) -> SuperTokensResult<Response>;

    /// Headers the frontend sends to this recipe's APIs.
    fn all_cors_headers(&self) -> Vec<String>;

    /// Render an error if this recipe owns it.
    ///
    /// `Ok(Some(_))` handled, `Ok(None)` not ours, `Err(_)` escalate to the
    /// general handler.
    async fn handle_error(
        &self,
        _err: &SuperTokensError,
        _head: &RequestHead,
    ) -> SuperTokensResult<Option<Response>> {
        Ok(None)
    }
}

/// Builds one recipe from the shared app info and querier.
pub type RecipeListFunction = Box<
    dyn FnOnce(&NormalisedAppInfo, Arc<dyn Querier>) -> Result<Arc<dyn RecipeModule>, ConfigError>
        + Send,
>;
