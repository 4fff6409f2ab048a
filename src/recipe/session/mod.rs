//! Session recipe: refresh and sign-out endpoints plus rendering of session errors.
//!
//! # Endpoints
//! ```text
//! POST {api_base_path}/session/refresh  → refresh_post
//! POST {api_base_path}/signout          → signout_post
//! ```
//!
//! # Design Decisions
//! - Token validation and rotation happen in the core, reached via the querier
//! - Integrators swap or disable endpoints with `SessionConfig::override_apis`

pub mod api;
pub mod errors;
pub mod implementation;
pub mod types;

pub use errors::SessionError;
pub use types::{
    ApiFn, ApiInterface, ApiOptions, ApiOutcome, ApiOverride, SessionConfig, SessionSettings,
    UserContext,
};

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;

use crate::error::{ConfigError, SuperTokensError, SuperTokensResult};
use crate::http::response::send_non_200_response;
use crate::http::{Fallback, RequestHead};
use crate::normalise::{NormalisedAppInfo, NormalisedUrlPath};
use crate::querier::Querier;
use crate::recipe::{ApiId, RecipeListFunction, RecipeModule};

pub const RECIPE_ID: &str = "session";

/// Theft always answers 401, whatever the expiry status is configured to.
const TOKEN_THEFT_STATUS: u16 = 401;

pub const REFRESH_API_PATH: &str = "/session/refresh";
pub const SIGNOUT_API_PATH: &str = "/signout";

pub const REFRESH_API_ID: &str = "refresh";
pub const SIGNOUT_API_ID: &str = "signout";

pub const ACCESS_TOKEN_COOKIE: &str = "sAccessToken";
pub const REFRESH_TOKEN_COOKIE: &str = "sRefreshToken";

pub const ANTI_CSRF_HEADER: &str = "anti-csrf";
pub const ID_REFRESH_TOKEN_HEADER: &str = "id-refresh-token";
pub const SDK_NAME_HEADER: &str = "supertokens-sdk-name";
pub const SDK_VERSION_HEADER: &str = "supertokens-sdk-version";

pub struct SessionRecipe {
    app_info: NormalisedAppInfo,
    querier: Arc<dyn Querier>,
    settings: Arc<SessionSettings>,
    api_impl: ApiInterface,
    refresh_path: NormalisedUrlPath,
    signout_path: NormalisedUrlPath,
}

impl SessionRecipe {
    pub fn new(
        app_info: &NormalisedAppInfo,
        querier: Arc<dyn Querier>,
        config: SessionConfig,
    ) -> Result<Self, ConfigError> {
        let status = config.settings.session_expired_status_code;
        if !(400..600).contains(&status) {
            return Err(ConfigError::Recipe {
                recipe_id: RECIPE_ID.to_string(),
                message: format!("session_expired_status_code must be a 4xx/5xx status, got {}", status),
            });
        }

        let mut api_impl = implementation::default_api_interface();
        if let Some(override_apis) = &config.override_apis {
            api_impl = override_apis(api_impl);
        }

        let refresh_path = app_info
            .api_base_path
            .append_path(&NormalisedUrlPath::new(REFRESH_API_PATH)?);
        let signout_path = app_info
            .api_base_path
            .append_path(&NormalisedUrlPath::new(SIGNOUT_API_PATH)?);

        Ok(Self {
            app_info: app_info.clone(),
            querier,
            settings: Arc::new(config.settings),
            api_impl,
            refresh_path,
            signout_path,
        })
    }
}

/// Factory for the recipe list.
pub fn init(config: Option<SessionConfig>) -> RecipeListFunction {
    Box::new(move |app_info: &NormalisedAppInfo, querier: Arc<dyn Querier>| {
        let recipe = SessionRecipe::new(app_info, querier, config.unwrap_or_default())?;
        Ok(Arc::new(recipe) as Arc<dyn RecipeModule>)
    })
}

#[async_trait]
impl RecipeModule for SessionRecipe {
    fn recipe_id(&self) -> &str {
        RECIPE_ID
    }

    fn return_api_id_if_can_handle_request(
        &self,
        path: &NormalisedUrlPath,
        method: &Method,
    ) -> SuperTokensResult<Option<ApiId>> {
        if *method != Method::POST {
            return Ok(None);
        }
        if path == &self.refresh_path {
            Ok(Some(ApiId::new(REFRESH_API_ID)))
        } else if path == &self.signout_path {
            Ok(Some(ApiId::new(SIGNOUT_API_ID)))
        } else {
            Ok(None)
        }
    }

    async fn handle_api_request(
        &self,
        id: &ApiId,
        req: Request<Body>,
        fallback: Fallback,
        _path: &NormalisedUrlPath,
        _method: &Method,
    ) -> SuperTokensResult<Response> {
        let options = ApiOptions {
            req,
            app_info: self.app_info.clone(),
            querier: self.querier.clone(),
            settings: self.settings.clone(),
            recipe_id: RECIPE_ID.to_string(),
            other_handler: fallback,
        };
        match id.as_str() {
            REFRESH_API_ID => api::handle_refresh_api(&self.api_impl, options).await,
            SIGNOUT_API_ID => api::handle_signout_api(&self.api_impl, options).await,
            other => Err(SuperTokensError::General(format!(
                "session recipe has no API with id {}",
                other
            ))),
        }
    }

    fn all_cors_headers(&self) -> Vec<String> {
        vec![
            ANTI_CSRF_HEADER.to_string(),
            SDK_NAME_HEADER.to_string(),
            SDK_VERSION_HEADER.to_string(),
        ]
    }

    async fn handle_error(
        &self,
        err: &SuperTokensError,
        head: &RequestHead,
    ) -> SuperTokensResult<Option<Response>> {
        let Some(session_err) = err.downcast_recipe::<SessionError>(RECIPE_ID) else {
            return Ok(None);
        };
        let status = self.settings.session_expired_status_code;

        let response = match session_err {
            SessionError::Unauthorised { message } => {
                tracing::debug!(path = %head.path(), reason = %message, "Session unauthorised");
                send_non_200_response("unauthorised", status)?
            }
            SessionError::TryRefreshToken { message } => {
                tracing::debug!(path = %head.path(), reason = %message, "Session needs refresh");
                send_non_200_response("try refresh token", status)?
            }
            SessionError::TokenTheftDetected {
                session_handle,
                user_id,
            } => {
                tracing::warn!(
                    session_handle = %session_handle,
                    user_id = %user_id,
                    "Token theft detected, revoking session"
                );
                implementation::revoke_sessions(
                    self.querier.as_ref(),
                    std::slice::from_ref(session_handle),
                )
                .await?;
                send_non_200_response("token theft detected", TOKEN_THEFT_STATUS)?
            }
        };
        Ok(Some(response))
    }
}
