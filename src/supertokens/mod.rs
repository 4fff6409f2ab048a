//! The dispatcher: app info, registered recipes and the general error handler.
//!
//! # Data Flow
//! ```text
//! TypeInput
//!     → NormalisedAppInfo::new   (config error on bad input)
//!     → querier                  (HttpQuerier | NoCoreQuerier | injected)
//!     → recipe factories         (in order; at least one required)
//!     → SuperTokens (immutable, shared via Arc)
//!
//! Per request:
//!     routing::router  → recipe API or fallback
//!     error_handler.rs → 400 | recipe handle_error | on_general_error
//! ```
//!
//! # Design Decisions
//! - Nothing is mutated after construction, so requests share it lock-free
//! - Explicit instances; the process-wide one lives in instance.rs

pub mod cors;
pub mod error_handler;
pub mod instance;

use std::fmt;
use std::sync::Arc;

use axum::response::Response;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, SuperTokensError, SuperTokensResult};
use crate::http::response::default_on_general_error;
use crate::http::RequestHead;
use crate::normalise::{AppInfo, NormalisedAppInfo};
use crate::querier::{HttpQuerier, NoCoreQuerier, Querier};
use crate::recipe::{RecipeListFunction, RecipeModule};
use crate::users::{self, TimeJoinedOrder, UserPaginationResult};

/// Terminal error handler, called with the error the chain settled on.
pub type GeneralErrorHandler =
    Arc<dyn Fn(&SuperTokensError, &RequestHead) -> Response + Send + Sync>;

/// Where the core service lives.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ConnectionInfo {
    /// One or more core URLs separated by `;`.
    pub connection_uri: String,

    /// Sent as the `api-key` header when set.
    pub api_key: Option<String>,
}

/// Everything needed to build a [`SuperTokens`] instance.
#[derive(Default)]
pub struct TypeInput {
    pub app_info: AppInfo,

    /// Core connection. Without it every querier call fails.
    pub supertokens: Option<ConnectionInfo>,

    /// Recipe factories, in precedence order.
    pub recipe_list: Vec<RecipeListFunction>,

    /// Replaces the default "message with a 500" handler.
    pub on_general_error: Option<GeneralErrorHandler>,

    /// Replaces the querier built from `supertokens`.
    pub querier: Option<Arc<dyn Querier>>,
}

pub struct SuperTokens {
    app_info: NormalisedAppInfo,
    recipe_modules: Vec<Arc<dyn RecipeModule>>,
    on_general_error: GeneralErrorHandler,
    querier: Arc<dyn Querier>,
}

impl SuperTokens {
    /// Validate the configuration and build every recipe.
    pub fn new(config: TypeInput) -> Result<Self, ConfigError> {
        let app_info = NormalisedAppInfo::new(&config.app_info)?;

        let querier: Arc<dyn Querier> = match (config.querier, &config.supertokens) {
            (Some(querier), _) => querier,
            (None, Some(conn)) => Arc::new(HttpQuerier::from_connection_uri(
                &conn.connection_uri,
                conn.api_key.clone(),
            )?),
            (None, None) => Arc::new(NoCoreQuerier),
        };

        if config.recipe_list.is_empty() {
            return Err(ConfigError::NoRecipes);
        }

        let mut recipe_modules: Vec<Arc<dyn RecipeModule>> =
            Vec::with_capacity(config.recipe_list.len());
        for build in config.recipe_list {
            let recipe = build(&app_info, querier.clone())?;
            if recipe_modules
                .iter()
                .any(|r| r.recipe_id() == recipe.recipe_id())
            {
                tracing::warn!(
                    recipe_id = recipe.recipe_id(),
                    "Duplicate recipe id registered; rid routing will only reach the first"
                );
            }
            recipe_modules.push(recipe);
        }

        let on_general_error = config
            .on_general_error
            .unwrap_or_else(|| Arc::new(default_on_general_error) as GeneralErrorHandler);

        tracing::info!(
            app_name = %app_info.app_name,
            api_base_path = %app_info.api_base_path,
            recipes = ?recipe_modules.iter().map(|r| r.recipe_id().to_string()).collect::<Vec<_>>(),
            "SuperTokens initialised"
        );

        Ok(Self {
            app_info,
            recipe_modules,
            on_general_error,
            querier,
        })
    }

    pub fn app_info(&self) -> &NormalisedAppInfo {
        &self.app_info
    }

    pub fn recipe_modules(&self) -> &[Arc<dyn RecipeModule>] {
        &self.recipe_modules
    }

    pub fn querier(&self) -> &Arc<dyn Querier> {
        &self.querier
    }

    pub(crate) fn on_general_error(&self, err: &SuperTokensError, head: &RequestHead) -> Response {
        (self.on_general_error)(err, head)
    }

    pub async fn get_users_oldest_first(
        &self,
        limit: Option<u32>,
        pagination_token: Option<&str>,
        include_recipe_ids: Option<&[String]>,
    ) -> SuperTokensResult<UserPaginationResult> {
        users::get_users(
            self.querier.as_ref(),
            TimeJoinedOrder::Asc,
            limit,
            pagination_token,
            include_recipe_ids,
        )
        .await
    }

    pub async fn get_users_newest_first(
        &self,
        limit: Option<u32>,
        pagination_token: Option<&str>,
        include_recipe_ids: Option<&[String]>,
    ) -> SuperTokensResult<UserPaginationResult> {
        users::get_users(
            self.querier.as_ref(),
            TimeJoinedOrder::Desc,
            limit,
            pagination_token,
            include_recipe_ids,
        )
        .await
    }

    pub async fn get_user_count(
        &self,
        include_recipe_ids: Option<&[String]>,
    ) -> SuperTokensResult<u64> {
        users::get_user_count(self.querier.as_ref(), include_recipe_ids).await
    }
}

impl fmt::Debug for SuperTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuperTokens")
            .field("app_info", &self.app_info)
            .field(
                "recipe_modules",
                &self
                    .recipe_modules
                    .iter()
                    .map(|r| r.recipe_id())
                    .collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}
