//! Request dispatch.
//!
//! # Responsibilities
//! - Decide whether a request belongs to the auth surface at all
//! - Hand owned requests to the recipe API chosen by the matcher
//! - Send every routing or API error into the error chain
//!
//! # Design Decisions
//! - The request head is captured before the body moves into a recipe, so
//!   error handlers can still see method, path and headers
//! - The fallback is one-shot; whoever does not use it drops it

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;

use super::matcher::{resolve, Resolution};
use crate::error::SuperTokensError;
use crate::http::{Fallback, RequestHead};
use crate::normalise::NormalisedUrlPath;
use crate::observability::metrics::{self, OUTCOME_ERROR, OUTCOME_HANDLED, OUTCOME_PASSTHROUGH};
use crate::supertokens::SuperTokens;

impl SuperTokens {
    /// Serve `req` if it is an auth API request, otherwise pass it to `fallback`.
    pub async fn middleware(&self, req: Request<Body>, fallback: Fallback) -> Response {
        let head = RequestHead::from_request(&req);

        let path = match NormalisedUrlPath::new(head.path()) {
            Ok(path) => path,
            Err(e) => {
                metrics::record_dispatch("", OUTCOME_ERROR);
                let err = SuperTokensError::BadInput(format!("Invalid request path: {}", e));
                return self.error_handler(err, &head).await;
            }
        };

        let app_info = self.app_info();
        let full_path = app_info.api_gateway_path.append_path(&path);
        if !full_path.starts_with(&app_info.api_base_path) {
            metrics::record_dispatch("", OUTCOME_PASSTHROUGH);
            return fallback.run(req).await;
        }

        let rid = head.rid();
        let (recipe, api_id) = match resolve(self.recipe_modules(), rid, &full_path, &head.method) {
            Ok(Resolution::Claimed { recipe, api_id }) => (recipe, api_id),
            Ok(Resolution::Unclaimed(reason)) => {
                tracing::debug!(
                    path = %full_path,
                    rid = ?rid,
                    reason = reason.as_str(),
                    "No recipe claimed request"
                );
                metrics::record_dispatch("", OUTCOME_PASSTHROUGH);
                return fallback.run(req).await;
            }
            Err(err) => {
                metrics::record_dispatch("", OUTCOME_ERROR);
                return self.error_handler(err, &head).await;
            }
        };

        tracing::debug!(
            recipe_id = recipe.recipe_id(),
            api_id = %api_id,
            method = %head.method,
            path = %full_path,
            "Dispatching to recipe API"
        );

        match recipe
            .handle_api_request(&api_id, req, fallback, &full_path, &head.method)
            .await
        {
            Ok(response) => {
                metrics::record_dispatch(recipe.recipe_id(), OUTCOME_HANDLED);
                response
            }
            Err(err) => {
                metrics::record_dispatch(recipe.recipe_id(), OUTCOME_ERROR);
                self.error_handler(err, &head).await
            }
        }
    }
}
