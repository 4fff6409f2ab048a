//! Error-handling chain.
//!
//! # Resolution Order
//! ```text
//! BadInput         → 400 {"message"}; if that cannot be built, general handler
//!                    with the original error
//! each recipe      → handled: stop | escalate(e2): general handler(e2), stop
//!                    | not ours: next recipe
//! nobody claimed   → general handler
//! ```
//!
//! # Design Decisions
//! - Exactly one responder per error
//! - A recipe that fails while handling an error ends the chain

use axum::response::Response;

use super::SuperTokens;
use crate::error::{SuperTokensError, SuperTokensResult};
use crate::http::response::send_non_200_response;
use crate::http::RequestHead;
use crate::observability::metrics;

impl SuperTokens {
    /// Turn an error from routing or a recipe API into a response.
    pub async fn error_handler(&self, err: SuperTokensError, head: &RequestHead) -> Response {
        metrics::record_error(err.kind());

        if let SuperTokensError::BadInput(message) = &err {
            tracing::warn!(path = %head.path(), error = %message, "Bad input");
            return self.bad_input_response(&err, message, head, send_non_200_response);
        }

        for recipe in self.recipe_modules() {
            match recipe.handle_error(&err, head).await {
                Ok(Some(response)) => {
                    tracing::debug!(recipe_id = recipe.recipe_id(), "Error handled by recipe");
                    return response;
                }
                Ok(None) => continue,
                Err(escalated) => {
                    tracing::warn!(
                        recipe_id = recipe.recipe_id(),
                        original = %err,
                        error = %escalated,
                        "Recipe failed while handling error"
                    );
                    return self.on_general_error(&escalated, head);
                }
            }
        }

        self.on_general_error(&err, head)
    }

    /// 400 for bad input. The general handler gets the original error when
    /// `build` fails, which `send_non_200_response` only does for non-error
    /// statuses.
    fn bad_input_response<B>(
        &self,
        err: &SuperTokensError,
        message: &str,
        head: &RequestHead,
        build: B,
    ) -> Response
    where
        B: FnOnce(&str, u16) -> SuperTokensResult<Response>,
    {
        match build(message, 400) {
            Ok(response) => response,
            Err(write_err) => {
                tracing::warn!(error = %write_err, "Could not build 400 response");
                self.on_general_error(err, head)
            }
        }
    }
}
