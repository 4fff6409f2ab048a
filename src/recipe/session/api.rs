//! Endpoint handlers.
//!
//! Every endpoint goes through [`dispatch_api`]: no implementation means
//! pass-through, an error goes back to the dispatcher untouched, success is a
//! 200 with `{}` unless the implementation supplied a body.

use axum::response::Response;

use super::types::{ApiFn, ApiInterface, ApiOptions, ApiOutcome, UserContext};
use crate::error::SuperTokensResult;
use crate::http::response::send_200_response;

pub(crate) async fn dispatch_api(
    api: Option<&ApiFn>,
    options: ApiOptions,
) -> SuperTokensResult<Response> {
    let Some(api) = api else {
        let ApiOptions {
            req, other_handler, ..
        } = options;
        return Ok(other_handler.run(req).await);
    };

    let user_context = UserContext::from_api(&options);
    match api(options, user_context).await? {
        ApiOutcome::Ok(body) => send_200_response(body.as_ref()),
        ApiOutcome::Responded(response) => Ok(response),
    }
}

pub(crate) async fn handle_refresh_api(
    api_impl: &ApiInterface,
    options: ApiOptions,
) -> SuperTokensResult<Response> {
    dispatch_api(api_impl.refresh_post.as_ref(), options).await
}

pub(crate) async fn handle_signout_api(
    api_impl: &ApiInterface,
    options: ApiOptions,
) -> SuperTokensResult<Response> {
    dispatch_api(api_impl.signout_post.as_ref(), options).await
}
