//! Default API implementations. The core does the token work; these only
//! shuttle cookies and map core statuses onto session errors. A refresh hands
//! the rotated tokens back to the client.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::http::header::{ACCESS_CONTROL_EXPOSE_HEADERS, SET_COOKIE};
use axum::http::HeaderValue;
use axum::response::Response;
use futures_util::FutureExt;
use serde_json::{json, Value};

use super::errors::SessionError;
use super::types::{ApiFn, ApiInterface, ApiOptions, ApiOutcome, UserContext};
use super::{
    ACCESS_TOKEN_COOKIE, ANTI_CSRF_HEADER, ID_REFRESH_TOKEN_HEADER, REFRESH_API_PATH,
    REFRESH_TOKEN_COOKIE,
};
use crate::error::{SuperTokensError, SuperTokensResult};
use crate::http::request::get_cookie;
use crate::http::response::{send_200_response, token_cookie};
use crate::normalise::NormalisedUrlPath;

pub(crate) const CORE_REFRESH_PATH: &str = "/recipe/session/refresh";
pub(crate) const CORE_VERIFY_PATH: &str = "/recipe/session/verify";
pub(crate) const CORE_REMOVE_PATH: &str = "/recipe/session/remove";

pub fn default_api_interface() -> ApiInterface {
    let refresh: ApiFn =
        Arc::new(|options: ApiOptions, ctx: UserContext| refresh_post(options, ctx).boxed());
    let signout: ApiFn =
        Arc::new(|options: ApiOptions, ctx: UserContext| signout_post(options, ctx).boxed());
    ApiInterface {
        refresh_post: Some(refresh),
        signout_post: Some(signout),
    }
}

pub(crate) fn core_path(path: &str) -> SuperTokensResult<NormalisedUrlPath> {
    NormalisedUrlPath::new(path).map_err(|e| SuperTokensError::General(e.to_string()))
}

fn core_status(response: &Value) -> Option<&str> {
    response.get("status").and_then(Value::as_str)
}

fn core_message(response: &Value, default: &str) -> String {
    response
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_string()
}

fn anti_csrf_token(options: &ApiOptions) -> Option<String> {
    options
        .req
        .headers()
        .get(ANTI_CSRF_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

/// Revoke sessions by handle.
pub(crate) async fn revoke_sessions(
    querier: &dyn crate::querier::Querier,
    session_handles: &[String],
) -> SuperTokensResult<()> {
    querier
        .send_post(
            &core_path(CORE_REMOVE_PATH)?,
            &json!({ "sessionHandles": session_handles }),
        )
        .await?;
    Ok(())
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// Seconds left until a core token `expiry` (epoch millis).
fn max_age(token: &Value) -> Option<u64> {
    token
        .get("expiry")
        .and_then(Value::as_u64)
        .map(|expiry| expiry.saturating_sub(now_millis()) / 1000)
}

/// Copy the tokens the core issued onto the response: access and refresh
/// tokens as cookies, the id refresh token as a header the frontend can read.
fn attach_tokens(reply: &mut Response, core: &Value, options: &ApiOptions) -> SuperTokensResult<()> {
    let secure = options.app_info.api_domain.as_str().starts_with("https://");
    let refresh_path = options
        .app_info
        .api_base_path
        .append_path(&core_path(REFRESH_API_PATH)?);
    let headers = reply.headers_mut();

    if let Some(token) = core.get("accessToken") {
        if let Some(value) = token.get("token").and_then(Value::as_str) {
            headers.append(
                SET_COOKIE,
                token_cookie(ACCESS_TOKEN_COOKIE, value, "/", max_age(token), secure)?,
            );
        }
    }
    if let Some(token) = core.get("refreshToken") {
        if let Some(value) = token.get("token").and_then(Value::as_str) {
            headers.append(
                SET_COOKIE,
                token_cookie(
                    REFRESH_TOKEN_COOKIE,
                    value,
                    refresh_path.as_str(),
                    max_age(token),
                    secure,
                )?,
            );
        }
    }
    if let Some(token) = core.get("idRefreshToken") {
        if let Some(value) = token.get("token").and_then(Value::as_str) {
            let expiry = token.get("expiry").and_then(Value::as_u64).unwrap_or_default();
            let header = HeaderValue::from_str(&format!("{value};{expiry}"))
                .map_err(|e| SuperTokensError::Http(e.into()))?;
            headers.insert(ID_REFRESH_TOKEN_HEADER, header);
            headers.insert(
                ACCESS_CONTROL_EXPOSE_HEADERS,
                HeaderValue::from_static(ID_REFRESH_TOKEN_HEADER),
            );
        }
    }
    Ok(())
}

pub async fn refresh_post(options: ApiOptions, ctx: UserContext) -> SuperTokensResult<ApiOutcome> {
    let refresh_token = get_cookie(options.req.headers(), REFRESH_TOKEN_COOKIE).ok_or_else(|| {
        SessionError::Unauthorised {
            message: "Refresh token not found. Are you sending the refresh token in the request as a cookie?"
                .to_string(),
        }
    })?;

    let body = json!({
        "refreshToken": refresh_token,
        "antiCsrfToken": anti_csrf_token(&options),
        "enableAntiCsrf": options.settings.enable_anti_csrf,
    });
    let response = options
        .querier
        .send_post(&core_path(CORE_REFRESH_PATH)?, &body)
        .await?;

    match core_status(&response) {
        Some("OK") => {
            let session_handle = response
                .pointer("/session/handle")
                .and_then(Value::as_str)
                .unwrap_or_default();
            tracing::debug!(
                request_id = %ctx.request_id,
                session_handle = %session_handle,
                "Session refreshed"
            );
            let mut reply = send_200_response(None)?;
            attach_tokens(&mut reply, &response, &options)?;
            Ok(ApiOutcome::Responded(reply))
        }
        Some("UNAUTHORISED") => Err(SessionError::Unauthorised {
            message: core_message(&response, "unauthorised"),
        }
        .into()),
        Some("TOKEN_THEFT_DETECTED") => {
            let field = |pointer: &str| {
                response
                    .pointer(pointer)
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string()
            };
            Err(SessionError::TokenTheftDetected {
                session_handle: field("/session/handle"),
                user_id: field("/session/userId"),
            }
            .into())
        }
        other => Err(SuperTokensError::General(format!(
            "unexpected core status for session refresh: {:?}",
            other
        ))),
    }
}

pub async fn signout_post(options: ApiOptions, ctx: UserContext) -> SuperTokensResult<ApiOutcome> {
    let Some(access_token) = get_cookie(options.req.headers(), ACCESS_TOKEN_COOKIE) else {
        return Ok(ApiOutcome::Ok(None));
    };

    let body = json!({
        "accessToken": access_token,
        "antiCsrfToken": anti_csrf_token(&options),
        "doAntiCsrfCheck": options.settings.enable_anti_csrf,
        "enableAntiCsrf": options.settings.enable_anti_csrf,
    });
    let response = options
        .querier
        .send_post(&core_path(CORE_VERIFY_PATH)?, &body)
        .await?;

    match core_status(&response) {
        Some("OK") => {
            let handle = response
                .pointer("/session/handle")
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    SuperTokensError::General("core verify response has no session handle".to_string())
                })?
                .to_string();
            revoke_sessions(options.querier.as_ref(), &[handle]).await?;
            tracing::debug!(request_id = %ctx.request_id, "Session signed out");
            Ok(ApiOutcome::Ok(None))
        }
        // Already signed out.
        Some("UNAUTHORISED") => Ok(ApiOutcome::Ok(None)),
        Some("TRY_REFRESH_TOKEN") => Err(SessionError::TryRefreshToken {
            message: core_message(&response, "try refresh token"),
        }
        .into()),
        other => Err(SuperTokensError::General(format!(
            "unexpected core status for session verify: {:?}",
            other
        ))),
    }
}
