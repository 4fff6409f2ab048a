//! Response builders shared by the dispatcher and recipes.
//!
//! # Design Decisions
//! - Builders return `Result` so a failure to produce the response can be
//!   escalated like any other error
//! - Error bodies are JSON `{"message": ...}`; the general handler is plain text

use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, HeaderValue, StatusCode};
use axum::response::Response;
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::{SuperTokensError, SuperTokensResult};
use crate::http::request::RequestHead;

/// 200 with the given JSON body, or `{}` when there is none.
pub fn send_200_response(body: Option<&Value>) -> SuperTokensResult<Response> {
    let empty = json!({});
    send_json(StatusCode::OK, body.unwrap_or(&empty))
}

/// Non-200 response with `{"message": message}`.
pub fn send_non_200_response(message: &str, status: u16) -> SuperTokensResult<Response> {
    let status = StatusCode::from_u16(status)
        .map_err(|e| SuperTokensError::General(format!("invalid status code {}: {}", status, e)))?;
    if status == StatusCode::OK {
        return Err(SuperTokensError::General(
            "calling send_non_200_response with status 200".to_string(),
        ));
    }
    send_json(status, &json!({ "message": message }))
}

pub fn send_json<T: Serialize>(status: StatusCode, body: &T) -> SuperTokensResult<Response> {
    let bytes = serde_json::to_vec(body)?;
    let response = Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "application/json; charset=utf-8")
        .body(Body::from(bytes))?;
    Ok(response)
}

/// `HttpOnly` cookie for a session token. Without `max_age` it lives for the
/// browser session.
pub fn token_cookie(
    name: &str,
    value: &str,
    path: &str,
    max_age: Option<u64>,
    secure: bool,
) -> SuperTokensResult<HeaderValue> {
    let mut cookie = format!("{name}={value}; Path={path}; HttpOnly; SameSite=Lax");
    if let Some(max_age) = max_age {
        cookie.push_str(&format!("; Max-Age={max_age}"));
    }
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie).map_err(|e| SuperTokensError::Http(e.into()))
}

/// Default terminal error handler: the message as plain text with a 500.
pub fn default_on_general_error(err: &SuperTokensError, head: &RequestHead) -> Response {
    tracing::error!(
        method = %head.method,
        path = %head.path(),
        error = %err,
        "Unhandled error in auth middleware"
    );
    let mut response = Response::new(Body::from(err.to_string()));
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response.headers_mut().insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}
