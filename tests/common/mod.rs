//! Shared utilities for integration tests.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::{json, Value};
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use supertokens::http::response::{send_json, send_non_200_response};
use supertokens::normalise::{AppInfo, NormalisedAppInfo, NormalisedUrlPath};
use supertokens::querier::Querier;
use supertokens::{
    ApiId, ConfigError, Fallback, GeneralErrorHandler, RecipeListFunction, RecipeModule,
    RequestHead, SuperTokensError, SuperTokensResult,
};

pub fn app_info() -> AppInfo {
    AppInfo {
        app_name: "Demo".into(),
        api_domain: "http://localhost:3001".into(),
        website_domain: "http://localhost:3000".into(),
        ..Default::default()
    }
}

#[derive(Debug, Error)]
#[error("{recipe} failed: {message}")]
pub struct StubError {
    pub recipe: String,
    pub message: String,
}

/// What a stub API does when called.
#[derive(Debug, Clone, Copy)]
pub enum ApiBehaviour {
    /// 200 with the recipe and API id plus fake session fields.
    Respond,
    /// Hand the request to the fallback.
    PassThrough,
    /// Fail with a recipe-scoped [`StubError`].
    FailOwn,
    FailBadInput,
    FailGeneral,
}

/// What a stub recipe does when offered an error.
#[derive(Debug, Clone, Copy)]
pub enum ErrorBehaviour {
    Ignore,
    /// Render its own errors with this status.
    HandleOwn(u16),
    /// Render every error with this status.
    HandleAll(u16),
    Escalate,
}

/// Configurable recipe that counts every call made to it.
pub struct StubRecipe {
    id: &'static str,
    routes: Vec<(Method, &'static str, &'static str)>,
    cors: Vec<&'static str>,
    check_fails: bool,
    api: ApiBehaviour,
    on_error: ErrorBehaviour,
    pub checks: AtomicUsize,
    pub api_calls: AtomicUsize,
    pub error_calls: AtomicUsize,
}

impl StubRecipe {
    pub fn new(id: &'static str) -> Self {
        Self {
            id,
            routes: Vec::new(),
            cors: Vec::new(),
            check_fails: false,
            api: ApiBehaviour::Respond,
            on_error: ErrorBehaviour::Ignore,
            checks: AtomicUsize::new(0),
            api_calls: AtomicUsize::new(0),
            error_calls: AtomicUsize::new(0),
        }
    }

    /// Claim `method path` (full path, gateway included) as `api_id`.
    pub fn route(mut self, method: Method, path: &'static str, api_id: &'static str) -> Self {
        self.routes.push((method, path, api_id));
        self
    }

    pub fn cors(mut self, headers: &[&'static str]) -> Self {
        self.cors.extend_from_slice(headers);
        self
    }

    pub fn failing_check(mut self) -> Self {
        self.check_fails = true;
        self
    }

    pub fn api(mut self, behaviour: ApiBehaviour) -> Self {
        self.api = behaviour;
        self
    }

    pub fn on_error(mut self, behaviour: ErrorBehaviour) -> Self {
        self.on_error = behaviour;
        self
    }

    pub fn build(self) -> Arc<StubRecipe> {
        Arc::new(self)
    }

    pub fn checks(&self) -> usize {
        self.checks.load(Ordering::SeqCst)
    }

    pub fn api_calls(&self) -> usize {
        self.api_calls.load(Ordering::SeqCst)
    }

    pub fn error_calls(&self) -> usize {
        self.error_calls.load(Ordering::SeqCst)
    }

    fn own_error(&self) -> SuperTokensError {
        SuperTokensError::recipe(
            self.id,
            StubError {
                recipe: self.id.to_string(),
                message: "api failed".to_string(),
            },
        )
    }
}

#[async_trait]
impl RecipeModule for StubRecipe {
    fn recipe_id(&self) -> &str {
        self.id
    }

    fn return_api_id_if_can_handle_request(
        &self,
        path: &NormalisedUrlPath,
        method: &Method,
    ) -> SuperTokensResult<Option<ApiId>> {
        self.checks.fetch_add(1, Ordering::SeqCst);
        if self.check_fails {
            return Err(SuperTokensError::General(format!("{} check failed", self.id)));
        }
        Ok(self
            .routes
            .iter()
            .find(|(m, p, _)| m == method && path.as_str() == *p)
            .map(|(_, _, id)| ApiId::new(*id)))
    }

    async fn handle_api_request(
        &self,
        id: &ApiId,
        req: Request<Body>,
        fallback: Fallback,
        _path: &NormalisedUrlPath,
        _method: &Method,
    ) -> SuperTokensResult<Response> {
        self.api_calls.fetch_add(1, Ordering::SeqCst);
        match self.api {
            ApiBehaviour::Respond => send_json(
                StatusCode::OK,
                &json!({
                    "recipe": self.id,
                    "api": id.as_str(),
                    "userId": "user-1",
                    "sessionHandle": "handle-1",
                }),
            ),
            ApiBehaviour::PassThrough => Ok(fallback.run(req).await),
            ApiBehaviour::FailOwn => Err(self.own_error()),
            ApiBehaviour::FailBadInput => Err(SuperTokensError::BadInput(format!(
                "{} rejected the input",
                self.id
            ))),
            ApiBehaviour::FailGeneral => {
                Err(SuperTokensError::General(format!("{} blew up", self.id)))
            }
        }
    }

    fn all_cors_headers(&self) -> Vec<String> {
        self.cors.iter().map(|h| h.to_string()).collect()
    }

    async fn handle_error(
        &self,
        err: &SuperTokensError,
        _head: &RequestHead,
    ) -> SuperTokensResult<Option<Response>> {
        self.error_calls.fetch_add(1, Ordering::SeqCst);
        match self.on_error {
            ErrorBehaviour::Ignore => Ok(None),
            ErrorBehaviour::HandleOwn(status) => {
                if err.downcast_recipe::<StubError>(self.id).is_some() {
                    Ok(Some(send_non_200_response(&format!("handled by {}", self.id), status)?))
                } else {
                    Ok(None)
                }
            }
            ErrorBehaviour::HandleAll(status) => Ok(Some(send_non_200_response(
                &format!("handled by {}", self.id),
                status,
            )?)),
            ErrorBehaviour::Escalate => Err(SuperTokensError::General(format!(
                "{} could not handle error",
                self.id
            ))),
        }
    }
}

/// Register an already-built stub so the test keeps a handle on its counters.
pub fn register(recipe: &Arc<StubRecipe>) -> RecipeListFunction {
    let recipe = recipe.clone();
    Box::new(move |_app_info: &NormalisedAppInfo, _querier: Arc<dyn Querier>| {
        Ok(recipe as Arc<dyn RecipeModule>)
    })
}

/// A recipe factory that refuses its configuration.
pub fn broken_recipe() -> RecipeListFunction {
    Box::new(|_app_info: &NormalisedAppInfo, _querier: Arc<dyn Querier>| {
        Err(ConfigError::Recipe {
            recipe_id: "broken".into(),
            message: "bad settings".into(),
        })
    })
}

/// General error handler that remembers every error message it saw.
pub fn recording_general_handler() -> (GeneralErrorHandler, Arc<Mutex<Vec<String>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let handler: GeneralErrorHandler = Arc::new(move |err: &SuperTokensError, _head: &RequestHead| {
        sink.lock().unwrap().push(err.to_string());
        (StatusCode::INTERNAL_SERVER_ERROR, format!("general: {}", err)).into_response()
    });
    (handler, seen)
}

/// Fallback answering 418 and counting its invocations.
pub fn counting_fallback(counter: &Arc<AtomicUsize>) -> Fallback {
    let counter = counter.clone();
    Fallback::new(move |_req: Request<Body>| async move {
        counter.fetch_add(1, Ordering::SeqCst);
        StatusCode::IM_A_TEAPOT.into_response()
    })
}

pub fn request(method: Method, uri: &str, headers: &[(&str, &str)]) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    for (k, v) in headers {
        builder = builder.header(*k, *v);
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn body_string(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response) -> Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}

/// Start a programmable core mock on an ephemeral port.
///
/// The handler sees the raw request text and returns status and JSON body.
pub async fn start_core_mock<F>(handler: F) -> SocketAddr
where
    F: Fn(&str) -> (u16, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handler = Arc::new(handler);

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let handler = handler.clone();
            tokio::spawn(async move {
                let request = read_request(&mut socket).await;
                let (status, body) = handler(&request);
                let status_text = match status {
                    200 => "200 OK",
                    400 => "400 Bad Request",
                    401 => "401 Unauthorized",
                    404 => "404 Not Found",
                    500 => "500 Internal Server Error",
                    503 => "503 Service Unavailable",
                    _ => "200 OK",
                };
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_text,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// An address nothing listens on.
pub fn closed_port() -> SocketAddr {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };
        buf.extend_from_slice(&chunk[..n]);

        let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
        let content_length = head
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        if buf.len() >= end + 4 + content_length {
            break;
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}
