//! HTTP server setup for the demo application.
//!
//! # Responsibilities
//! - Create the axum Router with the application's own handlers
//! - Wire up middleware (dispatcher, CORS, tracing, request ID)
//! - Bind server to listener with graceful shutdown

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::error::ConfigError;
use crate::http::middleware::supertokens_middleware;
use crate::http::request::get_cookie;
use crate::lifecycle::signals::shutdown_signal;
use crate::recipe::session::ACCESS_TOKEN_COOKIE;
use crate::supertokens::SuperTokens;

/// HTTP server for the demo application.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(st: Arc<SuperTokens>) -> Result<Self, ConfigError> {
        Ok(Self {
            router: Self::build_router(st)?,
        })
    }

    /// Application routes behind the dispatcher and the usual layers.
    pub fn build_router(st: Arc<SuperTokens>) -> Result<Router, ConfigError> {
        let cors = st.cors_layer()?;
        Ok(Router::new()
            .route("/sessioninfo", get(session_info))
            .fallback(not_found)
            .with_state(st.clone())
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(cors)
                    .layer(from_fn_with_state(st, supertokens_middleware)),
            ))
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Example application route; reached only through the dispatcher's fallback.
async fn session_info(State(st): State<Arc<SuperTokens>>, headers: HeaderMap) -> impl IntoResponse {
    let has_session = get_cookie(&headers, ACCESS_TOKEN_COOKIE).is_some();
    Json(json!({
        "appName": st.app_info().app_name,
        "apiBasePath": st.app_info().api_base_path.as_str(),
        "hasSession": has_session,
    }))
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not found")
}
