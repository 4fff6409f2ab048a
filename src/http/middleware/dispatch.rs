//! Mounts the dispatcher in front of an axum router.
//!
//! ```ignore
//! let app = Router::new()
//!     .route("/sessioninfo", get(session_info))
//!     .layer(axum::middleware::from_fn_with_state(st.clone(), supertokens_middleware));
//! ```

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::http::Fallback;
use crate::supertokens::SuperTokens;

pub async fn supertokens_middleware(
    State(st): State<Arc<SuperTokens>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    st.middleware(req, Fallback::from_next(next)).await
}
