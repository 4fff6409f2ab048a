//! The downstream handler invoked when a request is not ours.

use std::fmt;
use std::future::Future;

use axum::body::Body;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;

type FallbackFn = Box<dyn FnOnce(Request<Body>) -> BoxFuture<'static, Response> + Send>;

/// One-shot "next" handler.
///
/// Routing hands it to a recipe along with the request, so a recipe API that
/// is switched off can still pass the request through.
pub struct Fallback {
    inner: FallbackFn,
}

impl Fallback {
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: FnOnce(Request<Body>) -> Fut + Send + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        Self {
            inner: Box::new(move |req| f(req).boxed()),
        }
    }

    /// Wrap the rest of an axum middleware stack.
    pub fn from_next(next: Next) -> Self {
        Self::new(move |req| next.run(req))
    }

    pub async fn run(self, req: Request<Body>) -> Response {
        (self.inner)(req).await
    }
}

impl fmt::Debug for Fallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fallback").finish_non_exhaustive()
    }
}
