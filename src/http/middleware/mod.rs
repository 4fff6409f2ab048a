//! axum middleware.

pub mod dispatch;

pub use dispatch::supertokens_middleware;
