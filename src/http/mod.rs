//! HTTP glue between axum and the dispatcher.
//!
//! # Data Flow
//! ```text
//! axum request
//!     → middleware/dispatch.rs (from_fn_with_state layer)
//!     → SuperTokens::middleware (routing)
//!     → recipe API → response.rs builders
//!     → or Fallback → rest of the axum stack
//! ```

pub mod fallback;
pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use fallback::Fallback;
pub use middleware::supertokens_middleware;
pub use request::RequestHead;
pub use server::HttpServer;
