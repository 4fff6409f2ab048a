//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request (path, method, rid header)
//!     → router.rs: normalise path, prepend gateway path
//!         outside api_base_path → fallback
//!     → matcher.rs: pick the owning recipe and API id
//!         rid present → only the named recipe is asked
//!         rid absent  → recipes asked in registration order, first claim wins
//!     → recipe.handle_api_request | fallback
//!     → errors → SuperTokens::error_handler
//! ```
//!
//! # Design Decisions
//! - Recipe list is immutable after init; routing takes no locks
//! - Deterministic: same request always resolves to the same recipe
//! - First match wins, not best match
//! - A malformed path is answered by the error chain, never the fallback

pub mod matcher;
pub mod router;

pub use matcher::{resolve, Resolution, Unclaimed};
