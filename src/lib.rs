//! Request dispatch core of a pluggable authentication middleware.
//!
//! A [`SuperTokens`] instance owns the normalised app info and an ordered list
//! of recipes. For each request it decides whether the request belongs to the
//! auth surface, which recipe and API own it, and who renders a failure.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod normalise;
pub mod observability;
pub mod querier;
pub mod recipe;
pub mod routing;
pub mod supertokens;
pub mod users;

pub use error::{ConfigError, SuperTokensError, SuperTokensResult};
pub use http::{Fallback, RequestHead};
pub use recipe::{ApiId, RecipeListFunction, RecipeModule};
pub use supertokens::instance::{get_instance, init, Instance};
pub use supertokens::{ConnectionInfo, GeneralErrorHandler, SuperTokens, TypeInput};
