//! Error types shared by the dispatcher, recipes and the querier.
//!
//! # Classification
//! ```text
//! ConfigError          → raised by init only, never at request time
//! SuperTokensError
//!     BadInput         → 400 (first stage of the error chain)
//!     Recipe           → offered to each recipe's handle_error
//!     everything else  → general error handler
//! ```
//!
//! # Design Decisions
//! - Classification is by variant only; no other field is inspected
//! - Recipe errors stay opaque: recipes recognise their own by downcasting

use thiserror::Error;

use crate::normalise::NormaliseError;
use crate::querier::QuerierError;

/// Errors raised while building a [`crate::SuperTokens`] instance.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// App info field missing or malformed.
    #[error("invalid app info: {0}")]
    AppInfo(String),

    /// A path or domain in the configuration could not be normalised.
    #[error(transparent)]
    Normalise(#[from] NormaliseError),

    /// Core connection URI unusable.
    #[error("invalid core connection: {0}")]
    Connection(String),

    /// No recipe was supplied to init.
    #[error("please provide at least one recipe to the supertokens.init function call")]
    NoRecipes,

    /// A recipe factory rejected its configuration.
    #[error("recipe {recipe_id} failed to initialise: {message}")]
    Recipe { recipe_id: String, message: String },

    /// Could not read the configuration file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file is not valid TOML for the schema.
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Configuration parsed but failed semantic checks.
    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),
}

/// Errors produced while routing or handling an API request.
#[derive(Debug, Error)]
pub enum SuperTokensError {
    /// Malformed request data. Always answered with a 400.
    #[error("{0}")]
    BadInput(String),

    /// An error owned by a recipe. Only that recipe knows how to render it.
    #[error("{source}")]
    Recipe {
        recipe_id: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Unclassified failure.
    #[error("{0}")]
    General(String),

    #[error(transparent)]
    Querier(#[from] QuerierError),

    #[error(transparent)]
    Http(#[from] axum::http::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl SuperTokensError {
    /// Wrap a recipe-specific error.
    pub fn recipe<E>(recipe_id: impl Into<String>, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Recipe {
            recipe_id: recipe_id.into(),
            source: Box::new(err),
        }
    }

    pub fn is_bad_input(&self) -> bool {
        matches!(self, Self::BadInput(_))
    }

    /// Borrow the inner recipe error as `E` if this error belongs to `recipe_id`.
    pub fn downcast_recipe<E>(&self, recipe_id: &str) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        match self {
            Self::Recipe {
                recipe_id: owner,
                source,
            } if owner == recipe_id => source.downcast_ref::<E>(),
            _ => None,
        }
    }

    /// Label used for the `stage` metric and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::BadInput(_) => "bad_input",
            Self::Recipe { .. } => "recipe",
            _ => "general",
        }
    }
}

/// Result type for request-time operations.
pub type SuperTokensResult<T> = Result<T, SuperTokensError>;
