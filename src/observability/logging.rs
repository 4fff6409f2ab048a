//! Structured logging.
//!
//! # Responsibilities
//! - Install the global `tracing` subscriber
//! - Honour `RUST_LOG` over the configured level
//!
//! # Design Decisions
//! - Installing twice is not an error; the second call is a no-op

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Directive used when `RUST_LOG` is unset, e.g. `default_directive("debug")`.
pub fn default_directive(level: &str) -> String {
    format!("supertokens={level},supertokens_demo={level},tower_http={level}")
}

pub fn init_logging(level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_directive(level).into());

    if tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_err()
    {
        tracing::debug!("Logging already initialised");
    }
}
