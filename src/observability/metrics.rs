//! Metrics collection and exposition.
//!
//! # Metrics
//! - `supertokens_requests_total` (counter): requests seen by the
//!   dispatcher, by `recipe` and `outcome` (`passthrough`, `handled`, `error`)
//! - `supertokens_errors_total` (counter): errors entering the error chain,
//!   by `stage` (`bad_input`, `recipe`, `general`)
//!
//! # Design Decisions
//! - Prometheus exporter with its own HTTP listener, installed by the binary

use std::net::SocketAddr;

use metrics::counter;
use metrics_exporter_prometheus::PrometheusBuilder;

pub const REQUESTS_TOTAL: &str = "supertokens_requests_total";
pub const ERRORS_TOTAL: &str = "supertokens_errors_total";

/// Outcome label values.
pub const OUTCOME_PASSTHROUGH: &str = "passthrough";
pub const OUTCOME_HANDLED: &str = "handled";
pub const OUTCOME_ERROR: &str = "error";

/// Start the scrape endpoint. Failure is logged, never fatal.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// `recipe` is empty for requests no recipe claimed.
pub fn record_dispatch(recipe: &str, outcome: &'static str) {
    counter!(REQUESTS_TOTAL, "recipe" => recipe.to_string(), "outcome" => outcome).increment(1);
}

pub fn record_error(stage: &'static str) {
    counter!(ERRORS_TOTAL, "stage" => stage).increment(1);
}
