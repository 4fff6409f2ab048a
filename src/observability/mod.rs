//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! dispatcher, error chain, recipes
//!     → logging.rs (structured `tracing` events)
//!     → metrics.rs (dispatch and error counters)
//!
//! Consumers:
//!     → stdout
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Library code only emits events and counters; binaries install the
//!   subscriber and the recorder
//! - Without a recorder, counter updates are no-ops

pub mod logging;
pub mod metrics;
