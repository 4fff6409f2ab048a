//! Core service client.
//!
//! # Data Flow
//! ```text
//! recipe API implementation
//!     → Querier::send_get / send_post / send_put / send_delete
//!     → client.rs (pick host round-robin, fail over on connect errors)
//!     → core service JSON response
//! ```
//!
//! # Design Decisions
//! - The dispatcher never calls the querier itself; recipes do
//! - Hosts are fixed at init; no discovery
//! - Without a configured core every call fails instead of panicking at init

pub mod client;

pub use client::HttpQuerier;

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::normalise::NormalisedUrlPath;

/// Errors from talking to the core service.
#[derive(Debug, Error)]
pub enum QuerierError {
    /// Init was called without a core connection URI.
    #[error("no SuperTokens core configured; pass a connection URI to init")]
    NoCoreConfigured,

    /// Every configured host refused the connection.
    #[error("no SuperTokens core available to query (tried {0} hosts)")]
    AllHostsUnreachable(usize),

    /// Core answered with a non-success status.
    #[error("SuperTokens core returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("core request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Core answered with something that is not the expected JSON.
    #[error("invalid core response: {0}")]
    Decode(String),
}

/// Capability for issuing requests to the core service.
#[async_trait]
pub trait Querier: Send + Sync {
    async fn send_get(
        &self,
        path: &NormalisedUrlPath,
        params: &HashMap<String, String>,
    ) -> Result<Value, QuerierError>;

    async fn send_post(&self, path: &NormalisedUrlPath, body: &Value)
        -> Result<Value, QuerierError>;

    async fn send_put(&self, path: &NormalisedUrlPath, body: &Value)
        -> Result<Value, QuerierError>;

    async fn send_delete(
        &self,
        path: &NormalisedUrlPath,
        body: &Value,
    ) -> Result<Value, QuerierError>;
}

/// Querier used when no core connection was configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCoreQuerier;

#[async_trait]
impl Querier for NoCoreQuerier {
    async fn send_get(
        &self,
        _path: &NormalisedUrlPath,
        _params: &HashMap<String, String>,
    ) -> Result<Value, QuerierError> {
        Err(QuerierError::NoCoreConfigured)
    }

    async fn send_post(
        &self,
        _path: &NormalisedUrlPath,
        _body: &Value,
    ) -> Result<Value, QuerierError> {
        Err(QuerierError::NoCoreConfigured)
    }

    async fn send_put(
        &self,
        _path: &NormalisedUrlPath,
        _body: &Value,
    ) -> Result<Value, QuerierError> {
        Err(QuerierError::NoCoreConfigured)
    }

    async fn send_delete(
        &self,
        _path: &NormalisedUrlPath,
        _body: &Value,
    ) -> Result<Value, QuerierError> {
        Err(QuerierError::NoCoreConfigured)
    }
}
