//! `reqwest` implementation of [`Querier`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde_json::Value;

use super::{Querier, QuerierError};
use crate::error::ConfigError;
use crate::normalise::{NormalisedUrlDomain, NormalisedUrlPath};

const API_KEY_HEADER: &str = "api-key";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Queries a set of core hosts, rotating through them.
#[derive(Debug)]
pub struct HttpQuerier {
    client: Client,
    hosts: Vec<NormalisedUrlDomain>,
    api_key: Option<String>,
    cursor: AtomicUsize,
}

impl HttpQuerier {
    pub fn new(hosts: Vec<NormalisedUrlDomain>, api_key: Option<String>) -> Result<Self, ConfigError> {
        if hosts.is_empty() {
            return Err(ConfigError::Connection(
                "connection URI must name at least one core host".to_string(),
            ));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ConfigError::Connection(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            hosts,
            api_key,
            cursor: AtomicUsize::new(0),
        })
    }

    /// Build from a `;`-separated list of core URLs.
    pub fn from_connection_uri(uri: &str, api_key: Option<String>) -> Result<Self, ConfigError> {
        let hosts = uri
            .split(';')
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .map(|h| NormalisedUrlDomain::new(h, false))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(hosts, api_key)
    }

    pub fn hosts(&self) -> &[NormalisedUrlDomain] {
        &self.hosts
    }

    /// Send to one host after another, starting at the cursor, until a host
    /// accepts the connection.
    async fn send(
        &self,
        method: Method,
        path: &NormalisedUrlPath,
        build: impl Fn(RequestBuilder) -> RequestBuilder + Send + Sync,
    ) -> Result<Value, QuerierError> {
        let start = self.cursor.fetch_add(1, Ordering::Relaxed);
        let len = self.hosts.len();

        for i in 0..len {
            let host = &self.hosts[(start + i) % len];
            let url = format!("{}{}", host, path);

            let mut request = self.client.request(method.clone(), &url);
            if let Some(key) = &self.api_key {
                request = request.header(API_KEY_HEADER, key);
            }

            tracing::debug!(method = %method, url = %url, "Querying core");

            let response = match build(request).send().await {
                Ok(response) => response,
                Err(e) if e.is_connect() => {
                    tracing::warn!(host = %host, error = %e, "Core host unreachable, trying next");
                    continue;
                }
                Err(e) => return Err(QuerierError::Transport(e)),
            };

            let status = response.status();
            let text = response.text().await?;
            if !status.is_success() {
                return Err(QuerierError::Status {
                    status: status.as_u16(),
                    body: text,
                });
            }
            return serde_json::from_str(&text).map_err(|e| QuerierError::Decode(e.to_string()));
        }

        Err(QuerierError::AllHostsUnreachable(len))
    }
}

#[async_trait]
impl Querier for HttpQuerier {
    async fn send_get(
        &self,
        path: &NormalisedUrlPath,
        params: &HashMap<String, String>,
    ) -> Result<Value, QuerierError> {
        self.send(Method::GET, path, |req| req.query(params)).await
    }

    async fn send_post(
        &self,
        path: &NormalisedUrlPath,
        body: &Value,
    ) -> Result<Value, QuerierError> {
        self.send(Method::POST, path, |req| req.json(body)).await
    }

    async fn send_put(
        &self,
        path: &NormalisedUrlPath,
        body: &Value,
    ) -> Result<Value, QuerierError> {
        self.send(Method::PUT, path, |req| req.json(body)).await
    }

    async fn send_delete(
        &self,
        path: &NormalisedUrlPath,
        body: &Value,
    ) -> Result<Value, QuerierError> {
        self.send(Method::DELETE, path, |req| req.json(body)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_uri_split() {
        let querier = HttpQuerier::from_connection_uri(
            "http://localhost:3567; https://try.supertokens.io/",
            None,
        )
        .unwrap();
        let hosts: Vec<&str> = querier.hosts().iter().map(|h| h.as_str()).collect();
        assert_eq!(hosts, vec!["http://localhost:3567", "https://try.supertokens.io"]);
    }

    #[test]
    fn test_empty_connection_uri_rejected() {
        assert!(HttpQuerier::from_connection_uri(" ; ", None).is_err());
        assert!(HttpQuerier::from_connection_uri("/not/a/host", None).is_err());
    }

    #[tokio::test]
    async fn test_unreachable_hosts_exhausted() {
        let addr = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();
        let querier =
            HttpQuerier::from_connection_uri(&format!("http://{}", addr), None).unwrap();
        let path = NormalisedUrlPath::new("/hello").unwrap();
        let err = querier.send_get(&path, &HashMap::new()).await.unwrap_err();
        assert!(matches!(err, QuerierError::AllHostsUnreachable(1)));
    }
}
