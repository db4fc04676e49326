//! Blocking Gorse API client.
//!
//! Same operations as [`crate::GorseClient`], each call blocking the current
//! thread until the response has been read. Must not be used from inside an
//! async runtime; use the async client there.

use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::client::{ClientBuilder, Prepared};
use crate::config::ClientConfig;
use crate::contract::{Operation, check_status};
use crate::error::Result;

/// Blocking Gorse API client.
///
/// # Example
///
/// ```no_run
/// use gorse_client::blocking::GorseClient;
///
/// # fn example() -> gorse_client::Result<()> {
/// let client = GorseClient::new("http://127.0.0.1:8088", "api-key")?;
/// let item = client.get_item("100")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct GorseClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::blocking::Client,
    entry_point: Url,
    timeout: Option<Duration>,
}

impl GorseClient {
    /// Create a client for an entry point and API key, without a timeout.
    pub fn new(entry_point: &str, api_key: &str) -> Result<Self> {
        ClientBuilder::new()
            .entry_point(entry_point)
            .api_key(api_key)
            .build_blocking()
    }

    /// Create a client from a configuration value.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        ClientBuilder::from_config(config).build_blocking()
    }

    pub(crate) fn from_prepared(prepared: Prepared) -> Result<Self> {
        // The blocking client applies a 30s default unless told otherwise.
        let http = reqwest::blocking::Client::builder()
            .default_headers(prepared.headers)
            .user_agent(prepared.user_agent)
            .pool_max_idle_per_host(0)
            .timeout(None)
            .build()?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                entry_point: prepared.entry_point,
                timeout: prepared.timeout,
            }),
        })
    }

    /// Get the entry point.
    pub fn entry_point(&self) -> &Url {
        &self.inner.entry_point
    }

    /// Execute any operation from the contract.
    pub fn send<O: Operation>(&self, op: &O) -> Result<O::Output> {
        let request = op.request()?;
        let url = request.url(&self.inner.entry_point)?;
        tracing::debug!(method = %request.method, %url, "sending gorse request");

        let mut builder = self.inner.http.request(request.method, url);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(timeout) = self.inner.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        tracing::debug!(status, bytes = body.len(), "gorse response received");

        let body = check_status(status, body)?;
        op.decode(&body)
    }
}
