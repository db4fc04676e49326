//! Async client and the builder shared by both client flavors.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use url::Url;

use crate::config::ClientConfig;
use crate::contract::{API_KEY_HEADER, Operation, check_status};
use crate::error::{Error, Result};

/// Async Gorse API client.
///
/// Cheap to clone. Idle connections are not kept between calls, so dropping
/// a pending call's future releases its connection.
///
/// # Example
///
/// ```no_run
/// use gorse_client::GorseClient;
///
/// # async fn example() -> gorse_client::Result<()> {
/// let client = GorseClient::new("http://127.0.0.1:8088", "api-key")?;
/// let items = client.get_recommend("100").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct GorseClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    entry_point: Url,
    timeout: Option<Duration>,
}

impl GorseClient {
    /// Create a client for an entry point and API key, without a timeout.
    pub fn new(entry_point: &str, api_key: &str) -> Result<Self> {
        Self::builder().entry_point(entry_point).api_key(api_key).build()
    }

    /// Create a client from a configuration value.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        ClientBuilder::from_config(config).build()
    }

    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Get the entry point.
    pub fn entry_point(&self) -> &Url {
        &self.inner.entry_point
    }

    /// Execute any operation from the contract.
    pub async fn send<O: Operation>(&self, op: &O) -> Result<O::Output> {
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

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        tracing::debug!(status, bytes = body.len(), "gorse response received");

        let body = check_status(status, body)?;
        op.decode(&body)
    }
}

/// Builder for Gorse clients.
#[derive(Debug, Clone, Default)]
pub struct ClientBuilder {
    entry_point: Option<String>,
    api_key: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

/// Validated builder settings, ready to hand to either HTTP stack.
pub(crate) struct Prepared {
    pub(crate) entry_point: Url,
    pub(crate) headers: HeaderMap,
    pub(crate) timeout: Option<Duration>,
    pub(crate) user_agent: String,
}

impl ClientBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a configuration value.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            entry_point: Some(config.entry_point.clone()),
            api_key: config.api_key.clone(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
        }
    }

    /// Set the base URL of the Gorse server.
    pub fn entry_point(mut self, url: impl Into<String>) -> Self {
        self.entry_point = Some(url.into());
        self
    }

    /// Set the API key sent as `X-API-Key`.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = key.into();
        self
    }

    /// Set a per-request timeout. Exceeding it is a transport error.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub(crate) fn prepare(self) -> Result<Prepared> {
        let entry_point = self
            .entry_point
            .ok_or_else(|| Error::Config("entry point is required".to_string()))?;

        let entry_point = Url::parse(&entry_point)?;
        if !matches!(entry_point.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "unsupported scheme in entry point: {}",
                entry_point.scheme()
            )));
        }

        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&self.api_key)
            .map_err(|_| Error::Config("Invalid API key".to_string()))?;
        headers.insert(API_KEY_HEADER, key);

        if self.timeout == Some(Duration::ZERO) {
            return Err(Error::Config("timeout must be greater than zero".to_string()));
        }

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("gorse-client/{}", env!("CARGO_PKG_VERSION")));

        Ok(Prepared {
            entry_point,
            headers,
            timeout: self.timeout,
            user_agent,
        })
    }

    /// Build the async client.
    pub fn build(self) -> Result<GorseClient> {
        let prepared = self.prepare()?;

        let http = reqwest::Client::builder()
            .default_headers(prepared.headers)
            .user_agent(prepared.user_agent)
            .pool_max_idle_per_host(0)
            .build()?;

        Ok(GorseClient {
            inner: Arc::new(ClientInner {
                http,
                entry_point: prepared.entry_point,
                timeout: prepared.timeout,
            }),
        })
    }

    /// Build the blocking client.
    #[cfg(feature = "blocking")]
    pub fn build_blocking(self) -> Result<crate::blocking::GorseClient> {
        crate::blocking::GorseClient::from_prepared(self.prepare()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_entry_point() {
        let result = ClientBuilder::new().api_key("k").build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_builder_rejects_bad_url() {
        let result = ClientBuilder::new().entry_point("not a url").build();
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_builder_rejects_non_http_scheme() {
        let result = ClientBuilder::new().entry_point("ftp://example.com").build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_builder_rejects_invalid_key() {
        let result = ClientBuilder::new()
            .entry_point("http://localhost:8088")
            .api_key("bad\nkey")
            .build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_builder_with_entry_point() {
        let client = GorseClient::new("http://localhost:8088", "secret").unwrap();
        assert_eq!(client.entry_point().as_str(), "http://localhost:8088/");
    }

    #[test]
    fn test_prepare_sets_api_key_header() {
        let prepared = ClientBuilder::new()
            .entry_point("http://localhost:8088")
            .api_key("zhenghaoz")
            .timeout(Duration::from_secs(5))
            .prepare()
            .unwrap();
        assert_eq!(prepared.headers[API_KEY_HEADER], "zhenghaoz");
        assert_eq!(prepared.timeout, Some(Duration::from_secs(5)));
        assert!(prepared.user_agent.starts_with("gorse-client/"));
    }

    #[test]
    fn test_builder_rejects_zero_timeout() {
        let result = ClientBuilder::new()
            .entry_point("http://localhost:8088")
            .timeout(Duration::ZERO)
            .build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_builder_from_config() {
        let config =
            ClientConfig::new("http://localhost:8088", "k").with_timeout(Duration::from_secs(3));
        let prepared = ClientBuilder::from_config(&config).prepare().unwrap();
        assert_eq!(prepared.timeout, Some(Duration::from_secs(3)));
        assert_eq!(prepared.headers[API_KEY_HEADER], "k");
    }
}
