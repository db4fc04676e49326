//! Client configuration.
//!
//! A [`ClientConfig`] is an explicit value handed to a client at
//! construction. It can be written by hand, read from the environment, or
//! loaded from a TOML file:
//!
//! ```toml
//! entry-point = "http://127.0.0.1:8088"
//! api-key = "zhenghaoz"
//! timeout-secs = 10
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Environment variable holding the entry point.
pub const ENV_ENTRY_POINT: &str = "GORSE_ENTRY_POINT";
/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "GORSE_API_KEY";
/// Environment variable holding the timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "GORSE_TIMEOUT_SECS";

/// Connection settings for one Gorse server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClientConfig {
    /// Base URL of the server.
    pub entry_point: String,

    /// API key sent as `X-API-Key`.
    #[serde(default)]
    pub api_key: String,

    /// Per-request timeout in seconds. No timeout when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Custom user agent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl ClientConfig {
    pub fn new(entry_point: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            entry_point: entry_point.into(),
            api_key: api_key.into(),
            timeout_secs: None,
            user_agent: None,
        }
    }

    /// Set the per-request timeout, rounded up to whole seconds.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        let secs = timeout.as_secs() + u64::from(timeout.subsec_nanos() > 0);
        self.timeout_secs = Some(secs);
        self
    }

    /// The configured timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Read `GORSE_ENTRY_POINT`, `GORSE_API_KEY` and `GORSE_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let entry_point = lookup(ENV_ENTRY_POINT)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::Config(format!("{} is not set", ENV_ENTRY_POINT)))?;
        let api_key = lookup(ENV_API_KEY).unwrap_or_default();
        let timeout_secs = match lookup(ENV_TIMEOUT_SECS) {
            Some(raw) if !raw.is_empty() => Some(raw.trim().parse::<u64>().map_err(|_| {
                Error::Config(format!(
                    "{} must be a whole number of seconds: {}",
                    ENV_TIMEOUT_SECS, raw
                ))
            })?),
            _ => None,
        };

        Self {
            entry_point,
            api_key,
            timeout_secs,
            user_agent: None,
        }
        .validated()
    }

    /// Parse a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)
            .map_err(|e| Error::Config(format!("invalid client config: {}", e)))?;
        config.validated()
    }

    /// A zero timeout would fail every request before it is sent.
    fn validated(self) -> Result<Self> {
        if self.timeout_secs == Some(0) {
            return Err(Error::Config("timeout must be at least one second".to_string()));
        }
        Ok(self)
    }

    /// Load a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| Error::Config(format!("failed to encode config: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_from_lookup() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_ENTRY_POINT, "http://127.0.0.1:8088"),
            (ENV_API_KEY, "zhenghaoz"),
            (ENV_TIMEOUT_SECS, "10"),
        ]))
        .unwrap();
        assert_eq!(config.entry_point, "http://127.0.0.1:8088");
        assert_eq!(config.api_key, "zhenghaoz");
        assert_eq!(config.timeout(), Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_from_lookup_requires_entry_point() {
        let result = ClientConfig::from_lookup(lookup(&[(ENV_API_KEY, "k")]));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_from_lookup_rejects_bad_timeout() {
        let result = ClientConfig::from_lookup(lookup(&[
            (ENV_ENTRY_POINT, "http://127.0.0.1:8088"),
            (ENV_TIMEOUT_SECS, "soon"),
        ]));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_from_lookup_rejects_zero_timeout() {
        let result = ClientConfig::from_lookup(lookup(&[
            (ENV_ENTRY_POINT, "http://127.0.0.1:8088"),
            (ENV_TIMEOUT_SECS, "0"),
        ]));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_sub_second_timeout_rounds_up() {
        let config =
            ClientConfig::new("http://gorse:8088", "k").with_timeout(Duration::from_millis(500));
        assert_eq!(config.timeout(), Some(Duration::from_secs(1)));

        let config =
            ClientConfig::new("http://gorse:8088", "k").with_timeout(Duration::from_millis(2001));
        assert_eq!(config.timeout(), Some(Duration::from_secs(3)));
    }

    #[test]
    fn test_toml_rejects_zero_timeout() {
        let result = ClientConfig::from_toml_str(
            r#"
            entry-point = "http://127.0.0.1:8088"
            timeout-secs = 0
            "#,
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_from_toml_str() {
        let config = ClientConfig::from_toml_str(
            r#"
            entry-point = "http://127.0.0.1:8088"
            api-key = "zhenghaoz"
            timeout-secs = 5
            "#,
        )
        .unwrap();
        assert_eq!(
            config,
            ClientConfig::new("http://127.0.0.1:8088", "zhenghaoz")
                .with_timeout(Duration::from_secs(5))
        );
    }

    #[test]
    fn test_toml_defaults() {
        let config = ClientConfig::from_toml_str(r#"entry-point = "http://gorse""#).unwrap();
        assert_eq!(config.api_key, "");
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = ClientConfig::new("http://gorse:8088", "key");
        let rendered = config.to_toml_string().unwrap();
        assert_eq!(ClientConfig::from_toml_str(&rendered).unwrap(), config);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "entry-point = \"http://gorse:8088\"").unwrap();
        writeln!(file, "user-agent = \"tests\"").unwrap();
        let config = ClientConfig::from_file(file.path()).unwrap();
        assert_eq!(config.user_agent.as_deref(), Some("tests"));
    }

    #[test]
    fn test_from_missing_file() {
        let result = ClientConfig::from_file("/nonexistent/gorse.toml");
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
