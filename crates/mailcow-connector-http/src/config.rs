//! HTTP transport configuration
//!
//! Connection settings for the administration API: host URL, API key,
//! TLS policy and timeouts.

use serde::{Deserialize, Serialize};
use url::Url;

use mailcow_connector::error::{ConnectorError, ConnectorResult};

/// Configuration for the HTTP transport.
#[derive(Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Base URL of the mail server (e.g. "https://mail.example.com").
    pub host: String,

    /// API key sent with every request.
    pub api_key: String,

    /// Whether to verify the server certificate.
    #[serde(default = "default_true")]
    pub verify_certificate: bool,

    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Read timeout in seconds.
    #[serde(default = "default_read_timeout")]
    pub read_timeout_secs: u64,
}

fn default_true() -> bool {
    true
}

fn default_connect_timeout() -> u64 {
    30
}

fn default_read_timeout() -> u64 {
    60
}

impl HttpConfig {
    /// Create a config with default TLS policy and timeouts.
    pub fn new(host: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            api_key: api_key.into(),
            verify_certificate: true,
            connect_timeout_secs: default_connect_timeout(),
            read_timeout_secs: default_read_timeout(),
        }
    }

    /// Set certificate verification.
    ///
    /// Disabling verification is only acceptable against a self-signed
    /// development server.
    #[must_use]
    pub fn with_verify_certificate(mut self, verify: bool) -> Self {
        self.verify_certificate = verify;
        self
    }

    /// Set the connection timeout.
    #[must_use]
    pub fn with_connect_timeout(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }

    /// Set the read timeout.
    #[must_use]
    pub fn with_read_timeout(mut self, secs: u64) -> Self {
        self.read_timeout_secs = secs;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ConnectorResult<()> {
        let url = Url::parse(&self.host).map_err(|e| {
            ConnectorError::invalid_configuration(format!("invalid host URL '{}': {e}", self.host))
        })?;

        match url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(ConnectorError::invalid_configuration(format!(
                    "unsupported scheme '{scheme}', expected http or https"
                )));
            }
        }

        if url.host_str().is_none() {
            return Err(ConnectorError::invalid_configuration(
                "host URL has no host component",
            ));
        }

        if self.api_key.trim().is_empty() {
            return Err(ConnectorError::invalid_configuration("API key is empty"));
        }

        if !self.verify_certificate {
            tracing::warn!(
                host = %self.host,
                "certificate verification is disabled for this connection"
            );
        }

        Ok(())
    }

    /// Create a redacted copy for logging and display.
    #[must_use]
    pub fn redacted(&self) -> Self {
        Self {
            api_key: "***".to_string(),
            ..self.clone()
        }
    }

    /// Join an API path onto the host URL.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.host.trim_end_matches('/'))
    }
}

impl std::fmt::Debug for HttpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpConfig")
            .field("host", &self.host)
            .field("api_key", &"***")
            .field("verify_certificate", &self.verify_certificate)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("read_timeout_secs", &self.read_timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_https_host() {
        let config = HttpConfig::new("https://mail.example.com", "key-123");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_scheme() {
        let config = HttpConfig::new("ftp://mail.example.com", "key-123");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_api_key() {
        let config = HttpConfig::new("https://mail.example.com", "  ");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_url_join_handles_trailing_slash() {
        let config = HttpConfig::new("https://mail.example.com/", "key");
        assert_eq!(
            config.url("/api/v1/get/domain/example.com"),
            "https://mail.example.com/api/v1/get/domain/example.com"
        );
    }

    #[test]
    fn test_debug_and_redacted_hide_api_key() {
        let config = HttpConfig::new("https://mail.example.com", "key-123");
        assert!(!format!("{config:?}").contains("key-123"));
        assert_eq!(config.redacted().api_key, "***");
    }
}
