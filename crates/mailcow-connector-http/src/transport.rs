//! HTTP transport implementation
//!
//! A thin reqwest client over the administration API: API-key header on
//! every request, one JSON decode per call, no retries. A failed call
//! surfaces immediately; the orchestration host decides whether to retry
//! the whole operation.

use async_trait::async_trait;
use reqwest::{header, Client, Response, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, trace};

use mailcow_connector::error::{ConnectorError, ConnectorResult};
use mailcow_connector::transport::ApiTransport;

use crate::config::HttpConfig;

/// Name of the API-key header expected by the server.
const API_KEY_HEADER: &str = "X-API-Key";

/// HTTP transport for the mailcow administration API.
pub struct HttpTransport {
    config: HttpConfig,
    client: Client,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("config", &self.config.redacted())
            .finish()
    }
}

impl HttpTransport {
    /// Create a transport from a validated configuration.
    pub fn new(config: HttpConfig) -> ConnectorResult<Self> {
        config.validate()?;
        let client = Self::build_client(&config)?;
        Ok(Self { config, client })
    }

    /// Get the configuration (API key redacted).
    #[must_use]
    pub fn config(&self) -> HttpConfig {
        self.config.redacted()
    }

    fn build_client(config: &HttpConfig) -> ConnectorResult<Client> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(config.read_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs));

        if !config.verify_certificate {
            builder = builder.danger_accept_invalid_certs(true);
        }

        builder.build().map_err(|e| {
            ConnectorError::invalid_configuration(format!("failed to build HTTP client: {e}"))
        })
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, self.config.url(path))
            .header(API_KEY_HEADER, &self.config.api_key)
            .header(header::ACCEPT, "application/json")
    }

    async fn decode(&self, path: &str, response: Response) -> ConnectorResult<Value> {
        let status = response.status();
        debug!(path, status = %status, "received reply");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::status_error(status, path, &body));
        }

        response.json::<Value>().await.map_err(|e| {
            ConnectorError::malformed(format!("reply to '{path}' is not JSON: {e}"))
        })
    }

    fn status_error(status: StatusCode, path: &str, body: &str) -> ConnectorError {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ConnectorError::transport(
                format!("authentication rejected for '{path}' (HTTP {status})"),
            ),
            _ => {
                let snippet: String = body.chars().take(200).collect();
                ConnectorError::transport(format!("HTTP {status} for '{path}': {snippet}"))
            }
        }
    }
}

#[async_trait]
impl ApiTransport for HttpTransport {
    async fn get(&self, path: &str) -> ConnectorResult<Value> {
        debug!(path, "GET");
        let response = self
            .request(reqwest::Method::GET, path)
            .send()
            .await
            .map_err(|e| {
                ConnectorError::transport_with_source(format!("GET '{path}' failed"), e)
            })?;
        self.decode(path, response).await
    }

    async fn post(&self, path: &str, body: &Value) -> ConnectorResult<Value> {
        debug!(path, "POST");
        trace!(body = %body, "request body");
        let response = self
            .request(reqwest::Method::POST, path)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                ConnectorError::transport_with_source(format!("POST '{path}' failed"), e)
            })?;
        self.decode(path, response).await
    }
}
