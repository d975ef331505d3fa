//! # HTTP transport for the mailcow connector
//!
//! Implements [`mailcow_connector::transport::ApiTransport`] over
//! reqwest. Authentication (the `X-API-Key` header), TLS policy and
//! timeouts live here; the lifecycle driver stays transport-agnostic.
//!
//! ```ignore
//! use mailcow_connector::prelude::*;
//! use mailcow_connector_http::{HttpConfig, HttpTransport};
//!
//! let config = HttpConfig::new("https://mail.example.com", api_key);
//! let driver = Provisioner::new(HttpTransport::new(config)?);
//! ```

pub mod config;
pub mod transport;

pub use config::HttpConfig;
pub use transport::HttpTransport;
