//! Transport seam
//!
//! The lifecycle driver issues exactly one outbound call per operation
//! through this trait. Authentication headers, TLS policy and timeouts
//! belong to the implementation; the driver never retries.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ConnectorResult;

/// A client able to reach the mail server's administration API.
#[async_trait]
pub trait ApiTransport: Send + Sync {
    /// Issue a GET request and decode the JSON reply body.
    async fn get(&self, path: &str) -> ConnectorResult<Value>;

    /// Issue a POST request with a JSON body and decode the JSON reply.
    async fn post(&self, path: &str, body: &Value) -> ConnectorResult<Value>;
}

#[async_trait]
impl<T: ApiTransport + ?Sized> ApiTransport for &T {
    async fn get(&self, path: &str) -> ConnectorResult<Value> {
        (**self).get(path).await
    }

    async fn post(&self, path: &str, body: &Value) -> ConnectorResult<Value> {
        (**self).post(path, body).await
    }
}
