//! Connector error types
//!
//! One taxonomy for everything a lifecycle operation can report back to
//! the orchestration host. Nothing here is retried internally; every
//! variant is surfaced to the immediate caller.

use thiserror::Error;

use crate::types::ResourceKind;
use crate::value::FieldKind;

/// Error that can occur during a lifecycle operation.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// The HTTP call itself failed (network error or fatal status).
    #[error("transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The decoded reply does not match the expected shape.
    #[error("malformed response: {message}")]
    MalformedResponse { message: String },

    /// The server processed the call and rejected it.
    ///
    /// This is the ordinary business-rule rejection path (duplicate
    /// address, quota exceeded, ...), formatted the way the server
    /// reports it.
    #[error("{kind} '{context}': {outcome_type} ({message})")]
    RemoteFailure {
        kind: ResourceKind,
        context: String,
        outcome_type: String,
        message: String,
    },

    /// A create reply carried a receipt token other than the expected one.
    ///
    /// Stricter variant of `RemoteFailure`: the call nominally succeeded
    /// but announced a different event than the one being created.
    #[error("unexpected receipt '{actual}', expected '{expected}'")]
    UnexpectedReceipt { expected: String, actual: String },

    /// A read found no matching entity.
    ///
    /// Distinct from `RemoteFailure` so the orchestration host can treat
    /// it as "entity no longer exists" rather than "operation rejected".
    #[error("{kind} not found: {identifier}")]
    NotFound {
        kind: ResourceKind,
        identifier: String,
    },

    /// A remote value is inconsistent with the field's declared kind.
    #[error("type mismatch for field '{field}': expected {expected}, got {actual}")]
    TypeMismatch {
        field: String,
        expected: FieldKind,
        actual: String,
    },

    /// Connector or resource definition configuration is invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },
}

impl ConnectorError {
    /// Check whether this error means the entity is gone.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, ConnectorError::NotFound { .. })
    }

    /// Check whether this error is a rejection by the server, as opposed
    /// to a transport or decoding defect.
    #[must_use]
    pub fn is_remote_rejection(&self) -> bool {
        matches!(
            self,
            ConnectorError::RemoteFailure { .. } | ConnectorError::UnexpectedReceipt { .. }
        )
    }

    /// Get an error code for classification.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            ConnectorError::Transport { .. } => "TRANSPORT_ERROR",
            ConnectorError::MalformedResponse { .. } => "MALFORMED_RESPONSE",
            ConnectorError::RemoteFailure { .. } => "REMOTE_FAILURE",
            ConnectorError::UnexpectedReceipt { .. } => "UNEXPECTED_RECEIPT",
            ConnectorError::NotFound { .. } => "NOT_FOUND",
            ConnectorError::TypeMismatch { .. } => "TYPE_MISMATCH",
            ConnectorError::InvalidConfiguration { .. } => "INVALID_CONFIG",
        }
    }

    // Convenience constructors

    /// Create a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        ConnectorError::Transport {
            message: message.into(),
            source: None,
        }
    }

    /// Create a transport error with source.
    pub fn transport_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ConnectorError::Transport {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a malformed-response error.
    pub fn malformed(message: impl Into<String>) -> Self {
        ConnectorError::MalformedResponse {
            message: message.into(),
        }
    }

    /// Create an invalid-configuration error.
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        ConnectorError::InvalidConfiguration {
            message: message.into(),
        }
    }
}

/// Result type for connector operations.
pub type ConnectorResult<T> = Result<T, ConnectorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_failure_display() {
        let err = ConnectorError::RemoteFailure {
            kind: ResourceKind::Domain,
            context: "example.com".to_string(),
            outcome_type: "danger".to_string(),
            message: "domain_exists, example.com".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "domain 'example.com': danger (domain_exists, example.com)"
        );
    }

    #[test]
    fn test_not_found_classification() {
        let err = ConnectorError::NotFound {
            kind: ResourceKind::Alias,
            identifier: "42".to_string(),
        };
        assert!(err.is_not_found());
        assert!(!err.is_remote_rejection());
        assert_eq!(err.error_code(), "NOT_FOUND");
    }

    #[test]
    fn test_rejection_classification() {
        let err = ConnectorError::UnexpectedReceipt {
            expected: "alias_added".to_string(),
            actual: "object_exists".to_string(),
        };
        assert!(err.is_remote_rejection());
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_transport_with_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        let err = ConnectorError::transport_with_source("request failed", io);
        if let ConnectorError::Transport { source, .. } = &err {
            assert!(source.is_some());
        } else {
            panic!("expected Transport variant");
        }
    }

    #[test]
    fn test_type_mismatch_display() {
        let err = ConnectorError::TypeMismatch {
            field: "active".to_string(),
            expected: FieldKind::Bool,
            actual: "\"maybe\"".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "type mismatch for field 'active': expected bool, got \"maybe\""
        );
    }
}
