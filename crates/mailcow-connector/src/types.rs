//! Connector type definitions
//!
//! Enums shared across descriptors, lifecycle operations and errors.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of manageable entity on the mail server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// A mail domain
    Domain,
    /// A mailbox inside a domain
    Mailbox,
    /// An address alias
    Alias,
    /// An alias domain pointing at a target domain
    DomainAlias,
    /// An administrator account scoped to a set of domains
    DomainAdmin,
    /// A DKIM signing key for a domain
    DkimKey,
    /// An imapsync job pulling mail from a remote host
    SyncJob,
    /// An OAuth2 client registration
    #[serde(rename = "oauth2_client")]
    OAuth2Client,
    /// A sender-dependent relay host
    RelayHost,
    /// The external identity provider configuration (singleton)
    IdentityProvider,
}

impl ResourceKind {
    /// Get all resource kinds.
    #[must_use]
    pub fn all() -> &'static [ResourceKind] {
        &[
            ResourceKind::Domain,
            ResourceKind::Mailbox,
            ResourceKind::Alias,
            ResourceKind::DomainAlias,
            ResourceKind::DomainAdmin,
            ResourceKind::DkimKey,
            ResourceKind::SyncJob,
            ResourceKind::OAuth2Client,
            ResourceKind::RelayHost,
            ResourceKind::IdentityProvider,
        ]
    }

    /// Get the string representation used in diagnostics.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Domain => "domain",
            ResourceKind::Mailbox => "mailbox",
            ResourceKind::Alias => "alias",
            ResourceKind::DomainAlias => "domain_alias",
            ResourceKind::DomainAdmin => "domain_admin",
            ResourceKind::DkimKey => "dkim_key",
            ResourceKind::SyncJob => "sync_job",
            ResourceKind::OAuth2Client => "oauth2_client",
            ResourceKind::RelayHost => "relay_host",
            ResourceKind::IdentityProvider => "identity_provider",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = ParseResourceKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "domain" => Ok(ResourceKind::Domain),
            "mailbox" => Ok(ResourceKind::Mailbox),
            "alias" => Ok(ResourceKind::Alias),
            "domain_alias" => Ok(ResourceKind::DomainAlias),
            "domain_admin" => Ok(ResourceKind::DomainAdmin),
            "dkim_key" => Ok(ResourceKind::DkimKey),
            "sync_job" => Ok(ResourceKind::SyncJob),
            "oauth2_client" => Ok(ResourceKind::OAuth2Client),
            "relay_host" => Ok(ResourceKind::RelayHost),
            "identity_provider" => Ok(ResourceKind::IdentityProvider),
            _ => Err(ParseResourceKindError(s.to_string())),
        }
    }
}

/// Error parsing a resource kind from string.
#[derive(Debug, Clone)]
pub struct ParseResourceKindError(String);

impl fmt::Display for ParseResourceKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid resource kind '{}'", self.0)
    }
}

impl std::error::Error for ParseResourceKindError {}

/// Lifecycle operation being performed on a resource instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    /// Create a new entity on the mail server
    Create,
    /// Read an entity back into observed state
    Read,
    /// Update mutable fields of an existing entity
    Update,
    /// Delete an entity from the mail server
    Delete,
}

impl OperationType {
    /// Get the string representation used in diagnostics.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Create => "create",
            OperationType::Read => "read",
            OperationType::Update => "update",
            OperationType::Delete => "delete",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OperationType {
    type Err = ParseOperationTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "create" => Ok(OperationType::Create),
            "read" => Ok(OperationType::Read),
            "update" => Ok(OperationType::Update),
            "delete" => Ok(OperationType::Delete),
            _ => Err(ParseOperationTypeError(s.to_string())),
        }
    }
}

/// Error parsing an operation type from string.
#[derive(Debug, Clone)]
pub struct ParseOperationTypeError(String);

impl fmt::Display for ParseOperationTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid operation type '{}', expected one of: create, read, update, delete",
            self.0
        )
    }
}

impl std::error::Error for ParseOperationTypeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_kind_from_str() {
        assert_eq!("domain".parse::<ResourceKind>().unwrap(), ResourceKind::Domain);
        assert_eq!("Mailbox".parse::<ResourceKind>().unwrap(), ResourceKind::Mailbox);
        assert_eq!(
            "relay_host".parse::<ResourceKind>().unwrap(),
            ResourceKind::RelayHost
        );
        assert!("pigeon".parse::<ResourceKind>().is_err());
    }

    #[test]
    fn test_resource_kind_round_trip() {
        for kind in ResourceKind::all() {
            assert_eq!(kind.as_str().parse::<ResourceKind>().unwrap(), *kind);
        }
    }

    #[test]
    fn test_resource_kind_serialization() {
        let json = serde_json::to_string(&ResourceKind::OAuth2Client).unwrap();
        assert_eq!(json, "\"oauth2_client\"");
    }

    #[test]
    fn test_operation_type_from_str() {
        assert_eq!("create".parse::<OperationType>().unwrap(), OperationType::Create);
        assert_eq!("DELETE".parse::<OperationType>().unwrap(), OperationType::Delete);
        assert!("upsert".parse::<OperationType>().is_err());
    }
}
