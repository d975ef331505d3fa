//! # Mailcow Connector Framework
//!
//! Core abstractions for reconciling declared mail-server configuration
//! against the mailcow administration API.
//!
//! An orchestration host describes the desired state of a resource
//! instance (a domain, a mailbox, an alias, ...) as a set of typed
//! fields and drives it through a create/read/update/delete lifecycle.
//! This crate owns the adapter between that declarative world and the
//! loosely-typed remote API: payload construction, reply-envelope
//! interpretation, id derivation from heterogeneous replies, and
//! reverse mapping of remote JSON into typed values.
//!
//! ## Example
//!
//! ```ignore
//! use mailcow_connector::prelude::*;
//!
//! let driver = Provisioner::new(transport);
//! let definition = resources::definition(ResourceKind::Domain);
//!
//! let desired = ResourceState::with_defaults(definition.descriptor())
//!     .with("domain", "example.com")
//!     .with("aliases", 400);
//!
//! let id = driver.create(&definition, &desired).await?;
//! let observed = driver.read(&definition, &id).await?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`types`] - `ResourceKind` and operation enums
//! - [`error`] - Error taxonomy surfaced to the orchestration host
//! - [`value`] - Typed field values and wire coercions
//! - [`envelope`] - Step-record reply envelopes and their interpretation
//! - [`receipt`] - Positional id extraction from create receipts
//! - [`descriptor`] - Field tables per resource kind
//! - [`state`] - Desired/observed state with dirty tracking
//! - [`payload`] - Forward and reverse field mapping
//! - [`definition`] - Per-kind endpoint/id/mapping bundles
//! - [`transport`] - The outbound HTTP seam
//! - [`lifecycle`] - The create/read/update/delete driver
//! - [`resources`] - The ten concrete resource definitions

pub mod definition;
pub mod descriptor;
pub mod envelope;
pub mod error;
pub mod lifecycle;
pub mod payload;
pub mod receipt;
pub mod resources;
pub mod state;
pub mod transport;
pub mod types;
pub mod value;

/// Prelude module for convenient imports.
///
/// ```
/// use mailcow_connector::prelude::*;
/// ```
pub mod prelude {
    // Types and enums
    pub use crate::types::{OperationType, ResourceKind};

    // Error handling
    pub use crate::error::{ConnectorError, ConnectorResult};

    // Values and state
    pub use crate::state::ResourceState;
    pub use crate::value::{FieldKind, FieldValue};

    // Descriptors and definitions
    pub use crate::definition::{
        CreateShape, EndpointSet, IdStrategy, LookupMatch, LookupSpec, ReadOptions,
        ResourceDefinition,
    };
    pub use crate::descriptor::{FieldSpec, ResourceDescriptor};

    // Envelope interpretation
    pub use crate::envelope::{Message, Outcome, ResponseEnvelope, StepRecord};
    pub use crate::receipt::ReceiptExpectation;

    // Mapping
    pub use crate::payload::{MappingOptions, Payload};

    // Driver and transport
    pub use crate::lifecycle::Provisioner;
    pub use crate::transport::ApiTransport;

    // Definitions
    pub use crate::resources;
}

// Re-export async_trait for transport implementors
pub use async_trait::async_trait;
