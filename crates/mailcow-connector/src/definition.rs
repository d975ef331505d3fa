//! Resource definitions
//!
//! A `ResourceDefinition` bundles everything the lifecycle driver needs
//! to run one resource kind: the field descriptor, the endpoint set, the
//! id derivation contract and the per-kind mapping quirks. The ten
//! concrete definitions live in [`crate::resources`].

use crate::descriptor::ResourceDescriptor;
use crate::error::{ConnectorError, ConnectorResult};
use crate::payload::{MappingOptions, Payload};
use crate::receipt::ReceiptExpectation;
use crate::state::ResourceState;
use crate::value::FieldValue;

/// Per-kind adjustment applied to an in-progress payload after generic
/// mapping (sentinel substitution, duplicated confirmation fields, ...).
pub type PayloadHook = fn(&ResourceState, &mut Payload) -> ConnectorResult<()>;

/// The endpoint bindings for one resource kind.
///
/// Read endpoints carry an `{id}` placeholder; lookup endpoints may
/// reference state fields the same way (e.g. `{username}`).
#[derive(Debug, Clone)]
pub struct EndpointSet {
    create: &'static str,
    read: &'static str,
    update: Option<&'static str>,
    delete: &'static str,
}

impl EndpointSet {
    /// Declare the endpoints for a kind without update support.
    #[must_use]
    pub fn new(create: &'static str, read: &'static str, delete: &'static str) -> Self {
        Self {
            create,
            read,
            update: None,
            delete,
        }
    }

    /// Declare the update endpoint.
    #[must_use]
    pub fn with_update(mut self, update: &'static str) -> Self {
        self.update = Some(update);
        self
    }

    /// Get the create endpoint.
    #[must_use]
    pub fn create(&self) -> &'static str {
        self.create
    }

    /// Get the read endpoint with the id substituted in.
    #[must_use]
    pub fn read_path(&self, id: &str) -> String {
        self.read.replace("{id}", id)
    }

    /// Get the update endpoint, if the kind supports updates.
    #[must_use]
    pub fn update(&self) -> Option<&'static str> {
        self.update
    }

    /// Get the delete endpoint.
    #[must_use]
    pub fn delete(&self) -> &'static str {
        self.delete
    }
}

/// How a kind's identifier is derived after a successful create.
#[derive(Debug, Clone)]
pub enum IdStrategy {
    /// The id echoes one desired-state field (e.g. the domain name).
    FromField(&'static str),
    /// The id joins several fields (e.g. `local_part@domain`).
    FromFields {
        fields: &'static [&'static str],
        separator: &'static str,
    },
    /// The id sits at a declared position in the create receipt.
    FromReceipt(ReceiptExpectation),
    /// The API does not echo an id; an immediate collection read-back
    /// locates the new entity by field match.
    FromLookup(LookupSpec),
}

/// A collection read-back that locates an entity by exact field match.
#[derive(Debug, Clone)]
pub struct LookupSpec {
    /// Collection endpoint; may reference state fields as `{field}`.
    pub endpoint: &'static str,
    /// Field matches that must all hold, compared as strings.
    pub matches: &'static [LookupMatch],
    /// Remote key holding the entity's id.
    pub id_field: &'static str,
}

/// One exact-match condition of a lookup.
#[derive(Debug, Clone, Copy)]
pub struct LookupMatch {
    /// Local field supplying the expected value.
    pub local: &'static str,
    /// Remote key carrying the candidate value.
    pub remote: &'static str,
}

/// Read-direction options for one kind.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOptions {
    /// Read-side local-to-remote renames, taking precedence over the
    /// field spec's remote name.
    pub rename: &'static [(&'static str, &'static str)],
    /// Remote key whose absence marks the entity as missing. The API
    /// answers 200 with an empty object for unknown ids.
    pub presence_field: Option<&'static str>,
    /// Remote key of a nested object holding some fields (the mailbox
    /// protocol flags live under `attributes`).
    pub nested_object: Option<&'static str>,
    /// Local fields read from the nested object.
    pub nested_fields: &'static [&'static str],
    /// Fields reconstructed from a nested rate-limit object, as
    /// (local field, remote key) pairs.
    pub rate_limit: &'static [(&'static str, &'static str)],
    /// Remote key matched against the requested id when the read
    /// endpoint returns a collection instead of a single entity.
    pub collection_match: Option<&'static str>,
}

/// Shape of the create request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CreateShape {
    /// The payload is the request body (the `add` endpoints).
    #[default]
    Payload,
    /// The payload rides as an edit attribute map; used for singleton
    /// kinds whose API only exposes an edit endpoint.
    EditAttr,
}

/// Everything the lifecycle driver needs to run one resource kind.
#[derive(Debug, Clone)]
pub struct ResourceDefinition {
    descriptor: ResourceDescriptor,
    endpoints: EndpointSet,
    id: IdStrategy,
    context_field: &'static str,
    create_options: MappingOptions,
    update_options: MappingOptions,
    read_options: ReadOptions,
    create_shape: CreateShape,
    finalize_create: Option<PayloadHook>,
    finalize_update: Option<PayloadHook>,
}

impl ResourceDefinition {
    /// Create a definition with default mapping options.
    ///
    /// `context_field` names the primary identifying field quoted in
    /// failure diagnostics.
    #[must_use]
    pub fn new(
        descriptor: ResourceDescriptor,
        endpoints: EndpointSet,
        id: IdStrategy,
        context_field: &'static str,
    ) -> Self {
        Self {
            descriptor,
            endpoints,
            id,
            context_field,
            create_options: MappingOptions::NONE,
            update_options: MappingOptions::NONE,
            read_options: ReadOptions::default(),
            create_shape: CreateShape::Payload,
            finalize_create: None,
            finalize_update: None,
        }
    }

    /// Set forward mapping options for create.
    #[must_use]
    pub fn with_create_options(mut self, options: MappingOptions) -> Self {
        self.create_options = options;
        self
    }

    /// Set forward mapping options for update.
    #[must_use]
    pub fn with_update_options(mut self, options: MappingOptions) -> Self {
        self.update_options = options;
        self
    }

    /// Set read-direction options.
    #[must_use]
    pub fn with_read_options(mut self, options: ReadOptions) -> Self {
        self.read_options = options;
        self
    }

    /// Set the create request body shape.
    #[must_use]
    pub fn with_create_shape(mut self, shape: CreateShape) -> Self {
        self.create_shape = shape;
        self
    }

    /// Set the payload hook applied after create mapping.
    #[must_use]
    pub fn with_finalize_create(mut self, hook: PayloadHook) -> Self {
        self.finalize_create = Some(hook);
        self
    }

    /// Set the payload hook applied after update mapping.
    #[must_use]
    pub fn with_finalize_update(mut self, hook: PayloadHook) -> Self {
        self.finalize_update = Some(hook);
        self
    }

    /// Get the field descriptor.
    #[must_use]
    pub fn descriptor(&self) -> &ResourceDescriptor {
        &self.descriptor
    }

    /// Get the endpoint set.
    #[must_use]
    pub fn endpoints(&self) -> &EndpointSet {
        &self.endpoints
    }

    /// Get the id derivation strategy.
    #[must_use]
    pub fn id(&self) -> &IdStrategy {
        &self.id
    }

    /// Get the identifying context for diagnostics.
    #[must_use]
    pub fn context(&self, state: &ResourceState) -> String {
        state
            .get(self.context_field)
            .map(FieldValue::display_string)
            .unwrap_or_default()
    }

    /// Get the create mapping options.
    #[must_use]
    pub fn create_options(&self) -> MappingOptions {
        self.create_options
    }

    /// Get the update mapping options.
    #[must_use]
    pub fn update_options(&self) -> MappingOptions {
        self.update_options
    }

    /// Get the read options.
    #[must_use]
    pub fn read_options(&self) -> ReadOptions {
        self.read_options
    }

    /// Get the create body shape.
    #[must_use]
    pub fn create_shape(&self) -> CreateShape {
        self.create_shape
    }

    /// Get the create payload hook, if any.
    #[must_use]
    pub fn finalize_create(&self) -> Option<PayloadHook> {
        self.finalize_create
    }

    /// Get the update payload hook, if any.
    #[must_use]
    pub fn finalize_update(&self) -> Option<PayloadHook> {
        self.finalize_update
    }
}

/// Substitute `{field}` placeholders in an endpoint with state values.
pub(crate) fn substitute_fields(endpoint: &str, state: &ResourceState) -> ConnectorResult<String> {
    let mut path = String::with_capacity(endpoint.len());
    let mut rest = endpoint;
    while let Some(start) = rest.find('{') {
        let Some(end) = rest[start..].find('}') else {
            return Err(ConnectorError::invalid_configuration(format!(
                "unterminated placeholder in endpoint '{endpoint}'"
            )));
        };
        path.push_str(&rest[..start]);
        let name = &rest[start + 1..start + end];
        let value = state.get(name).ok_or_else(|| {
            ConnectorError::invalid_configuration(format!(
                "endpoint '{endpoint}' references unset field '{name}'"
            ))
        })?;
        path.push_str(&value.display_string());
        rest = &rest[start + end + 1..];
    }
    path.push_str(rest);
    Ok(path)
}
