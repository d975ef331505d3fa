//! Resource descriptors
//!
//! One static field table per resource kind, consumed generically by the
//! field mapper and the lifecycle driver. Per-kind quirks (renames,
//! exclusions, unit conversions) hang off the field specs instead of
//! being repeated in every operation path.

use crate::types::ResourceKind;
use crate::value::{FieldKind, FieldValue};

/// Declaration of one configuration field.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: &'static str,
    kind: FieldKind,
    default: Option<FieldValue>,
    immutable: bool,
    remote_name: Option<&'static str>,
    byte_quantity: bool,
    secret: bool,
    computed: bool,
}

impl FieldSpec {
    fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            default: None,
            immutable: false,
            remote_name: None,
            byte_quantity: false,
            secret: false,
            computed: false,
        }
    }

    /// Declare a boolean field.
    #[must_use]
    pub fn bool(name: &'static str) -> Self {
        Self::new(name, FieldKind::Bool)
    }

    /// Declare an integer field.
    #[must_use]
    pub fn integer(name: &'static str) -> Self {
        Self::new(name, FieldKind::Integer)
    }

    /// Declare a string field.
    #[must_use]
    pub fn text(name: &'static str) -> Self {
        Self::new(name, FieldKind::Text)
    }

    /// Declare a string-list field.
    #[must_use]
    pub fn text_list(name: &'static str) -> Self {
        Self::new(name, FieldKind::TextList)
    }

    /// Set the default value.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<FieldValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Mark the field immutable after create.
    #[must_use]
    pub fn immutable(mut self) -> Self {
        self.immutable = true;
        self
    }

    /// Set the remote field name when it differs from the local name.
    #[must_use]
    pub fn remote(mut self, name: &'static str) -> Self {
        self.remote_name = Some(name);
        self
    }

    /// Mark the field as a byte quantity reported in bytes but
    /// configured in MiB.
    #[must_use]
    pub fn bytes(mut self) -> Self {
        self.byte_quantity = true;
        self
    }

    /// Mark the field as sensitive (never echoed by reads).
    #[must_use]
    pub fn secret(mut self) -> Self {
        self.secret = true;
        self
    }

    /// Mark the field as server-assigned: populated by reads, never sent.
    #[must_use]
    pub fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    /// Get the local field name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Get the declared semantic kind.
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Get the default value, if any.
    #[must_use]
    pub fn default(&self) -> Option<&FieldValue> {
        self.default.as_ref()
    }

    /// Check if the field is immutable after create.
    #[must_use]
    pub fn is_immutable(&self) -> bool {
        self.immutable
    }

    /// Get the remote field name (falls back to the local name).
    #[must_use]
    pub fn remote_name(&self) -> &'static str {
        self.remote_name.unwrap_or(self.name)
    }

    /// Check if the field is a byte quantity.
    #[must_use]
    pub fn is_byte_quantity(&self) -> bool {
        self.byte_quantity
    }

    /// Check if the field is sensitive.
    #[must_use]
    pub fn is_secret(&self) -> bool {
        self.secret
    }

    /// Check if the field is server-assigned.
    #[must_use]
    pub fn is_computed(&self) -> bool {
        self.computed
    }
}

/// Static description of one resource kind: its ordered field table.
///
/// Defined once at process start, shared read-only across operations.
#[derive(Debug, Clone)]
pub struct ResourceDescriptor {
    kind: ResourceKind,
    fields: Vec<FieldSpec>,
}

impl ResourceDescriptor {
    /// Create an empty descriptor for a resource kind.
    #[must_use]
    pub fn new(kind: ResourceKind) -> Self {
        Self {
            kind,
            fields: Vec::new(),
        }
    }

    /// Add a field declaration.
    ///
    /// Field names are unique within a descriptor; a duplicate is a
    /// defect in the resource definition table.
    #[must_use]
    pub fn with_field(mut self, field: FieldSpec) -> Self {
        assert!(
            self.field(field.name()).is_none(),
            "duplicate field '{}' in {} descriptor",
            field.name(),
            self.kind
        );
        self.fields.push(field);
        self
    }

    /// Get the resource kind.
    #[must_use]
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Get a field declaration by local name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Iterate over the field declarations in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter()
    }

    /// Get all local field names in declaration order.
    #[must_use]
    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(FieldSpec::name).collect()
    }

    /// Get the number of declared fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the descriptor declares no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
