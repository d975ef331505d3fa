//! Field mapping between state and remote payloads
//!
//! Forward direction builds the request payload for create and update
//! calls (renames, exclusions, 0/1 boolean coercion, dirty-only updates).
//! Reverse direction decodes remote JSON back into typed field values,
//! including bytes→MiB unit conversion and rate-limit reconstruction.

use serde_json::{Map, Value};

use crate::descriptor::{FieldSpec, ResourceDescriptor};
use crate::error::ConnectorResult;
use crate::state::ResourceState;
use crate::value::{self, scalar_to_string, FieldValue};

/// Bytes per MiB; quota fields are reported in bytes but configured in MiB.
const BYTES_PER_MIB: i64 = 1_048_576;

/// Per-kind mapping options for one forward direction.
///
/// Rename tables and exclusion lists are supplied by the resource
/// definition, not stored on the descriptor.
#[derive(Debug, Clone, Copy, Default)]
pub struct MappingOptions {
    /// Local field names to leave out of the payload.
    pub exclude: &'static [&'static str],
    /// Local-to-remote renames, taking precedence over the field spec.
    pub rename: &'static [(&'static str, &'static str)],
}

impl MappingOptions {
    /// Options with no exclusions and no renames.
    pub const NONE: MappingOptions = MappingOptions {
        exclude: &[],
        rename: &[],
    };

    fn is_excluded(&self, name: &str) -> bool {
        self.exclude.contains(&name)
    }

    fn remote_name(&self, field: &FieldSpec) -> &'static str {
        self.rename
            .iter()
            .find(|(local, _)| *local == field.name())
            .map_or_else(|| field.remote_name(), |(_, remote)| *remote)
    }
}

/// An in-progress remote payload.
///
/// Built by the generic forward mapping, then open for per-kind
/// adjustment (sentinel substitution adds flag fields and removes the
/// original) before finalization.
#[derive(Debug, Clone, Default)]
pub struct Payload {
    entries: Map<String, Value>,
}

impl Payload {
    /// Create an empty payload.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.entries.insert(name.into(), value);
    }

    /// Remove an entry, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.entries.remove(name)
    }

    /// Get an entry.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    /// Check if an entry exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Get all entry names.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Get the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the payload is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finalize into a JSON object.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.entries)
    }
}

/// Build the payload for a create call.
///
/// Copies every non-excluded, non-computed field that has a value,
/// under its remote name, with booleans coerced to 0/1.
#[must_use]
pub fn build_create_payload(
    descriptor: &ResourceDescriptor,
    state: &ResourceState,
    options: MappingOptions,
) -> Payload {
    let mut payload = Payload::new();
    for field in descriptor.fields() {
        if field.is_computed() || options.is_excluded(field.name()) {
            continue;
        }
        if let Some(value) = state.get(field.name()) {
            payload.insert(options.remote_name(field), value.to_wire());
        }
    }
    payload
}

/// Build the attribute map for an update call.
///
/// Same mapping as create, restricted to dirty fields; immutable and
/// computed fields are never sent.
#[must_use]
pub fn build_update_attrs(
    descriptor: &ResourceDescriptor,
    state: &ResourceState,
    options: MappingOptions,
) -> Payload {
    let mut payload = Payload::new();
    for field in descriptor.fields() {
        if field.is_computed() || field.is_immutable() || options.is_excluded(field.name()) {
            continue;
        }
        if !state.is_dirty(field.name()) {
            continue;
        }
        if let Some(value) = state.get(field.name()) {
            payload.insert(options.remote_name(field), value.to_wire());
        }
    }
    payload
}

/// Decode one remote value through a field's declaration.
///
/// Returns `None` when the remote value is absent (`null`) and the field
/// is not list-typed; a `null` list decodes as the empty list. Byte
/// quantities are converted from bytes to MiB after the integer decode.
pub fn decode_field(field: &FieldSpec, remote: &Value) -> ConnectorResult<Option<FieldValue>> {
    if remote.is_null() && field.kind() != crate::value::FieldKind::TextList {
        return Ok(None);
    }

    let mut decoded = value::decode(field.kind(), field.name(), remote)?;
    if field.is_byte_quantity() {
        if let FieldValue::Int(bytes) = decoded {
            decoded = FieldValue::Int(bytes / BYTES_PER_MIB);
        }
    }
    Ok(Some(decoded))
}

/// Reconstruct a rate-limit string from the nested remote object.
///
/// The server reports rate limits as `{"value": "10", "frame": "s"}`;
/// the configured form is the concatenation `"10s"`. Returns `None` when
/// either sub-field is missing.
#[must_use]
pub fn decode_rate_limit(remote: &Value) -> Option<String> {
    let obj = remote.as_object()?;
    let value = obj.get("value")?;
    let frame = obj.get("frame")?;
    Some(format!(
        "{}{}",
        scalar_to_string(value),
        scalar_to_string(frame)
    ))
}

/// Split a configured rate-limit string into its value and frame parts.
///
/// `"10s"` → `(10, "s")`. The frame is the final character; the rest
/// must parse as an integer.
pub fn split_rate_limit(rate_limit: &str) -> ConnectorResult<(i64, String)> {
    let mut chars = rate_limit.chars();
    let frame = chars.next_back().ok_or_else(|| {
        crate::error::ConnectorError::invalid_configuration("empty rate limit")
    })?;
    let value = chars.as_str().parse::<i64>().map_err(|_| {
        crate::error::ConnectorError::invalid_configuration(format!(
            "invalid rate limit '{rate_limit}', expected a decimal with unit suffix"
        ))
    })?;
    Ok((value, frame.to_string()))
}
