//! Desired and observed resource state
//!
//! The set of field values for one resource instance, with per-field
//! dirty tracking. The orchestration host fills it in before an
//! operation; reads fill in the observed counterpart.

use std::collections::{HashMap, HashSet};

use crate::descriptor::ResourceDescriptor;
use crate::value::FieldValue;

/// Field values for one resource instance, keyed by local field name.
#[derive(Debug, Clone, Default)]
pub struct ResourceState {
    values: HashMap<String, FieldValue>,
    dirty: HashSet<String>,
}

impl ResourceState {
    /// Create an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a state seeded with a descriptor's default values.
    #[must_use]
    pub fn with_defaults(descriptor: &ResourceDescriptor) -> Self {
        let mut state = Self::new();
        for field in descriptor.fields() {
            if let Some(default) = field.default() {
                state.observe(field.name(), default.clone());
            }
        }
        state
    }

    /// Set a field value, marking it dirty.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        let name = name.into();
        self.dirty.insert(name.clone());
        self.values.insert(name, value.into());
    }

    /// Set a field value using builder pattern (marks it dirty).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Record a value observed from the server without marking it dirty.
    pub fn observe(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// Get a field value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// Get a string field value.
    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_str)
    }

    /// Get a boolean field value.
    #[must_use]
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(FieldValue::as_bool)
    }

    /// Get an integer field value.
    #[must_use]
    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(FieldValue::as_int)
    }

    /// Get a string-list field value.
    #[must_use]
    pub fn get_list(&self, name: &str) -> Option<&[String]> {
        self.get(name).and_then(FieldValue::as_list)
    }

    /// Check if a field has a value.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Check if a field changed since the last known applied state.
    #[must_use]
    pub fn is_dirty(&self, name: &str) -> bool {
        self.dirty.contains(name)
    }

    /// Mark a field dirty without touching its value.
    pub fn mark_dirty(&mut self, name: impl Into<String>) {
        self.dirty.insert(name.into());
    }

    /// Clear all dirty flags (after a successful apply).
    pub fn clear_dirty(&mut self) {
        self.dirty.clear();
    }

    /// Get the names of all dirty fields.
    #[must_use]
    pub fn dirty_fields(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.dirty.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Get the number of fields with values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the state holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over all field values.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.values.iter()
    }
}
