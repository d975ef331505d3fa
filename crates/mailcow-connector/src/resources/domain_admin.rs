//! Domain-admin definition
//!
//! Identified by username. The API only lists domain admins as a
//! collection, so reads scan it; the password never comes back and is
//! excluded from updates.

use crate::definition::{EndpointSet, IdStrategy, ReadOptions, ResourceDefinition};
use crate::descriptor::{FieldSpec, ResourceDescriptor};
use crate::error::ConnectorResult;
use crate::payload::{MappingOptions, Payload};
use crate::state::ResourceState;
use crate::types::ResourceKind;

pub(super) fn definition() -> ResourceDefinition {
    let descriptor = ResourceDescriptor::new(ResourceKind::DomainAdmin)
        .with_field(FieldSpec::bool("active").with_default(true))
        .with_field(FieldSpec::text("username").immutable())
        .with_field(FieldSpec::text_list("domains"))
        .with_field(FieldSpec::text("password").secret());

    let endpoints = EndpointSet::new(
        "/api/v1/add/domain-admin",
        "/api/v1/get/domain-admin/all",
        "/api/v1/delete/domain-admin",
    )
    .with_update("/api/v1/edit/domain-admin");

    ResourceDefinition::new(
        descriptor,
        endpoints,
        IdStrategy::FromField("username"),
        "username",
    )
    .with_update_options(MappingOptions {
        exclude: &["password"],
        rename: &[],
    })
    .with_read_options(ReadOptions {
        collection_match: Some("username"),
        ..ReadOptions::default()
    })
    .with_finalize_create(confirm_password)
}

/// The create endpoint expects the password duplicated as `password2`.
fn confirm_password(_state: &ResourceState, payload: &mut Payload) -> ConnectorResult<()> {
    if let Some(password) = payload.get("password").cloned() {
        payload.insert("password2", password);
    }
    Ok(())
}
