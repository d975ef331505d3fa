//! Alias-domain definition
//!
//! Shares the alias response shape; the receipt token disambiguates an
//! alias-domain create from a plain alias create, and the id sits one
//! position earlier.

use crate::definition::{EndpointSet, IdStrategy, ReadOptions, ResourceDefinition};
use crate::descriptor::{FieldSpec, ResourceDescriptor};
use crate::receipt::ReceiptExpectation;
use crate::types::ResourceKind;

pub(super) fn definition() -> ResourceDefinition {
    let descriptor = ResourceDescriptor::new(ResourceKind::DomainAlias)
        .with_field(FieldSpec::bool("active").with_default(true))
        .with_field(FieldSpec::text("alias_domain").immutable())
        .with_field(FieldSpec::text("target_domain").immutable());

    let endpoints = EndpointSet::new(
        "/api/v1/add/alias-domain",
        "/api/v1/get/alias-domain/{id}",
        "/api/v1/delete/alias-domain",
    )
    .with_update("/api/v1/edit/alias-domain");

    ResourceDefinition::new(
        descriptor,
        endpoints,
        IdStrategy::FromReceipt(ReceiptExpectation::new("aliasd_added", 0, 1)),
        "alias_domain",
    )
    .with_read_options(ReadOptions {
        presence_field: Some("alias_domain"),
        ..ReadOptions::default()
    })
}
