//! DKIM key definition
//!
//! Keys are generated, never edited: the public key and DNS TXT record
//! are server-assigned. The create endpoint names the domain field
//! `domains` and the key length `key_size`; reads report the length
//! under its plain name.

use crate::definition::{EndpointSet, IdStrategy, ReadOptions, ResourceDefinition};
use crate::descriptor::{FieldSpec, ResourceDescriptor};
use crate::types::ResourceKind;

pub(super) fn definition() -> ResourceDefinition {
    let descriptor = ResourceDescriptor::new(ResourceKind::DkimKey)
        .with_field(FieldSpec::text("domain").immutable().remote("domains"))
        .with_field(FieldSpec::integer("length").immutable().remote("key_size"))
        .with_field(
            FieldSpec::text("dkim_selector")
                .with_default("dkim")
                .immutable(),
        )
        .with_field(FieldSpec::text("pubkey").computed())
        .with_field(FieldSpec::text("dkim_txt").computed());

    let endpoints = EndpointSet::new(
        "/api/v1/add/dkim",
        "/api/v1/get/dkim/{id}",
        "/api/v1/delete/dkim",
    );

    ResourceDefinition::new(descriptor, endpoints, IdStrategy::FromField("domain"), "domain")
        .with_read_options(ReadOptions {
            rename: &[("length", "length")],
            presence_field: Some("pubkey"),
            ..ReadOptions::default()
        })
}
