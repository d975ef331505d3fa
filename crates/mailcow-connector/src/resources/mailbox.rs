//! Mailbox definition
//!
//! The identifier is the full address `local_part@domain`. The create
//! endpoint wants the password twice; reads report the protocol and TLS
//! flags under a nested `attributes` object as "1"/"0" strings.

use crate::definition::{EndpointSet, IdStrategy, ReadOptions, ResourceDefinition};
use crate::descriptor::{FieldSpec, ResourceDescriptor};
use crate::error::ConnectorResult;
use crate::payload::Payload;
use crate::state::ResourceState;
use crate::types::ResourceKind;

const ATTRIBUTE_FLAGS: &[&str] = &[
    "force_pw_update",
    "tls_enforce_in",
    "tls_enforce_out",
    "sogo_access",
    "imap_access",
    "pop3_access",
    "smtp_access",
    "sieve_access",
];

pub(super) fn definition() -> ResourceDefinition {
    let descriptor = ResourceDescriptor::new(ResourceKind::Mailbox)
        .with_field(FieldSpec::bool("active").with_default(true))
        .with_field(FieldSpec::text("domain").immutable())
        .with_field(FieldSpec::text("local_part").immutable())
        .with_field(FieldSpec::text("full_name").remote("name"))
        .with_field(FieldSpec::text("password").secret())
        .with_field(FieldSpec::integer("quota").bytes())
        .with_field(FieldSpec::bool("force_pw_update").with_default(true))
        .with_field(FieldSpec::bool("tls_enforce_in").with_default(false))
        .with_field(FieldSpec::bool("tls_enforce_out").with_default(false))
        .with_field(FieldSpec::bool("sogo_access").with_default(true))
        .with_field(FieldSpec::bool("imap_access").with_default(true))
        .with_field(FieldSpec::bool("pop3_access").with_default(true))
        .with_field(FieldSpec::bool("smtp_access").with_default(true))
        .with_field(FieldSpec::bool("sieve_access").with_default(true));

    let endpoints = EndpointSet::new(
        "/api/v1/add/mailbox",
        "/api/v1/get/mailbox/{id}",
        "/api/v1/delete/mailbox",
    )
    .with_update("/api/v1/edit/mailbox");

    ResourceDefinition::new(
        descriptor,
        endpoints,
        IdStrategy::FromFields {
            fields: &["local_part", "domain"],
            separator: "@",
        },
        "local_part",
    )
    .with_read_options(ReadOptions {
        presence_field: Some("local_part"),
        nested_object: Some("attributes"),
        nested_fields: ATTRIBUTE_FLAGS,
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
