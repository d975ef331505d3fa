//! Identity-provider definition
//!
//! A singleton: the server keeps exactly one external identity provider
//! configuration. There is no add endpoint; creation rides the edit
//! call, and the read endpoint takes no id.

use crate::definition::{CreateShape, EndpointSet, IdStrategy, ReadOptions, ResourceDefinition};
use crate::descriptor::{FieldSpec, ResourceDescriptor};
use crate::types::ResourceKind;

pub(super) fn definition() -> ResourceDefinition {
    let descriptor = ResourceDescriptor::new(ResourceKind::IdentityProvider)
        .with_field(
            FieldSpec::text("authsource")
                .with_default("keycloak")
                .immutable(),
        )
        .with_field(FieldSpec::text("server_url").immutable())
        .with_field(FieldSpec::text("realm").immutable())
        .with_field(FieldSpec::text("client_id").immutable())
        .with_field(FieldSpec::text("client_secret").immutable().secret())
        .with_field(FieldSpec::text("redirect_url").immutable())
        .with_field(FieldSpec::text("version").immutable())
        .with_field(FieldSpec::bool("import_users").with_default(false))
        .with_field(FieldSpec::bool("ignore_ssl_error").with_default(false))
        .with_field(FieldSpec::bool("mailpassword_flow").with_default(false))
        .with_field(FieldSpec::bool("periodic_sync").with_default(true))
        .with_field(FieldSpec::integer("sync_interval").with_default(15));

    let endpoints = EndpointSet::new(
        "/api/v1/edit/identity-provider",
        "/api/v1/get/identity-provider",
        "/api/v1/delete/identity-provider",
    );

    ResourceDefinition::new(
        descriptor,
        endpoints,
        IdStrategy::FromField("authsource"),
        "authsource",
    )
    .with_create_shape(CreateShape::EditAttr)
    .with_read_options(ReadOptions {
        presence_field: Some("authsource"),
        ..ReadOptions::default()
    })
}
