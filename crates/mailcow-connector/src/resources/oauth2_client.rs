//! OAuth2 client definition
//!
//! Everything except the redirect URI is server-assigned, and the create
//! reply echoes nothing useful; the new id is located by scanning the
//! client collection for the redirect URI. Clients are replaced, never
//! edited.

use crate::definition::{
    EndpointSet, IdStrategy, LookupMatch, LookupSpec, ReadOptions, ResourceDefinition,
};
use crate::descriptor::{FieldSpec, ResourceDescriptor};
use crate::types::ResourceKind;

pub(super) fn definition() -> ResourceDefinition {
    let descriptor = ResourceDescriptor::new(ResourceKind::OAuth2Client)
        .with_field(FieldSpec::text("redirect_uri").immutable())
        .with_field(FieldSpec::text("client_id").computed())
        .with_field(FieldSpec::text("client_secret").computed().secret())
        .with_field(FieldSpec::text("scope").computed());

    let endpoints = EndpointSet::new(
        "/api/v1/add/oauth2-client",
        "/api/v1/get/oauth2-client/{id}",
        "/api/v1/delete/oauth2-client",
    );

    ResourceDefinition::new(
        descriptor,
        endpoints,
        IdStrategy::FromLookup(LookupSpec {
            endpoint: "/api/v1/get/oauth2-client/all",
            matches: &[LookupMatch {
                local: "redirect_uri",
                remote: "redirect_uri",
            }],
            id_field: "id",
        }),
        "redirect_uri",
    )
    .with_read_options(ReadOptions {
        presence_field: Some("client_id"),
        ..ReadOptions::default()
    })
}
