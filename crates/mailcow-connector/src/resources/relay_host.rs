//! Relay-host definition
//!
//! Sender-dependent transport entries for third-party SMTP relays. The
//! create reply does not echo the numeric id; it is located by matching
//! hostname and username in the collection. The API answers reads with
//! 200 and an empty object when the id is unknown.

use crate::definition::{
    EndpointSet, IdStrategy, LookupMatch, LookupSpec, ReadOptions, ResourceDefinition,
};
use crate::descriptor::{FieldSpec, ResourceDescriptor};
use crate::types::ResourceKind;

pub(super) fn definition() -> ResourceDefinition {
    let descriptor = ResourceDescriptor::new(ResourceKind::RelayHost)
        .with_field(FieldSpec::text("hostname"))
        .with_field(FieldSpec::text("username"))
        .with_field(FieldSpec::text("password").secret());

    let endpoints = EndpointSet::new(
        "/api/v1/add/relayhost",
        "/api/v1/get/relayhost/{id}",
        "/api/v1/delete/relayhost",
    )
    .with_update("/api/v1/edit/relayhost");

    ResourceDefinition::new(
        descriptor,
        endpoints,
        IdStrategy::FromLookup(LookupSpec {
            endpoint: "/api/v1/get/relayhost/all",
            matches: &[
                LookupMatch {
                    local: "hostname",
                    remote: "hostname",
                },
                LookupMatch {
                    local: "username",
                    remote: "username",
                },
            ],
            id_field: "id",
        }),
        "hostname",
    )
    .with_read_options(ReadOptions {
        presence_field: Some("hostname"),
        ..ReadOptions::default()
    })
}
