//! Sync-job definition
//!
//! Wraps an imapsync invocation pulling mail from a remote host into a
//! local mailbox. The create reply does not echo the numeric id; it is
//! located by listing the owner's jobs and matching the source account.
//! On reads the owning mailbox comes back as `user2`.

use crate::definition::{
    EndpointSet, IdStrategy, LookupMatch, LookupSpec, ReadOptions, ResourceDefinition,
};
use crate::descriptor::{FieldSpec, ResourceDescriptor};
use crate::types::ResourceKind;

pub(super) fn definition() -> ResourceDefinition {
    let descriptor = ResourceDescriptor::new(ResourceKind::SyncJob)
        .with_field(FieldSpec::bool("active").with_default(true))
        .with_field(FieldSpec::integer("mins_interval").with_default(20))
        .with_field(FieldSpec::bool("automap").with_default(true))
        .with_field(FieldSpec::text("custom_params").with_default(""))
        .with_field(FieldSpec::bool("delete1").with_default(false))
        .with_field(FieldSpec::bool("delete2").with_default(false))
        .with_field(FieldSpec::bool("delete2duplicates").with_default(true))
        .with_field(FieldSpec::text("exclude").with_default(""))
        .with_field(FieldSpec::integer("maxage").with_default(0))
        .with_field(FieldSpec::text("maxbytespersecond").with_default("0"))
        .with_field(FieldSpec::bool("skipcrossduplicates").with_default(false))
        .with_field(FieldSpec::bool("subscribeall").with_default(true))
        .with_field(FieldSpec::text("subfolder2").with_default(""))
        .with_field(FieldSpec::integer("timeout2").with_default(600))
        .with_field(FieldSpec::text("enc1").with_default("SSL"))
        .with_field(FieldSpec::text("host1"))
        .with_field(FieldSpec::text("password1").secret())
        .with_field(FieldSpec::integer("port1").with_default(143))
        .with_field(FieldSpec::integer("timeout1").with_default(600))
        .with_field(FieldSpec::text("user1"))
        .with_field(FieldSpec::text("username").immutable());

    let endpoints = EndpointSet::new(
        "/api/v1/add/syncjob",
        "/api/v1/get/syncjobs/all",
        "/api/v1/delete/syncjob",
    )
    .with_update("/api/v1/edit/syncjob");

    ResourceDefinition::new(
        descriptor,
        endpoints,
        IdStrategy::FromLookup(LookupSpec {
            endpoint: "/api/v1/get/syncjobs/{username}",
            matches: &[
                LookupMatch {
                    local: "username",
                    remote: "user2",
                },
                LookupMatch {
                    local: "user1",
                    remote: "user1",
                },
            ],
            id_field: "id",
        }),
        "username",
    )
    .with_read_options(ReadOptions {
        rename: &[("username", "user2")],
        collection_match: Some("id"),
        ..ReadOptions::default()
    })
}
