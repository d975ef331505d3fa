//! Domain definition
//!
//! Quota fields are configured in MiB but reported in bytes; the rate
//! limit is configured as one string (`"10s"`) but travels split into a
//! value and a unit frame.

use serde_json::json;

use crate::definition::{EndpointSet, IdStrategy, ReadOptions, ResourceDefinition};
use crate::descriptor::{FieldSpec, ResourceDescriptor};
use crate::error::{ConnectorError, ConnectorResult};
use crate::payload::{split_rate_limit, Payload};
use crate::state::ResourceState;
use crate::types::ResourceKind;

pub(super) fn definition() -> ResourceDefinition {
    let descriptor = ResourceDescriptor::new(ResourceKind::Domain)
        .with_field(FieldSpec::bool("active").with_default(true))
        .with_field(FieldSpec::integer("aliases").with_default(400))
        .with_field(FieldSpec::bool("backupmx").with_default(false))
        .with_field(FieldSpec::integer("defquota").with_default(3072).bytes())
        .with_field(FieldSpec::text("description").with_default("mailcow domain"))
        .with_field(FieldSpec::text("domain").immutable())
        .with_field(FieldSpec::bool("gal").with_default(false))
        .with_field(FieldSpec::integer("mailboxes").with_default(10))
        .with_field(FieldSpec::integer("maxquota").with_default(10240).bytes())
        .with_field(FieldSpec::integer("quota").with_default(10240).bytes())
        .with_field(FieldSpec::bool("restart_sogo").with_default(true))
        .with_field(FieldSpec::bool("relay_all_recipients").with_default(false))
        .with_field(FieldSpec::bool("relay_unknown_only").with_default(false))
        .with_field(FieldSpec::text("rate_limit").with_default("10s"))
        .with_field(FieldSpec::text_list("tags"));

    let endpoints = EndpointSet::new(
        "/api/v1/add/domain",
        "/api/v1/get/domain/{id}",
        "/api/v1/delete/domain",
    )
    .with_update("/api/v1/edit/domain");

    ResourceDefinition::new(descriptor, endpoints, IdStrategy::FromField("domain"), "domain")
        .with_read_options(ReadOptions {
            rename: &[
                ("aliases", "max_num_aliases_for_domain"),
                ("defquota", "def_new_mailbox_quota"),
                ("domain", "domain_name"),
                ("mailboxes", "max_num_mboxes_for_domain"),
                ("maxquota", "max_quota_for_mbox"),
                ("quota", "max_quota_for_domain"),
            ],
            presence_field: Some("domain_name"),
            rate_limit: &[("rate_limit", "rl")],
            ..ReadOptions::default()
        })
        .with_finalize_create(split_rate_limit_entry)
        .with_finalize_update(split_rate_limit_entry)
}

/// Replace the `rate_limit` payload entry with `rl_value`/`rl_frame`.
fn split_rate_limit_entry(_state: &ResourceState, payload: &mut Payload) -> ConnectorResult<()> {
    let Some(entry) = payload.remove("rate_limit") else {
        return Ok(());
    };
    let rate = entry.as_str().ok_or_else(|| {
        ConnectorError::invalid_configuration("rate_limit must be a string".to_string())
    })?;
    let (value, frame) = split_rate_limit(rate)?;
    payload.insert("rl_value", json!(value));
    payload.insert("rl_frame", json!(frame));
    Ok(())
}
