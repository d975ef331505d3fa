//! Alias definition
//!
//! The server assigns a numeric id, announced positionally in the create
//! receipt. A handful of reserved goto addresses are not real
//! destinations but spam/ham/null switches; they travel as separate flag
//! fields with the goto entry removed.

use serde_json::json;

use crate::definition::{EndpointSet, IdStrategy, ReadOptions, ResourceDefinition};
use crate::descriptor::{FieldSpec, ResourceDescriptor};
use crate::error::ConnectorResult;
use crate::payload::Payload;
use crate::receipt::ReceiptExpectation;
use crate::state::ResourceState;
use crate::types::ResourceKind;

/// Reserved goto addresses and the flag field each one stands for.
const GOTO_SENTINELS: &[(&str, &str)] = &[
    ("null@localhost", "goto_null"),
    ("spam@localhost", "goto_spam"),
    ("ham@localhost", "goto_ham"),
];

pub(super) fn definition() -> ResourceDefinition {
    let descriptor = ResourceDescriptor::new(ResourceKind::Alias)
        .with_field(FieldSpec::bool("active").with_default(true))
        .with_field(FieldSpec::text("address"))
        .with_field(FieldSpec::text("goto"))
        .with_field(FieldSpec::bool("goto_ham").with_default(false))
        .with_field(FieldSpec::bool("goto_null").with_default(false))
        .with_field(FieldSpec::bool("goto_spam").with_default(false))
        .with_field(FieldSpec::bool("sogo_visible").with_default(false))
        .with_field(FieldSpec::text("private_comment"))
        .with_field(FieldSpec::text("public_comment"));

    let endpoints = EndpointSet::new(
        "/api/v1/add/alias",
        "/api/v1/get/alias/{id}",
        "/api/v1/delete/alias",
    )
    .with_update("/api/v1/edit/alias");

    ResourceDefinition::new(
        descriptor,
        endpoints,
        IdStrategy::FromReceipt(ReceiptExpectation::new("alias_added", 0, 2)),
        "address",
    )
    .with_read_options(ReadOptions {
        presence_field: Some("id"),
        ..ReadOptions::default()
    })
    .with_finalize_create(substitute_goto)
    .with_finalize_update(substitute_goto)
}

/// Turn a reserved goto address into its flag field.
fn substitute_goto(_state: &ResourceState, payload: &mut Payload) -> ConnectorResult<()> {
    let Some(goto) = payload.get("goto").and_then(|v| v.as_str()) else {
        return Ok(());
    };
    if let Some((_, flag)) = GOTO_SENTINELS
        .iter()
        .find(|(sentinel, _)| *sentinel == goto)
    {
        payload.remove("goto");
        payload.insert(*flag, json!(1));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::{build_create_payload, MappingOptions};

    #[test]
    fn test_sentinel_goto_becomes_flag() {
        let definition = definition();
        let state = ResourceState::new()
            .with("address", "all@example.com")
            .with("goto", "spam@localhost");
        let mut payload =
            build_create_payload(definition.descriptor(), &state, MappingOptions::NONE);
        substitute_goto(&state, &mut payload).unwrap();

        assert!(!payload.contains("goto"));
        assert_eq!(payload.get("goto_spam"), Some(&json!(1)));
    }

    #[test]
    fn test_every_sentinel_maps_to_its_flag() {
        let definition = definition();
        for (sentinel, flag) in GOTO_SENTINELS {
            let state = ResourceState::new().with("goto", *sentinel);
            let mut payload =
                build_create_payload(definition.descriptor(), &state, MappingOptions::NONE);
            substitute_goto(&state, &mut payload).unwrap();
            assert!(!payload.contains("goto"), "{sentinel}");
            assert_eq!(payload.get(flag), Some(&json!(1)), "{sentinel}");
        }
    }

    #[test]
    fn test_ordinary_goto_is_left_alone() {
        let definition = definition();
        let state = ResourceState::new().with("goto", "jo@example.com");
        let mut payload =
            build_create_payload(definition.descriptor(), &state, MappingOptions::NONE);
        substitute_goto(&state, &mut payload).unwrap();

        assert_eq!(payload.get("goto"), Some(&json!("jo@example.com")));
        assert!(!payload.contains("goto_spam"));
    }
}
