//! Lifecycle driver
//!
//! Drives one resource instance through create/read/update/delete
//! against the administration API. Each operation issues exactly one
//! outbound call (a lookup read-back for kinds whose API does not echo
//! an id notwithstanding), interprets the reply envelope, and surfaces
//! every failure to the caller. The driver holds no per-instance state
//! and performs no locking; the orchestration host serializes operations
//! per identifier.

use serde_json::{json, Map, Value};
use tracing::{debug, info, instrument};

use crate::definition::{
    substitute_fields, CreateShape, IdStrategy, LookupSpec, ReadOptions, ResourceDefinition,
};
use crate::envelope::{Outcome, ResponseEnvelope};
use crate::error::{ConnectorError, ConnectorResult};
use crate::payload::{build_create_payload, build_update_attrs, decode_field, decode_rate_limit};
use crate::state::ResourceState;
use crate::transport::ApiTransport;
use crate::value::{scalar_to_string, FieldValue};

/// Drives resource lifecycles through an [`ApiTransport`].
///
/// Construct once with the transport (dependency injection, no global
/// client state) and share across resource kinds.
#[derive(Debug)]
pub struct Provisioner<T> {
    transport: T,
}

impl<T: ApiTransport> Provisioner<T> {
    /// Create a driver over the given transport.
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Get a reference to the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Create the entity described by `state` and return its identifier.
    #[instrument(skip_all, fields(kind = %definition.descriptor().kind()))]
    pub async fn create(
        &self,
        definition: &ResourceDefinition,
        state: &ResourceState,
    ) -> ConnectorResult<String> {
        let descriptor = definition.descriptor();
        let mut payload = build_create_payload(descriptor, state, definition.create_options());
        if let Some(hook) = definition.finalize_create() {
            hook(state, &mut payload)?;
        }

        let body = match definition.create_shape() {
            CreateShape::Payload => payload.into_value(),
            CreateShape::EditAttr => json!({ "items": [], "attr": payload.into_value() }),
        };

        let endpoint = definition.endpoints().create();
        debug!(endpoint, "sending create request");
        let raw = self.transport.post(endpoint, &body).await?;

        let envelope = ResponseEnvelope::from_value(raw)?;
        let outcome = envelope.interpret()?;
        if !outcome.success {
            return Err(remote_failure(definition, definition.context(state), &outcome));
        }

        let id = self.derive_id(definition, state, &envelope).await?;
        info!(id = %id, "created");
        Ok(id)
    }

    /// Read the entity back into an observed state.
    #[instrument(skip_all, fields(kind = %definition.descriptor().kind(), id = %id))]
    pub async fn read(
        &self,
        definition: &ResourceDefinition,
        id: &str,
    ) -> ConnectorResult<ResourceState> {
        let path = definition.endpoints().read_path(id);
        debug!(path = %path, "sending read request");
        let raw = self.transport.get(&path).await?;

        let read = definition.read_options();
        let entity = Self::select_entity(definition, id, raw, read)?;

        if let Some(key) = read.presence_field {
            let present = entity.get(key).is_some_and(|v| !v.is_null());
            if !present {
                return Err(ConnectorError::NotFound {
                    kind: definition.descriptor().kind(),
                    identifier: id.to_string(),
                });
            }
        }

        let mut state = ResourceState::new();
        for field in definition.descriptor().fields() {
            if let Some((_, remote_key)) = read
                .rate_limit
                .iter()
                .find(|(local, _)| *local == field.name())
            {
                if let Some(rate) = entity.get(*remote_key).and_then(decode_rate_limit) {
                    state.observe(field.name(), rate);
                }
                continue;
            }

            let source: &Map<String, Value> = if read.nested_fields.contains(&field.name()) {
                match read
                    .nested_object
                    .and_then(|key| entity.get(key))
                    .and_then(Value::as_object)
                {
                    Some(obj) => obj,
                    None => continue,
                }
            } else {
                &entity
            };

            let remote_key = read
                .rename
                .iter()
                .find(|(local, _)| *local == field.name())
                .map_or_else(|| field.remote_name(), |(_, remote)| *remote);

            let Some(remote_value) = source.get(remote_key) else {
                continue;
            };
            if let Some(value) = decode_field(field, remote_value)? {
                state.observe(field.name(), value);
            }
        }

        Ok(state)
    }

    /// Apply the dirty fields of `state` to the entity.
    #[instrument(skip_all, fields(kind = %definition.descriptor().kind(), id = %id))]
    pub async fn update(
        &self,
        definition: &ResourceDefinition,
        id: &str,
        state: &ResourceState,
    ) -> ConnectorResult<()> {
        let endpoint = definition.endpoints().update().ok_or_else(|| {
            ConnectorError::invalid_configuration(format!(
                "{} does not support update",
                definition.descriptor().kind()
            ))
        })?;

        let mut attrs = build_update_attrs(definition.descriptor(), state, definition.update_options());
        if let Some(hook) = definition.finalize_update() {
            hook(state, &mut attrs)?;
        }

        let body = json!({ "items": [id], "attr": attrs.into_value() });
        debug!(endpoint, "sending update request");
        let raw = self.transport.post(endpoint, &body).await?;

        let outcome = ResponseEnvelope::from_value(raw)?.interpret()?;
        if !outcome.success {
            return Err(remote_failure(definition, id.to_string(), &outcome));
        }
        info!("updated");
        Ok(())
    }

    /// Delete the entity. On failure the caller keeps the identifier for
    /// a later retry of the whole operation.
    #[instrument(skip_all, fields(kind = %definition.descriptor().kind(), id = %id))]
    pub async fn delete(&self, definition: &ResourceDefinition, id: &str) -> ConnectorResult<()> {
        let endpoint = definition.endpoints().delete();
        let body = json!({ "items": [id] });
        debug!(endpoint, "sending delete request");
        let raw = self.transport.post(endpoint, &body).await?;

        let outcome = ResponseEnvelope::from_value(raw)?.interpret()?;
        if !outcome.success {
            return Err(remote_failure(definition, id.to_string(), &outcome));
        }
        info!("deleted");
        Ok(())
    }

    async fn derive_id(
        &self,
        definition: &ResourceDefinition,
        state: &ResourceState,
        envelope: &ResponseEnvelope,
    ) -> ConnectorResult<String> {
        match definition.id() {
            IdStrategy::FromField(field) => field_value(state, field),
            IdStrategy::FromFields { fields, separator } => {
                let parts = fields
                    .iter()
                    .map(|field| field_value(state, field))
                    .collect::<ConnectorResult<Vec<_>>>()?;
                Ok(parts.join(separator))
            }
            IdStrategy::FromReceipt(expectation) => expectation.extract(envelope),
            IdStrategy::FromLookup(lookup) => self.lookup_id(definition, lookup, state).await,
        }
    }

    async fn lookup_id(
        &self,
        definition: &ResourceDefinition,
        lookup: &LookupSpec,
        state: &ResourceState,
    ) -> ConnectorResult<String> {
        let path = substitute_fields(lookup.endpoint, state)?;
        debug!(path = %path, "sending lookup request");
        let raw = self.transport.get(&path).await?;

        let items = raw.as_array().ok_or_else(|| {
            ConnectorError::malformed(format!("lookup reply for '{path}' is not a collection"))
        })?;

        'candidates: for item in items {
            let Some(obj) = item.as_object() else {
                continue;
            };
            for condition in lookup.matches {
                let expected = field_value(state, condition.local)?;
                let actual = obj.get(condition.remote).map(scalar_to_string);
                if actual.as_deref() != Some(expected.as_str()) {
                    continue 'candidates;
                }
            }
            if let Some(id) = obj.get(lookup.id_field) {
                return Ok(scalar_to_string(id));
            }
        }

        let identifier = lookup
            .matches
            .iter()
            .map(|condition| {
                let value = field_value(state, condition.local).unwrap_or_default();
                format!("{}={value}", condition.remote)
            })
            .collect::<Vec<_>>()
            .join(" ");
        Err(ConnectorError::NotFound {
            kind: definition.descriptor().kind(),
            identifier,
        })
    }

    fn select_entity(
        definition: &ResourceDefinition,
        id: &str,
        raw: Value,
        read: ReadOptions,
    ) -> ConnectorResult<Map<String, Value>> {
        match raw {
            Value::Object(obj) => Ok(obj),
            Value::Array(items) => {
                let key = read.collection_match.ok_or_else(|| {
                    ConnectorError::malformed(format!(
                        "unexpected collection reply for {}",
                        definition.descriptor().kind()
                    ))
                })?;
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::Object(obj) => Some(obj),
                        _ => None,
                    })
                    .find(|obj| {
                        obj.get(key)
                            .map(scalar_to_string)
                            .is_some_and(|candidate| candidate == id)
                    })
                    .ok_or_else(|| ConnectorError::NotFound {
                        kind: definition.descriptor().kind(),
                        identifier: id.to_string(),
                    })
            }
            other => Err(ConnectorError::malformed(format!(
                "read reply is neither an entity nor a collection: {other}"
            ))),
        }
    }
}

fn field_value(state: &ResourceState, field: &str) -> ConnectorResult<String> {
    state
        .get(field)
        .map(FieldValue::display_string)
        .ok_or_else(|| {
            ConnectorError::invalid_configuration(format!(
                "id derivation references unset field '{field}'"
            ))
        })
}

fn remote_failure(
    definition: &ResourceDefinition,
    context: String,
    outcome: &Outcome,
) -> ConnectorError {
    ConnectorError::RemoteFailure {
        kind: definition.descriptor().kind(),
        context,
        outcome_type: outcome.outcome_type.clone(),
        message: outcome.message.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources;
    use crate::types::ResourceKind;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Canned-reply transport recording every POST it sees.
    #[derive(Default)]
    struct MockTransport {
        gets: HashMap<String, Value>,
        post_replies: HashMap<String, Value>,
        posts: Mutex<Vec<(String, Value)>>,
    }

    impl MockTransport {
        fn on_get(mut self, path: &str, reply: Value) -> Self {
            self.gets.insert(path.to_string(), reply);
            self
        }

        fn on_post(mut self, path: &str, reply: Value) -> Self {
            self.post_replies.insert(path.to_string(), reply);
            self
        }

        fn sent(&self) -> Vec<(String, Value)> {
            self.posts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ApiTransport for MockTransport {
        async fn get(&self, path: &str) -> ConnectorResult<Value> {
            self.gets
                .get(path)
                .cloned()
                .ok_or_else(|| ConnectorError::transport(format!("no canned GET for {path}")))
        }

        async fn post(&self, path: &str, body: &Value) -> ConnectorResult<Value> {
            self.posts
                .lock()
                .unwrap()
                .push((path.to_string(), body.clone()));
            self.post_replies
                .get(path)
                .cloned()
                .ok_or_else(|| ConnectorError::transport(format!("no canned POST for {path}")))
        }
    }

    #[tokio::test]
    async fn test_create_domain_returns_field_id() {
        let transport = MockTransport::default().on_post(
            "/api/v1/add/domain",
            json!([{"type": "success", "msg": "domain added"}]),
        );
        let driver = Provisioner::new(transport);
        let definition = resources::definition(ResourceKind::Domain);

        let state = ResourceState::with_defaults(definition.descriptor())
            .with("domain", "example.com")
            .with("aliases", 400);

        let id = driver.create(&definition, &state).await.unwrap();
        assert_eq!(id, "example.com");

        let sent = driver.transport().sent();
        assert_eq!(sent.len(), 1);
        let body = &sent[0].1;
        assert_eq!(body["domain"], json!("example.com"));
        assert_eq!(body["aliases"], json!(400));
        // booleans travel as 0/1
        assert_eq!(body["active"], json!(1));
        // the rate-limit default splits into value and frame
        assert_eq!(body["rl_value"], json!(10));
        assert_eq!(body["rl_frame"], json!("s"));
        assert!(body.get("rate_limit").is_none());
    }

    #[tokio::test]
    async fn test_create_rejected_surfaces_remote_failure() {
        let transport = MockTransport::default().on_post(
            "/api/v1/add/domain",
            json!([{"type": "danger", "msg": ["domain_exists", "example.com"]}]),
        );
        let driver = Provisioner::new(transport);
        let definition = resources::definition(ResourceKind::Domain);
        let state = ResourceState::with_defaults(definition.descriptor())
            .with("domain", "example.com");

        match driver.create(&definition, &state).await {
            Err(ConnectorError::RemoteFailure {
                kind,
                context,
                outcome_type,
                message,
            }) => {
                assert_eq!(kind, ResourceKind::Domain);
                assert_eq!(context, "example.com");
                assert_eq!(outcome_type, "danger");
                assert_eq!(message, "domain_exists, example.com");
            }
            other => panic!("expected RemoteFailure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_mailbox_joins_id_fields() {
        let transport = MockTransport::default().on_post(
            "/api/v1/add/mailbox",
            json!([{"type": "success", "msg": ["mailbox_added", "jo@example.com"]}]),
        );
        let driver = Provisioner::new(transport);
        let definition = resources::definition(ResourceKind::Mailbox);
        let state = ResourceState::with_defaults(definition.descriptor())
            .with("domain", "example.com")
            .with("local_part", "jo")
            .with("password", "hunter2hunter2");

        let id = driver.create(&definition, &state).await.unwrap();
        assert_eq!(id, "jo@example.com");

        let body = &driver.transport().sent()[0].1;
        assert_eq!(body["password"], json!("hunter2hunter2"));
        assert_eq!(body["password2"], json!("hunter2hunter2"));
        // full_name was never set, so its remote key is absent
        assert_eq!(body.get("name"), None);
    }

    #[tokio::test]
    async fn test_create_alias_extracts_receipt_id() {
        let transport = MockTransport::default().on_post(
            "/api/v1/add/alias",
            json!([{"type": "success", "msg": ["alias_added", "jo@example.com", 2000]}]),
        );
        let driver = Provisioner::new(transport);
        let definition = resources::definition(ResourceKind::Alias);
        let state = ResourceState::with_defaults(definition.descriptor())
            .with("address", "all@example.com")
            .with("goto", "jo@example.com");

        let id = driver.create(&definition, &state).await.unwrap();
        assert_eq!(id, "2000");
    }

    #[tokio::test]
    async fn test_create_relay_host_looks_up_id() {
        let transport = MockTransport::default()
            .on_post(
                "/api/v1/add/relayhost",
                json!([{"type": "success", "msg": "relayhost added"}]),
            )
            .on_get(
                "/api/v1/get/relayhost/all",
                json!([
                    {"id": 3, "hostname": "other.example.com:587", "username": "left"},
                    {"id": 4, "hostname": "smtp.example.com:587", "username": "jo"},
                ]),
            );
        let driver = Provisioner::new(transport);
        let definition = resources::definition(ResourceKind::RelayHost);
        let state = ResourceState::new()
            .with("hostname", "smtp.example.com:587")
            .with("username", "jo")
            .with("password", "secret");

        let id = driver.create(&definition, &state).await.unwrap();
        assert_eq!(id, "4");
    }

    #[tokio::test]
    async fn test_lookup_without_match_is_not_found() {
        let transport = MockTransport::default()
            .on_post(
                "/api/v1/add/relayhost",
                json!([{"type": "success", "msg": "relayhost added"}]),
            )
            .on_get("/api/v1/get/relayhost/all", json!([]));
        let driver = Provisioner::new(transport);
        let definition = resources::definition(ResourceKind::RelayHost);
        let state = ResourceState::new()
            .with("hostname", "smtp.example.com:587")
            .with("username", "jo")
            .with("password", "secret");

        let err = driver.create(&definition, &state).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_read_alias_decodes_flags() {
        let transport = MockTransport::default().on_get(
            "/api/v1/get/alias/2000",
            json!({
                "id": 2000,
                "address": "all@example.com",
                "goto": "jo@example.com",
                "active": 1,
                "sogo_visible": 0,
                "private_comment": null,
            }),
        );
        let driver = Provisioner::new(transport);
        let definition = resources::definition(ResourceKind::Alias);

        let state = driver.read(&definition, "2000").await.unwrap();
        assert_eq!(state.get_str("address"), Some("all@example.com"));
        assert_eq!(state.get_bool("active"), Some(true));
        assert_eq!(state.get_bool("sogo_visible"), Some(false));
        assert!(!state.has("private_comment"));
    }

    #[tokio::test]
    async fn test_read_missing_entity_is_not_found() {
        let transport =
            MockTransport::default().on_get("/api/v1/get/alias/9999", json!({}));
        let driver = Provisioner::new(transport);
        let definition = resources::definition(ResourceKind::Alias);

        let err = driver.read(&definition, "9999").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_read_domain_applies_renames_and_units() {
        let transport = MockTransport::default().on_get(
            "/api/v1/get/domain/example.com",
            json!({
                "domain_name": "example.com",
                "description": "mailcow domain",
                "max_num_aliases_for_domain": 400,
                "max_num_mboxes_for_domain": 10,
                "def_new_mailbox_quota": 3_221_225_472_i64,
                "max_quota_for_mbox": 10_737_418_240_i64,
                "max_quota_for_domain": 10_737_418_240_i64,
                "active": 1,
                "backupmx": 0,
                "rl": {"value": "10", "frame": "s"},
                "tags": ["prod", "mail"],
            }),
        );
        let driver = Provisioner::new(transport);
        let definition = resources::definition(ResourceKind::Domain);

        let state = driver.read(&definition, "example.com").await.unwrap();
        assert_eq!(state.get_str("domain"), Some("example.com"));
        assert_eq!(state.get_int("aliases"), Some(400));
        assert_eq!(state.get_int("defquota"), Some(3072));
        assert_eq!(state.get_int("maxquota"), Some(10240));
        assert_eq!(state.get_int("quota"), Some(10240));
        assert_eq!(state.get_bool("active"), Some(true));
        assert_eq!(state.get_str("rate_limit"), Some("10s"));
        assert_eq!(
            state.get_list("tags"),
            Some(&["prod".to_string(), "mail".to_string()][..])
        );
    }

    #[tokio::test]
    async fn test_read_mailbox_nested_attributes() {
        let transport = MockTransport::default().on_get(
            "/api/v1/get/mailbox/jo@example.com",
            json!({
                "username": "jo@example.com",
                "domain": "example.com",
                "local_part": "jo",
                "name": "Jo User",
                "active": 1,
                "quota": 3_221_225_472_i64,
                "attributes": {
                    "force_pw_update": "1",
                    "sogo_access": "1",
                    "imap_access": "0",
                    "tls_enforce_in": "0",
                    "tls_enforce_out": "0",
                    "pop3_access": "1",
                    "smtp_access": "1",
                    "sieve_access": "1",
                },
            }),
        );
        let driver = Provisioner::new(transport);
        let definition = resources::definition(ResourceKind::Mailbox);

        let state = driver.read(&definition, "jo@example.com").await.unwrap();
        assert_eq!(state.get_str("full_name"), Some("Jo User"));
        assert_eq!(state.get_int("quota"), Some(3072));
        assert_eq!(state.get_bool("force_pw_update"), Some(true));
        assert_eq!(state.get_bool("imap_access"), Some(false));
    }

    #[tokio::test]
    async fn test_read_sync_job_scans_collection() {
        let transport = MockTransport::default().on_get(
            "/api/v1/get/syncjobs/all",
            json!([
                {"id": 7, "user2": "other@example.com", "host1": "old.example.net"},
                {"id": 9, "user2": "jo@example.com", "host1": "imap.example.net", "active": 1},
            ]),
        );
        let driver = Provisioner::new(transport);
        let definition = resources::definition(ResourceKind::SyncJob);

        let state = driver.read(&definition, "9").await.unwrap();
        assert_eq!(state.get_str("host1"), Some("imap.example.net"));
        assert_eq!(state.get_str("username"), Some("jo@example.com"));
        assert_eq!(state.get_bool("active"), Some(true));
    }

    #[tokio::test]
    async fn test_read_collection_without_match_is_not_found() {
        let transport = MockTransport::default().on_get(
            "/api/v1/get/syncjobs/all",
            json!([{"id": 7, "user2": "other@example.com"}]),
        );
        let driver = Provisioner::new(transport);
        let definition = resources::definition(ResourceKind::SyncJob);

        let err = driver.read(&definition, "9").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_update_sends_only_dirty_fields() {
        let transport = MockTransport::default().on_post(
            "/api/v1/edit/domain",
            json!([{"type": "success", "msg": "domain modified"}]),
        );
        let driver = Provisioner::new(transport);
        let definition = resources::definition(ResourceKind::Domain);

        let mut state = ResourceState::new();
        state.observe("domain", "example.com");
        state.observe("aliases", 400);
        state.set("description", "updated");

        driver
            .update(&definition, "example.com", &state)
            .await
            .unwrap();

        let sent = driver.transport().sent();
        let body = &sent[0].1;
        assert_eq!(body["items"], json!(["example.com"]));
        assert_eq!(body["attr"], json!({"description": "updated"}));
    }

    #[tokio::test]
    async fn test_update_unsupported_kind() {
        let driver = Provisioner::new(MockTransport::default());
        let definition = resources::definition(ResourceKind::OAuth2Client);
        let state = ResourceState::new();

        let err = driver.update(&definition, "5", &state).await.unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }

    #[tokio::test]
    async fn test_delete_carries_item_list() {
        let transport = MockTransport::default().on_post(
            "/api/v1/delete/alias",
            json!([{"type": "success", "msg": ["alias_removed", "2000"]}]),
        );
        let driver = Provisioner::new(transport);
        let definition = resources::definition(ResourceKind::Alias);

        driver.delete(&definition, "2000").await.unwrap();

        let sent = driver.transport().sent();
        assert_eq!(sent[0].0, "/api/v1/delete/alias");
        assert_eq!(sent[0].1, json!({"items": ["2000"]}));
    }

    #[tokio::test]
    async fn test_delete_failure_surfaces_remote_failure() {
        let transport = MockTransport::default().on_post(
            "/api/v1/delete/alias",
            json!([{"type": "danger", "msg": ["alias_invalid", "2000"]}]),
        );
        let driver = Provisioner::new(transport);
        let definition = resources::definition(ResourceKind::Alias);

        let err = driver.delete(&definition, "2000").await.unwrap_err();
        assert!(err.is_remote_rejection());
    }
}
