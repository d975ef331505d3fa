//! Response envelope interpretation
//!
//! The mail server answers mutating calls with an ordered sequence of
//! step-records, one per internal processing step. Only the last record
//! is authoritative for the call's outcome; earlier records are
//! diagnostic context.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConnectorError, ConnectorResult};
use crate::value::scalar_to_string;

/// One step-record of a reply envelope.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StepRecord {
    /// Outcome tag for this step. Only `"success"` means success;
    /// anything else, including absence, is a failure.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub outcome_type: Option<String>,

    /// Free-form log lines echoed by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log: Option<Vec<Value>>,

    /// Step message: absent, a single string, or an ordered list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<Message>,
}

/// The polymorphic message field of a step-record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Message {
    /// A single message string.
    Text(String),
    /// An ordered list of message parts.
    List(Vec<Value>),
}

impl Message {
    /// Join this message into one diagnostic string.
    ///
    /// A single string is used verbatim; a list joins its elements with
    /// `", "`.
    #[must_use]
    pub fn joined(&self) -> String {
        match self {
            Message::Text(s) => s.clone(),
            Message::List(parts) => parts
                .iter()
                .map(scalar_to_string)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// Get the message parts if this is a list-shaped message.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Message::List(parts) => Some(parts),
            _ => None,
        }
    }
}

/// The decoded reply to a single mutating call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseEnvelope(Vec<StepRecord>);

impl ResponseEnvelope {
    /// Create an envelope from decoded step-records.
    #[must_use]
    pub fn new(records: Vec<StepRecord>) -> Self {
        Self(records)
    }

    /// Decode an envelope from a raw reply body.
    ///
    /// The server usually answers with an array of step-records, but
    /// some endpoints reply with a single bare record object; that
    /// decodes as a one-record envelope.
    pub fn from_value(body: Value) -> ConnectorResult<Self> {
        match body {
            Value::Array(_) => serde_json::from_value(body)
                .map_err(|e| ConnectorError::malformed(format!("reply is not an envelope: {e}"))),
            Value::Object(_) => {
                let record: StepRecord = serde_json::from_value(body).map_err(|e| {
                    ConnectorError::malformed(format!("reply is not a step-record: {e}"))
                })?;
                Ok(Self(vec![record]))
            }
            other => Err(ConnectorError::malformed(format!(
                "reply is neither an envelope nor a step-record: {other}"
            ))),
        }
    }

    /// Get the number of step-records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the envelope carries no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the authoritative (last) step-record.
    #[must_use]
    pub fn last(&self) -> Option<&StepRecord> {
        self.0.last()
    }

    /// Interpret this envelope into the call's outcome.
    ///
    /// Success iff the last record's outcome tag equals exactly
    /// `"success"`. An empty envelope is malformed. Pure function of the
    /// envelope: interpreting twice yields the same outcome.
    pub fn interpret(&self) -> ConnectorResult<Outcome> {
        let last = self
            .last()
            .ok_or_else(|| ConnectorError::malformed("empty reply envelope"))?;

        let outcome_type = last.outcome_type.clone().unwrap_or_default();
        let message = last.msg.as_ref().map(Message::joined).unwrap_or_default();

        Ok(Outcome {
            success: outcome_type == "success",
            outcome_type,
            message,
        })
    }
}

/// The interpreted outcome of a mutating call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Whether the last step-record reported success.
    pub success: bool,
    /// The last step-record's outcome tag (empty when absent).
    pub outcome_type: String,
    /// The last step-record's joined message (empty when absent).
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(body: Value) -> ResponseEnvelope {
        ResponseEnvelope::from_value(body).unwrap()
    }

    #[test]
    fn test_only_last_record_is_authoritative() {
        let env = envelope(json!([
            {"type": "warn", "msg": "something odd"},
            {"type": "success", "msg": ["a"]},
        ]));
        let outcome = env.interpret().unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.message, "a");

        // Prepending arbitrary non-success records never changes the result.
        let env = envelope(json!([
            {"type": "danger", "msg": "ignored"},
            {"type": "warn"},
            {"type": "success", "msg": ["a"]},
        ]));
        assert!(env.interpret().unwrap().success);
    }

    #[test]
    fn test_message_join_is_order_preserving() {
        let env = envelope(json!([{"type": "success", "msg": ["x", "y", "z"]}]));
        assert_eq!(env.interpret().unwrap().message, "x, y, z");
    }

    #[test]
    fn test_string_message_verbatim() {
        let env = envelope(json!([{"type": "success", "msg": "domain added"}]));
        assert_eq!(env.interpret().unwrap().message, "domain added");
    }

    #[test]
    fn test_absent_message_is_empty() {
        let env = envelope(json!([{"type": "success"}]));
        assert_eq!(env.interpret().unwrap().message, "");
    }

    #[test]
    fn test_non_string_message_parts() {
        let env = envelope(json!([{"type": "danger", "msg": ["rate_limit", 10]}]));
        let outcome = env.interpret().unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.message, "rate_limit, 10");
    }

    #[test]
    fn test_missing_type_is_failure() {
        let env = envelope(json!([{"msg": ["whatever"]}]));
        let outcome = env.interpret().unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.outcome_type, "");
    }

    #[test]
    fn test_danger_is_failure() {
        let env = envelope(json!([{"type": "danger", "msg": ["domain_exists", "example.com"]}]));
        let outcome = env.interpret().unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.outcome_type, "danger");
        assert_eq!(outcome.message, "domain_exists, example.com");
    }

    #[test]
    fn test_empty_envelope_is_malformed() {
        let env = envelope(json!([]));
        let err = env.interpret().unwrap_err();
        assert_eq!(err.error_code(), "MALFORMED_RESPONSE");
    }

    #[test]
    fn test_bare_object_reply_decodes_as_one_record() {
        let env = envelope(json!({"type": "success", "msg": "saved"}));
        assert_eq!(env.len(), 1);
        assert!(env.interpret().unwrap().success);
    }

    #[test]
    fn test_scalar_reply_is_malformed() {
        assert!(ResponseEnvelope::from_value(json!("ok")).is_err());
    }

    #[test]
    fn test_interpretation_is_deterministic() {
        let env = envelope(json!([{"type": "success", "msg": ["x", "y"]}]));
        assert_eq!(env.interpret().unwrap(), env.interpret().unwrap());
    }
}
