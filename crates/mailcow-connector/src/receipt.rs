//! Receipt-based id extraction
//!
//! Create replies announce what happened positionally inside the last
//! record's message list, e.g. `["alias_added", "goto", "2000"]`. Which
//! position carries the new entity's id, and which token announces the
//! event, is a per-kind contract of the remote message format; it is
//! declared here in one place instead of inferred ad hoc.

use crate::envelope::ResponseEnvelope;
use crate::error::{ConnectorError, ConnectorResult};
use crate::value::scalar_to_string;

/// Declared shape of a create receipt for one resource kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiptExpectation {
    /// The message-list token announcing the expected event.
    pub token: &'static str,
    /// Zero-based position of the token in the message list.
    pub token_index: usize,
    /// Zero-based position of the new entity's id in the message list.
    pub id_index: usize,
}

impl ReceiptExpectation {
    /// Declare a receipt expectation.
    #[must_use]
    pub const fn new(token: &'static str, token_index: usize, id_index: usize) -> Self {
        Self {
            token,
            token_index,
            id_index,
        }
    }

    /// Extract the new entity's id from a create reply envelope.
    ///
    /// The last record's message must be a list long enough to hold both
    /// the token and the id. The token doubles as a disambiguator
    /// between success variants that share shape; a mismatch is an
    /// `UnexpectedReceipt` and never yields an id.
    pub fn extract(&self, envelope: &ResponseEnvelope) -> ConnectorResult<String> {
        let last = envelope
            .last()
            .ok_or_else(|| ConnectorError::malformed("empty reply envelope"))?;

        let msg = last
            .msg
            .as_ref()
            .ok_or_else(|| ConnectorError::malformed("create reply carries no message"))?;

        let parts = msg.as_list().ok_or_else(|| {
            ConnectorError::malformed(format!(
                "create reply message is not a list: {}",
                msg.joined()
            ))
        })?;

        let needed = self.token_index.max(self.id_index) + 1;
        if parts.len() < needed {
            return Err(ConnectorError::malformed(format!(
                "create reply message has {} elements, expected at least {needed}",
                parts.len()
            )));
        }

        let token = scalar_to_string(&parts[self.token_index]);
        if token != self.token {
            return Err(ConnectorError::UnexpectedReceipt {
                expected: self.token.to_string(),
                actual: token,
            });
        }

        Ok(scalar_to_string(&parts[self.id_index]))
    }
}
