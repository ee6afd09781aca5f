//! # Audit JSON API
//!
//! Offline entry point for the audit query surface: the storage collaborator
//! hands over a conversation's raw message array, and the eight-key
//! float-or-null metrics mapping comes back for verbatim persistence.

use crate::audit::{compute_audit, RawMessage};
use crate::error::{CoreError, Result};

/// Raw messages JSON in, metrics JSON out. Recomputed fresh on each call.
pub fn compute_audit_json(messages_json: &str) -> Result<String> {
    let messages: Vec<RawMessage> =
        serde_json::from_str(messages_json).map_err(CoreError::InvalidRequest)?;
    let metrics = compute_audit(&messages);
    Ok(serde_json::to_string(&metrics)?)
}
