//! # Chat Policy JSON API
//!
//! Real-time entry point for the serving layer. The caller owns the policy
//! state: it arrives serialized, the requested operation advances it, and the
//! updated state rides back on every response for the caller to persist.
//! The text-generation call happens strictly between `Plan` and
//! `LogAssistant`, outside this crate.

use crate::error::{CoreError, Result};
use crate::ladder::{LadderPolicy, Move, ValidationReport};
use crate::render::{scaffold_directive, should_force_question};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const CHAT_SCHEMA_VERSION: u8 = 1;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub schema_version: u8,
    pub request_type: ChatRequestType,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum ChatRequestType {
    /// Decide the next move for a learner utterance.
    Plan { child_text: String },

    /// Record the assistant reply that was actually delivered.
    LogAssistant {
        r#move: Move,
        message: String,
        #[serde(default)]
        reason: String,
        #[serde(default)]
        meta: Map<String, Value>,
    },

    /// Self-audit the logged ladder behavior.
    Validate,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub schema_version: u8,
    pub success: bool,
    pub response_type: ChatResponseType,
    /// Updated policy state for the caller to persist.
    pub policy: LadderPolicy,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum ChatResponseType {
    Planned {
        r#move: Move,
        /// Constraint text for the text-generation collaborator.
        directive: String,
        force_question: bool,
    },
    Logged {
        turns: usize,
    },
    Validated {
        report: ValidationReport,
    },
}

/// Serialized state for a brand-new session, for callers bootstrapping their
/// session storage.
pub fn new_policy_json() -> Result<String> {
    Ok(serde_json::to_string(&LadderPolicy::default())?)
}

/// Main entry point - processes one chat-policy request against the caller's
/// serialized policy state and returns the JSON response.
pub fn execute_chat_json(request_json: &str, policy_json: &str) -> Result<String> {
    let request: ChatRequest =
        serde_json::from_str(request_json).map_err(CoreError::InvalidRequest)?;
    if request.schema_version != CHAT_SCHEMA_VERSION {
        return Err(CoreError::UnsupportedSchemaVersion(request.schema_version));
    }

    let mut policy: LadderPolicy =
        serde_json::from_str(policy_json).map_err(CoreError::InvalidState)?;

    let response_type = match request.request_type {
        ChatRequestType::Plan { child_text } => {
            let chosen = policy.plan(&child_text);
            let force_question = should_force_question(&child_text);
            ChatResponseType::Planned {
                r#move: chosen,
                directive: scaffold_directive(chosen, force_question),
                force_question,
            }
        }

        ChatRequestType::LogAssistant { r#move, message, reason, meta } => {
            policy.log_assistant(r#move, &message, &reason, meta);
            ChatResponseType::Logged { turns: policy.state.history.len() }
        }

        ChatRequestType::Validate => ChatResponseType::Validated { report: policy.validate() },
    };

    let response = ChatResponse {
        schema_version: CHAT_SCHEMA_VERSION,
        success: true,
        response_type,
        policy,
    };
    Ok(serde_json::to_string(&response)?)
}
