//! # JSON API
//!
//! Thin serialization boundary for external collaborators. The engines stay
//! pure; these entry points only parse the envelope, run one operation, and
//! serialize the result. State always belongs to the caller.

pub mod audit_json;
pub mod chat_json;

pub use audit_json::compute_audit_json;
pub use chat_json::{
    execute_chat_json, new_policy_json, ChatRequest, ChatRequestType, ChatResponse,
    ChatResponseType, CHAT_SCHEMA_VERSION,
};
