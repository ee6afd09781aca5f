//! # tutor_core - Reading Tutor Scaffolding & Audit Engine
//!
//! Deterministic decision core for a tutoring backend that chats with
//! children about a book they are reading.
//!
//! ## Features
//! - Real-time scaffolding ladder: one pedagogical move per learner turn,
//!   never climbing more than one rung, with an earned top rung and a
//!   self-validation report
//! - Retrospective audit: stored message history → canonical turns →
//!   adherence/adaptivity/engagement metrics
//! - JSON API boundary with caller-owned session state
//!
//! HTTP serving, persistence, persona content and the text-generation call
//! are external collaborators and live outside this crate.

pub mod api;
pub mod audit;
pub mod error;
pub mod ladder;
pub mod render;
pub mod session;
pub mod signals;

// Re-export the real-time policy surface
pub use ladder::{
    LadderPolicy, LadderState, Move, MoveLogEntry, PolicyConfig, Role, Turn, ValidationReport,
    Violation, ViolationKind,
};

// Re-export the audit surface
pub use audit::{
    compute_audit, compute_session_metrics, messages_to_turns, CanonicalTurn, RawMessage,
    SessionMetrics,
};

// Re-export the collaborator boundary
pub use api::{compute_audit_json, execute_chat_json, new_policy_json};
pub use error::{CoreError, Result};
pub use render::{move_guideline, scaffold_directive, should_force_question};
pub use session::PolicyStore;
pub use signals::{LexiconSignals, SignalModel};
