//! # Retrospective Session Audit
//!
//! Offline counterpart to the real-time ladder policy: stored messages are
//! normalized into canonical turns (`classify`), then aggregated into the
//! eight named session rates (`metrics`).
//!
//! Both stages are pure functions of their input: safe to run concurrently
//! across conversations and safe to re-run on the same conversation.

pub mod classify;
pub mod metrics;
pub mod types;

pub use classify::{classify_role, messages_to_turns, MessageRole, RawMessage};
pub use metrics::{
    compute_session_metrics, is_justified_stance_change, is_well_tailored, safe_div,
    SessionMetrics,
};
pub use types::{
    Affect, AgentTurn, AutonomySignal, CanonicalTurn, ChildTurn, ConfusionSignal, LadderStep,
    Stance, TextFocus,
};

/// Raw stored messages in, eight-key metrics mapping out.
///
/// Recomputed fresh on every call; nothing is cached and nothing errors.
pub fn compute_audit(messages: &[RawMessage]) -> SessionMetrics {
    compute_session_metrics(&messages_to_turns(messages))
}
