// Self-audit report types. Violations are observational; they never block a
// decision or a reply.
use super::types::{Move, Role};
use serde::{Deserialize, Serialize};

/// Ladder rule broken by a logged assistant turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// The move jumped more than the configured rung distance upward.
    SkipUp,
    /// The move escalated although the learner had just signalled success.
    UnnecessaryEscalation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    #[serde(rename = "type")]
    pub kind: ViolationKind,
    pub message: String,
    /// First 120 characters of the offending turn.
    pub turn: String,
}

/// Transcript entry in the report, system turns excluded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveLogEntry {
    pub role: Role,
    pub r#move: Option<Move>,
    pub text: String,
}

/// Outcome of a ladder self-audit. `ok` iff no violations were found.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub ok: bool,
    pub violations: Vec<Violation>,
    pub moves: Vec<MoveLogEntry>,
}
