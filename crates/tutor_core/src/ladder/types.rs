// Ladder vocabulary shared by the real-time policy and its validation report.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Scaffolding intensity rungs, ordered from lightest to heaviest.
///
/// The ordering is total and the step operations saturate, so the policy can
/// never produce an out-of-range rung.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Move {
    /// Encouragement or a recall cue, no new content.
    #[default]
    Nudge,
    /// Ask the learner to think aloud.
    Reflect,
    /// One kid-friendly analogy mapping to the concept.
    Analogy,
    /// Brief clarification, then hand control back.
    MiniExplanation,
}

impl Move {
    /// Rung index, 0 = lightest.
    pub fn rung(&self) -> u8 {
        match self {
            Move::Nudge => 0,
            Move::Reflect => 1,
            Move::Analogy => 2,
            Move::MiniExplanation => 3,
        }
    }

    /// One rung heavier, saturating at the top.
    pub fn step_up(&self) -> Move {
        match self {
            Move::Nudge => Move::Reflect,
            Move::Reflect => Move::Analogy,
            Move::Analogy | Move::MiniExplanation => Move::MiniExplanation,
        }
    }

    /// One rung lighter, saturating at the bottom.
    pub fn step_down(&self) -> Move {
        match self {
            Move::Nudge | Move::Reflect => Move::Nudge,
            Move::Analogy => Move::Reflect,
            Move::MiniExplanation => Move::Analogy,
        }
    }

    /// Wire name, identical to the serialized form.
    pub fn name(&self) -> &'static str {
        match self {
            Move::Nudge => "NUDGE",
            Move::Reflect => "REFLECT",
            Move::Analogy => "ANALOGY",
            Move::MiniExplanation => "MINI_EXPLANATION",
        }
    }
}

/// Who produced a transcript turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Child,
    Assistant,
    /// Internal policy bookkeeping, never exposed externally.
    System,
}

fn default_turn_ts() -> DateTime<Utc> {
    Utc::now()
}

/// One entry in a session transcript. Append-only once inserted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
    /// Only set for assistant turns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#move: Option<Move>,
    /// Why the policy chose this move.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub meta: Map<String, Value>,
    #[serde(default = "default_turn_ts")]
    pub ts: DateTime<Utc>,
}

impl Turn {
    pub fn child(content: impl Into<String>) -> Self {
        Turn {
            role: Role::Child,
            content: content.into(),
            r#move: None,
            reason: None,
            meta: Map::new(),
            ts: Utc::now(),
        }
    }

    pub fn assistant(
        content: impl Into<String>,
        chosen: Move,
        reason: impl Into<String>,
        meta: Map<String, Value>,
    ) -> Self {
        Turn {
            role: Role::Assistant,
            content: content.into(),
            r#move: Some(chosen),
            reason: Some(reason.into()),
            meta,
            ts: Utc::now(),
        }
    }

    pub fn system(content: impl Into<String>, meta: Map<String, Value>) -> Self {
        Turn {
            role: Role::System,
            content: content.into(),
            r#move: None,
            reason: None,
            meta,
            ts: Utc::now(),
        }
    }
}
