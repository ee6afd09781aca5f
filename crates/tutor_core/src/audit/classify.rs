//! # Turn Classifier
//!
//! Converts raw stored messages into canonical turns. The mapping is total
//! and defensive: every missing or malformed field resolves to a named
//! default, unrecognized senders are dropped without affecting the batch,
//! and nothing in here ever errors. Availability over strictness, so
//! historical and partial data stays auditable.

use super::types::{
    Affect, AgentTurn, AutonomySignal, CanonicalTurn, ChildTurn, ConfusionSignal, LadderStep,
    Stance, TextFocus,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Senders treated as the tutoring agent.
const AGENT_SENDERS: [&str; 3] = ["assistant", "bot", "agent"];
/// Senders treated as the learner.
const CHILD_SENDERS: [&str; 3] = ["user", "child", "student"];

/// One message as the storage collaborator hands it over.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawMessage {
    #[serde(default)]
    pub sender: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub meta: Option<Map<String, Value>>,
}

/// Message origin after sender and metadata resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    Agent,
    Child,
    /// Neither side could be resolved; the message is dropped.
    Other,
}

/// Decide whether a message belongs to the agent or the child.
///
/// The sender field wins; an explicit `meta.role` of "agent"/"child" is the
/// fallback; anything else is `Other`.
pub fn classify_role(msg: &RawMessage) -> MessageRole {
    let sender = msg.sender.as_deref().unwrap_or("").to_lowercase();
    if AGENT_SENDERS.contains(&sender.as_str()) {
        return MessageRole::Agent;
    }
    if CHILD_SENDERS.contains(&sender.as_str()) {
        return MessageRole::Child;
    }

    match msg.meta.as_ref().and_then(|m| m.get("role")).and_then(Value::as_str) {
        Some("agent") => MessageRole::Agent,
        Some("child") => MessageRole::Child,
        _ => MessageRole::Other,
    }
}

/// Seconds since the epoch from an ISO-8601 string, else the caller's
/// fallback. Accepts an explicit offset (or `Z`), a naive date-time, or a
/// bare date; naive values are read as UTC.
pub(crate) fn timestamp_from_iso(value: Option<&str>, fallback: f64) -> f64 {
    let Some(raw) = value else { return fallback };
    if raw.is_empty() {
        return fallback;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.timestamp_micros() as f64 / 1e6;
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return naive.and_utc().timestamp_micros() as f64 / 1e6;
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return naive.and_utc().timestamp_micros() as f64 / 1e6;
        }
    }
    fallback
}

fn parse_annotation<T: DeserializeOwned>(value: &Value) -> Option<T> {
    serde_json::from_value(value.clone()).ok()
}

/// text_focus: explicit metadata value, else the legacy `on_text` boolean,
/// else ON_TEXT.
pub(crate) fn resolve_text_focus(meta: &Map<String, Value>) -> TextFocus {
    if let Some(focus) = meta.get("text_focus").and_then(parse_annotation::<TextFocus>) {
        return focus;
    }
    match meta.get("on_text").and_then(Value::as_bool) {
        Some(true) => TextFocus::OnText,
        Some(false) => TextFocus::OffTextSafe,
        None => TextFocus::OnText,
    }
}

pub(crate) fn resolve_stance(meta: &Map<String, Value>) -> Stance {
    meta.get("stance").and_then(parse_annotation).unwrap_or_default()
}

/// ladder_step: explicit key, else the legacy `move` key, else NUDGE. The
/// legacy key may carry the policy-side MINI_EXPLANATION spelling.
pub(crate) fn resolve_ladder_step(meta: &Map<String, Value>) -> LadderStep {
    for key in ["ladder_step", "move"] {
        if let Some(step) = meta.get(key).and_then(Value::as_str).and_then(parse_ladder_step) {
            return step;
        }
    }
    LadderStep::Nudge
}

fn parse_ladder_step(raw: &str) -> Option<LadderStep> {
    match raw {
        "NUDGE" => Some(LadderStep::Nudge),
        "REFLECT" => Some(LadderStep::Reflect),
        "ANALOGY" => Some(LadderStep::Analogy),
        "MINIEXPLAIN" | "MINI_EXPLANATION" => Some(LadderStep::MiniExplain),
        _ => None,
    }
}

pub(crate) fn resolve_affect(meta: &Map<String, Value>) -> Affect {
    meta.get("affect").and_then(parse_annotation).unwrap_or_default()
}

pub(crate) fn resolve_flag(meta: &Map<String, Value>, key: &str) -> bool {
    meta.get(key).and_then(Value::as_bool).unwrap_or(false)
}

/// is_question: explicit annotation, else inferred from a '?' in the content.
pub(crate) fn resolve_is_question(meta: &Map<String, Value>, content: &str) -> bool {
    meta.get("is_question").and_then(Value::as_bool).unwrap_or_else(|| content.contains('?'))
}

pub(crate) fn resolve_confusion(meta: &Map<String, Value>) -> ConfusionSignal {
    meta.get("confusion_signal").and_then(parse_annotation).unwrap_or_default()
}

pub(crate) fn resolve_autonomy(meta: &Map<String, Value>) -> AutonomySignal {
    meta.get("autonomy_signal").and_then(parse_annotation).unwrap_or_default()
}

/// Convert stored conversation messages into canonical turns.
///
/// Messages whose role cannot be resolved are dropped; the positional index
/// is the timestamp fallback, so ordering stays deterministic even without
/// real timestamps.
pub fn messages_to_turns(messages: &[RawMessage]) -> Vec<CanonicalTurn> {
    let empty = Map::new();
    let mut turns = Vec::with_capacity(messages.len());

    for (idx, msg) in messages.iter().enumerate() {
        let meta = msg.meta.as_ref().unwrap_or(&empty);
        let timestamp = timestamp_from_iso(msg.created_at.as_deref(), idx as f64);

        match classify_role(msg) {
            MessageRole::Other => continue,
            MessageRole::Agent => turns.push(CanonicalTurn::Agent(AgentTurn {
                timestamp,
                text_focus: resolve_text_focus(meta),
                stance: resolve_stance(meta),
                ladder_step: resolve_ladder_step(meta),
                affect: resolve_affect(meta),
            })),
            MessageRole::Child => turns.push(CanonicalTurn::Child(ChildTurn {
                timestamp,
                on_task: resolve_flag(meta, "on_task"),
                elaborated: resolve_flag(meta, "elaborated"),
                is_question: resolve_is_question(meta, msg.content.as_deref().unwrap_or("")),
                confusion_signal: resolve_confusion(meta),
                autonomy_signal: resolve_autonomy(meta),
            })),
        }
    }

    turns
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn msg(sender: &str, meta: Value) -> RawMessage {
        RawMessage {
            sender: Some(sender.to_string()),
            content: Some("hello".to_string()),
            created_at: None,
            meta: meta.as_object().cloned(),
        }
    }

    #[test]
    fn test_classify_role_by_sender() {
        for sender in ["assistant", "bot", "agent", "Assistant", "BOT"] {
            assert_eq!(classify_role(&msg(sender, json!({}))), MessageRole::Agent);
        }
        for sender in ["user", "child", "student", "USER"] {
            assert_eq!(classify_role(&msg(sender, json!({}))), MessageRole::Child);
        }
    }

    #[test]
    fn test_classify_role_metadata_fallback() {
        assert_eq!(classify_role(&msg("webhook", json!({"role": "agent"}))), MessageRole::Agent);
        assert_eq!(classify_role(&msg("webhook", json!({"role": "child"}))), MessageRole::Child);
        assert_eq!(classify_role(&msg("webhook", json!({"role": "moderator"}))), MessageRole::Other);
        assert_eq!(classify_role(&msg("webhook", json!({}))), MessageRole::Other);
        assert_eq!(classify_role(&RawMessage::default()), MessageRole::Other);
    }

    #[test]
    fn test_timestamp_from_iso_variants() {
        // Offset form from the stored records.
        let with_offset = timestamp_from_iso(Some("2025-11-30T12:34:56-05:00"), 0.0);
        assert_eq!(with_offset, 1764524096.0);
        // Zulu form.
        let zulu = timestamp_from_iso(Some("2025-11-30T17:34:56Z"), 0.0);
        assert_eq!(zulu, with_offset);
        // Naive date-times are read as UTC.
        let naive = timestamp_from_iso(Some("2025-11-30T17:34:56"), 0.0);
        assert_eq!(naive, with_offset);
        // Fractional seconds survive.
        let fractional = timestamp_from_iso(Some("2025-11-30T17:34:56.250Z"), 0.0);
        assert_eq!(fractional, with_offset + 0.25);
    }

    #[test]
    fn test_timestamp_fallback_on_missing_or_garbage() {
        assert_eq!(timestamp_from_iso(None, 7.0), 7.0);
        assert_eq!(timestamp_from_iso(Some(""), 7.0), 7.0);
        assert_eq!(timestamp_from_iso(Some("not a date"), 7.0), 7.0);
    }

    #[test]
    fn test_resolve_text_focus_layers() {
        let explicit = json!({"text_focus": "OFF_TEXT_SAFE"});
        assert_eq!(resolve_text_focus(explicit.as_object().unwrap()), TextFocus::OffTextSafe);
        let legacy_true = json!({"on_text": true});
        assert_eq!(resolve_text_focus(legacy_true.as_object().unwrap()), TextFocus::OnText);
        let legacy_false = json!({"on_text": false});
        assert_eq!(resolve_text_focus(legacy_false.as_object().unwrap()), TextFocus::OffTextSafe);
        // Malformed explicit value falls through to the legacy flag.
        let malformed = json!({"text_focus": "SOMEWHERE", "on_text": false});
        assert_eq!(resolve_text_focus(malformed.as_object().unwrap()), TextFocus::OffTextSafe);
        let missing = json!({});
        assert_eq!(resolve_text_focus(missing.as_object().unwrap()), TextFocus::OnText);
    }

    #[test]
    fn test_resolve_ladder_step_layers() {
        let explicit = json!({"ladder_step": "ANALOGY", "move": "NUDGE"});
        assert_eq!(resolve_ladder_step(explicit.as_object().unwrap()), LadderStep::Analogy);
        let legacy = json!({"move": "REFLECT"});
        assert_eq!(resolve_ladder_step(legacy.as_object().unwrap()), LadderStep::Reflect);
        // The policy logs MINI_EXPLANATION; the audit spelling is MINIEXPLAIN.
        let policy_spelling = json!({"move": "MINI_EXPLANATION"});
        assert_eq!(resolve_ladder_step(policy_spelling.as_object().unwrap()), LadderStep::MiniExplain);
        let audit_spelling = json!({"ladder_step": "MINIEXPLAIN"});
        assert_eq!(resolve_ladder_step(audit_spelling.as_object().unwrap()), LadderStep::MiniExplain);
        let unknown = json!({"ladder_step": "SHRUG"});
        assert_eq!(resolve_ladder_step(unknown.as_object().unwrap()), LadderStep::Nudge);
        let missing = json!({});
        assert_eq!(resolve_ladder_step(missing.as_object().unwrap()), LadderStep::Nudge);
    }

    #[test]
    fn test_resolve_stance_and_affect_defaults() {
        let empty = json!({});
        assert_eq!(resolve_stance(empty.as_object().unwrap()), Stance::Responsive);
        assert_eq!(resolve_affect(empty.as_object().unwrap()), Affect::Neutral);
        let bad = json!({"stance": 3, "affect": "SHOUTY"});
        assert_eq!(resolve_stance(bad.as_object().unwrap()), Stance::Responsive);
        assert_eq!(resolve_affect(bad.as_object().unwrap()), Affect::Neutral);
        let good = json!({"stance": "QUIET", "affect": "OVER_SOCIAL"});
        assert_eq!(resolve_stance(good.as_object().unwrap()), Stance::Quiet);
        assert_eq!(resolve_affect(good.as_object().unwrap()), Affect::OverSocial);
    }

    #[test]
    fn test_resolve_is_question_inference() {
        let explicit = json!({"is_question": false});
        assert!(!resolve_is_question(explicit.as_object().unwrap(), "really?"));
        let empty = json!({});
        assert!(resolve_is_question(empty.as_object().unwrap(), "why did she leave?"));
        assert!(!resolve_is_question(empty.as_object().unwrap(), "she left"));
    }

    #[test]
    fn test_messages_to_turns_drops_unresolvable_roles() {
        let messages = vec![
            msg("assistant", json!({})),
            msg("webhook", json!({})),
            msg("user", json!({})),
        ];
        let turns = messages_to_turns(&messages);
        assert_eq!(turns.len(), 2);
        assert!(matches!(turns[0], CanonicalTurn::Agent(_)));
        assert!(matches!(turns[1], CanonicalTurn::Child(_)));
        // Positional fallback keeps the original index, not a renumbering.
        assert_eq!(turns[1].timestamp(), 2.0);
    }

    #[test]
    fn test_messages_to_turns_is_total_on_empty_messages() {
        let turns = messages_to_turns(&[RawMessage::default()]);
        assert!(turns.is_empty());
    }
}
