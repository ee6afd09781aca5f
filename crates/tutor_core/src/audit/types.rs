// Canonical turn vocabulary for the retrospective audit. Wire names match
// the stored-metadata annotations verbatim.
use serde::{Deserialize, Serialize};

/// Whether an agent turn stayed on the book text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextFocus {
    #[default]
    OnText,
    OffTextSafe,
}

/// Agent posture toward the learner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stance {
    Quiet,
    #[default]
    Responsive,
    Proactive,
}

/// Scaffolding rung as annotated on stored agent turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LadderStep {
    #[default]
    Nudge,
    Reflect,
    Analogy,
    #[serde(rename = "MINIEXPLAIN")]
    MiniExplain,
}

/// Affective coloring of an agent turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Affect {
    WarmSupportive,
    #[default]
    Neutral,
    OverSocial,
}

/// Child-side confusion annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfusionSignal {
    #[default]
    None,
    Low,
    High,
}

/// Child-side autonomy annotation ("let me try").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AutonomySignal {
    #[default]
    None,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentTurn {
    pub timestamp: f64,
    pub text_focus: TextFocus,
    pub stance: Stance,
    pub ladder_step: LadderStep,
    pub affect: Affect,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildTurn {
    pub timestamp: f64,
    pub on_task: bool,
    pub elaborated: bool,
    pub is_question: bool,
    pub confusion_signal: ConfusionSignal,
    pub autonomy_signal: AutonomySignal,
}

/// A stored message normalized for aggregation.
///
/// Rebuilt fresh on every audit, never persisted independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "speaker", rename_all = "lowercase")]
pub enum CanonicalTurn {
    Agent(AgentTurn),
    Child(ChildTurn),
}

impl CanonicalTurn {
    pub fn timestamp(&self) -> f64 {
        match self {
            CanonicalTurn::Agent(t) => t.timestamp,
            CanonicalTurn::Child(t) => t.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_match_stored_annotations() {
        assert_eq!(serde_json::to_string(&TextFocus::OffTextSafe).unwrap(), "\"OFF_TEXT_SAFE\"");
        assert_eq!(serde_json::to_string(&Stance::Proactive).unwrap(), "\"PROACTIVE\"");
        assert_eq!(serde_json::to_string(&LadderStep::MiniExplain).unwrap(), "\"MINIEXPLAIN\"");
        assert_eq!(serde_json::to_string(&Affect::WarmSupportive).unwrap(), "\"WARM_SUPPORTIVE\"");
        assert_eq!(serde_json::to_string(&ConfusionSignal::None).unwrap(), "\"NONE\"");
        assert_eq!(serde_json::to_string(&AutonomySignal::High).unwrap(), "\"HIGH\"");
    }

    #[test]
    fn test_defaults_are_the_named_fallbacks() {
        assert_eq!(TextFocus::default(), TextFocus::OnText);
        assert_eq!(Stance::default(), Stance::Responsive);
        assert_eq!(LadderStep::default(), LadderStep::Nudge);
        assert_eq!(Affect::default(), Affect::Neutral);
        assert_eq!(ConfusionSignal::default(), ConfusionSignal::None);
        assert_eq!(AutonomySignal::default(), AutonomySignal::None);
    }

    #[test]
    fn test_canonical_turn_is_speaker_tagged() {
        let turn = CanonicalTurn::Child(ChildTurn {
            timestamp: 1.0,
            on_task: true,
            elaborated: false,
            is_question: false,
            confusion_signal: ConfusionSignal::None,
            autonomy_signal: AutonomySignal::None,
        });
        let json = serde_json::to_string(&turn).unwrap();
        assert!(json.contains("\"speaker\":\"child\""));
    }
}
