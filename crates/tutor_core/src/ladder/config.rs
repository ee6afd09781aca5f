// Policy thresholds. Fixed at construction; never mutated by decisions.
use serde::{Deserialize, Serialize};

/// Immutable thresholds driving the ladder decision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Hard cap on upward rung movement per decision.
    pub max_step_up: u8,
    /// confusion_p at or above this escalates one rung.
    pub confusion_threshold: f64,
    /// success_p at or above this de-escalates one rung. Wins over confusion.
    pub success_threshold: f64,
    /// Turns of history consulted by the lookback checks.
    pub window: usize,
    /// Consecutive stuck rounds that unlock MiniExplanation without a full climb.
    pub allow_explanation_if_stuck_rounds: u32,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        PolicyConfig {
            max_step_up: 1,
            confusion_threshold: 0.55,
            success_threshold: 0.65,
            window: 6,
            allow_explanation_if_stuck_rounds: 2,
        }
    }
}
