//! # Scaffolding Ladder Policy
//!
//! Per-session decision state machine. Each learner turn yields exactly one
//! move, the rung never climbs more than one step per decision, and the top
//! rung stays locked until the assistant has climbed through the lower rungs
//! (or the learner has been stuck for long enough).
//!
//! One instance per conversation session; the owning process must serialize
//! access, history mutation is not internally synchronized.

use crate::ladder::config::PolicyConfig;
use crate::ladder::types::{Move, Role, Turn};
use crate::ladder::validation::{MoveLogEntry, ValidationReport, Violation, ViolationKind};
use crate::signals::{LexiconSignals, SignalModel};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

/// Mutable per-session ladder state. History only ever grows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LadderState {
    #[serde(default)]
    pub history: Vec<Turn>,
    #[serde(default)]
    pub last_move: Move,
    /// Consecutive escalation rounds without resolution.
    #[serde(default)]
    pub stuck_rounds: u32,
}

/// Decision engine for one conversation session.
///
/// The whole policy (config + state) round-trips through serde so the caller
/// can persist it between turns and `validate()` can run against externally
/// reconstructed histories. The scorer is stateless and rebuilt on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(serialize = "", deserialize = "S: Default"))]
pub struct LadderPolicy<S = LexiconSignals> {
    pub cfg: PolicyConfig,
    pub state: LadderState,
    #[serde(skip)]
    signals: S,
}

impl LadderPolicy {
    pub fn new(cfg: PolicyConfig) -> Self {
        LadderPolicy { cfg, state: LadderState::default(), signals: LexiconSignals }
    }
}

impl Default for LadderPolicy {
    fn default() -> Self {
        LadderPolicy::new(PolicyConfig::default())
    }
}

impl<S: SignalModel> LadderPolicy<S> {
    /// Build a policy around a custom scorer honoring the `SignalModel` contract.
    pub fn with_signals(cfg: PolicyConfig, signals: S) -> Self {
        LadderPolicy { cfg, state: LadderState::default(), signals }
    }

    /// Decide the next move for a learner utterance, respecting the ladder.
    pub fn plan(&mut self, child_text: &str) -> Move {
        self.state.history.push(Turn::child(child_text));

        let last_move = self.state.last_move;
        let confusion_p = self.signals.confusion_score(child_text);
        let success_p = self.signals.success_score(child_text);
        let (next_move, reason) = self.choose_next_move(last_move, confusion_p, success_p);

        debug!(
            "ladder decision: confusion_p={:.2} success_p={:.2} {} -> {}",
            confusion_p,
            success_p,
            last_move.name(),
            next_move.name()
        );

        self.state.last_move = next_move;

        // Internal decision record; excluded from every external surface.
        let mut meta = Map::new();
        meta.insert("confusion_p".to_string(), Value::from(confusion_p));
        meta.insert("success_p".to_string(), Value::from(success_p));
        let mut record = Turn::system(format!("policy_decision: {}", next_move.name()), meta);
        record.reason = Some(reason);
        self.state.history.push(record);

        next_move
    }

    /// Record the assistant's delivered reply. No decision logic here.
    pub fn log_assistant(
        &mut self,
        chosen: Move,
        message: &str,
        reason: &str,
        meta: Map<String, Value>,
    ) {
        self.state.history.push(Turn::assistant(message, chosen, reason, meta));
    }

    /// Check that the logged assistant turns follow the sequential,
    /// context-sensitive ladder. Observational only; never errors, and an
    /// empty or single-turn history is always ok.
    ///
    /// The skip check runs even though `plan()` already clamps, since this may
    /// be called against externally reconstructed histories.
    pub fn validate(&self) -> ValidationReport {
        let mut violations = Vec::new();
        let mut last_move: Option<Move> = None;

        for turn in &self.state.history {
            if turn.role != Role::Assistant {
                continue;
            }
            let Some(current) = turn.r#move else { continue };
            let Some(prev) = last_move else {
                last_move = Some(current);
                continue;
            };

            if current.rung() > prev.rung() + self.cfg.max_step_up {
                violations.push(Violation {
                    kind: ViolationKind::SkipUp,
                    message: format!("Skipped from {} to {}", prev.name(), current.name()),
                    turn: char_prefix(&turn.content, 120),
                });
            }

            // The learner just signalled success, yet the assistant escalated.
            // Deliberately scores the single most recent child utterance in the
            // lookback window, regardless of which turn is under review.
            let success_p = self.signals.success_score(self.recent_child_text());
            if success_p >= self.cfg.success_threshold && current > prev {
                violations.push(Violation {
                    kind: ViolationKind::UnnecessaryEscalation,
                    message: format!("Escalated despite success_p={success_p:.2}"),
                    turn: char_prefix(&turn.content, 120),
                });
            }

            last_move = Some(current);
        }

        let moves = self
            .state
            .history
            .iter()
            .filter(|t| t.role != Role::System)
            .map(|t| MoveLogEntry { role: t.role, r#move: t.r#move, text: t.content.clone() })
            .collect();

        ValidationReport { ok: violations.is_empty(), violations, moves }
    }

    fn choose_next_move(
        &mut self,
        last_move: Move,
        confusion_p: f64,
        success_p: f64,
    ) -> (Move, String) {
        let mut reason: Vec<String> = Vec::new();
        let mut new_move;

        if success_p >= self.cfg.success_threshold {
            new_move = last_move.step_down();
            reason.push(format!(
                "success_p={:.2} >= {:.2}: de-escalate",
                success_p, self.cfg.success_threshold
            ));
            self.state.stuck_rounds = 0;
        } else if confusion_p >= self.cfg.confusion_threshold {
            new_move = last_move.step_up();
            reason.push(format!(
                "confusion_p={:.2} >= {:.2}: escalate",
                confusion_p, self.cfg.confusion_threshold
            ));
            if matches!(last_move, Move::Reflect | Move::Analogy) {
                // Re-reaching the step-up target while already mid-climb.
                self.state.stuck_rounds += 1;
            } else if new_move > last_move {
                self.state.stuck_rounds = 1;
            } else {
                self.state.stuck_rounds = 0;
            }
        } else {
            if last_move > Move::Nudge {
                new_move = last_move.step_down();
                reason.push("no strong confusion: gentle de-escalation".to_string());
            } else {
                new_move = last_move;
                reason.push("stable: keep Nudge".to_string());
            }
            self.state.stuck_rounds = 0;
        }

        // The top rung is earned: either the assistant climbed through the
        // lower rungs inside the window, or the learner has been stuck for
        // enough consecutive rounds.
        if new_move == Move::MiniExplanation {
            let climbed_ok = self.climbed_sequentially();
            if !climbed_ok && self.state.stuck_rounds < self.cfg.allow_explanation_if_stuck_rounds {
                new_move = Move::Analogy;
                reason.push("blocked skip-to-explanation; using Analogy instead".to_string());
            }
        }

        (new_move, reason.join("; "))
    }

    /// True if the lookback window shows assistant visits to Nudge, then
    /// Reflect, then Analogy in relative order (not necessarily contiguous).
    fn climbed_sequentially(&self) -> bool {
        const ORDER: [Move; 3] = [Move::Nudge, Move::Reflect, Move::Analogy];
        let mut seen = [false; 3];
        let mut idx = 0usize;
        for turn in self.window_turns() {
            if turn.role != Role::Assistant {
                continue;
            }
            let Some(chosen) = turn.r#move else { continue };
            if chosen == ORDER[idx] {
                seen[idx] = true;
                if idx < ORDER.len() - 1 {
                    idx += 1;
                }
            }
        }
        seen.iter().all(|s| *s)
    }

    /// Most recent child utterance within the lookback window, else "".
    fn recent_child_text(&self) -> &str {
        self.window_turns()
            .iter()
            .rev()
            .find(|t| t.role == Role::Child)
            .map(|t| t.content.as_str())
            .unwrap_or("")
    }

    fn window_turns(&self) -> &[Turn] {
        let start = self.state.history.len().saturating_sub(self.cfg.window);
        &self.state.history[start..]
    }
}

fn char_prefix(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
