//! # Session Metrics
//!
//! Pure aggregation of canonical turns into the per-session fidelity and
//! engagement rates. Turns are sorted by timestamp before the single forward
//! pass, so input order never changes the result, and recomputation on an
//! unchanged turn list is idempotent.
//!
//! Every rate is `None` ("not applicable", zero denominator) or a value in
//! [0, 1]. `None` is deliberately distinct from 0.0: a 0% rate is meaningful
//! data, a missing denominator is not.

use super::types::{
    Affect, AgentTurn, AutonomySignal, CanonicalTurn, ChildTurn, ConfusionSignal, LadderStep,
    Stance, TextFocus,
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// The eight per-session rates, persisted verbatim by the storage
/// collaborator. `None` serializes as JSON null.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionMetrics {
    // Agent-side fidelity
    pub on_text_adherence: Option<f64>,
    pub warmth_rate: Option<f64>,
    pub over_social_rate: Option<f64>,
    pub tailoring_score: Option<f64>,
    pub adaptivity_index: Option<f64>,
    // Child-side engagement
    pub child_on_task_rate: Option<f64>,
    pub child_elaboration_rate: Option<f64>,
    pub child_question_rate: Option<f64>,
}

/// numerator / denominator, or None when the denominator is zero.
pub fn safe_div(numerator: u32, denominator: u32) -> Option<f64> {
    if denominator == 0 {
        None
    } else {
        Some(f64::from(numerator) / f64::from(denominator))
    }
}

/// Did the agent pick the right ladder level for the child's last signal?
///
/// Deliberately simple rule table, treated as current policy:
/// - autonomy HIGH overrides everything: only a NUDGE is acceptable;
/// - confusion HIGH wants ANALOGY or MINIEXPLAIN;
/// - confusion LOW wants REFLECT or ANALOGY;
/// - no signal wants NUDGE or REFLECT.
///
/// An agent turn with no preceding child turn counts as well tailored.
pub fn is_well_tailored(prev_child: Option<&ChildTurn>, curr_agent: &AgentTurn) -> bool {
    let Some(prev) = prev_child else {
        return true;
    };

    if prev.autonomy_signal == AutonomySignal::High {
        return curr_agent.ladder_step == LadderStep::Nudge;
    }

    match prev.confusion_signal {
        ConfusionSignal::High => {
            matches!(curr_agent.ladder_step, LadderStep::Analogy | LadderStep::MiniExplain)
        }
        ConfusionSignal::Low => {
            matches!(curr_agent.ladder_step, LadderStep::Reflect | LadderStep::Analogy)
        }
        ConfusionSignal::None => {
            matches!(curr_agent.ladder_step, LadderStep::Nudge | LadderStep::Reflect)
        }
    }
}

/// Was an agent stance change warranted by the child's last signal?
///
/// - confusion HIGH and {QUIET,RESPONSIVE} → PROACTIVE: justified;
/// - autonomy HIGH and PROACTIVE → {RESPONSIVE,QUIET}: justified;
/// - autonomy HIGH and the new stance is PROACTIVE: not justified;
/// - everything else defaults to justified (conservative).
pub fn is_justified_stance_change(
    prev_child: Option<&ChildTurn>,
    prev_agent: &AgentTurn,
    curr_agent: &AgentTurn,
) -> bool {
    let Some(prev) = prev_child else {
        return true;
    };

    if prev.confusion_signal == ConfusionSignal::High
        && matches!(prev_agent.stance, Stance::Quiet | Stance::Responsive)
        && curr_agent.stance == Stance::Proactive
    {
        return true;
    }

    if prev.autonomy_signal == AutonomySignal::High {
        if prev_agent.stance == Stance::Proactive
            && matches!(curr_agent.stance, Stance::Responsive | Stance::Quiet)
        {
            return true;
        }
        if curr_agent.stance == Stance::Proactive {
            return false;
        }
    }

    true
}

/// Aggregate one session's canonical turns into the eight named rates.
pub fn compute_session_metrics(turns: &[CanonicalTurn]) -> SessionMetrics {
    let mut ordered: Vec<&CanonicalTurn> = turns.iter().collect();
    ordered.sort_by(|a, b| a.timestamp().partial_cmp(&b.timestamp()).unwrap_or(Ordering::Equal));

    let mut agent_turns = 0u32;
    let mut agent_on_text = 0u32;
    let mut warm_supportive = 0u32;
    let mut over_social = 0u32;
    let mut well_tailored = 0u32;
    let mut stance_changes = 0u32;
    let mut justified_stance_changes = 0u32;

    let mut child_turns = 0u32;
    let mut child_on_task = 0u32;
    let mut child_elaborated = 0u32;
    let mut child_questions = 0u32;

    let mut prev_agent: Option<&AgentTurn> = None;
    let mut prev_child: Option<&ChildTurn> = None;

    for turn in ordered {
        match turn {
            CanonicalTurn::Agent(agent) => {
                agent_turns += 1;

                if agent.text_focus == TextFocus::OnText {
                    agent_on_text += 1;
                }

                match agent.affect {
                    Affect::WarmSupportive => warm_supportive += 1,
                    Affect::OverSocial => over_social += 1,
                    Affect::Neutral => {}
                }

                if is_well_tailored(prev_child, agent) {
                    well_tailored += 1;
                }

                if let Some(prev) = prev_agent {
                    if prev.stance != agent.stance {
                        stance_changes += 1;
                        if is_justified_stance_change(prev_child, prev, agent) {
                            justified_stance_changes += 1;
                        }
                    }
                }

                prev_agent = Some(agent);
            }
            CanonicalTurn::Child(child) => {
                child_turns += 1;

                if child.on_task {
                    child_on_task += 1;
                }
                if child.elaborated {
                    child_elaborated += 1;
                }
                if child.is_question {
                    child_questions += 1;
                }

                prev_child = Some(child);
            }
        }
    }

    SessionMetrics {
        on_text_adherence: safe_div(agent_on_text, agent_turns),
        warmth_rate: safe_div(warm_supportive, agent_turns),
        over_social_rate: safe_div(over_social, agent_turns),
        tailoring_score: safe_div(well_tailored, agent_turns),
        adaptivity_index: safe_div(justified_stance_changes, stance_changes),
        child_on_task_rate: safe_div(child_on_task, child_turns),
        child_elaboration_rate: safe_div(child_elaborated, child_turns),
        child_question_rate: safe_div(child_questions, child_turns),
    }
}
