//! # Move Constraint Rendering
//!
//! The instruction/constraint text the core hands to the text-generation
//! collaborator for the chosen move. Persona and coaching prose are external
//! configuration; only the machine-owned guardrails live here, so the policy
//! decides the move and these blocks constrain the phrasing.

use crate::ladder::Move;
use once_cell::sync::Lazy;
use regex::Regex;

static UNCERTAIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)\bidk\b|\bnot sure\b|\bi\s*(do\s*not|don't)\s*know\b",
        r"|\bi\s*(do\s*not|don't)\s*have\s*(any\s*)?questions?\b",
        r"|\bno\s*questions?\b|\bnothing\s*to\s*ask\b|\bno\s*idea\b",
    ))
    .expect("uncertainty pattern compiles")
});

/// Phrasing guardrail enforcing the ladder in the generated reply.
pub fn move_guideline(chosen: Move) -> &'static str {
    match chosen {
        Move::Nudge => {
            "MOVE=NUDGE. Give ONLY 1-2 sentences of encouragement or a recall cue. \
             Do NOT introduce new content or hints. Ask exactly one small follow-up question."
        }
        Move::Reflect => {
            "MOVE=REFLECT. Ask the child to think aloud with ONE focused question. \
             Do NOT give hints or answers yet. Keep to 1-2 sentences, then ask one question."
        }
        Move::Analogy => {
            "MOVE=ANALOGY. Offer exactly ONE familiar analogy (kid-friendly) that maps to \
             the concept. Keep it short (<=2 sentences), then ask one question about how \
             the analogy helps."
        }
        Move::MiniExplanation => {
            "MOVE=MINI_EXPLANATION. Provide a very brief clarification (<=2 sentences), \
             then hand control back with one question inviting them to try."
        }
    }
}

/// True when the learner signalled uncertainty or "no questions".
pub fn should_force_question(text: &str) -> bool {
    UNCERTAIN_RE.is_match(text.trim())
}

const FORCE_QUESTION_ADDENDUM: &str =
    "The child expressed uncertainty or having no questions. Respond with a SHORT, \
     supportive coaching nudge that ends with EXACTLY ONE clear question. Choose ONE: \
     ask for a 1-2 sentence summary, a prediction with a reason, a tricky word or line \
     to unpack, or how a character feels with text evidence. Keep to 1-2 sentences total.";

/// Full constraint block for one reply: the move guardrail plus, when the
/// learner signalled uncertainty, the single-question coaching addendum.
pub fn scaffold_directive(chosen: Move, force_question: bool) -> String {
    let mut directive = String::from(move_guideline(chosen));
    if force_question {
        directive.push_str("\n\n");
        directive.push_str(FORCE_QUESTION_ADDENDUM);
    }
    directive
}
