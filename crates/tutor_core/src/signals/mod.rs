//! # Turn Signal Extraction
//!
//! Pure text → probability-like scores in [0, 1] feeding the ladder policy.
//!
//! The scores are lightweight lexicon proxies, not NLP. They sit behind the
//! `SignalModel` trait so a learned classifier can replace them later without
//! touching the state machine.

use once_cell::sync::Lazy;
use regex::Regex;

/// Numeric contract between raw learner text and the ladder policy.
///
/// Implementations must be pure, stateless and deterministic: the same text
/// always yields the same scores, and both scores stay in [0, 1].
pub trait SignalModel {
    /// Likelihood that the learner is confused or stalled.
    fn confusion_score(&self, text: &str) -> f64;
    /// Likelihood that the learner is progressing or self-explaining.
    fn success_score(&self, text: &str) -> f64;
}

static CONFUSION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(i don't know|idk|help|stuck|confused|what\?|huh|lost|can't|cannot|don't get)\b|\?\s*$",
    )
    .expect("confusion pattern compiles")
});

static SUCCESS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(got it|i see|ohh|that makes sense|i can|let me try|done|answer is|because)\b")
        .expect("success pattern compiles")
});

static CAUSAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(because|therefore|so that)\b").expect("causal pattern compiles"));

/// Lexicon-backed default scorer. This is the production heuristic.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconSignals;

impl SignalModel for LexiconSignals {
    fn confusion_score(&self, text: &str) -> f64 {
        let mut score = 0.0;
        if CONFUSION_RE.is_match(text) {
            score += 0.7;
        }
        // Lots of question marks raise the score, capped at +0.3.
        let qmarks = text.matches('?').count() as f64;
        score += (0.05 * qmarks).min(0.3);
        // A very short or empty reply can indicate confusion.
        if text.trim().chars().count() < 4 {
            score += 0.2;
        }
        score.clamp(0.0, 1.0)
    }

    fn success_score(&self, text: &str) -> f64 {
        let mut score: f64 = 0.0;
        if SUCCESS_RE.is_match(text) {
            score += 0.7;
        }
        // A causal connective often indicates an explanation attempt.
        if CAUSAL_RE.is_match(text) {
            score += 0.2;
        }
        // Slight bump for longer, coherent answers.
        if text.split_whitespace().count() >= 8 {
            score += 0.1;
        }
        score.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn confusion(text: &str) -> f64 {
        LexiconSignals.confusion_score(text)
    }

    fn success(text: &str) -> f64 {
        LexiconSignals.success_score(text)
    }

    #[test]
    fn test_confusion_lexicon_hit() {
        // "stuck" matches the lexicon; length and '?' bonuses do not apply.
        assert!((confusion("I am stuck") - 0.7).abs() < EPS);
    }

    #[test]
    fn test_confusion_short_reply_bonus() {
        // "idk": lexicon +0.7, three chars +0.2.
        assert!((confusion("idk") - 0.9).abs() < EPS);
        // Empty text only earns the short-reply bonus.
        assert!((confusion("") - 0.2).abs() < EPS);
    }

    #[test]
    fn test_confusion_trailing_question_mark() {
        // Trailing '?': pattern +0.7, one qmark +0.05, single char +0.2.
        assert!((confusion("?") - 0.95).abs() < EPS);
    }

    #[test]
    fn test_confusion_question_mark_cap() {
        // Ten qmarks cap at +0.3; with the pattern and short-reply bonuses the
        // total clamps to 1.0.
        assert!((confusion("??????????") - 1.0).abs() < EPS);
    }

    #[test]
    fn test_confusion_neutral_text() {
        assert!((confusion("The dragon guards the bridge at night")).abs() < EPS);
    }

    #[test]
    fn test_success_lexicon_hit() {
        assert!((success("got it") - 0.7).abs() < EPS);
        assert!((success("that makes sense now") - 0.7).abs() < EPS);
    }

    #[test]
    fn test_success_causal_connective_stacks() {
        // "because" hits both the success lexicon and the causal connective.
        assert!((success("because") - 0.9).abs() < EPS);
    }

    #[test]
    fn test_success_long_answer_bonus() {
        // 11 words with "because": 0.7 + 0.2 + 0.1, clamped to 1.0.
        let text = "I think the hero wins because he is brave and kind";
        assert!((success(text) - 1.0).abs() < EPS);
        // 8 neutral words earn only the length bonus.
        assert!((success("the fox ran over the hill this morning") - 0.1).abs() < EPS);
    }

    #[test]
    fn test_success_neutral_text() {
        assert!(success("ok").abs() < EPS);
    }

    #[test]
    fn test_scores_are_deterministic_and_bounded() {
        for text in ["idk???", "", "because because because", "WHAT?", "let me try it"] {
            let c1 = confusion(text);
            let s1 = success(text);
            assert_eq!(c1, confusion(text));
            assert_eq!(s1, success(text));
            assert!((0.0..=1.0).contains(&c1));
            assert!((0.0..=1.0).contains(&s1));
        }
    }
}
