//! Heuristic scorer — counts structural and lexical human signals
//!
//! Five independent checks, each reported in the breakdown so the caller
//! can explain the score: sentence-length variance, first-person density,
//! informal markers, surface imperfections, and formulaic transition words.
//! The combined score is the fraction of passed checks, as a 0–100 human
//! probability.

use crate::lexicon::Lexicon;
use crate::models::{CheckOutcome, Classification, Confidence, QualityScore};
use crate::oracle::QualityOracle;
use crate::text::{self, metrics::sentence_length_stats};
use crate::error::OracleError;
use regex::Regex;
use std::sync::{Arc, OnceLock};

/// Standard deviation of sentence lengths above which rhythm reads human.
const VARIANCE_THRESHOLD: f64 = 8.0;
/// First-person mentions above which voice reads human.
const FIRST_PERSON_THRESHOLD: usize = 2;

fn missing_comma_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\w,\w").expect("valid pattern"))
}

pub struct HeuristicScorer {
    lexicon: Arc<Lexicon>,
}

impl HeuristicScorer {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    /// Run all checks and return the human probability (0–100) with the
    /// per-check breakdown.
    pub fn breakdown(&self, input: &str) -> (f64, Vec<CheckOutcome>) {
        let lower = input.to_lowercase();
        let padded = format!(" {lower} ");
        let sents = text::sentences(input);

        let mut checks = Vec::with_capacity(5);

        let stats = sentence_length_stats(&sents);
        checks.push(CheckOutcome {
            name: "sentence_variance",
            passed: stats.std_dev > VARIANCE_THRESHOLD,
            detail: format!("length std dev {:.1} (want > {VARIANCE_THRESHOLD})", stats.std_dev),
        });

        let first_person = [" i ", " me ", " my ", " we "]
            .iter()
            .map(|p| padded.matches(p).count())
            .sum::<usize>();
        checks.push(CheckOutcome {
            name: "first_person",
            passed: first_person > FIRST_PERSON_THRESHOLD,
            detail: format!("{first_person} first-person mention(s)"),
        });

        let informal = self
            .lexicon
            .informal_markers
            .iter()
            .map(|m| lower.matches(m.as_str()).count())
            .sum::<usize>();
        checks.push(CheckOutcome {
            name: "informal_language",
            passed: informal > 0,
            detail: format!("{informal} informal marker(s)"),
        });

        let double_space = input.contains("  ");
        let missing_comma = missing_comma_re().is_match(input);
        let casual_start = ["And ", "But ", "So "].iter().any(|w| input.starts_with(w));
        checks.push(CheckOutcome {
            name: "imperfections",
            passed: double_space || missing_comma || casual_start,
            detail: format!(
                "double space: {double_space}, tight comma: {missing_comma}, casual start: {casual_start}"
            ),
        });

        let transition_hits = self
            .lexicon
            .ai_transitions
            .iter()
            .map(|w| lower.matches(w.as_str()).count())
            .sum::<usize>();
        checks.push(CheckOutcome {
            name: "formulaic_transitions",
            passed: transition_hits == 0,
            detail: format!("{transition_hits} formulaic transition(s)"),
        });

        let passed = checks.iter().filter(|c| c.passed).count();
        let human_probability = passed as f64 / checks.len() as f64 * 100.0;
        (human_probability, checks)
    }

    fn classify(human_probability: f64) -> Classification {
        match human_probability {
            p if p >= 80.0 => Classification::VeryHumanLike,
            p if p >= 60.0 => Classification::HumanLike,
            p if p >= 40.0 => Classification::Mixed,
            p if p >= 20.0 => Classification::MachineLike,
            _ => Classification::VeryMachineLike,
        }
    }
}

impl QualityOracle for HeuristicScorer {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn score(&self, input: &str) -> Result<QualityScore, OracleError> {
        if input.trim().is_empty() {
            return Err(OracleError::ScoreFailed("empty text".to_string()));
        }
        let (human_probability, _) = self.breakdown(input);
        Ok(QualityScore {
            metric: human_probability,
            human_score: human_probability / 100.0,
            classification: Self::classify(human_probability),
            confidence: Confidence::Medium,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> HeuristicScorer {
        HeuristicScorer::new(Arc::new(Lexicon::default()))
    }

    const FORMULAIC: &str = "Furthermore, the system processes data efficiently. \
        Moreover, the architecture scales well. Additionally, the design is robust.";

    const CONVERSATIONAL: &str = "Honestly, I think this thing just works. Weird,right? \
        But my team kind of loves it. We poked at it for a week,and it never once fell over on us even though we really tried hard.";

    #[test]
    fn test_formulaic_text_scores_low() {
        let score = scorer().score(FORMULAIC).unwrap();
        assert!(score.metric < 50.0, "got {}", score.metric);
    }

    #[test]
    fn test_conversational_text_scores_higher() {
        let s = scorer();
        let formulaic = s.score(FORMULAIC).unwrap();
        let conversational = s.score(CONVERSATIONAL).unwrap();
        assert!(conversational.metric > formulaic.metric);
    }

    #[test]
    fn test_score_is_deterministic() {
        let s = scorer();
        let a = s.score(FORMULAIC).unwrap();
        let b = s.score(FORMULAIC).unwrap();
        assert_eq!(a.metric, b.metric);
        assert_eq!(a.classification, b.classification);
    }

    #[test]
    fn test_breakdown_reports_every_check() {
        let (_, checks) = scorer().breakdown(FORMULAIC);
        assert_eq!(checks.len(), 5);
        let names: Vec<_> = checks.iter().map(|c| c.name).collect();
        assert!(names.contains(&"sentence_variance"));
        assert!(names.contains(&"formulaic_transitions"));
    }

    #[test]
    fn test_empty_text_is_an_error() {
        assert!(scorer().score("   ").is_err());
    }
}
