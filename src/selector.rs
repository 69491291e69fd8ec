//! Adaptive level selector
//!
//! Inspects raw input features and picks a starting aggressiveness level,
//! so already-natural text is not put through transformations it does not
//! need. The rule table is deterministic; the same text always selects the
//! same level.

use crate::lexicon::Lexicon;
use crate::models::StealthLevel;
use crate::text;
use regex::Regex;
use serde::Serialize;
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// Formulaic-word density above which the text is treated as heavily
/// machine-flavored.
const HIGH_DENSITY: f64 = 0.02;
/// Density above which an elevated level is still warranted.
const MODERATE_DENSITY: f64 = 0.01;
/// Average sentence length (words) that reads as formal prose.
const LONG_SENTENCE: f64 = 25.0;
/// Formal-marker count that reads as formal prose.
const FORMAL_MARKERS: usize = 2;

fn numbered_list_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n\d+\.").expect("valid pattern"))
}

/// Raw input features driving level selection.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureVector {
    pub avg_sentence_len: f64,
    /// Formulaic transition words per word of text.
    pub formulaic_density: f64,
    pub formal_markers: usize,
    /// Bulleted or numbered list structure.
    pub has_enumeration: bool,
}

pub struct AdaptiveSelector {
    lexicon: Arc<Lexicon>,
}

impl AdaptiveSelector {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    pub fn analyze(&self, input: &str) -> FeatureVector {
        let words: Vec<&str> = input.split_whitespace().collect();
        let sents = text::sentences(input);

        let avg_sentence_len = if sents.is_empty() {
            0.0
        } else {
            words.len() as f64 / sents.len() as f64
        };

        let formulaic_count = words
            .iter()
            .filter(|w| {
                let core = text::split_affixes(w).1.to_lowercase();
                self.lexicon.ai_transitions.iter().any(|t| *t == core)
            })
            .count();
        let formulaic_density = if words.is_empty() {
            0.0
        } else {
            formulaic_count as f64 / words.len() as f64
        };

        let formal_markers = words
            .iter()
            .filter(|w| {
                let core = text::split_affixes(w).1.to_lowercase();
                self.lexicon.formal_markers.iter().any(|m| *m == core)
            })
            .count();

        let has_enumeration = input.contains('•')
            || input.contains("\n-")
            || input.contains("\n*")
            || numbered_list_re().is_match(input);

        FeatureVector {
            avg_sentence_len,
            formulaic_density,
            formal_markers,
            has_enumeration,
        }
    }

    /// Deterministic rule table: heavy formulaic density gets the top
    /// level; formal prose gets an elevated one; enumerated structure needs
    /// a mid level so the structure is broken before other operators run;
    /// everything else starts low.
    pub fn select_level(&self, features: &FeatureVector) -> StealthLevel {
        let level = if features.formulaic_density > HIGH_DENSITY {
            5
        } else if features.avg_sentence_len > LONG_SENTENCE
            || features.formal_markers > FORMAL_MARKERS
        {
            4
        } else if features.has_enumeration {
            3
        } else if features.formulaic_density > MODERATE_DENSITY {
            4
        } else {
            2
        };
        debug!(
            "selected level {level} (density {:.3}, avg len {:.1}, formal {}, enumerated {})",
            features.formulaic_density,
            features.avg_sentence_len,
            features.formal_markers,
            features.has_enumeration
        );
        StealthLevel::clamped(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector() -> AdaptiveSelector {
        AdaptiveSelector::new(Arc::new(Lexicon::default()))
    }

    #[test]
    fn test_heavy_formulaic_text_selects_max() {
        let s = selector();
        let text = "Furthermore, this works. Moreover, it scales. Additionally, it is robust.";
        let features = s.analyze(text);
        assert!(features.formulaic_density > HIGH_DENSITY);
        assert_eq!(s.select_level(&features), StealthLevel::MAX);
    }

    #[test]
    fn test_plain_text_selects_low_default() {
        let s = selector();
        let features = s.analyze("The cat sat on the mat. It purred quietly.");
        assert_eq!(s.select_level(&features).get(), 2);
    }

    #[test]
    fn test_enumerated_structure_selects_mid() {
        let s = selector();
        let features = s.analyze("Key points:\n- first item\n- second item\n- third item");
        assert!(features.has_enumeration);
        assert_eq!(s.select_level(&features).get(), 3);
    }

    #[test]
    fn test_formal_prose_selects_elevated() {
        let s = selector();
        let text = "The parties shall convene whereas the tribunal ought to decide, \
                    wherein the matter shall be resolved thereby.";
        let features = s.analyze(text);
        assert!(features.formal_markers > FORMAL_MARKERS);
        assert_eq!(s.select_level(&features).get(), 4);
    }

    #[test]
    fn test_selection_is_deterministic() {
        let s = selector();
        let text = "Some ordinary text. It says ordinary things.";
        let a = s.select_level(&s.analyze(text));
        let b = s.select_level(&s.analyze(text));
        assert_eq!(a, b);
    }
}
