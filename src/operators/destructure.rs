//! Destructuring operators — break formulaic surface structure
//!
//! `strip_transitions` removes the transition vocabulary and sentence-
//! initial formulas that generated prose leans on, and simplifies stacked
//! subordinate clauses. `sentence_shuffle` re-partitions adjacent sentences
//! by merging or swapping them; content is never discarded, only re-joined
//! or re-ordered.

use crate::error::OperatorError;
use crate::lexicon::Lexicon;
use crate::models::StealthLevel;
use crate::operators::{chance, per_paragraph, pick, Category, Guards, OpContext, Operator, OperatorParams};
use crate::text;
use rand::RngCore;
use regex::Regex;

/// Removes formulaic transitions and openers.
pub struct StripTransitions {
    transition_res: Vec<Regex>,
    opener_res: Vec<Regex>,
    cleanup_spaces: Regex,
    cleanup_orphan_comma: Regex,
    strip_rate: f64,
}

impl StripTransitions {
    pub fn new(lexicon: &Lexicon, params: &OperatorParams) -> Self {
        let transition_res = lexicon
            .ai_transitions
            .iter()
            .map(|word| {
                Regex::new(&format!(r"(?i)\b{}\b,?\s?", regex::escape(word)))
                    .expect("transition pattern is valid")
            })
            .collect();
        let opener_res = lexicon
            .formulaic_openers
            .iter()
            .map(|phrase| {
                Regex::new(&format!(r"(?i)^{},?\s*", regex::escape(phrase)))
                    .expect("opener pattern is valid")
            })
            .collect();
        Self {
            transition_res,
            opener_res,
            cleanup_spaces: Regex::new(r"\s{2,}").expect("valid pattern"),
            cleanup_orphan_comma: Regex::new(r"\s+([,.;!?])").expect("valid pattern"),
            strip_rate: params.transition_strip_rate,
        }
    }

    fn clean_sentence(&self, sentence: &str, rng: &mut dyn RngCore) -> String {
        let mut s = sentence.to_string();

        for re in &self.opener_res {
            if re.is_match(&s) && chance(rng, self.strip_rate) {
                let stripped = re.replace(&s, "").into_owned();
                s = text::uppercase_first(stripped.trim_start());
                break;
            }
        }

        for re in &self.transition_res {
            if re.is_match(&s) && chance(rng, self.strip_rate) {
                s = re.replace_all(&s, "").into_owned();
            }
        }

        // Stacked subordinate clauses read as machine cadence.
        s = s.replace(", which ", ". This ");
        s = s.replace(", while ", ". But ");
        s = s.replace(", although ", ". Even though ");

        s = self.cleanup_spaces.replace_all(&s, " ").into_owned();
        s = self.cleanup_orphan_comma.replace_all(&s, "$1").into_owned();
        let s = s.trim();

        if s.chars().any(|c| c.is_alphabetic()) {
            text::uppercase_first(s)
        } else {
            // Stripping gutted the sentence; keep the original.
            sentence.to_string()
        }
    }
}

impl Operator for StripTransitions {
    fn name(&self) -> &'static str {
        "strip_transitions"
    }

    fn category(&self) -> Category {
        Category::Destructure
    }

    fn min_level(&self) -> StealthLevel {
        StealthLevel::MIN
    }

    fn apply(
        &self,
        input: &str,
        _ctx: &OpContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<String, OperatorError> {
        Ok(per_paragraph(input, |para| {
            let sents = text::sentences(para);
            if sents.is_empty() {
                return para.to_string();
            }
            let cleaned: Vec<String> = sents
                .iter()
                .map(|s| self.clean_sentence(s, rng))
                .collect();
            text::join_sentences(&cleaned)
        }))
    }
}

/// Merges or swaps adjacent sentences.
pub struct SentenceShuffle {
    shuffle_rate: f64,
}

impl SentenceShuffle {
    pub fn new(params: &OperatorParams) -> Self {
        Self {
            shuffle_rate: params.shuffle_rate,
        }
    }

    fn merge(s1: &str, s2: &str, connector: &str) -> String {
        let s1 = s1.trim_end_matches(['.', ',', '!']);
        let first_word = s2.split_whitespace().next().unwrap_or("");
        let s2 = if matches!(first_word, "I" | "I'm" | "I've" | "I'd") {
            s2.to_string()
        } else {
            text::lowercase_first(s2)
        };
        format!("{s1}{connector}{s2}")
    }
}

impl Operator for SentenceShuffle {
    fn name(&self) -> &'static str {
        "sentence_shuffle"
    }

    fn category(&self) -> Category {
        Category::Destructure
    }

    fn min_level(&self) -> StealthLevel {
        StealthLevel::clamped(2)
    }

    fn guards(&self) -> Guards {
        Guards::MULTI_SENTENCE
    }

    fn apply(
        &self,
        input: &str,
        ctx: &OpContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<String, OperatorError> {
        Ok(per_paragraph(input, |para| {
            let sents = text::sentences(para);
            if sents.len() < 2 {
                return para.to_string();
            }

            let mut out: Vec<String> = Vec::with_capacity(sents.len());
            let mut i = 0;
            while i < sents.len() {
                if i + 1 < sents.len() && chance(rng, self.shuffle_rate) {
                    if chance(rng, 0.5) {
                        let connector = pick(rng, &ctx.lexicon.connectors)
                            .cloned()
                            .unwrap_or_else(|| " and ".to_string());
                        out.push(Self::merge(&sents[i], &sents[i + 1], &connector));
                    } else {
                        // Slightly out-of-order delivery reads as human.
                        out.push(sents[i + 1].clone());
                        out.push(sents[i].clone());
                    }
                    i += 2;
                } else {
                    out.push(sents[i].clone());
                    i += 1;
                }
            }
            text::join_sentences(&out)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PipelineConfig;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn ctx_parts() -> (PipelineConfig, Lexicon) {
        (PipelineConfig::default(), Lexicon::default())
    }

    #[test]
    fn test_strip_removes_transitions() {
        let (config, lexicon) = ctx_parts();
        let ctx = OpContext {
            config: &config,
            lexicon: &lexicon,
        };
        let op = StripTransitions::new(&lexicon, &OperatorParams::default());
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let out = op
            .apply(
                "Furthermore, the results were good. The team, moreover, agreed.",
                &ctx,
                &mut rng,
            )
            .unwrap();
        let lower = out.to_lowercase();
        assert!(!lower.contains("furthermore"));
        assert!(!lower.contains("moreover"));
        assert!(!out.is_empty());
    }

    #[test]
    fn test_strip_keeps_sentence_when_gutted() {
        let (config, lexicon) = ctx_parts();
        let ctx = OpContext {
            config: &config,
            lexicon: &lexicon,
        };
        let op = StripTransitions::new(&lexicon, &OperatorParams::default());
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        // A sentence that is nothing but a transition survives unchanged.
        let out = op.apply("Furthermore.", &ctx, &mut rng).unwrap();
        assert!(!out.trim().is_empty());
    }

    #[test]
    fn test_shuffle_preserves_words() {
        let (config, lexicon) = ctx_parts();
        let ctx = OpContext {
            config: &config,
            lexicon: &lexicon,
        };
        let op = SentenceShuffle::new(&OperatorParams {
            shuffle_rate: 1.0,
            ..OperatorParams::default()
        });
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let input = "The cat sat down. The dog barked loudly. The bird flew away.";
        let out = op.apply(input, &ctx, &mut rng).unwrap();

        // Re-partitioning never drops content words.
        for word in ["cat", "dog", "barked", "bird", "flew"] {
            assert!(out.to_lowercase().contains(word), "lost {word:?} in {out:?}");
        }
    }

    #[test]
    fn test_shuffle_single_sentence_untouched() {
        let (config, lexicon) = ctx_parts();
        let ctx = OpContext {
            config: &config,
            lexicon: &lexicon,
        };
        let op = SentenceShuffle::new(&OperatorParams::default());
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let input = "The cat sat on the mat.";
        assert_eq!(op.apply(input, &ctx, &mut rng).unwrap(), input);
    }
}
