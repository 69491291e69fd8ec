//! Rhythm operator — sentence-length burstiness
//!
//! Uniform sentence lengths are a machine-generation signal. This operator
//! measures the coefficient of variation of sentence lengths per paragraph
//! and, while it sits below the configured target, splits a long sentence
//! at a clause boundary or joins two short ones — keeping an action only if
//! it actually increased the variation. It is the one operator with an
//! explicit target metric rather than a flat probability.

use crate::error::OperatorError;
use crate::models::StealthLevel;
use crate::operators::structural::ClauseRestructure;
use crate::operators::{chance, per_paragraph, Category, Guards, OpContext, Operator, OperatorParams};
use crate::text::{self, metrics::sentence_length_stats};
use rand::RngCore;

pub struct BurstinessShape {
    target_cv: f64,
    max_passes: usize,
    split_threshold: usize,
    merge_threshold: usize,
}

impl BurstinessShape {
    pub fn new(params: &OperatorParams) -> Self {
        Self {
            target_cv: params.burstiness_target,
            max_passes: params.max_rhythm_passes,
            split_threshold: params.split_threshold_words,
            merge_threshold: params.merge_threshold_words,
        }
    }

    fn cv(sents: &[String]) -> f64 {
        sentence_length_stats(sents).cv
    }

    /// Split the longest clause-bearing sentence. `None` when no sentence
    /// qualifies.
    fn try_split(&self, sents: &[String]) -> Option<Vec<String>> {
        let i = sents
            .iter()
            .enumerate()
            .filter(|(_, s)| text::word_count(s) > self.split_threshold && s.contains(", "))
            .max_by_key(|(_, s)| text::word_count(s))
            .map(|(i, _)| i)?;
        let (head, tail) = ClauseRestructure::split_at_clause(&sents[i])?;
        let mut next = sents.to_vec();
        next[i] = head;
        next.insert(i + 1, tail);
        Some(next)
    }

    /// Join the shortest adjacent pair of short sentences. `None` when no
    /// pair qualifies.
    fn try_merge(&self, sents: &[String]) -> Option<Vec<String>> {
        if sents.len() < 3 {
            return None;
        }
        let i = (0..sents.len() - 1)
            .filter(|&i| {
                text::word_count(&sents[i]) < self.merge_threshold
                    && text::word_count(&sents[i + 1]) < self.merge_threshold
            })
            .min_by_key(|&i| text::word_count(&sents[i]) + text::word_count(&sents[i + 1]))?;
        let mut next = sents.to_vec();
        let tail = next.remove(i + 1);
        let head = std::mem::take(&mut next[i]);
        next[i] = format!(
            "{} and {}",
            head.trim_end_matches(['.', '!', ',']),
            text::lowercase_first(&tail)
        );
        Some(next)
    }

    fn reshape(&self, para: &str, rng: &mut dyn RngCore) -> String {
        let mut sents = text::sentences(para);
        if sents.len() < 2 {
            return para.to_string();
        }

        for _ in 0..self.max_passes {
            let current = Self::cv(&sents);
            if current >= self.target_cv {
                break;
            }

            // Try both actions, randomizing which goes first, and keep the
            // first one that actually raises the variation.
            let split_first = chance(rng, 0.5);
            let candidates = if split_first {
                [self.try_split(&sents), self.try_merge(&sents)]
            } else {
                [self.try_merge(&sents), self.try_split(&sents)]
            };

            let improved = candidates
                .into_iter()
                .flatten()
                .find(|candidate| Self::cv(candidate) > current);

            match improved {
                Some(next) => sents = next,
                None => break,
            }
        }
        text::join_sentences(&sents)
    }
}

impl Operator for BurstinessShape {
    fn name(&self) -> &'static str {
        "burstiness_shape"
    }

    fn category(&self) -> Category {
        Category::Rhythm
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
        _ctx: &OpContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<String, OperatorError> {
        Ok(per_paragraph(input, |para| self.reshape(para, rng)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::Lexicon;
    use crate::models::PipelineConfig;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn ctx_fixture() -> (PipelineConfig, Lexicon) {
        (PipelineConfig::default(), Lexicon::default())
    }

    #[test]
    fn test_flat_rhythm_gets_reshaped() {
        let (config, lexicon) = ctx_fixture();
        let ctx = OpContext {
            config: &config,
            lexicon: &lexicon,
        };
        let op = BurstinessShape::new(&OperatorParams::default());
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        // Four identical-length short sentences: zero variation.
        let input = "The cat sat on the mat. The dog lay by the door. \
                     The bird sang in the tree. The fish swam in the bowl.";
        let before = sentence_length_stats(&text::sentences(input)).cv;
        let out = op.apply(input, &ctx, &mut rng).unwrap();
        let after = sentence_length_stats(&text::sentences(&out)).cv;
        assert!(after > before, "cv {before} -> {after}, output {out:?}");
    }

    #[test]
    fn test_never_reduces_variation() {
        let (config, lexicon) = ctx_fixture();
        let ctx = OpContext {
            config: &config,
            lexicon: &lexicon,
        };
        let op = BurstinessShape::new(&OperatorParams::default());
        for seed in 0..10 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let input = "Short one. A much longer sentence with many additional words, \
                         trailing clauses, and some extra padding at the end. Short two.";
            let before = sentence_length_stats(&text::sentences(input)).cv;
            let out = op.apply(input, &ctx, &mut rng).unwrap();
            let after = sentence_length_stats(&text::sentences(&out)).cv;
            assert!(after >= before || (after - before).abs() < 1e-9);
        }
    }

    #[test]
    fn test_bursty_text_untouched() {
        let (config, lexicon) = ctx_fixture();
        let ctx = OpContext {
            config: &config,
            lexicon: &lexicon,
        };
        let op = BurstinessShape::new(&OperatorParams::default());
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        // Already well above the default CV target.
        let input = "No. The committee reviewed every line item in the yearly budget with considerable care over two days.";
        assert_eq!(op.apply(input, &ctx, &mut rng).unwrap(), input);
    }

    #[test]
    fn test_single_sentence_untouched() {
        let (config, lexicon) = ctx_fixture();
        let ctx = OpContext {
            config: &config,
            lexicon: &lexicon,
        };
        let op = BurstinessShape::new(&OperatorParams::default());
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let input = "One sentence only here.";
        assert_eq!(op.apply(input, &ctx, &mut rng).unwrap(), input);
    }
}
