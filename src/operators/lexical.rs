//! Lexical operators — word-level substitution
//!
//! `synonym_swap` replaces a bounded fraction of eligible words with
//! synonyms from the thesaurus capability, skipping stop words and short
//! words and preserving the original casing. `contraction_fold` and
//! `register_loosen` apply fixed word maps probabilistically.

use crate::error::OperatorError;
use crate::lexicon::Lexicon;
use crate::models::StealthLevel;
use crate::operators::{chance, per_paragraph, pick, Category, OpContext, Operator, OperatorParams};
use crate::capabilities::Thesaurus;
use crate::text;
use rand::RngCore;
use regex::Regex;
use std::sync::Arc;

/// Synonym length may differ from the original by at most this much; larger
/// jumps read as thesaurus abuse.
const MAX_LEN_DRIFT: usize = 4;

/// Precompiled word→replacement map applied with a per-pair probability.
/// Shared by the fold/loosen/soften operators.
pub(crate) struct WordMapSwap {
    patterns: Vec<(Regex, String)>,
    rate: f64,
}

impl WordMapSwap {
    pub(crate) fn new(pairs: &[(String, String)], rate: f64) -> Self {
        let patterns = pairs
            .iter()
            .map(|(from, to)| {
                let re = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(from)))
                    .expect("word map pattern is valid");
                (re, to.clone())
            })
            .collect();
        Self { patterns, rate }
    }

    pub(crate) fn apply(&self, input: &str, rng: &mut dyn RngCore) -> String {
        let mut out = input.to_string();
        for (re, replacement) in &self.patterns {
            if !re.is_match(&out) || !chance(rng, self.rate) {
                continue;
            }
            out = re
                .replace_all(&out, |caps: &regex::Captures<'_>| {
                    text::match_case(&caps[0], replacement)
                })
                .into_owned();
        }
        out
    }
}

/// Bounded-fraction synonym replacement.
pub struct SynonymSwap {
    thesaurus: Arc<dyn Thesaurus>,
    rate: f64,
    min_word_len: usize,
}

impl SynonymSwap {
    pub fn new(thesaurus: Arc<dyn Thesaurus>, params: &OperatorParams) -> Self {
        Self {
            thesaurus,
            rate: params.synonym_rate,
            min_word_len: params.min_word_len,
        }
    }

    fn swap_token(&self, token: &str, ctx: &OpContext<'_>, rng: &mut dyn RngCore) -> String {
        let (prefix, core, suffix) = text::split_affixes(token);
        if core.chars().count() < self.min_word_len
            || !core.chars().all(|c| c.is_alphabetic())
            || ctx.lexicon.is_stop_word(core)
            || !chance(rng, self.rate)
        {
            return token.to_string();
        }

        let synonyms = self.thesaurus.synonyms(&core.to_lowercase());
        if synonyms.is_empty() {
            return token.to_string();
        }
        let similar: Vec<&String> = synonyms
            .iter()
            .filter(|s| s.len().abs_diff(core.len()) <= MAX_LEN_DRIFT)
            .collect();
        let pool: Vec<&String> = if similar.is_empty() {
            synonyms.iter().collect()
        } else {
            similar
        };

        match pick(rng, &pool) {
            Some(choice) => format!("{prefix}{}{suffix}", text::match_case(core, choice)),
            None => token.to_string(),
        }
    }
}

impl Operator for SynonymSwap {
    fn name(&self) -> &'static str {
        "synonym_swap"
    }

    fn category(&self) -> Category {
        Category::Lexical
    }

    fn min_level(&self) -> StealthLevel {
        StealthLevel::MIN
    }

    fn apply(
        &self,
        input: &str,
        ctx: &OpContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<String, OperatorError> {
        Ok(per_paragraph(input, |para| {
            para.split_whitespace()
                .map(|token| self.swap_token(token, ctx, rng))
                .collect::<Vec<_>>()
                .join(" ")
        }))
    }
}

/// Folds formal pairs into contractions.
pub struct ContractionFold {
    map: WordMapSwap,
}

impl ContractionFold {
    pub fn new(lexicon: &Lexicon, params: &OperatorParams) -> Self {
        Self {
            map: WordMapSwap::new(&lexicon.contractions, params.contraction_rate),
        }
    }
}

impl Operator for ContractionFold {
    fn name(&self) -> &'static str {
        "contraction_fold"
    }

    fn category(&self) -> Category {
        Category::Lexical
    }

    fn min_level(&self) -> StealthLevel {
        StealthLevel::clamped(2)
    }

    fn apply(
        &self,
        input: &str,
        _ctx: &OpContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<String, OperatorError> {
        Ok(self.map.apply(input, rng))
    }
}

/// Swaps stiff register words for looser equivalents.
pub struct RegisterLoosen {
    map: WordMapSwap,
}

impl RegisterLoosen {
    pub fn new(lexicon: &Lexicon, params: &OperatorParams) -> Self {
        Self {
            map: WordMapSwap::new(&lexicon.loosening, params.loosen_rate),
        }
    }
}

impl Operator for RegisterLoosen {
    fn name(&self) -> &'static str {
        "register_loosen"
    }

    fn category(&self) -> Category {
        Category::Lexical
    }

    fn min_level(&self) -> StealthLevel {
        StealthLevel::clamped(3)
    }

    fn apply(
        &self,
        input: &str,
        _ctx: &OpContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<String, OperatorError> {
        Ok(self.map.apply(input, rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PipelineConfig;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    struct FixedThesaurus;
    impl Thesaurus for FixedThesaurus {
        fn synonyms(&self, word: &str) -> Vec<String> {
            if word == "important" {
                vec!["significant".to_string()]
            } else {
                Vec::new()
            }
        }
    }

    fn ctx_parts() -> (PipelineConfig, Lexicon) {
        (PipelineConfig::default(), Lexicon::default())
    }

    #[test]
    fn test_synonym_swap_preserves_case_and_punctuation() {
        let (config, lexicon) = ctx_parts();
        let ctx = OpContext {
            config: &config,
            lexicon: &lexicon,
        };
        let op = SynonymSwap::new(
            Arc::new(FixedThesaurus),
            &OperatorParams {
                synonym_rate: 1.0,
                ..OperatorParams::default()
            },
        );
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let out = op.apply("Important, yes.", &ctx, &mut rng).unwrap();
        assert_eq!(out, "Significant, yes.");
    }

    #[test]
    fn test_synonym_swap_skips_stop_words() {
        let (config, lexicon) = ctx_parts();
        let ctx = OpContext {
            config: &config,
            lexicon: &lexicon,
        };
        let op = SynonymSwap::new(
            Arc::new(FixedThesaurus),
            &OperatorParams {
                synonym_rate: 1.0,
                ..OperatorParams::default()
            },
        );
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        // "that" is a stop word, "cat" is below the length floor.
        let input = "that cat";
        assert_eq!(op.apply(input, &ctx, &mut rng).unwrap(), input);
    }

    #[test]
    fn test_contraction_fold() {
        let (config, lexicon) = ctx_parts();
        let ctx = OpContext {
            config: &config,
            lexicon: &lexicon,
        };
        let op = ContractionFold::new(
            &lexicon,
            &OperatorParams {
                contraction_rate: 1.0,
                ..OperatorParams::default()
            },
        );
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let out = op.apply("We cannot say. Do not ask.", &ctx, &mut rng).unwrap();
        assert!(out.contains("can't"));
        assert!(out.contains("Don't"));
    }

    #[test]
    fn test_register_loosen_keeps_case() {
        let (config, lexicon) = ctx_parts();
        let ctx = OpContext {
            config: &config,
            lexicon: &lexicon,
        };
        let op = RegisterLoosen::new(
            &lexicon,
            &OperatorParams {
                loosen_rate: 1.0,
                ..OperatorParams::default()
            },
        );
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let out = op.apply("Utilize the tool.", &ctx, &mut rng).unwrap();
        assert_eq!(out, "Use the tool.");
    }
}
