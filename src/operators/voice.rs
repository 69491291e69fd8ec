//! Voice operators — register injection and confidence shaping
//!
//! These prepend or append short phrases from the lexicon lists: hedges,
//! first-person openers, self-corrections, asides, emoji. Every injector is
//! bounded per paragraph so repeated passes cannot pile phrases up.

use crate::error::OperatorError;
use crate::lexicon::{
    Lexicon, EMOJI_CASUAL, EMOJI_CREATIVE, EMOJI_POSITIVE, EMOJI_PROFESSIONAL, EMOJI_THINKING,
};
use crate::models::{PipelineConfig, StealthLevel, Tone};
use crate::operators::lexical::WordMapSwap;
use crate::operators::{chance, per_paragraph, pick, Category, OpContext, Operator, OperatorParams};
use crate::text;
use rand::RngCore;

/// Replaces absolute-claim words with hedged equivalents.
pub struct ConfidenceSoften {
    map: WordMapSwap,
}

impl ConfidenceSoften {
    pub fn new(lexicon: &Lexicon, params: &OperatorParams) -> Self {
        Self {
            map: WordMapSwap::new(&lexicon.weakeners, params.soften_rate),
        }
    }
}

impl Operator for ConfidenceSoften {
    fn name(&self) -> &'static str {
        "confidence_soften"
    }

    fn category(&self) -> Category {
        Category::Voice
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

/// Inserts hedges or fillers mid-sentence, bounded per paragraph.
pub struct HedgeInject {
    rate: f64,
    max_per_paragraph: usize,
}

impl HedgeInject {
    pub fn new(params: &OperatorParams) -> Self {
        Self {
            rate: params.hedge_rate,
            max_per_paragraph: params.max_voice_insertions,
        }
    }
}

impl Operator for HedgeInject {
    fn name(&self) -> &'static str {
        "hedge_inject"
    }

    fn category(&self) -> Category {
        Category::Voice
    }

    fn min_level(&self) -> StealthLevel {
        StealthLevel::clamped(3)
    }

    fn apply(
        &self,
        input: &str,
        ctx: &OpContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<String, OperatorError> {
        Ok(per_paragraph(input, |para| {
            let sents = text::sentences(para);
            if sents.is_empty() {
                return para.to_string();
            }
            let mut inserted = 0;
            let out: Vec<String> = sents
                .iter()
                .map(|sentence| {
                    let words: Vec<&str> = sentence.split_whitespace().collect();
                    if inserted >= self.max_per_paragraph
                        || words.len() <= 6
                        || !chance(rng, self.rate)
                    {
                        return sentence.clone();
                    }
                    let phrase = if chance(rng, 0.5) {
                        pick(rng, &ctx.lexicon.hedges)
                    } else {
                        pick(rng, &ctx.lexicon.fillers)
                    };
                    let Some(phrase) = phrase else {
                        return sentence.clone();
                    };
                    inserted += 1;
                    let pos = crate::operators::pick_index(rng, 1, words.len().min(5));
                    let mut rebuilt: Vec<&str> = Vec::with_capacity(words.len() + 1);
                    rebuilt.extend_from_slice(&words[..pos]);
                    rebuilt.push(phrase.as_str());
                    rebuilt.extend_from_slice(&words[pos..]);
                    rebuilt.join(" ")
                })
                .collect();
            text::join_sentences(&out)
        }))
    }
}

/// Prepends first-person openers, bounded per paragraph and scaled by level.
pub struct OpenerInject {
    rate: f64,
    base_max: usize,
}

impl OpenerInject {
    pub fn new(params: &OperatorParams) -> Self {
        Self {
            rate: params.opener_rate,
            base_max: 1,
        }
    }

    /// One opener at level 3, up to three at level 5.
    fn max_for_level(&self, level: StealthLevel) -> usize {
        match level.get() {
            5 => self.base_max + 2,
            4 => self.base_max + 1,
            _ => self.base_max,
        }
    }
}

impl Operator for OpenerInject {
    fn name(&self) -> &'static str {
        "opener_inject"
    }

    fn category(&self) -> Category {
        Category::Voice
    }

    fn min_level(&self) -> StealthLevel {
        StealthLevel::clamped(3)
    }

    fn apply(
        &self,
        input: &str,
        ctx: &OpContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<String, OperatorError> {
        let max_signals = self.max_for_level(ctx.config.stealth_level);
        Ok(per_paragraph(input, |para| {
            let sents = text::sentences(para);
            if sents.is_empty() {
                return para.to_string();
            }
            let mut added = 0;
            let out: Vec<String> = sents
                .iter()
                .enumerate()
                .map(|(i, sentence)| {
                    let short = text::word_count(sentence) < 15;
                    if added >= max_signals
                        || !(i == 0 || short)
                        || sentence.starts_with("I ")
                        || !chance(rng, self.rate)
                    {
                        return sentence.clone();
                    }
                    let Some(opener) = pick(rng, &ctx.lexicon.openers) else {
                        return sentence.clone();
                    };
                    added += 1;
                    format!("{opener}{}", text::lowercase_first(sentence))
                })
                .collect();
            text::join_sentences(&out)
        }))
    }
}

/// Prepends clarifiers, self-corrections, or redundancy phrases to
/// non-initial sentences.
pub struct SelfCorrect {
    rate: f64,
    max_per_paragraph: usize,
}

impl SelfCorrect {
    pub fn new(params: &OperatorParams) -> Self {
        Self {
            rate: params.correction_rate,
            max_per_paragraph: params.max_voice_insertions,
        }
    }
}

impl Operator for SelfCorrect {
    fn name(&self) -> &'static str {
        "self_correct"
    }

    fn category(&self) -> Category {
        Category::Voice
    }

    fn min_level(&self) -> StealthLevel {
        StealthLevel::clamped(4)
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
            let mut added = 0;
            let out: Vec<String> = sents
                .iter()
                .enumerate()
                .map(|(i, sentence)| {
                    if i == 0 || added >= self.max_per_paragraph || !chance(rng, self.rate) {
                        return sentence.clone();
                    }
                    let lists = [
                        &ctx.lexicon.clarifiers,
                        &ctx.lexicon.corrections,
                        &ctx.lexicon.redundancies,
                    ];
                    let list = lists[crate::operators::pick_index(rng, 0, lists.len())];
                    let Some(lead) = pick(rng, list) else {
                        return sentence.clone();
                    };
                    added += 1;
                    format!("{lead}{}", text::lowercase_first(sentence))
                })
                .collect();
            text::join_sentences(&out)
        }))
    }
}

/// Appends parenthetical asides to a bounded fraction of sentences.
pub struct AsideInject {
    rate: f64,
    max_per_paragraph: usize,
}

impl AsideInject {
    pub fn new(params: &OperatorParams) -> Self {
        Self {
            rate: params.aside_rate,
            max_per_paragraph: params.max_voice_insertions,
        }
    }

    /// Citations and links must not be decorated.
    fn protected(sentence: &str) -> bool {
        sentence.contains("http") || sentence.contains("www.") || sentence.contains('[')
    }
}

impl Operator for AsideInject {
    fn name(&self) -> &'static str {
        "aside_inject"
    }

    fn category(&self) -> Category {
        Category::Voice
    }

    fn min_level(&self) -> StealthLevel {
        StealthLevel::MAX
    }

    fn apply(
        &self,
        input: &str,
        ctx: &OpContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<String, OperatorError> {
        Ok(per_paragraph(input, |para| {
            let sents = text::sentences(para);
            if sents.is_empty() {
                return para.to_string();
            }
            let mut added = 0;
            let out: Vec<String> = sents
                .iter()
                .map(|sentence| {
                    if added >= self.max_per_paragraph
                        || Self::protected(sentence)
                        || !chance(rng, self.rate)
                    {
                        return sentence.clone();
                    }
                    let Some(aside) = pick(rng, &ctx.lexicon.asides) else {
                        return sentence.clone();
                    };
                    added += 1;
                    format!("{}{aside}.", sentence.trim_end_matches(['.', '!', '?']))
                })
                .collect();
            text::join_sentences(&out)
        }))
    }
}

/// Appends tone-keyed emoji. Only active when the caller opted in.
pub struct EmojiInject {
    rate: f64,
}

impl EmojiInject {
    pub fn new(params: &OperatorParams) -> Self {
        Self {
            rate: params.emoji_rate,
        }
    }

    fn palette(tone: &Tone) -> Vec<&'static str> {
        match tone {
            Tone::Creative => [EMOJI_CREATIVE, EMOJI_POSITIVE].concat(),
            Tone::Casual => [EMOJI_CASUAL, EMOJI_POSITIVE].concat(),
            Tone::Professional => EMOJI_PROFESSIONAL.to_vec(),
            _ => [EMOJI_POSITIVE, EMOJI_THINKING].concat(),
        }
    }
}

impl Operator for EmojiInject {
    fn name(&self) -> &'static str {
        "emoji_inject"
    }

    fn category(&self) -> Category {
        Category::Voice
    }

    fn min_level(&self) -> StealthLevel {
        StealthLevel::MIN
    }

    fn enabled(&self, config: &PipelineConfig) -> bool {
        config.use_emojis
    }

    fn apply(
        &self,
        input: &str,
        ctx: &OpContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<String, OperatorError> {
        let palette = Self::palette(&ctx.config.tone);
        Ok(per_paragraph(input, |para| {
            let sents = text::sentences(para);
            if sents.is_empty() {
                return para.to_string();
            }
            let out: Vec<String> = sents
                .iter()
                .map(|sentence| {
                    if !chance(rng, self.rate) {
                        return sentence.clone();
                    }
                    let Some(emoji) = pick(rng, &palette) else {
                        return sentence.clone();
                    };
                    format!("{} {emoji}", sentence.trim_end_matches(['.', '!', '?']))
                })
                .collect();
            text::join_sentences(&out)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn ctx_parts() -> (PipelineConfig, Lexicon) {
        (PipelineConfig::default(), Lexicon::default())
    }

    #[test]
    fn test_soften_replaces_absolutes() {
        let (config, lexicon) = ctx_parts();
        let ctx = OpContext {
            config: &config,
            lexicon: &lexicon,
        };
        let op = ConfidenceSoften::new(
            &lexicon,
            &OperatorParams {
                soften_rate: 1.0,
                ..OperatorParams::default()
            },
        );
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let out = op
            .apply("This guarantees success and always works.", &ctx, &mut rng)
            .unwrap();
        assert!(out.contains("helps"));
        assert!(out.contains("often"));
        assert!(!out.contains("guarantees"));
    }

    #[test]
    fn test_hedge_injection_is_bounded() {
        let (config, lexicon) = ctx_parts();
        let ctx = OpContext {
            config: &config,
            lexicon: &lexicon,
        };
        let params = OperatorParams {
            hedge_rate: 1.0,
            max_voice_insertions: 1,
            ..OperatorParams::default()
        };
        let op = HedgeInject::new(&params);
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let input = "Every sentence here has plenty of words inside it. \
                     Another sentence with plenty of words follows here. \
                     A third sentence with plenty of words closes things.";
        let before = text::word_count(input);
        let out = op.apply(input, &ctx, &mut rng).unwrap();
        let after = text::word_count(&out);
        // At most one insertion of at most a three-word phrase.
        assert!(after > before);
        assert!(after <= before + 3, "too many insertions: {out:?}");
    }

    #[test]
    fn test_opener_scales_with_level() {
        let op = OpenerInject::new(&OperatorParams::default());
        assert_eq!(op.max_for_level(StealthLevel::clamped(3)), 1);
        assert_eq!(op.max_for_level(StealthLevel::clamped(4)), 2);
        assert_eq!(op.max_for_level(StealthLevel::MAX), 3);
    }

    #[test]
    fn test_aside_skips_links() {
        let (config, lexicon) = ctx_parts();
        let ctx = OpContext {
            config: &config,
            lexicon: &lexicon,
        };
        let op = AsideInject::new(&OperatorParams {
            aside_rate: 1.0,
            ..OperatorParams::default()
        });
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let input = "See http://example.com for details.";
        assert_eq!(op.apply(input, &ctx, &mut rng).unwrap(), input);
    }

    #[test]
    fn test_emoji_disabled_by_default() {
        let (config, _lexicon) = ctx_parts();
        let op = EmojiInject::new(&OperatorParams::default());
        assert!(!op.enabled(&config));
        let mut enabled_cfg = config.clone();
        enabled_cfg.use_emojis = true;
        assert!(op.enabled(&enabled_cfg));
    }
}
