//! Mutation operator framework
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Operator Trait                         │
//! │  - name(): unique identifier                                │
//! │  - category(): catalogue group                              │
//! │  - min_level(): gate — lowest level the operator runs at    │
//! │  - guards(): minimum sentence/word counts, else skip        │
//! │  - apply(text, ctx, rng): the transform                     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!          ┌───────────┬───────┴────┬──────────┬─────────┐
//!          ▼           ▼            ▼          ▼         ▼
//!     destructure  structural    lexical     voice    rhythm/noise
//! ```
//!
//! The catalogue is one ordered table; level gating is a filter over it
//! (`min_level <= level`), so the set active at level L is always a
//! superset of the set active at L−1. Category groups are ordered so that
//! structural operators run before noise operators.
//!
//! Every probability and bound is an explicit [`OperatorParams`] field —
//! no constants baked into transform logic.

mod destructure;
mod lexical;
mod noise;
mod rhythm;
mod structural;
mod voice;

pub use destructure::{SentenceShuffle, StripTransitions};
pub use lexical::{ContractionFold, RegisterLoosen, SynonymSwap};
pub use noise::{HomoglyphNoise, ZeroWidthNoise};
pub use rhythm::BurstinessShape;
pub use structural::{ClauseRestructure, DetailShuffle, ParaphraseSentences, RemoteRewrite};
pub use voice::{AsideInject, ConfidenceSoften, EmojiInject, HedgeInject, OpenerInject, SelfCorrect};

use crate::capabilities::{Paraphraser, RemoteRewriter, Thesaurus};
use crate::error::OperatorError;
use crate::lexicon::Lexicon;
use crate::models::{PipelineConfig, StealthLevel};
use rand::seq::IndexedRandom;
use rand::{Rng, RngCore};
use std::sync::Arc;

/// Catalogue group. Declaration order here is execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Category {
    Destructure,
    Structural,
    Lexical,
    Voice,
    Rhythm,
    Noise,
}

/// Minimum input shape an operator needs. Inputs below either threshold
/// skip the operator instead of raising.
#[derive(Debug, Clone, Copy, Default)]
pub struct Guards {
    pub min_sentences: usize,
    pub min_words: usize,
}

impl Guards {
    pub const NONE: Guards = Guards {
        min_sentences: 0,
        min_words: 0,
    };

    /// Reordering/merging/splitting needs at least two sentences and a few
    /// words to work with.
    pub const MULTI_SENTENCE: Guards = Guards {
        min_sentences: 2,
        min_words: 4,
    };
}

/// Per-call context handed to operators.
pub struct OpContext<'a> {
    pub config: &'a PipelineConfig,
    pub lexicon: &'a Lexicon,
}

/// A single text-to-text transform, gated by a minimum level.
///
/// Operators are stateless and process-wide: constructed once, reused for
/// every call. All randomness comes from the injected `rng`.
pub trait Operator: Send + Sync {
    /// Unique identifier, used in reports and logs.
    fn name(&self) -> &'static str;

    fn category(&self) -> Category;

    /// Lowest stealth level at which this operator is active.
    fn min_level(&self) -> StealthLevel;

    fn guards(&self) -> Guards {
        Guards::NONE
    }

    /// Whether the operator participates under this configuration.
    /// Noise operators require `use_artifacts`; emoji requires `use_emojis`.
    fn enabled(&self, config: &PipelineConfig) -> bool {
        let _ = config;
        true
    }

    /// Apply the transform. Must leave non-empty input non-empty and never
    /// discard sentence content wholesale; a failure here is isolated by
    /// the engine.
    fn apply(
        &self,
        text: &str,
        ctx: &OpContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<String, OperatorError>;
}

/// Probability parameters and bounds for the whole catalogue.
#[derive(Debug, Clone)]
pub struct OperatorParams {
    /// Chance of removing each matched formulaic transition.
    pub transition_strip_rate: f64,
    /// Chance of merging/swapping at each adjacent sentence pair.
    pub shuffle_rate: f64,
    /// Chance of paraphrasing each sentence.
    pub paraphrase_rate: f64,
    /// Sentences longer than this (words) are split candidates.
    pub split_threshold_words: usize,
    /// Sentences shorter than this (words) are merge candidates.
    pub merge_threshold_words: usize,
    /// Chance of restructuring at each eligible point.
    pub restructure_rate: f64,
    /// Chance of shuffling a paragraph's middle sentences.
    pub detail_shuffle_rate: f64,
    /// Fraction of eligible words considered for synonym replacement.
    pub synonym_rate: f64,
    /// Words shorter than this are never replaced.
    pub min_word_len: usize,
    /// Chance of folding each formal pair into its contraction.
    pub contraction_rate: f64,
    /// Chance of loosening each stiff register word.
    pub loosen_rate: f64,
    /// Chance of softening each absolute-claim word.
    pub soften_rate: f64,
    /// Chance of inserting a hedge into an eligible sentence.
    pub hedge_rate: f64,
    /// Chance of prepending a first-person opener.
    pub opener_rate: f64,
    /// Chance of prepending a self-correction/clarifier.
    pub correction_rate: f64,
    /// Chance of appending an aside to a sentence.
    pub aside_rate: f64,
    /// Chance of appending an emoji to a sentence.
    pub emoji_rate: f64,
    /// Hard cap on voice insertions per paragraph, per operator.
    pub max_voice_insertions: usize,
    /// Target coefficient of variation of sentence lengths.
    pub burstiness_target: f64,
    /// Maximum reshaping passes per paragraph.
    pub max_rhythm_passes: usize,
    /// Chance of injecting zero-width characters into a word.
    pub zero_width_rate: f64,
    /// Chance of substituting each mappable character.
    pub homoglyph_rate: f64,
}

impl Default for OperatorParams {
    fn default() -> Self {
        Self {
            transition_strip_rate: 1.0,
            shuffle_rate: 0.45,
            paraphrase_rate: 0.5,
            split_threshold_words: 15,
            merge_threshold_words: 8,
            restructure_rate: 0.4,
            detail_shuffle_rate: 0.5,
            synonym_rate: 0.12,
            min_word_len: 4,
            contraction_rate: 0.6,
            loosen_rate: 0.5,
            soften_rate: 0.9,
            hedge_rate: 0.3,
            opener_rate: 0.15,
            correction_rate: 0.10,
            aside_rate: 0.15,
            emoji_rate: 0.15,
            max_voice_insertions: 2,
            burstiness_target: 0.45,
            max_rhythm_passes: 3,
            zero_width_rate: 0.4,
            homoglyph_rate: 0.2,
        }
    }
}

/// External capabilities injected into the catalogue. Optional ones degrade
/// their dependent operators to no-ops when absent.
#[derive(Clone)]
pub struct CapabilitySet {
    pub thesaurus: Arc<dyn Thesaurus>,
    pub paraphraser: Option<Arc<dyn Paraphraser>>,
    pub rewriter: Option<Arc<RemoteRewriter>>,
}

impl Default for CapabilitySet {
    fn default() -> Self {
        Self {
            thesaurus: Arc::new(crate::capabilities::StaticThesaurus::default()),
            paraphraser: None,
            rewriter: None,
        }
    }
}

/// Build the full ordered catalogue.
///
/// Order is category-grouped: destructuring → structural → lexical → voice
/// → rhythm → noise. Intra-category order follows the historical pass
/// sequence.
pub fn catalogue(
    lexicon: &Lexicon,
    params: &OperatorParams,
    caps: &CapabilitySet,
) -> Vec<Arc<dyn Operator>> {
    vec![
        // Destructuring
        Arc::new(StripTransitions::new(lexicon, params)),
        Arc::new(SentenceShuffle::new(params)),
        // Structural
        Arc::new(RemoteRewrite::new(caps.rewriter.clone())),
        Arc::new(ParaphraseSentences::new(caps.paraphraser.clone(), params)),
        Arc::new(ClauseRestructure::new(params)),
        Arc::new(DetailShuffle::new(params)),
        // Lexical
        Arc::new(SynonymSwap::new(Arc::clone(&caps.thesaurus), params)),
        Arc::new(ContractionFold::new(lexicon, params)),
        Arc::new(RegisterLoosen::new(lexicon, params)),
        // Voice
        Arc::new(ConfidenceSoften::new(lexicon, params)),
        Arc::new(HedgeInject::new(params)),
        Arc::new(OpenerInject::new(params)),
        Arc::new(SelfCorrect::new(params)),
        Arc::new(AsideInject::new(params)),
        Arc::new(EmojiInject::new(params)),
        // Rhythm
        Arc::new(BurstinessShape::new(params)),
        // Noise (always last)
        Arc::new(ZeroWidthNoise::new(params)),
        Arc::new(HomoglyphNoise::new(params)),
    ]
}

/// Draw a yes/no with probability `p`, clamped into [0, 1].
pub(crate) fn chance(rng: &mut dyn RngCore, p: f64) -> bool {
    if p <= 0.0 {
        return false;
    }
    if p >= 1.0 {
        return true;
    }
    rng.random_bool(p)
}

/// Pick a random element of a non-empty slice.
pub(crate) fn pick<'a, T>(rng: &mut dyn RngCore, items: &'a [T]) -> Option<&'a T> {
    items.choose(rng)
}

/// Random index in `lo..hi` (half-open). Requires `lo < hi`.
pub(crate) fn pick_index(rng: &mut dyn RngCore, lo: usize, hi: usize) -> usize {
    rng.random_range(lo..hi)
}

/// Apply `f` to each non-blank paragraph unit, leaving blank lines intact.
pub(crate) fn per_paragraph(text: &str, mut f: impl FnMut(&str) -> String) -> String {
    text.split('\n')
        .map(|line| {
            if line.trim().is_empty() {
                line.to_string()
            } else {
                f(line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
