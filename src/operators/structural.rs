//! Structural operators — re-express and re-order sentence content
//!
//! `remote_rewrite` hands the whole text to a hosted model with a persona
//! prompt derived from tone and audience. `paraphrase_sentences` re-expresses
//! individual sentences through the paraphrase capability. Both degrade to
//! no-ops when their capability is absent. `clause_restructure` re-partitions
//! sentences at clause boundaries, and `detail_shuffle` reorders the middle
//! of a paragraph while pinning the topic and conclusion sentences.

use crate::capabilities::{Paraphraser, RemoteRewriter, SamplingParams};
use crate::error::OperatorError;
use crate::models::{StealthLevel, Tone};
use crate::operators::{
    chance, per_paragraph, pick, Category, Guards, OpContext, Operator, OperatorParams,
};
use crate::text;
use rand::seq::SliceRandom;
use rand::RngCore;
use std::sync::Arc;
use tracing::debug;

/// Whole-text rewrite through the remote backend chain.
pub struct RemoteRewrite {
    rewriter: Option<Arc<RemoteRewriter>>,
}

impl RemoteRewrite {
    pub fn new(rewriter: Option<Arc<RemoteRewriter>>) -> Self {
        Self { rewriter }
    }

    fn persona(tone: &Tone, audience: &str) -> String {
        match tone {
            Tone::Professional => format!("a professional consultant writing for {audience}"),
            Tone::Academic => format!("a scholar writing for {audience}"),
            Tone::Casual => format!("a casual friend talking to {audience}"),
            Tone::Creative => format!("a creative writer telling a story to {audience}"),
            Tone::Balanced => format!("a human editor writing for {audience}"),
            Tone::Other(label) => format!("a {label} writer addressing {audience}"),
        }
    }

    fn system_instruction(&self, ctx: &OpContext<'_>) -> String {
        let tone = &ctx.config.tone;
        let persona = Self::persona(tone, &ctx.config.audience);
        let tone_instr = match tone {
            Tone::Professional => {
                "Use clear, authoritative, but accessible language. Keep it structured."
            }
            Tone::Academic => {
                "Use precise vocabulary and logical progression, like a human researcher."
            }
            Tone::Casual => {
                "Use informal language, contractions, and first-person perspective."
            }
            Tone::Creative => "Use descriptive language, metaphors, and varied rhythm.",
            _ => "Mix clarity with a natural, conversational flow.",
        };

        let mut prompt = format!(
            "You are {persona}. Rewrite the following text in your own words.\n\n\
             TONE: {tone_instr}\n\n\
             RULES:\n\
             - Don't just paraphrase; rethink how a person would say this.\n\
             - Vary sentence lengths: mix short fragments with long sentences.\n\
             - Avoid stock transition words (However, Furthermore, Moreover, In conclusion).\n\
             - Do not use bullet points or numbered lists.\n"
        );
        if ctx.config.stealth_level >= StealthLevel::MAX {
            prompt.push_str(
                "- Express a personal opinion or doubt where it fits.\n\
                 - Occasional informal transitions ('the thing is', 'anyway') are fine.\n",
            );
        }
        prompt.push_str("- Keep exactly the same number of paragraphs as the input.\n");
        prompt
    }
}

impl Operator for RemoteRewrite {
    fn name(&self) -> &'static str {
        "remote_rewrite"
    }

    fn category(&self) -> Category {
        Category::Structural
    }

    fn min_level(&self) -> StealthLevel {
        StealthLevel::clamped(4)
    }

    fn guards(&self) -> Guards {
        Guards {
            min_sentences: 0,
            min_words: 8,
        }
    }

    fn enabled(&self, _config: &crate::models::PipelineConfig) -> bool {
        self.rewriter.is_some()
    }

    fn apply(
        &self,
        input: &str,
        ctx: &OpContext<'_>,
        _rng: &mut dyn RngCore,
    ) -> Result<String, OperatorError> {
        let rewriter = self.rewriter.as_ref().ok_or_else(|| {
            OperatorError::failed("remote_rewrite", "no rewrite backend configured")
        })?;

        let system = self.system_instruction(ctx);
        let rewritten = rewriter
            .rewrite(&system, input)
            .map_err(|source| OperatorError::External {
                operator: "remote_rewrite",
                source,
            })?;

        // A completion that lost most of the content is worse than no
        // rewrite at all.
        if text::word_count(&rewritten) * 2 < text::word_count(input) {
            return Err(OperatorError::failed(
                "remote_rewrite",
                "completion dropped more than half the content",
            ));
        }
        Ok(rewritten)
    }
}

/// Per-sentence paraphrasing through the paraphrase capability.
pub struct ParaphraseSentences {
    paraphraser: Option<Arc<dyn Paraphraser>>,
    sampling: SamplingParams,
    rate: f64,
}

impl ParaphraseSentences {
    pub fn new(paraphraser: Option<Arc<dyn Paraphraser>>, params: &OperatorParams) -> Self {
        Self {
            paraphraser,
            sampling: SamplingParams::default(),
            rate: params.paraphrase_rate,
        }
    }
}

impl Operator for ParaphraseSentences {
    fn name(&self) -> &'static str {
        "paraphrase_sentences"
    }

    fn category(&self) -> Category {
        Category::Structural
    }

    fn min_level(&self) -> StealthLevel {
        StealthLevel::clamped(2)
    }

    fn enabled(&self, _config: &crate::models::PipelineConfig) -> bool {
        self.paraphraser.is_some()
    }

    fn apply(
        &self,
        input: &str,
        _ctx: &OpContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<String, OperatorError> {
        let Some(paraphraser) = self.paraphraser.as_ref() else {
            return Ok(input.to_string());
        };

        Ok(per_paragraph(input, |para| {
            let sents = text::sentences(para);
            if sents.is_empty() {
                return para.to_string();
            }
            let rewritten: Vec<String> = sents
                .iter()
                .map(|sentence| {
                    if !chance(rng, self.rate) {
                        return sentence.clone();
                    }
                    match paraphraser.paraphrase(sentence, &self.sampling) {
                        Ok(variants) => variants
                            .into_iter()
                            .find(|v| !v.trim().is_empty())
                            .unwrap_or_else(|| sentence.clone()),
                        Err(err) => {
                            // One bad sentence doesn't spoil the pass.
                            debug!("paraphrase skipped: {err}");
                            sentence.clone()
                        }
                    }
                })
                .collect();
            text::join_sentences(&rewritten)
        }))
    }
}

/// Splits long sentences at clause boundaries, merges adjacent short ones.
pub struct ClauseRestructure {
    split_threshold: usize,
    merge_threshold: usize,
    rate: f64,
}

impl ClauseRestructure {
    pub fn new(params: &OperatorParams) -> Self {
        Self {
            split_threshold: params.split_threshold_words,
            merge_threshold: params.merge_threshold_words,
            rate: params.restructure_rate,
        }
    }

    /// Split at the comma closest to the midpoint. Returns `None` when the
    /// sentence has no usable clause boundary.
    pub(crate) fn split_at_clause(sentence: &str) -> Option<(String, String)> {
        let parts: Vec<&str> = sentence.split(", ").collect();
        if parts.len() < 2 {
            return None;
        }
        // Pick the boundary that balances word counts best.
        let total: usize = text::word_count(sentence);
        let mut best = (0, usize::MAX);
        let mut seen = 0;
        for (i, part) in parts.iter().enumerate().take(parts.len() - 1) {
            seen += text::word_count(part);
            let imbalance = seen.abs_diff(total - seen);
            if imbalance < best.1 {
                best = (i, imbalance);
            }
        }
        let head = parts[..=best.0].join(", ");
        let tail = parts[best.0 + 1..].join(", ");
        let head = format!("{}.", head.trim_end_matches([',', ' ']));
        let tail = text::uppercase_first(&tail);
        Some((head, tail))
    }
}

impl Operator for ClauseRestructure {
    fn name(&self) -> &'static str {
        "clause_restructure"
    }

    fn category(&self) -> Category {
        Category::Structural
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
                let words = text::word_count(&sents[i]);
                if words > self.split_threshold && chance(rng, self.rate) {
                    if let Some((head, tail)) = Self::split_at_clause(&sents[i]) {
                        out.push(head);
                        out.push(tail);
                        i += 1;
                        continue;
                    }
                }
                if i + 1 < sents.len()
                    && words < self.merge_threshold
                    && text::word_count(&sents[i + 1]) < self.merge_threshold
                    && chance(rng, self.rate)
                {
                    let connector = pick(rng, &ctx.lexicon.connectors)
                        .cloned()
                        .unwrap_or_else(|| " and ".to_string());
                    let merged = format!(
                        "{}{}{}",
                        sents[i].trim_end_matches(['.', '!', ',']),
                        connector,
                        text::lowercase_first(&sents[i + 1])
                    );
                    out.push(merged);
                    i += 2;
                    continue;
                }
                out.push(sents[i].clone());
                i += 1;
            }
            text::join_sentences(&out)
        }))
    }
}

/// Shuffles a paragraph's supporting details, pinning topic and conclusion.
pub struct DetailShuffle {
    rate: f64,
}

impl DetailShuffle {
    pub fn new(params: &OperatorParams) -> Self {
        Self {
            rate: params.detail_shuffle_rate,
        }
    }
}

impl Operator for DetailShuffle {
    fn name(&self) -> &'static str {
        "detail_shuffle"
    }

    fn category(&self) -> Category {
        Category::Structural
    }

    fn min_level(&self) -> StealthLevel {
        StealthLevel::clamped(4)
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
        Ok(per_paragraph(input, |para| {
            let sents = text::sentences(para);
            if sents.len() < 4 || !chance(rng, self.rate) {
                return para.to_string();
            }
            let first = sents[0].clone();
            let last = sents[sents.len() - 1].clone();
            let mut middle: Vec<String> = sents[1..sents.len() - 1].to_vec();
            middle.shuffle(rng);

            let mut out = Vec::with_capacity(sents.len());
            out.push(first);
            out.extend(middle);
            out.push(last);
            text::join_sentences(&out)
        }))
    }
}
