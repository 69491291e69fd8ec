//! Noise operators — invisible characters and homoglyphs
//!
//! Purely cosmetic character-level noise: zero-width separators inside
//! words and Cyrillic look-alike substitutions. Neither changes the visible
//! text. Both are opt-in (`use_artifacts`) and off by default; they degrade
//! output robustness under copy/paste and search, so the caller has to ask
//! for them.

use crate::error::OperatorError;
use crate::lexicon::{HOMOGLYPHS, ZERO_WIDTH};
use crate::models::{PipelineConfig, StealthLevel};
use crate::operators::{chance, per_paragraph, pick, pick_index, Category, OpContext, Operator, OperatorParams};
use rand::RngCore;

/// Inserts zero-width characters at interior word positions.
pub struct ZeroWidthNoise {
    rate: f64,
}

impl ZeroWidthNoise {
    pub fn new(params: &OperatorParams) -> Self {
        Self {
            rate: params.zero_width_rate,
        }
    }

    fn seed_word(word: &str, rng: &mut dyn RngCore) -> String {
        let mut chars: Vec<char> = word.chars().collect();
        if chars.len() < 2 {
            return word.to_string();
        }
        let marks = pick_index(rng, 1, 3);
        for _ in 0..marks {
            let idx = pick_index(rng, 1, chars.len());
            if let Some(mark) = pick(rng, ZERO_WIDTH) {
                chars.insert(idx, *mark);
            }
        }
        chars.into_iter().collect()
    }
}

impl Operator for ZeroWidthNoise {
    fn name(&self) -> &'static str {
        "zero_width_noise"
    }

    fn category(&self) -> Category {
        Category::Noise
    }

    fn min_level(&self) -> StealthLevel {
        StealthLevel::clamped(3)
    }

    fn enabled(&self, config: &PipelineConfig) -> bool {
        config.use_artifacts
    }

    fn apply(
        &self,
        input: &str,
        _ctx: &OpContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<String, OperatorError> {
        Ok(per_paragraph(input, |para| {
            para.split_whitespace()
                .map(|word| {
                    if word.chars().count() >= 3 && chance(rng, self.rate) {
                        Self::seed_word(word, rng)
                    } else {
                        word.to_string()
                    }
                })
                .collect::<Vec<_>>()
                .join(" ")
        }))
    }
}

/// Substitutes Cyrillic look-alikes for a bounded fraction of vowels.
pub struct HomoglyphNoise {
    rate: f64,
}

impl HomoglyphNoise {
    pub fn new(params: &OperatorParams) -> Self {
        Self {
            rate: params.homoglyph_rate,
        }
    }
}

impl Operator for HomoglyphNoise {
    fn name(&self) -> &'static str {
        "homoglyph_noise"
    }

    fn category(&self) -> Category {
        Category::Noise
    }

    fn min_level(&self) -> StealthLevel {
        StealthLevel::MAX
    }

    fn enabled(&self, config: &PipelineConfig) -> bool {
        config.use_artifacts
    }

    fn apply(
        &self,
        input: &str,
        _ctx: &OpContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<String, OperatorError> {
        let out = input
            .chars()
            .map(|c| {
                match HOMOGLYPHS.iter().find(|(latin, _)| *latin == c) {
                    Some((_, cyrillic)) if chance(rng, self.rate) => *cyrillic,
                    _ => c,
                }
            })
            .collect();
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::Lexicon;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn strip_invisible(s: &str) -> String {
        s.chars().filter(|c| !ZERO_WIDTH.contains(c)).collect()
    }

    #[test]
    fn test_zero_width_is_invisible() {
        let config = PipelineConfig::default();
        let lexicon = Lexicon::default();
        let ctx = OpContext {
            config: &config,
            lexicon: &lexicon,
        };
        let op = ZeroWidthNoise::new(&OperatorParams {
            zero_width_rate: 1.0,
            ..OperatorParams::default()
        });
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let input = "invisible noise testing here";
        let out = op.apply(input, &ctx, &mut rng).unwrap();
        assert_ne!(out, input);
        assert_eq!(strip_invisible(&out), input);
    }

    #[test]
    fn test_homoglyph_preserves_visible_shape() {
        let config = PipelineConfig::default();
        let lexicon = Lexicon::default();
        let ctx = OpContext {
            config: &config,
            lexicon: &lexicon,
        };
        let op = HomoglyphNoise::new(&OperatorParams {
            homoglyph_rate: 1.0,
            ..OperatorParams::default()
        });
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let out = op.apply("aeo AEO xyz", &ctx, &mut rng).unwrap();
        assert_eq!(out, "аео АЕО xyz");
        assert_eq!(out.chars().count(), 11);
    }

    #[test]
    fn test_noise_requires_artifact_opt_in() {
        let op = ZeroWidthNoise::new(&OperatorParams::default());
        let glyphs = HomoglyphNoise::new(&OperatorParams::default());
        let mut config = PipelineConfig::default();
        assert!(!op.enabled(&config));
        assert!(!glyphs.enabled(&config));
        config.use_artifacts = true;
        assert!(op.enabled(&config));
        assert!(glyphs.enabled(&config));
    }
}
