//! Top-level facade
//!
//! [`Humanizer`] wires the catalogue, engine, oracles, selector, and
//! controller together behind three operations: a single transformation
//! pass, the score-driven iteration loop, and a read-only stealth
//! analysis. The first two never fail for input-dependent reasons — the
//! worst case is the input returned unchanged.

use crate::controller::IterationController;
use crate::engine::PipelineEngine;
use crate::lexicon::Lexicon;
use crate::models::{
    HumanizeOutcome, IterateOutcome, PipelineConfig, StealthLevel, StealthReport,
};
use crate::operators::{catalogue, CapabilitySet, OperatorParams};
use crate::oracle::{self, HeuristicScorer, QualityOracle};
use crate::selector::{AdaptiveSelector, FeatureVector};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error};

/// Default iteration target for the heuristic oracle's 0–100 space. The
/// predictive oracle supplies its own via `QualityOracle::default_target`.
pub const DEFAULT_TARGET: f64 = 80.0;
/// Default iteration budget.
pub const DEFAULT_MAX_ITERATIONS: usize = 3;

pub struct Humanizer {
    engine: Arc<PipelineEngine>,
    oracle: Arc<dyn QualityOracle>,
    heuristic: Arc<HeuristicScorer>,
    selector: AdaptiveSelector,
}

impl Default for Humanizer {
    fn default() -> Self {
        Self::new(CapabilitySet::default(), OperatorParams::default())
    }
}

impl Humanizer {
    pub fn new(caps: CapabilitySet, params: OperatorParams) -> Self {
        Self::with_lexicon(Arc::new(Lexicon::default()), caps, params)
    }

    pub fn with_lexicon(
        lexicon: Arc<Lexicon>,
        caps: CapabilitySet,
        params: OperatorParams,
    ) -> Self {
        let ops = catalogue(&lexicon, &params, &caps);
        let engine = Arc::new(PipelineEngine::new(ops, Arc::clone(&lexicon)));
        let oracle = oracle::preferred_oracle(Arc::clone(&lexicon));
        let heuristic = Arc::new(HeuristicScorer::new(Arc::clone(&lexicon)));
        let selector = AdaptiveSelector::new(lexicon);
        Self {
            engine,
            oracle,
            heuristic,
            selector,
        }
    }

    /// Swap the iteration oracle (e.g. force the heuristic scorer).
    pub fn with_oracle(mut self, oracle: Arc<dyn QualityOracle>) -> Self {
        self.oracle = oracle;
        self
    }

    pub fn engine(&self) -> &Arc<PipelineEngine> {
        &self.engine
    }

    pub fn oracle_name(&self) -> &'static str {
        self.oracle.name()
    }

    /// Iteration target in the active oracle's metric space.
    pub fn default_target(&self) -> f64 {
        self.oracle.default_target()
    }

    fn rng_for(config: &PipelineConfig) -> ChaCha8Rng {
        let seed = config.rng_seed.unwrap_or_else(rand::random);
        debug!("call rng seed: {seed}");
        ChaCha8Rng::seed_from_u64(seed)
    }

    /// One pipeline pass at the configured level. Never raises; `""` in
    /// means `""` out.
    pub fn humanize(&self, input: &str, config: &PipelineConfig) -> HumanizeOutcome {
        let start = Instant::now();
        if input.is_empty() {
            return HumanizeOutcome {
                result_text: String::new(),
                elapsed: start.elapsed(),
            };
        }

        let mut rng = Self::rng_for(config);
        let attempt = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            self.engine
                .run(input, config.stealth_level, config, &mut rng)
        }));
        let result_text = match attempt {
            Ok(text) => text,
            Err(_) => {
                error!("pipeline panicked; returning input unchanged");
                input.to_string()
            }
        };

        HumanizeOutcome {
            result_text,
            elapsed: start.elapsed(),
        }
    }

    /// Input features as seen by the adaptive selector.
    pub fn analyze_features(&self, input: &str) -> FeatureVector {
        self.selector.analyze(input)
    }

    /// Starting level the adaptive selector picks for this input.
    pub fn adaptive_level(&self, input: &str) -> StealthLevel {
        self.selector.select_level(&self.selector.analyze(input))
    }

    /// Iterate pipeline + oracle until `target_score` is reached or the
    /// budget runs out. The adaptive selector seeds the first cycle's
    /// level; if the starting score already clears the target, zero cycles
    /// run.
    pub fn iterative_humanize(
        &self,
        input: &str,
        target_score: f64,
        max_iterations: usize,
        config: &PipelineConfig,
    ) -> IterateOutcome {
        if input.is_empty() {
            return IterateOutcome {
                result_text: String::new(),
                initial_score: None,
                final_score: None,
                iterations_used: 0,
                converged: false,
                history: Vec::new(),
            };
        }

        let mut rng = Self::rng_for(config);
        let initial_level = Some(self.adaptive_level(input));
        let controller =
            IterationController::new(Arc::clone(&self.engine), Arc::clone(&self.oracle));
        let run = controller.run(
            input,
            target_score,
            max_iterations,
            config,
            initial_level,
            &mut rng,
        );

        IterateOutcome {
            result_text: run.final_text,
            initial_score: run.initial_score,
            final_score: run.final_score,
            iterations_used: run.history.len(),
            converged: run.converged,
            history: run.history,
        }
    }

    /// Read-only stealth analysis using the heuristic oracle only.
    pub fn analyze_stealth(&self, input: &str) -> StealthReport {
        let (probability_score, checks) = self.heuristic.breakdown(input);
        let recommendations = recommend(100.0 - probability_score);
        StealthReport {
            probability_score,
            checks,
            recommendations,
        }
    }
}

/// Improvement advice banded by the machine probability.
fn recommend(ai_probability: f64) -> Vec<String> {
    let band: &[&str] = if ai_probability > 70.0 {
        &[
            "Add first-person language (I, me, my)",
            "Vary sentence lengths drastically",
            "Add informal language (honestly, you know)",
            "Allow some surface imperfections",
        ]
    } else if ai_probability > 50.0 {
        &[
            "Add personal opinions and experiences",
            "Use more contractions (don't, can't, it's)",
            "Add conversational fillers",
        ]
    } else if ai_probability > 30.0 {
        &[
            "Consider one or two personal asides",
            "Add some casual language",
        ]
    } else {
        &["No major improvements needed"]
    };
    band.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_round_trips() {
        let humanizer = Humanizer::default();
        let outcome = humanizer.humanize("", &PipelineConfig::default());
        assert_eq!(outcome.result_text, "");

        let outcome = humanizer.iterative_humanize("", DEFAULT_TARGET, 3, &PipelineConfig::default());
        assert_eq!(outcome.result_text, "");
        assert_eq!(outcome.iterations_used, 0);
    }

    #[test]
    fn test_humanize_never_empty_on_nonempty_input() {
        let humanizer = Humanizer::default();
        for level in 1..=5u8 {
            let config = PipelineConfig {
                stealth_level: StealthLevel::new(level).unwrap(),
                rng_seed: Some(7),
                ..PipelineConfig::default()
            };
            let outcome = humanizer.humanize(
                "The framework provides several useful abstractions. It handles errors gracefully.",
                &config,
            );
            assert!(!outcome.result_text.trim().is_empty(), "level {level}");
        }
    }

    #[test]
    fn test_humanize_is_seed_deterministic() {
        let humanizer = Humanizer::default();
        let config = PipelineConfig {
            rng_seed: Some(1234),
            ..PipelineConfig::default()
        };
        let input = "The framework provides several useful abstractions. Furthermore, it handles errors gracefully. It scales well.";
        let a = humanizer.humanize(input, &config);
        let b = humanizer.humanize(input, &config);
        assert_eq!(a.result_text, b.result_text);
    }

    #[test]
    fn test_analyze_stealth_reports_checks_and_tips() {
        let humanizer = Humanizer::default();
        let report = humanizer.analyze_stealth(
            "Furthermore, the approach is robust. Moreover, it is scalable. Thus, adoption is advised.",
        );
        assert_eq!(report.checks.len(), 5);
        assert!(!report.recommendations.is_empty());
        assert!(report.probability_score < 50.0);
    }
}
