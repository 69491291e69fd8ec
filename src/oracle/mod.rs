//! Quality oracles — scoring how human a text reads
//!
//! Two interchangeable implementations behind one trait: a heuristic scorer
//! counting structural/lexical signals, and a predictive scorer driven by a
//! language model's perplexity. Oracles are referentially transparent: the
//! same text with the same oracle instance always produces the same score.
//!
//! The predictive scorer is the process's one shared heavy resource. It is
//! constructed at most once behind an `OnceLock`; if construction fails the
//! process permanently degrades to the heuristic scorer.

mod heuristic;
mod perplexity;

pub use heuristic::HeuristicScorer;
pub use perplexity::{FrequencyModel, PerplexityScorer};

use crate::error::OracleError;
use crate::lexicon::Lexicon;
use crate::models::QualityScore;
use std::sync::{Arc, OnceLock};
use tracing::warn;

/// Scores a text's human-likeness. Implementations must not mutate shared
/// state across calls.
pub trait QualityOracle: Send + Sync {
    fn name(&self) -> &'static str;

    fn score(&self, text: &str) -> Result<QualityScore, OracleError>;

    /// Iteration target in this oracle's metric space: "human-like enough
    /// to stop". The heuristic scorer's space is a 0–100 probability.
    fn default_target(&self) -> f64 {
        80.0
    }
}

static PREDICTIVE: OnceLock<Option<Arc<PerplexityScorer>>> = OnceLock::new();

/// Process-wide predictive oracle, lazily constructed on first use and
/// never torn down. Returns `None` — permanently — if the model could not
/// be built.
pub fn shared_predictive() -> Option<Arc<dyn QualityOracle>> {
    let slot = PREDICTIVE.get_or_init(|| match FrequencyModel::embedded() {
        Ok(model) => Some(Arc::new(PerplexityScorer::new(Box::new(model)))),
        Err(err) => {
            warn!("predictive oracle unavailable, degrading to heuristics: {err}");
            None
        }
    });
    slot.clone().map(|scorer| scorer as Arc<dyn QualityOracle>)
}

/// The predictive oracle when available, otherwise the heuristic scorer.
pub fn preferred_oracle(lexicon: Arc<Lexicon>) -> Arc<dyn QualityOracle> {
    shared_predictive().unwrap_or_else(|| Arc::new(HeuristicScorer::new(lexicon)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_predictive_is_singleton() {
        let a = shared_predictive();
        let b = shared_predictive();
        match (a, b) {
            (Some(a), Some(b)) => assert!(Arc::ptr_eq(
                // Compare through the data pointer; both come from the same
                // OnceLock slot.
                &a, &b
            )),
            (None, None) => {}
            _ => panic!("lazy init must be sticky"),
        }
    }

    #[test]
    fn test_preferred_oracle_always_resolves() {
        let oracle = preferred_oracle(Arc::new(Lexicon::default()));
        let score = oracle
            .score("Some text to score. It has two sentences.")
            .unwrap();
        assert!(score.human_score >= 0.0 && score.human_score <= 1.0);
    }
}
