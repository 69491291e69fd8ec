//! Predictive scorer — perplexity under a language model
//!
//! Low perplexity means the text is highly predictable, which is a
//! machine-generation signal. The scorer maps a model's average negative
//! log-likelihood through banded thresholds to a classification label and a
//! human score in [0, 1]. Thresholds come from the model itself, because
//! perplexity scales differ wildly between model families.
//!
//! The built-in [`FrequencyModel`] is a unigram frequency table — a coarse
//! but dependency-free proxy. Anything heavier (a transformer scored
//! out-of-process, an n-gram model over a corpus) plugs in behind the same
//! [`LanguageModel`] trait.

use crate::capabilities::LanguageModel;
use crate::error::OracleError;
use crate::models::{Classification, Confidence, QualityScore};
use crate::oracle::QualityOracle;
use crate::text;
use std::collections::HashMap;

/// Occurrences per million tokens for words of broadly known frequency.
/// Abridged from standard English frequency counts.
const WORD_FREQUENCIES: &[(&str, f64)] = &[
    ("the", 56271.0),
    ("of", 33950.0),
    ("and", 29944.0),
    ("to", 25956.0),
    ("in", 17420.0),
    ("a", 23363.0),
    ("is", 10110.0),
    ("that", 10000.0),
    ("it", 10000.0),
    ("was", 9816.0),
    ("for", 8800.0),
    ("on", 6700.0),
    ("are", 4700.0),
    ("as", 7000.0),
    ("with", 6600.0),
    ("his", 6300.0),
    ("they", 3800.0),
    ("at", 5300.0),
    ("be", 6400.0),
    ("this", 5700.0),
    ("have", 3900.0),
    ("from", 4400.0),
    ("or", 4000.0),
    ("had", 4100.0),
    ("by", 5100.0),
    ("not", 4600.0),
    ("but", 4700.0),
    ("what", 1900.0),
    ("all", 3100.0),
    ("were", 3300.0),
    ("we", 2900.0),
    ("when", 2300.0),
    ("your", 1400.0),
    ("can", 1700.0),
    ("said", 1900.0),
    ("there", 2800.0),
    ("use", 1200.0),
    ("an", 3700.0),
    ("each", 800.0),
    ("which", 3100.0),
    ("she", 2400.0),
    ("do", 1300.0),
    ("how", 1300.0),
    ("their", 2500.0),
    ("if", 2200.0),
    ("will", 2200.0),
    ("up", 2000.0),
    ("other", 1500.0),
    ("about", 1900.0),
    ("out", 2100.0),
    ("many", 1000.0),
    ("then", 1600.0),
    ("them", 1700.0),
    ("these", 1300.0),
    ("so", 2000.0),
    ("some", 1600.0),
    ("her", 2800.0),
    ("would", 1800.0),
    ("make", 800.0),
    ("like", 1200.0),
    ("him", 1600.0),
    ("into", 1800.0),
    ("time", 1200.0),
    ("has", 2400.0),
    ("look", 500.0),
    ("two", 1200.0),
    ("more", 1900.0),
    ("write", 200.0),
    ("go", 900.0),
    ("see", 800.0),
    ("number", 500.0),
    ("no", 1600.0),
    ("way", 900.0),
    ("could", 1600.0),
    ("people", 1200.0),
    ("my", 1800.0),
    ("than", 1800.0),
    ("first", 1300.0),
    ("been", 2200.0),
    ("who", 1800.0),
    ("its", 1500.0),
    ("now", 1300.0),
    ("find", 500.0),
    ("long", 700.0),
    ("down", 900.0),
    ("day", 700.0),
    ("did", 1000.0),
    ("get", 800.0),
    ("come", 700.0),
    ("made", 800.0),
    ("may", 1300.0),
    ("part", 600.0),
    ("over", 1200.0),
    ("new", 1300.0),
    ("sound", 200.0),
    ("take", 600.0),
    ("only", 1300.0),
    ("little", 800.0),
    ("work", 800.0),
    ("know", 900.0),
    ("place", 600.0),
    ("year", 700.0),
    ("live", 300.0),
    ("me", 1600.0),
    ("back", 900.0),
    ("give", 400.0),
    ("most", 900.0),
    ("very", 1100.0),
    ("after", 1100.0),
    ("thing", 400.0),
    ("our", 1100.0),
    ("just", 1100.0),
    ("name", 400.0),
    ("good", 800.0),
    ("through", 900.0),
    ("any", 1100.0),
    ("because", 900.0),
    ("here", 800.0),
    ("also", 1300.0),
    ("around", 700.0),
    ("another", 700.0),
    ("should", 900.0),
    ("well", 900.0),
    ("such", 1200.0),
    ("between", 900.0),
    ("system", 400.0),
    ("during", 500.0),
    ("within", 400.0),
    ("without", 400.0),
    ("however", 500.0),
    ("world", 600.0),
    ("where", 900.0),
    ("much", 900.0),
    ("before", 900.0),
    ("both", 700.0),
    ("while", 700.0),
    ("those", 800.0),
    ("being", 700.0),
    ("under", 600.0),
    ("same", 700.0),
    ("even", 900.0),
    ("still", 700.0),
    ("every", 600.0),
    ("does", 500.0),
    ("own", 600.0),
    ("think", 600.0),
    ("i", 11000.0),
    ("you", 7000.0),
    ("he", 9500.0),
];

/// Per-million mass assigned to any word outside the table.
const OOV_PER_MILLION: f64 = 20.0;

/// Unigram frequency model. Deterministic, read-only, cheap.
pub struct FrequencyModel {
    frequencies: HashMap<&'static str, f64>,
}

impl FrequencyModel {
    /// Build from the embedded table.
    pub fn embedded() -> Result<Self, OracleError> {
        if WORD_FREQUENCIES.is_empty() {
            return Err(OracleError::ModelUnavailable(
                "embedded frequency table is empty".to_string(),
            ));
        }
        Ok(Self {
            frequencies: WORD_FREQUENCIES.iter().copied().collect(),
        })
    }

    fn token_probability(&self, token: &str) -> f64 {
        let per_million = self
            .frequencies
            .get(token)
            .copied()
            .unwrap_or(OOV_PER_MILLION);
        per_million / 1_000_000.0
    }
}

impl LanguageModel for FrequencyModel {
    fn avg_nll(&self, input: &str) -> Result<f64, OracleError> {
        let tokens: Vec<String> = input
            .split_whitespace()
            .map(|t| text::split_affixes(t).1.to_lowercase())
            .filter(|t| !t.is_empty() && t.chars().all(|c| c.is_alphabetic()))
            .collect();

        if tokens.is_empty() {
            return Err(OracleError::ScoreFailed(
                "no scorable tokens".to_string(),
            ));
        }

        let total_nll: f64 = tokens
            .iter()
            .map(|t| -self.token_probability(t).ln())
            .sum();
        Ok(total_nll / tokens.len() as f64)
    }

    fn bands(&self) -> [f64; 4] {
        // Calibrated for the unigram scale, which sits far above
        // transformer perplexities.
        [900.0, 1600.0, 2800.0, 4500.0]
    }
}

/// Perplexity-driven oracle over an injected language model.
pub struct PerplexityScorer {
    model: Box<dyn LanguageModel>,
    bands: [f64; 4],
}

impl PerplexityScorer {
    pub fn new(model: Box<dyn LanguageModel>) -> Self {
        let bands = model.bands();
        Self { model, bands }
    }

    fn classify(&self, perplexity: f64) -> (Classification, f64, Confidence) {
        let [very_machine, machine, mixed, human] = self.bands;
        if perplexity < very_machine {
            (Classification::VeryMachineLike, 0.1, Confidence::High)
        } else if perplexity < machine {
            (Classification::MachineLike, 0.3, Confidence::Medium)
        } else if perplexity < mixed {
            (Classification::Mixed, 0.5, Confidence::Medium)
        } else if perplexity < human {
            (Classification::HumanLike, 0.7, Confidence::Medium)
        } else {
            (Classification::VeryHumanLike, 0.9, Confidence::High)
        }
    }
}

impl QualityOracle for PerplexityScorer {
    fn name(&self) -> &'static str {
        "perplexity"
    }

    fn score(&self, input: &str) -> Result<QualityScore, OracleError> {
        let avg_nll = self.model.avg_nll(input)?;
        let perplexity = avg_nll.exp();
        let (classification, human_score, confidence) = self.classify(perplexity);
        Ok(QualityScore {
            metric: perplexity,
            human_score,
            classification,
            confidence,
        })
    }

    /// The boundary where perplexity starts reading as human-like, in this
    /// model's scale.
    fn default_target(&self) -> f64 {
        self.bands[2]
    }
}
