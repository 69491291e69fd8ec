//! External collaborator capabilities
//!
//! Everything the core consumes but does not own lives behind a trait here:
//! synonym lookup, sentence paraphrasing, remote whole-text rewriting, and
//! the scoring language model. Operators take these as constructor
//! parameters; a missing optional capability degrades the dependent
//! operator to a no-op instead of failing the pipeline.

mod fallback;
mod rewrite;
mod thesaurus;

pub use fallback::first_success;
pub use rewrite::{BackendSpec, RemoteRewriter, RewriteBackend, DEFAULT_REWRITE_MODELS};
pub use thesaurus::StaticThesaurus;

use crate::error::CapabilityError;

/// Synonym lookup used by lexical substitution.
pub trait Thesaurus: Send + Sync {
    /// Synonyms for a lowercase word. Empty when none are known.
    fn synonyms(&self, word: &str) -> Vec<String>;
}

/// Sampling knobs for paraphrase generation.
#[derive(Debug, Clone)]
pub struct SamplingParams {
    pub temperature: f32,
    pub top_p: f32,
    pub max_variants: usize,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: 1.2,
            top_p: 0.96,
            max_variants: 1,
        }
    }
}

/// Sentence-level paraphrase capability. May be absent for the whole
/// process; operators depending on it must no-op rather than fail.
pub trait Paraphraser: Send + Sync {
    fn paraphrase(
        &self,
        sentence: &str,
        params: &SamplingParams,
    ) -> Result<Vec<String>, CapabilityError>;
}

/// Scoring language model behind the predictive oracle.
///
/// Implementations must be safe to call repeatedly and must not mutate
/// shared state; the oracle treats them as read-only for the process
/// lifetime.
pub trait LanguageModel: Send + Sync {
    /// Average negative log-likelihood per token of the text.
    fn avg_nll(&self, text: &str) -> Result<f64, crate::error::OracleError>;

    /// Perplexity thresholds calibrated for this model's scale:
    /// `[very_machine, machine, mixed, human]` band upper bounds.
    fn bands(&self) -> [f64; 4];
}
