//! Pipeline engine — ordered, level-gated operator execution
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    PipelineEngine                       │
//! ├─────────────────────────────────────────────────────────┤
//! │  1. Filter catalogue by level (min_level <= level)      │
//! │  2. Per paragraph when preserve_formatting is set       │
//! │  3. Run operators in catalogue order, sequentially      │
//! │  4. Isolate each operator: panic/error keeps prior text │
//! │  5. Reject destructive output (alphabetic floor)        │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! A failing operator never aborts the run and never corrupts output beyond
//! its own attempted change. All randomness flows through the injected rng,
//! so a fixed seed makes `run` deterministic end to end.

use crate::lexicon::Lexicon;
use crate::models::{PipelineConfig, StealthLevel};
use crate::operators::{OpContext, Operator};
use crate::text;
use rand::RngCore;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, warn};

/// Default floor: an operator may not drop the alphabetic character count
/// below this fraction of its input.
const DEFAULT_ALPHA_FLOOR: f64 = 0.5;

/// How one operator invocation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpStatus {
    Applied,
    Skipped,
    Failed,
}

/// Result of running a single operator.
#[derive(Debug, Clone)]
pub struct OpReport {
    pub operator: &'static str,
    pub status: OpStatus,
    pub detail: Option<String>,
    pub duration: Duration,
}

impl OpReport {
    fn applied(operator: &'static str, duration: Duration) -> Self {
        Self {
            operator,
            status: OpStatus::Applied,
            detail: None,
            duration,
        }
    }

    fn skipped(operator: &'static str, reason: impl Into<String>) -> Self {
        Self {
            operator,
            status: OpStatus::Skipped,
            detail: Some(reason.into()),
            duration: Duration::ZERO,
        }
    }

    fn failed(operator: &'static str, reason: impl Into<String>, duration: Duration) -> Self {
        Self {
            operator,
            status: OpStatus::Failed,
            detail: Some(reason.into()),
            duration,
        }
    }
}

/// Runs the operator catalogue over a document.
pub struct PipelineEngine {
    operators: Vec<Arc<dyn Operator>>,
    lexicon: Arc<Lexicon>,
    alpha_floor: f64,
    time_budget: Option<Duration>,
}

impl PipelineEngine {
    pub fn new(operators: Vec<Arc<dyn Operator>>, lexicon: Arc<Lexicon>) -> Self {
        Self {
            operators,
            lexicon,
            alpha_floor: DEFAULT_ALPHA_FLOOR,
            time_budget: None,
        }
    }

    /// Override the destructive-output floor (fraction of alphabetic
    /// characters an operator must retain).
    pub fn with_alpha_floor(mut self, floor: f64) -> Self {
        self.alpha_floor = floor.clamp(0.0, 1.0);
        self
    }

    /// Bound a run's wall-clock time. There is no mid-operator
    /// cancellation: the deadline is checked before starting each operator,
    /// never used to interrupt one in progress.
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }

    pub fn operator_count(&self) -> usize {
        self.operators.len()
    }

    /// Names of operators active at `level`, in execution order.
    pub fn active_names(&self, level: StealthLevel) -> Vec<&'static str> {
        self.operators
            .iter()
            .filter(|op| op.min_level() <= level)
            .map(|op| op.name())
            .collect()
    }

    pub fn lexicon(&self) -> &Arc<Lexicon> {
        &self.lexicon
    }

    /// Run the catalogue over `text` at `level`. Never fails; the worst
    /// case is the input unchanged.
    pub fn run(
        &self,
        input: &str,
        level: StealthLevel,
        config: &PipelineConfig,
        rng: &mut dyn RngCore,
    ) -> String {
        self.run_detailed(input, level, config, rng).0
    }

    /// Like [`run`](Self::run) but also returns per-operator reports.
    pub fn run_detailed(
        &self,
        input: &str,
        level: StealthLevel,
        config: &PipelineConfig,
        rng: &mut dyn RngCore,
    ) -> (String, Vec<OpReport>) {
        if input.is_empty() {
            return (String::new(), Vec::new());
        }

        let deadline = self.time_budget.map(|budget| Instant::now() + budget);
        let mut reports = Vec::new();

        // Structure preservation: process each paragraph unit on its own so
        // the paragraph count (including empty lines) is unchanged.
        if config.preserve_formatting && input.contains('\n') {
            debug!("preserving structure: processing paragraphs individually");
            let sub_config = PipelineConfig {
                preserve_formatting: false,
                ..config.clone()
            };
            let output = input
                .split('\n')
                .map(|line| {
                    if line.trim().is_empty() {
                        line.to_string()
                    } else {
                        self.run_operators(line, level, &sub_config, rng, deadline, &mut reports)
                    }
                })
                .collect::<Vec<_>>()
                .join("\n");
            return (output, reports);
        }

        let output = self.run_operators(input, level, config, rng, deadline, &mut reports);
        (output, reports)
    }

    fn run_operators(
        &self,
        input: &str,
        level: StealthLevel,
        config: &PipelineConfig,
        rng: &mut dyn RngCore,
        deadline: Option<Instant>,
        reports: &mut Vec<OpReport>,
    ) -> String {
        let ctx = OpContext {
            config,
            lexicon: &self.lexicon,
        };

        let mut current = input.to_string();
        for op in self.operators.iter().filter(|op| op.min_level() <= level) {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                reports.push(OpReport::skipped(op.name(), "time budget exhausted"));
                continue;
            }
            if !op.enabled(config) {
                reports.push(OpReport::skipped(op.name(), "disabled by config"));
                continue;
            }

            let guards = op.guards();
            if guards.min_words > 0 && text::word_count(&current) < guards.min_words {
                reports.push(OpReport::skipped(op.name(), "below word floor"));
                continue;
            }
            if guards.min_sentences > 0
                && text::sentences(&current).len() < guards.min_sentences
            {
                reports.push(OpReport::skipped(op.name(), "too few sentences"));
                continue;
            }

            let start = Instant::now();
            let attempt = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                op.apply(&current, &ctx, rng)
            }));
            let duration = start.elapsed();

            match attempt {
                Ok(Ok(output)) => {
                    if output.trim().is_empty() && !current.trim().is_empty() {
                        warn!("operator {} produced empty output, discarded", op.name());
                        reports.push(OpReport::failed(op.name(), "empty output", duration));
                        continue;
                    }
                    let before = text::alphabetic_count(&current);
                    let after = text::alphabetic_count(&output);
                    if (after as f64) < self.alpha_floor * before as f64 {
                        warn!(
                            "operator {} dropped alphabetic content below floor ({} -> {}), discarded",
                            op.name(),
                            before,
                            after
                        );
                        reports.push(OpReport::failed(op.name(), "alphabetic floor", duration));
                        continue;
                    }
                    debug!(
                        "operator {} applied in {:?} ({} -> {} chars)",
                        op.name(),
                        duration,
                        current.len(),
                        output.len()
                    );
                    current = output;
                    reports.push(OpReport::applied(op.name(), duration));
                }
                Ok(Err(err)) => {
                    debug!("operator {} failed, text unchanged: {err}", op.name());
                    reports.push(OpReport::failed(op.name(), err.to_string(), duration));
                }
                Err(panic_info) => {
                    let message = if let Some(s) = panic_info.downcast_ref::<&str>() {
                        s.to_string()
                    } else if let Some(s) = panic_info.downcast_ref::<String>() {
                        s.clone()
                    } else {
                        "unknown panic".to_string()
                    };
                    error!("operator {} panicked: {message}", op.name());
                    reports.push(OpReport::failed(
                        op.name(),
                        format!("panic: {message}"),
                        duration,
                    ));
                }
            }
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OperatorError;
    use crate::operators::{catalogue, CapabilitySet, Category, Guards, OperatorParams};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn default_engine() -> PipelineEngine {
        let lexicon = Arc::new(Lexicon::default());
        let ops = catalogue(&lexicon, &OperatorParams::default(), &CapabilitySet::default());
        PipelineEngine::new(ops, lexicon)
    }

    struct PanickingOp;
    impl Operator for PanickingOp {
        fn name(&self) -> &'static str {
            "panicking_op"
        }
        fn category(&self) -> Category {
            Category::Destructure
        }
        fn min_level(&self) -> StealthLevel {
            StealthLevel::MIN
        }
        fn apply(
            &self,
            _input: &str,
            _ctx: &OpContext<'_>,
            _rng: &mut dyn RngCore,
        ) -> Result<String, OperatorError> {
            panic!("boom")
        }
    }

    struct TruncatingOp;
    impl Operator for TruncatingOp {
        fn name(&self) -> &'static str {
            "truncating_op"
        }
        fn category(&self) -> Category {
            Category::Destructure
        }
        fn min_level(&self) -> StealthLevel {
            StealthLevel::MIN
        }
        fn apply(
            &self,
            _input: &str,
            _ctx: &OpContext<'_>,
            _rng: &mut dyn RngCore,
        ) -> Result<String, OperatorError> {
            Ok("x".to_string())
        }
    }

    struct MarkerOp;
    impl Operator for MarkerOp {
        fn name(&self) -> &'static str {
            "marker_op"
        }
        fn category(&self) -> Category {
            Category::Voice
        }
        fn min_level(&self) -> StealthLevel {
            StealthLevel::MIN
        }
        fn apply(
            &self,
            input: &str,
            _ctx: &OpContext<'_>,
            _rng: &mut dyn RngCore,
        ) -> Result<String, OperatorError> {
            Ok(format!("{input} [marked]"))
        }
    }

    #[test]
    fn test_panic_is_isolated() {
        let lexicon = Arc::new(Lexicon::default());
        let engine = PipelineEngine::new(
            vec![Arc::new(PanickingOp), Arc::new(MarkerOp)],
            lexicon,
        );
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let (out, reports) = engine.run_detailed(
            "Some input text here.",
            StealthLevel::MIN,
            &PipelineConfig::default(),
            &mut rng,
        );
        // The panicking operator is discarded, the next one still runs.
        assert_eq!(out, "Some input text here. [marked]");
        assert_eq!(reports[0].status, OpStatus::Failed);
        assert_eq!(reports[1].status, OpStatus::Applied);
    }

    #[test]
    fn test_destructive_output_discarded() {
        let lexicon = Arc::new(Lexicon::default());
        let engine = PipelineEngine::new(vec![Arc::new(TruncatingOp)], lexicon);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let input = "A reasonably long sentence with plenty of letters.";
        let (out, reports) = engine.run_detailed(
            input,
            StealthLevel::MIN,
            &PipelineConfig::default(),
            &mut rng,
        );
        assert_eq!(out, input);
        assert_eq!(reports[0].status, OpStatus::Failed);
        assert_eq!(reports[0].detail.as_deref(), Some("alphabetic floor"));
    }

    #[test]
    fn test_structure_preserved() {
        let engine = default_engine();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let input = "First paragraph with some sentences. It keeps going a little.\n\nSecond paragraph over here. Also a couple of sentences.\n";
        let config = PipelineConfig {
            stealth_level: StealthLevel::clamped(3),
            ..PipelineConfig::default()
        };
        let out = engine.run(input, config.stealth_level, &config, &mut rng);
        assert_eq!(
            text::paragraph_count(&out),
            text::paragraph_count(input),
            "paragraph count must be preserved"
        );
        // Blank line stays blank.
        assert_eq!(out.split('\n').nth(1), Some(""));
    }

    #[test]
    fn test_determinism_with_fixed_seed() {
        let engine = default_engine();
        let config = PipelineConfig::default();
        let input = "The system processes data. It is efficient. Results are reliable. Furthermore, it scales well.";
        for level in 1..=5u8 {
            let level = StealthLevel::new(level).unwrap();
            let mut rng_a = ChaCha8Rng::seed_from_u64(42);
            let mut rng_b = ChaCha8Rng::seed_from_u64(42);
            let out_a = engine.run(input, level, &config, &mut rng_a);
            let out_b = engine.run(input, level, &config, &mut rng_b);
            assert_eq!(out_a, out_b, "level {level} not deterministic");
        }
    }

    #[test]
    fn test_empty_input() {
        let engine = default_engine();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let out = engine.run("", StealthLevel::MAX, &PipelineConfig::default(), &mut rng);
        assert_eq!(out, "");
    }

    #[test]
    fn test_single_sentence_guard() {
        let engine = default_engine();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let config = PipelineConfig {
            stealth_level: StealthLevel::MIN,
            ..PipelineConfig::default()
        };
        let out = engine.run("The cat sat on the mat.", StealthLevel::MIN, &config, &mut rng);
        // Level 1 has no reordering operators and the guards protect the
        // rest: output is still a single sentence-equivalent unit.
        assert_eq!(text::sentences(&out).len(), 1, "output: {out:?}");
    }

    #[test]
    fn test_time_budget_skips_remaining_operators() {
        let lexicon = Arc::new(Lexicon::default());
        let engine = PipelineEngine::new(vec![Arc::new(MarkerOp)], lexicon)
            .with_time_budget(Duration::ZERO);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let input = "Text that would otherwise be marked.";
        let (out, reports) = engine.run_detailed(
            input,
            StealthLevel::MIN,
            &PipelineConfig::default(),
            &mut rng,
        );
        assert_eq!(out, input);
        assert_eq!(reports[0].status, OpStatus::Skipped);
        assert_eq!(reports[0].detail.as_deref(), Some("time budget exhausted"));
    }

    #[test]
    fn test_guards_report_skips() {
        let lexicon = Arc::new(Lexicon::default());
        struct GuardedOp;
        impl Operator for GuardedOp {
            fn name(&self) -> &'static str {
                "guarded_op"
            }
            fn category(&self) -> Category {
                Category::Structural
            }
            fn min_level(&self) -> StealthLevel {
                StealthLevel::MIN
            }
            fn guards(&self) -> Guards {
                Guards::MULTI_SENTENCE
            }
            fn apply(
                &self,
                _input: &str,
                _ctx: &OpContext<'_>,
                _rng: &mut dyn RngCore,
            ) -> Result<String, OperatorError> {
                Ok("should not run".to_string())
            }
        }
        let engine = PipelineEngine::new(vec![Arc::new(GuardedOp)], lexicon);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let (out, reports) = engine.run_detailed(
            "Only one sentence here today.",
            StealthLevel::MIN,
            &PipelineConfig::default(),
            &mut rng,
        );
        assert_eq!(out, "Only one sentence here today.");
        assert_eq!(reports[0].status, OpStatus::Skipped);
    }
}
