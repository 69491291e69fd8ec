//! Iteration controller — score-driven transformation loop
//!
//! ```text
//!            ┌──────────┐   score >= target   ┌───────────┐
//!   start ──▶│ Scoring  │────────────────────▶│ Converged │
//!            └────┬─────┘                     └───────────┘
//!                 │ score < target
//!                 ▼
//!            ┌──────────────┐    budget spent  ┌───────────┐
//!            │ Transforming │─────────────────▶│ Exhausted │
//!            └────┬─────────┘                  └───────────┘
//!                 └────────────▶ back to Scoring
//! ```
//!
//! Each cycle scores the current text, maps the score to a level through a
//! monotonic threshold table (lower score → higher level), runs the
//! pipeline at that level, and records an [`IterationRecord`]. A failed
//! cycle keeps the last valid text and is retried once; two consecutive
//! failures end the run in Exhausted. Exceptions never reach the caller.

use crate::engine::PipelineEngine;
use crate::models::{IterationRecord, PipelineConfig, QualityScore, StealthLevel};
use crate::oracle::QualityOracle;
use rand::RngCore;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Human-probability thresholds (0–100) mapping to levels, most aggressive
/// first. Monotonic: a lower score never maps to a lower level. Keyed off
/// the normalized human score so both oracle metric spaces land on the
/// same table.
const LEVEL_TABLE: &[(f64, u8)] = &[(40.0, 5), (60.0, 4)];
/// Level used when the score clears every threshold but misses the target.
const BASE_LEVEL: u8 = 3;

/// Map a human probability (0–100) to the next transformation level.
pub fn level_for_score(human_probability: f64) -> StealthLevel {
    for (threshold, level) in LEVEL_TABLE {
        if human_probability < *threshold {
            return StealthLevel::clamped(*level);
        }
    }
    StealthLevel::clamped(BASE_LEVEL)
}

/// Outcome of a controller run.
#[derive(Debug, Clone)]
pub struct ControllerRun {
    pub final_text: String,
    pub initial_score: Option<QualityScore>,
    pub final_score: Option<QualityScore>,
    pub converged: bool,
    pub history: Vec<IterationRecord>,
}

pub struct IterationController {
    engine: Arc<PipelineEngine>,
    oracle: Arc<dyn QualityOracle>,
}

impl IterationController {
    pub fn new(engine: Arc<PipelineEngine>, oracle: Arc<dyn QualityOracle>) -> Self {
        Self { engine, oracle }
    }

    pub fn oracle_name(&self) -> &'static str {
        self.oracle.name()
    }

    /// Drive the text toward `target` (in the oracle's metric space) within
    /// `max_iterations` cycles. `initial_level` seeds the first cycle when
    /// the adaptive selector has already looked at the input.
    pub fn run(
        &self,
        input: &str,
        target: f64,
        max_iterations: usize,
        config: &PipelineConfig,
        initial_level: Option<StealthLevel>,
        rng: &mut dyn RngCore,
    ) -> ControllerRun {
        let mut current = input.to_string();
        let mut history: Vec<IterationRecord> = Vec::new();
        let mut initial_score: Option<QualityScore> = None;
        let mut converged = false;
        let mut consecutive_failures = 0usize;
        let mut last_level = initial_level.unwrap_or_default();

        for iteration in 1..=max_iterations {
            let score = match self.oracle.score(&current) {
                Ok(score) => score,
                Err(err) => {
                    warn!("cycle {iteration}: scoring failed: {err}");
                    consecutive_failures += 1;
                    history.push(IterationRecord {
                        iteration,
                        score: None,
                        level: last_level,
                        text_len: current.len(),
                        failed: true,
                    });
                    if consecutive_failures >= 2 {
                        debug!("two consecutive failed cycles, giving up");
                        break;
                    }
                    continue;
                }
            };
            consecutive_failures = 0;
            initial_score.get_or_insert(score);

            if score.metric >= target {
                info!(
                    "converged at cycle {iteration}: {:.1} >= {target:.1}",
                    score.metric
                );
                converged = true;
                break;
            }

            let level = match (iteration, initial_level) {
                (1, Some(level)) => level,
                _ => level_for_score(score.human_score * 100.0),
            };
            last_level = level;
            debug!(
                "cycle {iteration}: metric {:.1}, transforming at level {level}",
                score.metric
            );

            // The engine absorbs operator failures internally; a panic this
            // deep is still recorded as a failed cycle rather than escaping.
            let attempt = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                self.engine.run(&current, level, config, rng)
            }));
            match attempt {
                Ok(next) => {
                    history.push(IterationRecord {
                        iteration,
                        score: Some(score),
                        level,
                        text_len: next.len(),
                        failed: false,
                    });
                    current = next;
                }
                Err(_) => {
                    warn!("cycle {iteration}: transformation panicked, keeping last text");
                    consecutive_failures += 1;
                    history.push(IterationRecord {
                        iteration,
                        score: Some(score),
                        level,
                        text_len: current.len(),
                        failed: true,
                    });
                    if consecutive_failures >= 2 {
                        break;
                    }
                }
            }
        }

        let final_score = self.oracle.score(&current).ok();
        if let Some(score) = final_score {
            initial_score.get_or_insert(score);
            if score.metric >= target {
                // The last transformation crossed the target.
                converged = true;
            }
        }

        ControllerRun {
            final_text: current,
            initial_score,
            final_score,
            converged,
            history,
        }
    }
}
