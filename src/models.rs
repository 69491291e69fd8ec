//! Core data models for Proseshift
//!
//! These models are shared across the pipeline engine, oracles, controller,
//! and the CLI: the request configuration, score/report value types, and the
//! bounded session history owned by the calling application.

use crate::error::ConfigError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::path::Path;
use std::time::Duration;

/// Aggressiveness level controlling which operators run. Valid range 1–5.
///
/// A validating newtype: out-of-range values are a [`ConfigError`] rejected
/// before any operator runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct StealthLevel(u8);

impl StealthLevel {
    pub const MIN: StealthLevel = StealthLevel(1);
    pub const MAX: StealthLevel = StealthLevel(5);

    pub fn new(level: u8) -> Result<Self, ConfigError> {
        if (1..=5).contains(&level) {
            Ok(Self(level))
        } else {
            Err(ConfigError::LevelOutOfRange(level))
        }
    }

    /// Clamp into the valid range instead of erroring. Used by the
    /// controller's score→level table, which must never produce an invalid
    /// level.
    pub fn clamped(level: u8) -> Self {
        Self(level.clamp(1, 5))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for StealthLevel {
    fn default() -> Self {
        Self(3)
    }
}

impl TryFrom<u8> for StealthLevel {
    type Error = ConfigError;
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StealthLevel> for u8 {
    fn from(level: StealthLevel) -> u8 {
        level.0
    }
}

impl std::fmt::Display for StealthLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Writing tone passed to generative operators. Unrecognized values are
/// accepted as opaque labels, not validated against a closed list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Tone {
    #[default]
    Balanced,
    Professional,
    Academic,
    Casual,
    Creative,
    /// Any other label, passed through verbatim.
    Other(String),
}

impl std::str::FromStr for Tone {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "balanced" => Tone::Balanced,
            "professional" => Tone::Professional,
            "academic" => Tone::Academic,
            "casual" => Tone::Casual,
            "creative" => Tone::Creative,
            _ => Tone::Other(s.to_string()),
        })
    }
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tone::Balanced => write!(f, "Balanced"),
            Tone::Professional => write!(f, "Professional"),
            Tone::Academic => write!(f, "Academic"),
            Tone::Casual => write!(f, "Casual"),
            Tone::Creative => write!(f, "Creative"),
            Tone::Other(label) => write!(f, "{label}"),
        }
    }
}

/// Per-call request configuration for the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub stealth_level: StealthLevel,
    pub tone: Tone,
    /// Free-form audience label, passed to generative operators verbatim.
    pub audience: String,
    /// Keep paragraph segmentation intact (per-paragraph recursion).
    pub preserve_formatting: bool,
    pub use_emojis: bool,
    /// Enable invisible-character / homoglyph noise operators.
    pub use_artifacts: bool,
    /// Fixed seed for reproducible runs. `None` draws a fresh seed that is
    /// logged at debug level.
    pub rng_seed: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            stealth_level: StealthLevel::default(),
            tone: Tone::Balanced,
            audience: "General".to_string(),
            preserve_formatting: true,
            use_emojis: false,
            use_artifacts: false,
            rng_seed: None,
        }
    }
}

/// Human-likeness label attached to a [`QualityScore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    VeryMachineLike,
    MachineLike,
    Mixed,
    HumanLike,
    VeryHumanLike,
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Classification::VeryMachineLike => write!(f, "very machine-like"),
            Classification::MachineLike => write!(f, "machine-like"),
            Classification::Mixed => write!(f, "mixed"),
            Classification::HumanLike => write!(f, "human-like"),
            Classification::VeryHumanLike => write!(f, "very human-like"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

/// One oracle scoring result. Produced fresh per call; referentially
/// transparent for a fixed text and fixed model state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct QualityScore {
    /// Raw metric in the oracle's own space: human probability 0–100 for the
    /// heuristic scorer, perplexity for the predictive one. The iteration
    /// target is expressed in this space.
    pub metric: f64,
    /// Normalized human-likeness in [0, 1].
    pub human_score: f64,
    pub classification: Classification,
    pub confidence: Confidence,
}

/// One entry in the iteration controller's append-only history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IterationRecord {
    /// 1-based cycle index.
    pub iteration: usize,
    /// Score observed at the start of the cycle; `None` if scoring failed.
    pub score: Option<QualityScore>,
    /// Level the pipeline ran at during this cycle.
    pub level: StealthLevel,
    /// Length of the text after this cycle's transformation.
    pub text_len: usize,
    /// Whether the cycle failed (scoring or transformation error).
    pub failed: bool,
}

/// Result of a single `humanize` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HumanizeOutcome {
    pub result_text: String,
    pub elapsed: Duration,
}

/// Result of an `iterative_humanize` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IterateOutcome {
    pub result_text: String,
    /// First successful score observed; `None` if every scoring attempt
    /// failed.
    pub initial_score: Option<QualityScore>,
    pub final_score: Option<QualityScore>,
    /// Cycles actually consumed, including failed ones.
    pub iterations_used: usize,
    pub converged: bool,
    pub history: Vec<IterationRecord>,
}

/// One heuristic check, reported independently for explainability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckOutcome {
    #[serde(skip_deserializing)]
    pub name: &'static str,
    pub passed: bool,
    pub detail: String,
}

/// Read-only stealth analysis of a text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StealthReport {
    /// Human probability, 0–100.
    pub probability_score: f64,
    pub checks: Vec<CheckOutcome>,
    pub recommendations: Vec<String>,
}

/// Maximum entries retained in a [`SessionHistory`].
pub const SESSION_HISTORY_CAPACITY: usize = 5;

/// Summary of one past run. Only a preview of the text is kept; full texts
/// are never persisted across sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEntry {
    pub timestamp: DateTime<Utc>,
    pub mode: String,
    pub level: u8,
    pub score: Option<f64>,
    pub preview: String,
    pub result_chars: usize,
}

impl SessionEntry {
    const PREVIEW_CHARS: usize = 120;

    pub fn new(
        mode: impl Into<String>,
        level: StealthLevel,
        score: Option<f64>,
        text: &str,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            mode: mode.into(),
            level: level.get(),
            score,
            preview: text.chars().take(Self::PREVIEW_CHARS).collect(),
            result_chars: text.chars().count(),
        }
    }
}

/// Bounded history of past results, capacity 5, oldest evicted first.
/// Owned by the calling application (the CLI), not the core.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionHistory {
    entries: VecDeque<SessionEntry>,
}

impl SessionHistory {
    pub fn push(&mut self, entry: SessionEntry) {
        self.entries.push_back(entry);
        while self.entries.len() > SESSION_HISTORY_CAPACITY {
            self.entries.pop_front();
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &SessionEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load from a JSON file. A missing or unreadable file yields an empty
    /// history rather than an error.
    pub fn load(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stealth_level_range() {
        assert!(StealthLevel::new(0).is_err());
        assert!(StealthLevel::new(6).is_err());
        for l in 1..=5 {
            assert_eq!(StealthLevel::new(l).unwrap().get(), l);
        }
        assert_eq!(StealthLevel::clamped(0).get(), 1);
        assert_eq!(StealthLevel::clamped(9).get(), 5);
    }

    #[test]
    fn test_tone_accepts_opaque_labels() {
        let tone: Tone = "Sardonic".parse().unwrap();
        assert_eq!(tone, Tone::Other("Sardonic".to_string()));
        let tone: Tone = "academic".parse().unwrap();
        assert_eq!(tone, Tone::Academic);
    }

    #[test]
    fn test_session_history_eviction() {
        let mut history = SessionHistory::default();
        for i in 0..8 {
            history.push(SessionEntry::new(
                "rewrite",
                StealthLevel::default(),
                Some(i as f64),
                "some result text",
            ));
        }
        assert_eq!(history.len(), SESSION_HISTORY_CAPACITY);
        // Oldest entries evicted first.
        let first = history.entries().next().unwrap();
        assert_eq!(first.score, Some(3.0));
    }

    #[test]
    fn test_session_history_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");

        let mut history = SessionHistory::default();
        history.push(SessionEntry::new(
            "iterate",
            StealthLevel::new(4).unwrap(),
            Some(82.5),
            "the quick brown fox",
        ));
        history.save(&path).unwrap();

        let loaded = SessionHistory::load(&path);
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.entries().next().unwrap().level, 4);
    }

    #[test]
    fn test_session_entry_preview_is_bounded() {
        let long = "x".repeat(500);
        let entry = SessionEntry::new("rewrite", StealthLevel::default(), None, &long);
        assert_eq!(entry.preview.chars().count(), 120);
        assert_eq!(entry.result_chars, 500);
    }
}
