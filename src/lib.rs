//! Proseshift - staged text rewriting
//!
//! A pipeline of small, randomized, level-gated transformations that
//! reshape the statistical signature of prose while keeping it readable,
//! plus quality oracles and a feedback loop that iterates until a target
//! score is reached.
//!
//! # Architecture
//!
//! ```text
//! input ──▶ AdaptiveSelector (optional) ──▶ IterationController
//!                                              │  loop:
//!                                              │   PipelineEngine(text, level)
//!                                              │   QualityOracle.score(text)
//!                                              ▼
//!                                    output + iteration history
//! ```
//!
//! The [`humanize::Humanizer`] facade is the main entry point:
//!
//! ```rust
//! use proseshift::humanize::Humanizer;
//! use proseshift::models::PipelineConfig;
//!
//! let humanizer = Humanizer::default();
//! let config = PipelineConfig {
//!     rng_seed: Some(42),
//!     ..PipelineConfig::default()
//! };
//! let outcome = humanizer.humanize("Furthermore, the approach is robust.", &config);
//! assert!(!outcome.result_text.is_empty());
//! ```

pub mod capabilities;
pub(crate) mod cli;
pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod humanize;
pub mod lexicon;
pub mod models;
pub mod operators;
pub mod oracle;
pub mod selector;
pub mod text;

pub use cli::{run as run_cli, Cli};
pub use humanize::Humanizer;
pub use models::{HumanizeOutcome, IterateOutcome, PipelineConfig, StealthLevel, Tone};
