//! CLI command definitions and handlers

mod analyze;
mod doctor;
mod history;
mod init;
mod iterate;
mod rewrite;
mod session;

use crate::capabilities::RemoteRewriter;
use crate::config::{load_project_config, ProjectConfig};
use crate::humanize::{Humanizer, DEFAULT_MAX_ITERATIONS};
use crate::models::{PipelineConfig, StealthLevel, Tone};
use crate::operators::{CapabilitySet, OperatorParams};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Proseshift - staged text rewriting
///
/// 100% LOCAL by default - remote rewrite backends are opt-in via API keys.
#[derive(Parser, Debug)]
#[command(name = "proseshift")]
#[command(
    version,
    about = "Staged text rewriting — level-gated mutation operators, quality oracles, and score-driven iteration",
    long_about = "Proseshift reshapes the statistical signature of prose through a catalogue of \
level-gated mutation operators, scores the result with a pluggable quality oracle, and can \
iterate until a target score is reached.\n\n\
Everything runs locally; the optional remote rewrite stage activates only when an API key \
is configured.",
    after_help = "\
Examples:
  proseshift rewrite draft.txt                   Rewrite a file at the default level
  proseshift rewrite draft.txt -l 5 --seed 7     Maximum level, reproducible run
  proseshift rewrite --auto draft.txt            Let the selector pick the level
  proseshift iterate draft.txt --target 80       Iterate until the score target
  proseshift analyze draft.txt                   Read-only stealth analysis
  proseshift doctor                              Check capability availability

Reads stdin when no input file is given."
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a single transformation pass
    Rewrite {
        /// Input file (default: stdin)
        input: Option<PathBuf>,

        /// Stealth level 1-5 (higher = more aggressive)
        #[arg(long, short = 'l')]
        level: Option<u8>,

        /// Pick the starting level from input features instead
        #[arg(long, conflicts_with = "level")]
        auto: bool,

        /// Writing tone (balanced, professional, academic, casual, creative, or any label)
        #[arg(long)]
        tone: Option<String>,

        /// Target audience label
        #[arg(long)]
        audience: Option<String>,

        /// Process the text as one block instead of per paragraph
        #[arg(long)]
        no_preserve: bool,

        /// Inject tone-keyed emoji
        #[arg(long)]
        emojis: bool,

        /// Enable invisible-character noise operators
        #[arg(long)]
        artifacts: bool,

        /// Fixed RNG seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,

        /// Output file (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Iterate until a quality target is reached
    Iterate {
        /// Input file (default: stdin)
        input: Option<PathBuf>,

        /// Target score in the oracle's metric space
        #[arg(long)]
        target: Option<f64>,

        /// Maximum iteration cycles
        #[arg(long)]
        max_iterations: Option<usize>,

        /// Force the heuristic oracle even when the predictive one is available
        #[arg(long)]
        heuristic: bool,

        /// Writing tone
        #[arg(long)]
        tone: Option<String>,

        /// Target audience label
        #[arg(long)]
        audience: Option<String>,

        /// Process the text as one block instead of per paragraph
        #[arg(long)]
        no_preserve: bool,

        /// Inject tone-keyed emoji
        #[arg(long)]
        emojis: bool,

        /// Enable invisible-character noise operators
        #[arg(long)]
        artifacts: bool,

        /// Fixed RNG seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,

        /// Output file (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Read-only stealth analysis with per-check breakdown
    Analyze {
        /// Input file (default: stdin)
        input: Option<PathBuf>,

        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// Check environment and capability availability
    Doctor,

    /// Write an example proseshift.toml
    Init,

    /// Show recent run history
    History,
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Rewrite {
            input,
            level,
            auto,
            tone,
            audience,
            no_preserve,
            emojis,
            artifacts,
            seed,
            format,
            output,
        } => rewrite::run(rewrite::RewriteArgs {
            input,
            level,
            auto,
            tone,
            audience,
            no_preserve,
            emojis,
            artifacts,
            seed,
            format,
            output,
        }),
        Commands::Iterate {
            input,
            target,
            max_iterations,
            heuristic,
            tone,
            audience,
            no_preserve,
            emojis,
            artifacts,
            seed,
            format,
            output,
        } => iterate::run(iterate::IterateArgs {
            input,
            target,
            max_iterations,
            heuristic,
            tone,
            audience,
            no_preserve,
            emojis,
            artifacts,
            seed,
            format,
            output,
        }),
        Commands::Analyze { input, format } => analyze::run(input, &format),
        Commands::Doctor => doctor::run(),
        Commands::Init => init::run(),
        Commands::History => history::run(),
    }
}

/// Read the input text from a file or stdin.
pub(crate) fn read_input(path: &Option<PathBuf>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}

/// Write to a file or stdout.
pub(crate) fn write_output(path: &Option<PathBuf>, content: &str) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, content)
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            println!("{content}");
            Ok(())
        }
    }
}

/// Shared request-config assembly. Level validation happens here, before
/// anything runs.
#[allow(clippy::too_many_arguments)]
pub(crate) fn build_pipeline_config(
    project: &ProjectConfig,
    level: Option<u8>,
    tone: Option<String>,
    audience: Option<String>,
    no_preserve: bool,
    emojis: bool,
    artifacts: bool,
    seed: Option<u64>,
) -> Result<PipelineConfig> {
    let level = level
        .or(project.defaults.level)
        .unwrap_or(StealthLevel::default().get());
    let stealth_level = StealthLevel::new(level)?;

    let tone: Tone = tone
        .or_else(|| project.defaults.tone.clone())
        .as_deref()
        .unwrap_or("balanced")
        .parse()
        .expect("tone parsing is infallible");

    let audience = audience
        .or_else(|| project.defaults.audience.clone())
        .unwrap_or_else(|| "General".to_string());

    let preserve_formatting = if no_preserve {
        false
    } else {
        project.defaults.preserve_formatting.unwrap_or(true)
    };

    Ok(PipelineConfig {
        stealth_level,
        tone,
        audience,
        preserve_formatting,
        use_emojis: emojis,
        use_artifacts: artifacts,
        rng_seed: seed,
    })
}

/// Build a [`Humanizer`] from project config: operator overrides applied,
/// remote rewrite wired up when an API key is available.
pub(crate) fn build_humanizer(project: &ProjectConfig) -> Humanizer {
    let mut params = OperatorParams::default();
    project.operators.apply(&mut params);

    let timeout = Duration::from_secs(project.rewrite.timeout_secs.unwrap_or(30));
    let rewriter = match &project.rewrite.models {
        Some(models) => RemoteRewriter::from_env_with_models(models, timeout),
        None => RemoteRewriter::from_env(),
    };
    let caps = CapabilitySet {
        rewriter: rewriter.ok().map(Arc::new),
        ..CapabilitySet::default()
    };

    Humanizer::new(caps, params)
}

/// Load config from the current directory.
pub(crate) fn project_config() -> ProjectConfig {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    load_project_config(&cwd)
}

/// Explicit flag wins, then the project file, then whatever target the
/// active oracle considers "human enough" in its own metric space.
pub(crate) fn resolved_target(
    project: &ProjectConfig,
    target: Option<f64>,
    humanizer: &Humanizer,
) -> f64 {
    target
        .or(project.defaults.target_score)
        .unwrap_or_else(|| humanizer.default_target())
}

pub(crate) fn resolved_max_iterations(
    project: &ProjectConfig,
    max_iterations: Option<usize>,
) -> usize {
    max_iterations
        .or(project.defaults.max_iterations)
        .unwrap_or(DEFAULT_MAX_ITERATIONS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_level_is_rejected_up_front() {
        let project = ProjectConfig::default();
        let err = build_pipeline_config(&project, Some(9), None, None, false, false, false, None);
        assert!(err.is_err());
    }

    #[test]
    fn test_project_defaults_flow_through() {
        let mut project = ProjectConfig::default();
        project.defaults.level = Some(4);
        project.defaults.tone = Some("casual".to_string());
        let config =
            build_pipeline_config(&project, None, None, None, false, false, false, None).unwrap();
        assert_eq!(config.stealth_level.get(), 4);
        assert_eq!(config.tone, Tone::Casual);
    }

    #[test]
    fn test_flags_override_project_defaults() {
        let mut project = ProjectConfig::default();
        project.defaults.level = Some(4);
        let config = build_pipeline_config(
            &project,
            Some(2),
            Some("Creative".to_string()),
            None,
            true,
            false,
            false,
            Some(99),
        )
        .unwrap();
        assert_eq!(config.stealth_level.get(), 2);
        assert_eq!(config.tone, Tone::Creative);
        assert!(!config.preserve_formatting);
        assert_eq!(config.rng_seed, Some(99));
    }
}
