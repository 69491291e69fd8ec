//! Project-level configuration support
//!
//! Loads per-project configuration from a `proseshift.toml` file in the
//! working directory.
//!
//! # Configuration Format
//!
//! ```toml
//! # proseshift.toml
//!
//! [defaults]
//! level = 3
//! tone = "balanced"
//! audience = "General"
//! target_score = 80.0
//! max_iterations = 3
//! preserve_formatting = true
//!
//! [operators]
//! synonym_rate = 0.12
//! burstiness_target = 0.45
//! max_voice_insertions = 2
//!
//! [rewrite]
//! models = ["anthropic/claude-3.5-sonnet", "google/gemini-2.0-flash-exp:free"]
//! timeout_secs = 30
//! ```

use crate::operators::OperatorParams;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

pub const CONFIG_FILE_NAME: &str = "proseshift.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    #[serde(default)]
    pub defaults: CliDefaults,
    #[serde(default)]
    pub operators: OperatorOverrides,
    #[serde(default)]
    pub rewrite: RewriteSettings,
}

/// Defaults the CLI falls back to when a flag is not given.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CliDefaults {
    pub level: Option<u8>,
    pub tone: Option<String>,
    pub audience: Option<String>,
    pub target_score: Option<f64>,
    pub max_iterations: Option<usize>,
    pub preserve_formatting: Option<bool>,
}

/// Per-operator parameter overrides. Anything unset keeps its built-in
/// default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OperatorOverrides {
    pub shuffle_rate: Option<f64>,
    pub synonym_rate: Option<f64>,
    pub contraction_rate: Option<f64>,
    pub hedge_rate: Option<f64>,
    pub opener_rate: Option<f64>,
    pub aside_rate: Option<f64>,
    pub max_voice_insertions: Option<usize>,
    pub burstiness_target: Option<f64>,
    pub zero_width_rate: Option<f64>,
    pub homoglyph_rate: Option<f64>,
}

impl OperatorOverrides {
    /// Merge the overrides into a parameter set.
    pub fn apply(&self, params: &mut OperatorParams) {
        macro_rules! merge {
            ($($field:ident),+ $(,)?) => {
                $(if let Some(value) = self.$field {
                    params.$field = value;
                })+
            };
        }
        merge!(
            shuffle_rate,
            synonym_rate,
            contraction_rate,
            hedge_rate,
            opener_rate,
            aside_rate,
            max_voice_insertions,
            burstiness_target,
            zero_width_rate,
            homoglyph_rate,
        );
    }
}

/// Remote rewrite backend settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RewriteSettings {
    /// Ordered model chain; first success wins.
    pub models: Option<Vec<String>>,
    pub timeout_secs: Option<u64>,
}

/// Load `proseshift.toml` from `dir`. Missing file means defaults; a
/// malformed file is reported and ignored rather than aborting the run.
pub fn load_project_config(dir: &Path) -> ProjectConfig {
    let path = dir.join(CONFIG_FILE_NAME);
    let raw = match std::fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(_) => {
            debug!("no {CONFIG_FILE_NAME} in {}, using defaults", dir.display());
            return ProjectConfig::default();
        }
    };
    match toml::from_str(&raw) {
        Ok(config) => {
            debug!("loaded project config from {}", path.display());
            config
        }
        Err(err) => {
            warn!("ignoring malformed {}: {err}", path.display());
            ProjectConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_project_config(dir.path());
        assert!(config.defaults.level.is_none());
        assert!(config.rewrite.models.is_none());
    }

    #[test]
    fn test_load_and_apply_overrides() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"
[defaults]
level = 4
tone = "casual"

[operators]
synonym_rate = 0.25
max_voice_insertions = 1

[rewrite]
models = ["anthropic/claude-3.5-sonnet"]
timeout_secs = 10
"#,
        )
        .unwrap();

        let config = load_project_config(dir.path());
        assert_eq!(config.defaults.level, Some(4));
        assert_eq!(config.defaults.tone.as_deref(), Some("casual"));
        assert_eq!(config.rewrite.timeout_secs, Some(10));

        let mut params = OperatorParams::default();
        config.operators.apply(&mut params);
        assert_eq!(params.synonym_rate, 0.25);
        assert_eq!(params.max_voice_insertions, 1);
        // Untouched fields keep their defaults.
        assert_eq!(params.hedge_rate, OperatorParams::default().hedge_rate);
    }

    #[test]
    fn test_malformed_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "not [valid toml").unwrap();
        let config = load_project_config(dir.path());
        assert!(config.defaults.level.is_none());
    }
}
