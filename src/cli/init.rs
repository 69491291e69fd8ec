//! Init command - write an example proseshift.toml

use crate::config::CONFIG_FILE_NAME;
use anyhow::{Context, Result};
use console::style;

const EXAMPLE_CONFIG: &str = r#"# Proseshift configuration

[defaults]
# Stealth level 1-5 used when no --level flag is given
level = 3
tone = "balanced"
audience = "General"
# Iteration settings for `proseshift iterate`
target_score = 80.0
max_iterations = 3
preserve_formatting = true

[operators]
# Probability overrides; anything omitted keeps its built-in default
# synonym_rate = 0.12
# hedge_rate = 0.3
# burstiness_target = 0.45
# max_voice_insertions = 2

[rewrite]
# Ordered model chain for the remote rewrite operator (requires
# OPENROUTER_API_KEY); first success wins
models = ["anthropic/claude-3.5-sonnet", "google/gemini-2.0-flash-exp:free"]
timeout_secs = 30
"#;

pub fn run() -> Result<()> {
    let path = std::env::current_dir()?.join(CONFIG_FILE_NAME);
    if path.exists() {
        println!(
            "{} {} already exists, leaving it untouched",
            style("✓").green(),
            style(path.display()).cyan()
        );
        return Ok(());
    }

    std::fs::write(&path, EXAMPLE_CONFIG)
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!(
        "{} wrote {}",
        style("✓").green(),
        style(path.display()).cyan()
    );
    Ok(())
}
