//! Doctor command - check environment

use crate::capabilities::{StaticThesaurus, Thesaurus, DEFAULT_REWRITE_MODELS};
use crate::config::CONFIG_FILE_NAME;
use crate::oracle;
use anyhow::Result;

pub fn run() -> Result<()> {
    println!("🩺 Proseshift Doctor\n");

    // Built-in thesaurus
    let thesaurus = StaticThesaurus::default();
    if thesaurus.synonyms("important").is_empty() {
        println!("✗ Thesaurus: empty table");
    } else {
        println!("✓ Thesaurus: {} headwords", thesaurus.len());
    }

    // Predictive oracle (lazy, shared)
    match oracle::shared_predictive() {
        Some(_) => println!("✓ Predictive oracle: available"),
        None => println!("○ Predictive oracle: unavailable (heuristic fallback in use)"),
    }

    // Remote rewrite backends (optional - BYOK)
    let has_openrouter = std::env::var("OPENROUTER_API_KEY").is_ok();
    if has_openrouter {
        println!(
            "✓ Remote rewrite: OpenRouter configured ({} model chain)",
            DEFAULT_REWRITE_MODELS.len()
        );
    } else {
        println!("○ Remote rewrite: none configured");
        println!("  Set OPENROUTER_API_KEY to enable the remote rewrite operator");
    }

    // Paraphraser is an external capability with no built-in provider.
    println!("○ Paraphraser: none configured (operator degrades to no-op)");

    // Project config
    let cwd = std::env::current_dir()?;
    if cwd.join(CONFIG_FILE_NAME).exists() {
        println!("✓ Project config: {CONFIG_FILE_NAME} found");
    } else {
        println!("○ Project config: no {CONFIG_FILE_NAME} (run `proseshift init`)");
    }

    println!("\n✅ Doctor finished");
    Ok(())
}
