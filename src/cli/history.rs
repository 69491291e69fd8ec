//! History command - show recent run summaries

use crate::cli::session;
use anyhow::Result;
use console::style;

pub fn run() -> Result<()> {
    let history = session::load();
    if history.is_empty() {
        println!("No history yet.");
        return Ok(());
    }

    println!("\n{} Recent runs\n", style("🕒").bold());
    for entry in history.entries() {
        let score = entry
            .score
            .map(|s| format!("score {s:.1}"))
            .unwrap_or_else(|| "no score".to_string());
        println!(
            "  {} {} (level {}, {}, {} chars)",
            style(entry.timestamp.format("%Y-%m-%d %H:%M:%S")).dim(),
            style(&entry.mode).bold(),
            entry.level,
            score,
            entry.result_chars
        );
        println!("    {}", style(&entry.preview).dim());
    }
    Ok(())
}
