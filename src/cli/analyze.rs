//! Analyze command - read-only stealth report

use crate::cli::{build_humanizer, project_config, read_input};
use anyhow::Result;
use console::style;
use std::path::PathBuf;

pub fn run(input: Option<PathBuf>, format: &str) -> Result<()> {
    let text = read_input(&input)?;
    let project = project_config();
    let humanizer = build_humanizer(&project);

    let report = humanizer.analyze_stealth(&text);

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let score_style = if report.probability_score >= 60.0 {
        style(format!("{:.1}%", report.probability_score)).green()
    } else if report.probability_score >= 30.0 {
        style(format!("{:.1}%", report.probability_score)).yellow()
    } else {
        style(format!("{:.1}%", report.probability_score)).red()
    };
    println!("\n{} Stealth analysis\n", style("🔎").bold());
    println!("Human probability: {score_style}\n");

    println!("Checks:");
    for check in &report.checks {
        let marker = if check.passed {
            style("✓").green()
        } else {
            style("✗").red()
        };
        println!("  {marker} {} — {}", check.name, style(&check.detail).dim());
    }

    println!("\nRecommendations:");
    for tip in &report.recommendations {
        println!("  → {tip}");
    }
    Ok(())
}
