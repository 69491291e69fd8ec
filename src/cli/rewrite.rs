//! Rewrite command - single transformation pass

use crate::cli::{
    build_humanizer, build_pipeline_config, project_config, read_input, session, write_output,
};
use crate::models::SessionEntry;
use anyhow::Result;
use console::style;
use std::path::PathBuf;

pub struct RewriteArgs {
    pub input: Option<PathBuf>,
    pub level: Option<u8>,
    pub auto: bool,
    pub tone: Option<String>,
    pub audience: Option<String>,
    pub no_preserve: bool,
    pub emojis: bool,
    pub artifacts: bool,
    pub seed: Option<u64>,
    pub format: String,
    pub output: Option<PathBuf>,
}

pub fn run(args: RewriteArgs) -> Result<()> {
    let text = read_input(&args.input)?;
    let project = project_config();
    let humanizer = build_humanizer(&project);

    let mut config = build_pipeline_config(
        &project,
        args.level,
        args.tone,
        args.audience,
        args.no_preserve,
        args.emojis,
        args.artifacts,
        args.seed,
    )?;

    if args.auto {
        let level = humanizer.adaptive_level(&text);
        eprintln!(
            "{} selected level {} from input features",
            style("→").cyan(),
            style(level).bold()
        );
        config.stealth_level = level;
    }

    let outcome = humanizer.humanize(&text, &config);

    session::record(SessionEntry::new(
        "rewrite",
        config.stealth_level,
        None,
        &outcome.result_text,
    ));

    match args.format.as_str() {
        "json" => write_output(&args.output, &serde_json::to_string_pretty(&outcome)?),
        _ => {
            write_output(&args.output, &outcome.result_text)?;
            eprintln!(
                "{} rewrote {} chars at level {} in {:.2}s",
                style("✓").green(),
                outcome.result_text.chars().count(),
                config.stealth_level,
                outcome.elapsed.as_secs_f64()
            );
            Ok(())
        }
    }
}
