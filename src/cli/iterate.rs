//! Iterate command - score-driven humanization loop

use crate::cli::{
    build_humanizer, build_pipeline_config, project_config, read_input, resolved_max_iterations,
    resolved_target, session, write_output,
};
use crate::models::SessionEntry;
use crate::oracle::HeuristicScorer;
use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

pub struct IterateArgs {
    pub input: Option<PathBuf>,
    pub target: Option<f64>,
    pub max_iterations: Option<usize>,
    pub heuristic: bool,
    pub tone: Option<String>,
    pub audience: Option<String>,
    pub no_preserve: bool,
    pub emojis: bool,
    pub artifacts: bool,
    pub seed: Option<u64>,
    pub format: String,
    pub output: Option<PathBuf>,
}

pub fn run(args: IterateArgs) -> Result<()> {
    let text = read_input(&args.input)?;
    let project = project_config();

    let mut humanizer = build_humanizer(&project);
    if args.heuristic {
        let lexicon = Arc::clone(humanizer.engine().lexicon());
        humanizer = humanizer.with_oracle(Arc::new(HeuristicScorer::new(lexicon)));
    }

    let config = build_pipeline_config(
        &project,
        None,
        args.tone,
        args.audience,
        args.no_preserve,
        args.emojis,
        args.artifacts,
        args.seed,
    )?;
    let target = resolved_target(&project, args.target, &humanizer);
    let max_iterations = resolved_max_iterations(&project, args.max_iterations);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").expect("valid progress template"),
    );
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner.set_message(format!(
        "iterating toward {target:.0} with the {} oracle (max {max_iterations} cycles)",
        humanizer.oracle_name()
    ));

    let outcome = humanizer.iterative_humanize(&text, target, max_iterations, &config);
    spinner.finish_and_clear();

    session::record(SessionEntry::new(
        "iterate",
        config.stealth_level,
        outcome.final_score.map(|s| s.metric),
        &outcome.result_text,
    ));

    if args.format == "json" {
        return write_output(&args.output, &serde_json::to_string_pretty(&outcome)?);
    }

    write_output(&args.output, &outcome.result_text)?;

    let status = if outcome.converged {
        style("converged").green()
    } else {
        style("exhausted").yellow()
    };
    eprintln!(
        "{} {} after {} cycle(s)",
        style("✓").green(),
        status,
        outcome.iterations_used
    );
    if let (Some(initial), Some(final_score)) = (outcome.initial_score, outcome.final_score) {
        eprintln!(
            "  score {:.1} → {:.1} ({})",
            initial.metric, final_score.metric, final_score.classification
        );
    }
    for record in &outcome.history {
        let marker = if record.failed {
            style("✗").red()
        } else {
            style("•").dim()
        };
        let metric = record
            .score
            .map(|s| format!("{:.1}", s.metric))
            .unwrap_or_else(|| "-".to_string());
        eprintln!(
            "  {marker} cycle {}: score {metric}, level {}, {} chars",
            record.iteration, record.level, record.text_len
        );
    }
    Ok(())
}
