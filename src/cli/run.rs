use std::path::PathBuf;

use console::style;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::cli::commands::RunArgs;
use crate::config::{self, ScoutlineConfig};
use crate::errors::EngineError;
use crate::pipeline::orchestrator::PipelineOrchestrator;

/// Drives the `run` subcommand: loads optional YAML config, wires a
/// Ctrl-C-aware cancellation token (spec §5 "user interrupt: the scheduler
/// drains in-flight tools and emits a partial report"), and hands off to
/// the pipeline orchestrator.
pub async fn handle_run(args: RunArgs) -> Result<i32, EngineError> {
    let config = match &args.config {
        Some(path) => config::parse_config(&PathBuf::from(path)).await?,
        None => ScoutlineConfig::default(),
    };

    let skip_install = args.skip_install || config.scan.as_ref().and_then(|s| s.skip_install).unwrap_or(false);
    let workers = args
        .workers
        .or_else(|| config.scan.as_ref().and_then(|s| s.workers))
        .unwrap_or(4);
    let runtime_budget = args
        .runtime_budget
        .or_else(|| config.scan.as_ref().and_then(|s| s.runtime_budget_secs))
        .unwrap_or(1800);

    let output_dir = args
        .output_dir
        .map(PathBuf::from)
        .unwrap_or_else(|| default_output_dir(&args.target));
    tokio::fs::create_dir_all(&output_dir).await?;

    let cancel_token = CancellationToken::new();
    let ctrl_c_token = cancel_token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received; draining in-flight tools");
            ctrl_c_token.cancel();
        }
    });

    info!(target = %args.target, output_dir = %output_dir.display(), "starting scan");

    let orchestrator = PipelineOrchestrator::new(workers, skip_install, args.emit_html);
    let outcome = orchestrator
        .run(&args.target, &config, &output_dir, runtime_budget, cancel_token)
        .await?;

    println!(
        "{} scan complete: {} findings across {} tools ({})",
        style("✓").green(),
        outcome.report.findings.len(),
        outcome.report.execution_records.len(),
        output_dir.display(),
    );

    Ok(outcome.exit_code)
}

fn default_output_dir(target: &str) -> PathBuf {
    let sanitized: String = target
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
        .collect();
    let timestamp = chrono::Utc::now().format("%Y%m%d%H%M%S");
    PathBuf::from(format!("scan_results_{sanitized}_{timestamp}"))
}

/// Drives `--check-tools`: prints binary-availability for every catalogue
/// entry and exits without running a scan (spec §6).
pub async fn handle_check_tools() -> Result<i32, EngineError> {
    let rows = crate::runner::availability::availability_table().await;
    println!("{:<20} {}", "TOOL", "AVAILABLE");
    for (tool, available) in &rows {
        let marker = if *available {
            style("yes").green().to_string()
        } else {
            style("no").red().to_string()
        };
        println!("{:<20} {}", tool, marker);
    }
    let missing = rows.iter().filter(|(_, available)| !available).count();
    if missing > 0 {
        error!(missing, "{} tool(s) not found on PATH", missing);
    }
    Ok(0)
}
