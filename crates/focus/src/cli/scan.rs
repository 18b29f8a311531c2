//! The default command: score a directory and write the ranked report.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};

use focus_core::config::expand_path;
use focus_core::{
    hardware_parallelism, resolve_worker_count, BatchPlan, Config, ConfigError, FileDiscovery,
    JobOutcome, LaplacianScorer, Orchestrator, ProcessingStats, WorkerCountSource,
};

/// Arguments for a scan.
#[derive(Args, Debug, Default)]
pub struct ScanArgs {
    /// Directory of images to score (not searched recursively)
    #[arg(short, long, required = true, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Directory the CSV report is written into
    #[arg(short, long, required = true, value_name = "DIR")]
    pub save_to: Option<PathBuf>,

    /// Number of worker threads (must be below the hardware thread count)
    #[arg(short, long, value_name = "N")]
    pub threads: Option<usize>,
}

/// Execute a scan.
pub fn execute(args: ScanArgs, config: Config) -> anyhow::Result<()> {
    let plan = build_plan(&args, &config, hardware_parallelism())?;

    if plan.jobs.is_empty() {
        tracing::warn!("No files found; writing an empty report");
    } else {
        tracing::info!("Found {} file(s) to score", plan.jobs.len());
    }

    let progress = create_progress_bar(plan.jobs.len() as u64);
    let failed = Arc::new(AtomicUsize::new(0));
    let on_job_done = {
        let progress = progress.clone();
        let failed = Arc::clone(&failed);
        move |outcome: JobOutcome| {
            if outcome == JobOutcome::Failed {
                let n = failed.fetch_add(1, Ordering::Relaxed) + 1;
                progress.set_message(format!("{n} failed"));
            }
            progress.inc(1);
        }
    };

    let mut orchestrator = Orchestrator::new(LaplacianScorer::new(&config));
    let result = orchestrator.run(plan, on_job_done);
    progress.finish_and_clear();
    let outcome = result.context("Batch did not complete")?;

    print!("{}", outcome.report.summary(config.report.summary_count));
    tracing::info!("{} workers were used", outcome.stats.workers_used);
    print_summary(&outcome.stats);

    Ok(())
}

/// Validate arguments and resolve everything a batch needs.
fn build_plan(args: &ScanArgs, config: &Config, hardware: usize) -> Result<BatchPlan, ConfigError> {
    let directory = args
        .directory
        .as_deref()
        .map(expand_path)
        .ok_or(ConfigError::MissingOption("directory"))?;
    let save_to = args
        .save_to
        .as_deref()
        .ok_or(ConfigError::MissingOption("save-to"))?;

    if !directory.is_dir() {
        return Err(ConfigError::InvalidDirectory(directory));
    }
    let report_path = config.report_path(save_to);
    tracing::info!("Selected directory: {}", directory.display());
    tracing::info!("Report path: {}", report_path.display());

    let workers = resolve_worker_count(args.threads.or(config.processing.threads), hardware);
    match workers.source {
        WorkerCountSource::Requested => {
            tracing::info!("Using {} worker threads", workers.get());
        }
        WorkerCountSource::Default => {
            tracing::info!(
                "Using {} worker threads ({} hardware threads available)",
                workers.get(),
                hardware
            );
        }
        WorkerCountSource::Rejected(requested) => {
            tracing::warn!(
                "Thread count {} is not between 1 and {}; using {} instead",
                requested,
                hardware.saturating_sub(1),
                workers.get()
            );
        }
    }

    let jobs = FileDiscovery::new()
        .excluding(&report_path)
        .jobs(&directory)?;

    Ok(BatchPlan {
        jobs,
        report_path,
        workers,
    })
}

/// Create a progress bar for the batch.
fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar().template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
    ) {
        pb.set_style(style.progress_chars("##-"));
    }
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// Print a formatted summary table after the batch.
fn print_summary(stats: &ProcessingStats) {
    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Summary");
    eprintln!("  ====================================");
    eprintln!("    Succeeded:    {:>8}", stats.succeeded);
    if stats.failed > 0 {
        eprintln!("    Failed:       {:>8}", stats.failed);
    }
    eprintln!("  ------------------------------------");
    eprintln!("    Total:        {:>8}", stats.submitted);
    eprintln!("    Workers used: {:>8}", stats.workers_used);
    eprintln!("    Duration:     {:>7.1}s", stats.elapsed.as_secs_f64());
    eprintln!("    Rate:         {:>7.1} img/sec", stats.rate());
    eprintln!("  ====================================");
}
