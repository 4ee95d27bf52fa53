//! Evaluation CLI for the browserbench harness.
//!
//! Replays a dataset of browser-assistant conversations against a candidate
//! model, judges each predicted turn with a judge model, and prints the
//! six-dimension rubric means.

use anyhow::Context;
use browserbench_core::{ChatClient, ChatConfig, ModelSpec, Provider, ToolCatalog, TruncateConfig};
use browserbench_eval::{
    predictions_path, read_jsonl, verdicts_path, write_jsonl, Dataset, Evaluator, Judge,
    JsonlDataset, PredictionRecord, Predictor, RubricSummary, StageProgress,
};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

/// Evaluate a browser-assistant model against recorded conversations.
#[derive(Parser, Debug)]
#[command(name = "browserbench")]
#[command(about = "Replay conversations, predict assistant turns, and judge them against a rubric")]
#[command(version)]
struct Args {
    /// Model to evaluate, formatted as <provider>:<model_id>
    #[arg(long, short = 'm', default_value = "together.ai:Qwen/Qwen3-Next-80B-A3B-Thinking")]
    model: String,

    /// Judge model id (served by the OpenAI backend)
    #[arg(long, default_value = "gpt-5")]
    judge_model: String,

    /// Path to the conversations JSONL file
    #[arg(long, short = 'd')]
    dataset: PathBuf,

    /// Number of conversations to evaluate (default: all)
    #[arg(long, short = 's')]
    sample: Option<usize>,

    /// Maximum in-flight prediction requests
    #[arg(long, default_value = "10")]
    predict_concurrency: usize,

    /// Maximum in-flight judge requests
    #[arg(long, default_value = "10")]
    judge_concurrency: usize,

    /// Reuse the persisted predictions artifact instead of predicting
    #[arg(long)]
    skip_inference: bool,

    /// Directory for predictions and verdicts artifacts
    #[arg(long, short = 'o', default_value = "data")]
    output_dir: PathBuf,

    /// Characters of page content kept before the truncation marker
    #[arg(long, default_value = "50")]
    keep_head: usize,

    /// Characters of page content kept after the truncation marker
    #[arg(long, default_value = "50")]
    keep_tail: usize,

    /// Whole-request timeout in seconds for provider and judge calls
    #[arg(long, default_value = "120")]
    request_timeout: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// Validate CLI arguments.
    fn validate(&self) -> Result<(), String> {
        if self.predict_concurrency == 0 {
            return Err("predict-concurrency must be greater than 0".to_string());
        }
        if self.judge_concurrency == 0 {
            return Err("judge-concurrency must be greater than 0".to_string());
        }
        if !self.model.contains(':') {
            return Err(format!(
                "Invalid model '{}'. Use <provider>:<model_id>.",
                self.model
            ));
        }
        Ok(())
    }

    /// Build the shared client configuration.
    fn chat_config(&self) -> ChatConfig {
        ChatConfig::new().with_timeout(Duration::from_secs(self.request_timeout))
    }

    /// Build the page-content excerpt configuration.
    fn truncate_config(&self) -> TruncateConfig {
        TruncateConfig::new(self.keep_head, self.keep_tail)
    }
}

/// Progress bar wired to a stage's callbacks.
fn stage_progress_bar(label: &str) -> (ProgressBar, impl Fn(StageProgress) + Send + Sync) {
    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    bar.set_message(label.to_string());

    let callback_bar = bar.clone();
    let callback = move |progress: StageProgress| match progress {
        StageProgress::Started { total } => {
            callback_bar.set_length(total as u64);
        }
        StageProgress::ItemCompleted {
            completed, success, ..
        } => {
            callback_bar.set_position(completed as u64);
            if !success {
                callback_bar.set_message("(some failures)");
            }
        }
        _ => {} // Handle future variants gracefully
    };
    (bar, callback)
}

/// Run the full pipeline and return the aggregated summary.
async fn run(args: &Args) -> anyhow::Result<RubricSummary> {
    let spec = ModelSpec::parse(&args.model)?;
    let model_short = spec.short_name().to_string();
    let predictions_file = predictions_path(&args.output_dir, &model_short);

    let predictions: Vec<PredictionRecord> = if args.skip_inference {
        read_jsonl(&predictions_file).with_context(|| {
            format!(
                "Cannot reuse predictions from {} (run once without --skip-inference first)",
                predictions_file.display()
            )
        })?
    } else {
        let records = JsonlDataset::new(args.dataset.clone())
            .load(args.sample)
            .await
            .context("Failed to load dataset")?;

        let backend = Arc::new(ChatClient::for_provider(spec.provider, args.chat_config())?);
        let predictor = Predictor::new(backend, spec.model_id.clone(), ToolCatalog::builtin())
            .with_concurrency(args.predict_concurrency);

        eprintln!("Making predictions");
        let (bar, on_progress) = stage_progress_bar("Predicting...");
        let predictions = predictor.predict_all_with_progress(&records, on_progress).await;
        bar.finish_with_message("Predictions complete");

        write_jsonl(&predictions_file, &predictions)
            .context("Failed to write predictions artifact")?;
        eprintln!("Predictions written to: {}", predictions_file.display());
        predictions
    };

    let judge_backend = Arc::new(ChatClient::for_provider(
        Provider::OpenAi,
        args.chat_config(),
    )?);
    let judge = Judge::new(judge_backend, args.judge_model.clone())
        .with_truncate(args.truncate_config());
    let evaluator = Evaluator::new(judge).with_concurrency(args.judge_concurrency);

    eprintln!("Evaluating model");
    let (bar, on_progress) = stage_progress_bar("Judging...");
    let verdicts = evaluator
        .evaluate_all_with_progress(&predictions, on_progress)
        .await;
    bar.finish_with_message("Judging complete");

    let verdicts_file = verdicts_path(&args.output_dir, &model_short);
    write_jsonl(&verdicts_file, &verdicts).context("Failed to write verdicts artifact")?;
    eprintln!("Verdicts written to: {}", verdicts_file.display());

    Ok(RubricSummary::from_verdicts(&verdicts))
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    // Print configuration
    eprintln!("=== Browserbench Evaluation ===");
    eprintln!("Model: {}", args.model);
    eprintln!("Judge: {}", args.judge_model);
    eprintln!("Dataset: {}", args.dataset.display());
    eprintln!(
        "Sample size: {}",
        args.sample
            .map(|s| s.to_string())
            .unwrap_or_else(|| "all".to_string())
    );
    eprintln!(
        "Concurrency: predict={} judge={}",
        args.predict_concurrency, args.judge_concurrency
    );
    eprintln!();

    match run(&args).await {
        Ok(summary) => {
            summary.print_summary();
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
