mod config;
mod error;
mod input;
mod logging;
mod model;
mod pipeline;
mod predict;
mod report;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use crate::config::{ConfigFile, EndpointConfig, HarnessConfig, Overrides};
use crate::error::HarnessError;
use crate::input::{SampleSource, load_samples, write_synthetic};
use crate::model::sample::Sample;
use crate::pipeline::stage3_compare::compare;
use crate::pipeline::stage4_report::{Stage4Input, write_reports};
use crate::pipeline::{EndpointRun, RunOutcome, run_endpoint};
use crate::predict::HttpPredictor;
use crate::report::RunContext;

#[derive(Debug, Parser)]
#[command(
    name = "kira-lesioneval",
    version,
    about = "Evaluate benign/malignant lesion classifiers behind HTTP prediction endpoints"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Send the sample set to each endpoint and write reports.
    Run(RunArgs),
    /// Write the synthetic fixtures and their manifest to a folder.
    Synth(SynthArgs),
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Prediction endpoint as NAME=URL (repeatable).
    #[arg(long = "endpoint", value_name = "NAME=URL", value_parser = EndpointConfig::parse)]
    endpoints: Vec<EndpointConfig>,

    #[command(flatten)]
    source: SourceArgs,

    #[arg(long)]
    out: PathBuf,

    /// JSON configuration file; command-line flags take precedence.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_name = "SECS")]
    timeout_secs: Option<u64>,

    #[arg(long, value_name = "N")]
    per_class_limit: Option<usize>,

    /// Seed for per-class archive subsampling.
    #[arg(long)]
    seed: Option<u64>,

    /// Comma-separated confidence cutoffs, ascending.
    #[arg(long, value_delimiter = ',', value_name = "T1,T2,...")]
    thresholds: Option<Vec<f64>>,

    #[arg(long)]
    skip_health_check: bool,
}

#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
struct SourceArgs {
    /// Image archive with benign/ and malignant/ folders.
    #[arg(long)]
    archive: Option<PathBuf>,

    /// TSV manifest with path and label columns.
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Use the built-in synthetic fixtures.
    #[arg(long)]
    synthetic: bool,
}

#[derive(Debug, Args)]
struct SynthArgs {
    #[arg(long)]
    out: PathBuf,
}

fn main() {
    logging::init();
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {}", error_chain(&err));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), HarnessError> {
    match cli.command {
        Command::Run(args) => run_evaluation(args),
        Command::Synth(args) => {
            let manifest = write_synthetic(&args.out)?;
            tracing::info!(manifest = %manifest.display(), "synthetic fixtures ready");
            Ok(())
        }
    }
}

fn run_evaluation(args: RunArgs) -> Result<(), HarnessError> {
    let config = resolve_config(&args)?;
    let source = resolve_source(&args.source, config.per_class_limit, config.seed)?;

    let samples = load_samples(&source)?;
    if samples.is_empty() {
        return Err(HarnessError::EmptyInput("no samples found"));
    }

    let mut runs = Vec::with_capacity(config.endpoints.len());
    for endpoint in &config.endpoints {
        let run = match HttpPredictor::new(&endpoint.url, config.timeout) {
            Ok(predictor) => run_endpoint(
                endpoint,
                &predictor,
                &samples,
                &config.sweep,
                config.health_check,
            )?,
            Err(err) => {
                tracing::error!(endpoint = %endpoint.name, error = %err, "cannot build HTTP client");
                EndpointRun {
                    endpoint: endpoint.clone(),
                    outcome: RunOutcome::Unavailable {
                        reason: err.to_string(),
                        evaluation: None,
                    },
                }
            }
        };
        runs.push(run);
    }

    let comparison = compare(&runs);
    let ctx = build_context(&source, &samples, &config);
    write_reports(
        &Stage4Input {
            ctx: &ctx,
            runs: &runs,
            comparison: &comparison,
        },
        &args.out,
    )?;

    if runs.iter().all(|r| r.report().is_none()) {
        return Err(HarnessError::NoReports(runs.len()));
    }
    Ok(())
}

fn resolve_config(args: &RunArgs) -> Result<HarnessConfig, HarnessError> {
    let file = match &args.config {
        Some(path) => ConfigFile::load(path)?,
        None => ConfigFile::default(),
    };
    HarnessConfig::resolve(
        file,
        Overrides {
            endpoints: args.endpoints.clone(),
            thresholds: args.thresholds.clone(),
            timeout_secs: args.timeout_secs,
            per_class_limit: args.per_class_limit,
            seed: args.seed,
            skip_health_check: args.skip_health_check,
        },
    )
}

fn resolve_source(
    args: &SourceArgs,
    per_class_limit: usize,
    seed: u64,
) -> Result<SampleSource, HarnessError> {
    match (&args.archive, &args.manifest, args.synthetic) {
        (Some(root), None, false) => Ok(SampleSource::Archive {
            root: root.clone(),
            per_class_limit,
            seed,
        }),
        (None, Some(path), false) => Ok(SampleSource::Manifest(path.clone())),
        (None, None, true) => Ok(SampleSource::Synthetic),
        _ => Err(HarnessError::Config(
            "choose exactly one of --archive, --manifest, --synthetic".to_string(),
        )),
    }
}

fn build_context(source: &SampleSource, samples: &[Sample], config: &HarnessConfig) -> RunContext {
    let n_malignant = samples.iter().filter(|s| s.label().is_positive()).count();
    RunContext {
        tool_name: "kira-lesioneval".to_string(),
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
        git_hash: read_git_hash(&PathBuf::from(".")),
        sample_source: source.describe(),
        n_samples: samples.len(),
        n_benign: samples.len() - n_malignant,
        n_malignant,
        thresholds: config.sweep.thresholds.clone(),
        timeout_secs: config.timeout.as_secs_f64(),
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut parts = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if parts.last() != Some(&text) {
            parts.push(text);
        }
        source = cause.source();
    }
    parts.join(": ")
}

fn read_git_hash(repo_root: &Path) -> Option<String> {
    let head = repo_root.join(".git/HEAD");
    let content = std::fs::read_to_string(head).ok()?;
    if let Some(ref_line) = content.strip_prefix("ref: ") {
        let ref_path = repo_root.join(".git").join(ref_line.trim());
        return std::fs::read_to_string(ref_path)
            .ok()
            .map(|s| s.trim().to_string());
    }
    Some(content.trim().to_string())
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
