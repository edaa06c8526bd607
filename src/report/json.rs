use serde::Serialize;

use crate::model::aggregate::AggregateReport;
use crate::pipeline::stage3_compare::Comparison;
use crate::pipeline::{EndpointRun, RunOutcome};
use crate::report::RunContext;

#[derive(Debug, Serialize)]
struct SummaryDocument<'a> {
    tool: ToolInfo<'a>,
    input: InputInfo<'a>,
    endpoints: Vec<EndpointSummary<'a>>,
    comparison: &'a Comparison,
}

#[derive(Debug, Serialize)]
struct ToolInfo<'a> {
    name: &'a str,
    version: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    git_hash: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct InputInfo<'a> {
    source: &'a str,
    n_samples: usize,
    benign: usize,
    malignant: usize,
    thresholds: &'a [f64],
    timeout_secs: f64,
}

#[derive(Debug, Serialize)]
struct EndpointSummary<'a> {
    name: &'a str,
    url: &'a str,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'a str>,
    attempted: usize,
    excluded: usize,
    elapsed_secs: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    mean_latency_secs: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<&'a AggregateReport>,
}

pub fn render_summary_json(
    ctx: &RunContext,
    runs: &[EndpointRun],
    comparison: &Comparison,
) -> Result<String, serde_json::Error> {
    let doc = SummaryDocument {
        tool: ToolInfo {
            name: &ctx.tool_name,
            version: &ctx.tool_version,
            git_hash: ctx.git_hash.as_deref(),
        },
        input: InputInfo {
            source: &ctx.sample_source,
            n_samples: ctx.n_samples,
            benign: ctx.n_benign,
            malignant: ctx.n_malignant,
            thresholds: &ctx.thresholds,
            timeout_secs: ctx.timeout_secs,
        },
        endpoints: runs.iter().map(endpoint_summary).collect(),
        comparison,
    };
    serde_json::to_string_pretty(&doc)
}

fn endpoint_summary(run: &EndpointRun) -> EndpointSummary<'_> {
    let evaluation = run.evaluation();
    let (status, reason) = match &run.outcome {
        RunOutcome::Completed { .. } => ("completed", None),
        RunOutcome::Unavailable { reason, .. } => ("unavailable", Some(reason.as_str())),
    };
    EndpointSummary {
        name: &run.endpoint.name,
        url: &run.endpoint.url,
        status,
        reason,
        attempted: evaluation.map(|e| e.attempted).unwrap_or(0),
        excluded: evaluation.map(|e| e.excluded()).unwrap_or(0),
        elapsed_secs: evaluation.map(|e| e.elapsed.as_secs_f64()).unwrap_or(0.0),
        mean_latency_secs: evaluation
            .and_then(|e| e.mean_latency())
            .map(|d| d.as_secs_f64()),
        report: run.report(),
    }
}
