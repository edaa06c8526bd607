use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::HarnessError;
use crate::pipeline::EndpointRun;
use crate::pipeline::stage1_evaluate::SampleError;
use crate::pipeline::stage3_compare::Comparison;
use crate::report::json::render_summary_json;
use crate::report::text::render_report_text;
use crate::report::{RunContext, format_f64_6};

pub const PREDICTIONS_FILE: &str = "predictions.tsv";
pub const FAILURES_FILE: &str = "failures.tsv";
pub const CURVE_FILE: &str = "threshold_curve.tsv";
pub const SUMMARY_FILE: &str = "summary.json";
pub const REPORT_FILE: &str = "report.txt";

#[derive(Debug, Clone, Copy)]
pub struct Stage4Input<'a> {
    pub ctx: &'a RunContext,
    pub runs: &'a [EndpointRun],
    pub comparison: &'a Comparison,
}

pub fn write_reports(input: &Stage4Input<'_>, out_dir: &Path) -> Result<(), HarnessError> {
    fs::create_dir_all(out_dir).map_err(|e| HarnessError::io(out_dir, e))?;

    let path = out_dir.join(PREDICTIONS_FILE);
    write_predictions_tsv(input.runs, &path).map_err(|e| HarnessError::io(&path, e))?;

    let path = out_dir.join(FAILURES_FILE);
    write_failures_tsv(input.runs, &path).map_err(|e| HarnessError::io(&path, e))?;

    let path = out_dir.join(CURVE_FILE);
    write_curve_tsv(input.runs, &path).map_err(|e| HarnessError::io(&path, e))?;

    let path = out_dir.join(SUMMARY_FILE);
    let json = render_summary_json(input.ctx, input.runs, input.comparison)?;
    write_text(&path, &json).map_err(|e| HarnessError::io(&path, e))?;

    let path = out_dir.join(REPORT_FILE);
    let report = render_report_text(input.ctx, input.runs, input.comparison);
    write_text(&path, &report).map_err(|e| HarnessError::io(&path, e))?;

    tracing::info!(out_dir = %out_dir.display(), "reports written");
    Ok(())
}

fn write_predictions_tsv(runs: &[EndpointRun], path: &Path) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    writeln!(
        w,
        "endpoint\tsample_id\ttrue_label\tpredicted_label\tconfidence\tcorrect\tlatency_ms"
    )?;
    for run in runs {
        let Some(evaluation) = run.evaluation() else {
            continue;
        };
        for r in &evaluation.results {
            writeln!(
                w,
                "{}\t{}\t{}\t{}\t{}\t{}\t{}",
                run.endpoint.name,
                r.sample_id(),
                r.truth().class(),
                r.predicted().class(),
                format_f64_6(r.confidence()),
                r.is_correct(),
                format_f64_6(r.latency().as_secs_f64() * 1000.0)
            )?;
        }
    }
    w.flush()
}

fn write_failures_tsv(runs: &[EndpointRun], path: &Path) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    writeln!(w, "endpoint\tsample_id\tkind\terror")?;
    for run in runs {
        let Some(evaluation) = run.evaluation() else {
            continue;
        };
        for f in &evaluation.failures {
            let kind = match f.error {
                SampleError::Read { .. } => "sample_read",
                SampleError::Endpoint(_) => "endpoint",
            };
            writeln!(
                w,
                "{}\t{}\t{}\t{}",
                run.endpoint.name,
                f.sample_id,
                kind,
                sanitize(&f.error.to_string())
            )?;
        }
    }
    w.flush()
}

fn write_curve_tsv(runs: &[EndpointRun], path: &Path) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    writeln!(w, "endpoint\tthreshold\tincluded\tcorrect\taccuracy")?;
    for run in runs {
        let Some(report) = run.report() else {
            continue;
        };
        for p in &report.threshold_curve {
            writeln!(
                w,
                "{}\t{}\t{}\t{}\t{}",
                run.endpoint.name,
                format_f64_6(p.threshold),
                p.included,
                p.correct,
                format_f64_6(p.accuracy)
            )?;
        }
    }
    w.flush()
}

fn sanitize(value: &str) -> String {
    value.replace(['\t', '\n', '\r'], " ")
}

fn write_text(path: &Path, text: &str) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    w.write_all(text.as_bytes())?;
    if !text.ends_with('\n') {
        w.write_all(b"\n")?;
    }
    w.flush()
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage4_report.rs"]
mod tests;
