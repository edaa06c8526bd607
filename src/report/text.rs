use crate::model::aggregate::{AggregateReport, ConfidenceStats};
use crate::model::label::Label;
use crate::pipeline::stage1_evaluate::Evaluation;
use crate::pipeline::stage3_compare::{Comparison, Ranked};
use crate::pipeline::{EndpointRun, RunOutcome};
use crate::report::{RunContext, format_f64_3, format_pct};

pub fn render_report_text(ctx: &RunContext, runs: &[EndpointRun], comparison: &Comparison) -> String {
    let mut out = String::new();

    out.push_str("Lesion Classifier Evaluation Report\n");
    out.push_str("===================================\n\n");
    out.push_str(&format!(
        "Samples: {} ({} benign, {} malignant) from {}\n",
        ctx.n_samples, ctx.n_benign, ctx.n_malignant, ctx.sample_source
    ));
    out.push_str(&format!(
        "Request timeout: {}s\n\n",
        format_f64_3(ctx.timeout_secs)
    ));

    for (idx, run) in runs.iter().enumerate() {
        out.push_str(&format!(
            "{}. {} ({})\n",
            idx + 1,
            run.endpoint.name,
            run.endpoint.url
        ));
        match &run.outcome {
            RunOutcome::Completed { evaluation, report } => {
                render_endpoint(&mut out, evaluation, report);
            }
            RunOutcome::Unavailable { reason, .. } => {
                out.push_str(&format!("Status: unavailable ({reason})\n"));
            }
        }
        out.push('\n');
    }

    if runs.len() > 1 {
        render_comparison(&mut out, comparison);
    }

    out
}

fn render_endpoint(out: &mut String, evaluation: &Evaluation, report: &AggregateReport) {
    out.push_str(&format!(
        "Overall accuracy: {} ({}/{}, {})\n",
        format_f64_3(report.accuracy),
        report.correct,
        report.total,
        format_pct(report.accuracy)
    ));
    out.push_str(&format!(
        "Excluded samples: {} of {}\n",
        evaluation.excluded(),
        evaluation.attempted
    ));
    if evaluation.stopped_early {
        out.push_str("Note: evaluation stopped before the last sample.\n");
    }
    out.push_str(&format!("Confidence: {}\n", confidence_line(&report.confidence)));
    if let Some(stats) = &report.confidence_correct {
        out.push_str(&format!("Confidence (correct): {}\n", confidence_line(stats)));
    }
    if let Some(stats) = &report.confidence_incorrect {
        out.push_str(&format!(
            "Confidence (incorrect): {}\n",
            confidence_line(stats)
        ));
    }
    out.push_str(&format!(
        "Predictions: benign={}, malignant={}\n",
        report.predicted_benign, report.predicted_malignant
    ));

    out.push_str("Per-class accuracy:\n");
    for label in Label::ALL {
        match report.class_accuracy(label) {
            Some(class) => out.push_str(&format!(
                "  {}: {}/{} ({})\n    confidence {}\n",
                label,
                class.correct,
                class.total,
                format_pct(class.accuracy),
                confidence_line(&class.confidence)
            )),
            None => out.push_str(&format!("  {label}: no samples\n")),
        }
    }

    let m = &report.confusion;
    out.push_str("Confusion matrix:\n");
    out.push_str("                    Predicted\n");
    out.push_str("                   Benign  Malignant\n");
    out.push_str(&format!("  Actual Benign     {:6}  {:9}\n", m.tn, m.fp));
    out.push_str(&format!("  Actual Malignant  {:6}  {:9}\n", m.fn_, m.tp));
    out.push_str(&format!(
        "  Sensitivity (TPR): {}\n",
        optional_ratio(report.sensitivity, "no malignant samples")
    ));
    out.push_str(&format!(
        "  Specificity (TNR): {}\n",
        optional_ratio(report.specificity, "no benign samples")
    ));
    out.push_str(&format!(
        "  Precision (PPV):   {}\n",
        optional_ratio(report.precision, "no malignant predictions")
    ));

    out.push_str("Accuracy by confidence threshold:\n");
    for point in &report.threshold_curve {
        out.push_str(&format!(
            "  >= {:<5}  n={:<4} accuracy={}\n",
            point.threshold,
            point.included,
            format_f64_3(point.accuracy)
        ));
    }

    out.push_str(&format!(
        "Total time: {}s",
        format_f64_3(evaluation.elapsed.as_secs_f64())
    ));
    if let Some(latency) = evaluation.mean_latency() {
        out.push_str(&format!(
            ", average per prediction: {}s",
            format_f64_3(latency.as_secs_f64())
        ));
    }
    out.push('\n');
}

fn render_comparison(out: &mut String, comparison: &Comparison) {
    out.push_str("Comparison\n");
    out.push_str("----------\n");
    out.push_str(&format!(
        "Best accuracy: {}\n",
        ranked(comparison.best_accuracy.as_ref(), format_pct)
    ));
    out.push_str(&format!(
        "Highest mean confidence: {}\n",
        ranked(comparison.highest_confidence.as_ref(), format_f64_3)
    ));
    out.push_str(&format!(
        "Fastest inference: {}\n",
        ranked(comparison.fastest.as_ref(), |v| format!("{}s", format_f64_3(v)))
    ));
    if !comparison.unavailable.is_empty() {
        out.push_str(&format!(
            "No results: {}\n",
            comparison.unavailable.join(", ")
        ));
    }
}

fn confidence_line(stats: &ConfidenceStats) -> String {
    format!(
        "mean {}, std {}, range {} - {} (n={})",
        format_f64_3(stats.mean),
        format_f64_3(stats.std),
        format_f64_3(stats.min),
        format_f64_3(stats.max),
        stats.n
    )
}

fn optional_ratio(value: Option<f64>, missing: &str) -> String {
    match value {
        Some(v) => format!("{} ({})", format_f64_3(v), format_pct(v)),
        None => format!("n/a ({missing})"),
    }
}

fn ranked(entry: Option<&Ranked>, fmt: impl Fn(f64) -> String) -> String {
    match entry {
        Some(r) => format!("{} ({})", r.endpoint, fmt(r.value)),
        None => "none".to_string(),
    }
}
