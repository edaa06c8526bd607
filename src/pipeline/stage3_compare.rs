use serde::Serialize;

use crate::pipeline::{EndpointRun, RunOutcome};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranked {
    pub endpoint: String,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Comparison {
    pub best_accuracy: Option<Ranked>,
    pub highest_confidence: Option<Ranked>,
    /// Mean seconds per successful prediction.
    pub fastest: Option<Ranked>,
    pub unavailable: Vec<String>,
}

/// Ranks completed endpoints. Ties keep the endpoint listed first.
pub fn compare(runs: &[EndpointRun]) -> Comparison {
    let mut out = Comparison::default();
    for run in runs {
        let (evaluation, report) = match &run.outcome {
            RunOutcome::Completed { evaluation, report } => (evaluation, report),
            RunOutcome::Unavailable { .. } => {
                out.unavailable.push(run.endpoint.name.clone());
                continue;
            }
        };
        let name = &run.endpoint.name;

        keep_best(&mut out.best_accuracy, name, report.accuracy, |new, cur| {
            new > cur
        });
        keep_best(
            &mut out.highest_confidence,
            name,
            report.confidence.mean,
            |new, cur| new > cur,
        );
        if let Some(latency) = evaluation.mean_latency() {
            keep_best(&mut out.fastest, name, latency.as_secs_f64(), |new, cur| {
                new < cur
            });
        }
    }
    out
}

fn keep_best(slot: &mut Option<Ranked>, name: &str, value: f64, better: impl Fn(f64, f64) -> bool) {
    let replace = match slot {
        Some(current) => better(value, current.value),
        None => true,
    };
    if replace {
        *slot = Some(Ranked {
            endpoint: name.to_string(),
            value,
        });
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage3_compare.rs"]
mod tests;
