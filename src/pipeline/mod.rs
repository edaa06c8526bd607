use std::ops::ControlFlow;

use crate::config::EndpointConfig;
use crate::error::HarnessError;
use crate::model::aggregate::AggregateReport;
use crate::model::sample::Sample;
use crate::model::thresholds::ThresholdSweep;
use crate::predict::Predictor;

pub mod stage1_evaluate;
pub mod stage2_summarize;
pub mod stage3_compare;
pub mod stage4_report;

use stage1_evaluate::{Evaluation, Progress, SampleOutcome, evaluate_with};
use stage2_summarize::summarize;

#[derive(Debug)]
pub enum RunOutcome {
    Completed {
        evaluation: Evaluation,
        report: AggregateReport,
    },
    Unavailable {
        reason: String,
        evaluation: Option<Evaluation>,
    },
}

#[derive(Debug)]
pub struct EndpointRun {
    pub endpoint: EndpointConfig,
    pub outcome: RunOutcome,
}

impl EndpointRun {
    pub fn report(&self) -> Option<&AggregateReport> {
        match &self.outcome {
            RunOutcome::Completed { report, .. } => Some(report),
            RunOutcome::Unavailable { .. } => None,
        }
    }

    pub fn evaluation(&self) -> Option<&Evaluation> {
        match &self.outcome {
            RunOutcome::Completed { evaluation, .. } => Some(evaluation),
            RunOutcome::Unavailable { evaluation, .. } => evaluation.as_ref(),
        }
    }
}

/// Evaluates one endpoint end to end. A failed health check or a run where
/// every sample was excluded yields `Unavailable` instead of an error.
pub fn run_endpoint<P>(
    endpoint: &EndpointConfig,
    predictor: &P,
    samples: &[Sample],
    sweep: &ThresholdSweep,
    health_check: bool,
) -> Result<EndpointRun, HarnessError>
where
    P: Predictor + ?Sized,
{
    let span = tracing::info_span!("endpoint", name = %endpoint.name);
    let _guard = span.enter();

    if health_check {
        if let Err(err) = predictor.health_check() {
            tracing::error!(url = %endpoint.url, error = %err, "endpoint is not responding");
            return Ok(EndpointRun {
                endpoint: endpoint.clone(),
                outcome: RunOutcome::Unavailable {
                    reason: format!("health check failed: {err}"),
                    evaluation: None,
                },
            });
        }
        tracing::info!(url = %endpoint.url, "endpoint is running");
    }

    let evaluation = evaluate_with(samples, predictor, log_progress)?;
    let outcome = match summarize(&evaluation.results, sweep) {
        Ok(report) => {
            tracing::info!(
                accuracy = report.accuracy,
                correct = report.correct,
                total = report.total,
                excluded = evaluation.excluded(),
                "endpoint evaluated"
            );
            RunOutcome::Completed { evaluation, report }
        }
        Err(HarnessError::EmptyInput(_)) => {
            tracing::error!(
                attempted = evaluation.attempted,
                "every sample was excluded; no report for this endpoint"
            );
            RunOutcome::Unavailable {
                reason: format!("all {} samples excluded", evaluation.attempted),
                evaluation: Some(evaluation),
            }
        }
        Err(other) => return Err(other),
    };

    Ok(EndpointRun {
        endpoint: endpoint.clone(),
        outcome,
    })
}

fn log_progress(progress: Progress<'_>) -> ControlFlow<()> {
    let position = progress.index + 1;
    match progress.outcome {
        SampleOutcome::Predicted(result) => tracing::info!(
            "[{}/{}] {} true={} predicted={} confidence={:.3}{}",
            position,
            progress.total,
            progress.sample.id(),
            result.truth(),
            result.predicted(),
            result.confidence(),
            if result.is_correct() { "" } else { " (miss)" }
        ),
        SampleOutcome::Excluded(failure) => tracing::info!(
            "[{}/{}] {} excluded: {}",
            position,
            progress.total,
            failure.sample_id,
            failure.error
        ),
    }
    ControlFlow::Continue(())
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/mod.rs"]
mod tests;
