use std::ops::ControlFlow;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::error::HarnessError;
use crate::model::prediction::PredictionResult;
use crate::model::sample::Sample;
use crate::predict::{EndpointError, Predictor};

/// Why a sample was excluded from a run.
#[derive(Debug, Error)]
pub enum SampleError {
    #[error("cannot read image {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Endpoint(#[from] EndpointError),
}

#[derive(Debug)]
pub struct SampleFailure {
    pub sample_id: String,
    pub error: SampleError,
}

#[derive(Debug, Clone, Copy)]
pub enum SampleOutcome<'a> {
    Predicted(&'a PredictionResult),
    Excluded(&'a SampleFailure),
}

#[derive(Debug, Clone, Copy)]
pub struct Progress<'a> {
    pub index: usize,
    pub total: usize,
    pub sample: &'a Sample,
    pub outcome: SampleOutcome<'a>,
}

#[derive(Debug, Default)]
pub struct Evaluation {
    pub results: Vec<PredictionResult>,
    pub failures: Vec<SampleFailure>,
    pub attempted: usize,
    pub elapsed: Duration,
    pub stopped_early: bool,
}

impl Evaluation {
    pub fn excluded(&self) -> usize {
        self.failures.len()
    }

    /// Wall time per successful prediction.
    pub fn mean_latency(&self) -> Option<Duration> {
        let n = u32::try_from(self.results.len()).ok().filter(|&n| n > 0)?;
        Some(self.elapsed / n)
    }
}

/// [`evaluate_with`] without a progress hook.
#[cfg_attr(not(test), allow(dead_code))]
pub fn evaluate<P>(samples: &[Sample], predictor: &P) -> Result<Evaluation, HarnessError>
where
    P: Predictor + ?Sized,
{
    evaluate_with(samples, predictor, |_| ControlFlow::Continue(()))
}

/// Predicts every sample in order, one request at a time. Failed samples are
/// logged and excluded; `on_progress` may break to stop before the next sample.
pub fn evaluate_with<P, F>(
    samples: &[Sample],
    predictor: &P,
    mut on_progress: F,
) -> Result<Evaluation, HarnessError>
where
    P: Predictor + ?Sized,
    F: FnMut(Progress<'_>) -> ControlFlow<()>,
{
    if samples.is_empty() {
        return Err(HarnessError::EmptyInput("no samples to evaluate"));
    }

    let started = Instant::now();
    let mut eval = Evaluation::default();
    let total = samples.len();

    for (index, sample) in samples.iter().enumerate() {
        eval.attempted += 1;
        let flow = match predict_one(sample, predictor) {
            Ok(result) => {
                tracing::debug!(
                    sample = sample.id(),
                    truth = %result.truth(),
                    predicted = %result.predicted(),
                    confidence = result.confidence(),
                    correct = result.is_correct(),
                    "prediction"
                );
                eval.results.push(result);
                let outcome = SampleOutcome::Predicted(&eval.results[eval.results.len() - 1]);
                on_progress(Progress {
                    index,
                    total,
                    sample,
                    outcome,
                })
            }
            Err(error) => {
                tracing::warn!(sample = sample.id(), error = %error, "sample excluded");
                eval.failures.push(SampleFailure {
                    sample_id: sample.id().to_string(),
                    error,
                });
                let outcome = SampleOutcome::Excluded(&eval.failures[eval.failures.len() - 1]);
                on_progress(Progress {
                    index,
                    total,
                    sample,
                    outcome,
                })
            }
        };
        if flow.is_break() {
            eval.stopped_early = eval.attempted < total;
            if eval.stopped_early {
                tracing::info!(attempted = eval.attempted, total, "evaluation stopped early");
            }
            break;
        }
    }

    eval.elapsed = started.elapsed();
    Ok(eval)
}

fn predict_one<P>(sample: &Sample, predictor: &P) -> Result<PredictionResult, SampleError>
where
    P: Predictor + ?Sized,
{
    let image = sample.read_image().map_err(|source| SampleError::Read {
        path: sample
            .path()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from(sample.id())),
        source,
    })?;
    let started = Instant::now();
    let prediction = predictor.predict(&image, &sample.file_name())?;
    Ok(PredictionResult::new(
        sample.id(),
        sample.label(),
        prediction,
        started.elapsed(),
    ))
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage1_evaluate.rs"]
mod tests;
