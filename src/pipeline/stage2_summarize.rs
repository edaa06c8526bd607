use crate::error::HarnessError;
use crate::model::aggregate::{
    AggregateReport, ClassAccuracy, ConfidenceStats, ConfusionMatrix, ThresholdPoint,
};
use crate::model::label::Label;
use crate::model::prediction::PredictionResult;
use crate::model::thresholds::{HISTOGRAM_BINS, ThresholdSweep};
use crate::report::{mean, population_std};

/// Pure aggregation over completed results. Fails only on empty input.
pub fn summarize(
    results: &[PredictionResult],
    sweep: &ThresholdSweep,
) -> Result<AggregateReport, HarnessError> {
    if results.is_empty() {
        return Err(HarnessError::EmptyInput(
            "no prediction results to summarize",
        ));
    }

    let total = results.len();
    let correct = results.iter().filter(|r| r.is_correct()).count();
    let confusion = confusion_matrix(results);
    debug_assert_eq!(confusion.total(), total);

    let per_class = Label::ALL
        .iter()
        .filter_map(|&label| class_accuracy(results, label))
        .collect();

    let confidences = results.iter().map(|r| r.confidence()).collect::<Vec<_>>();
    let confidence = confidence_stats(&confidences).ok_or(HarnessError::EmptyInput(
        "no confidences to summarize",
    ))?;
    let (right, wrong): (Vec<&PredictionResult>, Vec<&PredictionResult>) =
        results.iter().partition(|r| r.is_correct());
    let right = right.iter().map(|r| r.confidence()).collect::<Vec<_>>();
    let wrong = wrong.iter().map(|r| r.confidence()).collect::<Vec<_>>();

    let predicted_malignant = results
        .iter()
        .filter(|r| r.predicted().is_positive())
        .count();

    Ok(AggregateReport {
        total,
        correct,
        accuracy: correct as f64 / total as f64,
        per_class,
        confidence,
        confidence_correct: confidence_stats(&right),
        confidence_incorrect: confidence_stats(&wrong),
        confidence_histogram: confidence_histogram(&confidences),
        predicted_benign: total - predicted_malignant,
        predicted_malignant,
        confusion,
        sensitivity: confusion.sensitivity(),
        specificity: confusion.specificity(),
        precision: confusion.precision(),
        threshold_curve: threshold_curve(results, &sweep.thresholds),
    })
}

pub fn confusion_matrix(results: &[PredictionResult]) -> ConfusionMatrix {
    let mut m = ConfusionMatrix::default();
    for r in results {
        match (r.is_correct(), r.truth()) {
            (true, Label::Malignant) => m.tp += 1,
            (true, Label::Benign) => m.tn += 1,
            (false, Label::Benign) => m.fp += 1,
            (false, Label::Malignant) => m.fn_ += 1,
        }
    }
    m
}

fn class_accuracy(results: &[PredictionResult], label: Label) -> Option<ClassAccuracy> {
    let members = results
        .iter()
        .filter(|r| r.truth() == label)
        .collect::<Vec<_>>();
    if members.is_empty() {
        return None;
    }
    let correct = members.iter().filter(|r| r.is_correct()).count();
    let confidences = members.iter().map(|r| r.confidence()).collect::<Vec<_>>();
    Some(ClassAccuracy {
        label,
        total: members.len(),
        correct,
        accuracy: correct as f64 / members.len() as f64,
        confidence: confidence_stats(&confidences)?,
    })
}

fn confidence_stats(values: &[f64]) -> Option<ConfidenceStats> {
    if values.is_empty() {
        return None;
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some(ConfidenceStats {
        n: values.len(),
        mean: mean(values),
        std: population_std(values),
        min,
        max,
    })
}

/// Equal-width bins over [0, 1]; a confidence of exactly 1.0 lands in the last bin.
pub fn confidence_histogram(values: &[f64]) -> Vec<usize> {
    let mut bins = vec![0usize; HISTOGRAM_BINS];
    for &v in values {
        let idx = ((v * HISTOGRAM_BINS as f64).floor() as usize).min(HISTOGRAM_BINS - 1);
        bins[idx] += 1;
    }
    bins
}

pub fn threshold_curve(results: &[PredictionResult], thresholds: &[f64]) -> Vec<ThresholdPoint> {
    thresholds
        .iter()
        .map(|&threshold| {
            let mut included = 0usize;
            let mut correct = 0usize;
            for r in results.iter().filter(|r| r.confidence() >= threshold) {
                included += 1;
                if r.is_correct() {
                    correct += 1;
                }
            }
            let accuracy = if included == 0 {
                0.0
            } else {
                correct as f64 / included as f64
            };
            ThresholdPoint {
                threshold,
                included,
                correct,
                accuracy,
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage2_summarize.rs"]
mod tests;
