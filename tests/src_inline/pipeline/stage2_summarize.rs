use std::time::Duration;

use super::*;
use crate::model::prediction::Prediction;

fn result(id: &str, predicted: i64, truth: Label, confidence: f64) -> PredictionResult {
    PredictionResult::new(
        id,
        truth,
        Prediction::new(predicted, confidence).unwrap(),
        Duration::from_millis(10),
    )
}

fn mixed_results() -> Vec<PredictionResult> {
    vec![
        result("a", 1, Label::Malignant, 0.9),
        result("b", 0, Label::Benign, 0.8),
        result("c", 1, Label::Benign, 0.6),
        result("d", 0, Label::Malignant, 0.7),
    ]
}

fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-12, "{a} != {b}");
}

#[test]
fn test_summarize_empty_is_error() {
    let err = summarize(&[], &ThresholdSweep::default_v1()).unwrap_err();
    assert!(matches!(err, HarnessError::EmptyInput(_)));
}

#[test]
fn test_summarize_balanced_scenario() {
    let report = summarize(&mixed_results(), &ThresholdSweep::default_v1()).unwrap();
    assert_close(report.accuracy, 0.5);
    assert_eq!(
        report.confusion,
        ConfusionMatrix {
            tp: 1,
            tn: 1,
            fp: 1,
            fn_: 1
        }
    );
    assert_eq!(report.sensitivity, Some(0.5));
    assert_eq!(report.specificity, Some(0.5));
    assert_eq!(report.precision, Some(0.5));
    assert_eq!(report.predicted_benign, 2);
    assert_eq!(report.predicted_malignant, 2);

    let benign = report.class_accuracy(Label::Benign).unwrap();
    assert_eq!((benign.correct, benign.total), (1, 2));
    assert_eq!(benign.confidence.n, 2);
    assert_close(benign.confidence.mean, 0.7);
    assert_close(benign.confidence.std, 0.1);
    assert_close(benign.confidence.min, 0.6);
    assert_close(benign.confidence.max, 0.8);
    let malignant = report.class_accuracy(Label::Malignant).unwrap();
    assert_eq!((malignant.correct, malignant.total), (1, 2));
    assert_close(malignant.confidence.mean, 0.8);
    assert_close(malignant.confidence.std, 0.1);
    assert_close(malignant.confidence.min, 0.7);
    assert_close(malignant.confidence.max, 0.9);
}

#[test]
fn test_confusion_cells_sum_to_total() {
    let mut results = mixed_results();
    results.push(result("e", 1, Label::Malignant, 0.99));
    results.push(result("f", 1, Label::Malignant, 0.51));
    results.push(result("g", 0, Label::Benign, 0.55));
    for n in 1..=results.len() {
        let m = confusion_matrix(&results[..n]);
        assert_eq!(m.tp + m.tn + m.fp + m.fn_, n);
        assert_eq!(m.total(), n);
    }
}

#[test]
fn test_accuracy_extremes() {
    let all_right = vec![
        result("a", 1, Label::Malignant, 0.9),
        result("b", 0, Label::Benign, 0.6),
    ];
    let report = summarize(&all_right, &ThresholdSweep::default_v1()).unwrap();
    assert_eq!(report.accuracy, 1.0);
    assert!(report.confidence_incorrect.is_none());

    let all_wrong = vec![
        result("a", 0, Label::Malignant, 0.9),
        result("b", 1, Label::Benign, 0.6),
    ];
    let report = summarize(&all_wrong, &ThresholdSweep::default_v1()).unwrap();
    assert_eq!(report.accuracy, 0.0);
    assert!(report.confidence_correct.is_none());
    assert_eq!(report.sensitivity, Some(0.0));
    assert_eq!(report.precision, Some(0.0));
}

#[test]
fn test_all_benign_omits_malignant_metrics() {
    let results = vec![
        result("a", 0, Label::Benign, 0.9),
        result("b", 0, Label::Benign, 0.8),
        result("c", 1, Label::Benign, 0.7),
        result("d", 0, Label::Benign, 0.6),
    ];
    let report = summarize(&results, &ThresholdSweep::default_v1()).unwrap();
    assert!(report.class_accuracy(Label::Malignant).is_none());
    assert!(report.sensitivity.is_none());
    assert_eq!(report.specificity, Some(0.75));
    // One false positive, no true positives.
    assert_eq!(report.precision, Some(0.0));
    assert_eq!(report.per_class.len(), 1);
}

#[test]
fn test_precision_omitted_without_positive_predictions() {
    let results = vec![
        result("a", 0, Label::Benign, 0.9),
        result("b", 0, Label::Malignant, 0.8),
    ];
    let report = summarize(&results, &ThresholdSweep::default_v1()).unwrap();
    assert!(report.precision.is_none());
    assert_eq!(report.sensitivity, Some(0.0));
}

#[test]
fn test_confidence_stats() {
    let report = summarize(&mixed_results(), &ThresholdSweep::default_v1()).unwrap();
    assert_close(report.confidence.mean, 0.75);
    // Population std of [0.9, 0.8, 0.6, 0.7].
    assert_close(report.confidence.std, 0.0125f64.sqrt());
    assert_eq!(report.confidence.min, 0.6);
    assert_eq!(report.confidence.max, 0.9);
    assert_eq!(report.confidence.n, 4);

    let correct = report.confidence_correct.unwrap();
    assert_close(correct.mean, 0.85);
    let incorrect = report.confidence_incorrect.unwrap();
    assert_close(incorrect.mean, 0.65);
}

#[test]
fn test_threshold_curve_counts_are_non_increasing() {
    let report = summarize(&mixed_results(), &ThresholdSweep::default_v1()).unwrap();
    assert_eq!(report.threshold_curve.len(), 10);
    for pair in report.threshold_curve.windows(2) {
        assert!(pair[1].included <= pair[0].included);
    }
}

#[test]
fn test_threshold_curve_matches_manual_filter() {
    let results = mixed_results();
    let curve = threshold_curve(&results, &[0.5, 0.75]);

    let kept = results
        .iter()
        .filter(|r| r.confidence() >= 0.5)
        .collect::<Vec<_>>();
    let manual = kept.iter().filter(|r| r.is_correct()).count() as f64 / kept.len() as f64;
    assert_eq!(curve[0].included, 4);
    assert_close(curve[0].accuracy, manual);

    // Only a (correct, 0.9) and b (correct, 0.8) clear 0.75.
    assert_eq!(curve[1].included, 2);
    assert_eq!(curve[1].correct, 2);
    assert_eq!(curve[1].accuracy, 1.0);
}

#[test]
fn test_threshold_curve_empty_subset_reports_zero() {
    let results = vec![result("a", 1, Label::Malignant, 0.55)];
    let curve = threshold_curve(&results, &[0.5, 0.95]);
    assert_eq!(curve[0].accuracy, 1.0);
    assert_eq!(curve[1].included, 0);
    assert_eq!(curve[1].accuracy, 0.0);
}

#[test]
fn test_threshold_is_inclusive() {
    let results = vec![result("a", 1, Label::Malignant, 0.6)];
    let curve = threshold_curve(&results, &ThresholdSweep::default_v1().thresholds);
    let at_060 = curve.iter().find(|p| (p.threshold - 0.6).abs() < 1e-9).unwrap();
    assert_eq!(at_060.included, 1);
}

#[test]
fn test_confidence_histogram_bins() {
    let bins = confidence_histogram(&[0.0, 0.04, 0.05, 0.5, 0.999, 1.0]);
    assert_eq!(bins.len(), HISTOGRAM_BINS);
    assert_eq!(bins[0], 2);
    assert_eq!(bins[1], 1);
    assert_eq!(bins[10], 1);
    assert_eq!(bins[19], 2);
    assert_eq!(bins.iter().sum::<usize>(), 6);
}
