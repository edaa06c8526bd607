use std::cell::Cell;

use super::*;
use crate::model::label::Label;

fn sample(id: &str, label: Label, byte: u8) -> Sample {
    Sample::encoded(id, label, format!("{id}.jpg"), vec![byte])
}

/// First byte is the class, second-to-none means "fail".
fn byte_predictor(image: &[u8]) -> Result<(i64, f64), EndpointError> {
    match image.first() {
        Some(0) => Ok((0, 0.8)),
        Some(1) => Ok((1, 0.9)),
        _ => Err(EndpointError::Status {
            status: 500,
            body: "boom".to_string(),
        }),
    }
}

#[test]
fn test_evaluate_rejects_empty_samples() {
    let err = evaluate(&[], &byte_predictor).unwrap_err();
    assert!(matches!(err, HarnessError::EmptyInput(_)));
}

#[test]
fn test_evaluate_preserves_order_and_excludes_failures() {
    let samples = vec![
        sample("s1", Label::Benign, 0),
        sample("s2", Label::Malignant, 9),
        sample("s3", Label::Malignant, 1),
        sample("s4", Label::Malignant, 0),
    ];
    let eval = evaluate(&samples, &byte_predictor).unwrap();

    let ids = eval.results.iter().map(|r| r.sample_id()).collect::<Vec<_>>();
    assert_eq!(ids, vec!["s1", "s3", "s4"]);
    assert_eq!(eval.attempted, 4);
    assert_eq!(eval.excluded(), 1);
    assert_eq!(eval.failures[0].sample_id, "s2");
    assert!(matches!(
        eval.failures[0].error,
        SampleError::Endpoint(EndpointError::Status { status: 500, .. })
    ));
    assert!(!eval.stopped_early);

    assert!(eval.results[0].is_correct());
    assert!(eval.results[1].is_correct());
    assert!(!eval.results[2].is_correct());
}

#[test]
fn test_results_reference_evaluated_samples() {
    let samples = vec![
        sample("x", Label::Benign, 0),
        sample("y", Label::Malignant, 1),
        sample("z", Label::Benign, 7),
    ];
    let eval = evaluate(&samples, &byte_predictor).unwrap();
    for r in &eval.results {
        let source = samples.iter().find(|s| s.id() == r.sample_id()).unwrap();
        assert_eq!(source.label(), r.truth());
    }
}

#[test]
fn test_unreadable_file_is_excluded() {
    let missing = std::env::temp_dir().join(format!(
        "kira_lesioneval_missing_{}.jpg",
        std::process::id()
    ));
    let samples = vec![
        Sample::from_file("gone", Label::Benign, &missing),
        sample("ok", Label::Benign, 0),
    ];
    let eval = evaluate(&samples, &byte_predictor).unwrap();
    assert_eq!(eval.results.len(), 1);
    assert_eq!(eval.failures.len(), 1);
    match &eval.failures[0].error {
        SampleError::Read { path, .. } => assert_eq!(path, &missing),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_invalid_prediction_is_excluded() {
    let bad = |_: &[u8]| -> Result<(i64, f64), EndpointError> { Ok((3, 0.5)) };
    let samples = vec![sample("a", Label::Benign, 0)];
    let eval = evaluate(&samples, &bad).unwrap();
    assert!(eval.results.is_empty());
    assert!(matches!(
        eval.failures[0].error,
        SampleError::Endpoint(EndpointError::InvalidField { .. })
    ));
}

#[test]
fn test_progress_hook_can_stop_between_samples() {
    let samples = vec![
        sample("a", Label::Benign, 0),
        sample("b", Label::Benign, 0),
        sample("c", Label::Benign, 0),
    ];
    let calls = Cell::new(0usize);
    let eval = evaluate_with(&samples, &byte_predictor, |progress| {
        calls.set(calls.get() + 1);
        assert_eq!(progress.total, 3);
        if progress.index == 1 {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    })
    .unwrap();
    assert_eq!(calls.get(), 2);
    assert_eq!(eval.attempted, 2);
    assert_eq!(eval.results.len(), 2);
    assert!(eval.stopped_early);
}

#[test]
fn test_progress_reports_outcomes() {
    let samples = vec![sample("a", Label::Benign, 0), sample("b", Label::Benign, 5)];
    let mut seen = Vec::new();
    evaluate_with(&samples, &byte_predictor, |progress| {
        let tag = match progress.outcome {
            SampleOutcome::Predicted(r) => format!("ok:{}", r.sample_id()),
            SampleOutcome::Excluded(f) => format!("skip:{}", f.sample_id),
        };
        seen.push(tag);
        ControlFlow::Continue(())
    })
    .unwrap();
    assert_eq!(seen, vec!["ok:a".to_string(), "skip:b".to_string()]);
}

#[test]
fn test_mean_latency() {
    let mut eval = Evaluation::default();
    assert!(eval.mean_latency().is_none());
    eval.elapsed = Duration::from_secs(2);
    let samples = vec![sample("a", Label::Benign, 0), sample("b", Label::Benign, 0)];
    eval.results = evaluate(&samples, &byte_predictor).unwrap().results;
    assert_eq!(eval.mean_latency(), Some(Duration::from_secs(1)));
}
