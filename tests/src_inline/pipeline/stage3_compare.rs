use std::time::Duration;

use super::*;
use crate::config::EndpointConfig;
use crate::model::label::Label;
use crate::model::prediction::{Prediction, PredictionResult};
use crate::model::thresholds::ThresholdSweep;
use crate::pipeline::stage1_evaluate::Evaluation;
use crate::pipeline::stage2_summarize::summarize;

fn completed(name: &str, outcomes: &[(i64, Label, f64)], elapsed_ms: u64) -> EndpointRun {
    let results = outcomes
        .iter()
        .enumerate()
        .map(|(i, &(pred, truth, conf))| {
            PredictionResult::new(
                format!("s{i}"),
                truth,
                Prediction::new(pred, conf).unwrap(),
                Duration::ZERO,
            )
        })
        .collect::<Vec<_>>();
    let report = summarize(&results, &ThresholdSweep::default_v1()).unwrap();
    let evaluation = Evaluation {
        attempted: results.len(),
        results,
        failures: Vec::new(),
        elapsed: Duration::from_millis(elapsed_ms),
        stopped_early: false,
    };
    EndpointRun {
        endpoint: EndpointConfig {
            name: name.to_string(),
            url: format!("http://{name}"),
        },
        outcome: RunOutcome::Completed { evaluation, report },
    }
}

fn unavailable(name: &str) -> EndpointRun {
    EndpointRun {
        endpoint: EndpointConfig {
            name: name.to_string(),
            url: format!("http://{name}"),
        },
        outcome: RunOutcome::Unavailable {
            reason: "health check failed".to_string(),
            evaluation: None,
        },
    }
}

#[test]
fn test_compare_picks_best_and_fastest() {
    let runs = vec![
        completed(
            "external",
            &[(1, Label::Malignant, 0.6), (1, Label::Benign, 0.6)],
            4000,
        ),
        completed(
            "local",
            &[(1, Label::Malignant, 0.9), (0, Label::Benign, 0.8)],
            200,
        ),
        unavailable("offline"),
    ];
    let cmp = compare(&runs);

    let best = cmp.best_accuracy.unwrap();
    assert_eq!(best.endpoint, "local");
    assert_eq!(best.value, 1.0);
    assert_eq!(cmp.highest_confidence.unwrap().endpoint, "local");
    let fastest = cmp.fastest.unwrap();
    assert_eq!(fastest.endpoint, "local");
    assert!((fastest.value - 0.1).abs() < 1e-9);
    assert_eq!(cmp.unavailable, vec!["offline".to_string()]);
}

#[test]
fn test_compare_ties_keep_first() {
    let runs = vec![
        completed("first", &[(1, Label::Malignant, 0.7)], 100),
        completed("second", &[(1, Label::Malignant, 0.7)], 100),
    ];
    let cmp = compare(&runs);
    assert_eq!(cmp.best_accuracy.unwrap().endpoint, "first");
    assert_eq!(cmp.highest_confidence.unwrap().endpoint, "first");
    assert_eq!(cmp.fastest.unwrap().endpoint, "first");
}

#[test]
fn test_compare_with_no_reports() {
    let cmp = compare(&[unavailable("a"), unavailable("b")]);
    assert!(cmp.best_accuracy.is_none());
    assert!(cmp.fastest.is_none());
    assert_eq!(cmp.unavailable.len(), 2);
}
