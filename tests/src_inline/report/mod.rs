use super::*;

#[test]
fn test_mean_and_population_std() {
    let v = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
    assert_eq!(mean(&v), 5.0);
    assert_eq!(population_std(&v), 2.0);
    assert_eq!(mean(&[]), 0.0);
    assert_eq!(population_std(&[]), 0.0);
    assert_eq!(population_std(&[0.7]), 0.0);
}

#[test]
fn test_formatting() {
    assert_eq!(format_f64_3(0.12345), "0.123");
    assert_eq!(format_f64_6(0.5), "0.500000");
    assert_eq!(format_pct(0.5), "50.0%");
    assert_eq!(format_pct(1.0), "100.0%");
}
