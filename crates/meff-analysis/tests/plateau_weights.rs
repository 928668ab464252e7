use meff_analysis::{fit_plateau, jackknife_error, plateau_weights, PlateauRange};
use meff_core::MeffError;

fn series() -> Vec<Vec<f64>> {
    vec![
        vec![0.31, 0.29, 0.30, 0.32],
        vec![0.127, 0.121, 0.133, 0.125],
        vec![0.1243, 0.1251, 0.1262, 0.1238],
        vec![0.1229, 0.1277, 0.1248, 0.1255],
        vec![0.05, 0.07, 0.04, 0.06],
    ]
}

#[test]
fn uniform_errors_reduce_to_the_plain_mean() {
    let per_bin = series();
    let errors = vec![0.004; per_bin.len()];
    let fit = fit_plateau(1, 3, &errors, &per_bin).unwrap();
    for bin in 0..4 {
        let rows = &per_bin[1..=3];
        let plain = rows.iter().map(|row| row[bin]).sum::<f64>() / rows.len() as f64;
        assert_eq!(fit.bin_values[bin], plain);
    }
    assert_eq!(fit.weight_fractions.len(), 3);
    for fraction in &fit.weight_fractions {
        assert!((fraction - 1.0 / 3.0).abs() < 1e-15);
    }
}

#[test]
fn smaller_errors_carry_more_weight() {
    let per_bin = vec![vec![1.0, 1.0], vec![2.0, 2.0]];
    let fit = fit_plateau(0, 1, &[1.0, 2.0], &per_bin).unwrap();
    assert!((fit.value - 1.2).abs() < 1e-12);
    assert!((fit.weight_fractions[0] - 0.8).abs() < 1e-12);
    assert_eq!(fit.error, 0.0);
}

#[test]
fn error_comes_from_the_fitted_bins() {
    let per_bin = series();
    let errors = [0.01, 0.004, 0.002, 0.003, 0.02];
    let fit = fit_plateau(1, 3, &errors, &per_bin).unwrap();
    let mean = fit.bin_values.iter().sum::<f64>() / fit.bin_values.len() as f64;
    assert!((fit.value - mean).abs() < 1e-15);
    let expected = jackknife_error(&fit.bin_values, fit.value).unwrap();
    assert_eq!(fit.error, expected);
    assert!(fit.error > 0.0);
    assert!(fit.value > 0.12 && fit.value < 0.13);
}

#[test]
fn zero_error_names_the_time_slice() {
    let per_bin = series();
    let errors = [0.01, 0.004, 0.0, 0.003, 0.02];
    let err = fit_plateau(1, 3, &errors, &per_bin).unwrap_err();
    assert!(matches!(err, MeffError::DomainMath(_)));
    assert_eq!(err.info().code, "zero-error-weight");
    assert_eq!(err.context("time_slice"), Some("2"));
}

#[test]
fn zero_error_outside_the_range_is_ignored() {
    let per_bin = series();
    let errors = [0.0, 0.004, 0.002, 0.003, 0.0];
    assert!(fit_plateau(1, 3, &errors, &per_bin).is_ok());
}

#[test]
fn invalid_ranges_are_configuration_errors() {
    let per_bin = series();
    let errors = vec![0.01; per_bin.len()];
    let inverted = fit_plateau(3, 1, &errors, &per_bin).unwrap_err();
    assert_eq!(inverted.info().code, "inverted-plateau");
    let outside = fit_plateau(2, 5, &errors, &per_bin).unwrap_err();
    assert_eq!(outside.info().code, "plateau-out-of-range");
    let misaligned = fit_plateau(0, 1, &errors[..3], &per_bin).unwrap_err();
    assert_eq!(misaligned.info().code, "misaligned-errors");
}

#[test]
fn weights_are_scaled_to_the_smallest_error() {
    let weights = plateau_weights(PlateauRange::new(0, 2), &[0.2, 0.1, 0.4]).unwrap();
    assert_eq!(weights[1], 1.0);
    assert!((weights[0] - 0.25).abs() < 1e-15);
    assert!((weights[2] - 0.0625).abs() < 1e-15);
    assert_eq!(PlateauRange::new(8, 13).len(), 6);
}
