use meff_analysis::{analyze, log_ratio_series, AnalysisConfig};
use meff_core::{CorrelatorDataset, MeffError};

fn scenario() -> CorrelatorDataset {
    CorrelatorDataset::from_slices(vec![
        vec![10.0, 10.0, 10.0],
        vec![5.0, 5.0, 5.0],
        vec![10.0, 10.0, 10.0],
        vec![5.0, 5.0, 5.0],
    ])
    .unwrap()
}

#[test]
fn constant_configurations_give_zero_error() {
    let config = AnalysisConfig {
        time_slices: 4,
        fold: false,
        ..AnalysisConfig::default()
    };
    let report = analyze(&scenario(), &config).unwrap();
    assert_eq!(report.configurations, 3);
    assert_eq!(report.analysed_slices, 4);
    assert_eq!(report.effective_mass.len(), 3);
    assert_eq!(report.correlator[0].value, 10.0);

    let first = report.effective_mass[0];
    assert_eq!(first.time_slice, 0);
    assert!((first.value - 0.6931).abs() < 1e-4);
    assert_eq!(first.value, 2.0_f64.ln());
    assert_eq!(first.error, 0.0);
    assert_eq!(report.effective_mass[1].value, 0.5_f64.ln());
    assert!(report.plateau.is_none());
}

#[test]
fn per_bin_values_line_up_by_excluded_configuration() {
    let means = vec![vec![4.0, 2.0, 8.0], vec![2.0, 1.0, 2.0]];
    let series = log_ratio_series(&means).unwrap();
    assert_eq!(series.pairs(), 1);
    assert_eq!(series.bins(), 3);
    assert_eq!(series.per_bin[0][0], 2.0_f64.ln());
    assert_eq!(series.per_bin[0][1], 2.0_f64.ln());
    assert_eq!(series.per_bin[0][2], 4.0_f64.ln());
}

#[test]
fn non_positive_operand_names_slice_and_bin() {
    let means = vec![vec![1.0, 2.0], vec![3.0, 1.5], vec![0.5, -4.0]];
    let err = log_ratio_series(&means).unwrap_err();
    assert!(matches!(err, MeffError::DomainMath(_)));
    assert_eq!(err.info().code, "non-positive-log-operand");
    assert_eq!(err.context("time_slice"), Some("1"));
    assert_eq!(err.context("bin"), Some("1"));
}

#[test]
fn negative_correlator_aborts_the_run() {
    let dataset = CorrelatorDataset::from_slices(vec![
        vec![1.0, 1.2, 0.9],
        vec![-0.5, -0.4, -0.6],
    ])
    .unwrap();
    let config = AnalysisConfig {
        time_slices: 2,
        fold: false,
        ..AnalysisConfig::default()
    };
    let err = analyze(&dataset, &config).unwrap_err();
    assert!(matches!(err, MeffError::DomainMath(_)));
    assert_eq!(err.context("time_slice"), Some("0"));
    assert_eq!(err.context("bin"), Some("0"));
}

#[test]
fn misaligned_bins_are_rejected() {
    let means = vec![vec![1.0, 2.0, 3.0], vec![1.0, 2.0]];
    let err = log_ratio_series(&means).unwrap_err();
    assert_eq!(err.info().code, "misaligned-bins");
    assert_eq!(err.context("time_slice"), Some("1"));
}

#[test]
fn a_single_slice_has_no_pairs() {
    let err = log_ratio_series(&[vec![1.0, 2.0]]).unwrap_err();
    assert!(matches!(err, MeffError::Configuration(_)));
}
