use std::fs;

use meff_analysis::{
    analyze, analyze_with_source, compare_folding, compare_reference, read_series_csv,
    run_pipeline, stable_hash_string, write_json, write_series_csv, AnalysisConfig, SeriesPoint,
};
use meff_core::{synthetic_ensemble, CorrelatorDataset, MeffError, SyntheticSpec};
use tempfile::tempdir;

fn ensemble(time_slices: usize, configurations: usize) -> CorrelatorDataset {
    let spec = SyntheticSpec {
        time_slices,
        configurations,
        mass: 0.2,
        amplitude: 1.0,
        noise: 0.02,
    };
    synthetic_ensemble(&spec, 2024).unwrap()
}

fn folded_config(time_slices: usize) -> AnalysisConfig {
    AnalysisConfig {
        time_slices,
        ..AnalysisConfig::default()
    }
}

#[test]
fn plateau_recovers_the_synthetic_mass() {
    let dataset = ensemble(32, 40);
    let config = folded_config(32).with_plateau(2, 6);
    let report = analyze(&dataset, &config).unwrap();

    assert_eq!(report.analysed_slices, 17);
    assert_eq!(report.correlator.len(), 17);
    assert_eq!(report.effective_mass.len(), 16);
    assert_eq!(report.provenance.accepted, 40);
    assert_eq!(report.provenance.source, "memory");

    let plateau = report.plateau.as_ref().unwrap();
    assert!((plateau.value - 0.2).abs() < 0.02, "plateau {}", plateau.value);
    assert!(plateau.error > 0.0 && plateau.error < 0.01);
    assert_eq!(plateau.weight_fractions.len(), 5);
    let total: f64 = plateau.weight_fractions.iter().sum();
    assert!((total - 1.0).abs() < 1e-12);
    for point in &report.effective_mass {
        assert!(point.error >= 0.0);
    }
}

#[test]
fn pipeline_keeps_intermediate_stages_aligned() {
    let dataset = ensemble(16, 12);
    let output = run_pipeline(&dataset, &folded_config(16).with_plateau(1, 4)).unwrap();
    assert_eq!(output.bin_means.len(), 9);
    assert!(output.bin_means.iter().all(|bins| bins.len() == 12));
    assert_eq!(output.series.pairs(), 8);
    assert_eq!(output.series.bins(), 12);
    assert_eq!(output.errors.len(), 8);
    let fit = output.plateau.unwrap();
    assert_eq!(fit.bin_values.len(), 12);
}

#[test]
fn reports_are_reproducible() {
    let dataset = ensemble(16, 10);
    let config = folded_config(16).with_plateau(1, 5);
    let first = analyze_with_source(&dataset, &config, "ensemble.zip", 2).unwrap();
    let second = analyze_with_source(&dataset, &config, "ensemble.zip", 2).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.report_hash.len(), 64);
    assert_eq!(first.provenance.rejected, 2);
    assert!(first.provenance.tool_versions.contains_key("meff-analysis"));

    let mut unhashed = first.clone();
    unhashed.report_hash.clear();
    assert_eq!(stable_hash_string(&unhashed).unwrap(), first.report_hash);

    let other = analyze(&ensemble(16, 11), &config).unwrap();
    assert_ne!(other.provenance.dataset_hash, first.provenance.dataset_hash);
}

#[test]
fn configuration_is_checked_before_the_data() {
    let single = CorrelatorDataset::from_configurations(4, &[vec![4.0, 2.0, 1.0, 2.0]]).unwrap();

    let bad_range = folded_config(4).with_plateau(0, 7);
    let err = analyze(&single, &bad_range).unwrap_err();
    assert!(matches!(err, MeffError::Configuration(_)));
    assert_eq!(err.info().code, "plateau-out-of-range");

    let odd = folded_config(5);
    let err = analyze(&single, &odd).unwrap_err();
    assert_eq!(err.info().code, "odd-time-extent");

    let partial = AnalysisConfig {
        plateau_low: Some(0),
        ..folded_config(4)
    };
    let err = analyze(&single, &partial).unwrap_err();
    assert_eq!(err.info().code, "partial-plateau");

    let err = analyze(&single, &folded_config(4).with_plateau(0, 1)).unwrap_err();
    assert!(matches!(err, MeffError::InsufficientData(_)));
    assert_eq!(err.context("time_slice"), Some("0"));
}

#[test]
fn unfolded_runs_require_a_matching_extent() {
    let dataset = ensemble(8, 6);
    let config = AnalysisConfig {
        time_slices: 10,
        fold: false,
        ..AnalysisConfig::default()
    };
    let err = analyze(&dataset, &config).unwrap_err();
    assert_eq!(err.info().code, "time-extent-mismatch");
}

#[test]
fn folding_comparison_shares_the_leading_pairs() {
    let dataset = ensemble(16, 20);
    let config = folded_config(16).with_plateau(1, 4);
    let comparison = compare_folding(&dataset, &config, "memory", 0).unwrap();
    assert_eq!(comparison.unfolded.analysed_slices, 16);
    assert_eq!(comparison.folded.analysed_slices, 9);
    assert_eq!(comparison.effective_mass.len(), 8);
    assert!(comparison.folded.plateau.is_some());
    assert!(comparison.unfolded.plateau.is_some());
    for (t, delta) in comparison.effective_mass.iter().enumerate() {
        assert_eq!(delta.time_slice, t);
        assert_eq!(delta.difference, delta.candidate - delta.baseline);
    }

    let too_wide = folded_config(16).with_plateau(2, 10);
    let err = compare_folding(&dataset, &too_wide, "memory", 0).unwrap_err();
    assert_eq!(err.info().code, "plateau-out-of-range");
}

#[test]
fn reference_comparison_reports_gaps_and_pulls() {
    let computed = vec![
        SeriesPoint { time_slice: 0, value: 0.50, error: 0.03 },
        SeriesPoint { time_slice: 1, value: 0.30, error: 0.0 },
        SeriesPoint { time_slice: 2, value: 0.25, error: 0.01 },
    ];
    let reference = vec![
        SeriesPoint { time_slice: 0, value: 0.46, error: 0.04 },
        SeriesPoint { time_slice: 1, value: 0.30, error: 0.0 },
        SeriesPoint { time_slice: 5, value: 0.20, error: 0.01 },
    ];
    let comparison = compare_reference(&computed, &reference);
    assert_eq!(comparison.deltas.len(), 2);
    assert_eq!(comparison.missing_in_series, vec![5]);
    assert_eq!(comparison.missing_in_reference, vec![2]);

    let first = comparison.deltas[0];
    assert_eq!(first.baseline, 0.46);
    assert_eq!(first.candidate, 0.50);
    assert!((first.pull.unwrap() - 0.8).abs() < 1e-9);
    assert!(comparison.deltas[1].pull.is_none());
    assert!((comparison.max_abs_pull.unwrap() - 0.8).abs() < 1e-9);
}

#[test]
fn series_survive_a_csv_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("effmass.csv");
    let report = analyze(&ensemble(12, 8), &folded_config(12)).unwrap();
    write_series_csv(&path, &report.effective_mass).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("time_slice,value,error"));

    let restored = read_series_csv(&path).unwrap();
    assert_eq!(restored.len(), report.effective_mass.len());
    for (read, written) in restored.iter().zip(report.effective_mass.iter()) {
        assert_eq!(read.time_slice, written.time_slice);
        assert!((read.value - written.value).abs() <= 1e-15 * written.value.abs());
        assert!((read.error - written.error).abs() <= 1e-15 * written.error.abs());
    }
}

#[test]
fn negative_errors_in_reference_files_are_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("reference.csv");
    fs::write(&path, "time_slice,value,error\n0,0.5,0.01\n1,0.4,-0.1\n").unwrap();
    let err = read_series_csv(&path).unwrap_err();
    assert!(matches!(err, MeffError::Serde(_)));
    assert_eq!(err.info().code, "csv-read");
    assert_eq!(err.context("row"), Some("2"));
}

#[test]
fn yaml_configuration_fills_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("analysis.yaml");
    fs::write(&path, "time_slices: 24\nplateau_low: 2\nplateau_high: 5\n").unwrap();
    let config = AnalysisConfig::load(&path).unwrap();
    assert_eq!(config.time_slices, 24);
    assert!(config.fold);
    assert_eq!(config.analysed_slices(), 13);
    assert_eq!(config.plateau().unwrap().map(|range| range.len()), Some(4));
    config.validate().unwrap();

    let missing = AnalysisConfig::load(&dir.path().join("absent.yaml")).unwrap_err();
    assert_eq!(missing.info().code, "config-read");
}

#[test]
fn json_reports_are_canonical() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("report.json");
    let report = analyze(&ensemble(8, 5), &folded_config(8)).unwrap();
    write_json(&path, &report).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    let analysed = text.find("\"analysed_slices\"").unwrap();
    let schema = text.find("\"schema_version\"").unwrap();
    assert!(analysed < schema);
    assert!(!text.contains("\"plateau\""));
}
