use meff_analysis::{fold, folded_len};
use meff_core::{CorrelatorDataset, MeffError};
use proptest::prelude::*;

fn dataset_strategy() -> impl Strategy<Value = CorrelatorDataset> {
    (1usize..8, 1usize..6).prop_flat_map(|(half, configs)| {
        prop::collection::vec(prop::collection::vec(0.01f64..10.0, configs), half * 2)
            .prop_map(|slices| CorrelatorDataset::from_slices(slices).unwrap())
    })
}

proptest! {
    #[test]
    fn endpoints_are_never_averaged(dataset in dataset_strategy()) {
        let t = dataset.time_slices();
        let folded = fold(&dataset, t).unwrap();
        prop_assert_eq!(folded.time_slices(), folded_len(t));
        prop_assert_eq!(folded.slice(0), dataset.slice(0));
        prop_assert_eq!(folded.slice(t / 2), dataset.slice(t / 2));
        prop_assert_eq!(folded.configurations(), dataset.configurations());
    }
}

#[test]
fn interior_slices_average_per_configuration() {
    let rows = vec![
        vec![8.0, 4.0, 2.0, 1.0, 2.0, 6.0],
        vec![9.0, 5.0, 3.0, 2.0, 1.0, 3.0],
    ];
    let dataset = CorrelatorDataset::from_configurations(6, &rows).unwrap();
    let folded = fold(&dataset, 6).unwrap();
    assert_eq!(folded.time_slices(), 4);
    assert_eq!(folded.configuration(0), Some(vec![8.0, 5.0, 2.0, 1.0]));
    assert_eq!(folded.configuration(1), Some(vec![9.0, 4.0, 2.0, 2.0]));
}

#[test]
fn odd_extent_is_a_configuration_error() {
    let dataset = CorrelatorDataset::from_slices(vec![vec![1.0, 2.0]; 5]).unwrap();
    let err = fold(&dataset, 5).unwrap_err();
    assert!(matches!(err, MeffError::Configuration(_)));
    assert_eq!(err.info().code, "odd-time-extent");
}

#[test]
fn extent_must_match_dataset() {
    let dataset = CorrelatorDataset::from_slices(vec![vec![1.0, 2.0]; 6]).unwrap();
    let err = fold(&dataset, 8).unwrap_err();
    assert_eq!(err.info().code, "time-extent-mismatch");
}
