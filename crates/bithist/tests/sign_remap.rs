//! Integration tests for sign remapping and cross-layout seeding.

use bithist::testing::{correlated_i16, uniform_i16};
use bithist::{
    BinLayout, Histogram, HistogramConfig, JointHistogram, JointHistogramConfig, Strategy,
    histogram1d, histogram2d, swap_halves,
};

#[test]
fn remap_rotates_signed_bytes_into_ascending_order() {
    let mut hist = histogram1d(&[-128i8, 0, 127], 8).unwrap();
    hist.remap().unwrap();
    assert_eq!(hist.layout(), BinLayout::SignedAscending);
    // Bin i now holds the value i - 128.
    assert_eq!(hist.counts()[0], 1);
    assert_eq!(hist.counts()[128], 1);
    assert_eq!(hist.counts()[255], 1);
}

#[test]
fn remapped_histogram_equals_ascending_pass() {
    let samples = uniform_i16(50_000, 21);
    let mut bit_pattern = histogram1d(&samples, 11).unwrap();
    bit_pattern.remap().unwrap();

    let ascending = HistogramConfig::builder()
        .bits(11)
        .layout(BinLayout::SignedAscending)
        .build()
        .unwrap()
        .compute(&samples)
        .unwrap();
    assert_eq!(bit_pattern, ascending);
}

#[test]
fn seed_in_other_layout_is_reconciled_first() {
    let a = uniform_i16(20_000, 1);
    let b = uniform_i16(20_000, 2);
    let ascending = HistogramConfig::builder()
        .bits(10)
        .layout(BinLayout::SignedAscending)
        .build()
        .unwrap();

    // Seed produced in the bit-pattern layout, then extended by an
    // ascending pass: the seed must be rotated before counts are added.
    let mut seed = histogram1d(&a, 10).unwrap();
    ascending.accumulate(&b, &mut seed).unwrap();
    assert_eq!(seed.layout(), BinLayout::SignedAscending);

    let mut whole: Vec<i16> = a.clone();
    whole.extend_from_slice(&b);
    assert_eq!(seed, ascending.compute(&whole).unwrap());
}

#[test]
fn unsigned_pass_reconciles_ascending_seed_back() {
    let mut seed = Histogram::from_counts(vec![0, 0, 0, 0, 1, 0, 0, 0], BinLayout::SignedAscending);
    seed.to_layout(BinLayout::BitPattern).unwrap();
    assert_eq!(seed.counts(), &[1, 0, 0, 0, 0, 0, 0, 0]);
    assert_eq!(seed.layout(), BinLayout::BitPattern);
}

#[test]
fn unsigned_seed_is_never_remapped_by_unsigned_pass() {
    let mut seed = histogram1d(&[1u16 << 15], 8).unwrap();
    let before = seed.counts().to_vec();
    let config = HistogramConfig::builder()
        .bits(8)
        .layout(BinLayout::SignedAscending)
        .build()
        .unwrap();
    config.accumulate(&[0u16], &mut seed).unwrap();
    assert_eq!(seed.layout(), BinLayout::BitPattern);
    assert_eq!(seed.counts()[128], before[128]);
    assert_eq!(seed.counts()[0], 1);
}

#[test]
fn joint_remap_equals_ascending_pass() {
    let (x, y) = correlated_i16(40_000, 8);
    let mut joint = histogram2d(&x, &y, 9, false, Strategy::Auto).unwrap();
    joint.remap().unwrap();

    let ascending = JointHistogramConfig::builder()
        .bits(9)
        .layout(BinLayout::SignedAscending)
        .build()
        .unwrap()
        .compute(&x, &y)
        .unwrap();
    assert_eq!(joint, ascending);
}

#[test]
fn joint_seed_in_other_layout_is_reconciled_first() {
    let (x, y) = correlated_i16(30_000, 4);
    let config = JointHistogramConfig::builder()
        .bits(8)
        .layout(BinLayout::SignedAscending)
        .strategy(Strategy::ParallelReduceLazy)
        .build()
        .unwrap();

    let mut seed = histogram2d(&x[..10_000], &y[..10_000], 8, false, Strategy::Serial).unwrap();
    config.accumulate(&x[10_000..], &y[10_000..], &mut seed).unwrap();
    assert_eq!(seed, config.compute(&x, &y).unwrap());
}

#[test]
fn joint_remap_twice_is_identity() {
    let (x, y) = correlated_i16(5_000, 3);
    let original = histogram2d(&x, &y, 8, false, Strategy::Serial).unwrap();
    let mut hist = original.clone();
    hist.remap().unwrap();
    assert_ne!(hist, original);
    hist.remap().unwrap();
    assert_eq!(hist, original);

    let mut empty = JointHistogram::zeros(1);
    empty.remap().unwrap();
    assert_eq!(empty.total(), 0);
}

#[test]
fn raw_swap_on_wrong_length_fails() {
    let mut counts = vec![0u64; 100];
    assert!(swap_halves(&mut counts, 7).is_err());
}
