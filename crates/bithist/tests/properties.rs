//! Property-based tests for accumulation and remapping.

use proptest::collection::vec as prop_vec;
use proptest::prelude::*;

use bithist::{
    BinLayout, Histogram, HistogramConfig, JointHistogram, JointHistogramConfig,
    Strategy as Kernel, cumulant, histogram1d, histogram1d_float, histogram2d, moment,
};

// =============================================================================
// Generators
// =============================================================================

fn arb_kernel() -> impl Strategy<Value = Kernel> {
    prop::sample::select(Kernel::ALL.to_vec())
}

fn arb_layout() -> impl Strategy<Value = BinLayout> {
    prop_oneof![Just(BinLayout::BitPattern), Just(BinLayout::SignedAscending)]
}

fn arb_pairs_i16(max_len: usize) -> impl Strategy<Value = (Vec<i16>, Vec<i16>)> {
    prop_vec(any::<(i16, i16)>(), 0..max_len)
        .prop_map(|pairs| pairs.into_iter().unzip::<i16, i16, Vec<i16>, Vec<i16>>())
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn conservation_1d(samples in prop_vec(any::<u16>(), 0..5_000), bits in 8u32..=16) {
        let hist = histogram1d(&samples, bits).unwrap();
        prop_assert_eq!(hist.total(), samples.len() as u64);
    }

    #[test]
    fn conservation_1d_float(
        samples in prop_vec(any::<f32>(), 0..2_000),
        bits in 1u32..=16,
        max in 0.001f64..1e6,
    ) {
        let hist = histogram1d_float(&samples, bits, max).unwrap();
        prop_assert_eq!(hist.total(), samples.len() as u64);
    }

    #[test]
    fn strategy_equivalence((x, y) in arb_pairs_i16(3_000), kernel in arb_kernel(), bits in 8u32..=10) {
        let reference = histogram2d(&x, &y, bits, false, Kernel::Serial).unwrap();
        let hist = histogram2d(&x, &y, bits, false, kernel).unwrap();
        prop_assert_eq!(hist.total(), x.len() as u64);
        prop_assert_eq!(hist, reference);
    }

    #[test]
    fn remap_is_involution_1d(seed in any::<u64>(), bits in 1u32..=12) {
        let original: Vec<u64> = (0..1usize << bits)
            .map(|i| seed.wrapping_mul(i as u64 + 1) >> 40)
            .collect();
        let mut hist = Histogram::from_counts(original.clone(), BinLayout::BitPattern);
        hist.remap().unwrap();
        hist.remap().unwrap();
        prop_assert_eq!(hist.counts(), original.as_slice());
        prop_assert_eq!(hist.layout(), BinLayout::BitPattern);
    }

    #[test]
    fn remap_is_involution_2d(seed in any::<u64>(), bits in 1u32..=6) {
        let side = 1usize << bits;
        let original: Vec<u64> = (0..side * side)
            .map(|i| seed.wrapping_mul(i as u64 + 1) >> 40)
            .collect();
        let mut hist =
            JointHistogram::from_counts(original.clone(), side, BinLayout::SignedAscending).unwrap();
        hist.remap().unwrap();
        hist.remap().unwrap();
        prop_assert_eq!(hist.counts(), original.as_slice());
    }

    #[test]
    fn incremental_equals_concatenated(
        a in prop_vec(any::<i16>(), 0..3_000),
        b in prop_vec(any::<i16>(), 0..3_000),
        layout in arb_layout(),
        bits in 8u32..=14,
    ) {
        let config = HistogramConfig::builder().bits(bits).layout(layout).build().unwrap();
        let mut seed = config.compute(&a).unwrap();
        config.accumulate(&b, &mut seed).unwrap();

        let whole: Vec<i16> = a.iter().chain(&b).copied().collect();
        prop_assert_eq!(seed, config.compute(&whole).unwrap());
    }

    #[test]
    fn incremental_joint_across_layouts(
        (x, y) in arb_pairs_i16(2_000),
        split in 0usize..2_000,
        first in arb_layout(),
        second in arb_layout(),
        kernel in arb_kernel(),
    ) {
        let split = split.min(x.len());
        let build = |layout: BinLayout| JointHistogramConfig::builder()
            .bits(8)
            .layout(layout)
            .strategy(kernel)
            .build()
            .unwrap();

        let mut seed = build(first).compute(&x[..split], &y[..split]).unwrap();
        build(second).accumulate(&x[split..], &y[split..], &mut seed).unwrap();
        prop_assert_eq!(seed, build(second).compute(&x, &y).unwrap());
    }

    #[test]
    fn cumulant_consistency(counts in prop_vec(0u64..1_000, 2..64)) {
        prop_assume!(counts.iter().any(|&c| c > 0));
        let m1 = moment(&counts, 1, false).unwrap();
        let k1 = cumulant(&counts, 1).unwrap();
        prop_assert!((m1 - k1).abs() <= 1e-12 * m1.abs().max(1.0));

        let mu2 = moment(&counts, 2, true).unwrap();
        let k2 = cumulant(&counts, 2).unwrap();
        prop_assert!((mu2 - k2).abs() <= 1e-9 * mu2.abs().max(1.0), "mu2={} k2={}", mu2, k2);
    }
}
