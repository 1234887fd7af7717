//! Integration tests for moments and cumulants of accumulated histograms.

use approx::assert_relative_eq;
use bithist::testing::{uniform_f64, uniform_u16};
use bithist::{
    BinLayout, HistError, Histogram, cumulant, cumulants, histogram1d, histogram1d_float, moment,
};
use rstest::rstest;

#[test]
fn uniform_four_bins() {
    let h = Histogram::from_counts(vec![1, 1, 1, 1], BinLayout::BitPattern);
    assert_relative_eq!(h.moment(1, false).unwrap(), 1.5);
    assert_relative_eq!(h.moment(2, true).unwrap(), 1.25);
    assert_relative_eq!(h.cumulant(1).unwrap(), 1.5);
    assert_relative_eq!(h.cumulant(2).unwrap(), 1.25);
}

#[rstest]
#[case(&[1, 1, 1, 1])]
#[case(&[10, 0, 0, 3, 0, 8, 1, 1])]
#[case(&[0, 0, 5, 5])]
fn first_two_cumulants_are_mean_and_variance(#[case] counts: &[u64]) {
    assert_relative_eq!(
        cumulant(counts, 1).unwrap(),
        moment(counts, 1, false).unwrap(),
        max_relative = 1e-12
    );
    assert_relative_eq!(
        cumulant(counts, 2).unwrap(),
        moment(counts, 2, true).unwrap(),
        max_relative = 1e-9
    );
}

#[test]
fn histogram_of_uniform_u16_has_expected_moments() {
    let samples = uniform_u16(400_000, 99);
    let hist = histogram1d(&samples, 8).unwrap();
    // Discrete uniform over 0..256: mean 127.5, variance (256^2 - 1) / 12.
    assert_relative_eq!(hist.moment(1, false).unwrap(), 127.5, max_relative = 1e-2);
    assert_relative_eq!(
        hist.cumulant(2).unwrap(),
        (256.0f64 * 256.0 - 1.0) / 12.0,
        max_relative = 2e-2
    );
    // Symmetric distribution: odd central moments vanish.
    let k3 = hist.cumulant(3).unwrap();
    let sigma3 = hist.cumulant(2).unwrap().powf(1.5);
    assert!((k3 / sigma3).abs() < 0.05, "skewness {}", k3 / sigma3);
}

#[test]
fn cumulants_agree_with_single_orders() {
    let samples = uniform_f64(50_000, 4, 0.0, 1.0);
    let squared: Vec<f64> = samples.iter().map(|v| v * v).collect();
    let hist = histogram1d_float(&squared, 10, 1.0).unwrap();
    let all = hist.cumulants(5).unwrap();
    assert_eq!(all.len(), 5);
    for (i, &k) in all.iter().enumerate() {
        assert_eq!(k, cumulant(hist.counts(), i as u32 + 1).unwrap());
    }
    assert_eq!(all, cumulants(hist.counts(), 5).unwrap());
}

#[test]
fn statistics_are_reproducible() {
    let samples = uniform_u16(100_000, 17);
    let a = histogram1d(&samples, 12).unwrap();
    let b = histogram1d(&samples, 12).unwrap();
    assert_eq!(a.cumulants(4).unwrap(), b.cumulants(4).unwrap());
    assert_eq!(
        a.moment(3, true).unwrap().to_bits(),
        b.moment(3, true).unwrap().to_bits()
    );
}

#[test]
fn empty_histogram_is_an_error() {
    let h = Histogram::zeros(8);
    assert_eq!(h.moment(1, false), Err(HistError::EmptyHistogram));
    assert_eq!(h.moment(2, true), Err(HistError::EmptyHistogram));
    assert_eq!(h.cumulant(1), Err(HistError::EmptyHistogram));
}
