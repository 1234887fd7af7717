//! Seeded sample generators for tests and benchmarks.

use rand::prelude::*;

/// Uniform samples over the full range of an integer type.
macro_rules! uniform_int {
    ($($name:ident => $ty:ty),* $(,)?) => {$(
        #[doc = concat!("`len` uniform `", stringify!($ty), "` samples.")]
        pub fn $name(len: usize, seed: u64) -> Vec<$ty> {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..len).map(|_| rng.r#gen::<$ty>()).collect()
        }
    )*};
}

uniform_int! {
    uniform_i8 => i8,
    uniform_u8 => u8,
    uniform_i16 => i16,
    uniform_u16 => u16,
}

/// `len` uniform `f32` samples in `[min, max)`.
pub fn uniform_f32(len: usize, seed: u64, min: f32, max: f32) -> Vec<f32> {
    assert!(max >= min);
    let mut rng = StdRng::seed_from_u64(seed);
    let width = max - min;
    (0..len).map(|_| min + rng.r#gen::<f32>() * width).collect()
}

/// `len` uniform `f64` samples in `[min, max)`.
pub fn uniform_f64(len: usize, seed: u64, min: f64, max: f64) -> Vec<f64> {
    assert!(max >= min);
    let mut rng = StdRng::seed_from_u64(seed);
    let width = max - min;
    (0..len).map(|_| min + rng.r#gen::<f64>() * width).collect()
}

/// Pairs where `y` stays close to `x`, so counts pile up near the diagonal.
///
/// This is the high-contention case for shared counters.
pub fn correlated_u16(len: usize, seed: u64) -> (Vec<u16>, Vec<u16>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let x: Vec<u16> = (0..len).map(|_| rng.r#gen::<u16>()).collect();
    let y = x
        .iter()
        .map(|&v| v.wrapping_add(rng.gen_range(0..512)))
        .collect();
    (x, y)
}

/// Signed variant of [`correlated_u16`].
pub fn correlated_i16(len: usize, seed: u64) -> (Vec<i16>, Vec<i16>) {
    let (x, y) = correlated_u16(len, seed);
    (
        x.into_iter().map(|v| v as i16).collect(),
        y.into_iter().map(|v| v as i16).collect(),
    )
}

/// Pairs of `f64` in `[0, max)` with `y` near `x`.
pub fn correlated_f64(len: usize, seed: u64, max: f64) -> (Vec<f64>, Vec<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let x: Vec<f64> = (0..len).map(|_| rng.r#gen::<f64>() * max).collect();
    let y = x
        .iter()
        .map(|&v| (v + (rng.r#gen::<f64>() - 0.5) * max * 0.05).clamp(0.0, max))
        .collect();
    (x, y)
}

/// Reference 1D counts by a plain loop over precomputed bin indices.
pub fn naive_counts(bins: impl IntoIterator<Item = usize>, k: usize) -> Vec<u64> {
    let mut counts = vec![0u64; k];
    for b in bins {
        counts[b] += 1;
    }
    counts
}
