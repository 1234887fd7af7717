//! 1D and 2D accumulation.
//!
//! The configs in [`config`] are the full interface. The free functions here
//! cover the common calls with default settings:
//!
//! - [`histogram1d`] / [`histogram1d_into`]: integer samples
//! - [`histogram1d_float`] / [`histogram1d_float_into`]: floating samples
//! - [`histogram2d`] / [`histogram2d_into`]: integer sample pairs
//! - [`histogram2d_float`] / [`histogram2d_float_into`]: floating sample pairs
//!
//! The `_into` variants add to a caller-owned seed instead of allocating.

pub mod config;
mod one_d;
mod scratch;
pub mod strategy;
mod two_d;

pub use config::{HistogramConfig, JointHistogramConfig};
pub use scratch::MIN_CHUNK;
pub use strategy::{MIN_PARALLEL_SAMPLES, Strategy};

use crate::error::Result;
use crate::histogram::{Histogram, JointHistogram};
use crate::sample::{FloatSample, IntSample};

/// Histogram integer samples at depth `bits` into `2^bits` bins.
pub fn histogram1d<T: IntSample>(samples: &[T], bits: u32) -> Result<Histogram> {
    HistogramConfig::builder().bits(bits).build()?.compute(samples)
}

/// Add integer samples to `seed`.
pub fn histogram1d_into<T: IntSample>(samples: &[T], bits: u32, seed: &mut Histogram) -> Result<()> {
    HistogramConfig::builder()
        .bits(bits)
        .build()?
        .accumulate(samples, seed)
}

/// Histogram floating samples over `[0, max)` into `2^bits` bins.
pub fn histogram1d_float<T: FloatSample>(samples: &[T], bits: u32, max: f64) -> Result<Histogram> {
    HistogramConfig::builder()
        .bits(bits)
        .max(max)
        .build()?
        .compute(samples)
}

/// Add floating samples over `[0, max)` to `seed`.
pub fn histogram1d_float_into<T: FloatSample>(
    samples: &[T],
    bits: u32,
    max: f64,
    seed: &mut Histogram,
) -> Result<()> {
    HistogramConfig::builder()
        .bits(bits)
        .max(max)
        .build()?
        .accumulate(samples, seed)
}

/// Joint histogram of integer sample pairs.
///
/// `force_bits` lifts the [`MAX_JOINT_BITS`](crate::MAX_JOINT_BITS) bound.
pub fn histogram2d<T: IntSample>(
    x: &[T],
    y: &[T],
    bits: u32,
    force_bits: bool,
    strategy: Strategy,
) -> Result<JointHistogram> {
    JointHistogramConfig::builder()
        .bits(bits)
        .force_bits(force_bits)
        .strategy(strategy)
        .build()?
        .compute(x, y)
}

/// Add integer sample pairs to `seed`.
pub fn histogram2d_into<T: IntSample>(
    x: &[T],
    y: &[T],
    bits: u32,
    force_bits: bool,
    strategy: Strategy,
    seed: &mut JointHistogram,
) -> Result<()> {
    JointHistogramConfig::builder()
        .bits(bits)
        .force_bits(force_bits)
        .strategy(strategy)
        .build()?
        .accumulate(x, y, seed)
}

/// Joint histogram of floating sample pairs over `[0, max)` on both axes.
pub fn histogram2d_float<T: FloatSample>(
    x: &[T],
    y: &[T],
    bits: u32,
    max: f64,
    strategy: Strategy,
) -> Result<JointHistogram> {
    JointHistogramConfig::builder()
        .bits(bits)
        .max(max)
        .strategy(strategy)
        .build()?
        .compute(x, y)
}

/// Add floating sample pairs over `[0, max)` to `seed`.
pub fn histogram2d_float_into<T: FloatSample>(
    x: &[T],
    y: &[T],
    bits: u32,
    max: f64,
    strategy: Strategy,
    seed: &mut JointHistogram,
) -> Result<()> {
    JointHistogramConfig::builder()
        .bits(bits)
        .max(max)
        .strategy(strategy)
        .build()?
        .accumulate(x, y, seed)
}
