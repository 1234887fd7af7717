//! Accumulation configuration.
//!
//! [`HistogramConfig`] and [`JointHistogramConfig`] describe one pass over
//! sample data. Both are built with `bon` and validated at build time:
//!
//! ```
//! use bithist::{HistogramConfig, JointHistogramConfig, Strategy};
//!
//! let config = HistogramConfig::builder().bits(8).build().unwrap();
//! let hist = config.compute(&[0u8, 255, 0, 128]).unwrap();
//! assert_eq!(hist.counts()[0], 2);
//!
//! let joint = JointHistogramConfig::builder()
//!     .bits(10)
//!     .strategy(Strategy::ParallelReduceLazy)
//!     .build()
//!     .unwrap();
//! let x = [0u16, 1000, 65535];
//! let h2 = joint.compute(&x, &x).unwrap();
//! assert_eq!(h2.total(), 3);
//! ```
//!
//! Every precondition is checked before the seed is touched, in this order:
//! `TypeMismatch`, `LengthMismatch`, `InvalidBitDepth`, `BitDepthOutOfRange`,
//! `SizeMismatch`. A failed call leaves the seed exactly as it was.

use bon::Builder;

use super::one_d;
use super::strategy::Strategy;
use super::two_d::JointInput;
use crate::dispatch::{self, Family};
use crate::error::{HistError, Result};
use crate::histogram::{BinLayout, Histogram, JointHistogram};
use crate::parallel::run_with_threads;
use crate::quantize::{Binning, FloatRange};
use crate::remap::reconcile_with;
use crate::sample::{Sample, SampleKind, SampleSlice};

fn validate_max(max: f64) -> Result<()> {
    if !(max.is_finite() && max > 0.0) {
        return Err(HistError::InvalidRange(max));
    }
    Ok(())
}

/// Output layout of a pass over `kind` samples.
fn pass_layout(kind: SampleKind, requested: BinLayout) -> BinLayout {
    if kind.is_signed() {
        requested
    } else {
        BinLayout::BitPattern
    }
}

fn binning(kind: SampleKind, bits: u32, layout: BinLayout, range: FloatRange, max: f64) -> Binning {
    Binning {
        bits,
        layout: pass_layout(kind, layout),
        range,
        max,
    }
}

// =============================================================================
// HistogramConfig
// =============================================================================

/// One-dimensional accumulation pass.
#[derive(Debug, Clone, PartialEq, Builder)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[builder(
    derive(Clone, Debug),
    finish_fn(vis = "", name = __build_internal)
)]
pub struct HistogramConfig {
    /// Bit depth `n`; the histogram has `2^n` bins.
    pub bits: u32,

    /// Bin order for signed integer samples. Ignored for unsigned and
    /// floating samples, which always use the bit-pattern layout.
    #[builder(default)]
    pub layout: BinLayout,

    /// Upper end of the floating value range. Default: 1.0.
    #[builder(default = 1.0)]
    pub max: f64,

    /// Floating value range mode. Default: `[0, max)`.
    #[builder(default)]
    pub range: FloatRange,

    /// Worker threads: 0 = current pool, 1 = sequential, n = local pool of n.
    #[builder(default)]
    pub n_threads: usize,
}

impl<S: histogram_config_builder::IsComplete> HistogramConfigBuilder<S> {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// [`HistError::InvalidRange`] if `max` is not finite and positive.
    pub fn build(self) -> Result<HistogramConfig> {
        let config = self.__build_internal();
        validate_max(config.max)?;
        Ok(config)
    }
}

impl HistogramConfig {
    fn binning_for(&self, kind: SampleKind) -> Result<Binning> {
        dispatch::resolve(kind, self.bits)?;
        if kind.is_float() {
            validate_max(self.max)?;
        }
        Ok(binning(kind, self.bits, self.layout, self.range, self.max))
    }

    /// Histogram `samples` into a fresh buffer.
    pub fn compute<T: Sample>(&self, samples: &[T]) -> Result<Histogram> {
        let binning = self.binning_for(T::KIND)?;
        let mut hist = Histogram::zeros(self.bits);
        hist.set_layout(binning.layout);
        self.run(samples, &mut hist, binning)?;
        Ok(hist)
    }

    /// Add `samples` to an existing histogram.
    ///
    /// The seed is first brought into the layout of this pass.
    pub fn accumulate<T: Sample>(&self, samples: &[T], seed: &mut Histogram) -> Result<()> {
        let binning = self.binning_for(T::KIND)?;
        let expected = 1usize << self.bits;
        if seed.len() != expected {
            return Err(HistError::SizeMismatch {
                expected,
                actual: seed.len(),
            });
        }
        self.run(samples, seed, binning)
    }

    fn run<T: Sample>(&self, samples: &[T], hist: &mut Histogram, binning: Binning) -> Result<()> {
        let quantizer = T::quantizer(&binning);
        run_with_threads(self.n_threads, |parallelism| -> Result<()> {
            reconcile_with(hist, binning.layout, parallelism)?;
            one_d::accumulate(samples, &quantizer, hist.counts_mut(), parallelism);
            Ok(())
        })?
    }

    /// [`compute`](Self::compute) for a slice whose element kind is only
    /// known at runtime.
    pub fn compute_slice(&self, samples: SampleSlice<'_>) -> Result<Histogram> {
        match samples {
            SampleSlice::I8(s) => self.compute(s),
            SampleSlice::U8(s) => self.compute(s),
            SampleSlice::I16(s) => self.compute(s),
            SampleSlice::U16(s) => self.compute(s),
            SampleSlice::F32(s) => self.compute(s),
            SampleSlice::F64(s) => self.compute(s),
        }
    }

    /// [`accumulate`](Self::accumulate) for a runtime-typed slice.
    pub fn accumulate_slice(&self, samples: SampleSlice<'_>, seed: &mut Histogram) -> Result<()> {
        match samples {
            SampleSlice::I8(s) => self.accumulate(s, seed),
            SampleSlice::U8(s) => self.accumulate(s, seed),
            SampleSlice::I16(s) => self.accumulate(s, seed),
            SampleSlice::U16(s) => self.accumulate(s, seed),
            SampleSlice::F32(s) => self.accumulate(s, seed),
            SampleSlice::F64(s) => self.accumulate(s, seed),
        }
    }
}

// =============================================================================
// JointHistogramConfig
// =============================================================================

/// Two-dimensional accumulation pass.
#[derive(Debug, Clone, PartialEq, Builder)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[builder(
    derive(Clone, Debug),
    finish_fn(vis = "", name = __build_internal)
)]
pub struct JointHistogramConfig {
    /// Bit depth per axis; the histogram has `2^n x 2^n` cells.
    pub bits: u32,

    /// Allow `bits` above [`MAX_JOINT_BITS`](crate::MAX_JOINT_BITS).
    #[builder(default)]
    pub force_bits: bool,

    /// Concurrency strategy. Default: [`Strategy::Auto`].
    #[builder(default)]
    pub strategy: Strategy,

    /// Bin order for signed integer samples, applied to both axes.
    #[builder(default)]
    pub layout: BinLayout,

    /// Upper end of the floating value range. Default: 1.0.
    #[builder(default = 1.0)]
    pub max: f64,

    /// Floating value range mode. Default: `[0, max)`.
    #[builder(default)]
    pub range: FloatRange,

    /// Worker threads: 0 = current pool, 1 = sequential, n = local pool of n.
    #[builder(default)]
    pub n_threads: usize,
}

impl<S: joint_histogram_config_builder::IsComplete> JointHistogramConfigBuilder<S> {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// [`HistError::InvalidRange`] if `max` is not finite and positive.
    pub fn build(self) -> Result<JointHistogramConfig> {
        let config = self.__build_internal();
        validate_max(config.max)?;
        Ok(config)
    }
}

impl JointHistogramConfig {
    fn binning_for(
        &self,
        x: (SampleKind, usize),
        y: (SampleKind, usize),
    ) -> Result<(Family, Binning)> {
        if x.0 != y.0 {
            return Err(HistError::TypeMismatch { x: x.0, y: y.0 });
        }
        if x.1 != y.1 {
            return Err(HistError::LengthMismatch { x: x.1, y: y.1 });
        }
        let family = dispatch::resolve_pair(x.0, y.0, self.bits)?;
        dispatch::check_joint_bits(self.bits, self.force_bits)?;
        if x.0.is_float() {
            validate_max(self.max)?;
        }
        let binning = binning(x.0, self.bits, self.layout, self.range, self.max);
        Ok((family, binning))
    }

    /// Histogram the pairs `(x[i], y[i])` into a fresh buffer.
    pub fn compute<T: Sample>(&self, x: &[T], y: &[T]) -> Result<JointHistogram> {
        let (family, binning) = self.binning_for((T::KIND, x.len()), (T::KIND, y.len()))?;
        let mut hist = JointHistogram::zeros(self.bits);
        hist.set_layout(binning.layout);
        self.run(x, y, &mut hist, family, binning)?;
        Ok(hist)
    }

    /// Add the pairs `(x[i], y[i])` to an existing joint histogram.
    pub fn accumulate<T: Sample>(&self, x: &[T], y: &[T], seed: &mut JointHistogram) -> Result<()> {
        let (family, binning) = self.binning_for((T::KIND, x.len()), (T::KIND, y.len()))?;
        let side = 1usize << self.bits;
        if seed.side() != side {
            return Err(HistError::SizeMismatch {
                expected: side * side,
                actual: seed.counts().len(),
            });
        }
        self.run(x, y, seed, family, binning)
    }

    fn run<T: Sample>(
        &self,
        x: &[T],
        y: &[T],
        hist: &mut JointHistogram,
        family: Family,
        binning: Binning,
    ) -> Result<()> {
        let quantizer = T::quantizer(&binning);
        let input = JointInput {
            x,
            y,
            quantizer: &quantizer,
            bits: self.bits,
        };
        let strategy = self.strategy;
        // Serial kernels never need a pool.
        let n_threads = if strategy.is_serial() { 1 } else { self.n_threads };
        run_with_threads(n_threads, |parallelism| -> Result<()> {
            reconcile_with(hist, binning.layout, parallelism)?;
            input.accumulate(hist.counts_mut(), strategy, family, parallelism);
            Ok(())
        })?
    }

    /// [`compute`](Self::compute) for slices whose element kinds are only
    /// known at runtime.
    pub fn compute_slices(&self, x: SampleSlice<'_>, y: SampleSlice<'_>) -> Result<JointHistogram> {
        match (x, y) {
            (SampleSlice::I8(x), SampleSlice::I8(y)) => self.compute(x, y),
            (SampleSlice::U8(x), SampleSlice::U8(y)) => self.compute(x, y),
            (SampleSlice::I16(x), SampleSlice::I16(y)) => self.compute(x, y),
            (SampleSlice::U16(x), SampleSlice::U16(y)) => self.compute(x, y),
            (SampleSlice::F32(x), SampleSlice::F32(y)) => self.compute(x, y),
            (SampleSlice::F64(x), SampleSlice::F64(y)) => self.compute(x, y),
            (x, y) => Err(HistError::TypeMismatch {
                x: x.kind(),
                y: y.kind(),
            }),
        }
    }

    /// [`accumulate`](Self::accumulate) for runtime-typed slices.
    pub fn accumulate_slices(
        &self,
        x: SampleSlice<'_>,
        y: SampleSlice<'_>,
        seed: &mut JointHistogram,
    ) -> Result<()> {
        match (x, y) {
            (SampleSlice::I8(x), SampleSlice::I8(y)) => self.accumulate(x, y, seed),
            (SampleSlice::U8(x), SampleSlice::U8(y)) => self.accumulate(x, y, seed),
            (SampleSlice::I16(x), SampleSlice::I16(y)) => self.accumulate(x, y, seed),
            (SampleSlice::U16(x), SampleSlice::U16(y)) => self.accumulate(x, y, seed),
            (SampleSlice::F32(x), SampleSlice::F32(y)) => self.accumulate(x, y, seed),
            (SampleSlice::F64(x), SampleSlice::F64(y)) => self.accumulate(x, y, seed),
            (x, y) => Err(HistError::TypeMismatch {
                x: x.kind(),
                y: y.kind(),
            }),
        }
    }
}
