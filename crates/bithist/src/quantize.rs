//! Sample to bin index mapping.
//!
//! Integer samples are binned by their bit pattern, shifted down when the
//! requested depth is coarser than the container. Floating samples are
//! scaled linearly and clamped into the boundary bins, so every sample lands
//! in exactly one bin.

use crate::histogram::BinLayout;
use crate::sample::{FloatSample, IntSample};

/// Maps one sample of type `T` to a bin index in `[0, 2^bits)`.
pub trait Quantize<T>: Send + Sync {
    fn bin(&self, value: T) -> usize;
}

/// Value range covered by the bins of a floating histogram.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FloatRange {
    /// `[0, max)` onto `[0, k)`.
    #[default]
    Unipolar,
    /// `[-max, max)` onto `[0, k)`, bins of width `2 * max / k`.
    Symmetric,
}

/// Everything a quantizer needs once dispatch has validated the request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Binning {
    pub bits: u32,
    pub layout: BinLayout,
    pub range: FloatRange,
    pub max: f64,
}

/// Quantizer for integer containers.
#[derive(Clone, Copy, Debug)]
pub struct IntQuantizer {
    shift: u32,
    flip: usize,
}

impl IntQuantizer {
    /// `bits` must not exceed `container_bits`.
    ///
    /// In the signed-ascending layout the top index bit is flipped, which is
    /// the same as rotating the bit-pattern histogram by half its length.
    pub fn new(container_bits: u32, bits: u32, layout: BinLayout) -> Self {
        debug_assert!(bits >= 1 && bits <= container_bits);
        let flip = match layout {
            BinLayout::BitPattern => 0,
            BinLayout::SignedAscending => 1usize << (bits - 1),
        };
        Self {
            shift: container_bits - bits,
            flip,
        }
    }
}

impl<T: IntSample> Quantize<T> for IntQuantizer {
    #[inline(always)]
    fn bin(&self, value: T) -> usize {
        ((value.bit_pattern() as usize) >> self.shift) ^ self.flip
    }
}

/// Quantizer for floating containers.
#[derive(Clone, Copy, Debug)]
pub struct FloatQuantizer {
    offset: f64,
    scale: f64,
    last: usize,
}

impl FloatQuantizer {
    /// `max` must be finite and positive.
    pub fn new(bits: u32, range: FloatRange, max: f64) -> Self {
        let k = (1usize << bits) as f64;
        let (offset, scale) = match range {
            FloatRange::Unipolar => (0.0, k / max),
            FloatRange::Symmetric => (max, k / (2.0 * max)),
        };
        Self {
            offset,
            scale,
            last: (1usize << bits) - 1,
        }
    }
}

impl<T: FloatSample> Quantize<T> for FloatQuantizer {
    #[inline(always)]
    fn bin(&self, value: T) -> usize {
        let t = (value.to_f64() + self.offset) * self.scale;
        // NaN lands in bin 0 with the underflows.
        if t.is_nan() || t < 0.0 {
            0
        } else if t >= self.last as f64 + 1.0 {
            self.last
        } else {
            (t as usize).min(self.last)
        }
    }
}
