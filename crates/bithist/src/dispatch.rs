//! Algorithm family selection.
//!
//! Resolves an element kind and a requested bit depth to one of the kernel
//! families, rejecting depths the family cannot represent. Pure: no side
//! effects, no allocation.

use crate::error::{HistError, Result};
use crate::sample::SampleKind;

/// Default upper bound on the bit depth of a joint histogram.
///
/// A `2^n x 2^n` matrix of `u64` counters grows as `4^n`: 12 bits is 128 MiB.
pub const MAX_JOINT_BITS: u32 = 12;

/// Largest bit depth for floating containers.
pub const MAX_FLOAT_BITS: u32 = 16;

/// Smallest bit depth for 16-bit integer containers.
pub const MIN_INT16_BITS: u32 = 8;

/// Kernel family for one accumulation pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Family {
    Int8 { signed: bool },
    Int16 { signed: bool },
    Float32,
    Float64,
}

impl Family {
    #[inline]
    pub const fn kind(self) -> SampleKind {
        match self {
            Self::Int8 { signed: true } => SampleKind::I8,
            Self::Int8 { signed: false } => SampleKind::U8,
            Self::Int16 { signed: true } => SampleKind::I16,
            Self::Int16 { signed: false } => SampleKind::U16,
            Self::Float32 => SampleKind::F32,
            Self::Float64 => SampleKind::F64,
        }
    }

    #[inline]
    pub const fn is_narrow(self) -> bool {
        matches!(self, Self::Int8 { .. })
    }
}

/// Inclusive range of bit depths accepted for `kind`.
#[inline]
pub const fn bit_depth_range(kind: SampleKind) -> (u32, u32) {
    match kind {
        SampleKind::I8 | SampleKind::U8 => (8, 8),
        SampleKind::I16 | SampleKind::U16 => (MIN_INT16_BITS, 16),
        SampleKind::F32 | SampleKind::F64 => (1, MAX_FLOAT_BITS),
    }
}

/// Select the kernel family for `kind` at depth `bits`.
pub fn resolve(kind: SampleKind, bits: u32) -> Result<Family> {
    let (min, max) = bit_depth_range(kind);
    if bits < min || bits > max {
        return Err(HistError::InvalidBitDepth {
            kind,
            bits,
            min,
            max,
        });
    }
    Ok(match kind {
        SampleKind::I8 => Family::Int8 { signed: true },
        SampleKind::U8 => Family::Int8 { signed: false },
        SampleKind::I16 => Family::Int16 { signed: true },
        SampleKind::U16 => Family::Int16 { signed: false },
        SampleKind::F32 => Family::Float32,
        SampleKind::F64 => Family::Float64,
    })
}

/// Select the family for two arrays that are histogrammed jointly.
pub fn resolve_pair(x: SampleKind, y: SampleKind, bits: u32) -> Result<Family> {
    if x != y {
        return Err(HistError::TypeMismatch { x, y });
    }
    resolve(x, bits)
}

/// Enforce the joint histogram memory bound unless `force` is set.
#[inline]
pub fn check_joint_bits(bits: u32, force: bool) -> Result<()> {
    if bits > MAX_JOINT_BITS && !force {
        return Err(HistError::BitDepthOutOfRange {
            bits,
            limit: MAX_JOINT_BITS,
        });
    }
    Ok(())
}
