//! Sample element kinds.
//!
//! The engine accepts exactly six element types. They are modelled two ways:
//!
//! - [`Sample`] is a sealed trait implemented once per concrete type, so the
//!   accumulation kernels are monomorphized per container kind.
//! - [`SampleSlice`] is a runtime-typed borrowed slice for callers that only
//!   learn the element kind at runtime. Matching on it is the single dynamic
//!   dispatch point of the crate.

use std::fmt;

use crate::quantize::{Binning, FloatQuantizer, IntQuantizer, Quantize};

/// Element kind of a sample array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SampleKind {
    I8,
    U8,
    I16,
    U16,
    F32,
    F64,
}

impl SampleKind {
    /// Native width of one element in bits.
    #[inline]
    pub const fn container_bits(self) -> u32 {
        match self {
            Self::I8 | Self::U8 => 8,
            Self::I16 | Self::U16 => 16,
            Self::F32 => 32,
            Self::F64 => 64,
        }
    }

    /// Whether the kind is a signed integer.
    ///
    /// Floats report `false`: their bins never use two's-complement
    /// addressing, so sign remapping does not apply to them.
    #[inline]
    pub const fn is_signed(self) -> bool {
        matches!(self, Self::I8 | Self::I16)
    }

    #[inline]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }

    /// Whether the kind is an 8-bit container.
    #[inline]
    pub const fn is_narrow(self) -> bool {
        matches!(self, Self::I8 | Self::U8)
    }
}

impl fmt::Display for SampleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::I8 => "i8",
            Self::U8 => "u8",
            Self::I16 => "i16",
            Self::U16 => "u16",
            Self::F32 => "f32",
            Self::F64 => "f64",
        };
        f.write_str(name)
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for i8 {}
    impl Sealed for u8 {}
    impl Sealed for i16 {}
    impl Sealed for u16 {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}

/// A supported sample element type.
///
/// Sealed: implemented for `i8`, `u8`, `i16`, `u16`, `f32` and `f64` only.
pub trait Sample: sealed::Sealed + Copy + Send + Sync + 'static {
    /// The runtime kind of this type.
    const KIND: SampleKind;

    /// Maps one sample to a bin index.
    type Quantizer: Quantize<Self>;

    /// Build the quantizer for a resolved binning.
    fn quantizer(binning: &Binning) -> Self::Quantizer;
}

/// Integer samples, binned by their bit pattern.
pub trait IntSample: Sample {
    /// The element's bits read as unsigned, zero-extended to 16 bits.
    fn bit_pattern(self) -> u16;
}

/// Floating samples, binned by linear scaling.
pub trait FloatSample: Sample {
    fn to_f64(self) -> f64;
}

macro_rules! impl_int_sample {
    ($($ty:ty => $kind:ident, $unsigned:ty);* $(;)?) => {$(
        impl Sample for $ty {
            const KIND: SampleKind = SampleKind::$kind;
            type Quantizer = IntQuantizer;

            #[inline]
            fn quantizer(binning: &Binning) -> IntQuantizer {
                IntQuantizer::new(Self::KIND.container_bits(), binning.bits, binning.layout)
            }
        }

        impl IntSample for $ty {
            #[inline(always)]
            fn bit_pattern(self) -> u16 {
                self as $unsigned as u16
            }
        }
    )*};
}

macro_rules! impl_float_sample {
    ($($ty:ty => $kind:ident);* $(;)?) => {$(
        impl Sample for $ty {
            const KIND: SampleKind = SampleKind::$kind;
            type Quantizer = FloatQuantizer;

            #[inline]
            fn quantizer(binning: &Binning) -> FloatQuantizer {
                FloatQuantizer::new(binning.bits, binning.range, binning.max)
            }
        }

        impl FloatSample for $ty {
            #[inline(always)]
            fn to_f64(self) -> f64 {
                self as f64
            }
        }
    )*};
}

impl_int_sample! {
    i8 => I8, u8;
    u8 => U8, u8;
    i16 => I16, u16;
    u16 => U16, u16;
}

impl_float_sample! {
    f32 => F32;
    f64 => F64;
}

/// Borrowed sample array whose element kind is known only at runtime.
#[derive(Clone, Copy, Debug)]
pub enum SampleSlice<'a> {
    I8(&'a [i8]),
    U8(&'a [u8]),
    I16(&'a [i16]),
    U16(&'a [u16]),
    F32(&'a [f32]),
    F64(&'a [f64]),
}

impl SampleSlice<'_> {
    #[inline]
    pub fn kind(&self) -> SampleKind {
        match self {
            Self::I8(_) => SampleKind::I8,
            Self::U8(_) => SampleKind::U8,
            Self::I16(_) => SampleKind::I16,
            Self::U16(_) => SampleKind::U16,
            Self::F32(_) => SampleKind::F32,
            Self::F64(_) => SampleKind::F64,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Self::I8(s) => s.len(),
            Self::U8(s) => s.len(),
            Self::I16(s) => s.len(),
            Self::U16(s) => s.len(),
            Self::F32(s) => s.len(),
            Self::F64(s) => s.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

macro_rules! impl_from_slice {
    ($($ty:ty => $variant:ident),* $(,)?) => {$(
        impl<'a> From<&'a [$ty]> for SampleSlice<'a> {
            #[inline]
            fn from(samples: &'a [$ty]) -> Self {
                SampleSlice::$variant(samples)
            }
        }

        impl<'a> From<&'a Vec<$ty>> for SampleSlice<'a> {
            #[inline]
            fn from(samples: &'a Vec<$ty>) -> Self {
                SampleSlice::$variant(samples.as_slice())
            }
        }
    )*};
}

impl_from_slice! {
    i8 => I8,
    u8 => U8,
    i16 => I16,
    u16 => U16,
    f32 => F32,
    f64 => F64,
}
