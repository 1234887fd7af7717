//! Error type shared by every histogram operation.
//!
//! All variants are precondition failures. They are detected before any
//! caller-owned buffer is touched, so a failed call leaves seeds unchanged.

use crate::sample::SampleKind;

/// Errors returned by accumulation, remapping and statistics.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HistError {
    /// The requested bit depth is not supported for this element kind.
    #[error("bit depth {bits} is not supported for {kind} samples (expected {min}..={max})")]
    InvalidBitDepth {
        kind: SampleKind,
        bits: u32,
        min: u32,
        max: u32,
    },

    /// Two arrays meant to be co-histogrammed have different element kinds.
    #[error("sample kinds differ: x is {x}, y is {y}")]
    TypeMismatch { x: SampleKind, y: SampleKind },

    /// Two arrays meant to be co-histogrammed have different lengths.
    #[error("sample lengths differ: x has {x} elements, y has {y}")]
    LengthMismatch { x: usize, y: usize },

    /// A seed histogram does not have the bin count the pass needs.
    #[error("histogram has {actual} bins, expected {expected}")]
    SizeMismatch { expected: usize, actual: usize },

    /// A 2D bit depth exceeds the memory safety bound.
    #[error("2d bit depth {bits} exceeds the limit of {limit}; set `force_bits` to override")]
    BitDepthOutOfRange { bits: u32, limit: u32 },

    /// Moments are undefined on a histogram with no counts.
    #[error("histogram is empty (total count is zero)")]
    EmptyHistogram,

    /// The floating normalization maximum is zero, negative or not finite.
    #[error("normalization maximum must be positive and finite, got {0}")]
    InvalidRange(f64),

    /// Cumulants start at order 1.
    #[error("cumulant order must be at least 1, got {0}")]
    InvalidOrder(u32),

    /// A worker pool could not be created.
    #[error("failed to build thread pool: {0}")]
    ThreadPool(String),
}

impl From<rayon::ThreadPoolBuildError> for HistError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        Self::ThreadPool(err.to_string())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, HistError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offending_values() {
        let err = HistError::InvalidBitDepth {
            kind: SampleKind::U8,
            bits: 10,
            min: 8,
            max: 8,
        };
        assert_eq!(
            err.to_string(),
            "bit depth 10 is not supported for u8 samples (expected 8..=8)"
        );

        let err = HistError::SizeMismatch {
            expected: 256,
            actual: 255,
        };
        assert_eq!(err.to_string(), "histogram has 255 bins, expected 256");

        let err = HistError::BitDepthOutOfRange { bits: 14, limit: 12 };
        assert!(err.to_string().contains("force_bits"));
    }
}
