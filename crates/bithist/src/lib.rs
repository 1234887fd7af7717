//! bithist: fixed-bit-depth histograms of large sample arrays.
//!
//! Bins 8/16-bit integer and 32/64-bit floating samples into `2^n` counters
//! (1D) or `2^n x 2^n` counters (2D), in parallel, and derives moments and
//! cumulants from the counts.
//!
//! # Key Types
//!
//! - [`Histogram`] / [`JointHistogram`] - Caller-owned count buffers
//! - [`HistogramConfig`] / [`JointHistogramConfig`] - Pass configuration builders
//! - [`Strategy`] - How the 2D accumulator shares its counters between workers
//! - [`HistError`] - Every way a call can fail
//!
//! # Accumulating
//!
//! ```
//! use bithist::{histogram1d, histogram2d, Strategy};
//!
//! let hist = histogram1d(&[-128i8, 0, 127], 8).unwrap();
//! assert_eq!(hist.counts()[0], 1);
//! assert_eq!(hist.counts()[127], 1);
//! assert_eq!(hist.counts()[128], 1);
//!
//! let x = [1u16, 2, 3];
//! let joint = histogram2d(&x, &x, 8, false, Strategy::Serial).unwrap();
//! assert_eq!(joint.total(), 3);
//! ```
//!
//! Signed integer counts come out in the two's-complement bit-pattern order
//! unless [`BinLayout::SignedAscending`] is requested. A histogram passed back
//! in as a seed is rotated into the layout of the new pass first.
//!
//! # Statistics
//!
//! ```
//! use bithist::{cumulant, moment};
//!
//! let h = [1u64, 1, 1, 1];
//! assert_eq!(moment(&h, 1, false).unwrap(), 1.5);
//! assert_eq!(moment(&h, 2, true).unwrap(), 1.25);
//! assert_eq!(cumulant(&h, 2).unwrap(), 1.25);
//! ```
//!
//! # Logging
//!
//! Strategy selection and seed remapping are reported through the `log`
//! facade at debug level, worker chunk plans at trace level. No logger is
//! installed by this crate.

pub mod accumulate;
pub mod dispatch;
pub mod error;
pub mod histogram;
pub mod parallel;
pub mod quantize;
pub mod remap;
pub mod sample;
pub mod stats;
pub mod testing;

// =============================================================================
// Convenience Re-exports
// =============================================================================

// Accumulation entry points
pub use accumulate::{
    HistogramConfig, JointHistogramConfig, Strategy, histogram1d, histogram1d_float,
    histogram1d_float_into, histogram1d_into, histogram2d, histogram2d_float,
    histogram2d_float_into, histogram2d_into,
};

// Data types
pub use histogram::{BinLayout, Histogram, JointHistogram};
pub use quantize::FloatRange;
pub use sample::{FloatSample, IntSample, Sample, SampleKind, SampleSlice};

// Errors
pub use error::{HistError, Result};

// Dispatch bounds
pub use dispatch::{MAX_FLOAT_BITS, MAX_JOINT_BITS};

// Statistics
pub use stats::{binomial, cumulant, cumulants, moment};

// Runtime
pub use parallel::{
    BackendInfo, Parallelism, backend, init_global_threads, run_with_threads,
};
pub use remap::{
    Remap, reconcile, reconcile_with, swap_halves, swap_quadrants, swap_quadrants_with,
};
