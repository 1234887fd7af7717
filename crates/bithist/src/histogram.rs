//! Owned count buffers.
//!
//! [`Histogram`] holds `2^n` counters, [`JointHistogram`] holds `2^n x 2^n`
//! counters in row-major order (row = x bin, column = y bin). Both are plain
//! caller-owned buffers: the engine borrows them for one call and never keeps
//! a reference.
//!
//! # Signed layouts
//!
//! Integer samples are binned by their bit pattern read as unsigned. For a
//! signed array this puts `[0, 2^(n-1))` in the lower half and the negative
//! values in the upper half ([`BinLayout::BitPattern`]). Rotating by half the
//! length gives ascending value order ([`BinLayout::SignedAscending`]). Each
//! buffer records which layout its counts are in so a later pass can
//! reconcile it before adding to it.
//!
//! Counters wrap modulo `2^64`, the same under every accumulation strategy.

use ndarray::ArrayView2;

use crate::error::{HistError, Result};
use crate::parallel::Parallelism;
use crate::remap::{swap_halves, swap_quadrants_with};
use crate::stats;

/// Order of the bins of an integer histogram.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BinLayout {
    /// Bin index is the sample's bit pattern read as unsigned.
    ///
    /// The only layout produced for unsigned and floating samples.
    #[default]
    BitPattern,
    /// Halves rotated so that signed values appear in ascending order.
    SignedAscending,
}

impl BinLayout {
    /// The other layout.
    #[inline]
    pub const fn toggled(self) -> Self {
        match self {
            Self::BitPattern => Self::SignedAscending,
            Self::SignedAscending => Self::BitPattern,
        }
    }
}

/// Bit depth of a power-of-two bin count.
#[inline]
fn bits_of(len: usize) -> Option<u32> {
    len.is_power_of_two().then(|| len.trailing_zeros())
}

#[inline]
fn saturating_sum<'a>(counts: impl IntoIterator<Item = &'a u64>) -> u64 {
    counts.into_iter().fold(0u64, |acc, &c| acc.saturating_add(c))
}

// =============================================================================
// Histogram
// =============================================================================

/// One-dimensional histogram of `u64` counters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Histogram {
    counts: Vec<u64>,
    layout: BinLayout,
}

impl Histogram {
    /// Zeroed histogram with `2^bits` bins in the bit-pattern layout.
    ///
    /// # Panics
    ///
    /// Panics if `bits >= usize::BITS`. Bit depths accepted by the
    /// accumulators never exceed 16.
    pub fn zeros(bits: u32) -> Self {
        Self {
            counts: vec![0; 1usize << bits],
            layout: BinLayout::BitPattern,
        }
    }

    /// Wrap an existing count buffer.
    ///
    /// The length is not checked here; a pass that uses the histogram as a
    /// seed rejects it with [`HistError::SizeMismatch`] if it has the wrong
    /// number of bins.
    pub fn from_counts(counts: Vec<u64>, layout: BinLayout) -> Self {
        Self { counts, layout }
    }

    #[inline]
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    #[inline]
    pub fn counts_mut(&mut self) -> &mut [u64] {
        &mut self.counts
    }

    #[inline]
    pub fn into_counts(self) -> Vec<u64> {
        self.counts
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Bit depth, if the bin count is a power of two.
    #[inline]
    pub fn bits(&self) -> Option<u32> {
        bits_of(self.counts.len())
    }

    #[inline]
    pub fn layout(&self) -> BinLayout {
        self.layout
    }

    /// Total number of samples counted, saturating at `u64::MAX`.
    pub fn total(&self) -> u64 {
        saturating_sum(&self.counts)
    }

    /// Rotate the bins by half their length and toggle the recorded layout.
    pub fn remap(&mut self) -> Result<()> {
        let bits = self.bits().ok_or(HistError::SizeMismatch {
            expected: self.counts.len().next_power_of_two(),
            actual: self.counts.len(),
        })?;
        swap_halves(&mut self.counts, bits)?;
        self.layout = self.layout.toggled();
        Ok(())
    }

    /// Bring the bins into `layout`, remapping only if it differs.
    pub fn to_layout(&mut self, layout: BinLayout) -> Result<()> {
        if self.layout != layout {
            self.remap()?;
        }
        Ok(())
    }

    pub(crate) fn set_layout(&mut self, layout: BinLayout) {
        self.layout = layout;
    }

    /// Raw or centered moment over bin indices. See [`stats::moment`].
    pub fn moment(&self, order: u32, centered: bool) -> Result<f64> {
        stats::moment(&self.counts, order, centered)
    }

    /// Cumulant over bin indices. See [`stats::cumulant`].
    pub fn cumulant(&self, order: u32) -> Result<f64> {
        stats::cumulant(&self.counts, order)
    }

    /// Cumulants of orders `1..=max_order`. See [`stats::cumulants`].
    pub fn cumulants(&self, max_order: u32) -> Result<Vec<f64>> {
        stats::cumulants(&self.counts, max_order)
    }
}

// =============================================================================
// JointHistogram
// =============================================================================

/// Two-dimensional histogram of `u64` counters, row-major, square.
///
/// Deserialization goes through [`JointHistogram::from_counts`], so a
/// buffer whose length is not `side * side` is rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawJointHistogram"))]
pub struct JointHistogram {
    counts: Vec<u64>,
    side: usize,
    layout: BinLayout,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawJointHistogram {
    counts: Vec<u64>,
    side: usize,
    layout: BinLayout,
}

#[cfg(feature = "serde")]
impl TryFrom<RawJointHistogram> for JointHistogram {
    type Error = HistError;

    fn try_from(raw: RawJointHistogram) -> Result<Self> {
        Self::from_counts(raw.counts, raw.side, raw.layout)
    }
}

impl JointHistogram {
    /// Zeroed `2^bits x 2^bits` histogram in the bit-pattern layout.
    ///
    /// # Panics
    ///
    /// Panics if `2^bits * 2^bits` overflows `usize`.
    pub fn zeros(bits: u32) -> Self {
        let side = 1usize << bits;
        Self {
            counts: vec![0; side * side],
            side,
            layout: BinLayout::BitPattern,
        }
    }

    /// Wrap an existing row-major `side x side` count buffer.
    ///
    /// # Errors
    ///
    /// [`HistError::SizeMismatch`] if `counts.len() != side * side`.
    pub fn from_counts(counts: Vec<u64>, side: usize, layout: BinLayout) -> Result<Self> {
        let expected = side.checked_mul(side).ok_or(HistError::SizeMismatch {
            expected: usize::MAX,
            actual: counts.len(),
        })?;
        if counts.len() != expected {
            return Err(HistError::SizeMismatch {
                expected,
                actual: counts.len(),
            });
        }
        Ok(Self {
            counts,
            side,
            layout,
        })
    }

    /// Flat row-major counts.
    #[inline]
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    #[inline]
    pub fn counts_mut(&mut self) -> &mut [u64] {
        &mut self.counts
    }

    #[inline]
    pub fn into_counts(self) -> Vec<u64> {
        self.counts
    }

    /// Bins per axis.
    #[inline]
    pub fn side(&self) -> usize {
        self.side
    }

    /// Bit depth per axis, if the side is a power of two.
    #[inline]
    pub fn bits(&self) -> Option<u32> {
        bits_of(self.side)
    }

    #[inline]
    pub fn layout(&self) -> BinLayout {
        self.layout
    }

    pub(crate) fn set_layout(&mut self, layout: BinLayout) {
        self.layout = layout;
    }

    /// Count of samples with x in bin `x` and y in bin `y`.
    ///
    /// # Panics
    ///
    /// Panics if either index is `>= side`.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u64 {
        assert!(x < self.side && y < self.side, "bin ({x}, {y}) out of bounds");
        self.counts[x * self.side + y]
    }

    /// The counts as a `side x side` array view, indexed `[x, y]`.
    pub fn view(&self) -> ArrayView2<'_, u64> {
        ArrayView2::from_shape((self.side, self.side), &self.counts)
            .expect("length is side * side by construction")
    }

    /// Total number of pairs counted, saturating at `u64::MAX`.
    pub fn total(&self) -> u64 {
        saturating_sum(&self.counts)
    }

    /// Counts summed over y, one bin per x bin.
    pub fn marginal_x(&self) -> Histogram {
        let counts = self
            .counts
            .chunks_exact(self.side.max(1))
            .map(saturating_sum)
            .collect();
        Histogram::from_counts(counts, self.layout)
    }

    /// Counts summed over x, one bin per y bin.
    pub fn marginal_y(&self) -> Histogram {
        let mut counts = vec![0u64; self.side];
        for row in self.counts.chunks_exact(self.side.max(1)) {
            for (acc, &c) in counts.iter_mut().zip(row) {
                *acc = acc.saturating_add(c);
            }
        }
        Histogram::from_counts(counts, self.layout)
    }

    /// Rotate both axes by half their length and toggle the recorded layout.
    ///
    /// Runs on the calling thread.
    pub fn remap(&mut self) -> Result<()> {
        self.remap_with(Parallelism::Sequential)
    }

    /// [`remap`](Self::remap), swapping rows in parallel where `parallelism`
    /// allows it.
    pub fn remap_with(&mut self, parallelism: Parallelism) -> Result<()> {
        let bits = self.bits().ok_or(HistError::SizeMismatch {
            expected: self.side.next_power_of_two().pow(2),
            actual: self.counts.len(),
        })?;
        swap_quadrants_with(&mut self.counts, bits, parallelism)?;
        self.layout = self.layout.toggled();
        Ok(())
    }

    /// Bring the bins into `layout`, remapping only if it differs.
    pub fn to_layout(&mut self, layout: BinLayout) -> Result<()> {
        if self.layout != layout {
            self.remap()?;
        }
        Ok(())
    }
}
