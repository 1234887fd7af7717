//! Per-worker scratch for the parallel kernels.
//!
//! ```text
//! worker 0: [private_0] ──┐
//! worker 1: [private_1] ──┼──► reduce ──► [target histogram]
//! worker N: [private_N] ──┘
//! ```
//!
//! Workers count into buffers nobody else touches, then a reduce step sums
//! them into the target. [`NarrowCounts`] is a `u8` staging buffer that keeps
//! the hot loop in an eighth of the memory of a `u64` histogram and only
//! writes to the wide buffer once per 256 hits of a bin.

use std::sync::atomic::{AtomicU64, Ordering};

use log::trace;

/// Smallest slice of samples handed to one worker.
pub const MIN_CHUNK: usize = 1 << 12;

/// Width of the unrolled inner loop of the contiguous kernels.
pub const UNROLL: usize = 8;

/// Bins merged per task in a parallel block reduction.
pub const MERGE_BLOCK: usize = 1 << 14;

/// How a sample slice is split across workers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkPlan {
    pub chunk_len: usize,
    pub n_chunks: usize,
}

impl ChunkPlan {
    /// About one chunk per worker, never smaller than [`MIN_CHUNK`].
    pub fn new(len: usize, workers: usize) -> Self {
        let chunk_len = len.div_ceil(workers.max(1)).max(MIN_CHUNK);
        let n_chunks = len.div_ceil(chunk_len);
        trace!(
            "split {} samples into {} chunks of {} for {} workers",
            len, n_chunks, chunk_len, workers
        );
        Self {
            chunk_len,
            n_chunks,
        }
    }

    /// Sample range of chunk `i`.
    #[inline]
    pub fn range(&self, i: usize, len: usize) -> std::ops::Range<usize> {
        let start = i * self.chunk_len;
        start..(start + self.chunk_len).min(len)
    }
}

/// `dst[i] += src[i]` for every bin, wrapping.
#[inline]
pub fn add_into(dst: &mut [u64], src: &[u64]) {
    debug_assert_eq!(dst.len(), src.len());
    for (d, &s) in dst.iter_mut().zip(src) {
        *d = d.wrapping_add(s);
    }
}

/// Add one spilled block of 256 hits to a wide counter.
#[inline(always)]
pub fn spill(dst: &mut u64) {
    *dst = dst.wrapping_add(256);
}

/// Copy a count buffer into fresh atomic cells.
pub fn to_atomic(counts: &[u64]) -> Vec<AtomicU64> {
    counts.iter().map(|&c| AtomicU64::new(c)).collect()
}

/// Write atomic cells back into a count buffer.
pub fn from_atomic(cells: Vec<AtomicU64>, counts: &mut [u64]) {
    for (c, cell) in counts.iter_mut().zip(cells) {
        *c = cell.into_inner();
    }
}

/// `u8` counters that overflow into a wide histogram every 256 hits.
pub struct NarrowCounts {
    counts: Box<[u8]>,
}

impl NarrowCounts {
    pub fn new(len: usize) -> Self {
        Self {
            counts: vec![0u8; len].into_boxed_slice(),
        }
    }

    /// Count one hit of `bin`. Returns `true` when the counter wrapped and
    /// 256 hits must be added to the wide histogram.
    #[inline(always)]
    pub fn bump(&mut self, bin: usize) -> bool {
        let c = &mut self.counts[bin];
        let (next, wrapped) = c.overflowing_add(1);
        *c = next;
        wrapped
    }

    /// Add the residual counts into `dst` and reset them.
    pub fn drain_into(&mut self, dst: &mut [u64]) {
        debug_assert_eq!(dst.len(), self.counts.len());
        for (d, c) in dst.iter_mut().zip(self.counts.iter_mut()) {
            *d = d.wrapping_add(u64::from(*c));
            *c = 0;
        }
    }

    /// Add the residual counts into shared atomic cells and reset them.
    pub fn drain_atomic(&mut self, dst: &[AtomicU64]) {
        debug_assert_eq!(dst.len(), self.counts.len());
        for (d, c) in dst.iter().zip(self.counts.iter_mut()) {
            if *c != 0 {
                d.fetch_add(u64::from(*c), Ordering::Relaxed);
                *c = 0;
            }
        }
    }
}
