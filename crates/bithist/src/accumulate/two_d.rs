//! Joint accumulation kernels, one per [`Strategy`].
//!
//! The cell of a sample pair is `(bin(x) << bits) | bin(y)`: rows are x bins,
//! columns are y bins.

use std::sync::atomic::Ordering;

use rayon::prelude::*;

use super::scratch::{
    ChunkPlan, MERGE_BLOCK, NarrowCounts, UNROLL, add_into, from_atomic, spill, to_atomic,
};
use super::strategy::Strategy;
use crate::dispatch::Family;
use crate::parallel::Parallelism;
use crate::quantize::Quantize;

#[inline(always)]
fn cell<T, Q: Quantize<T>>(quantizer: &Q, x: T, y: T, bits: u32) -> usize {
    (quantizer.bin(x) << bits) | quantizer.bin(y)
}

/// Borrowed inputs of one joint pass.
pub struct JointInput<'a, T, Q> {
    pub x: &'a [T],
    pub y: &'a [T],
    pub quantizer: &'a Q,
    pub bits: u32,
}

impl<T, Q> JointInput<'_, T, Q>
where
    T: Copy + Send + Sync,
    Q: Quantize<T>,
{
    /// Add every pair to `counts` (row-major, `2^bits x 2^bits`) under
    /// `strategy`, resolving `Auto` first.
    pub fn accumulate(
        &self,
        counts: &mut [u64],
        strategy: Strategy,
        family: Family,
        parallelism: Parallelism,
    ) {
        debug_assert_eq!(self.x.len(), self.y.len());
        debug_assert_eq!(counts.len(), 1usize << (2 * self.bits));

        match strategy.select(self.x.len(), family, parallelism.workers()) {
            Strategy::Auto | Strategy::Serial => self.serial(self.x, self.y, counts),
            Strategy::SerialContiguous => self.serial_contiguous(counts),
            Strategy::Atomic => self.atomic(counts, parallelism),
            Strategy::AtomicNarrow => self.atomic_narrow(counts, parallelism),
            Strategy::ParallelReduceEager => self.reduce_eager(counts, parallelism),
            Strategy::ParallelReduceLazy => self.reduce_lazy(counts, parallelism),
        }
    }

    fn plan(&self, parallelism: Parallelism) -> ChunkPlan {
        ChunkPlan::new(self.x.len(), parallelism.workers())
    }

    fn serial(&self, x: &[T], y: &[T], counts: &mut [u64]) {
        for (&a, &b) in x.iter().zip(y) {
            let c = cell(self.quantizer, a, b, self.bits);
            counts[c] = counts[c].wrapping_add(1);
        }
    }

    fn serial_contiguous(&self, counts: &mut [u64]) {
        let mut narrow = NarrowCounts::new(counts.len());
        let mut xs = self.x.chunks_exact(UNROLL);
        let mut ys = self.y.chunks_exact(UNROLL);
        for (cx, cy) in (&mut xs).zip(&mut ys) {
            let mut cells = [0usize; UNROLL];
            for (c, (&a, &b)) in cells.iter_mut().zip(cx.iter().zip(cy)) {
                *c = cell(self.quantizer, a, b, self.bits);
            }
            for c in cells {
                if narrow.bump(c) {
                    spill(&mut counts[c]);
                }
            }
        }
        self.serial(xs.remainder(), ys.remainder(), counts);
        narrow.drain_into(counts);
    }

    fn atomic(&self, counts: &mut [u64], parallelism: Parallelism) {
        let cells = to_atomic(counts);
        let plan = self.plan(parallelism);
        let len = self.x.len();
        parallelism.maybe_par_for_each(0..plan.n_chunks, |i| {
            let r = plan.range(i, len);
            for (&a, &b) in self.x[r.clone()].iter().zip(&self.y[r]) {
                cells[cell(self.quantizer, a, b, self.bits)].fetch_add(1, Ordering::Relaxed);
            }
        });
        from_atomic(cells, counts);
    }

    fn atomic_narrow(&self, counts: &mut [u64], parallelism: Parallelism) {
        let cells = to_atomic(counts);
        let plan = self.plan(parallelism);
        let len = self.x.len();
        parallelism.maybe_par_for_each(0..plan.n_chunks, |i| {
            let r = plan.range(i, len);
            let mut narrow = NarrowCounts::new(cells.len());
            for (&a, &b) in self.x[r.clone()].iter().zip(&self.y[r]) {
                let c = cell(self.quantizer, a, b, self.bits);
                if narrow.bump(c) {
                    cells[c].fetch_add(256, Ordering::Relaxed);
                }
            }
            narrow.drain_atomic(&cells);
        });
        from_atomic(cells, counts);
    }

    fn reduce_eager(&self, counts: &mut [u64], parallelism: Parallelism) {
        let plan = self.plan(parallelism);
        let len = self.x.len();
        let n_cells = counts.len();
        let private = |i: usize| {
            let r = plan.range(i, len);
            let mut local = vec![0u64; n_cells];
            self.serial(&self.x[r.clone()], &self.y[r], &mut local);
            local
        };
        let merge = |mut a: Vec<u64>, b: Vec<u64>| {
            add_into(&mut a, &b);
            a
        };
        let merged = if parallelism.is_parallel() {
            (0..plan.n_chunks)
                .into_par_iter()
                .map(private)
                .reduce_with(merge)
        } else {
            (0..plan.n_chunks).map(private).reduce(merge)
        };
        if let Some(merged) = merged {
            add_into(counts, &merged);
        }
    }

    fn reduce_lazy(&self, counts: &mut [u64], parallelism: Parallelism) {
        let plan = self.plan(parallelism);
        let len = self.x.len();
        let n_cells = counts.len();
        let privates: Vec<Vec<u64>> = parallelism.maybe_par_map(0..plan.n_chunks, |i| {
            let r = plan.range(i, len);
            let mut wide = vec![0u64; n_cells];
            let mut narrow = NarrowCounts::new(n_cells);
            for (&a, &b) in self.x[r.clone()].iter().zip(&self.y[r]) {
                let c = cell(self.quantizer, a, b, self.bits);
                if narrow.bump(c) {
                    spill(&mut wide[c]);
                }
            }
            narrow.drain_into(&mut wide);
            wide
        });

        let merge_block = |(b, out): (usize, &mut [u64])| {
            let start = b * MERGE_BLOCK;
            for p in &privates {
                add_into(out, &p[start..start + out.len()]);
            }
        };
        if parallelism.is_parallel() {
            counts
                .par_chunks_mut(MERGE_BLOCK)
                .enumerate()
                .for_each(merge_block);
        } else {
            counts.chunks_mut(MERGE_BLOCK).enumerate().for_each(merge_block);
        }
    }
}
