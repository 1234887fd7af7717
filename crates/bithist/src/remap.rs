//! Sign remapping.
//!
//! Rotating a histogram by half its length moves between the bit-pattern
//! layout and the signed-ascending layout. In 2D both axes rotate: the top and
//! bottom halves of the rows are exchanged, then the left and right halves of
//! every row. Both rotations are involutions.

use log::debug;
use rayon::prelude::*;

use crate::error::{HistError, Result};
use crate::histogram::{BinLayout, Histogram, JointHistogram};
use crate::parallel::Parallelism;

/// Rows below this side length are swapped on the calling thread.
const MIN_PARALLEL_SIDE: usize = 512;

fn check_len(len: usize, expected: usize, bits: u32) -> Result<()> {
    if bits == 0 {
        return Err(HistError::SizeMismatch {
            expected: 2,
            actual: len,
        });
    }
    if len != expected {
        return Err(HistError::SizeMismatch {
            expected,
            actual: len,
        });
    }
    Ok(())
}

/// `2^bits`, or `SizeMismatch` if it does not fit in `usize`.
fn power_of_two(len: usize, bits: u32) -> Result<usize> {
    1usize.checked_shl(bits).ok_or(HistError::SizeMismatch {
        expected: usize::MAX,
        actual: len,
    })
}

/// Swap the two halves of a `2^bits` histogram in place.
pub fn swap_halves(counts: &mut [u64], bits: u32) -> Result<()> {
    let k = power_of_two(counts.len(), bits)?;
    check_len(counts.len(), k, bits)?;
    let (lo, hi) = counts.split_at_mut(k / 2);
    lo.swap_with_slice(hi);
    Ok(())
}

/// Swap the quadrant pairs of a row-major `2^bits x 2^bits` histogram in
/// place, on the calling thread.
pub fn swap_quadrants(counts: &mut [u64], bits: u32) -> Result<()> {
    swap_quadrants_with(counts, bits, Parallelism::Sequential)
}

/// [`swap_quadrants`], with the row pairs of large histograms spread over the
/// current pool when `parallelism` allows it.
pub fn swap_quadrants_with(counts: &mut [u64], bits: u32, parallelism: Parallelism) -> Result<()> {
    let side = power_of_two(counts.len(), bits)?;
    let expected = side.checked_mul(side).ok_or(HistError::SizeMismatch {
        expected: usize::MAX,
        actual: counts.len(),
    })?;
    check_len(counts.len(), expected, bits)?;

    let (top, bottom) = counts.split_at_mut(expected / 2);
    let half = side / 2;
    let swap_row = |row: &mut [u64]| {
        let (left, right) = row.split_at_mut(half);
        left.swap_with_slice(right);
    };

    if side >= MIN_PARALLEL_SIDE && parallelism.is_parallel() {
        top.par_chunks_mut(side)
            .zip(bottom.par_chunks_mut(side))
            .for_each(|(a, b)| {
                a.swap_with_slice(b);
                swap_row(a);
                swap_row(b);
            });
    } else {
        for (a, b) in top.chunks_mut(side).zip(bottom.chunks_mut(side)) {
            a.swap_with_slice(b);
            swap_row(a);
            swap_row(b);
        }
    }
    Ok(())
}

/// A count buffer that records its layout and can rotate into the other one.
pub trait Remap {
    fn layout(&self) -> BinLayout;

    /// Rotate into the other layout, in parallel where `parallelism` allows
    /// it.
    fn remap_with(&mut self, parallelism: Parallelism) -> Result<()>;
}

impl Remap for Histogram {
    fn layout(&self) -> BinLayout {
        Histogram::layout(self)
    }

    fn remap_with(&mut self, _parallelism: Parallelism) -> Result<()> {
        Histogram::remap(self)
    }
}

impl Remap for JointHistogram {
    fn layout(&self) -> BinLayout {
        JointHistogram::layout(self)
    }

    fn remap_with(&mut self, parallelism: Parallelism) -> Result<()> {
        JointHistogram::remap_with(self, parallelism)
    }
}

/// Bring a seed into the layout of the pass about to add to it.
///
/// Returns whether a remap ran. Unsigned and floating passes always use
/// [`BinLayout::BitPattern`], so their bit-pattern seeds are never touched.
pub fn reconcile<H: Remap + ?Sized>(seed: &mut H, pass: BinLayout) -> Result<bool> {
    reconcile_with(seed, pass, Parallelism::Sequential)
}

/// [`reconcile`] under the parallelism of the pass that owns the seed.
pub fn reconcile_with<H: Remap + ?Sized>(
    seed: &mut H,
    pass: BinLayout,
    parallelism: Parallelism,
) -> Result<bool> {
    if seed.layout() == pass {
        return Ok(false);
    }
    debug!(
        "remapping seed from {:?} to {:?} ({:?})",
        seed.layout(),
        pass,
        parallelism
    );
    seed.remap_with(parallelism)?;
    Ok(true)
}
