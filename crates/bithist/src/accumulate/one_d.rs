//! One-dimensional accumulation kernels.

use rayon::prelude::*;

use super::scratch::{ChunkPlan, UNROLL, add_into};
use super::strategy::MIN_PARALLEL_SAMPLES;
use crate::parallel::Parallelism;
use crate::quantize::Quantize;

/// Add every sample of `samples` to `counts`.
///
/// Runs on the calling thread for small inputs or sequential parallelism;
/// otherwise each worker counts one chunk into a private histogram and the
/// privates are summed by a tree reduction.
pub fn accumulate<T, Q>(samples: &[T], quantizer: &Q, counts: &mut [u64], parallelism: Parallelism)
where
    T: Copy + Send + Sync,
    Q: Quantize<T>,
{
    if !parallelism.is_parallel() || samples.len() < MIN_PARALLEL_SAMPLES {
        accumulate_serial(samples, quantizer, counts);
        return;
    }

    let k = counts.len();
    let plan = ChunkPlan::new(samples.len(), parallelism.workers());
    let merged = samples
        .par_chunks(plan.chunk_len)
        .map(|chunk| {
            let mut local = vec![0u64; k];
            accumulate_serial(chunk, quantizer, &mut local);
            local
        })
        .reduce_with(|mut a, b| {
            add_into(&mut a, &b);
            a
        });
    if let Some(merged) = merged {
        add_into(counts, &merged);
    }
}

/// Single-threaded kernel.
///
/// Each chunk of [`UNROLL`] samples is quantized into a bin array first and
/// counted second, so the bin computations do not wait on the increments.
pub fn accumulate_serial<T, Q>(samples: &[T], quantizer: &Q, counts: &mut [u64])
where
    T: Copy,
    Q: Quantize<T>,
{
    let mut chunks = samples.chunks_exact(UNROLL);
    for chunk in &mut chunks {
        let mut bins = [0usize; UNROLL];
        for (b, &s) in bins.iter_mut().zip(chunk) {
            *b = quantizer.bin(s);
        }
        for b in bins {
            counts[b] = counts[b].wrapping_add(1);
        }
    }
    for &s in chunks.remainder() {
        let b = quantizer.bin(s);
        counts[b] = counts[b].wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::histogram::BinLayout;
    use crate::quantize::IntQuantizer;

    #[test]
    fn test_serial_counts_bit_patterns() {
        let q = IntQuantizer::new(8, 8, BinLayout::BitPattern);
        let mut counts = vec![0u64; 256];
        accumulate_serial(&[0u8, 255, 0, 128], &q, &mut counts);
        assert_eq!(counts[0], 2);
        assert_eq!(counts[128], 1);
        assert_eq!(counts[255], 1);
        assert_eq!(counts.iter().sum::<u64>(), 4);
    }

    #[test]
    fn test_serial_remainder_and_unrolled_body_agree() {
        let q = IntQuantizer::new(8, 8, BinLayout::BitPattern);
        for len in [0, 1, UNROLL - 1, UNROLL, UNROLL + 3, 5 * UNROLL + 1] {
            let samples: Vec<u8> = (0..len).map(|i| (i % 3) as u8).collect();
            let mut counts = vec![0u64; 256];
            accumulate_serial(&samples, &q, &mut counts);
            for bin in 0..3 {
                let expected = samples.iter().filter(|&&s| s as usize == bin).count() as u64;
                assert_eq!(counts[bin], expected, "len {len} bin {bin}");
            }
        }
    }

    #[test]
    fn test_full_counter_wraps() {
        let q = IntQuantizer::new(8, 8, BinLayout::BitPattern);
        let mut counts = vec![0u64; 256];
        counts[7] = u64::MAX;
        accumulate_serial(&[7u8, 7], &q, &mut counts);
        assert_eq!(counts[7], 1);
    }

    #[test]
    fn test_parallel_matches_serial() {
        let samples: Vec<u16> = (0..200_000u32).map(|i| (i.wrapping_mul(2_654_435_761) >> 7) as u16).collect();
        let q = IntQuantizer::new(16, 12, BinLayout::BitPattern);

        let mut serial = vec![0u64; 4096];
        accumulate(&samples, &q, &mut serial, Parallelism::Sequential);
        let mut parallel = vec![0u64; 4096];
        accumulate(&samples, &q, &mut parallel, Parallelism::Parallel);

        assert_eq!(serial, parallel);
        assert_eq!(parallel.iter().sum::<u64>(), 200_000);
    }
}
