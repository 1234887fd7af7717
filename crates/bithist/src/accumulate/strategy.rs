//! Concurrency strategies for joint accumulation.

use log::debug;

use crate::dispatch::Family;

/// Fewer samples than this are always accumulated on the calling thread
/// under [`Strategy::Auto`].
pub const MIN_PARALLEL_SAMPLES: usize = 1 << 16;

/// How concurrent increments of the same joint cell are reconciled.
///
/// Every strategy produces identical counts for identical input; the choice
/// only affects throughput and memory. Extra memory per pass, for `k^2`
/// cells and `w` workers:
///
/// | Strategy | Extra memory |
/// |---|---|
/// | `Serial` | none |
/// | `SerialContiguous` | `k^2` bytes of `u8` staging |
/// | `Atomic` | a `k^2` atomic copy of the output, written back at the end |
/// | `AtomicNarrow` | the atomic copy plus `w * k^2` bytes of staging |
/// | `ParallelReduceEager` | up to `w` private `u64` histograms |
/// | `ParallelReduceLazy` | `w` private `u64` histograms plus `w * k^2` bytes |
///
/// The atomic copy costs two extra passes over the output; at 12 bits that is
/// 128 MiB on top of the histogram itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Strategy {
    /// Pick from the input: serial for small inputs or a single worker,
    /// atomic for 8-bit containers, eager reduction otherwise.
    #[default]
    Auto,
    /// Single thread, plain increments.
    Serial,
    /// Shared atomic counters, one relaxed `fetch_add` per sample. The output
    /// is copied into the atomic cells and back once per pass.
    Atomic,
    /// Shared atomic counters fed from per-worker `u8` counters that spill
    /// 256 counts at a time.
    AtomicNarrow,
    /// Per-worker private histograms merged pairwise as workers finish.
    ParallelReduceEager,
    /// Per-worker `u8` staging batched into private histograms, merged in a
    /// single parallel pass once every worker is done.
    ParallelReduceLazy,
    /// Single thread over fixed-width chunks with `u8` staging counters.
    SerialContiguous,
}

impl Strategy {
    /// Every concrete strategy, in declaration order.
    pub const ALL: [Strategy; 6] = [
        Strategy::Serial,
        Strategy::Atomic,
        Strategy::AtomicNarrow,
        Strategy::ParallelReduceEager,
        Strategy::ParallelReduceLazy,
        Strategy::SerialContiguous,
    ];

    /// Resolve to a concrete strategy (never returns `Auto`).
    ///
    /// Explicit strategies are returned unchanged.
    pub fn select(self, n_samples: usize, family: Family, workers: usize) -> Strategy {
        let selected = match self {
            Strategy::Auto => {
                if n_samples < MIN_PARALLEL_SAMPLES || workers <= 1 {
                    Strategy::Serial
                } else if family.is_narrow() {
                    Strategy::Atomic
                } else {
                    Strategy::ParallelReduceEager
                }
            }
            explicit => explicit,
        };
        if self == Strategy::Auto {
            debug!(
                "auto strategy for {} samples of {} on {} workers: {:?}",
                n_samples,
                family.kind(),
                workers,
                selected
            );
        }
        selected
    }

    /// Whether the strategy runs on the calling thread only.
    #[inline]
    pub fn is_serial(self) -> bool {
        matches!(self, Strategy::Serial | Strategy::SerialContiguous)
    }
}
