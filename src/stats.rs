//! Per-epoch mutation, grid metrics, and the `StatsSnapshot` type
//! for the simulation.

use crate::census::Census;
use crate::config::Config;
use crate::grid::Grid;
use crate::prng::Prng;

/// A point-in-time statistics snapshot.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatsSnapshot {
    /// Non-decreasing epoch counter; resets to 0 on `reset`.
    pub epoch: u64,
    /// Mean VM complexity (recognized-opcode count) per interaction this epoch.
    pub avg_complexity: f64,
    /// Total `.`/`,` copies performed this epoch.
    pub replication_rate: u64,
    /// Copies whose write head landed in the neighbor half.
    pub effective_replication: u64,
    /// Shannon entropy (base 2) of the byte-value distribution, `[0, 8]`.
    pub entropy: f64,
    /// Fraction of sampled bytes equal to zero.
    pub zero_density: f64,
    /// The most recently computed census, if any has run yet.
    pub census: Option<Census>,
    /// The epoch at which `census` was last computed.
    pub last_census_epoch: u64,
}

impl StatsSnapshot {
    /// The all-zero baseline snapshot recorded at `epoch = 0` on `reset`.
    #[must_use]
    pub fn baseline() -> Self {
        Self {
            epoch: 0,
            avg_complexity: 0.0,
            replication_rate: 0,
            effective_replication: 0,
            entropy: 0.0,
            zero_density: 0.0,
            census: None,
            last_census_epoch: 0,
        }
    }

    /// Builds a snapshot directly, bypassing any simulation, so the history
    /// compression policy can be exercised without running
    /// thousands of epochs. Only available to the integration test suite.
    #[cfg(feature = "test-util")]
    #[must_use]
    pub fn synthetic_for_test(epoch: u64, entropy: f64, zero_density: f64) -> Self {
        Self {
            epoch,
            entropy,
            zero_density,
            ..Self::baseline()
        }
    }
}

/// Accumulates per-interaction counters over one epoch (`W·H` interactions),
/// zeroed after each `complete_epoch` call.
#[derive(Debug, Clone, Copy, Default)]
pub struct EpochAccumulator {
    pub(crate) total_complexity: u64,
    pub(crate) total_copies: u64,
    pub(crate) total_effective_copies: u64,
    pub(crate) interactions: u64,
}

impl EpochAccumulator {
    /// Folds in one interaction's counters.
    pub fn record(&mut self, complexity: u64, copies: u64, neighbor_writes: u64) {
        self.total_complexity += complexity;
        self.total_copies += copies;
        self.total_effective_copies += neighbor_writes;
        self.interactions += 1;
    }

    /// Resets all counters to zero.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Mutation pass: expected `W*H*T*mutation_rate` byte overwrites, drawn from
/// `rng` — physics, so PRNG draws are legitimate here.
pub fn mutate(grid: &mut Grid, rng: &mut Prng, config: &Config) {
    let expected = config.buffer_len() as f64 * config.mutation_rate();
    let mut k = expected.floor() as u64;
    let frac = expected - expected.floor();
    if rng.next_f64() < frac {
        k += 1;
    }
    let len = grid.as_bytes().len() as u32;
    if len == 0 {
        return;
    }
    for _ in 0..k {
        let index = rng.next_below(len) as usize;
        let value = rng.next_below(256) as u8;
        grid.set_flat_byte(index, value);
    }
}

/// Grid metrics over a 10%-strided sample of the raw buffer.
///
/// Returns `(entropy, zero_density)`. Never draws from the PRNG.
#[must_use]
pub fn grid_metrics(grid: &Grid) -> (f64, f64) {
    let bytes = grid.as_bytes();
    if bytes.is_empty() {
        return (0.0, 0.0);
    }
    let step = stride();
    let mut histogram = [0u64; 256];
    let mut samples: u64 = 0;
    let mut i = 0usize;
    while i < bytes.len() {
        histogram[bytes[i] as usize] += 1;
        samples += 1;
        i += step;
    }
    let entropy = shannon_entropy(&histogram, samples);
    let zero_density = histogram[0] as f64 / samples as f64;
    (entropy, zero_density)
}

/// `floor(1/0.1) = 10`, nudged odd so it stays coprime with power-of-two
/// tape sizes.
#[must_use]
pub const fn stride() -> usize {
    let step = 10;
    if step % 2 == 0 {
        step + 1
    } else {
        step
    }
}

/// Shannon entropy (base 2) over a 256-bucket histogram with `total` samples.
#[must_use]
pub fn shannon_entropy(histogram: &[u64; 256], total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    let mut entropy = 0.0;
    for &count in histogram {
        if count == 0 {
            continue;
        }
        let p = count as f64 / total;
        entropy -= p * libm::log2(p);
    }
    entropy
}
