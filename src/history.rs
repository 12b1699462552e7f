//! Append-only compressed time series of stats snapshots.

use crate::stats::StatsSnapshot;

/// Entropy delta, absolute, that forces a non-census epoch into history.
const ENTROPY_DELTA_THRESHOLD: f64 = 0.1;
/// Zero-density delta, absolute, that forces a non-census epoch into history.
const ZERO_DENSITY_DELTA_THRESHOLD: f64 = 0.05;

/// An append-only, compressed sequence of [`StatsSnapshot`]s.
///
/// Always contains at least the `epoch = 0` baseline, seeded by
/// [`History::reset`].
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct History {
    snapshots: Vec<StatsSnapshot>,
}

impl History {
    /// Clears the log and seeds it with `baseline`, always capturing epoch 0
    /// fully populated, including a full census.
    pub fn reset(&mut self, baseline: StatsSnapshot) {
        self.snapshots.clear();
        self.snapshots.push(baseline);
    }

    /// Applies the compression policy and appends `snapshot` if it passes.
    ///
    /// - Always pushed if `is_census_epoch`.
    /// - Otherwise pushed only if `|Δentropy| > 0.1` or `|Δzero_density| >
    ///   0.05` versus the last pushed snapshot.
    pub fn push_if_significant(&mut self, snapshot: StatsSnapshot, is_census_epoch: bool) {
        let significant = is_census_epoch || self.last().is_none_or(|last| {
            (snapshot.entropy - last.entropy).abs() > ENTROPY_DELTA_THRESHOLD
                || (snapshot.zero_density - last.zero_density).abs() > ZERO_DENSITY_DELTA_THRESHOLD
        });
        if significant {
            self.snapshots.push(snapshot);
        }
    }

    /// Unconditionally appends `snapshot`, bypassing the compression policy.
    /// Only available to the integration test suite, to drive specific
    /// before/after deltas deterministically.
    #[cfg(feature = "test-util")]
    pub fn push_for_test(&mut self, snapshot: StatsSnapshot) {
        self.snapshots.push(snapshot);
    }

    /// The most recently pushed snapshot, if any.
    #[must_use]
    pub fn last(&self) -> Option<&StatsSnapshot> {
        self.snapshots.last()
    }

    /// The full ordered sequence of snapshots.
    #[must_use]
    pub fn as_slice(&self) -> &[StatsSnapshot] {
        &self.snapshots
    }

    /// Number of snapshots currently retained.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether the log is empty. Only true before the first `reset`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Encodes `history` as CBOR bytes, for hosts that cross a process or wasm
/// boundary (e.g. a report generator consuming the time series).
#[cfg(feature = "serde")]
pub fn to_cbor(history: &History) -> Result<Vec<u8>, ciborium::ser::Error<std::io::Error>> {
    let mut out = Vec::new();
    ciborium::ser::into_writer(history, &mut out)?;
    Ok(out)
}

/// Decodes a `History` previously produced by [`to_cbor`].
#[cfg(feature = "serde")]
pub fn from_cbor(bytes: &[u8]) -> Result<History, ciborium::de::Error<std::io::Error>> {
    ciborium::de::from_reader(bytes)
}
