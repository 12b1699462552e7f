//! Strided species census: sampling, fingerprinting, ranking, and
//! per-genome entropy.

use rustc_hash::FxHashMap;

use crate::grid::Grid;
use crate::stats::shannon_entropy;

/// How many ranked species a census reports.
pub const TOP_K: usize = 5;

/// One ranked species within a census snapshot.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpeciesEntry {
    /// Rank, 1-based, non-increasing by `count`.
    pub rank: u32,
    /// Canonical genome fingerprint: decimal byte values joined by commas.
    pub code: String,
    /// Estimated population count: `round(dominance * W*H)`.
    pub count: u64,
    /// Fraction of the sample this species occupies.
    pub dominance: f64,
    /// Per-genome Shannon entropy of this species' own byte distribution.
    pub entropy: f64,
}

/// A census snapshot.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Census {
    /// Number of distinct fingerprints seen in the sample.
    pub species_count: u64,
    /// Up to [`TOP_K`] species, ranked by count descending.
    pub top_species: Vec<SpeciesEntry>,
}

/// Canonical, injective serialization of a genome's bytes.
#[must_use]
pub fn fingerprint(genome: &[u8]) -> String {
    let mut out = String::with_capacity(genome.len() * 4);
    for (i, b) in genome.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&b.to_string());
    }
    out
}

/// Shannon entropy of one genome's own byte distribution.
///
/// Pure function; does not touch the PRNG.
#[must_use]
pub fn genome_entropy(genome: &[u8]) -> f64 {
    if genome.is_empty() {
        return 0.0;
    }
    let mut histogram = [0u64; 256];
    for &b in genome {
        histogram[b as usize] += 1;
    }
    shannon_entropy(&histogram, genome.len() as u64)
}

/// Computes a census over a strided sample of cells. Never
/// draws from the PRNG — sampling is deterministic arithmetic stride so
/// observation frequency never perturbs the physics timeline.
#[must_use]
pub fn compute(grid: &Grid) -> Census {
    let width = grid.width();
    let height = grid.height();
    let total_cells = grid.cell_count();
    if total_cells == 0 {
        return Census::default();
    }

    let step = cell_stride();
    let mut tally: FxHashMap<String, (u64, Vec<u8>)> = FxHashMap::default();
    let mut sampled: u64 = 0;
    let mut i: u64 = 0;
    while i < total_cells {
        let x = (i % u64::from(width)) as i64;
        let y = (i / u64::from(width)) as i64;
        let genome = grid.cell_at(x, y);
        let key = fingerprint(&genome);
        let entry = tally.entry(key).or_insert_with(|| (0, genome));
        entry.0 += 1;
        sampled += 1;
        i += step as u64;
    }

    let species_count = tally.len() as u64;
    let mut ranked: Vec<(String, u64, Vec<u8>)> =
        tally.into_iter().map(|(code, (count, genome))| (code, count, genome)).collect();
    // Sort descending by count; break ties by fingerprint for determinism.
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let grid_population = total_cells as f64;
    let top_species = ranked
        .into_iter()
        .take(TOP_K)
        .enumerate()
        .map(|(idx, (code, count, genome))| {
            let dominance = count as f64 / sampled as f64;
            SpeciesEntry {
                rank: idx as u32 + 1,
                code,
                count: (dominance * grid_population).round() as u64,
                dominance,
                entropy: genome_entropy(&genome),
            }
        })
        .collect();

    Census { species_count, top_species }
}

/// `floor(1/0.1) = 10`, nudged odd, applied to cell indices.
#[must_use]
pub const fn cell_stride() -> usize {
    crate::stats::stride()
}
