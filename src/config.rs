//! Engine configuration: the immutable-within-a-run parameters
//! and the construction-time rejections.

use thiserror::Error;

/// How a second tape is sampled once the first has been drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Topology {
    /// Resample uniformly at random until the pick differs from A.
    #[default]
    Global,
    /// Sample a small 5×5 neighborhood offset around A; a zero offset aborts
    /// the interaction.
    Spatial,
}

/// How the grid is populated on `reset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SeedingMode {
    /// Every byte of every cell is drawn uniformly from the PRNG.
    #[default]
    Random,
    /// A small library of hand-picked starter genomes is tiled/rotated
    /// across the grid, biasing the initial population toward programs
    /// known to be capable of self-replication.
    Balanced,
}

/// Engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Grid width in cells. Must be positive.
    pub grid_width: u32,
    /// Grid height in cells. Must be positive.
    pub grid_height: u32,
    /// Per-cell tape length in bytes. Must be a power of two.
    pub tape_size: u32,
    /// Probability, per byte per epoch, that a mutation pass overwrites it.
    /// Represented as parts-per-million so the struct can derive `Eq`.
    pub mutation_rate_ppm: u32,
    /// Maximum VM cycles executed per interaction.
    pub instruction_limit: u32,
    /// How the second half of an interaction pair is chosen.
    pub topology: Topology,
    /// How the grid is populated on reset.
    pub seeding_mode: SeedingMode,
    /// PRNG seed.
    pub seed: u32,
}

impl Config {
    /// Returns `mutation_rate_ppm` as a probability in `[0, 1]`.
    #[must_use]
    pub fn mutation_rate(&self) -> f64 {
        f64::from(self.mutation_rate_ppm) / 1_000_000.0
    }

    /// Checks the grid-shape invariants and the construction rejections below.
    ///
    /// # Errors
    /// Returns the first violated rule encountered, checked in the order
    /// they are checked below.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.tape_size.is_power_of_two() {
            return Err(ConfigError::TapeSizeNotPowerOfTwo(self.tape_size));
        }
        let total = u64::from(self.grid_width) * u64::from(self.grid_height) * u64::from(self.tape_size);
        if total == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        if self.mutation_rate_ppm > 1_000_000 {
            return Err(ConfigError::MutationRateOutOfRange(self.mutation_rate()));
        }
        Ok(())
    }

    /// Total grid buffer length in bytes (`W·H·T`).
    #[must_use]
    pub fn buffer_len(&self) -> usize {
        self.grid_width as usize * self.grid_height as usize * self.tape_size as usize
    }

    /// `2·T`, the working-tape length for one interaction.
    #[must_use]
    pub fn doubled_tape(&self) -> usize {
        self.tape_size as usize * 2
    }
}

/// Rejections raised by [`Config::validate`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// `tape_size` is not a power of two, so `2·tape_size - 1` is not a
    /// valid wrap mask.
    #[error("tape_size {0} is not a power of two")]
    TapeSizeNotPowerOfTwo(u32),
    /// `grid_width * grid_height * tape_size == 0`.
    #[error("grid_width, grid_height, and tape_size must all be positive")]
    EmptyGrid,
    /// `mutation_rate` outside `[0, 1]`.
    #[error("mutation_rate {0} is outside [0, 1]")]
    MutationRateOutOfRange(f64),
}
