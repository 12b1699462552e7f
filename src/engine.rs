//! The public engine API: `new`/`reset`/`update_config`/`step`, and the
//! accessors a host uses to read state back out.

use tracing::{debug, info, trace};

use crate::census;
use crate::config::{Config, ConfigError, SeedingMode};
use crate::grid::Grid;
use crate::history::History;
use crate::interaction::{InteractionBuffer, InteractionEvent};
use crate::palette;
use crate::prng::Prng;
use crate::stats::{self, EpochAccumulator, StatsSnapshot};

/// A handful of hand-picked starter programs biased toward self-replication,
/// tiled across the grid under [`SeedingMode::Balanced`].
///
/// Each is a short BFF fragment that walks the write head into the neighbor
/// half and copies into it; real viability still depends on `T` and mutation,
/// this only biases the starting population rather than guaranteeing it.
const BALANCED_PATTERNS: [&[u8]; 3] = [
    b"}.",
    b"}}.",
    b"+}.",
];

/// Builds a `tape_size`-byte genome by tiling `pattern` across it, rotating
/// by `rotation` bytes each repetition so tiled copies within one cell are
/// not byte-identical stride-for-stride.
fn tile_pattern(pattern: &[u8], tape_size: usize, rotation: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(tape_size);
    let mut offset = rotation % pattern.len().max(1);
    while out.len() < tape_size {
        out.push(pattern[offset % pattern.len()]);
        offset += 1;
    }
    out
}

/// The deterministic simulation core. Owns the grid, the PRNG stream, and
/// all per-epoch accumulators; every operation is a total function except
/// construction and reconfiguration, which may reject an invalid
/// [`Config`].
#[derive(Debug, Clone)]
pub struct Engine {
    config: Config,
    grid: Grid,
    rng: Prng,
    interactions: InteractionBuffer,
    accumulator: EpochAccumulator,
    epoch_interactions: u64,
    stats: StatsSnapshot,
    history: History,
}

impl Engine {
    /// Validates `config` and constructs a freshly reset engine.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if `config` fails [`Config::validate`]; no
    /// partial engine is produced.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        info!(
            width = config.grid_width,
            height = config.grid_height,
            tape_size = config.tape_size,
            seed = config.seed,
            "engine constructed"
        );
        let mut engine = Self {
            grid: Grid::new(&config),
            rng: Prng::new(config.seed),
            interactions: InteractionBuffer::new(&config),
            accumulator: EpochAccumulator::default(),
            epoch_interactions: 0,
            stats: StatsSnapshot::baseline(),
            history: History::default(),
            config,
        };
        engine.reset();
        Ok(engine)
    }

    /// Re-seeds the PRNG, repopulates the grid per `seeding_mode`, and
    /// records the baseline snapshot at `epoch = 0`.
    pub fn reset(&mut self) {
        self.rng.reseed(self.config.seed);
        self.grid.reset(&self.config);
        self.interactions.reset(&self.config);
        self.accumulator.clear();
        self.epoch_interactions = 0;

        self.seed_grid();

        let (entropy, zero_density) = stats::grid_metrics(&self.grid);
        let census = census::compute(&self.grid);
        self.stats = StatsSnapshot {
            epoch: 0,
            avg_complexity: 0.0,
            replication_rate: 0,
            effective_replication: 0,
            entropy,
            zero_density,
            census: Some(census),
            last_census_epoch: 0,
        };
        self.history.reset(self.stats.clone());
        debug!(seed = self.config.seed, "engine reset");
    }

    /// Populates the grid per `self.config.seeding_mode`. Called only from
    /// `reset`, after the grid has already been reallocated and zeroed.
    fn seed_grid(&mut self) {
        match self.config.seeding_mode {
            SeedingMode::Random => {
                let len = self.grid.as_bytes().len();
                for index in 0..len {
                    let byte = self.rng.next_below(256) as u8;
                    self.grid.set_flat_byte(index, byte);
                }
            }
            SeedingMode::Balanced => {
                let tape_size = self.config.tape_size as usize;
                let cell_count = self.grid.cell_count();
                let width = i64::from(self.config.grid_width);
                for i in 0..cell_count {
                    let x = (i as i64) % width;
                    let y = (i as i64) / width;
                    let pattern = BALANCED_PATTERNS[(i as usize) % BALANCED_PATTERNS.len()];
                    let genome = tile_pattern(pattern, tape_size, i as usize);
                    self.grid.write_cell(x, y, &genome);
                }
            }
        }
    }

    /// Validates `config`, then either performs a hard reset (if `W`, `H`,
    /// `T`, or `seed` changed) or swaps the remaining fields in place.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if `config` fails [`Config::validate`];
    /// the engine's existing configuration is left untouched.
    pub fn update_config(&mut self, config: Config) -> Result<(), ConfigError> {
        config.validate()?;
        let needs_hard_reset = config.grid_width != self.config.grid_width
            || config.grid_height != self.config.grid_height
            || config.tape_size != self.config.tape_size
            || config.seed != self.config.seed;
        self.config = config;
        if needs_hard_reset {
            info!(seed = self.config.seed, "hard reset: dimensions or seed changed");
            self.reset();
        }
        Ok(())
    }

    /// Runs `n` interactions in PRNG sequence order, completing an epoch
    /// (and, every 50th epoch, a census) whenever enough interactions have
    /// accumulated.
    pub fn step(&mut self, n: u32) {
        let tape_size = self.config.tape_size as usize;
        for _ in 0..n {
            match self.interactions.run(&self.grid, &mut self.rng, &self.config) {
                InteractionEvent::SelfPickAborted => {
                    // Consumes PRNG draws but otherwise a no-op: no counter
                    // update, no epoch tick.
                }
                InteractionEvent::Ran(ran) => {
                    self.accumulator.record(ran.outcome.complexity, ran.outcome.copies, ran.outcome.neighbor_writes);
                    self.epoch_interactions += 1;
                    // An epoch-completing interaction's own cells must not be
                    // written back until after this epoch's mutation pass has
                    // run, so they are never among the bytes that pass can
                    // still overwrite. complete_epoch() runs first; the
                    // write-back of A/B is always the last thing that
                    // happens for this interaction.
                    if self.epoch_interactions >= self.grid.cell_count() {
                        self.complete_epoch();
                    }
                    self.interactions.write_back(&mut self.grid, ran, tape_size);
                }
            }
        }
    }

    /// The mutation pass, running-average update, grid metrics, periodic
    /// census, and history policy application that close out one epoch.
    fn complete_epoch(&mut self) {
        stats::mutate(&mut self.grid, &mut self.rng, &self.config);

        let epoch = self.stats.epoch + 1;
        let denom = self.grid.cell_count().max(1) as f64;
        let avg_complexity = self.accumulator.total_complexity as f64 / denom;
        let replication_rate = self.accumulator.total_copies;
        let effective_replication = self.accumulator.total_effective_copies;

        let (entropy, zero_density) = stats::grid_metrics(&self.grid);

        let is_census_epoch = epoch % 50 == 0;
        let (census, last_census_epoch) = if is_census_epoch {
            (Some(census::compute(&self.grid)), epoch)
        } else {
            (self.stats.census.clone(), self.stats.last_census_epoch)
        };

        self.stats = StatsSnapshot {
            epoch,
            avg_complexity,
            replication_rate,
            effective_replication,
            entropy,
            zero_density,
            census,
            last_census_epoch,
        };
        self.history.push_if_significant(self.stats.clone(), is_census_epoch);

        trace!(epoch, entropy, zero_density, "epoch completed");
        if is_census_epoch {
            let species_count = self.stats.census.as_ref().map_or(0, |c| c.species_count);
            debug!(epoch, species_count, "census computed");
        }

        self.accumulator.clear();
        self.epoch_interactions = 0;
    }

    /// A defensive copy of cell `(x, y)`'s bytes, toroidally normalized.
    #[must_use]
    pub fn cell_at(&self, x: i64, y: i64) -> Vec<u8> {
        self.grid.cell_at(x, y)
    }

    /// The full grid buffer, for hosts that render the whole population at
    /// once rather than cell-by-cell.
    #[must_use]
    pub fn grid_bytes(&self) -> &[u8] {
        self.grid.as_bytes()
    }

    /// Overwrites cell `(x, y)` directly, bypassing the PRNG-driven
    /// lifecycle. Only available to the integration test suite, to set up
    /// exact tape contents before exercising the VM or an interaction.
    #[cfg(feature = "test-util")]
    pub fn poke_cell(&mut self, x: i64, y: i64, bytes: &[u8]) {
        self.grid.write_cell(x, y, bytes);
    }

    /// Runs the VM directly over cells `(ax, ay)` and `(bx, by)`, bypassing
    /// PRNG pairing, and writes the result back. Does not touch epoch
    /// accumulators or the interaction tally. Only available to the
    /// integration test suite, to drive exact VM scenarios deterministically
    /// without depending on which cells the sampler happens to draw.
    #[cfg(feature = "test-util")]
    pub fn force_interaction(&mut self, ax: i64, ay: i64, bx: i64, by: i64) -> crate::vm::VmOutcome {
        let tape_size = self.config.tape_size as usize;
        let a = self.grid.cell_at(ax, ay);
        let b = self.grid.cell_at(bx, by);
        let mut tape = vec![0u8; tape_size * 2];
        tape[..tape_size].copy_from_slice(&a);
        tape[tape_size..].copy_from_slice(&b);
        let outcome = crate::vm::execute(&mut tape, self.config.instruction_limit);
        self.grid.write_cell(ax, ay, &tape[..tape_size]);
        self.grid.write_cell(bx, by, &tape[tape_size..]);
        outcome
    }

    /// The most recently completed epoch's statistics, by value.
    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.clone()
    }

    /// The compressed history of stats snapshots, oldest first.
    #[must_use]
    pub fn history(&self) -> &[StatsSnapshot] {
        self.history.as_slice()
    }

    /// The engine's current configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The fixed 256-entry RGBA render palette.
    #[must_use]
    pub fn palette(&self) -> [u8; 1024] {
        palette::palette_bytes()
    }
}
