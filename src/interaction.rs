//! Pairwise interaction: samples an ordered pair, concatenates their tapes,
//! and runs the VM over the result. Write-back to the grid is a separate
//! step the caller drives explicitly, so it can be deferred until after an
//! epoch boundary's mutation pass has run.

use crate::config::{Config, Topology};
use crate::grid::Grid;
use crate::prng::Prng;
use crate::vm::{self, VmOutcome};

/// A completed interaction awaiting write-back: the VM outcome plus the pair
/// of cells it ran over.
#[derive(Debug, Clone, Copy)]
pub struct RanInteraction {
    /// Counters produced by the VM run.
    pub outcome: VmOutcome,
    /// Coordinates of cell A.
    pub ax: i64,
    /// Coordinates of cell A.
    pub ay: i64,
    /// Coordinates of cell B.
    pub bx: i64,
    /// Coordinates of cell B.
    pub by: i64,
}

/// The outcome of one call to [`InteractionBuffer::run`].
#[derive(Debug, Clone, Copy)]
pub enum InteractionEvent {
    /// The spatial topology drew `dx = dy = 0`; no counters were touched and
    /// the grid was not written to.
    SelfPickAborted,
    /// A program ran; the scratch tape holds the post-VM bytes, not yet
    /// written back to the grid. The caller must call
    /// [`InteractionBuffer::write_back`] to commit them.
    Ran(RanInteraction),
}

/// Owns the reusable `2T`-byte scratch tape an interaction executes over, so
/// no allocation happens on the hot path after construction.
#[derive(Debug, Clone)]
pub struct InteractionBuffer {
    tape: Vec<u8>,
}

impl InteractionBuffer {
    /// Allocates a scratch tape sized for `config`.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            tape: vec![0u8; config.doubled_tape()],
        }
    }

    /// Reallocates the scratch tape for a new configuration.
    pub fn reset(&mut self, config: &Config) {
        self.tape = vec![0u8; config.doubled_tape()];
    }

    /// Samples a pair and runs one interaction over it, leaving the result in
    /// the scratch tape. Draws from `rng` for the pairing; the VM itself
    /// consumes no further draws. Does **not** write the result back to
    /// `grid` — call [`Self::write_back`] once the caller has decided
    /// whether an epoch boundary falls before or after this interaction's
    /// cells are committed.
    pub fn run(&mut self, grid: &Grid, rng: &mut Prng, config: &Config) -> InteractionEvent {
        let width = grid.width();
        let height = grid.height();

        let ax = i64::from(rng.next_below(width));
        let ay = i64::from(rng.next_below(height));

        let Some((bx, by)) = sample_partner(rng, ax, ay, width, height, config.topology) else {
            return InteractionEvent::SelfPickAborted;
        };

        let tape_size = config.tape_size as usize;
        let a = grid.cell_at(ax, ay);
        let b = grid.cell_at(bx, by);
        self.tape[..tape_size].copy_from_slice(&a);
        self.tape[tape_size..].copy_from_slice(&b);

        let outcome = vm::execute(&mut self.tape, config.instruction_limit);

        InteractionEvent::Ran(RanInteraction { outcome, ax, ay, bx, by })
    }

    /// Commits the scratch tape produced by the most recent [`Self::run`]
    /// call back to `grid`'s cells A and B.
    pub fn write_back(&self, grid: &mut Grid, ran: RanInteraction, tape_size: usize) {
        grid.write_cell(ran.ax, ran.ay, &self.tape[..tape_size]);
        grid.write_cell(ran.bx, ran.by, &self.tape[tape_size..]);
    }
}

/// Samples B given A was drawn at `(ax, ay)`.
///
/// Returns `None` only for the spatial topology's `dx = dy = 0` self-pick,
/// which aborts the interaction.
fn sample_partner(
    rng: &mut Prng,
    ax: i64,
    ay: i64,
    width: u32,
    height: u32,
    topology: Topology,
) -> Option<(i64, i64)> {
    match topology {
        Topology::Global => loop {
            let bx = i64::from(rng.next_below(width));
            let by = i64::from(rng.next_below(height));
            if (bx, by) != (ax, ay) {
                return Some((bx, by));
            }
        },
        Topology::Spatial => {
            let dx = i64::from(rng.next_below(5)) - 2;
            let dy = i64::from(rng.next_below(5)) - 2;
            if dx == 0 && dy == 0 {
                return None;
            }
            let bx = (ax + dx).rem_euclid(i64::from(width));
            let by = (ay + dy).rem_euclid(i64::from(height));
            Some((bx, by))
        }
    }
}
