//! The grid store: a flat `W·H·T` byte buffer with toroidal cell addressing
//! (row-major, with wrap on both axes).

use crate::config::Config;

/// Owns the grid's backing buffer and answers toroidal cell queries.
///
/// Cell `(x, y)` occupies bytes `[(y*W + x)*T, (y*W + x + 1)*T)`. There is no
/// indirection here — one `Vec<u8>`, row-major, owned directly rather than
/// hidden behind a trait object.
#[derive(Debug, Clone)]
pub struct Grid {
    width: u32,
    height: u32,
    tape_size: u32,
    bytes: Vec<u8>,
}

impl Grid {
    /// Allocates a zeroed grid for `config`.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            width: config.grid_width,
            height: config.grid_height,
            tape_size: config.tape_size,
            bytes: vec![0u8; config.buffer_len()],
        }
    }

    /// Grid width in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Per-cell tape length in bytes.
    #[must_use]
    pub const fn tape_size(&self) -> u32 {
        self.tape_size
    }

    /// The full backing buffer, read-only — the contract the rendering
    /// collaborator relies on.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Reallocates the buffer to `config`'s dimensions, zeroed.
    pub fn reset(&mut self, config: &Config) {
        self.width = config.grid_width;
        self.height = config.grid_height;
        self.tape_size = config.tape_size;
        self.bytes = vec![0u8; config.buffer_len()];
    }

    /// Toroidal normalization of a possibly out-of-range coordinate.
    fn normalize(coord: i64, extent: u32) -> u32 {
        let extent = i64::from(extent);
        (((coord % extent) + extent) % extent) as u32
    }

    /// Byte offset and length of cell `(x, y)` after toroidal normalization.
    #[must_use]
    pub fn cell_range(&self, x: i64, y: i64) -> (usize, usize) {
        let nx = Self::normalize(x, self.width);
        let ny = Self::normalize(y, self.height);
        let index = ny as usize * self.width as usize + nx as usize;
        (index * self.tape_size as usize, self.tape_size as usize)
    }

    /// A defensive copy of cell `(x, y)`'s bytes, after toroidal
    /// normalization.
    #[must_use]
    pub fn cell_at(&self, x: i64, y: i64) -> Vec<u8> {
        let (offset, len) = self.cell_range(x, y);
        self.bytes[offset..offset + len].to_vec()
    }

    /// Overwrites cell `(x, y)` with `data`, which must be exactly
    /// `tape_size` bytes long.
    pub fn write_cell(&mut self, x: i64, y: i64, data: &[u8]) {
        let (offset, len) = self.cell_range(x, y);
        debug_assert_eq!(data.len(), len);
        self.bytes[offset..offset + len].copy_from_slice(data);
    }

    /// Total number of cells (`W·H`).
    #[must_use]
    pub fn cell_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Overwrites the byte at a flat `[0, W*H*T)` buffer index, used by the
    /// mutation pass, which addresses bytes directly rather
    /// than through a cell.
    pub fn set_flat_byte(&mut self, index: usize, value: u8) {
        self.bytes[index] = value;
    }
}
