//! Chunk-packed grid.
//!
//! Each 32-bit word encodes one 8(column)x4(row) tile of cells, row-major
//! within the tile (bit `= (x % 8) + (y % 4) * 8`). The chunk array itself
//! carries a one-chunk ghost border on all four sides:
//!
//! ```text
//!      cx:  0    1    2   ..   cols-1
//! cy: 0     .    .    .         .       (ghost row)
//!     1     .   w11  w12        .
//!     2     .   w21  w22        .
//!     ..
//!  rows-1   .    .    .         .       (ghost row)
//! ```
//!
//! An 8x4 neighborhood access at the grid edge therefore reads a whole
//! adjacent ghost word instead of branching. The word layout is also what
//! makes bulk extraction cheap: the interior of each chunk row is one
//! contiguous run of words, so stripping the border is one block copy per
//! row rather than a cell-by-cell walk.

use crate::error::SimError;
use crate::grid::CellGrid;

/// Columns per chunk.
pub const CHUNK_WIDTH: u32 = 8;
/// Rows per chunk.
pub const CHUNK_HEIGHT: u32 = 4;
/// Cells (bits) per chunk word.
pub const CHUNK_BITS: u32 = CHUNK_WIDTH * CHUNK_HEIGHT;

/// Grid of 8x4-cell chunks with a one-chunk ghost border.
#[derive(Debug, Clone)]
pub struct ChunkGrid {
    axis_size: u32,
    /// Chunk columns including both ghost columns (`axis / 8 + 2`).
    chunk_cols: usize,
    /// Chunk rows including both ghost rows (`axis / 4 + 2`).
    chunk_rows: usize,
    words: Vec<u32>,
}

impl ChunkGrid {
    /// Word index and in-chunk bit for cell `(x, y)`.
    /// `div_euclid`/`rem_euclid` map the ghost coordinates (`-1` and
    /// `axis_size`) onto the border chunks without a branch.
    #[inline(always)]
    fn word_and_bit(&self, x: i32, y: i32) -> (usize, u32) {
        debug_assert!(x >= -1 && x <= self.axis_size as i32);
        debug_assert!(y >= -1 && y <= self.axis_size as i32);
        let cx = (x.div_euclid(CHUNK_WIDTH as i32) + 1) as usize;
        let cy = (y.div_euclid(CHUNK_HEIGHT as i32) + 1) as usize;
        let bit = x.rem_euclid(CHUNK_WIDTH as i32) as u32
            + y.rem_euclid(CHUNK_HEIGHT as i32) as u32 * CHUNK_WIDTH;
        (cy * self.chunk_cols + cx, bit)
    }

    /// Chunk columns including the ghost border.
    #[inline]
    pub fn chunk_cols(&self) -> usize {
        self.chunk_cols
    }

    /// Chunk rows including the ghost border.
    #[inline]
    pub fn chunk_rows(&self) -> usize {
        self.chunk_rows
    }

    /// Raw word buffer, ghost border included.
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    /// Backing words for the update kernel and initializer.
    ///
    /// Parallel writers must partition this slice at word granularity: one
    /// word holds 32 cells, and a per-cell split would race on the
    /// read-modify-write `set_cell` performs.
    pub fn words_mut(&mut self) -> &mut [u32] {
        &mut self.words
    }

    /// Zero-copy byte view of the word buffer for bulk GPU upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.words)
    }

    /// Number of interior (non-ghost) chunk words.
    pub fn interior_word_count(&self) -> usize {
        (self.chunk_cols - 2) * (self.chunk_rows - 2)
    }

    /// Append the interior words into `out`, ghost border stripped.
    ///
    /// One contiguous block copy per chunk row; this is the efficient path
    /// for handing the grid to a renderer.
    pub fn copy_interior_into(&self, out: &mut Vec<u32>) {
        out.reserve(self.interior_word_count());
        for cy in 1..self.chunk_rows - 1 {
            let start = cy * self.chunk_cols + 1;
            out.extend_from_slice(&self.words[start..start + self.chunk_cols - 2]);
        }
    }
}

impl CellGrid for ChunkGrid {
    fn allocate(axis_size: u32) -> Result<Self, SimError> {
        if axis_size == 0 {
            return Err(SimError::ZeroAxisSize);
        }
        if axis_size % (CHUNK_WIDTH * CHUNK_HEIGHT) != 0 {
            return Err(SimError::AxisNotChunkAligned { axis_size });
        }
        let cell_count = axis_size as u64 * axis_size as u64;
        if cell_count % CHUNK_BITS as u64 != 0 {
            return Err(SimError::CellCountNotPackable { cell_count });
        }
        let chunk_cols = (axis_size / CHUNK_WIDTH) as usize + 2;
        let chunk_rows = (axis_size / CHUNK_HEIGHT) as usize + 2;
        Ok(Self {
            axis_size,
            chunk_cols,
            chunk_rows,
            words: vec![0; chunk_cols * chunk_rows],
        })
    }

    #[inline]
    fn axis_size(&self) -> u32 {
        self.axis_size
    }

    #[inline]
    fn cell_count(&self) -> u64 {
        self.axis_size as u64 * self.axis_size as u64
    }

    #[inline(always)]
    fn get_cell(&self, x: i32, y: i32) -> bool {
        let (word, bit) = self.word_and_bit(x, y);
        (self.words[word] >> bit) & 1 == 1
    }

    #[inline(always)]
    fn set_cell(&mut self, x: u32, y: u32, alive: bool) {
        debug_assert!(x < self.axis_size && y < self.axis_size);
        // Read-modify-write of the whole 32-bit word: clear the target bit,
        // OR in the new value.
        let (word, bit) = self.word_and_bit(x as i32, y as i32);
        self.words[word] = (self.words[word] & !(1 << bit)) | ((alive as u32) << bit);
    }

    fn memory_consumption(&self) -> usize {
        self.words.len() * 4
    }

    fn population(&self) -> u64 {
        self.words.iter().map(|w| w.count_ones() as u64).sum()
    }
}
