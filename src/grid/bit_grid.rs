//! Flat bit-addressable grid.
//!
//! Memory layout (axis size 4, `.` = ghost cell):
//!
//! ```text
//!      x: -1  0  1  2  3  4
//! y: -1    .  .  .  .  .  .
//!     0    .  0  1  2  3  .
//!     1    .  4  5  6  7  .
//!     2    .  8  9 10 11  .
//!     3    . 12 13 14 15  .
//!     4    .  .  .  .  .  .
//! ```
//!
//! Cell `(x, y)` lives at bit `(x + 1) + (y + 1) * (axis_size + 2)` of a
//! contiguous `(axis_size + 2)^2`-bit buffer stored as 64-bit words. The
//! ghost ring is allocated zeroed and never written.

use crate::error::SimError;
use crate::grid::CellGrid;

const WORD_BITS: usize = 64;

/// Flat 1-bit-per-cell grid with a one-cell ghost border.
#[derive(Debug, Clone)]
pub struct BitGrid {
    axis_size: u32,
    /// `axis_size + 2`, the stride of the padded buffer in bits.
    padded_axis: usize,
    words: Vec<u64>,
}

impl BitGrid {
    /// Bit index of cell `(x, y)` in the padded buffer.
    /// `x` and `y` may be `-1` or `axis_size` (the ghost ring).
    #[inline(always)]
    fn bit_index(&self, x: i32, y: i32) -> usize {
        debug_assert!(x >= -1 && x <= self.axis_size as i32);
        debug_assert!(y >= -1 && y <= self.axis_size as i32);
        (x + 1) as usize + (y + 1) as usize * self.padded_axis
    }

    /// Stride of the padded buffer (`axis_size + 2`).
    #[inline]
    pub fn padded_axis(&self) -> usize {
        self.padded_axis
    }

    /// Total bits in the padded buffer, ghost ring included.
    #[inline]
    pub fn padded_bit_count(&self) -> usize {
        self.padded_axis * self.padded_axis
    }

    /// Backing words, read-only.
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// Backing words for the update kernel and initializer.
    ///
    /// Parallel writers must partition this slice at word granularity: a
    /// single word holds bits of many cells, and a sub-word split would
    /// reintroduce the read-modify-write race `set_cell` has.
    pub fn words_mut(&mut self) -> &mut [u64] {
        &mut self.words
    }
}

impl CellGrid for BitGrid {
    fn allocate(axis_size: u32) -> Result<Self, SimError> {
        if axis_size == 0 {
            return Err(SimError::ZeroAxisSize);
        }
        let padded_axis = axis_size as usize + 2;
        let bits = padded_axis * padded_axis;
        Ok(Self {
            axis_size,
            padded_axis,
            words: vec![0; bits.div_ceil(WORD_BITS)],
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
        let idx = self.bit_index(x, y);
        (self.words[idx / WORD_BITS] >> (idx % WORD_BITS)) & 1 == 1
    }

    #[inline(always)]
    fn set_cell(&mut self, x: u32, y: u32, alive: bool) {
        debug_assert!(x < self.axis_size && y < self.axis_size);
        let idx = self.bit_index(x as i32, y as i32);
        let mask = 1u64 << (idx % WORD_BITS);
        if alive {
            self.words[idx / WORD_BITS] |= mask;
        } else {
            self.words[idx / WORD_BITS] &= !mask;
        }
    }

    fn memory_consumption(&self) -> usize {
        self.padded_bit_count() / 8
    }

    fn population(&self) -> u64 {
        self.words.iter().map(|w| w.count_ones() as u64).sum()
    }
}
