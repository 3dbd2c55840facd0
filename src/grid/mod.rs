//! Grid storage for the simulation.
//!
//! Two competing representations back the cell state:
//!
//! - [`BitGrid`]: a flat, bit-addressable buffer, one bit per cell.
//! - [`ChunkGrid`]: 8x4-cell tiles packed into 32-bit words, tuned so the
//!   whole interior can be block-copied row-wise for GPU upload.
//!
//! Both carry an always-dead ghost border one unit wide (one cell for
//! `BitGrid`, one whole chunk for `ChunkGrid`). Nothing ever writes the
//! border, so neighbor lookups one step past the grid edge read dead cells
//! without any bounds branch. The border is a fixed dead boundary, not
//! wraparound.

mod bit_grid;
mod chunk_grid;

pub use bit_grid::BitGrid;
pub use chunk_grid::{ChunkGrid, CHUNK_BITS, CHUNK_HEIGHT, CHUNK_WIDTH};

use crate::error::SimError;

/// The accessor contract shared by both grid representations.
///
/// External clients (renderers, UI) read the grid exclusively through this
/// trait; the update kernel and the initializer write through it or through
/// the representation's word buffer directly.
pub trait CellGrid: Send + Sync {
    /// Allocate a zeroed grid (all cells dead, ghost border included).
    fn allocate(axis_size: u32) -> Result<Self, SimError>
    where
        Self: Sized;

    /// Side length of the square grid in cells, excluding the ghost border.
    fn axis_size(&self) -> u32;

    /// Number of simulated cells (`axis_size^2`), excluding ghost cells.
    fn cell_count(&self) -> u64;

    /// Read one cell. Valid for coordinates in `[-1, axis_size]` on both
    /// axes: the ghost border absorbs exactly one step beyond the edge and
    /// always reads dead. Anything further out is out of contract.
    fn get_cell(&self, x: i32, y: i32) -> bool;

    /// Write one cell. Coordinates must be in `[0, axis_size)`; the ghost
    /// border is never written.
    fn set_cell(&mut self, x: u32, y: u32, alive: bool);

    /// Backing storage size in bytes.
    fn memory_consumption(&self) -> usize;

    /// Number of live cells. The ghost border is always zero, so this is a
    /// popcount over the whole backing buffer.
    fn population(&self) -> u64;
}
