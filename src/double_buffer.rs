//! Double-buffered grid pair.
//!
//! One tick reads `current` and writes `next` on disjoint buffers, which is
//! what removes the read-after-write hazard an in-place update would have.
//! After the tick's join barrier the roles are exchanged in O(1).

use crate::error::SimError;
use crate::grid::CellGrid;

/// A grid and its "next" twin, allocated together and dropped together.
#[derive(Debug)]
pub struct DoubleBuffer<G: CellGrid> {
    current: G,
    next: G,
}

impl<G: CellGrid> DoubleBuffer<G> {
    /// Allocate both grids with the same dimensions. Either both succeed or
    /// neither exists; there is no partial state.
    pub fn allocate(axis_size: u32) -> Result<Self, SimError> {
        Ok(Self {
            current: G::allocate(axis_size)?,
            next: G::allocate(axis_size)?,
        })
    }

    /// The grid ticks read from and clients observe.
    #[inline]
    pub fn current(&self) -> &G {
        &self.current
    }

    /// Mutable access to the current grid (initialization only).
    #[inline]
    pub fn current_mut(&mut self) -> &mut G {
        &mut self.current
    }

    /// Read side and write side of one tick, borrowed simultaneously.
    #[inline]
    pub fn split(&mut self) -> (&G, &mut G) {
        (&self.current, &mut self.next)
    }

    /// Exchange the two handles. O(1), no allocation, no data copy,
    /// never fails.
    #[inline]
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.current, &mut self.next);
    }

    /// Backing storage of both grids, in bytes.
    pub fn memory_consumption(&self) -> usize {
        self.current.memory_consumption() + self.next.memory_consumption()
    }
}
